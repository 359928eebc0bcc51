use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::{wire, AddressMatch, LotGeometry, LotPlan, ParcelHit, SpatialError, SpatialReference};

const DISPLAY_ADDRESS_KEYS: [&str; 5] = [
    "address",
    "fullAddress",
    "displayAddress",
    "formattedAddress",
    "addressString",
];
const NESTED_ADDRESS_KEYS: [&str; 2] = ["addressDetails", "address_detail"];
const ADDRESS_PART_KEYS: [&str; 6] = [
    "houseNumber",
    "roadName",
    "roadType",
    "suburb",
    "postCode",
    "state",
];

pub(crate) fn from_json<T: DeserializeOwned>(
    body: JsonValue,
    what: &str,
) -> Result<T, SpatialError> {
    serde_json::from_value(body)
        .map_err(|err| SpatialError::Decode(format!("unexpected {what} response shape: {err}")))
}

/// Builds a [`SpatialError::Service`] from the value of a top-level `error` field.
///
/// Fields are read independently; one with an unexpected type falls back to
/// its default without discarding the others.
pub(crate) fn service_error(payload: &JsonValue) -> SpatialError {
    let object = match payload {
        JsonValue::Object(object) => object,
        other => {
            return SpatialError::Service {
                message: scalar_text(other).unwrap_or_default(),
                details: Vec::new(),
                code: None,
            };
        }
    };

    let details = match object.get("details") {
        Some(JsonValue::Array(details)) => details.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    };
    let code = object
        .get("code")
        .and_then(scalar_text)
        .and_then(|code| code.parse().ok());

    SpatialError::Service {
        message: object.get("message").and_then(scalar_text).unwrap_or_default(),
        details,
        code,
    }
}

pub(crate) fn decode_address(body: JsonValue) -> Result<Option<AddressMatch>, SpatialError> {
    let response: wire::AddressLocationResponse = from_json(body, "address location")?;
    let addresses = response
        .address_result
        .and_then(|result| result.addresses)
        .unwrap_or_default();

    let match_count = addresses.len();
    let Some(first) = addresses.into_iter().next() else {
        return Ok(None);
    };
    let point = first.address_point.as_ref().ok_or_else(|| {
        SpatialError::Decode("first address candidate has no addressPoint".to_owned())
    })?;

    Ok(Some(AddressMatch {
        lon: point.centre_x,
        lat: point.centre_y,
        matched_address: display_address(&first.extra),
        match_count,
        matched_house: first.house_number_string.as_ref().and_then(scalar_text),
    }))
}

/// Picks a readable address from the several keys the service has used.
pub(crate) fn display_address(record: &Map<String, JsonValue>) -> String {
    if let Some(address) = first_text(record, &DISPLAY_ADDRESS_KEYS) {
        return address;
    }

    let nested = NESTED_ADDRESS_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(JsonValue::as_object));
    if let Some(address) = nested.and_then(|nested| first_text(nested, &DISPLAY_ADDRESS_KEYS)) {
        return address;
    }

    ADDRESS_PART_KEYS
        .iter()
        .filter_map(|key| record.get(*key).and_then(scalar_text))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn decode_parcel_hits(body: JsonValue) -> Result<Vec<ParcelHit>, SpatialError> {
    let response: wire::IdentifyResponse = from_json(body, "identify")?;
    let mut hits: Vec<ParcelHit> = Vec::new();

    for result in response.results.unwrap_or_default() {
        let attributes = result.attributes.unwrap_or_default();
        let hit = ParcelHit {
            lot: attribute(&attributes, &["lotnumber"]),
            section: attribute(&attributes, &["sectionnumber", "sectionumber"])
                .filter(|section| !section.eq_ignore_ascii_case("null")),
            plan: attribute(&attributes, &["planlabel"]),
        };

        if (hit.lot.is_some() || hit.plan.is_some()) && !hits.contains(&hit) {
            hits.push(hit);
        }
    }

    Ok(hits)
}

pub(crate) fn decode_lot_plans(body: JsonValue) -> Result<Vec<LotPlan>, SpatialError> {
    let response: wire::QueryResponse = from_json(body, "query")?;

    Ok(response
        .features
        .unwrap_or_default()
        .into_iter()
        .filter_map(|feature| {
            let attributes = feature.attributes.unwrap_or_default();
            Some(LotPlan {
                lot: attribute(&attributes, &["lotnumber"])?,
                plan: attribute(&attributes, &["planlabel"])?,
            })
        })
        .collect())
}

/// Object id of the first identified parcel, if any.
///
/// Identify returns formatted strings, so `"1,234"` is accepted.
pub(crate) fn first_object_id(response: &wire::IdentifyResponse) -> Option<i64> {
    let attributes = response.results.as_ref()?.first()?.attributes.as_ref()?;
    let raw = attribute(attributes, &["objectid", "OBJECTID"])?;
    raw.replace(',', "").parse().ok()
}

pub(crate) fn decode_geometry(response: wire::QueryResponse) -> LotGeometry {
    let top_level = response.spatial_reference.map(spatial_reference);
    let Some(feature) = response.features.and_then(|features| features.into_iter().next()) else {
        return LotGeometry::default();
    };
    let Some(geometry) = feature.geometry else {
        return LotGeometry {
            rings: Vec::new(),
            spatial_reference: top_level,
        };
    };

    let rings = geometry
        .rings
        .unwrap_or_default()
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .filter_map(|vertex| match vertex.as_slice() {
                    [x, y, ..] => Some([*x, *y]),
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
        .filter(|ring| !ring.is_empty())
        .collect();

    LotGeometry {
        rings,
        spatial_reference: top_level.or(geometry.spatial_reference.map(spatial_reference)),
    }
}

pub(crate) fn spatial_reference(value: wire::SpatialReference) -> SpatialReference {
    SpatialReference {
        wkid: value.wkid,
        latest_wkid: value.latest_wkid,
    }
}

/// First non-blank attribute under any of `keys`.
fn attribute(attributes: &Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| attributes.get(*key).and_then(scalar_text))
}

fn first_text(record: &Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(JsonValue::String(text)) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        _ => None,
    })
}

/// Trimmed text of a string or number; `None` for blanks and other types.
fn scalar_text(value: &JsonValue) -> Option<String> {
    let text = match value {
        JsonValue::String(text) => text.trim().to_owned(),
        JsonValue::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
