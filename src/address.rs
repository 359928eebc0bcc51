//! Street address to coordinate, via the Address Location service.
//!
//! Only resolves addresses to points. Parcel lookups take the resulting
//! coordinate, see [`crate::cadastre`].

use crate::{
    decode, AddressMatch, NswSpatialClient, QueryParams, Result, SimpleAddress, SpatialError,
};

/// Splits `"24 EASTBOURNE AVE"` into house number, road name and road type.
///
/// Input is uppercased and split on whitespace: the first token is the house
/// number, the last the road type, and everything between the road name.
pub fn parse_simple_address(address: &str) -> Result<SimpleAddress> {
    let upper = address.trim().to_uppercase();
    let parts: Vec<&str> = upper.split_whitespace().collect();
    match parts.as_slice() {
        [house_number, middle @ .., road_type] => Ok(SimpleAddress {
            house_number: (*house_number).to_owned(),
            road_name: middle.join(" "),
            road_type: (*road_type).to_owned(),
        }),
        _ => Err(SpatialError::InvalidInput(format!(
            "address '{}' needs at least a house number and a road type",
            address.trim()
        ))),
    }
}

pub(crate) fn address_params(
    address: &SimpleAddress,
    suburb: Option<&str>,
    postcode: Option<&str>,
) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("houseNumber", &address.house_number)
        .push("roadName", &address.road_name)
        .push("roadType", &address.road_type)
        .push("projection", "EPSG:4326")
        .push_opt("suburb", suburb)
        .push_opt("postCode", postcode);
    params
}

impl NswSpatialClient {
    /// Resolves an address to an approximate EPSG:4326 coordinate.
    ///
    /// Returns `Ok(None)` when the service has no candidate. When several
    /// candidates come back the first is used and
    /// [`AddressMatch::match_count`] reports how many there were.
    pub async fn address_to_point(
        &self,
        address: &str,
        suburb: Option<&str>,
        postcode: Option<&str>,
    ) -> Result<Option<AddressMatch>> {
        let parsed = parse_simple_address(address)?;
        let request = self.request(
            self.address_url.clone(),
            address_params(&parsed, suburb, postcode),
        );
        let body = self.json.fetch_json(&request).await?;
        decode::decode_address(body)
    }
}
