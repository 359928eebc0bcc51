use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// Address Location response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressLocationResponse {
    #[serde(default)]
    pub address_result: Option<AddressResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressResult {
    #[serde(default)]
    pub addresses: Option<Vec<AddressRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default)]
    pub address_point: Option<AddressPoint>,
    #[serde(default)]
    pub house_number_string: Option<JsonValue>,
    /// Remaining fields; the display address lives under one of several keys.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPoint {
    pub centre_x: f64,
    pub centre_y: f64,
}

/// MapServer `identify` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponse {
    #[serde(default)]
    pub results: Option<Vec<Feature>>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
}

/// Layer `query` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
}

/// Identify result or query feature; both carry an attribute map.
#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Option<Map<String, JsonValue>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(default)]
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default)]
    pub wkid: Option<i64>,
    #[serde(default)]
    pub latest_wkid: Option<i64>,
}
