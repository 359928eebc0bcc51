//! Coordinate to parcel lookups against the NSW_Cadastre MapServer.
//!
//! Geometry is DCDB/GIS cadastral data. It is not survey accurate, and the
//! service has been seen to return identical coordinates for MGA94 and
//! MGA2020 output spatial references, so treat it as indicative only.
//! All input coordinates are lon/lat in EPSG:4326.

use serde_json::json;

use crate::{
    decode, wire, LotGeometry, LotPlan, NswSpatialClient, ParcelHit, QueryParams, Result,
    SpatialError,
};

/// Layer holding the lot polygons.
pub const PARCEL_LAYER: u32 = 9;
/// Search distance used by [`NswSpatialClient::nearby_lots_default`].
pub const DEFAULT_NEARBY_DISTANCE_M: f64 = 50.0;

/// Half-width of the map extent sent with identify requests, in degrees.
const IDENTIFY_EXTENT_DEG: f64 = 0.002;

/// Returns `true` for projected MGA94 (283xx) or MGA2020 (78xx) zone codes.
pub fn is_mga_epsg(epsg: u32) -> bool {
    (7846..=7859).contains(&epsg) || (28346..=28359).contains(&epsg)
}

pub(crate) fn identify_params(lon: f64, lat: f64) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("f", "json")
        .push("geometry", format!("{lon},{lat}"))
        .push("geometryType", "esriGeometryPoint")
        .push("sr", 4326)
        .push("tolerance", 3)
        .push("returnGeometry", false)
        .push("imageDisplay", "800,600,96")
        .push(
            "mapExtent",
            format!(
                "{},{},{},{}",
                lon - IDENTIFY_EXTENT_DEG,
                lat - IDENTIFY_EXTENT_DEG,
                lon + IDENTIFY_EXTENT_DEG,
                lat + IDENTIFY_EXTENT_DEG
            ),
        )
        .push("layers", format!("all:{PARCEL_LAYER}"));
    params
}

pub(crate) fn nearby_params(lon: f64, lat: f64, distance_m: f64) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("f", "json")
        .push("geometry", format!("{lon},{lat}"))
        .push("geometryType", "esriGeometryPoint")
        .push("inSR", 4326)
        .push("spatialRel", "esriSpatialRelIntersects")
        .push("distance", distance_m)
        .push("units", "esriSRUnit_Meter")
        .push("outFields", "lotnumber,planlabel")
        .push("returnGeometry", false);
    params
}

pub(crate) fn geometry_params(object_id: i64, epsg: u32) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("f", "json")
        .push("where", format!("objectid={object_id}"))
        .push("outFields", "objectid")
        .push("returnGeometry", true)
        .push("outSR", epsg);
    params
}

fn ensure_coordinate(lon: f64, lat: f64) -> Result<()> {
    if lon.is_finite() && lat.is_finite() {
        Ok(())
    } else {
        Err(SpatialError::InvalidInput(format!(
            "coordinate ({lon}, {lat}) must be finite"
        )))
    }
}

impl NswSpatialClient {
    fn identify_url(&self) -> String {
        format!("{}/identify", self.cadastre_base)
    }

    fn parcel_query_url(&self) -> String {
        format!("{}/{PARCEL_LAYER}/query", self.cadastre_base)
    }

    /// All parcels identified at a point, as lot/section/plan.
    ///
    /// One address can relate to more than one lot. Duplicates are dropped
    /// and the service's order is kept.
    pub async fn lots_plans_from_point(&self, lon: f64, lat: f64) -> Result<Vec<ParcelHit>> {
        ensure_coordinate(lon, lat)?;
        let request = self.request(self.identify_url(), identify_params(lon, lat));
        let body = self.json.fetch_json(&request).await?;
        decode::decode_parcel_hits(body)
    }

    /// First parcel identified at a point.
    pub async fn lot_plan_from_point(&self, lon: f64, lat: f64) -> Result<Option<ParcelHit>> {
        Ok(self.lots_plans_from_point(lon, lat).await?.into_iter().next())
    }

    /// Lots whose boundary lies within `distance_m` metres of a point.
    ///
    /// This is a GIS distance search, not survey-accurate adjacency.
    pub async fn nearby_lots(&self, lon: f64, lat: f64, distance_m: f64) -> Result<Vec<LotPlan>> {
        ensure_coordinate(lon, lat)?;
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(SpatialError::InvalidInput(format!(
                "search distance {distance_m} must be a non-negative number of metres"
            )));
        }
        let request = self.request(self.parcel_query_url(), nearby_params(lon, lat, distance_m));
        let body = self.json.fetch_json(&request).await?;
        decode::decode_lot_plans(body)
    }

    /// [`NswSpatialClient::nearby_lots`] with a 50 m search distance.
    pub async fn nearby_lots_default(&self, lon: f64, lat: f64) -> Result<Vec<LotPlan>> {
        self.nearby_lots(lon, lat, DEFAULT_NEARBY_DISTANCE_M).await
    }

    /// Boundary of the parcel at a point, requested in an MGA projection.
    ///
    /// `epsg` must be 7846..=7859 (MGA2020) or 28346..=28359 (MGA94); e.g.
    /// 28356 for MGA94 zone 56 or 7856 for MGA2020 zone 56. The parcel is
    /// identified first, then its geometry is queried by object id. An empty
    /// geometry is returned when no parcel, object id or feature is found.
    pub async fn lot_geometry_mga_from_point(
        &self,
        lon: f64,
        lat: f64,
        epsg: u32,
    ) -> Result<LotGeometry> {
        if !is_mga_epsg(epsg) {
            return Err(SpatialError::InvalidInput(format!(
                "epsg {epsg} must be a projected MGA code in 7846..=7859 or 28346..=28359"
            )));
        }
        ensure_coordinate(lon, lat)?;

        let request = self.request(self.identify_url(), identify_params(lon, lat));
        let identified: wire::IdentifyResponse =
            decode::from_json(self.json.fetch_json(&request).await?, "identify")?;
        if let Some(sr) = &identified.spatial_reference {
            self.json.trace_value(
                request.debug,
                "identify spatialReference",
                &json!({ "wkid": sr.wkid, "latestWkid": sr.latest_wkid }),
            );
        }

        let Some(object_id) = decode::first_object_id(&identified) else {
            return Ok(LotGeometry::default());
        };

        let request = self.request(self.parcel_query_url(), geometry_params(object_id, epsg));
        let queried: wire::QueryResponse =
            decode::from_json(self.json.fetch_json(&request).await?, "query")?;
        let geometry = decode::decode_geometry(queried);
        if let Some(sr) = geometry.spatial_reference {
            self.json.trace_value(
                request.debug,
                "geometry spatialReference",
                &json!({ "wkid": sr.wkid, "latestWkid": sr.latest_wkid }),
            );
        }

        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::{geometry_params, identify_params, is_mga_epsg, nearby_params};
    use crate::ParamValue;

    #[test]
    fn mga_ranges() {
        assert!(is_mga_epsg(7846));
        assert!(is_mga_epsg(7856));
        assert!(is_mga_epsg(28356));
        assert!(is_mga_epsg(28359));
        assert!(!is_mga_epsg(4326));
        assert!(!is_mga_epsg(7845));
        assert!(!is_mga_epsg(28360));
    }

    #[test]
    fn identify_params_span_point() {
        let params = identify_params(151.0, -33.0);
        assert_eq!(params.get("geometry"), Some(&ParamValue::text("151,-33")));
        assert_eq!(params.get("sr"), Some(&ParamValue::integer(4326)));
        assert_eq!(params.get("layers"), Some(&ParamValue::text("all:9")));
        assert_eq!(params.get("returnGeometry"), Some(&ParamValue::text("false")));

        let extent = match params.get("mapExtent") {
            Some(ParamValue::Text(extent)) => extent.clone(),
            other => panic!("expected text extent, got {other:?}"),
        };
        let corners: Vec<f64> = extent
            .split(',')
            .map(|value| value.parse().expect("numeric corner"))
            .collect();
        assert_eq!(corners.len(), 4);
        assert!((corners[0] - 150.998).abs() < 1e-9);
        assert!((corners[3] - -32.998).abs() < 1e-9);
    }

    #[test]
    fn nearby_params_carry_distance() {
        let params = nearby_params(151.0, -33.0, 30.0);
        assert_eq!(params.get("distance"), Some(&ParamValue::float(30.0)));
        assert_eq!(params.get("inSR"), Some(&ParamValue::integer(4326)));
        assert_eq!(params.get("outFields"), Some(&ParamValue::text("lotnumber,planlabel")));
    }

    #[test]
    fn geometry_params_filter_by_object_id() {
        let params = geometry_params(1234, 7856);
        assert_eq!(params.get("where"), Some(&ParamValue::text("objectid=1234")));
        assert_eq!(params.get("outSR"), Some(&ParamValue::integer(7856)));
        assert_eq!(params.get("returnGeometry"), Some(&ParamValue::text("true")));
    }
}
