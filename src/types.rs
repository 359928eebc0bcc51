use std::fmt;

/// Street address split into the fields the Address Location service expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleAddress {
    pub house_number: String,
    pub road_name: String,
    pub road_type: String,
}

/// Best address candidate returned by the Address Location service.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressMatch {
    /// Longitude, EPSG:4326.
    pub lon: f64,
    /// Latitude, EPSG:4326.
    pub lat: f64,
    /// Human-readable address of the match; empty when the service gave none.
    pub matched_address: String,
    /// Number of candidates returned. More than one means a fuzzy match.
    pub match_count: usize,
    /// House number of the match as reported by the service.
    pub matched_house: Option<String>,
}

impl AddressMatch {
    /// Returns `true` when the service snapped to a different house number.
    ///
    /// Returns `false` when the service reported no house number.
    pub fn house_number_differs(&self, input_house: &str) -> bool {
        self.matched_house.as_deref().is_some_and(|matched| {
            !matched
                .trim()
                .eq_ignore_ascii_case(input_house.trim())
        })
    }

    pub fn is_fuzzy(&self) -> bool {
        self.match_count > 1
    }
}

/// Cadastral parcel identified at a point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParcelHit {
    pub lot: Option<String>,
    pub section: Option<String>,
    pub plan: Option<String>,
}

impl fmt::Display for ParcelHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lot = self.lot.as_deref().unwrap_or("?");
        let plan = self.plan.as_deref().unwrap_or("?");
        match &self.section {
            Some(section) => write!(f, "Lot {lot} Sec {section} in {plan}"),
            None => write!(f, "Lot {lot} in {plan}"),
        }
    }
}

/// Lot and plan of a parcel found by a distance search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LotPlan {
    pub lot: String,
    pub plan: String,
}

impl fmt::Display for LotPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lot {} {}", self.lot, self.plan)
    }
}

/// Spatial reference reported by the cadastre service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpatialReference {
    pub wkid: Option<i64>,
    pub latest_wkid: Option<i64>,
}

/// Parcel boundary geometry.
///
/// Coordinates are DCDB/GIS cadastral data: indicative only, not survey
/// accurate, and the service may ignore the requested output projection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LotGeometry {
    /// Boundaries as `[easting, northing]` vertices.
    pub rings: Vec<Vec<[f64; 2]>>,
    /// Spatial reference claimed by the response, if any.
    pub spatial_reference: Option<SpatialReference>,
}

impl LotGeometry {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// First vertex of the first boundary.
    pub fn first_point(&self) -> Option<[f64; 2]> {
        self.rings.first()?.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressMatch, LotGeometry, ParcelHit};

    fn matched(house: Option<&str>, count: usize) -> AddressMatch {
        AddressMatch {
            lon: 151.26,
            lat: -33.91,
            matched_address: "24 EASTBOURNE AVENUE CLOVELLY".to_owned(),
            match_count: count,
            matched_house: house.map(str::to_owned),
        }
    }

    #[test]
    fn house_number_comparison_ignores_case_and_padding() {
        assert!(!matched(Some(" 12a "), 1).house_number_differs("12A"));
        assert!(matched(Some("22"), 1).house_number_differs("24"));
        assert!(!matched(None, 1).house_number_differs("24"));
    }

    #[test]
    fn fuzzy_when_several_candidates() {
        assert!(!matched(None, 1).is_fuzzy());
        assert!(matched(None, 3).is_fuzzy());
    }

    #[test]
    fn parcel_display_includes_section_only_when_present() {
        let with_section = ParcelHit {
            lot: Some("5".to_owned()),
            section: Some("3".to_owned()),
            plan: Some("DP758788".to_owned()),
        };
        let without = ParcelHit {
            section: None,
            ..with_section.clone()
        };
        assert_eq!(with_section.to_string(), "Lot 5 Sec 3 in DP758788");
        assert_eq!(without.to_string(), "Lot 5 in DP758788");
    }

    #[test]
    fn first_point_of_empty_geometry() {
        assert_eq!(LotGeometry::default().first_point(), None);
        let geometry = LotGeometry {
            rings: vec![vec![[338_000.5, 6_245_000.25], [338_010.0, 6_245_000.0]]],
            spatial_reference: None,
        };
        assert_eq!(geometry.first_point(), Some([338_000.5, 6_245_000.25]));
    }
}
