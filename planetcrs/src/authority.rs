//! Authority codes of the projection methods and parameters.
//!
//! Built from the EPSG registry, the GeoTIFF projection list and OGC 19-008r4.
use crate::result::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const DEGREE: &str = "ANGLEUNIT[\"degree\", 0.017453292519943295, ID[\"EPSG\", 9102]]";
pub const METRE: &str = "LENGTHUNIT[\"metre\", 1, ID[\"EPSG\", 9001]]";
pub const UNITY: &str = "SCALEUNIT[\"unity\",1.0, ID[\"EPSG\", 9201]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityId {
    pub authority: &'static str,
    pub code: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterId {
    pub id: AuthorityId,
    pub unit: &'static str,
}

const fn epsg(code: i64) -> AuthorityId {
    AuthorityId {
        authority: "EPSG",
        code,
    }
}

lazy_static! {
    static ref METHODS: HashMap<&'static str, AuthorityId> = {
        let mut m = HashMap::new();
        m.insert("Lambert Azimuthal Equal Area (Spherical)", epsg(1027));
        m.insert("Equidistant Cylindrical", epsg(1028));
        m.insert("Equidistant Cylindrical (Spherical)", epsg(1029));
        m.insert("Sinusoidal", AuthorityId { authority: "GeoTIFF", code: 24 });
        m.insert("Robinson", AuthorityId { authority: "GeoTIFF", code: 23 });
        m.insert("Transverse Mercator", epsg(9807));
        m.insert("Lambert Conic Conformal (2SP)", epsg(9802));
        m.insert("Stereographic", epsg(9810));
        m.insert("Lambert Azimuthal Equal Area", epsg(9820));
        m.insert("Albers Equal Area", epsg(9822));
        m.insert("Orthographic", epsg(9840));
        m
    };
    static ref PARAMETERS: HashMap<&'static str, ParameterId> = {
        let mut m = HashMap::new();
        let mut add = |name: &'static str, code: i64, unit: &'static str| {
            m.insert(name, ParameterId { id: epsg(code), unit });
        };
        add("Latitude of natural origin", 8801, DEGREE);
        add("Longitude of natural origin", 8802, DEGREE);
        add("Scale factor at natural origin", 8805, UNITY);
        add("False easting", 8806, METRE);
        add("False northing", 8807, METRE);
        add("Latitude of false origin", 8821, DEGREE);
        add("Longitude of false origin", 8822, DEGREE);
        add("Latitude of 1st standard parallel", 8823, DEGREE);
        add("Latitude of 2nd standard parallel", 8824, DEGREE);
        add("Easting at false origin", 8826, METRE);
        add("Northing at false origin", 8827, METRE);
        m
    };
}

/// Authority id of a projection method. Methods without one (Mollweide) are written without ID.
pub fn method_id(method: &str) -> Option<AuthorityId> {
    METHODS.get(method).copied()
}

/// Authority id and unit of a projection parameter.
///
/// Every parameter of the projection catalog must be present here.
pub fn parameter_id(name: &str) -> Result<ParameterId> {
    PARAMETERS
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnknownParameter(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::FAMILIES;

    #[test]
    fn catalog_parameters_are_known() {
        for family in FAMILIES.iter() {
            for method in std::iter::once(&family.general).chain(family.sphere.iter()) {
                for param in method.parameters.iter().flatten() {
                    assert!(parameter_id(param.name).is_ok(), "{} unknown", param.name);
                }
            }
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(method_id("Stereographic"), Some(epsg(9810)));
        assert_eq!(method_id("Mollweide"), None);
        assert_eq!(parameter_id("False easting").unwrap().unit, METRE);
        assert!(matches!(
            parameter_id("Azimuth of initial line"),
            Err(Error::UnknownParameter(_))
        ));
    }
}
