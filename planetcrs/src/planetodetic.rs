//! Unprojected CRS records: an ocentric one for every datum, an ographic one when the rotation of
//! the body is known.
use crate::body::{Body, Rotation};
use crate::config::CatalogConfig;
use crate::datum::DatumRecord;
use crate::types::{CrsRef, CsType, LongitudeDirection, Variant};
use planetcrs_derive::CatalogTable;

#[derive(Debug, Clone, PartialEq, CatalogTable)]
#[table_name = "planetodetic"]
pub struct PlanetodeticRecord {
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub name: String,
    #[sql_type = "TEXT"]
    pub datum: CrsRef,
    #[sql_type = "TEXT"]
    pub cs_type: CsType,
    #[sql_type = "TEXT"]
    pub longitude_direction: LongitudeDirection,
    #[sql_type = "INTEGER"]
    pub variant: Variant,
    pub body_id: i64,
}

impl PlanetodeticRecord {
    pub fn crs_ref(&self) -> CrsRef {
        CrsRef::new(&self.authority, self.version, self.code)
    }
}

pub fn planetodetic_code(body_id: i64, variant: Variant) -> i64 {
    body_id * 100 + variant.tag()
}

/// Splits a planetodetic code into its body id and variant.
pub fn decode_planetodetic(code: i64) -> crate::Result<(i64, Variant)> {
    Ok((code.div_euclid(100), Variant::from_tag(code.rem_euclid(100))?))
}

/// Direction of positive longitudes in the ographic CRS of a body.
///
/// Direct rotation gives west longitudes and retrograde rotation east ones, except for the bodies
/// that are east for historical reasons (Sun, Moon and Earth by default).
/// Returns `None` when the rotation is unknown.
pub fn ographic_longitude(body: &Body, config: &CatalogConfig) -> Option<LongitudeDirection> {
    let rotation = body.rotation?;
    if config.is_east_longitude_body(&body.name) {
        return Some(LongitudeDirection::East);
    }
    Some(match rotation {
        Rotation::Direct => LongitudeDirection::West,
        Rotation::Retrograde => LongitudeDirection::East,
    })
}

/// Returns the planetodetic records of a datum, ocentric first.
pub fn assign(datum: &DatumRecord, body: &Body, config: &CatalogConfig) -> Vec<PlanetodeticRecord> {
    let record = |variant: Variant, cs_type, longitude_direction, suffix: &str| PlanetodeticRecord {
        authority: datum.authority.clone(),
        version: datum.version,
        code: planetodetic_code(body.id, variant),
        name: format!("{} / {}", datum.name, suffix),
        datum: datum.crs_ref(),
        cs_type,
        longitude_direction,
        variant,
        body_id: body.id,
    };

    let mut records = vec![record(
        Variant::ocentric(datum.shape),
        CsType::Spherical,
        LongitudeDirection::East,
        "Ocentric",
    )];

    if config.is_ocentric_only_body(&body.name) {
        return records;
    }
    if let (Some(variant), Some(direction)) = (
        Variant::ographic(datum.shape),
        ographic_longitude(body, config),
    ) {
        records.push(record(variant, CsType::Ellipsoidal, direction, "Ographic"));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::tests::row;
    use crate::datum::build_datum;
    use crate::ellipsoid::classify;
    use crate::result::Error;
    use crate::types::Shape;
    use std::collections::HashMap;
    use std::convert::TryFrom;

    fn records_for(body: &Body) -> Vec<PlanetodeticRecord> {
        let config = CatalogConfig::default();
        let bodies: HashMap<i64, &Body> = [(body.id, body)].into_iter().collect();
        classify(body, &config)
            .iter()
            .map(|e| build_datum(e, &bodies).unwrap())
            .flat_map(|d| assign(&d, body, &config))
            .collect()
    }

    fn body(id: i64, name: &str, rotation: Option<Rotation>, triaxial: bool) -> Body {
        let mut r = if triaxial {
            row(id, name, 300.0, 200.0, 100.0, -1.0)
        } else {
            row(id, name, 300.0, -1.0, 290.0, -1.0)
        };
        r.rotation = rotation.map(|r| r.as_str().to_owned());
        Body::try_from(r).unwrap()
    }

    #[test]
    fn direct_rotation_gives_west_ographic() {
        let records = records_for(&body(499, "Mars", Some(Rotation::Direct), false));
        let codes: Vec<i64> = records.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![49900, 49902, 49901]);

        let ographic = records.iter().find(|r| r.code == 49901).unwrap();
        assert_eq!(ographic.name, "Mars (2015) / Ographic");
        assert_eq!(ographic.cs_type, CsType::Ellipsoidal);
        assert_eq!(ographic.longitude_direction, LongitudeDirection::West);
        assert_eq!(ographic.datum.to_string(), "IAU:2015:49901");

        for ocentric in records.iter().filter(|r| r.variant.is_ocentric()) {
            assert_eq!(ocentric.longitude_direction, LongitudeDirection::East);
            assert_eq!(ocentric.cs_type, CsType::Spherical);
            assert!(ocentric.name.ends_with(" / Ocentric"));
        }
    }

    #[test]
    fn retrograde_rotation_gives_east_ographic() {
        let records = records_for(&body(299, "Venus", Some(Rotation::Retrograde), false));
        let ographic = records.iter().find(|r| !r.variant.is_ocentric()).unwrap();
        assert_eq!(ographic.longitude_direction, LongitudeDirection::East);
    }

    #[test]
    fn earth_is_always_east() {
        for rotation in [Rotation::Direct, Rotation::Retrograde] {
            let records = records_for(&body(399, "Earth", Some(rotation), false));
            let ographic = records.iter().find(|r| r.code == 39901).unwrap();
            assert_eq!(ographic.longitude_direction, LongitudeDirection::East);
        }
    }

    #[test]
    fn sun_and_moon_have_no_ographic() {
        for (id, name) in [(10, "Sun"), (301, "Moon")] {
            let records = records_for(&body(id, name, Some(Rotation::Direct), false));
            assert!(records.iter().all(|r| r.variant.is_ocentric()));
            assert_eq!(records.len(), 2);
        }
    }

    #[test]
    fn unknown_rotation_has_no_ographic() {
        let records = records_for(&body(2000021, "Lutetia", None, true));
        let variants: Vec<Variant> = records.iter().map(|r| r.variant).collect();
        assert_eq!(variants, vec![Variant::SphereOcentric, Variant::TriaxialOcentric]);
    }

    #[test]
    fn triaxial_codes() {
        let records = records_for(&body(2000433, "Eros", Some(Rotation::Direct), true));
        let codes: Vec<i64> = records.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![200043300, 200043304, 200043303]);
        assert_eq!(records[1].variant.shape(), Shape::Triaxial);
    }

    #[test]
    fn codes_decode_to_body_and_variant() {
        for record in records_for(&body(499, "Mars", Some(Rotation::Direct), true)) {
            assert_eq!(decode_planetodetic(record.code).unwrap(), (499, record.variant));
        }
        assert!(matches!(decode_planetodetic(49907), Err(Error::UnsupportedDatum(_))));
    }
}
