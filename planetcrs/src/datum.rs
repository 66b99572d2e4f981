use crate::body::Body;
use crate::ellipsoid::EllipsoidRecord;
use crate::result::{Error, Result};
use crate::types::{CrsRef, Shape};
use planetcrs_derive::CatalogTable;
use std::collections::HashMap;

/// A datum shares its code and name with its ellipsoid and adds the prime meridian of the body.
#[derive(Debug, Clone, PartialEq, CatalogTable)]
#[table_name = "datum"]
pub struct DatumRecord {
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub name: String,
    pub body: String,
    #[sql_type = "TEXT"]
    pub ellipsoid: CrsRef,
    pub prime_meridian_name: String,
    pub prime_meridian_value: f64,
    #[sql_type = "TEXT"]
    pub shape: Shape,
    pub body_id: i64,
}

impl DatumRecord {
    pub fn crs_ref(&self) -> CrsRef {
        CrsRef::new(&self.authority, self.version, self.code)
    }
}

pub fn build_datum(ellipsoid: &EllipsoidRecord, bodies: &HashMap<i64, &Body>) -> Result<DatumRecord> {
    let body = bodies
        .get(&ellipsoid.body_id)
        .ok_or_else(|| Error::MissingReference(format!("body {}", ellipsoid.body_id)))?;
    Ok(DatumRecord {
        authority: ellipsoid.authority.clone(),
        version: ellipsoid.version,
        code: ellipsoid.code,
        name: ellipsoid.name.clone(),
        body: body.name.clone(),
        ellipsoid: ellipsoid.crs_ref(),
        prime_meridian_name: body.prime_meridian.name.clone(),
        prime_meridian_value: body.prime_meridian.value,
        shape: ellipsoid.shape,
        body_id: body.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::tests::row;
    use crate::config::CatalogConfig;
    use crate::ellipsoid::classify;
    use std::convert::TryFrom;

    #[test]
    fn datum_follows_its_ellipsoid() {
        let mut r = row(499, "Mars", 3396190.0, -1.0, 3376200.0, 3389500.0);
        r.prime_meridian_name = Some(String::from("Airy-0"));
        r.prime_meridian_value = Some(String::from("0"));
        let mars = Body::try_from(r).unwrap();
        let bodies: HashMap<i64, &Body> = [(mars.id, &mars)].into_iter().collect();

        for ellipsoid in classify(&mars, &CatalogConfig::default()) {
            let datum = build_datum(&ellipsoid, &bodies).unwrap();
            assert_eq!(datum.code, ellipsoid.code);
            assert_eq!(datum.name, ellipsoid.name);
            assert_eq!(datum.ellipsoid.to_string(), format!("IAU:2015:{}", ellipsoid.code));
            assert_eq!(datum.body, "Mars");
            assert_eq!(datum.prime_meridian_name, "Airy-0");
        }
    }

    #[test]
    fn missing_body_is_reported() {
        let mars = Body::try_from(row(499, "Mars", 3396190.0, -1.0, 3376200.0, -1.0)).unwrap();
        let ellipsoids = classify(&mars, &CatalogConfig::default());
        let err = build_datum(&ellipsoids[0], &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));
    }
}
