//! Reference ellipsoids derived from the body radii.
//!
//! Each body gets up to two shapes:
//! * a sphere, always, for interoperability with tools that only handle spheres. A triaxial body
//!   uses its mean radius, any other body its semi-major axis.
//! * an ellipse when the body is biaxial, or a triaxial ellipsoid when the three axes differ.
//!   A median axis that differs from equal major and minor axes fits neither, so only the sphere
//!   is kept.
use crate::body::Body;
use crate::config::CatalogConfig;
use crate::types::{CrsRef, Shape};
use log::warn;
use planetcrs_derive::CatalogTable;

const MEAN_RADIUS_REMARK: &str = "Use R_m = (a+b+c)/3 as mean radius. ";
const MEAN_SPHERE_REMARK: &str = "Use mean radius as sphere radius for interoperability. ";
const SEMI_MAJOR_SPHERE_REMARK: &str = "Use semi-major radius as sphere for interoperability. ";

#[derive(Debug, Clone, PartialEq, CatalogTable)]
#[table_name = "ellipsoid"]
pub struct EllipsoidRecord {
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub name: String,
    pub semi_major_axis: f64,
    /// Only set for a triaxial ellipsoid.
    pub semi_median_axis: Option<f64>,
    pub semi_minor_axis: f64,
    /// Not defined for a triaxial ellipsoid.
    pub inverse_flattening: Option<f64>,
    pub remark: String,
    #[sql_type = "TEXT"]
    pub shape: Shape,
    pub body_id: i64,
}

impl EllipsoidRecord {
    pub fn crs_ref(&self) -> CrsRef {
        CrsRef::new(&self.authority, self.version, self.code)
    }
}

pub fn ellipsoid_code(body_id: i64, shape: Shape) -> i64 {
    body_id * 100 + shape.code_offset()
}

/// a / (a - c), or 0 for a sphere.
pub fn inverse_flattening(semi_major_axis: f64, semi_minor_axis: f64) -> f64 {
    if semi_major_axis == semi_minor_axis {
        0.0
    } else {
        semi_major_axis / (semi_major_axis - semi_minor_axis)
    }
}

/// Returns the ellipsoid records of a body, sorted by code.
pub fn classify(body: &Body, config: &CatalogConfig) -> Vec<EllipsoidRecord> {
    let base_name = format!("{} ({})", body.name, config.version);
    let record = |shape: Shape, name: String, axes: (f64, Option<f64>, f64), flattening, remark: String| {
        EllipsoidRecord {
            authority: config.authority.clone(),
            version: config.version,
            code: ellipsoid_code(body.id, shape),
            name,
            semi_major_axis: axes.0,
            semi_median_axis: axes.1,
            semi_minor_axis: axes.2,
            inverse_flattening: flattening,
            remark: remark + &config.citation,
            shape,
            body_id: body.id,
        }
    };

    let (a, c) = (body.semi_major_axis, body.semi_minor_axis);
    let triaxial = body.is_triaxial();
    let mut records = Vec::with_capacity(2);

    let (radius, remark) = if triaxial {
        let (mean, remark) = match body.mean_radius {
            Some(mean) => (mean, String::new()),
            None => {
                let b = body.semi_median_axis.unwrap_or(a);
                ((a + b + c) / 3.0, String::from(MEAN_RADIUS_REMARK))
            }
        };
        (mean, remark + MEAN_SPHERE_REMARK)
    } else if a == c {
        (a, String::new())
    } else {
        (a, String::from(SEMI_MAJOR_SPHERE_REMARK))
    };
    records.push(record(
        Shape::Sphere,
        format!("{} - Sphere", base_name),
        (radius, None, radius),
        Some(0.0),
        remark,
    ));

    if triaxial {
        records.push(record(
            Shape::Triaxial,
            base_name,
            (a, body.semi_median_axis, c),
            None,
            String::new(),
        ));
    } else if body.semi_median_axis.map_or(true, |b| b == a || b == c) {
        records.push(record(
            Shape::Ellipse,
            base_name,
            (a, None, c),
            Some(inverse_flattening(a, c)),
            String::new(),
        ));
    } else {
        warn!(
            "body {}: median axis differs from equal major and minor axes, only the sphere is kept",
            body.id
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::tests::row;
    use std::convert::TryFrom;

    fn body(a: f64, b: f64, c: f64, mean: f64) -> Body {
        Body::try_from(row(499, "Mars", a, b, c, mean)).unwrap()
    }

    #[test]
    fn biaxial_body_gets_sphere_and_ellipse() {
        let records = classify(&body(3396190.0, -1.0, 3376200.0, 3389500.0), &CatalogConfig::default());
        assert_eq!(records.len(), 2);

        let sphere = &records[0];
        assert_eq!(sphere.code, 49900);
        assert_eq!(sphere.name, "Mars (2015) - Sphere");
        assert_eq!(sphere.shape, Shape::Sphere);
        assert_eq!(sphere.semi_major_axis, 3396190.0);
        assert_eq!(sphere.semi_minor_axis, 3396190.0);
        assert_eq!(sphere.inverse_flattening, Some(0.0));
        assert!(sphere.remark.starts_with(SEMI_MAJOR_SPHERE_REMARK));

        let ellipse = &records[1];
        assert_eq!(ellipse.code, 49901);
        assert_eq!(ellipse.name, "Mars (2015)");
        assert_eq!(ellipse.semi_median_axis, None);
        let expected = 3396190.0 / (3396190.0 - 3376200.0);
        assert!((ellipse.inverse_flattening.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn triaxial_body_gets_sphere_and_triaxial_only() {
        let records = classify(&body(17000.0, 5500.0, 5300.0, 8450.0), &CatalogConfig::default());
        let shapes: Vec<Shape> = records.iter().map(|r| r.shape).collect();
        assert_eq!(shapes, vec![Shape::Sphere, Shape::Triaxial]);

        let sphere = &records[0];
        assert_eq!(sphere.semi_major_axis, 8450.0);
        assert_eq!(sphere.semi_minor_axis, 8450.0);
        assert!(sphere.remark.starts_with(MEAN_SPHERE_REMARK));

        let triaxial = &records[1];
        assert_eq!(triaxial.code, 49902);
        assert_eq!(triaxial.semi_median_axis, Some(5500.0));
        assert_eq!(triaxial.inverse_flattening, None);
    }

    #[test]
    fn missing_mean_radius_is_computed() {
        let records = classify(&body(300.0, 200.0, 100.0, -1.0), &CatalogConfig::default());
        assert_eq!(records[0].semi_major_axis, 200.0);
        assert!(records[0]
            .remark
            .starts_with("Use R_m = (a+b+c)/3 as mean radius. Use mean radius"));
    }

    #[test]
    fn median_equal_to_an_axis_is_an_ellipse() {
        let records = classify(&body(300.0, 300.0, 100.0, -1.0), &CatalogConfig::default());
        assert_eq!(records[1].shape, Shape::Ellipse);
        assert_eq!(records[1].inverse_flattening, Some(1.5));
    }

    #[test]
    fn odd_median_axis_keeps_only_the_sphere() {
        let records = classify(&body(300.0, 200.0, 300.0, -1.0), &CatalogConfig::default());
        let shapes: Vec<Shape> = records.iter().map(|r| r.shape).collect();
        assert_eq!(shapes, vec![Shape::Sphere]);
        assert_eq!(records[0].semi_major_axis, 300.0);
    }

    #[test]
    fn true_sphere_has_no_approximation_remark() {
        let config = CatalogConfig::default();
        let records = classify(&body(1737400.0, -1.0, 1737400.0, 1737400.0), &config);
        assert_eq!(records[0].remark, config.citation);
        assert_eq!(records[1].inverse_flattening, Some(0.0));
    }

    #[test]
    fn remarks_end_with_citation() {
        let config = CatalogConfig::default();
        for b in [body(300.0, 200.0, 100.0, -1.0), body(300.0, -1.0, 100.0, -1.0)] {
            for record in classify(&b, &config) {
                assert!(record.remark.ends_with(&config.citation));
            }
        }
    }
}
