//! Projected CRS records, built by crossing every planetodetic CRS with a fixed catalog of
//! projection families.
//!
//! A family is declared once and applies to the five planetodetic variants. The code of a
//! projected CRS is the code of its base CRS plus an offset of `10 + 5 * family + tag`, which is
//! always below 100 and is unique for every (family, tag) pair, so the base CRS and the family can
//! be recovered from the code alone.
use crate::planetodetic::PlanetodeticRecord;
use crate::result::{Error, Result};
use crate::types::{CrsRef, Variant};
use planetcrs_derive::CatalogTable;

/// Number of parameter slots of a projection.
pub const PARAMETER_SLOTS: usize = 6;

const FIRST_OFFSET: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    pub name: &'static str,
    pub value: f64,
}

const fn p(name: &'static str, value: f64) -> Option<Parameter> {
    Some(Parameter { name, value })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionMethod {
    /// Name of the conversion, also used in the name of the projected CRS.
    pub name: &'static str,
    /// Name of the operation method, as known by the authority tables.
    pub method: &'static str,
    pub parameters: [Option<Parameter>; PARAMETER_SLOTS],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionFamily {
    pub general: ProjectionMethod,
    /// Replaces `general` for the sphere when the method has a spherical form.
    pub sphere: Option<ProjectionMethod>,
}

impl ProjectionFamily {
    pub fn method_for(&self, variant: Variant) -> &ProjectionMethod {
        match (variant, &self.sphere) {
            (Variant::SphereOcentric, Some(sphere)) => sphere,
            _ => &self.general,
        }
    }
}

const fn family(
    name: &'static str,
    method: &'static str,
    parameters: [Option<Parameter>; PARAMETER_SLOTS],
) -> ProjectionFamily {
    ProjectionFamily {
        general: ProjectionMethod {
            name,
            method,
            parameters,
        },
        sphere: None,
    }
}

const FE: Option<Parameter> = p("False easting", 0.0);
const FN: Option<Parameter> = p("False northing", 0.0);

pub const FAMILIES: [ProjectionFamily; 15] = [
    ProjectionFamily {
        general: ProjectionMethod {
            name: "Equirectangular, clon = 0",
            method: "Equidistant Cylindrical",
            parameters: [FE, FN, p("Longitude of natural origin", 0.0), p("Latitude of 1st standard parallel", 0.0), None, None],
        },
        sphere: Some(ProjectionMethod {
            name: "Equirectangular, clon = 0",
            method: "Equidistant Cylindrical (Spherical)",
            parameters: [FE, FN, p("Longitude of natural origin", 0.0), p("Latitude of 1st standard parallel", 0.0), None, None],
        }),
    },
    family(
        "Equirectangular, clon = 180",
        "Equidistant Cylindrical",
        [FE, FN, p("Longitude of natural origin", 180.0), p("Latitude of 1st standard parallel", 0.0), None, None],
    ),
    family(
        "Sinusoidal, clon = 0",
        "Sinusoidal",
        [FE, FN, p("Longitude of false origin", 0.0), None, None, None],
    ),
    family(
        "Sinusoidal, clon = 180",
        "Sinusoidal",
        [FE, FN, p("Longitude of false origin", 180.0), None, None, None],
    ),
    family(
        "North Polar, clon = 0",
        "Stereographic",
        [FE, FN, p("Longitude of natural origin", 0.0), p("Scale factor at natural origin", 1.0), p("Latitude of natural origin", 90.0), None],
    ),
    family(
        "South Polar, clon = 0",
        "Stereographic",
        [FE, FN, p("Longitude of natural origin", 0.0), p("Scale factor at natural origin", 1.0), p("Latitude of natural origin", -90.0), None],
    ),
    family(
        "Mollweide, clon = 0",
        "Mollweide",
        [FE, FN, p("Longitude of natural origin", 0.0), None, None, None],
    ),
    family(
        "Mollweide, clon = 180",
        "Mollweide",
        [FE, FN, p("Longitude of natural origin", 180.0), None, None, None],
    ),
    family(
        "Robinson, clon = 0",
        "Robinson",
        [FE, FN, p("Longitude of false origin", 0.0), None, None, None],
    ),
    family(
        "Robinson, clon = 180",
        "Robinson",
        [FE, FN, p("Longitude of false origin", 180.0), None, None, None],
    ),
    family(
        "Transverse Mercator",
        "Transverse Mercator",
        [FE, FN, p("Longitude of natural origin", 0.0), p("Scale factor at natural origin", 0.9996), p("Latitude of natural origin", 0.0), None],
    ),
    family(
        "Orthographic",
        "Orthographic",
        [FE, FN, p("Longitude of natural origin", 0.0), p("Latitude of natural origin", 90.0), None, None],
    ),
    family(
        "Lambert Conic Conformal",
        "Lambert Conic Conformal (2SP)",
        [
            p("Easting at false origin", 0.0),
            p("Northing at false origin", 0.0),
            p("Longitude of false origin", 0.0),
            p("Latitude of false origin", 0.0),
            p("Latitude of 1st standard parallel", -20.0),
            p("Latitude of 2nd standard parallel", 20.0),
        ],
    ),
    ProjectionFamily {
        general: ProjectionMethod {
            name: "Lambert Azimuthal Equal Area",
            method: "Lambert Azimuthal Equal Area",
            parameters: [FE, FN, p("Longitude of natural origin", 0.0), p("Latitude of natural origin", 90.0), None, None],
        },
        sphere: Some(ProjectionMethod {
            name: "Lambert Azimuthal Equal Area (Spherical)",
            method: "Lambert Azimuthal Equal Area (Spherical)",
            parameters: [FE, FN, p("Longitude of natural origin", 0.0), p("Latitude of natural origin", 0.0), None, None],
        }),
    },
    family(
        "Albers Equal Area",
        "Albers Equal Area",
        [
            p("Easting at false origin", 0.0),
            p("Northing at false origin", 0.0),
            p("Longitude of false origin", 0.0),
            p("Latitude of false origin", 40.0),
            p("Latitude of 1st standard parallel", 60.0),
            p("Latitude of 2nd standard parallel", 20.0),
        ],
    ),
];

/// Catalog entry used for a family and a planetodetic variant.
pub fn entry(family: usize, variant: Variant) -> Result<&'static ProjectionMethod> {
    FAMILIES
        .get(family)
        .map(|f| f.method_for(variant))
        .ok_or_else(|| Error::UnknownMethod(format!("family {}", family)))
}

pub fn projection_offset(family: usize, variant: Variant) -> i64 {
    FIRST_OFFSET + 5 * family as i64 + variant.tag()
}

/// What a catalog code stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeParts {
    pub body_id: i64,
    pub variant: Variant,
    /// `None` for a planetodetic code.
    pub family: Option<usize>,
}

impl CodeParts {
    pub fn base_code(&self) -> i64 {
        self.body_id * 100 + self.variant.tag()
    }
}

/// Recovers body, variant and projection family from any planetodetic or projected code.
pub fn decode(code: i64) -> Result<CodeParts> {
    let body_id = code.div_euclid(100);
    let rest = code.rem_euclid(100);
    if rest < FIRST_OFFSET {
        return Ok(CodeParts {
            body_id,
            variant: Variant::from_tag(rest)?,
            family: None,
        });
    }
    // offset - 10 = 5 * family + 2 * tag, and 3 is the inverse of 2 modulo 5
    let k = rest - FIRST_OFFSET;
    let tag = (3 * k).rem_euclid(5);
    let family = ((k - 2 * tag) / 5) as usize;
    if family >= FAMILIES.len() {
        return Err(Error::UnknownMethod(format!("code {}", code)));
    }
    Ok(CodeParts {
        body_id,
        variant: Variant::from_tag(tag)?,
        family: Some(family),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRecord {
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub name: String,
    pub base_crs: CrsRef,
    pub conversion: &'static str,
    pub method: &'static str,
    pub parameters: [Option<Parameter>; PARAMETER_SLOTS],
    pub family: usize,
    pub variant: Variant,
    pub body_id: i64,
}

/// Projects a planetodetic CRS with every family of the catalog.
pub fn expand(base: &PlanetodeticRecord) -> Vec<ProjectionRecord> {
    FAMILIES
        .iter()
        .enumerate()
        .map(|(family, f)| {
            let method = f.method_for(base.variant);
            ProjectionRecord {
                authority: base.authority.clone(),
                version: base.version,
                code: base.code + projection_offset(family, base.variant),
                name: format!("{} / {}", base.name, method.name),
                base_crs: base.crs_ref(),
                conversion: method.name,
                method: method.method,
                parameters: method.parameters,
                family,
                variant: base.variant,
                body_id: base.body_id,
            }
        })
        .collect()
}

/// Flat form of a projected record, as stored in the projection table.
#[derive(Debug, Clone, PartialEq, CatalogTable)]
#[table_name = "projection"]
pub struct ProjectionRow {
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub name: String,
    #[sql_type = "TEXT"]
    pub base_crs: CrsRef,
    pub method: String,
    pub parameter1_name: Option<String>,
    pub parameter1_value: Option<f64>,
    pub parameter2_name: Option<String>,
    pub parameter2_value: Option<f64>,
    pub parameter3_name: Option<String>,
    pub parameter3_value: Option<f64>,
    pub parameter4_name: Option<String>,
    pub parameter4_value: Option<f64>,
    pub parameter5_name: Option<String>,
    pub parameter5_value: Option<f64>,
    pub parameter6_name: Option<String>,
    pub parameter6_value: Option<f64>,
}

impl From<&ProjectionRecord> for ProjectionRow {
    fn from(record: &ProjectionRecord) -> Self {
        let slot = |i: usize| match record.parameters[i] {
            Some(param) if !param.value.is_nan() => (Some(param.name.to_owned()), Some(param.value)),
            _ => (None, None),
        };
        let (parameter1_name, parameter1_value) = slot(0);
        let (parameter2_name, parameter2_value) = slot(1);
        let (parameter3_name, parameter3_value) = slot(2);
        let (parameter4_name, parameter4_value) = slot(3);
        let (parameter5_name, parameter5_value) = slot(4);
        let (parameter6_name, parameter6_value) = slot(5);
        ProjectionRow {
            authority: record.authority.clone(),
            version: record.version,
            code: record.code,
            name: record.name.clone(),
            base_crs: record.base_crs.clone(),
            method: record.method.to_owned(),
            parameter1_name,
            parameter1_value,
            parameter2_name,
            parameter2_value,
            parameter3_name,
            parameter3_value,
            parameter4_name,
            parameter4_value,
            parameter5_name,
            parameter5_value,
            parameter6_name,
            parameter6_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CsType, LongitudeDirection};
    use std::collections::HashSet;

    fn base(body_id: i64, variant: Variant) -> PlanetodeticRecord {
        PlanetodeticRecord {
            authority: String::from("IAU"),
            version: 2015,
            code: body_id * 100 + variant.tag(),
            name: String::from("Mars (2015) / Ocentric"),
            datum: CrsRef::new("IAU", 2015, body_id * 100 + variant.shape().code_offset()),
            cs_type: CsType::Spherical,
            longitude_direction: LongitudeDirection::East,
            variant,
            body_id,
        }
    }

    #[test]
    fn every_planetodetic_gets_every_family() {
        let records = expand(&base(499, Variant::TriaxialOcentric));
        assert_eq!(records.len(), FAMILIES.len());
        assert_eq!(records[0].code, 49904 + 14);
        assert_eq!(records[0].name, "Mars (2015) / Ocentric / Equirectangular, clon = 0");
        assert_eq!(records[0].method, "Equidistant Cylindrical");
        assert_eq!(records[0].base_crs.to_string(), "IAU:2015:49904");
    }

    #[test]
    fn sphere_uses_spherical_methods() {
        let records = expand(&base(499, Variant::SphereOcentric));
        assert_eq!(records[0].method, "Equidistant Cylindrical (Spherical)");
        assert_eq!(records[1].method, "Equidistant Cylindrical");
        assert_eq!(records[13].method, "Lambert Azimuthal Equal Area (Spherical)");
        assert_eq!(records[13].parameters[3], p("Latitude of natural origin", 0.0));

        let ellipse = expand(&base(499, Variant::EllipseOcentric));
        assert_eq!(ellipse[13].method, "Lambert Azimuthal Equal Area");
        assert_eq!(ellipse[13].parameters[3], p("Latitude of natural origin", 90.0));
    }

    #[test]
    fn codes_are_unique_and_decodable() {
        let mut seen = HashSet::new();
        for variant in Variant::ALL {
            let planetodetic = base(499, variant);
            assert!(seen.insert(planetodetic.code));
            assert_eq!(
                decode(planetodetic.code).unwrap(),
                CodeParts { body_id: 499, variant, family: None }
            );
            for record in expand(&planetodetic) {
                assert!(seen.insert(record.code), "duplicate code {}", record.code);
                let parts = decode(record.code).unwrap();
                assert_eq!(parts.body_id, 499);
                assert_eq!(parts.variant, variant);
                assert_eq!(parts.family, Some(record.family));
                assert_eq!(parts.base_code(), planetodetic.code);
            }
        }
        assert!(seen.iter().all(|code| code / 100 == 499));
    }

    #[test]
    fn bad_codes() {
        assert!(matches!(decode(49907), Err(Error::UnsupportedDatum(_))));
        // 10 + 5 * 15 + 0 is past the last family
        assert!(matches!(decode(49985), Err(Error::UnknownMethod(_))));
        assert!(matches!(entry(15, Variant::SphereOcentric), Err(Error::UnknownMethod(_))));
    }

    #[test]
    fn flat_row_drops_absent_parameters() {
        let mut record = expand(&base(499, Variant::EllipseOgraphic)).remove(2);
        record.parameters[1] = p("False northing", f64::NAN);
        let row = ProjectionRow::from(&record);
        assert_eq!(row.method, "Sinusoidal");
        assert_eq!(row.parameter1_name.as_deref(), Some("False easting"));
        assert_eq!(row.parameter2_name, None);
        assert_eq!(row.parameter2_value, None);
        assert_eq!(row.parameter3_value, Some(0.0));
        assert_eq!(row.parameter4_name, None);
    }
}
