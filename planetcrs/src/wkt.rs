//! WKT2 fragments.
//!
//! Each function returns one fragment of a CRS definition. The layout (indentation, spacing,
//! quoting) is the one expected by the downstream CRS parsers and must not change.
use crate::authority::{self, METRE};
use crate::body::PrimeMeridian;
use crate::projection::{Parameter, PARAMETER_SLOTS};
use crate::result::Result;
use crate::types::LongitudeDirection;

/// EPSG code of the degree unit written for biaxial bodies.
pub const DEGREE_BIAXIAL: i64 = 9122;
/// EPSG code of the degree unit written for triaxial bodies.
pub const DEGREE_TRIAXIAL: i64 = 9102;

/// Shape of the reference surface of a datum.
pub trait Figure {
    /// EPSG code of the degree unit used with this figure.
    const DEGREE_CODE: i64;

    fn ellipsoid(&self, name: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spheroid {
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

impl Figure for Spheroid {
    const DEGREE_CODE: i64 = DEGREE_BIAXIAL;

    fn ellipsoid(&self, name: &str) -> String {
        format!(
            "ELLIPSOID[{}, {}, {}, LENGTHUNIT[\"metre\", 1]]",
            quoted(name),
            number(self.semi_major_axis),
            number(self.inverse_flattening)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriaxialEllipsoid {
    pub semi_major_axis: f64,
    pub semi_median_axis: f64,
    pub semi_minor_axis: f64,
}

impl Figure for TriaxialEllipsoid {
    const DEGREE_CODE: i64 = DEGREE_TRIAXIAL;

    fn ellipsoid(&self, name: &str) -> String {
        format!(
            "TRIAXIAL[{}, {}, {}, {}, {}]",
            quoted(name),
            number(self.semi_major_axis),
            number(self.semi_median_axis),
            number(self.semi_minor_axis),
            METRE
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatumDef<F> {
    pub name: String,
    pub ellipsoid_name: String,
    pub figure: F,
    pub prime_meridian: PrimeMeridian,
}

/// Writes a number in its shortest decimal form, keeping a fractional part.
pub fn number(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') || !value.is_finite() {
        s
    } else {
        s + ".0"
    }
}

/// Quotes a WKT string, doubling embedded quotes.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn angle_unit(code: i64) -> String {
    format!(
        "ANGLEUNIT[\"degree\", 0.017453292519943295, ID[\"EPSG\", {}]]",
        code
    )
}

/// DATUM and PRIMEM. The ANCHOR is only written for a named prime meridian.
pub fn datum<F: Figure>(datum: &DatumDef<F>) -> String {
    let anchor = if datum.prime_meridian.is_reference() {
        String::new()
    } else {
        format!(
            ",\n            ANCHOR[{}]",
            quoted(&format!(
                "{}: {}",
                datum.prime_meridian.name,
                number(datum.prime_meridian.value)
            ))
        )
    };
    format!(
        "DATUM[{},\n            {}{}\n        ],\n        PRIMEM[\"Reference Meridian\", 0.0, {}]",
        quoted(&datum.name),
        datum.figure.ellipsoid(&datum.ellipsoid_name),
        anchor,
        angle_unit(F::DEGREE_CODE)
    )
}

/// Two axis latitude/longitude system of an ographic CRS.
pub fn ellipsoidal_cs(direction: LongitudeDirection, degree_code: i64) -> String {
    format!(
        "CS[ellipsoidal, 2],\n    \
         AXIS[\"Latitude (B)\", north, ORDER[1]],\n    \
         AXIS[\"Longitude (L)\", {}, ORDER[2]],\n    \
         {}",
        direction,
        angle_unit(degree_code)
    )
}

/// Three axis latitude/longitude/radius system of an ocentric CRS.
pub fn spherical_cs(direction: LongitudeDirection, degree_code: i64) -> String {
    let unit = angle_unit(degree_code);
    format!(
        "CS[spherical, 3],\n    \
         AXIS[\"Planetocentric latitude (U)\", north, ORDER[1], {unit}],\n    \
         AXIS[\"Planetocentric longitude (V)\", {direction}, ORDER[2], {unit}],\n    \
         AXIS[\"Radius (R)\", up, ORDER[3], {metre}]",
        unit = unit,
        direction = direction,
        metre = METRE
    )
}

/// Easting or westing, and northing, of a projected CRS.
pub fn cartesian_cs(direction: LongitudeDirection) -> String {
    let axis = match direction {
        LongitudeDirection::East => "Easting (E)",
        LongitudeDirection::West => "Westing (W)",
    };
    format!(
        "CS[Cartesian, 2],\n    \
         AXIS[\"{}\", {}, ORDER[1]],\n    \
         AXIS[\"Northing (N)\", north, ORDER[2]],\n    \
         {}",
        axis, direction, METRE
    )
}

/// ID clause appended to METHOD, empty when the method has no authority code.
pub fn method_id(method: &str) -> String {
    match authority::method_id(method) {
        Some(id) => format!(",ID[\"{}\",{}]", id.authority, id.code),
        None => String::new(),
    }
}

/// A PARAMETER, or `None` for an absent (NaN) value.
pub fn parameter(param: &Parameter) -> Result<Option<String>> {
    if param.value.is_nan() {
        return Ok(None);
    }
    let id = authority::parameter_id(param.name)?;
    Ok(Some(format!(
        "PARAMETER[{}, {}, {}, ID[\"{}\", {}]]",
        quoted(param.name),
        number(param.value),
        id.unit,
        id.id.authority,
        id.id.code
    )))
}

/// The parameters in slot order, one per line.
pub fn parameters(params: &[Option<Parameter>; PARAMETER_SLOTS]) -> Result<String> {
    let mut out = Vec::with_capacity(PARAMETER_SLOTS);
    for param in params.iter().flatten() {
        if let Some(p) = parameter(param)? {
            out.push(p);
        }
    }
    Ok(out.join(",\n        "))
}

pub struct GeodeticParts<'a> {
    pub name: &'a str,
    pub datum: String,
    pub cs: String,
    pub authority: &'a str,
    pub code: i64,
    pub version: i64,
    pub remark: &'a str,
}

pub fn geodetic_crs(parts: &GeodeticParts) -> String {
    format!(
        "GEODCRS[{},\n    {},\n    {},\n    ID[{}, {}, {}], REMARK[{}]\n]\n",
        quoted(parts.name),
        parts.datum,
        parts.cs,
        quoted(parts.authority),
        parts.code,
        parts.version,
        quoted(parts.remark)
    )
}

pub struct ProjectedParts<'a> {
    pub name: &'a str,
    pub base_keyword: &'a str,
    pub base_name: &'a str,
    pub datum: String,
    pub conversion_name: &'a str,
    pub method_name: &'a str,
    pub method_id: String,
    pub parameters: String,
    pub cs: String,
    pub authority: &'a str,
    pub code: i64,
    pub version: i64,
}

pub fn projected_crs(parts: &ProjectedParts) -> String {
    format!(
        "PROJCRS[{},\n    {}[{},\n        {}\n    ],\n    \
         CONVERSION[{},\n        METHOD[{}{}],\n        {}\n    ],\n    \
         {},\n    ID[{}, {}, {}]\n]\n",
        quoted(parts.name),
        parts.base_keyword,
        quoted(parts.base_name),
        parts.datum,
        quoted(parts.conversion_name),
        quoted(parts.method_name),
        parts.method_id,
        parts.parameters,
        parts.cs,
        quoted(parts.authority),
        parts.code,
        parts.version
    )
}
