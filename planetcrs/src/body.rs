//! Raw IAU body table rows and their validation.
use crate::result::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::convert::TryFrom;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Value used by the IAU table for a radius that is not known.
pub const ABSENT: f64 = -1.0;

/// Name of the prime meridian used when a body has none, no ANCHOR is written for it.
pub const REFERENCE_MERIDIAN: &str = "Reference Meridian";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Direct,
    Retrograde,
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::Direct => "Direct",
            Rotation::Retrograde => "Retrograde",
        }
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Direct" => Ok(Rotation::Direct),
            "Retrograde" => Ok(Rotation::Retrograde),
            other => Err(format!("unknown rotation \"{}\"", other)),
        }
    }
}

/// One row of the IAU body table, as it appears in the source CSV.
///
/// Only the id is typed at read time. The other columns are kept as text and parsed by
/// `Body::try_from`, so a malformed value is reported against its body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyRow {
    #[serde(rename = "Naif_id")]
    pub id: i64,
    #[serde(rename = "Body")]
    pub name: String,
    #[serde(rename = "IAU2015_Semimajor")]
    pub semi_major_axis: String,
    #[serde(rename = "IAU2015_Axisb")]
    pub semi_median_axis: String,
    #[serde(rename = "IAU2015_Semiminor")]
    pub semi_minor_axis: String,
    #[serde(rename = "IAU2015_Mean")]
    pub mean_radius: String,
    pub rotation: Option<String>,
    #[serde(rename = "origin_long_name")]
    pub prime_meridian_name: Option<String>,
    #[serde(rename = "origin_lon_pos")]
    pub prime_meridian_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimeMeridian {
    pub name: String,
    pub value: f64,
}

impl PrimeMeridian {
    pub fn reference() -> Self {
        PrimeMeridian {
            name: String::from(REFERENCE_MERIDIAN),
            value: 0.0,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.name == REFERENCE_MERIDIAN
    }
}

/// A validated body, radii in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: i64,
    pub name: String,
    pub semi_major_axis: f64,
    pub semi_median_axis: Option<f64>,
    pub semi_minor_axis: f64,
    pub mean_radius: Option<f64>,
    pub rotation: Option<Rotation>,
    pub prime_meridian: PrimeMeridian,
}

impl Body {
    /// True when the three semi-axes are known and pairwise distinct.
    pub fn is_triaxial(&self) -> bool {
        match self.semi_median_axis {
            Some(b) => {
                let (a, c) = (self.semi_major_axis, self.semi_minor_axis);
                a != b && b != c && a != c
            }
            None => false,
        }
    }
}

/// Largest code offset a body id is multiplied into.
const MAX_CODE_OFFSET: i64 = 99;

fn check_id(body_id: i64) -> Result<()> {
    match body_id
        .checked_mul(100)
        .and_then(|code| code.checked_add(MAX_CODE_OFFSET))
    {
        Some(_) => Ok(()),
        None => Err(Error::DataIntegrity {
            body_id,
            reason: String::from("id is too large to derive CRS codes from"),
        }),
    }
}

fn number(body_id: i64, field: &str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| Error::DataIntegrity {
        body_id,
        reason: format!("{} \"{}\" is not a number", field, raw),
    })
}

fn required(body_id: i64, field: &str, raw: &str) -> Result<f64> {
    let value = number(body_id, field, raw)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::DataIntegrity {
            body_id,
            reason: format!("{} must be a positive length, got {}", field, value),
        })
    }
}

fn optional(body_id: i64, field: &str, raw: &str) -> Result<Option<f64>> {
    if number(body_id, field, raw)? == ABSENT {
        Ok(None)
    } else {
        required(body_id, field, raw).map(Some)
    }
}

impl TryFrom<BodyRow> for Body {
    type Error = Error;

    fn try_from(row: BodyRow) -> Result<Self> {
        check_id(row.id)?;
        let semi_major_axis = required(row.id, "semi-major axis", &row.semi_major_axis)?;
        let semi_median_axis = optional(row.id, "median axis", &row.semi_median_axis)?;
        let semi_minor_axis = required(row.id, "semi-minor axis", &row.semi_minor_axis)?;
        let mean_radius = optional(row.id, "mean radius", &row.mean_radius)?;
        let prime_meridian_value = match row.prime_meridian_value.as_deref() {
            Some(raw) => {
                let value = number(row.id, "prime meridian longitude", raw)?;
                if !value.is_finite() {
                    return Err(Error::DataIntegrity {
                        body_id: row.id,
                        reason: format!("prime meridian longitude {} is not finite", value),
                    });
                }
                Some(value)
            }
            None => None,
        };
        let rotation = row
            .rotation
            .as_deref()
            .map(|raw| {
                raw.parse::<Rotation>().map_err(|reason| Error::DataIntegrity {
                    body_id: row.id,
                    reason,
                })
            })
            .transpose()?;

        // without a rotation sense there is no usable prime meridian definition
        let prime_meridian = match rotation {
            None => PrimeMeridian::reference(),
            Some(_) => PrimeMeridian {
                name: row
                    .prime_meridian_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| String::from(REFERENCE_MERIDIAN)),
                value: prime_meridian_value.unwrap_or(0.0),
            },
        };

        Ok(Body {
            id: row.id,
            name: row.name,
            semi_major_axis,
            semi_median_axis,
            semi_minor_axis,
            mean_radius,
            rotation,
            prime_meridian,
        })
    }
}

/// Reads the IAU body table from CSV.
///
/// A record whose id cannot be read is logged and skipped, any other CSV error is returned.
/// Malformed values in the other columns are left to `Body::try_from`.
pub fn read_bodies<R: Read>(reader: R) -> Result<Vec<BodyRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.deserialize::<BodyRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => match err.kind() {
                csv::ErrorKind::Deserialize { .. } => {
                    warn!("skipping body record without a usable id: {}", err);
                }
                _ => return Err(err.into()),
            },
        }
    }
    debug!("read {} body rows", rows.len());
    Ok(rows)
}

pub fn read_bodies_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BodyRow>> {
    let file = std::fs::File::open(path)?;
    read_bodies(file)
}
