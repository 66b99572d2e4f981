use crate::result::{Error, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

/// Reference from one catalog record to another, written as `AUTHORITY:VERSION:CODE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrsRef {
    pub authority: String,
    pub version: i64,
    pub code: i64,
}

impl CrsRef {
    pub fn new(authority: &str, version: i64, code: i64) -> Self {
        CrsRef {
            authority: authority.to_owned(),
            version,
            code,
        }
    }
}

impl fmt::Display for CrsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.authority, self.version, self.code)
    }
}

impl FromStr for CrsRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (authority, version, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(v), Some(c)) => (a, v, c),
            _ => return Err(Error::MissingReference(s.to_owned())),
        };
        let version = version
            .parse()
            .map_err(|_| Error::MissingReference(s.to_owned()))?;
        let code = code
            .parse()
            .map_err(|_| Error::MissingReference(s.to_owned()))?;
        Ok(CrsRef::new(authority, version, code))
    }
}

/// Shape category of a reference ellipsoid. The discriminant is the code offset of the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Sphere = 0,
    Ellipse = 1,
    Triaxial = 2,
}

impl Shape {
    pub fn code_offset(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Sphere => "SPHERE",
            Shape::Ellipse => "ELLIPSE",
            Shape::Triaxial => "TRIAXIAL",
        }
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SPHERE" => Ok(Shape::Sphere),
            "ELLIPSE" => Ok(Shape::Ellipse),
            "TRIAXIAL" => Ok(Shape::Triaxial),
            other => Err(Error::UnsupportedDatum(other.to_owned())),
        }
    }
}

/// The five planetodetic shape/convention combinations.
///
/// The tag is also the last digits of the planetodetic code:
/// * 0 : ocentric on a sphere
/// * 1 : ographic on an ellipse
/// * 2 : ocentric on an ellipse
/// * 3 : ographic on a triaxial ellipsoid
/// * 4 : ocentric on a triaxial ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    SphereOcentric = 0,
    EllipseOgraphic = 1,
    EllipseOcentric = 2,
    TriaxialOgraphic = 3,
    TriaxialOcentric = 4,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::SphereOcentric,
        Variant::EllipseOgraphic,
        Variant::EllipseOcentric,
        Variant::TriaxialOgraphic,
        Variant::TriaxialOcentric,
    ];

    pub fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Result<Variant> {
        Variant::ALL
            .iter()
            .copied()
            .find(|v| v.tag() == tag)
            .ok_or_else(|| Error::UnsupportedDatum(format!("tag {}", tag)))
    }

    pub fn ocentric(shape: Shape) -> Variant {
        match shape {
            Shape::Sphere => Variant::SphereOcentric,
            Shape::Ellipse => Variant::EllipseOcentric,
            Shape::Triaxial => Variant::TriaxialOcentric,
        }
    }

    /// A sphere has no ographic variant.
    pub fn ographic(shape: Shape) -> Option<Variant> {
        match shape {
            Shape::Sphere => None,
            Shape::Ellipse => Some(Variant::EllipseOgraphic),
            Shape::Triaxial => Some(Variant::TriaxialOgraphic),
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            Variant::SphereOcentric => Shape::Sphere,
            Variant::EllipseOgraphic | Variant::EllipseOcentric => Shape::Ellipse,
            Variant::TriaxialOgraphic | Variant::TriaxialOcentric => Shape::Triaxial,
        }
    }

    pub fn is_ocentric(self) -> bool {
        matches!(
            self,
            Variant::SphereOcentric | Variant::EllipseOcentric | Variant::TriaxialOcentric
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsType {
    Ellipsoidal,
    Spherical,
}

impl CsType {
    pub fn as_str(self) -> &'static str {
        match self {
            CsType::Ellipsoidal => "ellipsoidal",
            CsType::Spherical => "spherical",
        }
    }
}

impl FromStr for CsType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ellipsoidal" => Ok(CsType::Ellipsoidal),
            "spherical" => Ok(CsType::Spherical),
            other => Err(Error::UnsupportedDatum(format!("coordinate system {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongitudeDirection {
    East,
    West,
}

impl LongitudeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LongitudeDirection::East => "east",
            LongitudeDirection::West => "west",
        }
    }
}

impl fmt::Display for LongitudeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LongitudeDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "east" => Ok(LongitudeDirection::East),
            "west" => Ok(LongitudeDirection::West),
            other => Err(Error::UnsupportedDatum(format!("longitude direction {}", other))),
        }
    }
}

// all of the enums are stored as their text form, the variant as its tag
macro_rules! sql_text {
    ($t:ty) => {
        impl ToSql for $t {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $t {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

sql_text!(Shape);
sql_text!(CsType);
sql_text!(LongitudeDirection);

impl ToSql for CrsRef {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for CrsRef {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Variant {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.tag()))
    }
}

impl FromSql for Variant {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Variant::from_tag(value.as_i64()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
