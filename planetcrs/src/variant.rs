//! Renderable CRS variants.
//!
//! A catalog entry is one of eight variants: ocentric or ographic, biaxial or triaxial,
//! unprojected or projected. [`CrsVariant::create`] picks the variant from the joined catalog
//! records and [`WktCrs`] renders it.
use crate::body::PrimeMeridian;
use crate::datum::DatumRecord;
use crate::ellipsoid::EllipsoidRecord;
use crate::planetodetic::PlanetodeticRecord;
use crate::projection::{Parameter, ProjectionRecord, PARAMETER_SLOTS};
use crate::result::{Error, Result};
use crate::types::{LongitudeDirection, Shape, Variant};
use crate::wkt::{self, DatumDef, Figure, GeodeticParts, ProjectedParts, Spheroid, TriaxialEllipsoid};
use std::convert::TryFrom;

impl TryFrom<&EllipsoidRecord> for Spheroid {
    type Error = Error;

    fn try_from(record: &EllipsoidRecord) -> Result<Self> {
        match (record.shape, record.inverse_flattening) {
            (Shape::Sphere | Shape::Ellipse, Some(inverse_flattening)) => Ok(Spheroid {
                semi_major_axis: record.semi_major_axis,
                inverse_flattening,
            }),
            _ => Err(Error::UnsupportedDatum(format!(
                "{} is not a biaxial ellipsoid",
                record.crs_ref()
            ))),
        }
    }
}

impl TryFrom<&EllipsoidRecord> for TriaxialEllipsoid {
    type Error = Error;

    fn try_from(record: &EllipsoidRecord) -> Result<Self> {
        match (record.shape, record.semi_median_axis) {
            (Shape::Triaxial, Some(semi_median_axis)) => Ok(TriaxialEllipsoid {
                semi_major_axis: record.semi_major_axis,
                semi_median_axis,
                semi_minor_axis: record.semi_minor_axis,
            }),
            _ => Err(Error::UnsupportedDatum(format!(
                "{} is not a triaxial ellipsoid",
                record.crs_ref()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticCrs<F> {
    pub name: String,
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub remark: String,
    pub longitude_direction: LongitudeDirection,
    pub datum: DatumDef<F>,
}

impl<F: Figure> GeodeticCrs<F> {
    fn new(def: &CrsDefinition, figure: F) -> Self {
        GeodeticCrs {
            name: def.planetodetic.name.clone(),
            authority: def.planetodetic.authority.clone(),
            version: def.planetodetic.version,
            code: def.planetodetic.code,
            remark: def.ellipsoid.remark.clone(),
            longitude_direction: def.planetodetic.longitude_direction,
            datum: DatumDef {
                name: def.datum.name.clone(),
                ellipsoid_name: def.ellipsoid.name.clone(),
                figure,
                prime_meridian: PrimeMeridian {
                    name: def.datum.prime_meridian_name.clone(),
                    value: def.datum.prime_meridian_value,
                },
            },
        }
    }

    pub fn datum_wkt(&self) -> String {
        wkt::datum(&self.datum)
    }

    fn ocentric_cs(&self) -> Result<String> {
        require_east(self.code, self.longitude_direction)?;
        Ok(wkt::spherical_cs(self.longitude_direction, F::DEGREE_CODE))
    }

    fn ographic_cs(&self) -> String {
        wkt::ellipsoidal_cs(self.longitude_direction, F::DEGREE_CODE)
    }

    fn render(&self, cs: String) -> String {
        wkt::geodetic_crs(&GeodeticParts {
            name: &self.name,
            datum: self.datum_wkt(),
            cs,
            authority: &self.authority,
            code: self.code,
            version: self.version,
            remark: &self.remark,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCrs<F> {
    pub name: String,
    pub authority: String,
    pub version: i64,
    pub code: i64,
    pub conversion: String,
    pub method: String,
    pub parameters: [Option<Parameter>; PARAMETER_SLOTS],
    pub base: GeodeticCrs<F>,
}

impl<F: Figure> ProjectedCrs<F> {
    fn new(def: &CrsDefinition, projection: &ProjectionRecord, figure: F) -> Self {
        ProjectedCrs {
            name: projection.name.clone(),
            authority: projection.authority.clone(),
            version: projection.version,
            code: projection.code,
            conversion: projection.conversion.to_owned(),
            method: projection.method.to_owned(),
            parameters: projection.parameters,
            base: GeodeticCrs::new(def, figure),
        }
    }

    fn cs(&self, ocentric: bool) -> Result<String> {
        let direction = self.base.longitude_direction;
        if ocentric {
            require_east(self.code, direction)?;
        }
        Ok(wkt::cartesian_cs(direction))
    }

    fn render(&self, base_keyword: &str, cs: String) -> Result<String> {
        Ok(wkt::projected_crs(&ProjectedParts {
            name: &self.name,
            base_keyword,
            base_name: &self.base.name,
            datum: self.base.datum_wkt(),
            conversion_name: &self.conversion,
            method_name: &self.method,
            method_id: wkt::method_id(&self.method),
            parameters: wkt::parameters(&self.parameters)?,
            cs,
            authority: &self.authority,
            code: self.code,
            version: self.version,
        }))
    }
}

fn require_east(code: i64, direction: LongitudeDirection) -> Result<()> {
    match direction {
        LongitudeDirection::East => Ok(()),
        LongitudeDirection::West => Err(Error::PreconditionViolation {
            code,
            reason: String::from("ocentric longitudes must be positive east"),
        }),
    }
}

/// The catalog records making up one CRS.
#[derive(Debug, Clone, Copy)]
pub struct CrsDefinition<'a> {
    pub planetodetic: &'a PlanetodeticRecord,
    pub datum: &'a DatumRecord,
    pub ellipsoid: &'a EllipsoidRecord,
    /// Set for a projected CRS, `planetodetic` being its base.
    pub projection: Option<&'a ProjectionRecord>,
}

impl<'a> CrsDefinition<'a> {
    fn check_references(&self) -> Result<()> {
        let planetodetic = self.planetodetic;
        if planetodetic.datum != self.datum.crs_ref() {
            return Err(Error::MissingReference(format!(
                "{} references datum {}",
                planetodetic.crs_ref(),
                planetodetic.datum
            )));
        }
        if self.datum.ellipsoid != self.ellipsoid.crs_ref() {
            return Err(Error::MissingReference(format!(
                "{} references ellipsoid {}",
                self.datum.crs_ref(),
                self.datum.ellipsoid
            )));
        }
        match self.projection {
            Some(projection) if projection.base_crs != planetodetic.crs_ref() => {
                Err(Error::MissingReference(format!(
                    "projection {} references base CRS {}",
                    projection.code, projection.base_crs
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CrsVariant {
    OcentricEllipsoid(GeodeticCrs<Spheroid>),
    OgraphicEllipsoid(GeodeticCrs<Spheroid>),
    OcentricTriaxial(GeodeticCrs<TriaxialEllipsoid>),
    OgraphicTriaxial(GeodeticCrs<TriaxialEllipsoid>),
    ProjectedOcentricEllipsoid(ProjectedCrs<Spheroid>),
    ProjectedOgraphicEllipsoid(ProjectedCrs<Spheroid>),
    ProjectedOcentricTriaxial(ProjectedCrs<TriaxialEllipsoid>),
    ProjectedOgraphicTriaxial(ProjectedCrs<TriaxialEllipsoid>),
}

use CrsVariant::*;

macro_rules! geodetic {
    ($self:ident, $crs:ident => $e:expr) => {
        match $self {
            OcentricEllipsoid($crs) | OgraphicEllipsoid($crs) => $e,
            OcentricTriaxial($crs) | OgraphicTriaxial($crs) => $e,
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => {
                let $crs = &p.base;
                $e
            }
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => {
                let $crs = &p.base;
                $e
            }
        }
    };
}

impl CrsVariant {
    /// Picks the variant of a catalog entry.
    ///
    /// A projected entry is dispatched on the shape of its ellipsoid first and then on the
    /// variant tag of its base CRS, an unprojected one on the tag alone. The figure is then built
    /// from the ellipsoid record, which fails when the record does not have the expected shape.
    pub fn create(def: &CrsDefinition) -> Result<CrsVariant> {
        def.check_references()?;
        let variant = def.planetodetic.variant;
        let unsupported = || {
            Error::UnsupportedDatum(format!(
                "{:?} base for a {} ellipsoid",
                variant,
                def.ellipsoid.shape.as_str()
            ))
        };

        match def.projection {
            Some(projection) if def.ellipsoid.shape == Shape::Triaxial => {
                let figure = TriaxialEllipsoid::try_from(def.ellipsoid)?;
                let crs = ProjectedCrs::new(def, projection, figure);
                match variant {
                    Variant::TriaxialOgraphic => Ok(ProjectedOgraphicTriaxial(crs)),
                    Variant::TriaxialOcentric => Ok(ProjectedOcentricTriaxial(crs)),
                    _ => Err(unsupported()),
                }
            }
            Some(projection) => {
                let figure = Spheroid::try_from(def.ellipsoid)?;
                let crs = ProjectedCrs::new(def, projection, figure);
                match variant {
                    Variant::SphereOcentric | Variant::EllipseOcentric => {
                        Ok(ProjectedOcentricEllipsoid(crs))
                    }
                    Variant::EllipseOgraphic => Ok(ProjectedOgraphicEllipsoid(crs)),
                    _ => Err(unsupported()),
                }
            }
            None => match variant {
                Variant::SphereOcentric | Variant::EllipseOcentric => Ok(OcentricEllipsoid(
                    GeodeticCrs::new(def, Spheroid::try_from(def.ellipsoid)?),
                )),
                Variant::EllipseOgraphic => Ok(OgraphicEllipsoid(GeodeticCrs::new(
                    def,
                    Spheroid::try_from(def.ellipsoid)?,
                ))),
                Variant::TriaxialOgraphic => Ok(OgraphicTriaxial(GeodeticCrs::new(
                    def,
                    TriaxialEllipsoid::try_from(def.ellipsoid)?,
                ))),
                Variant::TriaxialOcentric => Ok(OcentricTriaxial(GeodeticCrs::new(
                    def,
                    TriaxialEllipsoid::try_from(def.ellipsoid)?,
                ))),
            },
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(
            self,
            ProjectedOcentricEllipsoid(_)
                | ProjectedOgraphicEllipsoid(_)
                | ProjectedOcentricTriaxial(_)
                | ProjectedOgraphicTriaxial(_)
        )
    }

    pub fn is_ocentric(&self) -> bool {
        matches!(
            self,
            OcentricEllipsoid(_)
                | OcentricTriaxial(_)
                | ProjectedOcentricEllipsoid(_)
                | ProjectedOcentricTriaxial(_)
        )
    }

    fn projected(&self) -> Option<(&str, &str, i64)> {
        match self {
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => {
                Some((p.name.as_str(), p.authority.as_str(), p.code))
            }
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => {
                Some((p.name.as_str(), p.authority.as_str(), p.code))
            }
            _ => None,
        }
    }

    /// Name of the CRS. For a projected CRS, the name of its base.
    pub fn name(&self) -> &str {
        geodetic!(self, crs => crs.name.as_str())
    }

    pub fn authority(&self) -> &str {
        match self.projected() {
            Some((_, authority, _)) => authority,
            None => geodetic!(self, crs => crs.authority.as_str()),
        }
    }

    pub fn code(&self) -> i64 {
        match self.projected() {
            Some((_, _, code)) => code,
            None => geodetic!(self, crs => crs.code),
        }
    }

    pub fn version(&self) -> i64 {
        match self {
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => p.version,
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => p.version,
            _ => geodetic!(self, crs => crs.version),
        }
    }

    pub fn remark(&self) -> &str {
        geodetic!(self, crs => crs.remark.as_str())
    }

    pub fn datum(&self) -> String {
        geodetic!(self, crs => crs.datum_wkt())
    }

    /// Coordinate system fragment. Fails for an ocentric CRS whose longitudes are not east.
    pub fn cs(&self) -> Result<String> {
        match self {
            OcentricEllipsoid(crs) => crs.ocentric_cs(),
            OcentricTriaxial(crs) => crs.ocentric_cs(),
            OgraphicEllipsoid(crs) => Ok(crs.ographic_cs()),
            OgraphicTriaxial(crs) => Ok(crs.ographic_cs()),
            ProjectedOcentricEllipsoid(p) => p.cs(true),
            ProjectedOcentricTriaxial(p) => p.cs(true),
            ProjectedOgraphicEllipsoid(p) => p.cs(false),
            ProjectedOgraphicTriaxial(p) => p.cs(false),
        }
    }

    pub fn projection_name(&self) -> Option<&str> {
        self.projected().map(|(name, _, _)| name)
    }

    pub fn conversion_name(&self) -> Option<&str> {
        match self {
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => Some(p.conversion.as_str()),
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => Some(p.conversion.as_str()),
            _ => None,
        }
    }

    pub fn method_name(&self) -> Option<&str> {
        match self {
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => Some(p.method.as_str()),
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => Some(p.method.as_str()),
            _ => None,
        }
    }

    pub fn method_id(&self) -> Option<String> {
        self.method_name().map(wkt::method_id)
    }

    pub fn parameters(&self) -> Option<Result<String>> {
        match self {
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => {
                Some(wkt::parameters(&p.parameters))
            }
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => {
                Some(wkt::parameters(&p.parameters))
            }
            _ => None,
        }
    }

    /// Keyword of the base CRS of a projected CRS.
    pub fn base_keyword(&self) -> Option<&'static str> {
        if !self.is_projected() {
            None
        } else if self.is_ocentric() {
            Some("BASEGEODCRS")
        } else {
            Some("BASEGEOGCRS")
        }
    }

    /// Builds the full WKT2 definition.
    pub fn to_wkt(&self) -> Result<String> {
        let cs = self.cs()?;
        match self {
            OcentricEllipsoid(crs) | OgraphicEllipsoid(crs) => Ok(crs.render(cs)),
            OcentricTriaxial(crs) | OgraphicTriaxial(crs) => Ok(crs.render(cs)),
            ProjectedOcentricEllipsoid(p) | ProjectedOgraphicEllipsoid(p) => {
                p.render(self.base_keyword().unwrap_or_default(), cs)
            }
            ProjectedOcentricTriaxial(p) | ProjectedOgraphicTriaxial(p) => {
                p.render(self.base_keyword().unwrap_or_default(), cs)
            }
        }
    }
}

/// A CRS and its definition once rendered.
#[derive(Debug, Clone)]
pub struct WktCrs {
    variant: CrsVariant,
    wkt: Option<String>,
}

impl WktCrs {
    pub fn new(variant: CrsVariant) -> Self {
        WktCrs { variant, wkt: None }
    }

    pub fn create(def: &CrsDefinition) -> Result<Self> {
        CrsVariant::create(def).map(WktCrs::new)
    }

    pub fn variant(&self) -> &CrsVariant {
        &self.variant
    }

    pub fn code(&self) -> i64 {
        self.variant.code()
    }

    pub fn is_rendered(&self) -> bool {
        self.wkt.is_some()
    }

    /// Renders the definition. Only the first successful call renders, later calls return the
    /// same text.
    pub fn compute_wkt(&mut self) -> Result<&str> {
        if self.wkt.is_none() {
            self.wkt = Some(self.variant.to_wkt()?);
        }
        self.wkt()
    }

    /// The rendered definition, or `NotRendered` before [`WktCrs::compute_wkt`].
    pub fn wkt(&self) -> Result<&str> {
        self.wkt
            .as_deref()
            .ok_or_else(|| Error::NotRendered(self.variant.code()))
    }

    pub fn into_wkt(self) -> Result<String> {
        let code = self.variant.code();
        self.wkt.ok_or(Error::NotRendered(code))
    }
}
