//! The full derivation pipeline, from body rows to rendered WKT2 definitions.
use crate::body::{read_bodies_from_path, Body, BodyRow};
use crate::config::CatalogConfig;
use crate::datum::{build_datum, DatumRecord};
use crate::ellipsoid::{classify, EllipsoidRecord};
use crate::planetodetic::{assign, PlanetodeticRecord};
use crate::projection::{decode, expand, ProjectionRecord};
use crate::result::{Error, RenderFailure, Result};
use crate::types::CrsRef;
use crate::variant::{CrsDefinition, WktCrs};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::convert::TryFrom;
use std::path::Path;

/// Every record derived from a body table.
#[derive(Debug)]
pub struct Catalog {
    pub config: CatalogConfig,
    pub bodies: Vec<Body>,
    /// Rows excluded from the catalog, with the reason.
    pub rejected: Vec<Error>,
    pub ellipsoids: Vec<EllipsoidRecord>,
    pub datums: Vec<DatumRecord>,
    pub planetodetics: Vec<PlanetodeticRecord>,
    pub projections: Vec<ProjectionRecord>,
}

impl Catalog {
    /// Runs the pipeline over the rows of a body table.
    ///
    /// A row that fails validation, or repeats the id of an earlier row, is excluded and logged.
    /// The other rows are processed normally.
    pub fn derive(rows: Vec<BodyRow>, config: CatalogConfig) -> Result<Catalog> {
        let mut bodies: Vec<Body> = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        for row in rows {
            let id = row.id;
            let result = Body::try_from(row).and_then(|body| {
                if seen.insert(body.id) {
                    Ok(body)
                } else {
                    Err(Error::DataIntegrity {
                        body_id: body.id,
                        reason: String::from("duplicate body id"),
                    })
                }
            });
            match result {
                Ok(body) => bodies.push(body),
                Err(e) => {
                    warn!("excluding body {}: {}", id, e);
                    rejected.push(e);
                }
            }
        }

        let by_id: HashMap<i64, &Body> = bodies.iter().map(|b| (b.id, b)).collect();
        let ellipsoids: Vec<EllipsoidRecord> =
            bodies.iter().flat_map(|b| classify(b, &config)).collect();
        debug!("{} ellipsoid records", ellipsoids.len());

        let datums = ellipsoids
            .iter()
            .map(|e| build_datum(e, &by_id))
            .collect::<Result<Vec<DatumRecord>>>()?;
        debug!("{} datum records", datums.len());

        let planetodetics: Vec<PlanetodeticRecord> = datums
            .iter()
            .filter_map(|d| by_id.get(&d.body_id).map(|body| assign(d, body, &config)))
            .flatten()
            .collect();
        debug!("{} planetodetic records", planetodetics.len());

        let projections: Vec<ProjectionRecord> = planetodetics.iter().flat_map(expand).collect();
        debug!("{} projection records", projections.len());

        info!(
            "derived {} CRS for {} bodies ({} rows excluded)",
            planetodetics.len() + projections.len(),
            bodies.len(),
            rejected.len()
        );
        Ok(Catalog {
            config,
            bodies,
            rejected,
            ellipsoids,
            datums,
            planetodetics,
            projections,
        })
    }

    /// Reads a body table from a CSV file and derives its catalog.
    pub fn from_path<P: AsRef<Path>>(path: P, config: CatalogConfig) -> Result<Catalog> {
        let rows = read_bodies_from_path(path)?;
        Self::derive(rows, config)
    }

    /// Number of CRS in the catalog, projected or not.
    pub fn crs_count(&self) -> usize {
        self.planetodetics.len() + self.projections.len()
    }

    fn index(&self) -> Index<'_> {
        Index {
            ellipsoids: self.ellipsoids.iter().map(|e| (e.crs_ref(), e)).collect(),
            datums: self.datums.iter().map(|d| (d.crs_ref(), d)).collect(),
            planetodetics: self.planetodetics.iter().map(|p| (p.crs_ref(), p)).collect(),
        }
    }

    /// Joins the records of the CRS with the given code.
    pub fn definition(&self, code: i64) -> Result<CrsDefinition<'_>> {
        let parts = decode(code)?;
        let index = self.index();
        let base = CrsRef::new(&self.config.authority, self.config.version, parts.base_code());
        let projection = match parts.family {
            Some(_) => Some(
                self.projections
                    .iter()
                    .find(|p| p.code == code)
                    .ok_or_else(|| Error::MissingReference(code.to_string()))?,
            ),
            None => None,
        };
        index.join(&base, projection)
    }

    /// The CRS with the given code, not rendered yet.
    pub fn crs(&self, code: i64) -> Result<WktCrs> {
        WktCrs::create(&self.definition(code)?)
    }

    /// Renders every CRS of the catalog. A CRS that fails is logged and reported in
    /// [`RenderedCatalog::failures`], the others are rendered normally.
    pub fn render(&self) -> RenderedCatalog {
        let index = self.index();
        let mut rendered = RenderedCatalog::default();
        let bases = self
            .planetodetics
            .iter()
            .map(|p| (p.code, index.join(&p.crs_ref(), None)));
        let projected = self
            .projections
            .iter()
            .map(|p| (p.code, index.join(&p.base_crs, Some(p))));

        for (code, definition) in bases.chain(projected) {
            match definition.and_then(|def| render_definition(&def)) {
                Ok(wkt) => {
                    rendered.wkts.insert(code, wkt);
                }
                Err(error) => {
                    warn!("CRS {} not rendered: {}", code, error);
                    rendered.failures.push(RenderFailure { code, error });
                }
            }
        }
        info!(
            "rendered {} CRS, {} failures",
            rendered.wkts.len(),
            rendered.failures.len()
        );
        rendered
    }
}

fn render_definition(def: &CrsDefinition) -> Result<String> {
    let mut crs = WktCrs::create(def)?;
    crs.compute_wkt()?;
    crs.into_wkt()
}

struct Index<'a> {
    ellipsoids: HashMap<CrsRef, &'a EllipsoidRecord>,
    datums: HashMap<CrsRef, &'a DatumRecord>,
    planetodetics: HashMap<CrsRef, &'a PlanetodeticRecord>,
}

impl<'a> Index<'a> {
    fn join(
        &self,
        base: &CrsRef,
        projection: Option<&'a ProjectionRecord>,
    ) -> Result<CrsDefinition<'a>> {
        let missing = |r: &CrsRef| Error::MissingReference(r.to_string());
        let planetodetic = *self.planetodetics.get(base).ok_or_else(|| missing(base))?;
        let datum = *self
            .datums
            .get(&planetodetic.datum)
            .ok_or_else(|| missing(&planetodetic.datum))?;
        let ellipsoid = *self
            .ellipsoids
            .get(&datum.ellipsoid)
            .ok_or_else(|| missing(&datum.ellipsoid))?;
        Ok(CrsDefinition {
            planetodetic,
            datum,
            ellipsoid,
            projection,
        })
    }
}

/// WKT2 definitions keyed by code, and the CRS that could not be rendered.
#[derive(Debug, Default)]
pub struct RenderedCatalog {
    pub wkts: BTreeMap<i64, String>,
    pub failures: Vec<RenderFailure>,
}

impl RenderedCatalog {
    pub fn get(&self, code: i64) -> Option<&str> {
        self.wkts.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.wkts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wkts.is_empty()
    }

    /// The definitions, or [`Error::RenderFailures`] if any CRS failed.
    pub fn into_result(self) -> Result<BTreeMap<i64, String>> {
        if self.failures.is_empty() {
            Ok(self.wkts)
        } else {
            Err(Error::RenderFailures(self.failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::tests::row;
    use crate::body::Rotation;
    use crate::ellipsoid::inverse_flattening;
    use crate::planetodetic::decode_planetodetic;
    use crate::types::{LongitudeDirection, Shape};
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data/iau2015.csv")
    }

    fn catalog() -> Catalog {
        Catalog::from_path(fixture(), CatalogConfig::default()).unwrap()
    }

    #[test]
    fn malformed_rows_are_excluded() {
        let catalog = catalog();
        assert_eq!(catalog.rejected.len(), 1);
        assert!(matches!(
            catalog.rejected[0],
            Error::DataIntegrity { body_id: 9999, .. }
        ));
        assert!(catalog.bodies.iter().all(|b| b.id != 9999));
        assert!(catalog.ellipsoids.iter().all(|e| e.body_id != 9999));
    }

    #[test]
    fn unreadable_values_are_rejected_with_their_body() {
        let data = "\
Naif_id,Body,IAU2015_Mean,IAU2015_Semimajor,IAU2015_Axisb,IAU2015_Semiminor,rotation,origin_long_name,origin_lon_pos
499,Mars,3389500,3396190,-1,3376200,Direct,Airy-0,0
599,Jupiter,69911000,not-a-number,-1,66854000,Direct,,
";
        let rows = crate::body::read_bodies(data.as_bytes()).unwrap();
        let catalog = Catalog::derive(rows, CatalogConfig::default()).unwrap();
        assert_eq!(catalog.bodies.len(), 1);
        assert_eq!(catalog.rejected.len(), 1);
        assert!(matches!(
            catalog.rejected[0],
            Error::DataIntegrity { body_id: 599, .. }
        ));
    }

    #[test]
    fn ids_beyond_the_code_range_are_rejected() {
        let rows = vec![
            row(200_000_000_000_000_000, "Huge", 300.0, -1.0, 200.0, -1.0),
            row(499, "Mars", 3396190.0, -1.0, 3376200.0, -1.0),
        ];
        let catalog = Catalog::derive(rows, CatalogConfig::default()).unwrap();
        assert_eq!(catalog.bodies.len(), 1);
        assert!(matches!(
            catalog.rejected[0],
            Error::DataIntegrity {
                body_id: 200_000_000_000_000_000,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_ids_are_excluded() {
        let rows = vec![
            row(499, "Mars", 3396190.0, -1.0, 3376200.0, -1.0),
            row(499, "Mars again", 3396190.0, -1.0, 3376200.0, -1.0),
        ];
        let catalog = Catalog::derive(rows, CatalogConfig::default()).unwrap();
        assert_eq!(catalog.bodies.len(), 1);
        assert_eq!(catalog.bodies[0].name, "Mars");
        assert_eq!(catalog.rejected.len(), 1);
    }

    #[test]
    fn triaxial_bodies_have_no_ellipse() {
        let catalog = catalog();
        for body in catalog.bodies.iter().filter(|b| b.is_triaxial()) {
            let shapes: Vec<Shape> = catalog
                .ellipsoids
                .iter()
                .filter(|e| e.body_id == body.id)
                .map(|e| e.shape)
                .collect();
            assert!(shapes.contains(&Shape::Triaxial));
            assert!(!shapes.contains(&Shape::Ellipse));
        }
        assert!(catalog.bodies.iter().any(|b| b.is_triaxial()));
    }

    #[test]
    fn ellipse_flattening() {
        let catalog = catalog();
        for e in catalog.ellipsoids.iter().filter(|e| e.shape == Shape::Ellipse) {
            let expected = inverse_flattening(e.semi_major_axis, e.semi_minor_axis);
            let actual = e.inverse_flattening.unwrap();
            if e.semi_major_axis == e.semi_minor_axis {
                assert_eq!(actual, 0.0);
            } else {
                assert!((actual - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn historical_bodies() {
        let catalog = catalog();
        for name in ["Sun", "Moon"] {
            let body = catalog.bodies.iter().find(|b| b.name == name).unwrap();
            assert!(catalog
                .planetodetics
                .iter()
                .filter(|p| p.body_id == body.id)
                .all(|p| p.variant.is_ocentric()));
        }
        let earth = catalog.bodies.iter().find(|b| b.name == "Earth").unwrap();
        assert_eq!(earth.rotation, Some(Rotation::Direct));
        let ographic: Vec<&PlanetodeticRecord> = catalog
            .planetodetics
            .iter()
            .filter(|p| p.body_id == earth.id && !p.variant.is_ocentric())
            .collect();
        assert!(!ographic.is_empty());
        assert!(ographic
            .iter()
            .all(|p| p.longitude_direction == LongitudeDirection::East));
    }

    #[test]
    fn codes_are_unique_and_decodable() {
        let catalog = catalog();
        let mut seen = HashSet::new();
        for p in &catalog.planetodetics {
            assert!(seen.insert(p.code));
            assert_eq!(decode_planetodetic(p.code).unwrap(), (p.body_id, p.variant));
        }
        for p in &catalog.projections {
            assert!(seen.insert(p.code), "duplicate code {}", p.code);
            let parts = decode(p.code).unwrap();
            assert_eq!(parts.family, Some(p.family));
            assert_eq!(parts.body_id, p.body_id);
        }
        assert_eq!(seen.len(), catalog.crs_count());
    }

    #[test]
    fn everything_renders() {
        let catalog = catalog();
        let rendered = catalog.render();
        assert!(rendered.failures.is_empty(), "{:?}", rendered.failures);
        assert_eq!(rendered.len(), catalog.crs_count());

        let mars = rendered.get(49918).unwrap();
        assert!(mars.starts_with("PROJCRS[\"Mars (2015) / Ocentric / Equirectangular, clon = 0\""));
        assert!(mars.contains("ANCHOR[\"Airy-0: 0.0\"]"));
        assert!(rendered.wkts.values().all(|wkt| !wkt.contains("NaN")));

        let wkts = rendered.into_result().unwrap();
        assert!(wkts.contains_key(&49904));
    }

    #[test]
    fn lookup_by_code() {
        let catalog = catalog();
        let mut crs = catalog.crs(49904).unwrap();
        assert_eq!(crs.variant().name(), "Mars (2015) / Ocentric");
        let first = crs.compute_wkt().unwrap().to_owned();
        assert_eq!(crs.compute_wkt().unwrap(), first);
        assert_eq!(catalog.render().get(49904), Some(first.as_str()));

        let projected = catalog.crs(49918).unwrap();
        assert_eq!(projected.variant().method_name(), Some("Equidistant Cylindrical"));

        // Sun has no ographic CRS
        assert!(matches!(catalog.crs(1001), Err(Error::MissingReference(_))));
        assert!(matches!(catalog.crs(49907), Err(Error::UnsupportedDatum(_))));
    }

    #[test]
    fn failures_are_collected() {
        let mut catalog = catalog();
        let ocentric = catalog
            .planetodetics
            .iter_mut()
            .find(|p| p.code == 49900)
            .unwrap();
        ocentric.longitude_direction = LongitudeDirection::West;

        let rendered = catalog.render();
        let failed: Vec<i64> = rendered.failures.iter().map(|f| f.code).collect();
        assert_eq!(failed.len(), 1 + 15);
        assert!(failed.contains(&49900));
        assert!(failed.contains(&49910));
        assert!(rendered
            .failures
            .iter()
            .all(|f| matches!(f.error, Error::PreconditionViolation { .. })));
        assert!(rendered.get(49903).is_some());
        assert!(matches!(
            rendered.into_result(),
            Err(Error::RenderFailures(f)) if f.len() == 16
        ));
    }
}
