//! Coordinate reference systems of the Solar System bodies.
//!
//! The catalog is derived from the IAU table of body radii: every body gets reference ellipsoids,
//! datums, ocentric and ographic CRS, and a fixed set of projected CRS, each identified by a code
//! built from the NAIF id of the body. Every CRS renders to WKT2.
//! ```ignore
//! use planetcrs::{Catalog, CatalogConfig, CatalogStore};
//!
//! let catalog = Catalog::from_path("iau2015.csv", CatalogConfig::default())?;
//! let rendered = catalog.render();
//! let mut store = CatalogStore::create("iau2015.gpkg")?;
//! store.write_catalog(&catalog, &rendered)?;
//! ```

// lets the derive macro name the crate from inside it
extern crate self as planetcrs;

pub mod authority;
pub mod body;
pub mod catalog;
pub mod config;
pub mod datum;
pub mod ellipsoid;
pub mod planetodetic;
pub mod projection;
mod result;
pub mod srs;
pub mod store;
pub mod types;
pub mod variant;
pub mod wkt;

pub use crate::body::{read_bodies, read_bodies_from_path, Body, BodyRow};
pub use crate::catalog::{Catalog, RenderedCatalog};
pub use crate::config::CatalogConfig;
pub use crate::result::{Error, RenderFailure, Result};
pub use crate::store::{CatalogStore, CatalogTable};
pub use crate::types::{CrsRef, CsType, LongitudeDirection, Shape, Variant};
pub use crate::variant::{CrsDefinition, CrsVariant, WktCrs};
#[doc(inline)]
pub use planetcrs_derive::CatalogTable;
