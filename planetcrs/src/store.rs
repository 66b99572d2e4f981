//! SQLite persistence of a catalog, laid out as a GeoPackage.
//!
//! The record tables are attribute tables registered in `gpkg_contents`, and every rendered CRS
//! is a row of `gpkg_spatial_ref_sys` carrying its WKT2 text in `definition_12_063`.
use crate::catalog::{Catalog, RenderedCatalog};
use crate::datum::DatumRecord;
use crate::ellipsoid::EllipsoidRecord;
use crate::planetodetic::PlanetodeticRecord;
use crate::projection::ProjectionRow;
use crate::result::{Error, Result};
use crate::srs::{defaults, SpatialRefSys, UNDEFINED};
use log::{debug, info};
use rusqlite::{params, Connection, DatabaseName, OpenFlags, OptionalExtension, Row, ToSql};
use std::path::Path;

const APPLICATION_ID: u32 = 0x47504B47;
const USER_VERSION: u32 = 10300;

const CREATE_SPATIAL_REF_SYS_TABLE: &str = "CREATE TABLE gpkg_spatial_ref_sys (
        srs_name TEXT NOT NULL,
        srs_id INTEGER NOT NULL PRIMARY KEY,
        organization TEXT NOT NULL,
        organization_coordsys_id INTEGER NOT NULL,
        definition TEXT NOT NULL,
        description TEXT,
        definition_12_063 TEXT NOT NULL DEFAULT 'undefined'
    )";

const CREATE_CONTENTS_TABLE: &str = "CREATE TABLE gpkg_contents (
        table_name TEXT NOT NULL PRIMARY KEY,
        data_type TEXT NOT NULL,
        identifier TEXT UNIQUE,
        description TEXT DEFAULT '',
        last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
        min_x DOUBLE,
        min_y DOUBLE,
        max_x DOUBLE,
        max_y DOUBLE,
        srs_id INTEGER,
        CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
    )";

const CREATE_EXTENSIONS_TABLE: &str = "CREATE TABLE gpkg_extensions (
        table_name TEXT,
        column_name TEXT,
        extension_name TEXT NOT NULL,
        definition TEXT NOT NULL,
        scope TEXT NOT NULL,
        CONSTRAINT ge_tce UNIQUE (table_name, column_name, extension_name)
    )";

const REGISTER_CRS_WKT_EXTENSION: &str = "INSERT INTO gpkg_extensions VALUES (
        'gpkg_spatial_ref_sys',
        'definition_12_063',
        'gpkg_crs_wkt',
        'http://www.geopackage.org/spec130/#extension_crs_wkt',
        'read-write'
    )";

/// A catalog store. Upon creation the GeoPackage metadata tables are created, and validation is
/// performed upon opening.
pub struct CatalogStore {
    /// The underlying rusqlite connection.
    ///
    /// Writing through it directly can leave the record tables and the SRS table out of sync.
    pub conn: Connection,
}

/// A record struct stored in its own attribute table.
///
/// Implemented with `#[derive(CatalogTable)]`, which generates the SQL and the row mapping; the
/// provided methods do the reads and writes.
pub trait CatalogTable: Sized {
    fn table_name() -> &'static str;

    /// Creates the table and registers it in `gpkg_contents`, as one batch.
    fn create_sql() -> &'static str;

    fn insert_sql() -> &'static str;

    fn select_sql() -> &'static str;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    /// Column values, in the column order of `insert_sql`.
    fn as_params(&self) -> Vec<&dyn ToSql>;

    fn create_table(store: &CatalogStore) -> Result<()> {
        store.conn.execute_batch(Self::create_sql())?;
        Ok(())
    }

    fn insert_record(&self, store: &CatalogStore) -> Result<()> {
        store.conn.execute(Self::insert_sql(), &*self.as_params())?;
        Ok(())
    }

    /// Inserts all the records in a single transaction.
    fn insert_many(store: &mut CatalogStore, records: &[Self]) -> Result<()> {
        let tx = store.conn.transaction()?;
        {
            let mut stmt = tx.prepare(Self::insert_sql())?;
            for record in records {
                stmt.execute(&*record.as_params())?;
            }
        }
        tx.commit()?;
        debug!("wrote {} rows to {}", records.len(), Self::table_name());
        Ok(())
    }

    /// Fetches every record of the table, in insertion order.
    fn get_all(store: &CatalogStore) -> Result<Vec<Self>> {
        let mut stmt = store.conn.prepare(Self::select_sql())?;
        let rows = stmt.query_map([], |row| Self::from_row(row))?;
        Ok(rows.collect::<rusqlite::Result<Vec<Self>>>()?)
    }
}

impl CatalogStore {
    /// Creates an empty store with the following metadata tables:
    /// * gpkg_spatial_ref_sys, with the default SRS rows
    /// * gpkg_contents
    /// * gpkg_extensions, registering the CRS WKT extension
    pub fn create<P: AsRef<Path>>(path: P) -> Result<CatalogStore> {
        if path.as_ref().exists() {
            return Err(Error::CreateExistingError);
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(Some(DatabaseName::Main), "application_id", APPLICATION_ID)?;
        conn.pragma_update(Some(DatabaseName::Main), "user_version", USER_VERSION)?;
        conn.execute(CREATE_SPATIAL_REF_SYS_TABLE, [])?;
        conn.execute(CREATE_CONTENTS_TABLE, [])?;
        conn.execute(CREATE_EXTENSIONS_TABLE, [])?;
        conn.execute(REGISTER_CRS_WKT_EXTENSION, [])?;
        let store = CatalogStore { conn };
        for srs in defaults::ALL.iter() {
            store.insert_srs(srs)?;
        }
        Ok(store)
    }

    /// Opens a store, checking the application id, the database integrity and the foreign keys.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CatalogStore> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        let application_id: u32 =
            conn.query_row("SELECT * FROM pragma_application_id()", [], |row| {
                row.get(0)
            })?;
        if application_id != APPLICATION_ID {
            return Err(Error::ValidationError(format!(
                "application id {:#x}",
                application_id
            )));
        }
        let user_version: u32 =
            conn.query_row("SELECT * FROM pragma_user_version()", [], |row| row.get(0))?;
        if user_version != USER_VERSION {
            return Err(Error::ValidationError(format!(
                "user version {}",
                user_version
            )));
        }
        let integrity_check: String =
            conn.query_row("SELECT * FROM pragma_integrity_check()", [], |row| {
                row.get(0)
            })?;
        if integrity_check != "ok" {
            return Err(Error::ValidationError(integrity_check));
        }
        // drop stmt before moving conn
        {
            let mut stmt = conn.prepare("SELECT * FROM pragma_foreign_key_check()")?;
            let mut rows = stmt.query([])?;
            if rows.next()?.is_some() {
                return Err(Error::ValidationError(String::from(
                    "foreign key check failed",
                )));
            }
        }
        Ok(CatalogStore { conn })
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }

    pub fn insert_srs(&self, srs: &SpatialRefSys) -> Result<()> {
        const STMT: &str = "INSERT INTO gpkg_spatial_ref_sys
            (srs_name, srs_id, organization, organization_coordsys_id, definition, description, definition_12_063)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
        self.conn.execute(
            STMT,
            params![
                srs.name,
                srs.id,
                srs.organization,
                srs.organization_coordsys_id,
                srs.definition,
                srs.description,
                srs.definition_12_063,
            ],
        )?;
        Ok(())
    }

    /// WKT2 definition of a stored CRS, `None` when no SRS has that id.
    pub fn srs_definition(&self, srs_id: i64) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT definition_12_063 FROM gpkg_spatial_ref_sys WHERE srs_id = ?1",
                [srs_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Writes the record tables of a catalog and one SRS row for every rendered CRS.
    ///
    /// CRS missing from `rendered` are left out of the SRS table.
    pub fn write_catalog(&mut self, catalog: &Catalog, rendered: &RenderedCatalog) -> Result<()> {
        EllipsoidRecord::create_table(self)?;
        DatumRecord::create_table(self)?;
        PlanetodeticRecord::create_table(self)?;
        ProjectionRow::create_table(self)?;
        EllipsoidRecord::insert_many(self, &catalog.ellipsoids)?;
        DatumRecord::insert_many(self, &catalog.datums)?;
        PlanetodeticRecord::insert_many(self, &catalog.planetodetics)?;
        let rows: Vec<ProjectionRow> = catalog.projections.iter().map(ProjectionRow::from).collect();
        ProjectionRow::insert_many(self, &rows)?;

        let names = catalog
            .planetodetics
            .iter()
            .map(|p| (p.code, p.name.as_str(), p.authority.as_str()))
            .chain(
                catalog
                    .projections
                    .iter()
                    .map(|p| (p.code, p.name.as_str(), p.authority.as_str())),
            );
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO gpkg_spatial_ref_sys
                (srs_name, srs_id, organization, organization_coordsys_id, definition, description, definition_12_063)
                VALUES (?1, ?2, ?3, ?2, ?4, '', ?5)",
            )?;
            for (code, name, authority) in names {
                if let Some(wkt) = rendered.get(code) {
                    stmt.execute(params![name, code, authority, UNDEFINED, wkt])?;
                    written += 1;
                }
            }
        }
        tx.commit()?;
        info!("wrote {} CRS definitions to the store", written);
        Ok(())
    }
}
