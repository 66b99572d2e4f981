use crate::result::Result;
use serde::Deserialize;
use std::path::Path;

/// Citation appended to every ellipsoid remark.
pub const IAU_2015_CITATION: &str =
    "Source of IAU Coordinate systems: doi://10.1007/s10569-017-9805-5";

/// Catalog-wide constants used while deriving records.
///
/// Every field has a default, so a TOML file only needs the values it overrides:
/// ```toml
/// authority = "IAU"
/// version = 2015
/// ocentric_only_bodies = ["Sun", "Moon"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub authority: String,
    pub version: i64,
    pub citation: String,
    /// Bodies whose ographic longitudes are positive to the east whatever their rotation.
    pub east_longitude_bodies: Vec<String>,
    /// Bodies for which the ographic CRS is the ocentric one and is not generated.
    pub ocentric_only_bodies: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            authority: String::from("IAU"),
            version: 2015,
            citation: String::from(IAU_2015_CITATION),
            east_longitude_bodies: vec![
                String::from("Sun"),
                String::from("Moon"),
                String::from("Earth"),
            ],
            ocentric_only_bodies: vec![String::from("Sun"), String::from("Moon")],
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(s: &str) -> Result<CatalogConfig> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn is_east_longitude_body(&self, body: &str) -> bool {
        self.east_longitude_bodies.iter().any(|b| b == body)
    }

    pub fn is_ocentric_only_body(&self, body: &str) -> bool {
        self.ocentric_only_bodies.iter().any(|b| b == body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Error;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert!(config.is_east_longitude_body("Earth"));
        assert!(!config.is_ocentric_only_body("Earth"));
    }

    #[test]
    fn partial_toml_overrides() {
        let config = CatalogConfig::from_toml_str(
            r#"
            version = 2018
            ocentric_only_bodies = ["Sun"]
            "#,
        )
        .unwrap();
        assert_eq!(config.version, 2018);
        assert_eq!(config.authority, "IAU");
        assert!(!config.is_ocentric_only_body("Moon"));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = CatalogConfig::from_toml_str("version = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
