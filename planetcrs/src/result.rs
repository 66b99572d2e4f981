/// The result returned by many methods within the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed row for body {body_id}: {reason}")]
    DataIntegrity { body_id: i64, reason: String },
    #[error("No record found for reference {0}")]
    MissingReference(String),
    #[error("Unsupported datum variant {0}")]
    UnsupportedDatum(String),
    #[error("Parameter \"{0}\" is not present in the authority table")]
    UnknownParameter(String),
    #[error("Projection method {0} is not present in the projection catalog")]
    UnknownMethod(String),
    #[error("Precondition violated for CRS {code}: {reason}")]
    PreconditionViolation { code: i64, reason: String },
    #[error("WKT of CRS {0} has not been computed")]
    NotRendered(i64),
    #[error("{}", describe_failures(.0))]
    RenderFailures(Vec<RenderFailure>),
    #[error("Error when accessing the SQLite database")]
    SQLiteError(#[from] rusqlite::Error),
    #[error("Error reading the body table")]
    CsvError(#[from] csv::Error),
    #[error("Error parsing the catalog configuration")]
    ConfigError(#[from] toml::de::Error),
    #[error("I/O error")]
    IoError(#[from] std::io::Error),
    #[error("Tried to create a catalog store that already exists")]
    CreateExistingError,
    #[error("Catalog store failed validation check when opening: {0}")]
    ValidationError(String),
}

/// A CRS that could not be rendered, along with the reason.
#[derive(Debug, thiserror::Error)]
#[error("CRS {code}: {error}")]
pub struct RenderFailure {
    pub code: i64,
    #[source]
    pub error: Error,
}

fn describe_failures(failures: &[RenderFailure]) -> String {
    match failures.first() {
        Some(first) => format!(
            "{} CRS failed to render, first failure: {}",
            failures.len(),
            first
        ),
        None => format!("{} CRS failed to render", failures.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failures_display() {
        assert_eq!(
            Error::RenderFailures(vec![]).to_string(),
            "0 CRS failed to render"
        );
        let failures = vec![
            RenderFailure {
                code: 49910,
                error: Error::UnknownParameter(String::from("Azimuth")),
            },
            RenderFailure {
                code: 49911,
                error: Error::NotRendered(49911),
            },
        ];
        assert_eq!(
            Error::RenderFailures(failures).to_string(),
            "2 CRS failed to render, first failure: CRS 49910: Parameter \"Azimuth\" is not present in the authority table"
        );
    }
}
