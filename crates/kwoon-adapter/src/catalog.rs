//! Catalog Sources
//!
//! Reads catalog documents from YAML or JSON and validates them into a
//! [`Catalog`]. The Wing Chun catalog ships inside the binary.

use std::path::{Path, PathBuf};

use kwoon_domain::{Catalog, CatalogDocument, CatalogError};
use shared::{DocumentFormat, KwoonError};
use thiserror::Error;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../catalog/wing_chun.yaml");

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: KwoonError,
    },

    #[error("Invalid catalog {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: CatalogError,
    },
}

/// The catalog compiled into the binary
pub fn builtin() -> Result<Catalog, CatalogLoadError> {
    from_str(DocumentFormat::Yaml, BUILTIN_CATALOG, "built-in")
}

/// Load a catalog document, choosing the format from the file extension
pub fn from_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let document: CatalogDocument =
        DocumentFormat::read_file(path).map_err(|source| CatalogLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = validate(document, &path.display().to_string())?;
    debug!(path = %path.display(), activities = catalog.activities().len(), "Loaded catalog");
    Ok(catalog)
}

/// `path` when given, otherwise the built-in catalog
pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    match path {
        Some(path) => from_file(path),
        None => builtin(),
    }
}

fn from_str(format: DocumentFormat, content: &str, origin: &str) -> Result<Catalog, CatalogLoadError> {
    let document: CatalogDocument = format.parse(content).map_err(|source| CatalogLoadError::Read {
        path: PathBuf::from(origin),
        source,
    })?;
    validate(document, origin)
}

fn validate(document: CatalogDocument, origin: &str) -> Result<Catalog, CatalogLoadError> {
    Catalog::new(document).map_err(|source| CatalogLoadError::Invalid {
        origin: origin.to_string(),
        source,
    })
}
