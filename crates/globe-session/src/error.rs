//! Error types for session building and control.

use asc_parser::ParseError;
use globe_geometry::GeometryError;
use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while building or driving a globe session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A dataset source could not be fetched. Fatal for the whole build;
    /// no partial visualization is shown and nothing retries.
    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// A fetched source could not be parsed.
    #[error("failed to parse dataset '{name}'")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// A derived entry referenced a dataset name the manifest never loaded.
    #[error("derived dataset '{entry}' references unknown dataset '{name}'")]
    UnknownDataset { entry: String, name: String },

    /// Geometry merging failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The manifest itself was malformed.
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
