// Error types for the ninja-tools crate.
// Covers NinjaRMM API errors, launcher config errors, and general I/O errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credential request rejected with HTTP {status}: {body}")]
    Credentials { status: u16, body: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("missing {0} environment variable")]
    MissingEnvironment(&'static str),

    #[error("invalid region {0:?}, must be one of: app, us2, ca, eu, oc")]
    InvalidRegion(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("configuration is not valid JSON: {0}")]
    ConfigParse(serde_json::Error),

    #[error("configuration is invalid: {0}")]
    ConfigValidation(String),

    #[error("configuration could not be serialized: {0}")]
    ConfigSerialization(serde_json::Error),

    #[error("documentation index error: {0}")]
    DocIndex(String),

    #[error("no documentation snapshot, call refresh_documentation first")]
    NoDocumentation,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
