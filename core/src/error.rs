//! Overlay error types

use std::path::PathBuf;

use thiserror::Error;

use crate::values::ValueId;

/// Errors surfaced to the host application.
///
/// Refresh passes never fail; only value writes through the store and
/// configuration loading report errors.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// The key was not issued by this store, or its slot holds another kind
    #[error("unknown bound value {0}")]
    UnknownValue(ValueId),

    /// The configuration file could not be read
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::OverlayConfig`]
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
