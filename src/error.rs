//! Error types

use crate::validator::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    /// One or more declared variables failed validation. Fatal at startup.
    #[error("Invalid environment variables:\n{0}")]
    Invalid(ValidationErrors),

    #[error("failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// The process-wide handle was installed twice
    #[error("environment handle already initialized")]
    AlreadyInitialized,
}
