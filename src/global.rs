//! Process-wide environment handle
//!
//! The handle is installed once at startup and read for the rest of the
//! process lifetime.

use crate::error::EnvError;
use crate::gate::EnvHandle;
use crate::snapshot::Snapshot;
use crate::validator::{ExecutionContext, Options, initialize};
use std::sync::OnceLock;

static ENV: OnceLock<EnvHandle> = OnceLock::new();

/// Capture the process environment, validate it for the detected context and
/// install the result.
pub fn init() -> Result<&'static EnvHandle, EnvError> {
    let handle = initialize(
        &Snapshot::capture(),
        ExecutionContext::detect(),
        &Options::default(),
    )?;
    install(handle)
}

/// Install an already validated handle
pub fn install(handle: EnvHandle) -> Result<&'static EnvHandle, EnvError> {
    ENV.set(handle).map_err(|_| EnvError::AlreadyInitialized)?;
    ENV.get().ok_or(EnvError::AlreadyInitialized)
}

pub fn get() -> Option<&'static EnvHandle> {
    ENV.get()
}
