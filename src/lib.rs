//! Environment Gate Library
//!
//! Validates a web application's environment variables against fixed server
//! and client schemas at startup, and hands out a read-only handle that
//! re-checks every field read so server-only values never leak to client
//! code paths.
//!
//! ```no_run
//! let env = env_gate::global::init().expect("invalid environment");
//! let length = env.foo();
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod global;
pub mod middleware;
pub mod schema;
pub mod snapshot;
pub mod validator;

pub use config::Config;
pub use error::EnvError;
pub use gate::{EnvHandle, NodeEnv};
pub use schema::{Rule, Schema, Value};
pub use snapshot::Snapshot;
pub use validator::{ExecutionContext, Options, ParsedEnv, ValidationErrors, initialize, validate};

/// Take the snapshot `config` points at: its env file when set, otherwise
/// the process environment.
pub fn snapshot_for(config: &Config) -> Result<Snapshot, EnvError> {
    match &config.env_file {
        Some(path) => Snapshot::from_env_file(path),
        None => Ok(Snapshot::capture()),
    }
}

/// Validate the environment described by `config` and return its handle
pub fn load_env(config: &Config) -> Result<EnvHandle, EnvError> {
    let snapshot = snapshot_for(config)?;
    initialize(&snapshot, config.context(), &config.options())
}
