//! Environment validation
//!
//! Bulk validation of a [`Snapshot`] at startup. In the privileged (server)
//! context the snapshot is checked against the server and client schemas
//! merged together. In the restricted (client) context only the client schema
//! applies and server variables are never inspected, so their values cannot
//! end up in a client bundle.

use crate::error::EnvError;
use crate::gate::EnvHandle;
use crate::schema::{Schema, Value};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which side of the application the process runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Server side, every declared variable is available
    #[serde(rename = "server", alias = "privileged")]
    #[value(name = "server", alias = "privileged")]
    Privileged,
    /// Client side, only the public allow-list is available
    #[serde(rename = "client", alias = "restricted")]
    #[value(name = "client", alias = "restricted")]
    Restricted,
}

impl ExecutionContext {
    /// Client bundles are compiled to WebAssembly; everything else runs on
    /// the server.
    pub fn detect() -> Self {
        if cfg!(target_family = "wasm") {
            ExecutionContext::Restricted
        } else {
            ExecutionContext::Privileged
        }
    }

    /// Schema governing bulk validation in this context
    pub fn schema(self) -> Schema {
        match self {
            ExecutionContext::Privileged => Schema::server().merge(&Schema::client()),
            ExecutionContext::Restricted => Schema::client(),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Privileged => f.write_str("server"),
            ExecutionContext::Restricted => f.write_str("client"),
        }
    }
}

/// Coerced values of every variable that passed validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedEnv {
    values: BTreeMap<&'static str, Value>,
}

impl ParsedEnv {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub name: String,
    pub messages: Vec<String>,
}

/// Every field that failed validation, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// One `NAME: message, message` line per failing field
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !f.messages.is_empty())
            .map(|f| format!("{}: {}", f.name, f.messages.join(", ")))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Check `snapshot` against `schema`, collecting every failure
pub fn validate_with(schema: &Schema, snapshot: &Snapshot) -> Result<ParsedEnv, ValidationErrors> {
    let mut parsed = ParsedEnv::default();
    let mut errors = ValidationErrors::default();

    for field in schema.fields() {
        match field.rule.check(snapshot.input(field.name).as_ref()) {
            Ok(value) => {
                parsed.values.insert(field.name, value);
            }
            Err(messages) => errors.fields.push(FieldError {
                name: field.name.to_string(),
                messages,
            }),
        }
    }

    if errors.fields.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

/// Validate `snapshot` with the schema `context` selects
pub fn validate(snapshot: &Snapshot, context: ExecutionContext) -> Result<ParsedEnv, ValidationErrors> {
    validate_with(&context.schema(), snapshot)
}

/// Startup options for [`initialize`]
#[derive(Debug, Clone)]
pub struct Options {
    /// Log every parsed value once validation succeeds. This can write
    /// secrets to the log.
    pub log_snapshot: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { log_snapshot: true }
    }
}

/// Validate the snapshot and wrap the result in an access-controlled handle.
///
/// Failures are logged one line per field and returned as
/// [`EnvError::Invalid`]; callers must abort startup on error.
pub fn initialize(
    snapshot: &Snapshot,
    context: ExecutionContext,
    options: &Options,
) -> Result<EnvHandle, EnvError> {
    match validate(snapshot, context) {
        Ok(parsed) => {
            if options.log_snapshot {
                tracing::info!(%context, parsed = ?parsed, "parsed environment");
            } else {
                tracing::debug!(%context, fields = parsed.len(), "parsed environment");
            }
            Ok(EnvHandle::new(parsed, context))
        }
        Err(errors) => {
            tracing::error!(%context, "❌ Invalid environment variables:");
            for line in errors.lines() {
                tracing::error!("{}", line);
            }
            Err(EnvError::Invalid(errors))
        }
    }
}
