//! Access-controlled environment handle
//!
//! Every read is re-validated against the server schema for that single
//! field. A name with no server rule (client-only or undeclared) is denied
//! regardless of the execution context, so even the server cannot read
//! `NEXT_PUBLIC_BAR` through the handle.

use crate::schema::{NODE_ENV_VALUES, Schema, Value};
use crate::validator::{ExecutionContext, ParsedEnv};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const DENIED_MESSAGE: &str =
    "You tried to access an environment variable, that is only available on the server.";

/// Typed `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEnv {
    Development,
    Test,
    Production,
}

impl NodeEnv {
    /// In the same order as [`NODE_ENV_VALUES`]
    pub const ALL: [NodeEnv; 3] = [NodeEnv::Development, NodeEnv::Test, NodeEnv::Production];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeEnv::Development => NODE_ENV_VALUES[0],
            NodeEnv::Test => NODE_ENV_VALUES[1],
            NodeEnv::Production => NODE_ENV_VALUES[2],
        }
    }
}

impl FromStr for NodeEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeEnv::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown NODE_ENV: {}", s))
    }
}

impl fmt::Display for NodeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the validated environment
///
/// Cloning is cheap; all clones share the same parsed data.
#[derive(Clone)]
pub struct EnvHandle {
    inner: Arc<Inner>,
}

struct Inner {
    parsed: ParsedEnv,
    server: Schema,
    context: ExecutionContext,
}

impl fmt::Debug for EnvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvHandle")
            .field("context", &self.inner.context)
            .field("fields", &self.inner.parsed.len())
            .finish()
    }
}

impl EnvHandle {
    pub(crate) fn new(parsed: ParsedEnv, context: ExecutionContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                parsed,
                server: Schema::server(),
                context,
            }),
        }
    }

    pub fn context(&self) -> ExecutionContext {
        self.inner.context
    }

    /// Access policy: `name` must have a server rule and its stored value
    /// must still satisfy that rule. Client-only names always fail.
    pub fn is_server_accessible(&self, name: &str) -> bool {
        let Some(schema) = self.inner.server.pick(name) else {
            tracing::trace!(field = name, "no server rule");
            return false;
        };

        let stored = self.inner.parsed.get(name);
        let result = schema
            .fields()
            .iter()
            .all(|field| field.rule.check(stored).is_ok());
        tracing::trace!(field = name, allowed = result, "access check");
        result
    }

    /// Read `name` through the gate.
    ///
    /// Denied reads log a warning and return `None`, which callers cannot
    /// tell apart from an unset variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if self.is_server_accessible(name) {
            self.inner.parsed.get(name)
        } else {
            tracing::warn!(field = name, "{}", DENIED_MESSAGE);
            None
        }
    }

    pub fn node_env(&self) -> Option<NodeEnv> {
        self.get("NODE_ENV")
            .and_then(Value::as_text)
            .and_then(|s| s.parse().ok())
    }

    pub fn baz(&self) -> Option<&str> {
        self.get("BAZ").and_then(Value::as_text)
    }

    pub fn foo(&self) -> Option<u64> {
        self.get("FOO").and_then(Value::as_number)
    }

    /// Always denied: the gate only knows server rules.
    pub fn next_public_bar(&self) -> Option<&str> {
        self.get("NEXT_PUBLIC_BAR").and_then(Value::as_text)
    }

    /// Parsed values without the gate, for diagnostics only
    pub fn parsed(&self) -> &ParsedEnv {
        &self.inner.parsed
    }
}
