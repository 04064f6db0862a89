//! Environment snapshots
//!
//! A snapshot records, for every declared variable name, the raw string found
//! in the environment (or nothing). It is taken once and never changes.

use crate::error::EnvError;
use crate::schema::{Schema, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<&'static str, Option<String>>,
}

impl Snapshot {
    /// Build a snapshot for every declared name using `lookup`
    pub fn collect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = Schema::declared_names()
            .into_iter()
            .map(|name| (name, lookup(name)))
            .collect();
        Self { values }
    }

    /// Read the declared names from the process environment.
    /// Values that are not valid unicode count as unset.
    pub fn capture() -> Self {
        Self::collect(|name| std::env::var(name).ok())
    }

    /// Snapshot from explicit pairs; undeclared names are dropped
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::collect(|name| map.get(name).cloned())
    }

    /// Read a dotenv file. Only declared names are kept; quoting, escapes
    /// and inline comments follow `dotenvy`.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let env_file_error = |source: dotenvy::Error| EnvError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let mut pairs = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(env_file_error)? {
            let (key, value) = item.map_err(env_file_error)?;
            pairs.insert(key, value);
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Raw value for `name`, `None` when unset or undeclared
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// Raw value wrapped for rule checking
    pub(crate) fn input(&self, name: &str) -> Option<Value> {
        self.get(name).map(|s| Value::Text(s.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}
