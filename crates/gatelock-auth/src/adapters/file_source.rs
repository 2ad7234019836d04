//! # TOML Connection Store Loader
//!
//! Reads the named connection configurations from a TOML document:
//!
//! ```toml
//! [[connection]]
//! name = "test-pc"
//! protocol = "rdp"
//! params = [
//!     { name = "hostname", value = "10.2.3.4" },
//!     { name = "port", value = "3389" },
//! ]
//! ```
//!
//! The file is re-read on every `load`, so edits take effect on the
//! next authorization attempt without a restart.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::entities::{ConfigStore, ConnectionConfig, Parameter};
use crate::domain::errors::StoreError;
use crate::ports::outbound::ConfigSource;

/// Default store filename, resolved against the service home directory.
pub const DEFAULT_CONFIG_FILE: &str = "gatelock-connections.toml";

#[derive(Debug, Deserialize)]
struct StoreDocument {
    #[serde(default, rename = "connection")]
    connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize)]
struct ConnectionEntry {
    name: String,
    protocol: String,
    #[serde(default)]
    params: Vec<Parameter>,
}

/// Parses a store document, enforcing the structural invariants
/// (non-empty names and protocols, no duplicates).
pub fn parse_store(document: &str) -> Result<ConfigStore, StoreError> {
    let document: StoreDocument = toml::from_str(document)?;

    ConfigStore::from_entries(
        document
            .connections
            .into_iter()
            .map(|entry| {
                let config = ConnectionConfig::new(entry.protocol, entry.params)?;
                Ok((entry.name, config))
            })
            .collect::<Result<Vec<_>, StoreError>>()?,
    )
}

/// File-backed [`ConfigSource`] reading a TOML store document.
#[derive(Clone, Debug)]
pub struct TomlConfigSource {
    path: PathBuf,
}

impl TomlConfigSource {
    /// A source reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A source reading [`DEFAULT_CONFIG_FILE`] under `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEFAULT_CONFIG_FILE),
        }
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for TomlConfigSource {
    fn load(&self) -> Result<ConfigStore, StoreError> {
        debug!(path = %self.path.display(), "reading connection store");

        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let store = parse_store(&text)?;
        debug!(connections = store.len(), "connection store loaded");
        Ok(store)
    }
}

// =============================================================================
// TESTS
// =============================================================================
