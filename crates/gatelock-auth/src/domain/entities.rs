//! # Domain Entities
//!
//! Core data structures for connection authorization: the connection
//! configuration, the store of named configurations, and the
//! caller-supplied request fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::StoreError;

/// Request parameter carrying the connection name.
pub const CONNECTION_PARAM: &str = "connection";
/// Request parameter carrying the caller-claimed timestamp (epoch milliseconds).
pub const TIMESTAMP_PARAM: &str = "timestamp";
/// Request parameter carrying the base64-encoded HMAC signature.
pub const SIGNATURE_PARAM: &str = "signature";

/// One named parameter of a connection configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, unique within one configuration.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl Parameter {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One authorizable connection target.
///
/// Immutable once constructed: the constructor enforces a non-empty
/// protocol and unique parameter names, so every value of this type
/// upholds both invariants for its whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
    protocol: String,
    /// Declaration order is preserved; message building iterates the
    /// signed-parameter policy list, but callers may rely on the order
    /// they wrote.
    parameters: Vec<Parameter>,
}

impl ConnectionConfig {
    /// Builds a configuration, validating its invariants.
    pub fn new(
        protocol: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Result<Self, StoreError> {
        let protocol = protocol.into();
        if protocol.is_empty() {
            return Err(StoreError::EmptyProtocol);
        }
        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(StoreError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
        }
        Ok(Self {
            protocol,
            parameters,
        })
    }

    /// The remote-access protocol (e.g. `"rdp"`, `"vnc"`). Never empty.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Looks up a parameter value by name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// All parameters, in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// Mapping from connection name to its configuration.
///
/// A store is produced fresh by a [`ConfigSource`](crate::ConfigSource)
/// on each authorization pass and never mutated afterwards; the
/// success path of an authorization *narrows* it into a new
/// single-entry store rather than editing it in place. An empty store
/// is valid and means no configurations are available.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigStore {
    configs: HashMap<String, ConnectionConfig>,
}

impl ConfigStore {
    /// An empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from named entries, rejecting empty or duplicate
    /// names as structural errors.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, ConnectionConfig)>,
    ) -> Result<Self, StoreError> {
        let mut configs = HashMap::new();
        for (name, config) in entries {
            if name.is_empty() {
                return Err(StoreError::EmptyName);
            }
            if configs.insert(name.clone(), config).is_some() {
                return Err(StoreError::DuplicateName { name });
            }
        }
        Ok(Self { configs })
    }

    /// Pure read: the configuration under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&ConnectionConfig> {
        self.configs.get(name)
    }

    /// Produces a fresh store holding exactly the one named entry.
    ///
    /// This is the least-privilege success result: a verified caller
    /// receives only the configuration it proved knowledge of, even if
    /// it later enumerates everything the returned store contains.
    pub fn narrow(&self, name: &str) -> Option<ConfigStore> {
        self.configs.get(name).map(|config| {
            let mut configs = HashMap::with_capacity(1);
            configs.insert(name.to_string(), config.clone());
            ConfigStore { configs }
        })
    }

    /// Number of configurations in the store.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the store holds no configurations.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Iterates over the connection names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }
}

/// The caller-supplied fields of one authentication attempt.
///
/// Every field is caller-claimed and optional at this layer; the
/// orchestrator decides what absence means. Values live only for the
/// duration of one authorization call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestFields {
    /// Name of the connection the caller wants to use.
    pub connection: Option<String>,
    /// Claimed timestamp, decimal epoch milliseconds.
    pub timestamp: Option<String>,
    /// Claimed proof: base64-encoded HMAC signature.
    pub signature: Option<String>,
}

impl RequestFields {
    /// Extracts the well-known fields from a request parameter map,
    /// e.g. an HTTP query string already parsed by the host.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            connection: params.get(CONNECTION_PARAM).cloned(),
            timestamp: params.get(TIMESTAMP_PARAM).cloned(),
            signature: params.get(SIGNATURE_PARAM).cloned(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rdp_config() -> ConnectionConfig {
        ConnectionConfig::new(
            "rdp",
            vec![
                Parameter::new("hostname", "10.2.3.4"),
                Parameter::new("port", "3389"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn config_rejects_empty_protocol() {
        let result = ConnectionConfig::new("", vec![]);
        assert!(matches!(result, Err(StoreError::EmptyProtocol)));
    }

    #[test]
    fn config_rejects_duplicate_parameter() {
        let result = ConnectionConfig::new(
            "vnc",
            vec![
                Parameter::new("hostname", "a"),
                Parameter::new("hostname", "b"),
            ],
        );
        assert!(matches!(
            result,
            Err(StoreError::DuplicateParameter { name }) if name == "hostname"
        ));
    }

    #[test]
    fn config_preserves_parameter_order() {
        let config = ConnectionConfig::new(
            "rdp",
            vec![
                Parameter::new("port", "3389"),
                Parameter::new("hostname", "10.2.3.4"),
            ],
        )
        .unwrap();

        let names: Vec<_> = config.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["port", "hostname"]);
    }

    #[test]
    fn config_parameter_lookup() {
        let config = rdp_config();
        assert_eq!(config.parameter("hostname"), Some("10.2.3.4"));
        assert_eq!(config.parameter("username"), None);
    }

    #[test]
    fn store_rejects_duplicate_names() {
        let result = ConfigStore::from_entries(vec![
            ("test-pc".to_string(), rdp_config()),
            ("test-pc".to_string(), rdp_config()),
        ]);
        assert!(matches!(
            result,
            Err(StoreError::DuplicateName { name }) if name == "test-pc"
        ));
    }

    #[test]
    fn store_rejects_empty_name() {
        let result = ConfigStore::from_entries(vec![(String::new(), rdp_config())]);
        assert!(matches!(result, Err(StoreError::EmptyName)));
    }

    #[test]
    fn empty_store_is_valid() {
        let store = ConfigStore::empty();
        assert!(store.is_empty());
        assert!(store.lookup("anything").is_none());
    }

    #[test]
    fn narrow_returns_single_entry_store() {
        let store = ConfigStore::from_entries(vec![
            ("test-pc".to_string(), rdp_config()),
            (
                "other-pc".to_string(),
                ConnectionConfig::new("vnc", vec![]).unwrap(),
            ),
        ])
        .unwrap();

        let narrowed = store.narrow("test-pc").unwrap();
        assert_eq!(narrowed.len(), 1);
        assert!(narrowed.lookup("test-pc").is_some());
        assert!(narrowed.lookup("other-pc").is_none());

        // The original store is untouched.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn narrow_unknown_name_is_none() {
        let store = ConfigStore::from_entries(vec![("test-pc".to_string(), rdp_config())]).unwrap();
        assert!(store.narrow("missing").is_none());
    }

    #[test]
    fn request_fields_from_params() {
        let mut params = HashMap::new();
        params.insert(CONNECTION_PARAM.to_string(), "test-pc".to_string());
        params.insert(TIMESTAMP_PARAM.to_string(), "1373563683000".to_string());
        params.insert(SIGNATURE_PARAM.to_string(), "c2ln".to_string());
        params.insert("unrelated".to_string(), "ignored".to_string());

        let fields = RequestFields::from_params(&params);
        assert_eq!(fields.connection.as_deref(), Some("test-pc"));
        assert_eq!(fields.timestamp.as_deref(), Some("1373563683000"));
        assert_eq!(fields.signature.as_deref(), Some("c2ln"));
    }

    #[test]
    fn request_fields_missing_params_are_none() {
        let fields = RequestFields::from_params(&HashMap::new());
        assert!(fields.connection.is_none());
        assert!(fields.timestamp.is_none());
        assert!(fields.signature.is_none());
    }
}
