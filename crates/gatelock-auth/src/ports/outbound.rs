//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the orchestrator needs from its environment: a source
//! of connection stores and a clock.

use crate::domain::entities::ConfigStore;
use crate::domain::errors::StoreError;

/// Produces the connection store for one authorization pass.
///
/// The store is consulted fresh on every call (freshness over
/// performance); implementations that cache must still present each
/// `load` as an immutable snapshot.
pub trait ConfigSource: Send + Sync {
    /// Loads the current set of named connection configurations.
    ///
    /// Structural failures (unreadable source, malformed document,
    /// duplicate names) are errors; a valid source with no entries is
    /// an empty store, not an error.
    fn load(&self) -> Result<ConfigStore, StoreError>;
}

/// Supplies the current wall-clock time.
///
/// Injected rather than read ambiently so the freshness policy is
/// testable against a fixed instant.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}
