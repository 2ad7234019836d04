//! # Gatelock Connection Authorization
//!
//! Verifies HMAC-signed connection requests against a store of named
//! connection configurations for remote-access gateways (RDP, VNC, ...).
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Canonical message construction, HMAC
//!   verification, timestamp policy. No I/O.
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound
//!   interfaces (`ConnectionAuthApi`, `ConfigSource`, `Clock`).
//! - **Adapters** (`adapters/`): TOML store loader, snapshot cache,
//!   system clock.
//! - **Service Layer** (`service.rs`): The authorization orchestrator.
//!
//! ## Security Notes
//!
//! - Signature comparison is constant-time (`Mac::verify_slice`).
//! - A denial is opaque to the caller: which check failed is visible
//!   only in debug-level diagnostics.
//! - The canonical message binds the server identity into every
//!   signature, preventing cross-server replay.

pub mod adapters;
pub mod context;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::cached::CachedConfigSource;
pub use adapters::clock::SystemClock;
pub use adapters::file_source::{TomlConfigSource, DEFAULT_CONFIG_FILE};
pub use context::{ContextError, VerificationContext, DEFAULT_AGE_LIMIT_MS};
pub use domain::entities::{
    ConfigStore, ConnectionConfig, Parameter, RequestFields, CONNECTION_PARAM, SIGNATURE_PARAM,
    TIMESTAMP_PARAM,
};
pub use domain::errors::{AuthError, StoreError};
pub use domain::freshness::timestamp_is_fresh;
pub use domain::signature::{canonical_message, MacAlgorithm, SignatureVerifier};
pub use ports::inbound::ConnectionAuthApi;
pub use ports::outbound::{Clock, ConfigSource};
pub use service::AuthService;
