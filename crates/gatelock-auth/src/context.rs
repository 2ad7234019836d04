//! # Verification Context
//!
//! Process-wide settings for the authorization service: the shared
//! secret, the server identity, the freshness window, and the
//! signed-parameter policy. Built once at startup, validated, and then
//! only read — never consulted through ambient global state.
//!
//! ## Security Requirements
//!
//! - The shared secret is required; a missing or empty secret is a
//!   fatal startup error, never a silent default.
//! - The secret is zeroized when the context is dropped.

use std::env;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::signature::MacAlgorithm;

/// Environment variable holding the shared secret. Required.
pub const SECRET_ENV: &str = "GATELOCK_SECRET";
/// Environment variable holding the server identity. Required.
pub const SERVER_ID_ENV: &str = "GATELOCK_SERVER_ID";
/// Environment variable holding the timestamp age limit in
/// milliseconds. Optional; `0` disables the freshness check.
pub const AGE_LIMIT_ENV: &str = "GATELOCK_TIMESTAMP_AGE_LIMIT_MS";
/// Environment variable holding the comma-separated signed-parameter
/// names. Optional.
pub const SIGNED_PARAMETERS_ENV: &str = "GATELOCK_SIGNED_PARAMETERS";

/// Default freshness window: ten minutes.
pub const DEFAULT_AGE_LIMIT_MS: u64 = 10 * 60 * 1000;

/// Errors raised while building the context at startup.
///
/// These are fatal: the service cannot authorize anything without a
/// secret and a server identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No shared secret was provided.
    #[error("shared secret is not set; set {SECRET_ENV}")]
    MissingSecret,

    /// No server identity was provided.
    #[error("server id is not set; set {SERVER_ID_ENV}")]
    MissingServerId,

    /// The age limit was present but not a non-negative integer.
    #[error("{AGE_LIMIT_ENV} must be a non-negative integer of milliseconds, got {value:?}")]
    InvalidAgeLimit {
        /// The rejected value.
        value: String,
    },
}

/// Process-wide verification settings.
///
/// Effectively immutable: constructed at startup and shared read-only
/// across concurrent authorization calls.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VerificationContext {
    /// Shared secret keying the HMAC. Any length.
    pub secret: Vec<u8>,
    /// Identity of this server, bound into every signed message so a
    /// signature minted for one server cannot be replayed against
    /// another.
    #[zeroize(skip)]
    pub server_id: String,
    /// Freshness window in milliseconds; `0` disables the check.
    #[zeroize(skip)]
    pub timestamp_age_limit_ms: u64,
    /// Parameter names that participate in the signed message, in
    /// policy order. A policy constant, not per-request data.
    #[zeroize(skip)]
    pub signed_parameters: Vec<String>,
    /// HMAC digest selection (wire-compatibility concern).
    #[zeroize(skip)]
    pub algorithm: MacAlgorithm,
}

impl std::fmt::Debug for VerificationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationContext")
            .field("secret", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("timestamp_age_limit_ms", &self.timestamp_age_limit_ms)
            .field("signed_parameters", &self.signed_parameters)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// The default signed-parameter policy: hostname, then port.
pub fn default_signed_parameters() -> Vec<String> {
    vec!["hostname".to_string(), "port".to_string()]
}

impl VerificationContext {
    /// Builds a context with the default freshness window, signed
    /// parameters, and algorithm. Validates the required fields.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        server_id: impl Into<String>,
    ) -> Result<Self, ContextError> {
        let context = Self {
            secret: secret.into(),
            server_id: server_id.into(),
            timestamp_age_limit_ms: DEFAULT_AGE_LIMIT_MS,
            signed_parameters: default_signed_parameters(),
            algorithm: MacAlgorithm::default(),
        };
        context.validate()?;
        Ok(context)
    }

    /// Builds the context from the process environment.
    ///
    /// `GATELOCK_SECRET` and `GATELOCK_SERVER_ID` are required; the
    /// age limit defaults to ten minutes and the signed parameters to
    /// `hostname,port`.
    pub fn from_env() -> Result<Self, ContextError> {
        let secret = env::var(SECRET_ENV).map_err(|_| ContextError::MissingSecret)?;
        let server_id = env::var(SERVER_ID_ENV).map_err(|_| ContextError::MissingServerId)?;

        let timestamp_age_limit_ms = match env::var(AGE_LIMIT_ENV) {
            Err(_) => DEFAULT_AGE_LIMIT_MS,
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| ContextError::InvalidAgeLimit { value })?,
        };

        let signed_parameters = match env::var(SIGNED_PARAMETERS_ENV) {
            Err(_) => default_signed_parameters(),
            Ok(value) => value
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        };

        let context = Self {
            secret: secret.into_bytes(),
            server_id,
            timestamp_age_limit_ms,
            signed_parameters,
            algorithm: MacAlgorithm::default(),
        };
        context.validate()?;
        Ok(context)
    }

    /// Checks the fatal-at-startup invariants.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.secret.is_empty() {
            return Err(ContextError::MissingSecret);
        }
        if self.server_id.is_empty() {
            return Err(ContextError::MissingServerId);
        }
        Ok(())
    }
}
