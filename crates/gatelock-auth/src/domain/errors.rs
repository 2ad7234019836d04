//! # Authorization Errors
//!
//! The two-outcome failure taxonomy: caller-attributable denials and
//! operator-attributable store faults. Nothing else crosses the
//! authorization boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Structural errors raised while building or loading a connection store.
///
/// These indicate a server-side misconfiguration, never a bad request:
/// an unreadable or malformed store must be reported to operators
/// instead of silently denying access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read.
    #[error("connection store {path:?} could not be read")]
    Io {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store document is syntactically invalid.
    #[error("connection store document is not valid TOML")]
    Parse(#[from] toml::de::Error),

    /// A connection was declared with an empty name.
    #[error("connection name must not be empty")]
    EmptyName,

    /// A connection was declared without a protocol.
    #[error("connection protocol must not be empty")]
    EmptyProtocol,

    /// Two connections share the same name.
    #[error("duplicate connection name {name:?}")]
    DuplicateName {
        /// The offending connection name.
        name: String,
    },

    /// A connection declares the same parameter twice.
    #[error("duplicate parameter {name:?} within one connection")]
    DuplicateParameter {
        /// The offending parameter name.
        name: String,
    },
}

/// Terminal failure outcomes of one authorization attempt.
///
/// `Denied` is deliberately a unit variant: missing fields, stale
/// timestamps, unknown connections, and signature mismatches all
/// collapse into it so an unauthenticated caller cannot probe which
/// check failed. The per-check reasons exist only as debug-level
/// diagnostics at the point of denial.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request did not prove possession of the shared secret.
    #[error("authorization denied")]
    Denied,

    /// The connection store could not be produced. Operator-visible,
    /// distinct from a denial.
    #[error("connection store unavailable: {0}")]
    Store(#[from] StoreError),
}
