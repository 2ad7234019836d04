//! # Inbound Ports (Driving Ports / API)
//!
//! The authorization API presented to the host gateway.

use crate::domain::entities::{ConfigStore, RequestFields};
use crate::domain::errors::AuthError;

/// Primary connection-authorization API.
///
/// Implementations must be thread-safe (`Send + Sync`): one call runs
/// per incoming request, concurrently with others, and calls share no
/// mutable state.
pub trait ConnectionAuthApi: Send + Sync {
    /// Decides one authorization attempt end to end.
    ///
    /// On success the returned store contains exactly the one
    /// configuration the request proved knowledge of, keyed by the
    /// requested connection name. Any caller-attributable failure is
    /// the opaque [`AuthError::Denied`]; a store that cannot be loaded
    /// is [`AuthError::Store`].
    fn authorize(&self, request: &RequestFields) -> Result<ConfigStore, AuthError>;
}
