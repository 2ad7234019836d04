//! # Authorization Service
//!
//! The end-to-end decision procedure: applies the timestamp policy,
//! looks up the requested connection, verifies the signature, and
//! narrows the store to the single authorized entry.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`ConnectionAuthApi`)
//! - Uses the outbound ports (`ConfigSource`, `Clock`)
//! - Delegates message building and HMAC verification to the domain layer
//!
//! ## Failure Semantics
//!
//! Every caller-attributable failure short-circuits to the opaque
//! `AuthError::Denied`; which check failed is logged at debug level but
//! never reaches the caller. A store that cannot be loaded is the
//! distinct, operator-visible `AuthError::Store`.

use tracing::{debug, warn};

use crate::context::VerificationContext;
use crate::domain::entities::{ConfigStore, RequestFields};
use crate::domain::errors::AuthError;
use crate::domain::freshness::timestamp_is_fresh;
use crate::domain::signature::{canonical_message, SignatureVerifier};
use crate::ports::inbound::ConnectionAuthApi;
use crate::ports::outbound::{Clock, ConfigSource};

/// Connection authorization service.
///
/// Holds the process-wide [`VerificationContext`] (read-only after
/// construction) and the injected config source and clock. One
/// `authorize` call is self-contained; calls may run concurrently
/// without interference.
pub struct AuthService<S: ConfigSource, C: Clock> {
    context: VerificationContext,
    verifier: SignatureVerifier,
    source: S,
    clock: C,
}

impl<S: ConfigSource, C: Clock> AuthService<S, C> {
    /// Wires the service together. The verifier is keyed once from the
    /// context's secret.
    pub fn new(context: VerificationContext, source: S, clock: C) -> Self {
        let verifier = SignatureVerifier::new(context.secret.clone(), context.algorithm);
        Self {
            context,
            verifier,
            source,
            clock,
        }
    }

    /// The context this service was built with.
    pub fn context(&self) -> &VerificationContext {
        &self.context
    }
}

impl<S: ConfigSource, C: Clock> ConnectionAuthApi for AuthService<S, C> {
    fn authorize(&self, request: &RequestFields) -> Result<ConfigStore, AuthError> {
        debug!("authorization attempt");

        // A store that cannot be produced is a server fault, reported
        // before any caller-attributable check runs.
        let store = self.source.load().map_err(|e| {
            warn!(error = %e, "connection store failed to load");
            AuthError::Store(e)
        })?;

        let Some(signature) = request.signature.as_deref() else {
            debug!("request carries no signature");
            return Err(AuthError::Denied);
        };

        let Some(connection) = request.connection.as_deref() else {
            debug!("request carries no connection name");
            return Err(AuthError::Denied);
        };

        let now = self.clock.now_millis();
        if !timestamp_is_fresh(
            request.timestamp.as_deref(),
            self.context.timestamp_age_limit_ms,
            now,
        ) {
            debug!(
                timestamp = ?request.timestamp,
                age_limit_ms = self.context.timestamp_age_limit_ms,
                "timestamp missing, malformed, or stale"
            );
            return Err(AuthError::Denied);
        }

        let Some(config) = store.lookup(connection) else {
            debug!(connection, "no configuration under that name");
            return Err(AuthError::Denied);
        };

        // With the freshness check disabled the timestamp may be absent;
        // it then contributes nothing to the signed message.
        let timestamp = request.timestamp.as_deref().unwrap_or("");
        let message = canonical_message(
            timestamp,
            config,
            &self.context.server_id,
            &self.context.signed_parameters,
        );

        if !self.verifier.verify(signature, &message) {
            debug!(connection, "signature mismatch");
            return Err(AuthError::Denied);
        }

        debug!(connection, "authorized");

        // Least privilege: the caller gets back only the entry it
        // proved knowledge of, never the full store.
        store.narrow(connection).ok_or(AuthError::Denied)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ConnectionConfig, Parameter};
    use crate::domain::errors::StoreError;
    use crate::domain::signature::MacAlgorithm;

    const SERVER_ID: &str = "10000001";
    const TIMESTAMP: &str = "1373563683000";
    const NOW: u64 = 1_373_563_683_000;
    const ONE_HOUR: u64 = 3_600_000;
    // base64(hmac_sha1("1373563683000rdp10000001hostname10.2.3.4port3389", "secret"))
    const KNOWN_SIGNATURE: &str = "uvPcq+epk1wDfxlM5UOZp3bDJ2Y=";

    /// Config source serving a fixed in-memory store.
    struct FixedSource(ConfigStore);

    impl ConfigSource for FixedSource {
        fn load(&self) -> Result<ConfigStore, StoreError> {
            Ok(self.0.clone())
        }
    }

    /// Config source that always fails structurally.
    struct BrokenSource;

    impl ConfigSource for BrokenSource {
        fn load(&self) -> Result<ConfigStore, StoreError> {
            Err(StoreError::DuplicateName {
                name: "test-pc".to_string(),
            })
        }
    }

    /// Clock pinned to a fixed instant.
    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> u64 {
            self.0
        }
    }

    fn test_store() -> ConfigStore {
        ConfigStore::from_entries(vec![
            (
                "test-pc".to_string(),
                ConnectionConfig::new(
                    "rdp",
                    vec![
                        Parameter::new("hostname", "10.2.3.4"),
                        Parameter::new("port", "3389"),
                    ],
                )
                .unwrap(),
            ),
            (
                "other-pc".to_string(),
                ConnectionConfig::new(
                    "rdp",
                    vec![
                        Parameter::new("hostname", "10.9.9.9"),
                        Parameter::new("port", "3389"),
                    ],
                )
                .unwrap(),
            ),
        ])
        .unwrap()
    }

    fn context(age_limit_ms: u64) -> VerificationContext {
        let mut context = VerificationContext::new(b"secret".to_vec(), SERVER_ID).unwrap();
        context.timestamp_age_limit_ms = age_limit_ms;
        context
    }

    fn service(age_limit_ms: u64, now: u64) -> AuthService<FixedSource, FixedClock> {
        AuthService::new(
            context(age_limit_ms),
            FixedSource(test_store()),
            FixedClock(now),
        )
    }

    fn valid_request() -> RequestFields {
        RequestFields {
            connection: Some("test-pc".to_string()),
            timestamp: Some(TIMESTAMP.to_string()),
            signature: Some(KNOWN_SIGNATURE.to_string()),
        }
    }

    #[test]
    fn valid_request_is_authorized_and_narrowed() {
        let service = service(ONE_HOUR, NOW);
        let store = service.authorize(&valid_request()).unwrap();

        assert_eq!(store.len(), 1);
        let config = store.lookup("test-pc").unwrap();
        assert_eq!(config.protocol(), "rdp");
        assert!(store.lookup("other-pc").is_none());
    }

    #[test]
    fn signature_for_another_connection_is_denied() {
        // The signature was minted over test-pc's parameters; pointing
        // the request at a different stored connection must fail.
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.connection = Some("other-pc".to_string());

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn missing_signature_is_denied() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.signature = None;

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn missing_connection_is_denied() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.connection = None;

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn unknown_connection_is_denied() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.connection = Some("no-such-pc".to_string());

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn stale_timestamp_is_denied_at_exact_boundary() {
        // now == timestamp + limit: exclusive boundary, already stale.
        let service = service(ONE_HOUR, NOW + ONE_HOUR);
        assert!(matches!(
            service.authorize(&valid_request()),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn timestamp_one_millisecond_inside_window_is_authorized() {
        let service = service(ONE_HOUR, NOW + ONE_HOUR - 1);
        assert!(service.authorize(&valid_request()).is_ok());
    }

    #[test]
    fn malformed_timestamp_is_denied() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.timestamp = Some("not-a-number".to_string());

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn zero_age_limit_skips_freshness() {
        // Even an ancient timestamp passes when the limit is zero.
        let service = service(0, NOW + 1_000 * ONE_HOUR);
        assert!(service.authorize(&valid_request()).is_ok());
    }

    #[test]
    fn future_timestamp_is_accepted() {
        // Only recency is bounded; a claim ahead of server time passes.
        let service = service(ONE_HOUR, NOW - ONE_HOUR);
        assert!(service.authorize(&valid_request()).is_ok());
    }

    #[test]
    fn tampered_signature_is_denied() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.signature = Some("uvPcq+epk1wDfxlM5UOZp3bDJ2Z=".to_string());

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn malformed_base64_signature_is_denied_not_fatal() {
        let service = service(ONE_HOUR, NOW);
        let mut request = valid_request();
        request.signature = Some("!!not base64!!".to_string());

        assert!(matches!(
            service.authorize(&request),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn broken_store_is_a_server_error_not_a_denial() {
        let service = AuthService::new(context(ONE_HOUR), BrokenSource, FixedClock(NOW));
        assert!(matches!(
            service.authorize(&valid_request()),
            Err(AuthError::Store(_))
        ));
    }

    #[test]
    fn empty_store_denies_without_server_error() {
        let service = AuthService::new(
            context(ONE_HOUR),
            FixedSource(ConfigStore::empty()),
            FixedClock(NOW),
        );
        assert!(matches!(
            service.authorize(&valid_request()),
            Err(AuthError::Denied)
        ));
    }

    #[test]
    fn signature_computed_by_our_signer_verifies_end_to_end() {
        // Mint a fresh signature with the crate's own signer instead of
        // the known vector, across both digests.
        for algorithm in [MacAlgorithm::Sha1, MacAlgorithm::Sha256] {
            let mut ctx = context(ONE_HOUR);
            ctx.algorithm = algorithm;

            let store = test_store();
            let config = store.lookup("test-pc").unwrap();
            let message = canonical_message(TIMESTAMP, config, SERVER_ID, &ctx.signed_parameters);
            let signer = SignatureVerifier::new(ctx.secret.clone(), algorithm);
            let signature = signer.sign(&message);

            let service = AuthService::new(ctx, FixedSource(store.clone()), FixedClock(NOW));
            let request = RequestFields {
                connection: Some("test-pc".to_string()),
                timestamp: Some(TIMESTAMP.to_string()),
                signature: Some(signature),
            };
            assert_eq!(service.authorize(&request).unwrap().len(), 1);
        }
    }
}
