//! # Canonical Message & HMAC Signature Verification
//!
//! The wire contract of the protocol lives here: the exact byte
//! sequence that is signed, and the keyed-hash computation over it.
//!
//! ## Security Notes
//!
//! - **Constant-Time Comparison**: tag comparison goes through
//!   `Mac::verify_slice`, which runs in fixed time regardless of where
//!   the first mismatching byte occurs.
//! - **Opaque Decode Failures**: malformed base64 yields `false`, never
//!   an error the caller could distinguish from a wrong signature.
//! - **Secret Hygiene**: the shared secret is zeroized on drop.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::entities::ConnectionConfig;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Digest underlying the HMAC.
///
/// This is a wire-compatibility concern, not an internal choice: both
/// signer and verifier must agree on it. The original protocol uses
/// SHA-1, so that is the default; deployments that control both sides
/// may opt into SHA-256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MacAlgorithm {
    /// HMAC-SHA1, the wire-compatible default.
    #[default]
    Sha1,
    /// HMAC-SHA256 for deployments that control both signer and verifier.
    Sha256,
}

/// Computes and verifies HMAC signatures under one shared secret.
///
/// Secrets of any length are accepted; the HMAC construction hashes
/// keys longer than the block size and zero-pads shorter ones, per the
/// chosen digest's rules.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
    #[zeroize(skip)]
    algorithm: MacAlgorithm,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in debug output.
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SignatureVerifier {
    /// Creates a verifier keyed by `secret`.
    pub fn new(secret: impl Into<Vec<u8>>, algorithm: MacAlgorithm) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
        }
    }

    /// Computes the raw HMAC over the UTF-8 bytes of `message`.
    ///
    /// An empty message is valid input.
    pub fn compute_signature(&self, message: &str) -> Vec<u8> {
        match self.algorithm {
            MacAlgorithm::Sha1 => {
                let mut mac = HmacSha1::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(message.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            MacAlgorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(message.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Signs `message` and returns the base64-encoded signature.
    ///
    /// This is the signer-side counterpart of [`verify`](Self::verify),
    /// used by the signer CLI and by tests.
    pub fn sign(&self, message: &str) -> String {
        BASE64.encode(self.compute_signature(message))
    }

    /// Verifies a base64-encoded signature against `message`.
    ///
    /// Returns `false` for malformed base64 and for any tag that is not
    /// exactly the HMAC of `message`; the comparison is constant-time.
    pub fn verify(&self, provided_base64: &str, message: &str) -> bool {
        let provided = match BASE64.decode(provided_base64) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        match self.algorithm {
            MacAlgorithm::Sha1 => {
                let mut mac = HmacSha1::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(message.as_bytes());
                mac.verify_slice(&provided).is_ok()
            }
            MacAlgorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(&self.secret)
                    .expect("HMAC can take key of any size");
                mac.update(message.as_bytes());
                mac.verify_slice(&provided).is_ok()
            }
        }
    }
}

/// Builds the canonical message for one signed request.
///
/// Order is the wire contract and must match on signer and verifier:
///
/// ```text
/// timestamp + protocol + server_id
///           + (name + value) for each signed parameter, in policy order
/// ```
///
/// Signed parameters absent from the configuration are skipped
/// entirely, with no placeholder or separator.
pub fn canonical_message(
    timestamp: &str,
    config: &ConnectionConfig,
    server_id: &str,
    signed_parameters: &[String],
) -> String {
    let mut message =
        String::with_capacity(timestamp.len() + config.protocol().len() + server_id.len() + 32);
    message.push_str(timestamp);
    message.push_str(config.protocol());
    message.push_str(server_id);

    for name in signed_parameters {
        if let Some(value) = config.parameter(name) {
            message.push_str(name);
            message.push_str(value);
        }
    }

    message
}

// =============================================================================
// TESTS
// =============================================================================
