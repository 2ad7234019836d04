//! # Gatelock Signer
//!
//! Mints an HMAC-signed connection URL a gateway client can open
//! directly. The secret, server id, and signing policy come from the
//! same environment variables the verifying service reads, so a URL
//! produced here verifies against a service configured identically.
//!
//! ```text
//! GATELOCK_SECRET=secret GATELOCK_SERVER_ID=10000001 \
//!     gatelock-signer --connection test-pc --protocol rdp \
//!     --param hostname=10.2.3.4 --param port=3389
//! ```

use anyhow::{bail, Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gatelock_auth::{
    canonical_message, Clock, ConnectionConfig, Parameter, SignatureVerifier, SystemClock,
    VerificationContext, CONNECTION_PARAM, SIGNATURE_PARAM, TIMESTAMP_PARAM,
};

/// Parsed command line.
struct Args {
    connection: String,
    protocol: String,
    params: Vec<Parameter>,
    base_url: String,
}

const USAGE: &str = "usage: gatelock-signer --connection <name> --protocol <proto> \
                     [--param <name>=<value>]... [--base-url <url>]";

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args> {
    let mut connection = None;
    let mut protocol = None;
    let mut params = Vec::new();
    let mut base_url = "http://localhost:8080/gateway/".to_string();

    while let Some(flag) = argv.next() {
        match flag.as_str() {
            "--connection" => connection = argv.next(),
            "--protocol" => protocol = argv.next(),
            "--base-url" => {
                base_url = argv.next().with_context(|| USAGE.to_string())?;
            }
            "--param" => {
                let raw = argv.next().with_context(|| USAGE.to_string())?;
                let (name, value) = raw
                    .split_once('=')
                    .with_context(|| format!("--param expects name=value, got {raw:?}"))?;
                params.push(Parameter::new(name, value));
            }
            "--help" | "-h" => bail!("{USAGE}"),
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }

    let Some(connection) = connection else {
        bail!("--connection is required\n{USAGE}");
    };
    let Some(protocol) = protocol else {
        bail!("--protocol is required\n{USAGE}");
    };

    Ok(Args {
        connection,
        protocol,
        params,
        base_url,
    })
}

/// Percent-encodes a query value (everything but unreserved characters).
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

fn signed_url(args: &Args, context: &VerificationContext, timestamp_ms: u64) -> Result<String> {
    let config = ConnectionConfig::new(args.protocol.clone(), args.params.clone())?;

    let timestamp = timestamp_ms.to_string();
    let message = canonical_message(
        &timestamp,
        &config,
        &context.server_id,
        &context.signed_parameters,
    );
    debug!(message, "canonical message assembled");

    let signer = SignatureVerifier::new(context.secret.clone(), context.algorithm);
    let signature = signer.sign(&message);

    Ok(format!(
        "{base}#/client/{name}?{TIMESTAMP_PARAM}={timestamp}\
         &{CONNECTION_PARAM}={name}&{SIGNATURE_PARAM}={signature}",
        base = args.base_url,
        name = encode_query_value(&args.connection),
        signature = encode_query_value(&signature),
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let context = VerificationContext::from_env().context("startup configuration")?;
    let timestamp_ms = SystemClock.now_millis();

    println!("{}", signed_url(&args, &context, timestamp_ms)?);
    Ok(())
}
