//! Print the display record of every certificate in a file.
//!
//! ```text
//! cargo run --example decode -- fulcio-chain.pem
//! RUST_LOG=certlens=trace cargo run --example decode -- leaf.der
//! ```

use certlens::error::CertLensError;
use certlens::{decode_x509, decode_x509_chain};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), CertLensError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certlens=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| CertLensError::InvalidInput("usage: decode <certificate file>".into()))?;
    let raw = std::fs::read(&path)
        .map_err(|e| CertLensError::InvalidInput(format!("cannot read {path}: {e}")))?;

    let records = match std::str::from_utf8(&raw) {
        Ok(text) if text.contains("-----BEGIN") => decode_x509_chain(text)?,
        _ => vec![decode_x509(&raw)?],
    };

    for record in records {
        let json = serde_json::to_string_pretty(&record)?;
        println!("{json}");
    }
    Ok(())
}
