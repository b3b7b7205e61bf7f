//! # CertLens - X.509 Certificates as Display-Ready JSON
//!
//! CertLens turns an X.509 certificate into a stable JSON record for a
//! supply-chain trust console: the standard fields (serial, issuer, subject,
//! validity, key algorithm) plus every extension, with the well-known ones
//! (RFC 5280 and the Sigstore/Fulcio OID arc) rendered as readable values and
//! everything else kept as colon-separated hex.
//!
//! It does not verify signatures, chains or revocation. Decoding is a pure,
//! synchronous transform; decoders and registries can be shared across threads.
//!
//! ## Supported Inputs
//!
//! - **PEM**: `-----BEGIN CERTIFICATE-----` blocks, single or bundled
//! - **Base64**: the bare PEM body, whitespace tolerated
//! - **DER**: raw bytes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use certlens::decoder::decode_x509;
//!
//! # fn main() -> Result<(), certlens::error::CertLensError> {
//! let pem = std::fs::read_to_string("fulcio-leaf.pem").unwrap();
//! let decoded = decode_x509(&pem)?;
//!
//! println!("issued by {}", decoded.signature.issuer);
//! if let Some(issuer) = decoded.extensions.get("OIDC Issuer") {
//!     println!("OIDC issuer: {issuer}");
//! }
//! println!("{}", serde_json::to_string_pretty(&decoded.to_json()?).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ### Bringing Your Own Parser or Registry
//!
//! ```rust
//! use certlens::cert::{RawCertificate, RawExtension};
//! use certlens::decoder::Decoder;
//! use certlens::error::Result;
//!
//! let parser = |_: &[u8]| -> Result<RawCertificate> {
//!     Ok(RawCertificate::builder()
//!         .issuer("Issuer Name")
//!         .extensions(vec![RawExtension::builder()
//!             .oid("1.2.3.4")
//!             .critical(true)
//!             .value([1u8, 2, 3, 4])
//!             .build()])
//!         .build())
//! };
//!
//! let decoded = Decoder::new().with_parser(parser).decode(b"").unwrap();
//! assert_eq!(decoded.signature.issuer, "Issuer Name");
//! assert_eq!(
//!     decoded.extensions.get("1.2.3.4 (critical)"),
//!     Some(&serde_json::json!("01:02:03:04"))
//! );
//! ```
//!
//! ## Module Organization
//!
//! - [`decoder`]: the decode entry points and the output record
//! - [`registry`]: OID → handler table, built once
//! - [`cert`]: parsed certificate fields, the parser seam, extension transforms
//! - [`pem_utils`]: input normalisation (PEM / base64 / DER, bundles)
//! - [`format`]: hex rendering
//! - [`error`]: error types

pub mod cert;
pub mod decoder;
pub mod error;
pub mod format;
pub mod pem_utils;
pub mod registry;

pub use decoder::{DecodedCertificate, Decoder, decode_x509, decode_x509_chain};
