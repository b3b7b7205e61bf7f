//! Certificate → display record.
//!
//! The decoder takes the standard fields from a [`CertificateParser`] and runs
//! every extension through an [`ExtensionRegistry`]. Unrecognised extensions
//! are kept as colon-separated hex, keyed by their OID.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use time::OffsetDateTime;

use crate::cert::{CertificateParser, RawCertificate, RawExtension, X509Parser};
use crate::error::Result;
use crate::format::buffer_to_hex;
use crate::pem_utils;
use crate::registry::ExtensionRegistry;

const CRITICAL_SUFFIX: &str = " (critical)";

/// The display record for one certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedCertificate {
    #[serde(rename = "Serial Number")]
    pub serial_number: String,
    #[serde(rename = "Signature")]
    pub signature: SignatureSection,
    #[serde(rename = "X509v3 extensions")]
    pub extensions: ExtensionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureSection {
    #[serde(rename = "Issuer")]
    pub issuer: String,
    #[serde(rename = "Validity")]
    pub validity: ValiditySection,
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "Subject")]
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValiditySection {
    #[serde(rename = "Not Before", with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,
    #[serde(rename = "Not After", with = "time::serde::rfc3339")]
    pub not_after: OffsetDateTime,
}

/// One decoded extension entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedExtension {
    /// Display key: the handler name, or the OID (with `" (critical)"` when
    /// critical) for unrecognised extensions.
    pub key: String,
    pub oid: String,
    pub critical: bool,
    pub value: Value,
}

/// Decoded extensions in encoded order.
///
/// Every extension is kept. Looked at as a map (`get`, JSON serialization)
/// a repeated key resolves to its last entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionMap(Vec<DecodedExtension>);

impl ExtensionMap {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().rev().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedExtension> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ExtensionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let shadowed = |i: usize| self.0[i + 1..].iter().any(|later| later.key == self.0[i].key);
        let visible: Vec<&DecodedExtension> = (0..self.0.len())
            .filter(|&i| !shadowed(i))
            .map(|i| &self.0[i])
            .collect();

        let mut map = serializer.serialize_map(Some(visible.len()))?;
        for entry in visible {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

impl DecodedCertificate {
    /// The record as a `serde_json::Value`, with keys in display order.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Decodes certificates with a parser and an extension registry.
///
/// A decoder holds no mutable state; one instance can be shared across
/// threads and reused for any number of certificates.
#[derive(Debug, Clone)]
pub struct Decoder<'r, P = X509Parser> {
    parser: P,
    registry: &'r ExtensionRegistry,
}

impl Default for Decoder<'static, X509Parser> {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder<'static, X509Parser> {
    /// `x509-cert` parsing with the standard registry.
    pub fn new() -> Self {
        Self {
            parser: X509Parser,
            registry: ExtensionRegistry::standard(),
        }
    }
}

impl<'r, P: CertificateParser> Decoder<'r, P> {
    pub fn with_parser<Q: CertificateParser>(self, parser: Q) -> Decoder<'r, Q> {
        Decoder {
            parser,
            registry: self.registry,
        }
    }

    pub fn with_registry<'s>(self, registry: &'s ExtensionRegistry) -> Decoder<'s, P> {
        Decoder {
            parser: self.parser,
            registry,
        }
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        self.registry
    }

    /// Parses and decodes one complete certificate.
    ///
    /// Parser failures abort the decode; extension payloads never do.
    pub fn decode(&self, raw: impl AsRef<[u8]>) -> Result<DecodedCertificate> {
        let cert = self.parser.parse(raw.as_ref())?;
        Ok(self.decode_parsed(&cert))
    }

    /// Decodes every certificate of a PEM bundle, in order.
    pub fn decode_chain(&self, pem: &str) -> Result<Vec<DecodedCertificate>> {
        pem_utils::certificate_chain_der(pem)?
            .iter()
            .map(|der| self.decode(der))
            .collect()
    }

    /// Builds the record from already-parsed fields.
    pub fn decode_parsed(&self, cert: &RawCertificate) -> DecodedCertificate {
        let extensions = cert
            .extensions
            .iter()
            .map(|ext| self.decode_extension(ext))
            .collect();

        tracing::debug!(
            serial = %cert.serial_number,
            extensions = cert.extensions.len(),
            "decoded certificate"
        );

        DecodedCertificate {
            serial_number: format!("0x{}", cert.serial_number),
            signature: SignatureSection {
                issuer: cert.issuer.clone(),
                validity: ValiditySection {
                    not_before: cert.not_before,
                    not_after: cert.not_after,
                },
                algorithm: cert.public_key_algorithm.clone(),
                subject: cert.subject.clone(),
            },
            extensions: ExtensionMap(extensions),
        }
    }

    fn decode_extension(&self, ext: &RawExtension) -> DecodedExtension {
        let (key, value) = match self.registry.get(&ext.oid) {
            Some(handler) => (handler.name().to_string(), handler.to_json(ext)),
            None => {
                tracing::debug!(
                    oid = %ext.oid,
                    critical = ext.critical,
                    "unrecognized extension, rendering hex"
                );
                let key = if ext.critical {
                    format!("{}{CRITICAL_SUFFIX}", ext.oid)
                } else {
                    ext.oid.clone()
                };
                (key, Value::String(buffer_to_hex(&ext.value)))
            }
        };
        tracing::trace!(oid = %ext.oid, key = %key, "decoded extension");

        DecodedExtension {
            key,
            oid: ext.oid.clone(),
            critical: ext.critical,
            value,
        }
    }
}

/// Decodes one certificate (PEM, base64 or DER) with the standard registry.
pub fn decode_x509(raw: impl AsRef<[u8]>) -> Result<DecodedCertificate> {
    Decoder::new().decode(raw)
}

/// Decodes every certificate of a PEM bundle with the standard registry.
pub fn decode_x509_chain(pem: &str) -> Result<Vec<DecodedCertificate>> {
    Decoder::new().decode_chain(pem)
}
