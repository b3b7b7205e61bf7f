pub mod extensions;

use bon::Builder;
use const_oid::ObjectIdentifier;
use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
};
use const_oid::db::rfc8410::{ID_ED_448, ID_ED_25519};
use der::Decode;
use time::OffsetDateTime;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::Result;
use crate::format::serial_to_hex;
use crate::pem_utils;

/// Standard fields of a parsed certificate, independent of the parser that
/// produced them.
///
/// # Fields
/// * `serial_number` - Serial number as contiguous lowercase hex.
/// * `issuer` - Issuer distinguished name (RFC 4514 string).
/// * `subject` - Subject distinguished name (RFC 4514 string).
/// * `not_before` - Start of the validity window.
/// * `not_after` - End of the validity window.
/// * `public_key_algorithm` - Display name of the subject key algorithm.
/// * `extensions` - Extensions in their encoded order.
#[derive(Clone, Debug, Builder, PartialEq)]
pub struct RawCertificate {
    #[builder(default, into)]
    pub serial_number: String,
    #[builder(default, into)]
    pub issuer: String,
    #[builder(default, into)]
    pub subject: String,
    #[builder(default = OffsetDateTime::UNIX_EPOCH)]
    pub not_before: OffsetDateTime,
    #[builder(default = OffsetDateTime::UNIX_EPOCH)]
    pub not_after: OffsetDateTime,
    #[builder(default, into)]
    pub public_key_algorithm: String,
    #[builder(default)]
    pub extensions: Vec<RawExtension>,
}

/// A single certificate extension as it appears on the wire.
///
/// # Fields
/// * `oid` - The object identifier, dotted-decimal.
/// * `critical` - Whether the extension is marked critical.
/// * `value` - The contents of `extnValue` (the DER encoding of the extension).
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct RawExtension {
    #[builder(into)]
    pub oid: String,
    #[builder(default)]
    pub critical: bool,
    #[builder(default, into)]
    pub value: Vec<u8>,
}

impl From<&x509_cert::ext::Extension> for RawExtension {
    fn from(ext: &x509_cert::ext::Extension) -> Self {
        Self {
            oid: ext.extn_id.to_string(),
            critical: ext.critical,
            value: ext.extn_value.as_bytes().to_vec(),
        }
    }
}

impl RawCertificate {
    /// Extracts the standard fields and extension list of an `x509_cert`
    /// certificate.
    pub fn from_x509(cert: &x509_cert::Certificate) -> Self {
        let tbs = &cert.tbs_certificate;

        let extensions = tbs
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(RawExtension::from)
            .collect();

        Self {
            serial_number: serial_to_hex(tbs.serial_number.as_bytes()),
            issuer: tbs.issuer.to_string(),
            subject: tbs.subject.to_string(),
            not_before: OffsetDateTime::from(tbs.validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(tbs.validity.not_after.to_system_time()),
            public_key_algorithm: public_key_algorithm_name(&tbs.subject_public_key_info),
            extensions,
        }
    }
}

/// Turns raw certificate input into its standard fields.
///
/// This is the seam between the decoder and the ASN.1 library; the decoder
/// only ever sees `RawCertificate`.
pub trait CertificateParser {
    /// Parses one complete certificate. Malformed input is an error.
    fn parse(&self, raw: &[u8]) -> Result<RawCertificate>;
}

impl<F> CertificateParser for F
where
    F: Fn(&[u8]) -> Result<RawCertificate>,
{
    fn parse(&self, raw: &[u8]) -> Result<RawCertificate> {
        self(raw)
    }
}

/// `x509-cert` backed parser accepting PEM, bare base64 or DER input.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Parser;

impl CertificateParser for X509Parser {
    fn parse(&self, raw: &[u8]) -> Result<RawCertificate> {
        let der = pem_utils::certificate_der(raw)?;
        let cert = x509_cert::Certificate::from_der(&der)?;
        Ok(RawCertificate::from_x509(&cert))
    }
}

/// Display name for the subject public key algorithm, falling back to the
/// dotted OID.
pub fn public_key_algorithm_name(spki: &SubjectPublicKeyInfoOwned) -> String {
    let oid = spki.algorithm.oid;
    if oid == ID_EC_PUBLIC_KEY {
        let curve = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|params| ObjectIdentifier::from_bytes(params.value()).ok());
        return match curve {
            Some(SECP_256_R_1) => "ECDSA P-256".to_string(),
            Some(SECP_384_R_1) => "ECDSA P-384".to_string(),
            Some(SECP_521_R_1) => "ECDSA P-521".to_string(),
            _ => "ECDSA".to_string(),
        };
    }

    match oid {
        RSA_ENCRYPTION => "RSA".to_string(),
        ID_ED_25519 => "Ed25519".to_string(),
        ID_ED_448 => "Ed448".to_string(),
        other => other.to_string(),
    }
}
