use std::net::{Ipv4Addr, Ipv6Addr};

use const_oid::db::rfc5912::{
    ID_KP_CLIENT_AUTH, ID_KP_CODE_SIGNING, ID_KP_EMAIL_PROTECTION, ID_KP_OCSP_SIGNING,
    ID_KP_SERVER_AUTH, ID_KP_TIME_STAMPING,
};
use der::{Decode, Encode, asn1::Utf8StringRef, oid::ObjectIdentifier};
use serde::Serialize;
use serde_json::{Value, json};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};

use crate::error::Result;
use crate::format::buffer_to_hex;

/// Key usage flags in display order, keyed by their bit value in the
/// integer bitmask (bit 0 is `digitalSignature`).
pub const KEY_USAGE_NAMES: [(u16, &str); 9] = [
    (1, "Digital Signature"),
    (2, "Non Repudiation"),
    (4, "Key Encipherment"),
    (8, "Data Encipherment"),
    (16, "Key Agreement"),
    (32, "Certificate Sign"),
    (64, "CRL Sign"),
    (128, "Encipher Only"),
    (256, "Decipher Only"),
];

/// Names of the usages set in `mask`, in table order.
pub fn key_usage_names(mask: u16) -> Vec<&'static str> {
    KEY_USAGE_NAMES
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Display name of an extended key usage purpose, or its dotted OID.
pub fn extended_key_usage_name(oid: &ObjectIdentifier) -> String {
    match *oid {
        ID_KP_SERVER_AUTH => "TLS Web Server Authentication".to_string(),
        ID_KP_CLIENT_AUTH => "TLS Web Client Authentication".to_string(),
        ID_KP_CODE_SIGNING => "Code Signing".to_string(),
        ID_KP_EMAIL_PROTECTION => "E-mail Protection".to_string(),
        ID_KP_TIME_STAMPING => "Time Stamping".to_string(),
        ID_KP_OCSP_SIGNING => "OCSP Signing".to_string(),
        other => other.to_string(),
    }
}

/// A general name tagged with its kind, as listed in SAN and AKI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TypedName {
    Email(String),
    Dns(String),
    Uri(String),
    Ip(String),
    DirectoryName(String),
    RegisteredId(String),
    OtherName(OtherNameValue),
    EdiPartyName(String),
}

/// `otherName` payload. UTF8String values are decoded, anything else is hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherNameValue {
    pub oid: String,
    pub value: String,
}

impl From<&GeneralName> for TypedName {
    fn from(name: &GeneralName) -> Self {
        match name {
            GeneralName::OtherName(other) => TypedName::OtherName(OtherNameValue {
                oid: other.type_id.to_string(),
                value: other
                    .value
                    .decode_as::<String>()
                    .unwrap_or_else(|_| buffer_to_hex(other.value.value())),
            }),
            GeneralName::Rfc822Name(email) => TypedName::Email(email.to_string()),
            GeneralName::DnsName(dns) => TypedName::Dns(dns.to_string()),
            GeneralName::DirectoryName(dn) => TypedName::DirectoryName(dn.to_string()),
            GeneralName::EdiPartyName(edi) => {
                TypedName::EdiPartyName(edi.to_der().map(|d| buffer_to_hex(&d)).unwrap_or_default())
            }
            GeneralName::UniformResourceIdentifier(uri) => TypedName::Uri(uri.to_string()),
            GeneralName::IpAddress(ip) => TypedName::Ip(format_ip(ip.as_bytes())),
            GeneralName::RegisteredId(oid) => TypedName::RegisteredId(oid.to_string()),
        }
    }
}

fn format_ip(bytes: &[u8]) -> String {
    if let Ok(v4) = <[u8; 4]>::try_from(bytes) {
        Ipv4Addr::from(v4).to_string()
    } else if let Ok(v6) = <[u8; 16]>::try_from(bytes) {
        Ipv6Addr::from(v6).to_string()
    } else {
        buffer_to_hex(bytes)
    }
}

/// JSON view of Basic Constraints. `pathlen` only appears when encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicConstraintsView {
    #[serde(rename = "CA")]
    pub ca: bool,
    #[serde(rename = "pathlen", skip_serializing_if = "Option::is_none")]
    pub path_len: Option<u8>,
}

/// JSON view of Authority Key Identifier.
///
/// Absent parts serialize as `null` (the JSON stand-in for an undefined
/// value); both keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorityKeyIdView {
    pub keyid: Option<String>,
    pub certid: Option<AuthorityCertId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorityCertId {
    pub issuer: Vec<TypedName>,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
}

/// Subject Key Identifier: a one-element list holding the key id in hex.
pub fn subject_key_identifier(der: &[u8]) -> Result<Value> {
    let ski = SubjectKeyIdentifier::from_der(der)?;
    Ok(json!([buffer_to_hex(ski.0.as_bytes())]))
}

pub fn key_usage(der: &[u8]) -> Result<Value> {
    let ku = KeyUsage::from_der(der)?;
    Ok(json!(key_usage_names(ku.0.bits())))
}

pub fn subject_alt_name(der: &[u8]) -> Result<Value> {
    let san = SubjectAltName::from_der(der)?;
    let names: Vec<TypedName> = san.0.iter().map(TypedName::from).collect();
    Ok(serde_json::to_value(names)?)
}

pub fn basic_constraints(der: &[u8]) -> Result<Value> {
    let bc = BasicConstraints::from_der(der)?;
    Ok(serde_json::to_value(BasicConstraintsView {
        ca: bc.ca,
        path_len: bc.path_len_constraint,
    })?)
}

pub fn authority_key_identifier(der: &[u8]) -> Result<Value> {
    let aki = AuthorityKeyIdentifier::from_der(der)?;

    let certid = match (&aki.authority_cert_issuer, &aki.authority_cert_serial_number) {
        (None, None) => None,
        (issuer, serial) => Some(AuthorityCertId {
            issuer: issuer
                .as_ref()
                .map(|names| names.iter().map(TypedName::from).collect())
                .unwrap_or_default(),
            serial_number: serial.as_ref().map(|sn| buffer_to_hex(sn.as_bytes())),
        }),
    };

    Ok(serde_json::to_value(AuthorityKeyIdView {
        keyid: aki.key_identifier.map(|id| buffer_to_hex(id.as_bytes())),
        certid,
    })?)
}

pub fn extended_key_usage(der: &[u8]) -> Result<Value> {
    let eku = ExtendedKeyUsage::from_der(der)?;
    let names: Vec<String> = eku.0.iter().map(extended_key_usage_name).collect();
    Ok(json!(names))
}

/// Fulcio v1 extensions carry the bare UTF-8 bytes, no DER wrapping.
pub fn raw_text(bytes: &[u8]) -> Result<Value> {
    Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Fulcio v2 extensions carry a DER UTF8String.
pub fn utf8_string(der: &[u8]) -> Result<Value> {
    let s = Utf8StringRef::from_der(der)?;
    Ok(Value::String(s.to_string()))
}
