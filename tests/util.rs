#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use const_oid::db::rfc5912::ECDSA_WITH_SHA_256;
use der::Encode;
use der::asn1::{BitString, OctetString, UtcTime};
use der::oid::ObjectIdentifier;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use sha1::{Digest, Sha1};
use x509_cert::certificate::{Certificate, TbsCertificate, Version};
use x509_cert::ext::Extension;
use x509_cert::name::RdnSequence;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::{Time, Validity};

use certlens::pem_utils::{CERTIFICATE_LABEL, der_to_pem};

pub const NOT_BEFORE: u64 = 1_700_000_000;
pub const NOT_AFTER: u64 = 1_700_000_600;
pub const SERIAL: [u8; 2] = [0x01, 0x2a];

/// Deterministic P-256 key so fixtures are reproducible.
pub fn signing_key() -> SigningKey {
    SigningKey::from_slice(&[7u8; 32]).unwrap()
}

pub fn subject_public_key_info() -> SubjectPublicKeyInfoOwned {
    SubjectPublicKeyInfoOwned::from_key(*signing_key().verifying_key()).unwrap()
}

/// SHA-1 of the subject public key, as CAs compute key identifiers.
pub fn key_id() -> Vec<u8> {
    let spki = subject_public_key_info();
    Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec()
}

/// Wraps an encoded extension value.
pub fn extension(oid: ObjectIdentifier, critical: bool, value: impl Into<Vec<u8>>) -> Extension {
    Extension {
        extn_id: oid,
        critical,
        extn_value: OctetString::new(value.into()).unwrap(),
    }
}

/// DER-encodes an extension payload type.
pub fn encode<T: Encode>(value: &T) -> Vec<u8> {
    value.to_der().unwrap()
}

fn utc(secs: u64) -> Time {
    Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

/// Builds and signs a DER certificate with the fixture key.
pub fn build_cert(issuer: &str, subject: &str, extensions: Vec<Extension>) -> Vec<u8> {
    let tbs_certificate = TbsCertificate {
        version: Version::V3,
        serial_number: SerialNumber::new(&SERIAL).unwrap(),
        signature: AlgorithmIdentifierOwned {
            oid: ECDSA_WITH_SHA_256,
            parameters: None,
        },
        issuer: RdnSequence::from_str(issuer).unwrap(),
        validity: Validity {
            not_before: utc(NOT_BEFORE),
            not_after: utc(NOT_AFTER),
        },
        subject: RdnSequence::from_str(subject).unwrap(),
        subject_public_key_info: subject_public_key_info(),
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: if extensions.is_empty() {
            None
        } else {
            Some(extensions)
        },
    };

    let signature: Signature = signing_key().sign(&tbs_certificate.to_der().unwrap());

    let cert = Certificate {
        tbs_certificate,
        signature_algorithm: AlgorithmIdentifierOwned {
            oid: ECDSA_WITH_SHA_256,
            parameters: None,
        },
        signature: BitString::from_bytes(&signature.to_bytes()).unwrap(),
    };
    cert.to_der().unwrap()
}

pub fn build_cert_pem(issuer: &str, subject: &str, extensions: Vec<Extension>) -> String {
    der_to_pem(&build_cert(issuer, subject, extensions), CERTIFICATE_LABEL)
}
