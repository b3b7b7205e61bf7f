//! OID → handler table used to turn extension payloads into display JSON.
//!
//! The standard registry is built once on first use and never mutated.
//! Handlers are plain function pointers, so a registry is `Send + Sync` and
//! can be shared by any number of concurrent decoders.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use const_oid::AssociatedOid;
use der::oid::ObjectIdentifier;
use serde_json::Value;
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};

use crate::cert::RawExtension;
use crate::cert::extensions;
use crate::error::Result;
use crate::format::buffer_to_hex;

/// Transform from an extension payload to its JSON value.
pub type ToJson = fn(&[u8]) -> Result<Value>;

/// What a handler renders when its payload cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// An empty JSON array, for list-shaped outputs.
    EmptyList,
    /// The raw payload as colon-separated hex.
    Hex,
}

impl Fallback {
    fn value(self, payload: &[u8]) -> Value {
        match self {
            Fallback::EmptyList => Value::Array(Vec::new()),
            Fallback::Hex => Value::String(buffer_to_hex(payload)),
        }
    }
}

/// A registry entry: display name plus a pure payload transform.
#[derive(Clone, Copy)]
pub struct ExtensionHandler {
    name: &'static str,
    to_json: ToJson,
    fallback: Fallback,
}

impl ExtensionHandler {
    pub const fn new(name: &'static str, to_json: ToJson, fallback: Fallback) -> Self {
        Self {
            name,
            to_json,
            fallback,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// Renders the extension. Never fails: a payload the transform rejects
    /// is rendered as the handler's fallback.
    pub fn to_json(&self, ext: &RawExtension) -> Value {
        match (self.to_json)(&ext.value) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(
                    oid = %ext.oid,
                    name = self.name,
                    error = %err,
                    "extension payload did not decode, using fallback"
                );
                self.fallback.value(&ext.value)
            }
        }
    }
}

impl fmt::Debug for ExtensionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionHandler")
            .field("name", &self.name)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Fulcio OID arc, `1.3.6.1.4.1.57264.1.*`.
pub mod fulcio {
    use der::oid::ObjectIdentifier;

    pub const ISSUER: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.1");
    pub const GITHUB_WORKFLOW_TRIGGER: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.2");
    pub const GITHUB_WORKFLOW_SHA: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.3");
    pub const GITHUB_WORKFLOW_NAME: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.4");
    pub const GITHUB_WORKFLOW_REPOSITORY: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.5");
    pub const GITHUB_WORKFLOW_REF: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.6");
    pub const ISSUER_V2: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.8");
    pub const BUILD_SIGNER_URI: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.9");
    pub const BUILD_SIGNER_DIGEST: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.10");
    pub const RUNNER_ENVIRONMENT: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.11");
    pub const SOURCE_REPOSITORY_URI: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.12");
    pub const SOURCE_REPOSITORY_DIGEST: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.13");
    pub const SOURCE_REPOSITORY_REF: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.14");
    pub const SOURCE_REPOSITORY_IDENTIFIER: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.15");
    pub const SOURCE_REPOSITORY_OWNER_URI: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.16");
    pub const SOURCE_REPOSITORY_OWNER_IDENTIFIER: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.17");
    pub const BUILD_CONFIG_URI: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.18");
    pub const BUILD_CONFIG_DIGEST: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.19");
    pub const BUILD_TRIGGER: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.20");
    pub const RUN_INVOCATION_URI: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.21");
    pub const SOURCE_REPOSITORY_VISIBILITY: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.22");
}

/// Immutable mapping from dotted OID to handler.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    handlers: HashMap<String, ExtensionHandler>,
}

static STANDARD: LazyLock<ExtensionRegistry> = LazyLock::new(ExtensionRegistry::build_standard);

impl ExtensionRegistry {
    /// The built-in registry: RFC 5280 extensions plus the Fulcio arc.
    pub fn standard() -> &'static ExtensionRegistry {
        &STANDARD
    }

    /// Builds a registry from explicit entries. Later entries for the same
    /// OID replace earlier ones.
    pub fn from_handlers<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ObjectIdentifier, ExtensionHandler)>,
    {
        Self {
            handlers: entries
                .into_iter()
                .map(|(oid, handler)| (oid.to_string(), handler))
                .collect(),
        }
    }

    pub fn get(&self, oid: &str) -> Option<&ExtensionHandler> {
        self.handlers.get(oid)
    }

    pub fn contains(&self, oid: &str) -> bool {
        self.handlers.contains_key(oid)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionHandler)> {
        self.handlers.iter().map(|(oid, h)| (oid.as_str(), h))
    }

    fn build_standard() -> Self {
        use Fallback::{EmptyList, Hex};

        let v1 = |name| ExtensionHandler::new(name, extensions::raw_text, Hex);
        let v2 = |name| ExtensionHandler::new(name, extensions::utf8_string, Hex);

        Self::from_handlers([
            (
                SubjectKeyIdentifier::OID,
                ExtensionHandler::new(
                    "Subject Key Identifier",
                    extensions::subject_key_identifier,
                    EmptyList,
                ),
            ),
            (
                KeyUsage::OID,
                ExtensionHandler::new("Key Usage", extensions::key_usage, EmptyList),
            ),
            (
                SubjectAltName::OID,
                ExtensionHandler::new(
                    "Subject Alternative Name",
                    extensions::subject_alt_name,
                    EmptyList,
                ),
            ),
            (
                BasicConstraints::OID,
                ExtensionHandler::new("Basic Constraints", extensions::basic_constraints, Hex),
            ),
            (
                AuthorityKeyIdentifier::OID,
                ExtensionHandler::new(
                    "Authority Key Identifier",
                    extensions::authority_key_identifier,
                    Hex,
                ),
            ),
            (
                ExtendedKeyUsage::OID,
                ExtensionHandler::new(
                    "Extended Key Usage",
                    extensions::extended_key_usage,
                    EmptyList,
                ),
            ),
            (fulcio::ISSUER, v1("OIDC Issuer")),
            (fulcio::GITHUB_WORKFLOW_TRIGGER, v1("GitHub Workflow Trigger")),
            (fulcio::GITHUB_WORKFLOW_SHA, v1("GitHub Workflow SHA")),
            (fulcio::GITHUB_WORKFLOW_NAME, v1("GitHub Workflow Name")),
            (fulcio::GITHUB_WORKFLOW_REPOSITORY, v1("GitHub Workflow Repository")),
            (fulcio::GITHUB_WORKFLOW_REF, v1("GitHub Workflow Ref")),
            (fulcio::ISSUER_V2, v2("OIDC Issuer (v2)")),
            (fulcio::BUILD_SIGNER_URI, v2("Build Signer URI")),
            (fulcio::BUILD_SIGNER_DIGEST, v2("Build Signer Digest")),
            (fulcio::RUNNER_ENVIRONMENT, v2("Runner Environment")),
            (fulcio::SOURCE_REPOSITORY_URI, v2("Source Repository URI")),
            (fulcio::SOURCE_REPOSITORY_DIGEST, v2("Source Repository Digest")),
            (fulcio::SOURCE_REPOSITORY_REF, v2("Source Repository Ref")),
            (fulcio::SOURCE_REPOSITORY_IDENTIFIER, v2("Source Repository Identifier")),
            (fulcio::SOURCE_REPOSITORY_OWNER_URI, v2("Source Repository Owner URI")),
            (
                fulcio::SOURCE_REPOSITORY_OWNER_IDENTIFIER,
                v2("Source Repository Owner Identifier"),
            ),
            (fulcio::BUILD_CONFIG_URI, v2("Build Config URI")),
            (fulcio::BUILD_CONFIG_DIGEST, v2("Build Config Digest")),
            (fulcio::BUILD_TRIGGER, v2("Build Trigger")),
            (fulcio::RUN_INVOCATION_URI, v2("Run Invocation URI")),
            (
                fulcio::SOURCE_REPOSITORY_VISIBILITY,
                v2("Source Repository Visibility At Signing"),
            ),
        ])
    }
}
