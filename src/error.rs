//! use certlens::error::CertLensError;

use thiserror::Error;

/// Represents errors that can occur while decoding a certificate.
///
/// Extension handlers never produce these; only the certificate-level
/// parse (input format, DER structure) and JSON conversion can fail.
#[derive(Debug, Error, Clone)]
pub enum CertLensError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CertLensError>;

impl From<der::Error> for CertLensError {
    /// Converts a `der::Error` into a `CertLensError`.
    fn from(err: der::Error) -> Self {
        CertLensError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertLensError {
    fn from(err: pem::PemError) -> Self {
        CertLensError::InvalidInput(format!("malformed PEM: {err}"))
    }
}

impl From<base64::DecodeError> for CertLensError {
    fn from(err: base64::DecodeError) -> Self {
        CertLensError::InvalidInput(format!("malformed base64: {err}"))
    }
}

impl From<serde_json::Error> for CertLensError {
    fn from(err: serde_json::Error) -> Self {
        CertLensError::EncodingError(err.to_string())
    }
}
