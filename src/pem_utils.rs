use base64::Engine;

use crate::error::{CertLensError, Result};

/// PEM label accepted for certificate blocks.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Tag byte of a DER `SEQUENCE`, the outer type of every certificate.
const DER_SEQUENCE_TAG: u8 = 0x30;

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new())
}

/// Convert a PEM‑encoded certificate to DER‑encoded bytes.
///
/// Only the first block is read; its label must be `CERTIFICATE`.
pub fn pem_to_der(pem_str: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    certificate_contents(&pem)
}

/// Normalise a raw certificate (PEM text, bare base64 or DER bytes) to DER.
pub fn certificate_der(raw: &[u8]) -> Result<Vec<u8>> {
    match raw.first() {
        None => Err(CertLensError::InvalidInput(
            "empty certificate input".to_string(),
        )),
        Some(&DER_SEQUENCE_TAG) => Ok(raw.to_vec()),
        Some(_) => {
            let text = std::str::from_utf8(raw).map_err(|_| {
                CertLensError::InvalidInput("certificate is neither DER nor text".to_string())
            })?;
            let text = text.trim();
            // Explanatory text may precede the boundary (RFC 7468 section 5.2).
            if text.contains("-----BEGIN") {
                pem_to_der(text)
            } else {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
            }
        }
    }
}

/// Split a PEM bundle into the DER bytes of each certificate, in order.
pub fn certificate_chain_der(pem_str: &str) -> Result<Vec<Vec<u8>>> {
    let blocks = pem::parse_many(pem_str)?;
    if blocks.is_empty() {
        return Err(CertLensError::InvalidInput(
            "no PEM blocks found".to_string(),
        ));
    }
    blocks.iter().map(certificate_contents).collect()
}

fn certificate_contents(pem: &pem::Pem) -> Result<Vec<u8>> {
    if pem.tag() != CERTIFICATE_LABEL {
        return Err(CertLensError::InvalidInput(format!(
            "expected a {CERTIFICATE_LABEL} PEM block, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DER: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x05];

    #[test]
    fn test_der_passes_through() {
        assert_eq!(certificate_der(DER).unwrap(), DER);
    }

    #[test]
    fn test_pem_and_base64_decode_to_same_der() {
        let pem = der_to_pem(DER, CERTIFICATE_LABEL);
        assert_eq!(certificate_der(pem.as_bytes()).unwrap(), DER);

        let body = base64::engine::general_purpose::STANDARD.encode(DER);
        let wrapped = format!("  {}\n{}\n", &body[..4], &body[4..]);
        assert_eq!(certificate_der(wrapped.as_bytes()).unwrap(), DER);
    }

    #[test]
    fn test_pem_with_explanatory_preamble() {
        let pem = der_to_pem(DER, CERTIFICATE_LABEL);
        let with_preamble = format!("subject=CN=leaf\nissuer=CN=ca\n{pem}");
        assert_eq!(certificate_der(with_preamble.as_bytes()).unwrap(), DER);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            certificate_der(&[]),
            Err(CertLensError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_wrong_pem_label_is_rejected() {
        let pem = der_to_pem(DER, "PRIVATE KEY");
        assert!(matches!(
            pem_to_der(&pem),
            Err(CertLensError::InvalidInput(msg)) if msg.contains("PRIVATE KEY")
        ));
    }

    #[test]
    fn test_chain_keeps_block_order() {
        let second: &[u8] = &[0x30, 0x00];
        let bundle = format!(
            "{}{}",
            der_to_pem(DER, CERTIFICATE_LABEL),
            der_to_pem(second, CERTIFICATE_LABEL)
        );
        let chain = certificate_chain_der(&bundle).unwrap();
        assert_eq!(chain, vec![DER.to_vec(), second.to_vec()]);
    }

    #[test]
    fn test_chain_without_blocks_is_rejected() {
        assert!(certificate_chain_der("not pem at all").is_err());
    }
}
