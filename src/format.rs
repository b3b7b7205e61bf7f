//! Byte rendering shared by the parser, the extension handlers and the
//! unknown-extension fallback.

/// Renders bytes as lowercase two-digit hex pairs joined by `:`.
///
/// ```
/// assert_eq!(certlens::format::buffer_to_hex(&[1, 2, 3, 4]), "01:02:03:04");
/// assert_eq!(certlens::format::buffer_to_hex(&[]), "");
/// ```
pub fn buffer_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Renders a serial number as contiguous lowercase hex (no separators).
pub fn serial_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
