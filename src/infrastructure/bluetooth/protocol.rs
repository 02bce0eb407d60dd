//! Serial-over-BLE Protocol
//!
//! Constants and helpers for talking to HM-10 style BLE UART modules, which
//! expose a single GATT characteristic that forwards written bytes to the
//! device's serial port.

use crate::infrastructure::bluetooth::transport::TransportError;

/// BLE UART service UUID (HM-10 / CC254x modules)
pub const SERIAL_SERVICE_UUID: &str = "0000ffe0-0000-1000-8000-00805f9b34fb";

/// Characteristic that forwards writes to the module's serial port
pub const SERIAL_WRITE_CHAR_UUID: &str = "0000ffe1-0000-1000-8000-00805f9b34fb";

/// Largest write payload accepted without MTU negotiation (23 byte ATT MTU minus header)
pub const MAX_WRITE_CHUNK: usize = 20;

/// Parse a Bluetooth address such as `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff`
/// or bare hex into its 48-bit integer form.
pub fn parse_address(address: &str) -> Result<u64, TransportError> {
    let hex: String = address
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();

    if hex.is_empty() || hex.len() > 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TransportError::InvalidAddress(address.to_string()));
    }

    u64::from_str_radix(&hex, 16).map_err(|_| TransportError::InvalidAddress(address.to_string()))
}

/// Format a 48-bit address as `AA:BB:CC:DD:EE:FF`
pub fn format_address(address: u64) -> String {
    (0..6)
        .rev()
        .map(|i| format!("{:02X}", (address >> (i * 8)) & 0xFF))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a UUID string into its 128-bit value
pub fn parse_uuid(uuid_str: &str) -> Result<u128, TransportError> {
    let hex = uuid_str.replace('-', "");

    if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TransportError::InvalidUuid(uuid_str.to_string()));
    }

    u128::from_str_radix(&hex, 16).map_err(|_| TransportError::InvalidUuid(uuid_str.to_string()))
}

/// Encode a command as the bytes that go on the wire.
///
/// Commands are plain ASCII; anything else is rejected instead of being
/// mangled by the receiver.
pub fn encode_message(message: &str) -> Result<&[u8], TransportError> {
    if !message.is_ascii() {
        return Err(TransportError::WriteFailed(format!(
            "non-ASCII message: {:?}",
            message
        )));
    }
    Ok(message.as_bytes())
}

/// Split a payload into writes no larger than `chunk_size`
pub fn chunk_payload(payload: &[u8], chunk_size: usize) -> impl Iterator<Item = &[u8]> {
    payload.chunks(chunk_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_formats() {
        assert_eq!(parse_address("AA:BB:CC:DD:EE:FF").unwrap(), 0xAABBCCDDEEFF);
        assert_eq!(parse_address("aa-bb-cc-dd-ee-ff").unwrap(), 0xAABBCCDDEEFF);
        assert_eq!(parse_address(" 001122334455 ").unwrap(), 0x001122334455);
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address(""),
            Err(TransportError::InvalidAddress(_))
        ));
        assert!(parse_address("not an address").is_err());
        assert!(parse_address("AA:BB:CC:DD:EE:FF:00").is_err());
        assert!(parse_address("+1").is_err());
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0xAABBCCDDEEFF), "AA:BB:CC:DD:EE:FF");
        assert_eq!(format_address(0x1), "00:00:00:00:00:01");
    }

    #[test]
    fn test_parse_uuid() {
        let uuid = parse_uuid(SERIAL_SERVICE_UUID).unwrap();
        assert_eq!(uuid >> 96, 0x0000ffe0);
        assert!(parse_uuid("ffe0").is_err());
        // from_str_radix alone would take a sign
        assert!(parse_uuid("+000ffe0-0000-1000-8000-00805f9b34fb").is_err());
        assert!(parse_uuid("0000ffe0-0000-1000-8000-00805f9b34fz").is_err());
    }

    #[test]
    fn test_encode_message() {
        assert_eq!(encode_message("50,50,0|").unwrap(), b"50,50,0|");
        assert!(encode_message("50,50,0|\u{00e9}").is_err());
    }

    #[test]
    fn test_chunk_payload() {
        let payload = b"-2147483648,-2147483648,-1|";
        let chunks: Vec<_> = chunk_payload(payload, MAX_WRITE_CHUNK).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 20);
        assert_eq!(chunks.concat(), payload.to_vec());

        assert_eq!(chunk_payload(b"50,50,0|", MAX_WRITE_CHUNK).count(), 1);
    }
}
