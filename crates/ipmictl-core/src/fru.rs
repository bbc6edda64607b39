//! MAC addresses from `ipmitool fru print 0` output
//!
//! The layout is fixed by the controller firmware: the 15th line reads
//! `<label> : <hex>` where the first 24 hex digits are the MAC addresses
//! of the first and second onboard interfaces. Outputs shorter than
//! [`MIN_FRU_LINES`] mean the controller did not answer.

use std::fmt;

/// Fewer lines than this means the host could not be reached
pub const MIN_FRU_LINES: usize = 14;

/// Zero-based index of the line carrying the MAC payload
pub const MAC_LINE_INDEX: usize = 14;

const MAC_HEX_LEN: usize = 12;

/// A 6-byte hardware address, displayed as `AA:BB:CC:DD:EE:FF`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Parse exactly 12 hex digits
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != MAC_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// MAC addresses of the first and second onboard interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacPair {
    pub first: MacAddress,
    pub second: MacAddress,
}

/// Why a FRU dump could not be turned into a [`MacPair`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FruParseError {
    /// Output has fewer than [`MIN_FRU_LINES`] lines
    TooShort,
    /// Output is long enough but the payload is missing or garbled
    Malformed(String),
}

/// Split a 24+ digit hex payload into two addresses
///
/// The payload is upper-cased first; anything past 24 digits is ignored.
pub fn split_mac_payload(payload: &str) -> Option<MacPair> {
    let payload = payload.trim().to_uppercase();
    let digits = payload.as_bytes().get(..MAC_HEX_LEN * 2)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    Some(MacPair {
        first: MacAddress::from_hex(&payload[..MAC_HEX_LEN])?,
        second: MacAddress::from_hex(&payload[MAC_HEX_LEN..MAC_HEX_LEN * 2])?,
    })
}

/// Extract the MAC pair from the lines of a `fru print 0` dump
///
/// # Errors
/// `TooShort` when the dump has fewer than [`MIN_FRU_LINES`] lines,
/// `Malformed` when the MAC line is absent or unparsable
pub fn parse_fru_macs(lines: &[&str]) -> Result<MacPair, FruParseError> {
    if lines.len() < MIN_FRU_LINES {
        return Err(FruParseError::TooShort);
    }

    let line = lines.get(MAC_LINE_INDEX).ok_or_else(|| {
        FruParseError::Malformed(format!("no line {}", MAC_LINE_INDEX + 1))
    })?;

    let payload = line.split(':').nth(1).ok_or_else(|| {
        FruParseError::Malformed(format!("line {} has no ':' separator", MAC_LINE_INDEX + 1))
    })?;

    split_mac_payload(payload).ok_or_else(|| {
        FruParseError::Malformed(format!("expected 24 hex digits, got {:?}", payload.trim()))
    })
}
