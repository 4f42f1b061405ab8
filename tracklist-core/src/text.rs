//! Raw export bytes to text
//!
//! rekordbox writes its TXT export as UTF-16LE with a byte-order mark;
//! everything else is UTF-8, sometimes with a BOM. Parsers only ever see
//! decoded text with the marker removed.

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decode export file contents
pub fn decode(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return Ok(String::from_utf8(rest.to_vec())?);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    if looks_like_utf16le(bytes) {
        return decode_utf16(bytes, u16::from_le_bytes);
    }
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Drop a leading U+FEFF left over from a decoder that kept it
pub fn strip_bom(contents: &str) -> &str {
    contents.strip_prefix('\u{FEFF}').unwrap_or(contents)
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Encoding(format!(
            "UTF-16 input has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

/// BOM-less UTF-16LE: ASCII text leaves every second byte zero
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes.len() % 2 == 0 && bytes[0] != 0 && bytes[1] == 0
}
