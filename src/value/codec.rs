//! Value codec
//!
//! Encoding and decoding of structured values stored in entry files.
//!
//! ## Envelope Format
//! ```text
//! ┌───────────┬───────────┬──────────┬───────────┬──────────────────┐
//! │ Magic (3) │Version (1)│ Kind (1) │ CRC32 (4) │ Payload (bincode)│
//! └───────────┴───────────┴──────────┴───────────┴──────────────────┘
//! ```
//!
//! The CRC covers the payload only and is stored little-endian. Anything
//! that fails a header check, the checksum, or bincode is a decode error.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{NsError, Result};

/// Magic bytes at the start of every encoded value
pub const MAGIC: &[u8; 3] = b"NSV";

/// Envelope format version
pub const VERSION: u8 = 1;

/// Header size: magic (3) + version (1) + kind (1) + crc (4)
pub const HEADER_SIZE: usize = 9;

/// What an envelope holds
///
/// Stops an object written under one key from being read back as a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvelopeKind {
    Object = 0x01,
    Array = 0x02,
}

impl EnvelopeKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(EnvelopeKind::Object),
            0x02 => Some(EnvelopeKind::Array),
            _ => None,
        }
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
}

/// Encode a value into an envelope of the given kind
pub fn encode<T: Serialize + ?Sized>(kind: EnvelopeKind, value: &T) -> Result<Vec<u8>> {
    let payload = options()
        .serialize(value)
        .map_err(|e| NsError::Encode(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.push(VERSION);
    bytes.push(kind as u8);
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Decode an envelope, checking it holds the expected kind
pub fn decode<T: DeserializeOwned>(kind: EnvelopeKind, bytes: &[u8]) -> Result<T> {
    if bytes.len() < HEADER_SIZE {
        return Err(NsError::Decode(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    if &bytes[0..3] != MAGIC {
        return Err(NsError::Decode("Bad magic bytes".to_string()));
    }

    if bytes[3] != VERSION {
        return Err(NsError::Decode(format!(
            "Unsupported version: {} (expected {})",
            bytes[3], VERSION
        )));
    }

    match EnvelopeKind::from_byte(bytes[4]) {
        Some(found) if found == kind => {}
        Some(found) => {
            return Err(NsError::Decode(format!(
                "Expected {:?} value, found {:?}",
                kind, found
            )))
        }
        None => {
            return Err(NsError::Decode(format!(
                "Unknown value kind: 0x{:02x}",
                bytes[4]
            )))
        }
    }

    let stored_crc = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
    let payload = &bytes[HEADER_SIZE..];
    let computed_crc = crc32fast::hash(payload);
    if stored_crc != computed_crc {
        return Err(NsError::Decode(format!(
            "CRC mismatch: stored 0x{:08x}, computed 0x{:08x}",
            stored_crc, computed_crc
        )));
    }

    options()
        .deserialize(payload)
        .map_err(|e| NsError::Decode(e.to_string()))
}
