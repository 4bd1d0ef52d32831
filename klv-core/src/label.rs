use crate::error::{KlvError, KlvResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a Universal Label in bytes
pub const UL_LENGTH: usize = 16;

/// Prefix shared by every standard-scoped label built with [`UniversalLabel::for_standard`]
const STANDARD_PREFIX: [u8; 12] = [
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x0B, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
];

/// Byte position of the standard id inside a standard-scoped label
const STANDARD_INDEX: usize = 12;

/// Universal Label (UL) identifying a KLV item
///
/// ULs are 16-byte SMPTE identifiers, globally unique across standards.
/// Items of a local set are keyed by a 1-byte tag on the wire, but inside
/// this workspace every item is still addressed by a full label: the local
/// tag lives in the last byte and the owning standard in byte 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniversalLabel {
    bytes: [u8; UL_LENGTH],
}

impl UniversalLabel {
    /// Create a label from its 16 raw bytes
    pub const fn new(bytes: [u8; UL_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Build the synthetic label of `tag` inside the local set of `standard`
    ///
    /// Layout: `06 0E 2B 34 02 0B 01 01 01 01 01 01 <standard> 00 00 <tag>`
    pub const fn for_standard(standard: u8, tag: u8) -> Self {
        let p = STANDARD_PREFIX;
        Self {
            bytes: [
                p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7], p[8], p[9], p[10], p[11],
                standard, 0x00, 0x00, tag,
            ],
        }
    }

    /// Read a label from the first 16 bytes of `data`
    pub fn from_slice(data: &[u8]) -> KlvResult<Self> {
        let head = data.get(..UL_LENGTH).ok_or_else(|| {
            KlvError::InvalidData(format!(
                "Buffer too short for universal label: need {}, got {}",
                UL_LENGTH,
                data.len()
            ))
        })?;
        let mut bytes = [0u8; UL_LENGTH];
        bytes.copy_from_slice(head);
        Ok(Self { bytes })
    }

    /// Parse a label from dotted hex, e.g. `"06.0E.2B.34.02.0B.01.01.0E.01.03.01.01.00.00.00"`
    pub fn from_string(s: &str) -> KlvResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != UL_LENGTH {
            return Err(KlvError::InvalidData(format!(
                "Expected {} dot-separated hex bytes, got {}",
                UL_LENGTH,
                parts.len()
            )));
        }

        let mut bytes = [0u8; UL_LENGTH];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| KlvError::InvalidData(format!("Invalid hex byte: {}", part)))?;
        }

        Ok(Self { bytes })
    }

    /// Get the label as a byte array
    pub fn as_bytes(&self) -> &[u8; UL_LENGTH] {
        &self.bytes
    }

    /// Get the local tag carried by this label (last byte)
    pub fn local_tag(&self) -> LocalTag {
        LocalTag(self.bytes[UL_LENGTH - 1])
    }

    /// Get the standard id carried by this label (byte 12)
    pub fn standard_id(&self) -> u8 {
        self.bytes[STANDARD_INDEX]
    }
}

impl fmt::Display for UniversalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl From<[u8; UL_LENGTH]> for UniversalLabel {
    fn from(bytes: [u8; UL_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

/// 1-byte local tag, meaningful only inside one standard's local set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalTag(pub u8);

impl LocalTag {
    /// Resolve this tag to its full label within `standard`
    pub fn to_label(self, standard: u8) -> UniversalLabel {
        UniversalLabel::for_standard(standard, self.0)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LocalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
