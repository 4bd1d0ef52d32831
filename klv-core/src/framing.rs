//! Framing configuration for KLV sets
//!
//! A set is configured once, at construction, with exactly one addressing
//! mode and one length form. Children never carry their own framing; they
//! are encoded with the framing of the set that owns them.

use crate::label::{LocalTag, UniversalLabel, UL_LENGTH};
use serde::{Deserialize, Serialize};

/// How item keys are written on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMode {
    /// Full 16-byte Universal Label per item
    Universal,
    /// 1-byte Local Tag per item, scoped to `standard`
    Local { standard: u8 },
}

impl KeyMode {
    /// Number of key bytes per item
    pub fn key_len(&self) -> usize {
        match self {
            KeyMode::Universal => UL_LENGTH,
            KeyMode::Local { .. } => 1,
        }
    }

    /// Bytes written for `label` under this mode
    pub fn key_bytes<'a>(&self, label: &'a UniversalLabel) -> KeyBytes<'a> {
        match self {
            KeyMode::Universal => KeyBytes::Universal(label.as_bytes()),
            KeyMode::Local { .. } => KeyBytes::Local([label.local_tag().value()]),
        }
    }

    /// Resolve the key at the start of `data` to a label
    ///
    /// The caller guarantees that `data` holds at least [`KeyMode::key_len`] bytes.
    pub fn read_label(&self, data: &[u8]) -> Option<UniversalLabel> {
        match self {
            KeyMode::Universal => UniversalLabel::from_slice(data).ok(),
            KeyMode::Local { standard } => data.first().map(|&tag| LocalTag(tag).to_label(*standard)),
        }
    }
}

/// Borrowed wire form of an item key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBytes<'a> {
    Universal(&'a [u8; UL_LENGTH]),
    Local([u8; 1]),
}

impl AsRef<[u8]> for KeyBytes<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            KeyBytes::Universal(bytes) => &bytes[..],
            KeyBytes::Local(tag) => &tag[..],
        }
    }
}

/// How item lengths are written on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthForm {
    /// BER definite length (short form below 128, long form otherwise)
    Ber,
    /// Exactly one length byte, values 0..=255
    Fixed1,
}

impl LengthForm {
    pub fn name(&self) -> &'static str {
        match self {
            LengthForm::Ber => "BER",
            LengthForm::Fixed1 => "fixed 1-byte",
        }
    }
}

/// Trailer checksum algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChecksumKind {
    /// CRC16-CCITT, polynomial 0x1021, initial value 0xFFFF, no final XOR
    #[default]
    Crc16Ccitt,
    /// Running sum of big-endian 16-bit words (MISB ST0601 style)
    WordSum16,
}

/// Complete framing of one set: key mode, length form, checksum trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Framing {
    key: KeyMode,
    length: LengthForm,
    checksum: Option<ChecksumKind>,
}

impl Framing {
    /// UL-keyed framing with BER lengths
    pub fn universal() -> Self {
        Self {
            key: KeyMode::Universal,
            length: LengthForm::Ber,
            checksum: None,
        }
    }

    /// Local-tag framing for `standard` with fixed 1-byte lengths
    pub fn local(standard: u8) -> Self {
        Self {
            key: KeyMode::Local { standard },
            length: LengthForm::Fixed1,
            checksum: None,
        }
    }

    pub fn with_length_form(mut self, length: LengthForm) -> Self {
        self.length = length;
        self
    }

    /// Enable the checksum trailer with the given algorithm
    pub fn with_checksum(mut self, kind: ChecksumKind) -> Self {
        self.checksum = Some(kind);
        self
    }

    pub fn without_checksum(mut self) -> Self {
        self.checksum = None;
        self
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key
    }

    pub fn length_form(&self) -> LengthForm {
        self.length
    }

    pub fn checksum(&self) -> Option<ChecksumKind> {
        self.checksum
    }

    pub fn uses_ul_keys(&self) -> bool {
        matches!(self.key, KeyMode::Universal)
    }
}

impl Default for Framing {
    fn default() -> Self {
        Self::universal()
    }
}
