//! Packet codec
//!
//! A packet wraps one local set in an outer Universal Label and BER length
//! and closes it with a checksum trailer:
//!
//! ```text
//! [16-byte UL][BER length][payload items][0x01 0x02 CRC-hi CRC-lo]
//! ```
//!
//! The BER length counts the payload plus the 4-byte trailer, and the
//! checksum covers every byte before the two checksum bytes, outer header
//! included.

use crate::error::{KlvError, KlvResult};
use crate::registry::CodecRegistry;
use crate::set::KlvSet;
use klv_ber::{BerLength, encode_length};
use klv_checksum::{append_trailer, verify_trailer, TRAILER_LENGTH};
use klv_core::{ChecksumKind, Framing, LengthForm, UniversalLabel, UL_LENGTH};
use serde::{Deserialize, Serialize};

/// Universal Label of the MISB ST0601 UAS Datalink Local Set
pub const UAS_DATALINK_LOCAL_SET: UniversalLabel = UniversalLabel::new([
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x0B, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0x00,
]);

/// Standard id of the UAS Datalink Local Set
pub const UAS_DATALINK_STANDARD: u8 = 0x01;

/// Packet layout parameters
///
/// The default configuration frames the UAS Datalink payload with 1-byte
/// local tags and 1-byte lengths, so any single item (a nested VMTI set or a
/// series, for instance) is limited to 255 value bytes and larger ones fail
/// with `LengthOverflow`. Configure `payload_framing` with
/// [`LengthForm::Ber`] to lift that limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketConfig {
    /// Outer key of the packet
    pub outer_label: UniversalLabel,
    /// Framing of the payload items (the checksum flag is ignored; packets
    /// always carry a trailer)
    pub payload_framing: Framing,
    pub checksum: ChecksumKind,
    /// Whether packet builders append the version item when it is missing
    pub append_version: bool,
}

impl PacketConfig {
    pub fn new(outer_label: UniversalLabel, payload_framing: Framing) -> Self {
        Self {
            outer_label,
            payload_framing: payload_framing.without_checksum(),
            checksum: ChecksumKind::default(),
            append_version: false,
        }
    }

    pub fn with_checksum(mut self, checksum: ChecksumKind) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_append_version(mut self, append_version: bool) -> Self {
        self.append_version = append_version;
        self
    }

    fn payload_framing(&self) -> Framing {
        self.payload_framing.without_checksum()
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self::new(UAS_DATALINK_LOCAL_SET, Framing::local(UAS_DATALINK_STANDARD))
            .with_append_version(true)
    }
}

/// Encode `payload` as a complete packet
///
/// # Error Handling
/// `InvalidConfig` if the set's framing differs from the configured payload framing
pub fn encode_packet(config: &PacketConfig, payload: &KlvSet, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    let framing = config.payload_framing();
    if payload.framing().without_checksum() != framing {
        return Err(KlvError::InvalidConfig(format!(
            "Packet payload framed as {:?}, packet expects {:?}",
            payload.framing(),
            framing
        )));
    }

    // The packet trailer replaces any trailer the set would add itself
    let body = payload.encode_items(registry)?;

    let length = encode_length(LengthForm::Ber, body.len() + TRAILER_LENGTH)?;
    let mut out = Vec::with_capacity(UL_LENGTH + length.len() + body.len() + TRAILER_LENGTH);
    out.extend_from_slice(config.outer_label.as_bytes());
    out.extend_from_slice(&length);
    out.extend_from_slice(&body);
    append_trailer(config.checksum, &mut out);
    Ok(out)
}

/// Decode a complete packet
///
/// The outer label, length and checksum are all validated before any
/// payload item is decoded.
pub fn decode_packet(config: &PacketConfig, data: &[u8], registry: &CodecRegistry) -> KlvResult<KlvSet> {
    let found = UniversalLabel::from_slice(data)
        .map_err(|_| KlvError::MalformedLength(format!("Packet of {} bytes has no outer key", data.len())))?;
    if found != config.outer_label {
        return Err(KlvError::IdentifierMismatch {
            expected: config.outer_label,
            found,
        });
    }

    let (length, header) = BerLength::decode_at(data, UL_LENGTH)?;
    let start = UL_LENGTH + header;
    if length.value() != data.len() - start {
        return Err(KlvError::MalformedLength(format!(
            "Packet declares {} bytes after its header, {} present",
            length.value(),
            data.len() - start
        )));
    }

    let payload_end = verify_trailer(config.checksum, data)?;
    if payload_end < start {
        return Err(KlvError::MalformedLength("Packet trailer overlaps its header".to_string()));
    }

    let mut payload = KlvSet::new(config.payload_framing());
    payload.decode(&data[start..payload_end], registry)?;
    Ok(payload)
}
