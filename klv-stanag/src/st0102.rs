//! MISB ST0102 Security Metadata Local Set (subset)

use crate::error::KlvResult;
use klv_codec::{CodecRegistry, ValueCodec};
use klv_core::UniversalLabel;

pub const ST_ID: u8 = 0x02;

pub const CLASSIFICATION: UniversalLabel = UniversalLabel::for_standard(ST_ID, 1);
pub const CLASSIFICATION_SYSTEM: UniversalLabel = UniversalLabel::for_standard(ST_ID, 2);
pub const CLASSIFYING_COUNTRY: UniversalLabel = UniversalLabel::for_standard(ST_ID, 3);
pub const VERSION: UniversalLabel = UniversalLabel::for_standard(ST_ID, 22);

/// Security classification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Classification {
    Unclassified = 1,
    Restricted = 2,
    Confidential = 3,
    Secret = 4,
    TopSecret = 5,
}

impl Classification {
    pub fn code(self) -> f64 {
        self as u8 as f64
    }
}

/// Register the enumerated fields of the security local set
pub fn register(registry: &mut CodecRegistry) -> KlvResult<()> {
    registry.register_codec(CLASSIFICATION, ValueCodec::unsigned(1)?);
    registry.register_codec(CLASSIFICATION_SYSTEM, ValueCodec::unsigned(1)?);
    registry.register_codec(VERSION, ValueCodec::unsigned(2)?);
    Ok(())
}
