//! Checksum module for KLV sets and packets
//!
//! This crate computes and verifies the 4-byte checksum trailer that closes
//! a checksummed dataset or a STANAG 4609 packet:
//!
//! ```text
//! [0x01] [0x02] [checksum hi] [checksum lo]
//! ```
//!
//! The checksum covers every byte preceding the two checksum bytes, that is
//! the outer key and length header (packet scope), the payload, and the
//! trailer's own tag and length bytes.

pub mod crc16;
pub mod error;
pub mod trailer;
pub mod word_sum;

pub use crc16::{crc16_ccitt, Crc16};
pub use error::{KlvError, KlvResult};
pub use trailer::{
    append_trailer, checksum, has_trailer, verify_trailer, TRAILER_LENGTH, TRAILER_TAG,
    TRAILER_VALUE_LENGTH,
};
pub use word_sum::word_sum_16;
