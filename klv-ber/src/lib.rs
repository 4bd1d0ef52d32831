//! BER primitives for KLV framing
//!
//! This crate provides the variable-length building blocks used by every
//! KLV item and series:
//!
//! - **BER length**: definite-length framing of item values
//! - **BER-OID**: self-delimiting unsigned integers (7-bit groups with a
//!   continuation bit), used as series element keys
//! - **Fixed-width integers**: big-endian pack/unpack for widths of 1 to 8 bytes

pub mod error;
pub mod fixed;
pub mod length;
pub mod oid;

pub use error::{KlvError, KlvResult};
pub use fixed::{pack_be, unpack_be, unpack_be_signed};
pub use length::{decode_length, encode_length, BerLength};
pub use oid::{decode_oid, encode_oid};
