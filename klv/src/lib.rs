//! klv - Rust implementation of the STANAG 4609 / MISB KLV encoding
//!
//! This library encodes and decodes Key-Length-Value metadata as carried in
//! motion imagery streams: universal and local sets, nested datasets,
//! keyed and unkeyed series, and complete checksummed packets.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `klv-core`: Error type, Universal Labels, Local Tags, framing options
//! - `klv-ber`: BER lengths, BER-OID keys, fixed-width big-endian integers
//! - `klv-checksum`: CRC16-CCITT, 16-bit word sum, checksum trailer
//! - `klv-codec`: Value transforms, codec registry, nodes, sets, series, packets
//! - `klv-stanag`: Dataset builder and MISB ST0601/ST0102/ST0903 catalogs
//!
//! # Usage
//!
//! ```no_run
//! use klv::stanag::{st0601, CompositeBuilder};
//! use klv::{decode_packet, PacketConfig};
//!
//! fn main() -> klv::KlvResult<()> {
//!     let registry = klv::stanag::standard_registry()?;
//!
//!     let mut builder = CompositeBuilder::new();
//!     builder
//!         .add_numeric(st0601::SENSOR_LATITUDE, 48.8566)
//!         .add_numeric(st0601::SENSOR_LONGITUDE, 2.3522);
//!     let packet = builder.as_packet(&PacketConfig::default(), &registry)?;
//!
//!     let set = decode_packet(&PacketConfig::default(), &packet, &registry)?;
//!     println!("latitude {:?}", set.value(&st0601::SENSOR_LATITUDE));
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use klv_core::{
    ChecksumKind, Framing, KeyMode, KlvError, KlvResult, LengthForm, LocalTag, UniversalLabel,
};

// Re-export the encoding engine
pub use klv_codec::{
    decode_keyed_series, decode_packet, decode_series, encode_keyed_series, encode_packet,
    encode_series, CodecRegistry, KlvBytes, KlvLeaf, KlvNode, KlvSet, PacketConfig, SeriesElement,
    ValueCodec,
};

// Re-export the scalar transforms
pub mod transform {
    pub use klv_codec::transform::*;
}

// Re-export the wire primitives
pub mod ber {
    pub use klv_ber::*;
}

pub mod checksum {
    pub use klv_checksum::*;
}

// Re-export datasets and catalogs
pub mod stanag {
    pub use klv_stanag::*;
}
