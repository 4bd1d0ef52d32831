//! KLV encoding engine
//!
//! This crate provides the scalar value transforms, the value codec
//! registry, the node model (leaf, bytes, set), the series codec and the
//! packet codec built on top of the length and checksum crates.

pub mod error;
pub mod node;
pub mod packet;
pub mod registry;
pub mod series;
pub mod set;
pub mod transform;

pub use error::{KlvError, KlvResult};
pub use node::{read_item, write_item, KlvBytes, KlvLeaf, KlvNode, RawItem};
pub use packet::{decode_packet, encode_packet, PacketConfig, UAS_DATALINK_LOCAL_SET, UAS_DATALINK_STANDARD};
pub use registry::{CodecRegistry, DecodeFn, EncodeFn, ValueCodec};
pub use series::{
    decode_keyed_series, decode_series, encode_keyed_series, encode_series, SeriesElement,
};
pub use set::KlvSet;
