//! MISB ST0903 Video Moving Target Indicator (subset)
//!
//! The VMTI local set carries three series fields:
//!
//! - `VTARGET_SERIES`: keyed series of VTarget packs, one per detection,
//!   keyed by target id
//! - `ALGORITHM_SERIES`: unkeyed series of Algorithm local sets
//! - `ONTOLOGY_SERIES`: unkeyed series of Ontology local sets
//!
//! Each sub-record is a local set of its own standard id.

use crate::error::KlvResult;
use klv_codec::{
    decode_keyed_series, decode_series, encode_keyed_series, encode_series, CodecRegistry, KlvSet,
    SeriesElement, ValueCodec,
};
use klv_core::{Framing, UniversalLabel};

pub const VMTI_ST_ID: u8 = 0x03;
pub const VTARGET_ST_ID: u8 = 0x04;
pub const ALGORITHM_ST_ID: u8 = 0x05;
pub const ONTOLOGY_ST_ID: u8 = 0x06;

const fn vmti(tag: u8) -> UniversalLabel {
    UniversalLabel::for_standard(VMTI_ST_ID, tag)
}

const fn vtarget(tag: u8) -> UniversalLabel {
    UniversalLabel::for_standard(VTARGET_ST_ID, tag)
}

// VMTI local set
pub const VMTI_CHECKSUM: UniversalLabel = vmti(1);
pub const VMTI_PRECISION_TIMESTAMP: UniversalLabel = vmti(2);
pub const VMTI_SYSTEM_NAME: UniversalLabel = vmti(3);
pub const VMTI_LS_VERSION: UniversalLabel = vmti(4);
pub const VMTI_TOTAL_TARGETS_DETECTED: UniversalLabel = vmti(5);
pub const VMTI_NUM_TARGETS_REPORTED: UniversalLabel = vmti(6);
pub const VMTI_FRAME_NUMBER: UniversalLabel = vmti(7);
pub const VMTI_FRAME_WIDTH: UniversalLabel = vmti(8);
pub const VMTI_FRAME_HEIGHT: UniversalLabel = vmti(9);
pub const VMTI_SOURCE_SENSOR: UniversalLabel = vmti(10);
pub const VMTI_HORIZONTAL_FOV: UniversalLabel = vmti(11);
pub const VMTI_VERTICAL_FOV: UniversalLabel = vmti(12);
pub const VTARGET_SERIES: UniversalLabel = vmti(101);
pub const ALGORITHM_SERIES: UniversalLabel = vmti(102);
pub const ONTOLOGY_SERIES: UniversalLabel = vmti(103);

// VTarget pack
pub const VTARGET_CENTROID: UniversalLabel = vtarget(1);
pub const VTARGET_BBOX_TOP_LEFT_PIXEL: UniversalLabel = vtarget(2);
pub const VTARGET_BBOX_BOTTOM_RIGHT_PIXEL: UniversalLabel = vtarget(3);
pub const VTARGET_PRIORITY: UniversalLabel = vtarget(4);
pub const VTARGET_CONFIDENCE_LEVEL: UniversalLabel = vtarget(5);
pub const VTARGET_HISTORY: UniversalLabel = vtarget(6);
pub const VTARGET_PERCENT_TARGET_PIXELS: UniversalLabel = vtarget(7);
pub const VTARGET_COLOR: UniversalLabel = vtarget(8);
pub const VTARGET_INTENSITY: UniversalLabel = vtarget(9);
pub const VTARGET_LOCATION_OFFSET_LAT: UniversalLabel = vtarget(10);
pub const VTARGET_LOCATION_OFFSET_LON: UniversalLabel = vtarget(11);
pub const VTARGET_LOCATION_HAE: UniversalLabel = vtarget(12);
pub const VTARGET_BBOX_TOP_LEFT_LAT_OFFSET: UniversalLabel = vtarget(13);
pub const VTARGET_BBOX_TOP_LEFT_LON_OFFSET: UniversalLabel = vtarget(14);
pub const VTARGET_BBOX_BOTTOM_RIGHT_LAT_OFFSET: UniversalLabel = vtarget(15);
pub const VTARGET_BBOX_BOTTOM_RIGHT_LON_OFFSET: UniversalLabel = vtarget(16);
pub const VTARGET_CENTROID_ROW: UniversalLabel = vtarget(19);
pub const VTARGET_CENTROID_COLUMN: UniversalLabel = vtarget(20);
pub const VTARGET_ALGORITHM_ID: UniversalLabel = vtarget(22);
pub const VTARGET_DETECTION_STATUS: UniversalLabel = vtarget(23);

// Algorithm local set
pub const ALGORITHM_ID: UniversalLabel = UniversalLabel::for_standard(ALGORITHM_ST_ID, 1);
pub const ALGORITHM_NAME: UniversalLabel = UniversalLabel::for_standard(ALGORITHM_ST_ID, 2);
pub const ALGORITHM_VERSION: UniversalLabel = UniversalLabel::for_standard(ALGORITHM_ST_ID, 3);
pub const ALGORITHM_CLASS: UniversalLabel = UniversalLabel::for_standard(ALGORITHM_ST_ID, 4);
pub const ALGORITHM_CONFIDENCE: UniversalLabel = UniversalLabel::for_standard(ALGORITHM_ST_ID, 6);

// Ontology local set
pub const ONTOLOGY_ID: UniversalLabel = UniversalLabel::for_standard(ONTOLOGY_ST_ID, 1);
pub const ONTOLOGY_PARENT_ID: UniversalLabel = UniversalLabel::for_standard(ONTOLOGY_ST_ID, 2);
pub const ONTOLOGY_IRI: UniversalLabel = UniversalLabel::for_standard(ONTOLOGY_ST_ID, 3);
pub const ONTOLOGY_CONFIDENCE: UniversalLabel = UniversalLabel::for_standard(ONTOLOGY_ST_ID, 6);

/// Largest pixel index representable by the 6-byte centroid field
pub const MAX_PIXEL_INDEX: u64 = 0xFFFF_FFFF_FFFF;

/// Offsets from the frame center, in degrees
const OFFSET_RANGE: (f64, f64) = (-19.2, 19.2);

/// Height above ellipsoid, in meters
const HAE_RANGE: (f64, f64) = (-900.0, 19000.0);

/// Register the VMTI, VTarget, Algorithm and Ontology numeric fields
pub fn register(registry: &mut CodecRegistry) -> KlvResult<()> {
    let (offset_min, offset_max) = OFFSET_RANGE;
    let (hae_min, hae_max) = HAE_RANGE;

    let unsigned = [
        (VMTI_CHECKSUM, 2),
        (VMTI_PRECISION_TIMESTAMP, 8),
        (VMTI_LS_VERSION, 2),
        (VMTI_TOTAL_TARGETS_DETECTED, 2),
        (VMTI_NUM_TARGETS_REPORTED, 2),
        (VMTI_FRAME_NUMBER, 4),
        (VMTI_FRAME_WIDTH, 2),
        (VMTI_FRAME_HEIGHT, 2),
        (VTARGET_CENTROID, 6),
        (VTARGET_BBOX_TOP_LEFT_PIXEL, 6),
        (VTARGET_BBOX_BOTTOM_RIGHT_PIXEL, 6),
        (VTARGET_PRIORITY, 1),
        (VTARGET_HISTORY, 2),
        (VTARGET_COLOR, 3),
        (VTARGET_INTENSITY, 3),
        (VTARGET_CENTROID_ROW, 4),
        (VTARGET_CENTROID_COLUMN, 4),
        (VTARGET_ALGORITHM_ID, 3),
        (VTARGET_DETECTION_STATUS, 1),
        (ALGORITHM_ID, 2),
        (ALGORITHM_CLASS, 1),
        (ONTOLOGY_ID, 2),
        (ONTOLOGY_PARENT_ID, 2),
    ];
    for (label, width) in unsigned {
        registry.register_codec(label, ValueCodec::unsigned(width)?);
    }

    for label in [
        VTARGET_CONFIDENCE_LEVEL,
        VTARGET_PERCENT_TARGET_PIXELS,
        ALGORITHM_CONFIDENCE,
        ONTOLOGY_CONFIDENCE,
    ] {
        registry.register_codec(label, ValueCodec::percentage());
    }

    for label in [
        VTARGET_LOCATION_OFFSET_LAT,
        VTARGET_LOCATION_OFFSET_LON,
        VTARGET_BBOX_TOP_LEFT_LAT_OFFSET,
        VTARGET_BBOX_TOP_LEFT_LON_OFFSET,
        VTARGET_BBOX_BOTTOM_RIGHT_LAT_OFFSET,
        VTARGET_BBOX_BOTTOM_RIGHT_LON_OFFSET,
    ] {
        registry.register_codec(label, ValueCodec::imap(offset_min, offset_max, 3)?);
    }

    registry.register_codec(VTARGET_LOCATION_HAE, ValueCodec::imap(hae_min, hae_max, 2)?);
    registry.register_codec(VMTI_HORIZONTAL_FOV, ValueCodec::imap(0.0, 180.0, 2)?);
    registry.register_codec(VMTI_VERTICAL_FOV, ValueCodec::imap(0.0, 180.0, 2)?);
    Ok(())
}

/// A VTarget pack: one detected target and its local set
pub type VTargetPack = SeriesElement;

/// Encode VTarget packs as a keyed series (duplicate target ids are rejected)
pub fn encode_vtarget_series(packs: &[VTargetPack], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    encode_keyed_series(packs, registry)
}

pub fn decode_vtarget_series(data: &[u8], registry: &CodecRegistry) -> KlvResult<Vec<VTargetPack>> {
    decode_keyed_series(data, Framing::local(VTARGET_ST_ID), registry)
}

pub fn encode_algorithm_series(sets: &[KlvSet], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    encode_series(sets, registry)
}

pub fn decode_algorithm_series(data: &[u8], registry: &CodecRegistry) -> KlvResult<Vec<KlvSet>> {
    decode_series(data, Framing::local(ALGORITHM_ST_ID), registry)
}

pub fn encode_ontology_series(sets: &[KlvSet], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    encode_series(sets, registry)
}

pub fn decode_ontology_series(data: &[u8], registry: &CodecRegistry) -> KlvResult<Vec<KlvSet>> {
    decode_series(data, Framing::local(ONTOLOGY_ST_ID), registry)
}

/// Pixel index of a target centroid: `column + (row - 1) * frame_width`
///
/// Rows and columns are 1-based. The result is clamped to
/// `[1, MAX_PIXEL_INDEX]`; non-finite input or a non-positive frame width
/// yields 0.
pub fn target_centroid_pixel_index(row: f64, column: f64, frame_width: f64) -> u64 {
    if !row.is_finite() || !column.is_finite() || !frame_width.is_finite() || frame_width <= 0.0 {
        return 0;
    }
    let raw = column + (row - 1.0) * frame_width;
    raw.clamp(1.0, MAX_PIXEL_INDEX as f64).round() as u64
}
