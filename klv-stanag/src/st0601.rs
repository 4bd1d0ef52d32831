//! MISB ST0601 UAS Datalink Local Set (subset)

use crate::error::KlvResult;
use klv_codec::{CodecRegistry, ValueCodec};
use klv_core::UniversalLabel;

/// Standard id of the UAS Datalink Local Set
pub const ST_ID: u8 = klv_codec::UAS_DATALINK_STANDARD;

const fn ul(tag: u8) -> UniversalLabel {
    UniversalLabel::for_standard(ST_ID, tag)
}

pub const CHECKSUM: UniversalLabel = ul(1);
pub const PRECISION_TIME_STAMP: UniversalLabel = ul(2);
pub const MISSION_ID: UniversalLabel = ul(3);
pub const PLATFORM_TAIL_NUMBER: UniversalLabel = ul(4);
pub const PLATFORM_HEADING_ANGLE: UniversalLabel = ul(5);
pub const PLATFORM_PITCH_ANGLE: UniversalLabel = ul(6);
pub const PLATFORM_ROLL_ANGLE: UniversalLabel = ul(7);
pub const PLATFORM_TRUE_AIRSPEED: UniversalLabel = ul(8);
pub const PLATFORM_INDICATED_AIRSPEED: UniversalLabel = ul(9);
pub const PLATFORM_DESIGNATION: UniversalLabel = ul(10);
pub const IMAGE_SOURCE_SENSOR: UniversalLabel = ul(11);
pub const SENSOR_LATITUDE: UniversalLabel = ul(13);
pub const SENSOR_LONGITUDE: UniversalLabel = ul(14);
pub const SENSOR_TRUE_ALTITUDE: UniversalLabel = ul(15);
pub const SENSOR_HORIZONTAL_FOV: UniversalLabel = ul(16);
pub const SENSOR_VERTICAL_FOV: UniversalLabel = ul(17);
pub const SENSOR_RELATIVE_AZIMUTH: UniversalLabel = ul(18);
pub const SLANT_RANGE: UniversalLabel = ul(21);
pub const FRAME_CENTER_LATITUDE: UniversalLabel = ul(23);
pub const FRAME_CENTER_LONGITUDE: UniversalLabel = ul(24);
pub const FRAME_CENTER_ELEVATION: UniversalLabel = ul(25);
pub const SECURITY_LOCAL_SET: UniversalLabel = ul(48);
pub const UAS_LS_VERSION_NUMBER: UniversalLabel = ul(65);
pub const VMTI_LOCAL_SET: UniversalLabel = ul(74);

/// Version number written by packet builders when none is supplied
pub const DEFAULT_LS_VERSION: f64 = 12.0;

/// Register the numeric fields of the UAS Datalink Local Set
///
/// Text and nested-set fields (mission id, tail number, security and VMTI
/// sets) have no numeric codec and travel as opaque bytes.
pub fn register(registry: &mut CodecRegistry) -> KlvResult<()> {
    registry.register_codec(CHECKSUM, ValueCodec::unsigned(2)?);
    registry.register_codec(PRECISION_TIME_STAMP, ValueCodec::unsigned(8)?);
    registry.register_codec(PLATFORM_HEADING_ANGLE, ValueCodec::imap(0.0, 360.0, 2)?);
    registry.register_codec(PLATFORM_PITCH_ANGLE, ValueCodec::signed(20.0, 2)?);
    registry.register_codec(PLATFORM_ROLL_ANGLE, ValueCodec::signed(50.0, 2)?);
    registry.register_codec(PLATFORM_TRUE_AIRSPEED, ValueCodec::unsigned(1)?);
    registry.register_codec(PLATFORM_INDICATED_AIRSPEED, ValueCodec::unsigned(1)?);
    registry.register_codec(SENSOR_LATITUDE, ValueCodec::signed(90.0, 4)?);
    registry.register_codec(SENSOR_LONGITUDE, ValueCodec::signed(180.0, 4)?);
    registry.register_codec(SENSOR_TRUE_ALTITUDE, ValueCodec::imap(-900.0, 19000.0, 2)?);
    registry.register_codec(SENSOR_HORIZONTAL_FOV, ValueCodec::imap(0.0, 180.0, 2)?);
    registry.register_codec(SENSOR_VERTICAL_FOV, ValueCodec::imap(0.0, 180.0, 2)?);
    registry.register_codec(SENSOR_RELATIVE_AZIMUTH, ValueCodec::imap(0.0, 360.0, 4)?);
    registry.register_codec(SLANT_RANGE, ValueCodec::imap(0.0, 5_000_000.0, 4)?);
    registry.register_codec(FRAME_CENTER_LATITUDE, ValueCodec::signed(90.0, 4)?);
    registry.register_codec(FRAME_CENTER_LONGITUDE, ValueCodec::signed(180.0, 4)?);
    registry.register_codec(FRAME_CENTER_ELEVATION, ValueCodec::imap(-900.0, 19000.0, 2)?);
    registry.register_codec(UAS_LS_VERSION_NUMBER, ValueCodec::unsigned(1)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use klv_codec::KlvSet;

    fn registry() -> CodecRegistry {
        let mut registry = CodecRegistry::new();
        register(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_known_encodings() {
        let registry = registry();
        let mut set = KlvSet::local(ST_ID);
        set.push_leaf(PLATFORM_HEADING_ANGLE, 90.0)
            .push_leaf(SENSOR_LATITUDE, 45.0)
            .push_leaf(SENSOR_LONGITUDE, -75.0);
        assert_eq!(
            set.encode(&registry).unwrap(),
            vec![
                0x05, 0x02, 0x40, 0x00, //
                0x0D, 0x04, 0x40, 0x00, 0x00, 0x00, //
                0x0E, 0x04, 0xCA, 0xAA, 0xAA, 0xAB,
            ]
        );
    }

    #[test]
    fn test_text_fields_stay_opaque() {
        let registry = registry();
        assert!(!registry.contains(&MISSION_ID));
        assert!(!registry.contains(&VMTI_LOCAL_SET));
        assert_eq!(registry.require(&UAS_LS_VERSION_NUMBER).unwrap().encode(DEFAULT_LS_VERSION).unwrap(), vec![12]);
    }

    #[test]
    fn test_pitch_out_of_range_sentinel() {
        let registry = registry();
        let codec = registry.require(&PLATFORM_PITCH_ANGLE).unwrap();
        assert_eq!(codec.encode(f64::NAN).unwrap(), vec![0x80, 0x00]);
        assert_eq!(codec.encode(-30.0).unwrap(), vec![0x80, 0x01]);
    }
}
