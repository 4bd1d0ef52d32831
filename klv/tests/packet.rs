use anyhow::Result;
use klv::ber::decode_length;
use klv::checksum::verify_trailer;
use rand::Rng;
use klv::{
    decode_packet, encode_packet, ChecksumKind, CodecRegistry, Framing, KlvError, KlvLeaf, KlvSet,
    LengthForm, PacketConfig, UniversalLabel, ValueCodec,
};

const STANDARD: u8 = 0x01;
const LATITUDE: UniversalLabel = UniversalLabel::for_standard(STANDARD, 0x0D);
const LONGITUDE: UniversalLabel = UniversalLabel::for_standard(STANDARD, 0x0E);
const MISSION: UniversalLabel = UniversalLabel::for_standard(STANDARD, 0x03);

fn tolerance() -> f64 {
    90.0 / 2f64.powi(31)
}

fn position_registry() -> Result<CodecRegistry> {
    let mut registry = CodecRegistry::new();
    registry.register_codec(LATITUDE, ValueCodec::imap(-90.0, 90.0, 4)?);
    registry.register_codec(LONGITUDE, ValueCodec::imap(-90.0, 90.0, 4)?);
    Ok(registry)
}

fn position_packet(registry: &CodecRegistry) -> Result<Vec<u8>> {
    packet_at(registry, 48.8566, 2.3522)
}

fn packet_at(registry: &CodecRegistry, latitude: f64, longitude: f64) -> Result<Vec<u8>> {
    let mut set = KlvSet::local(STANDARD);
    set.push_leaf(LATITUDE, latitude).push_leaf(LONGITUDE, longitude);
    Ok(encode_packet(&PacketConfig::default(), &set, registry)?)
}

#[test]
fn latitude_longitude_packet_round_trip() -> Result<()> {
    let registry = position_registry()?;
    let packet = position_packet(&registry)?;

    // The trailer checksum covers the outer header as well
    verify_trailer(ChecksumKind::Crc16Ccitt, &packet)?;
    let (length, consumed) = decode_length(LengthForm::Ber, &packet, 16)?;
    assert_eq!(16 + consumed + length, packet.len());

    let decoded = decode_packet(&PacketConfig::default(), &packet, &registry)?;
    assert_eq!(decoded.len(), 2);
    assert!((decoded.require_value(&LATITUDE)? - 48.8566).abs() <= tolerance());
    assert!((decoded.require_value(&LONGITUDE)? - 2.3522).abs() <= tolerance());
    Ok(())
}

#[test]
fn any_single_bit_flip_rejects_packet() -> Result<()> {
    let registry = position_registry()?;
    let mut rng = rand::thread_rng();

    for _ in 0..8 {
        let latitude = rng.gen_range(-90.0..90.0);
        let longitude = rng.gen_range(-90.0..90.0);
        let packet = packet_at(&registry, latitude, longitude)?;
        assert!(decode_packet(&PacketConfig::default(), &packet, &registry).is_ok());

        for bit in 0..packet.len() * 8 {
            let mut corrupted = packet.clone();
            corrupted[bit / 8] ^= 1 << (bit % 8);
            assert!(
                decode_packet(&PacketConfig::default(), &corrupted, &registry).is_err(),
                "bit {} flipped without detection at ({}, {})",
                bit,
                latitude,
                longitude
            );
        }
    }
    Ok(())
}

#[test]
fn unknown_fields_survive_as_bytes() -> Result<()> {
    let mut writer = position_registry()?;
    let altitude = UniversalLabel::for_standard(STANDARD, 0x0F);
    writer.register_codec(altitude, ValueCodec::imap(-900.0, 19000.0, 2)?);

    let mut set = KlvSet::local(STANDARD);
    set.push_leaf(LATITUDE, 10.0)
        .push_leaf(altitude, 1500.0)
        .push_bytes(MISSION, b"SORTIE-7".to_vec())
        .push_leaf(LONGITUDE, 20.0);
    let encoded = set.encode(&writer)?;
    let altitude_bytes = writer.require(&altitude)?.encode(1500.0)?;

    let reader = position_registry()?;
    let mut decoded = KlvSet::local(STANDARD);
    decoded.decode_strict(&encoded, &reader)?;

    assert_eq!(decoded.len(), 4);
    assert_eq!(decoded.bytes(&altitude), Some(&altitude_bytes[..]));
    assert_eq!(decoded.bytes(&MISSION), Some(&b"SORTIE-7"[..]));
    assert!(decoded.children()[0].as_leaf().is_some());
    assert!(decoded.children()[3].as_leaf().is_some());
    Ok(())
}

#[test]
fn leaf_rejects_foreign_identifier() -> Result<()> {
    let registry = position_registry()?;
    for framing in [Framing::universal(), Framing::local(STANDARD)] {
        let encoded = KlvLeaf::new(LATITUDE, 1.0).encode(&framing, &registry)?;
        let mut other = KlvLeaf::empty(LONGITUDE);
        assert_eq!(
            other.decode(&encoded, &framing, &registry),
            Err(KlvError::IdentifierMismatch {
                expected: LONGITUDE,
                found: LATITUDE,
            })
        );
    }
    Ok(())
}

#[test]
fn default_packet_config_is_uas_datalink() {
    let config = PacketConfig::default();
    assert_eq!(config.payload_framing, Framing::local(STANDARD));
    assert_eq!(config.checksum, ChecksumKind::Crc16Ccitt);
    assert!(config.append_version);
    assert_eq!(
        config.outer_label.to_string(),
        "06.0E.2B.34.02.0B.01.01.0E.01.03.01.01.00.00.00"
    );
}
