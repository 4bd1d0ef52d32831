use anyhow::Result;
use klv::stanag::{self, st0601, st0903, Addressing, CompositeBuilder};
use klv::{
    decode_keyed_series, encode_keyed_series, CodecRegistry, Framing, KlvError, KlvSet,
    PacketConfig, SeriesElement, UniversalLabel, ValueCodec,
};

const DETECTION_STANDARD: u8 = 0x40;
const CONFIDENCE: UniversalLabel = UniversalLabel::for_standard(DETECTION_STANDARD, 0x05);

fn confidence_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register_codec(CONFIDENCE, ValueCodec::probability());
    registry
}

fn detection(key: u64) -> SeriesElement {
    let mut set = KlvSet::local(DETECTION_STANDARD);
    set.push_leaf(CONFIDENCE, 0.1 * key as f64);
    SeriesElement::new(key, set)
}

#[test]
fn keyed_series_of_five_detections() -> Result<()> {
    let registry = confidence_registry();
    let elements: Vec<_> = (1..=5).map(detection).collect();

    let encoded = encode_keyed_series(&elements, &registry)?;
    let decoded = decode_keyed_series(&encoded, Framing::local(DETECTION_STANDARD), &registry)?;

    let keys: Vec<u64> = decoded.iter().map(|element| element.key).collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    for element in &decoded {
        let confidence = element.set.require_value(&CONFIDENCE)?;
        assert!((confidence - 0.1 * element.key as f64).abs() <= 1.0 / 255.0);
    }
    Ok(())
}

#[test]
fn duplicate_key_fails_before_output() {
    let registry = confidence_registry();
    let elements = vec![detection(1), detection(2), detection(2)];
    assert_eq!(
        encode_keyed_series(&elements, &registry),
        Err(KlvError::DuplicateKey(2))
    );
}

#[test]
fn large_keys_use_multi_byte_oids() -> Result<()> {
    let registry = confidence_registry();
    let mut elements = vec![detection(1)];
    elements[0].key = u64::from(u32::MAX) + 7;
    elements.push(detection(3));

    let encoded = encode_keyed_series(&elements, &registry)?;
    let decoded = decode_keyed_series(&encoded, Framing::local(DETECTION_STANDARD), &registry)?;
    assert_eq!(decoded[0].key, u64::from(u32::MAX) + 7);
    assert_eq!(decoded[1].key, 3);
    Ok(())
}

#[test]
fn vmti_targets_inside_uas_datalink_packet() -> Result<()> {
    let registry = stanag::standard_registry()?;

    let packs: Vec<_> = (1..=3u64)
        .map(|id| {
            let mut set = KlvSet::local(st0903::VTARGET_ST_ID);
            set.push_leaf(
                st0903::VTARGET_CENTROID,
                st0903::target_centroid_pixel_index(id as f64 * 10.0, 64.0, 1920.0) as f64,
            )
            .push_leaf(st0903::VTARGET_CONFIDENCE_LEVEL, 30.0 * id as f64);
            SeriesElement::new(id, set)
        })
        .collect();

    let mut vmti = CompositeBuilder::new();
    vmti.add_numeric(st0903::VMTI_FRAME_WIDTH, 1920.0)
        .add_numeric(st0903::VMTI_NUM_TARGETS_REPORTED, packs.len() as f64)
        .add_bytes(
            st0903::VTARGET_SERIES,
            st0903::encode_vtarget_series(&packs, &registry)?,
        );

    let mut uas = CompositeBuilder::new();
    uas.add_numeric(st0601::PLATFORM_HEADING_ANGLE, 270.0)
        .add_builder(st0601::VMTI_LOCAL_SET, &vmti, Addressing::Local, &registry)?;
    let packet = uas.as_packet(&PacketConfig::default(), &registry)?;

    let decoded = klv::decode_packet(&PacketConfig::default(), &packet, &registry)?;
    let vmti = decoded
        .nested(&st0601::VMTI_LOCAL_SET, Framing::local(st0903::VMTI_ST_ID), &registry)?
        .ok_or_else(|| anyhow::anyhow!("VMTI local set missing"))?;
    assert_eq!(vmti.value(&st0903::VMTI_NUM_TARGETS_REPORTED), Some(3.0));

    let series = vmti
        .bytes(&st0903::VTARGET_SERIES)
        .ok_or_else(|| anyhow::anyhow!("VTarget series missing"))?;
    let targets = st0903::decode_vtarget_series(series, &registry)?;
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[2].set.value(&st0903::VTARGET_CONFIDENCE_LEVEL), Some(90.0));
    assert_eq!(
        targets[0].set.value(&st0903::VTARGET_CENTROID),
        Some((64 + 9 * 1920) as f64)
    );
    Ok(())
}

#[test]
fn process_wide_registry() -> Result<()> {
    let registry =
        CodecRegistry::global_or_init(|| stanag::standard_registry().unwrap_or_default());
    assert!(registry.contains(&st0601::SENSOR_LATITUDE));
    assert!(CodecRegistry::global().is_ok());

    let mut set = KlvSet::local(st0601::ST_ID);
    set.push_leaf(st0601::PLATFORM_HEADING_ANGLE, 90.0);
    assert_eq!(set.encode(registry)?, vec![0x05, 0x02, 0x40, 0x00]);
    Ok(())
}
