//! Batch normalization: fault isolation and ordering

use pretty_assertions::assert_eq;
use smsbridge_core::{EventNormalizer, NormalizedRecord, RawDeliveryBatch};
use tests::fixtures::batch;
use tests::pdu::{corrupted, DeliverPdu, DEFAULT_TIMESTAMP_MILLIS};

fn message(n: usize) -> DeliverPdu {
    DeliverPdu::new("+15551234567", &format!("message {}", n))
}

fn expected(n: usize) -> NormalizedRecord {
    NormalizedRecord::new("+15551234567", format!("message {}", n), DEFAULT_TIMESTAMP_MILLIS)
}

#[test]
fn test_n_good_m_bad_yields_n_in_order() {
    // good/bad interleavings: true = decodable
    let layouts: &[&[bool]] = &[
        &[true, true, true],
        &[false, false],
        &[true, false, true],
        &[false, true, false, true, true, false],
        &[true, true, false, false, true],
    ];

    for layout in layouts {
        let units: Vec<Vec<u8>> = layout
            .iter()
            .enumerate()
            .map(|(i, &good)| if good { message(i).build() } else { corrupted() })
            .collect();
        let want: Vec<NormalizedRecord> = layout
            .iter()
            .enumerate()
            .filter(|(_, &good)| good)
            .map(|(i, _)| expected(i))
            .collect();

        let got = EventNormalizer::new().normalize(Some(&batch(units)));
        assert_eq!(got, want, "layout {:?}", layout);
    }
}

#[test]
fn test_arrival_order_not_time_order() {
    let later = DeliverPdu::new("+1", "later").at([24, 3, 15, 12, 0, 0]);
    let earlier = DeliverPdu::new("+1", "earlier").at([24, 3, 15, 9, 0, 0]);

    let got = EventNormalizer::new().normalize(Some(&batch(vec![later.build(), earlier.build()])));
    let bodies: Vec<&str> = got.iter().map(NormalizedRecord::body).collect();
    assert_eq!(bodies, vec!["later", "earlier"]);
}

#[test]
fn test_absent_batch() {
    assert!(EventNormalizer::new().normalize(None).is_empty());
}

#[test]
fn test_empty_batch() {
    assert!(EventNormalizer::new().normalize(Some(&batch(Vec::new()))).is_empty());
}

#[test]
fn test_missing_format_tag_is_3gpp() {
    let legacy = RawDeliveryBatch::new(vec![message(0).build()], None);
    assert_eq!(EventNormalizer::new().normalize(Some(&legacy)), vec![expected(0)]);
}

#[test]
fn test_3gpp2_units_skipped() {
    let cdma = RawDeliveryBatch::new(vec![message(0).build()], Some("3gpp2".to_string()));
    assert!(EventNormalizer::new().normalize(Some(&cdma)).is_empty());
}

#[test]
fn test_hex_batch() {
    let batch = RawDeliveryBatch::from_hex_units([message(7).hex()], Some("3gpp")).unwrap();
    assert_eq!(EventNormalizer::new().normalize(Some(&batch)), vec![expected(7)]);
}

#[test]
fn test_bad_timestamp_still_delivered() {
    let units = vec![
        message(0).build(),
        DeliverPdu::new("+15551234567", "month zero")
            .at([24, 0, 15, 10, 30, 0])
            .build(),
    ];

    let got = EventNormalizer::new().normalize(Some(&batch(units)));
    assert_eq!(
        got,
        vec![
            expected(0),
            NormalizedRecord::new("+15551234567", "month zero", 0),
        ]
    );
}
