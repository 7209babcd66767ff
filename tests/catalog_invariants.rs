use std::collections::{BTreeMap, BTreeSet};

use imgsift::catalog::aggregate;
use imgsift::record::{Detection, DetectionRecord};

fn record(path: &str, labels: &[&str]) -> DetectionRecord {
    let detections = labels
        .iter()
        .map(|l| Detection::new(*l, 0.7, [1.0, 1.0, 4.0, 4.0].into()))
        .collect();
    DetectionRecord::from_detections(path, detections)
}

fn fixture() -> Vec<DetectionRecord> {
    vec![
        record("01.jpg", &["person", "person", "car"]),
        record("02.jpg", &["person"]),
        record("03.jpg", &[]),
        record("04.jpg", &["dog", "dog", "dog", "person", "person"]),
        record("05.jpg", &["car", "dog"]),
    ]
}

#[test]
fn every_cataloged_class_is_present_in_some_record() {
    let records = fixture();
    let catalog = aggregate(&records);
    for class in &catalog.unique_classes {
        assert!(
            records.iter().any(|r| r.class_count(class) >= 1),
            "class {class} cataloged but present in no record"
        );
    }
}

#[test]
fn every_recorded_class_is_cataloged() {
    let records = fixture();
    let catalog = aggregate(&records);
    for record in &records {
        for class in record.unique_classes() {
            assert!(catalog.unique_classes.iter().any(|c| c == class));
        }
    }
}

#[test]
fn count_options_match_observed_counts_exactly() {
    let records = fixture();
    let catalog = aggregate(&records);

    let mut expected: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    for record in &records {
        for (class, count) in record.class_counts() {
            expected.entry(class).or_default().insert(*count);
        }
    }

    assert_eq!(catalog.count_options.len(), expected.len());
    for (class, counts) in expected {
        let observed: Vec<u32> = counts.into_iter().collect();
        assert_eq!(catalog.counts_for(class), observed.as_slice());
    }
}

#[test]
fn aggregation_is_deterministic() {
    let records = fixture();
    assert_eq!(aggregate(&records), aggregate(&records));
}
