//! Tests for run document parsing

use travelog::parsers::{parse_document, parse_run, ChannelData, ParseError, RawReading};
use travelog::settings::TelemetryConfig;

use crate::common::run_bytes;

fn config() -> TelemetryConfig {
    TelemetryConfig::default()
}

#[test]
fn test_current_layout() {
    let bytes = run_bytes(&[0.0, 512.0], &[1024.0], 200.0, 50.0);
    let run = parse_run(&bytes, &config()).unwrap();

    assert_eq!(run.front.data.len(), 2);
    assert_eq!(run.rear.data.len(), 1);
    assert_eq!(run.front.frequency, 200.0);
    assert_eq!(run.rear.frequency, 50.0);
    assert_eq!(run.metadata["run_comment"], "synthetic");
}

#[test]
fn test_legacy_top_level_suspension() {
    let json = br#"{
        "suspension": {"front_sus": [100, 200, 300], "rear_sus": [400]},
        "metadata": {"sample_frequency": {"front_sus": 10, "rear_sus": 10}}
    }"#;
    let run = parse_run(json, &config()).unwrap();
    assert_eq!(run.front.data.len(), 3);
    assert_eq!(run.rear.data.readings(), &[RawReading::Value(400.0)]);
}

#[test]
fn test_nested_layout_wins_over_legacy() {
    let json = br#"{
        "data": {"suspension": {"front_sus": [1, 2]}},
        "suspension": {"front_sus": [1, 2, 3, 4]}
    }"#;
    let run = parse_run(json, &config()).unwrap();
    assert_eq!(run.front.data.len(), 2);
}

#[test]
fn test_lenient_reading_values() {
    let json = br#"{"data": {"suspension": {"front_sus": [
        512,
        {"displacement": "256", "timebase": "0.5"},
        {"displacement": true},
        {"displacement": null, "timebase": null},
        {"displacement": "abc"},
        "loose string",
        null,
        [1, 2]
    ]}}}"#;
    let run = parse_run(json, &config()).unwrap();
    let readings = run.front.data.readings();

    assert_eq!(readings.len(), 8);
    assert_eq!(readings[0], RawReading::Value(512.0));
    assert_eq!(readings[1].displacement(), 256.0);
    assert_eq!(readings[1].timebase(), Some(0.5));
    assert_eq!(readings[2].displacement(), 1.0);
    assert_eq!(readings[3].displacement(), 0.0);
    assert_eq!(readings[3].timebase(), None);
    assert!(readings[4].displacement().is_nan());
    for ambiguous in &readings[5..] {
        assert_eq!(ambiguous.displacement(), 0.0);
        assert_eq!(ambiguous.timebase(), None);
    }
}

#[test]
fn test_non_array_channel_is_invalid() {
    let json = br#"{"data": {"suspension": {"front_sus": {"oops": 1}, "rear_sus": 42}}}"#;
    let run = parse_run(json, &config()).unwrap();
    assert_eq!(run.front.data, ChannelData::Invalid);
    assert_eq!(run.rear.data, ChannelData::Invalid);
    assert!(run.is_empty());
}

#[test]
fn test_missing_suspension_section() {
    let json = br#"{"data": {"gyroscope": {"axis1": [1, 2, 3]}}, "metadata": {"run_time": 5}}"#;
    let run = parse_run(json, &config()).unwrap();
    assert!(run.is_empty());
    assert_eq!(run.front.data, ChannelData::Absent);
    assert_eq!(run.metadata["run_time"], 5);
}

#[test]
fn test_bad_frequencies_fall_back() {
    let json = br#"{
        "data": {"suspension": {"front_sus": [1], "rear_sus": [1]}},
        "metadata": {"sample_frequency": {"front_sus": 0, "rear_sus": "fast"}}
    }"#;
    let cfg = TelemetryConfig {
        default_frequency: 250.0,
        ..Default::default()
    };
    let run = parse_run(json, &cfg).unwrap();
    assert_eq!(run.front.frequency, 250.0);
    assert_eq!(run.rear.frequency, 250.0);
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        parse_document(b"{\"data\": "),
        Err(ParseError::InvalidJson(_))
    ));
    assert!(parse_run(b"", &config()).is_err());
}

#[test]
fn test_document_survives_reserialization() {
    let bytes = run_bytes(&[0.0, 1024.0], &[512.0], 100.0, 100.0);
    let document = parse_document(&bytes).unwrap();
    let again = serde_json::to_vec(&document).unwrap();
    let run = parse_run(&again, &config()).unwrap();
    assert_eq!(run.front.data.len(), 2);
    assert_eq!(run.rear.frequency, 100.0);
}
