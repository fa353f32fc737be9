use super::*;
use crate::chromatogram::{AcquisitionInfo, GasChromatogram};
use crate::detection::{AreaMethod, DetectionConfig, DEFAULT_MIN_BASELINE_SAMPLES};
use crate::trace::Trace;
use chrono::{TimeZone, Utc};
use std::io::Cursor;
use tempfile::tempdir;

fn trace(intensities: Vec<f64>) -> Trace {
    let times = (0..intensities.len()).map(|i| i as f64 * 0.5).collect();
    Trace::new(times, intensities).unwrap()
}

fn processed() -> GasChromatogram {
    let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut gc = GasChromatogram::new(
        trace(vec![0., 0., 0., 0., 0., 1., 3., 5., 3., 1., 0., 0., 0.]),
        AcquisitionInfo::new(timestamp, "GC-1").with_comment("blank"),
        DetectionConfig::new(0.5, 0.3).with_area_method(AreaMethod::Trapezoidal),
    );
    gc.find_peaks();
    gc
}

#[test]
fn test_save_and_load_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.gcard");

    let first = processed();
    let second = GasChromatogram::new(
        trace(vec![0.25, 0.5, 0.75]),
        AcquisitionInfo::default(),
        DetectionConfig::default(),
    );
    save_records(&path, [&first, &second]).unwrap();

    let loaded = load_records(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], first);
    assert_eq!(loaded[1], second);
    assert!(!loaded[1].is_processed());
}

#[test]
fn test_record_extension() {
    assert_eq!(
        with_record_extension("runs/blank"),
        std::path::PathBuf::from("runs/blank.gcard")
    );
    assert_eq!(
        with_record_extension("runs/blank.json"),
        std::path::PathBuf::from("runs/blank.json")
    );
}

#[test]
fn test_missing_optional_fields_default() {
    let json = r#"{
        "records": [{
            "trace": { "times": [0.0, 0.5, 1.0], "intensities": [1.0, 2.0, 1.0] },
            "acquisition": { "timestamp": "2024-05-01T12:00:00Z" }
        }]
    }"#;
    let file = RecordFile::from_json(json).unwrap();
    assert_eq!(file.format_version, RECORD_FORMAT_VERSION);
    assert!(file.created.is_none());

    let gc = read_records(Cursor::new(json)).unwrap().remove(0);
    assert_eq!(gc.acquisition().comment, "");
    assert_eq!(gc.acquisition().instrument_name, "");
    assert!(gc.peaks().is_empty());
    assert!(gc.baseline().is_none());
    assert_eq!(gc.config().area_method, AreaMethod::Addition);
    assert_eq!(gc.config().min_baseline_samples, DEFAULT_MIN_BASELINE_SAMPLES);
}

#[test]
fn test_newer_format_version_is_rejected() {
    let json = r#"{ "format_version": 99, "records": [] }"#;
    assert!(matches!(
        RecordFile::from_json(json),
        Err(RecordError::UnsupportedVersion { found: 99, .. })
    ));
}

#[test]
fn test_invalid_stored_trace() {
    let json = r#"{
        "records": [{
            "trace": { "times": [0.0, 0.0], "intensities": [1.0, 2.0] },
            "acquisition": { "timestamp": "2024-05-01T12:00:00Z" }
        }]
    }"#;
    assert!(matches!(read_records(Cursor::new(json)), Err(RecordError::Json(_))));
}

#[test]
fn test_inconsistent_record() {
    let mut record = ChromatogramRecord::from(&processed());
    record.peaks[0].peak_end = 40;
    assert!(matches!(record.validate(), Err(RecordError::Inconsistent(_))));

    let mut record = ChromatogramRecord::from(&processed());
    record.baseline_indices.push(13);
    assert!(matches!(
        record.into_chromatogram(),
        Err(RecordError::Inconsistent(_))
    ));
}

#[test]
fn test_write_traces_format() {
    let first = trace(vec![0.0, 2.5]);
    let second = trace(vec![1.0]);
    let mut buffer = Vec::new();
    write_traces(&mut buffer, [&first, &second]).unwrap();

    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "0 0\r\n0.5 2.5\r\n\r\n0 1\r\n\r\n"
    );
}

#[test]
fn test_read_traces_splits_on_blank_lines() {
    let text = "0 1\n0.5  2\n1 3\n\n\n0 4\r\n0.5 5\r\n";
    let traces = read_traces(Cursor::new(text)).unwrap();

    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].intensities(), &[1.0, 2.0, 3.0]);
    assert_eq!(traces[1].times(), &[0.0, 0.5]);
}

#[test]
fn test_read_traces_invalid_line() {
    let err = read_traces(Cursor::new("0 1\n0.5 abc\n")).unwrap_err();
    assert!(matches!(err, RecordError::InvalidLine { line: 2, .. }));

    let err = read_traces(Cursor::new("0 1 2\n")).unwrap_err();
    assert!(matches!(err, RecordError::InvalidLine { line: 1, .. }));
}

#[test]
fn test_trace_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("traces.txt");
    let traces = vec![trace(vec![0.0, 0.125, 3.5]), trace(vec![7.0, 8.0])];

    export_traces(&path, &traces).unwrap();
    assert_eq!(import_traces(&path).unwrap(), traces);
}

#[test]
fn test_read_traces_accepts_written_output() {
    let first = trace(vec![0.0, 1.0]);
    let second = trace(vec![5.0, 6.0]);
    let mut buffer = Vec::new();
    write_traces(&mut buffer, [&first, &second]).unwrap();
    assert_eq!(
        String::from_utf8(buffer.clone()).unwrap(),
        "0 0\r\n0.5 1\r\n\r\n0 5\r\n0.5 6\r\n\r\n"
    );

    let traces = read_traces(Cursor::new(buffer)).unwrap();
    assert_eq!(traces, vec![first, second]);
}

#[test]
fn test_read_traces_reports_file_line_after_blank() {
    let err = read_traces(Cursor::new("0 1\n0.5 2\n\n \n0 3\n0.5 x\n")).unwrap_err();
    assert!(matches!(err, RecordError::InvalidLine { line: 6, .. }));
}
