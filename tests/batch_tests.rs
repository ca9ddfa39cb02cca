#![cfg(feature = "stl-io")]

mod support;

use dentclean::batch::{BatchOutcome, FAILED_MARKER, process_folder, write_csv_report};
use dentclean::config::CleaningParams;
use dentclean::errors::ProcessError;
use dentclean::plane::Plane;
use nalgebra::Point3;
use support::arch_with_teeth;

#[test]
fn folder_run_survives_a_broken_file() {
    let scans = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");

    let lower = arch_with_teeth();
    lower
        .write_stl(&scans.path().join("a_lower.stl"))
        .expect("write");
    lower
        .mirror(&Plane::horizontal(Point3::origin()))
        .write_stl(&scans.path().join("b_upper.STL"))
        .expect("write");
    std::fs::write(scans.path().join("c_broken.stl"), b"garbage").expect("write");
    std::fs::write(scans.path().join("readme.txt"), b"not a scan").expect("write");

    let records = process_folder(scans.path(), CleaningParams::default(), out.path()).expect("batch");
    let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["a_lower.stl", "b_upper.STL", "c_broken.stl"]);

    assert!(records[0].is_success());
    assert!(records[1].is_success());
    assert!(matches!(records[2].outcome, BatchOutcome::Failed(_)));
    assert_eq!(records[2].time_cell(), FAILED_MARKER);

    assert!(out.path().join("a_lower_cleaned.stl").is_file());
    assert!(out.path().join("b_upper_cleaned.STL").is_file());
    assert!(!out.path().join("c_broken_cleaned.stl").exists());

    let report = out.path().join("times.csv");
    write_csv_report(&records, &report).expect("report");
    let text = std::fs::read_to_string(&report).expect("read report");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "File Name,Execution Time (Seconds)");
    assert!(lines[1].starts_with("a_lower.stl,"));
    lines[1]
        .split(',')
        .nth(1)
        .expect("time column")
        .parse::<f64>()
        .expect("seconds");
    assert_eq!(lines[3], "c_broken.stl,ERROR");
}

#[test]
fn invalid_parameters_fail_the_whole_batch() {
    let scans = tempfile::tempdir().expect("tempdir");
    let params = CleaningParams::default().cell_size(0.0);
    let err = process_folder(scans.path(), params, scans.path()).unwrap_err();
    assert!(matches!(err, ProcessError::Clean(_)));
}

#[test]
fn empty_folder_gives_no_records() {
    let scans = tempfile::tempdir().expect("tempdir");
    let records = process_folder(scans.path(), CleaningParams::default(), scans.path()).expect("batch");
    assert!(records.is_empty());
}
