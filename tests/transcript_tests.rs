// Transcript artifact tests - append-only per-agent logs

use scrumloop::infrastructure::transcript::{TranscriptLog, TranscriptRecord};
use std::fs;
use tempfile::tempdir;

#[test]
fn appended_records_round_trip_in_order() {
    let dir = tempdir().expect("tempdir");
    let log = TranscriptLog::new(dir.path(), "Developer");

    log.append("Product Owner", "This sprint we build the login page.")
        .expect("first append");
    log.append("Developer_thoughts", "Nothing for me yet. Decision: No")
        .expect("second append");
    log.append("Developer", "I can pick up the backend part.")
        .expect("third append");

    let records = log.records();
    assert_eq!(
        records,
        vec![
            TranscriptRecord {
                role: "Product Owner".into(),
                message: "This sprint we build the login page.".into(),
            },
            TranscriptRecord {
                role: "Developer_thoughts".into(),
                message: "Nothing for me yet. Decision: No".into(),
            },
            TranscriptRecord {
                role: "Developer".into(),
                message: "I can pick up the backend part.".into(),
            },
        ]
    );
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let log = TranscriptLog::new(dir.path(), "Scrum Master");
    assert!(log.records().is_empty());
}

#[test]
fn corrupt_file_is_treated_as_empty_and_recoverable() {
    let dir = tempdir().expect("tempdir");
    let log = TranscriptLog::new(dir.path(), "Developer");
    fs::write(log.path(), "{definitely not json").expect("write corrupt file");

    assert!(log.records().is_empty());
    log.append("Developer", "fresh start").expect("append succeeds");
    assert_eq!(log.records().len(), 1);
}

#[test]
fn log_directory_is_created_on_first_append() {
    let dir = tempdir().expect("tempdir");
    let nested = dir.path().join("logs").join("sprint-1");
    let log = TranscriptLog::new(&nested, "Developer");

    log.append("Developer", "hello").expect("append creates directory");
    assert!(nested.join("Developer.json").exists());
}
