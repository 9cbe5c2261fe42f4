//! Integration tests for the quarantine pass.
//!
//! Photos that never got a barcode name are moved into the quarantine
//! folder when their name starts with a letter.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use barcode_renamer::core::decoder::ManifestDecoder;
use barcode_renamer::core::fs::PlannedOperation;
use barcode_renamer::core::fs::DryRunFileSystem;
use barcode_renamer::core::pipeline::Pipeline;
use predicates::prelude::*;
use std::sync::Arc;

#[test]
fn undetected_alphabetic_names_are_quarantined() {
    let temp = TempDir::new().unwrap();
    temp.child("9999.jpg").touch().unwrap();
    temp.child("IMG001.jpg").touch().unwrap();
    temp.child("IMG002.jpg").touch().unwrap();
    temp.child("notes.jpg").touch().unwrap();

    let decoder = ManifestDecoder::new().with_barcode("IMG002.jpg", "4006381333931");

    let report = Pipeline::builder()
        .root(temp.path())
        .decoder(Box::new(decoder))
        .build()
        .run()
        .unwrap();

    temp.child("4006381333931.jpg").assert(predicate::path::exists());
    temp.child("4006381333931_back.jpg")
        .assert(predicate::path::exists());
    temp.child("9999.jpg").assert(predicate::path::exists());
    temp.child("notes.jpg").assert(predicate::path::missing());
    temp.child("Not_detectable/notes.jpg")
        .assert(predicate::path::exists());

    assert_eq!(report.summary.quarantined, 1);
    assert_eq!(report.summary.undetected, 2);
}

#[test]
fn parallel_directories_never_overwrite_quarantined_photos() {
    let temp = TempDir::new().unwrap();
    for i in 0..64 {
        temp.child(format!("shoot{:02}/notes.jpg", i)).touch().unwrap();
    }

    let pipeline = Pipeline::builder()
        .root(temp.path())
        .recursive(true)
        .parallel(true)
        .decoder(Box::new(ManifestDecoder::new()))
        .build();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(16)
        .build()
        .unwrap();
    let report = pool.install(|| pipeline.run()).unwrap();

    let left_in_place = (0..64)
        .filter(|i| {
            temp.path()
                .join(format!("shoot{:02}/notes.jpg", i))
                .exists()
        })
        .count();

    // one move wins, every other directory keeps its photo
    temp.child("Not_detectable/notes.jpg")
        .assert(predicate::path::exists());
    assert_eq!(report.summary.quarantined, 1);
    assert_eq!(left_in_place, 63);
    assert_eq!(report.summary.failures, 63);
}

#[test]
fn custom_quarantine_folder_is_used() {
    let temp = TempDir::new().unwrap();
    temp.child("blurry.png").touch().unwrap();

    Pipeline::builder()
        .root(temp.path())
        .quarantine_dir(Some("Review".to_string()))
        .decoder(Box::new(ManifestDecoder::new()))
        .build()
        .run()
        .unwrap();

    temp.child("Review/blurry.png").assert(predicate::path::exists());
    temp.child("Not_detectable").assert(predicate::path::missing());
}

#[test]
fn quarantine_folder_is_not_rescanned() {
    let temp = TempDir::new().unwrap();
    temp.child("Not_detectable/old.jpg").touch().unwrap();
    temp.child("new.jpg").touch().unwrap();

    let report = Pipeline::builder()
        .root(temp.path())
        .recursive(true)
        .decoder(Box::new(ManifestDecoder::new()))
        .build()
        .run()
        .unwrap();

    assert_eq!(report.summary.total_images, 1);
    temp.child("Not_detectable/old.jpg")
        .assert(predicate::path::exists());
    temp.child("Not_detectable/new.jpg")
        .assert(predicate::path::exists());
}

#[test]
fn dry_run_plans_quarantine_without_moving() {
    let temp = TempDir::new().unwrap();
    temp.child("label.jpg").touch().unwrap();

    let fs = Arc::new(DryRunFileSystem::new());
    Pipeline::builder()
        .root(temp.path())
        .dry_run(true)
        .file_system(fs.clone())
        .decoder(Box::new(ManifestDecoder::new()))
        .build()
        .run()
        .unwrap();

    temp.child("label.jpg").assert(predicate::path::exists());
    temp.child("Not_detectable").assert(predicate::path::missing());

    let operations = fs.operations();
    assert_eq!(operations.len(), 2);
    assert!(matches!(operations[0], PlannedOperation::CreateDir { .. }));
    assert!(matches!(operations[1], PlannedOperation::Rename { .. }));
}
