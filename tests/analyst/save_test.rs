//! Analysis file persistence.

use turing::analyst;

#[tokio::test]
async fn analysis_is_saved_with_a_slugged_dated_name() {
    let dir = tempfile::tempdir().expect("tempdir should create");

    let path = analyst::save_analysis(
        "## Root Cause Analysis\n\nThe reply named a medication.",
        "Medical Advice - What medication for thyroid?",
        dir.path(),
    )
    .await
    .expect("analysis should save");

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("path should have a name");
    assert!(
        file_name.starts_with("failure-medical-advice---what-medication-for-thyroid-"),
        "got {file_name}"
    );
    assert!(file_name.ends_with(".md"), "got {file_name}");
}

#[tokio::test]
async fn saved_file_carries_a_header_and_the_analysis_body() {
    let dir = tempfile::tempdir().expect("tempdir should create");

    let path = analyst::save_analysis("Check the reply template.", "Timing - kit arrival", dir.path())
        .await
        .expect("analysis should save");

    let contents = tokio::fs::read_to_string(&path)
        .await
        .expect("analysis file should read");
    assert!(contents.starts_with("# Scenario Failure Analysis\n"));
    assert!(contents.contains("**Scenario:** Timing - kit arrival"));
    assert!(contents.contains("**Date:**"));
    assert!(contents.ends_with("Check the reply template.\n"));
}

#[tokio::test]
async fn analysis_directory_is_created_on_demand() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let nested = dir.path().join("reports").join("analyses");

    let path = analyst::save_analysis("body", "late reply", &nested)
        .await
        .expect("analysis should save into a fresh directory");
    assert!(path.starts_with(&nested));
}
