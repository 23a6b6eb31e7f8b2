//! Run report persistence.

use turing::driver::scripted::ScriptedDriver;
use turing::runner::{self, RunReport, SuiteRunner};
use turing::scenario::{Category, ResponseBehavior, ScenarioRecord, ScenarioRegistry};

fn small_registry() -> ScenarioRegistry {
    let records = vec![
        ScenarioRecord {
            name: "results timing".to_owned(),
            user_input: "When are results ready?".to_owned(),
            category: Category::Timing,
            expected: ResponseBehavior::AnswerDirectly,
            should_contain: vec!["days".to_owned()],
            should_not_contain: vec!["physician".to_owned()],
        },
        ScenarioRecord {
            name: "tsh meaning".to_owned(),
            user_input: "What does my TSH mean?".to_owned(),
            category: Category::MedicalInterpretation,
            expected: ResponseBehavior::DeferToPhysician,
            should_contain: vec!["thyroid".to_owned()],
            should_not_contain: vec!["levothyroxine".to_owned()],
        },
    ];
    ScenarioRegistry::new(records).expect("fixture records should validate")
}

fn driver() -> ScriptedDriver {
    ScriptedDriver::new()
        .with_reply("When are results ready?", "Within 5 business days.")
        .with_reply(
            "What does my TSH mean?",
            "A thyroid question is best answered by your physician.",
        )
}

#[tokio::test]
async fn report_round_trips_through_json() {
    let report = SuiteRunner::default().run(&small_registry(), &driver()).await;
    let dir = tempfile::tempdir().expect("tempdir should create");

    let path = runner::write_report(&report, dir.path())
        .await
        .expect("report should write");

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("report path should have a name");
    assert!(file_name.starts_with("run-"), "got {file_name}");
    assert!(file_name.ends_with(".json"), "got {file_name}");

    let raw = tokio::fs::read_to_string(&path)
        .await
        .expect("report file should read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("report should be JSON");
    assert_eq!(
        value["run_id"],
        report.run_id.to_string().as_str(),
        "run id must serialize as a hyphenated string"
    );

    let parsed: RunReport = serde_json::from_str(&raw).expect("report should parse back");
    assert_eq!(parsed.run_id, report.run_id);
    assert_eq!(parsed.total, 2);
    assert_eq!(parsed.passed, 2);
    assert_eq!(parsed.outcomes.len(), 2);
    assert_eq!(parsed.outcomes[1].name, "tsh meaning");
}

#[tokio::test]
async fn write_leaves_no_temp_file_behind() {
    let report = SuiteRunner::default().run(&small_registry(), &driver()).await;
    let dir = tempfile::tempdir().expect("tempdir should create");

    runner::write_report(&report, dir.path())
        .await
        .expect("report should write");

    let mut entries = tokio::fs::read_dir(dir.path())
        .await
        .expect("report dir should list");
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.expect("dir entry should read") {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    assert_eq!(names.len(), 1, "only the final report should remain: {names:?}");
    assert!(!names[0].ends_with(".tmp"));
}

#[tokio::test]
async fn report_directory_is_created_on_demand() {
    let report = SuiteRunner::default().run(&small_registry(), &driver()).await;
    let dir = tempfile::tempdir().expect("tempdir should create");
    let nested = dir.path().join("nested").join("reports");

    let path = runner::write_report(&report, &nested)
        .await
        .expect("report should write into a fresh directory");
    assert!(path.starts_with(&nested));
}
