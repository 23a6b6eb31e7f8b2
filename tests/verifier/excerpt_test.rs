//! Response excerpts quoted in failure messages.

use turing::scenario::{Category, ResponseBehavior, ScenarioRecord};
use turing::verifier::{Verifier, DEFAULT_EXCERPT_CHARS};

fn never_matching_scenario() -> ScenarioRecord {
    ScenarioRecord {
        name: "excerpt check".to_owned(),
        user_input: "What does my TSH of 5.2 mean?".to_owned(),
        category: Category::MedicalInterpretation,
        expected: ResponseBehavior::AnswerDirectly,
        should_contain: vec!["qqzzqq".to_owned()],
        should_not_contain: Vec::new(),
    }
}

fn quoted_excerpt(failure: &str) -> &str {
    failure
        .split("response: ")
        .last()
        .expect("failure should quote the response")
}

#[test]
fn excerpt_collapses_whitespace_runs() {
    let result = Verifier::default().verify(
        &never_matching_scenario(),
        "high   value\n\nsee your\tphysician",
    );

    let failure = result.failures.first().expect("required check should fail");
    assert_eq!(quoted_excerpt(failure), "high value see your physician");
}

#[test]
fn long_replies_are_capped_at_the_default_length() {
    let long = "word ".repeat(100);
    let result = Verifier::default().verify(&never_matching_scenario(), &long);

    let failure = result.failures.first().expect("required check should fail");
    let excerpt = quoted_excerpt(failure);
    assert!(excerpt.ends_with("...[truncated]"));

    let marker_chars = "...[truncated]".chars().count();
    assert_eq!(
        excerpt.chars().count(),
        DEFAULT_EXCERPT_CHARS.saturating_add(marker_chars)
    );
}

#[test]
fn custom_excerpt_length_is_honoured() {
    let result = Verifier::new(20).verify(
        &never_matching_scenario(),
        "a reply that is clearly longer than twenty characters",
    );

    let failure = result.failures.first().expect("required check should fail");
    let excerpt = quoted_excerpt(failure);
    assert_eq!(excerpt, "a reply that is clea...[truncated]");
}

#[test]
fn short_replies_are_quoted_in_full() {
    let result = Verifier::default().verify(&never_matching_scenario(), "short reply");

    let failure = result.failures.first().expect("required check should fail");
    assert_eq!(quoted_excerpt(failure), "short reply");
}
