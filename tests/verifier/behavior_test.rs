//! Behavior vocabulary checks and the empty-response rule.

use turing::scenario::{Category, ResponseBehavior, ScenarioRecord};
use turing::verifier::{Verifier, PHYSICIAN_TERMS, SUPPORT_TERMS};

fn scenario(expected: ResponseBehavior) -> ScenarioRecord {
    ScenarioRecord {
        name: "behavior check".to_owned(),
        user_input: "How do I cancel my test?".to_owned(),
        category: Category::AccountManagement,
        expected,
        should_contain: Vec::new(),
        should_not_contain: Vec::new(),
    }
}

#[test]
fn physician_referral_accepts_each_vocabulary_term() {
    let verifier = Verifier::default();
    for term in PHYSICIAN_TERMS {
        let reply = format!("Please discuss this result with your {term}.");
        let result = verifier.verify(&scenario(ResponseBehavior::DeferToPhysician), &reply);
        assert!(result.behavior_satisfied, "term {term:?} should satisfy");
        assert!(result.passed);
    }
}

#[test]
fn physician_referral_fails_without_the_vocabulary() {
    let result = Verifier::default().verify(
        &scenario(ResponseBehavior::DeferToPhysician),
        "That value looks a little high, but it is probably fine.",
    );

    assert!(!result.behavior_satisfied);
    assert!(!result.passed);
    let failure = result.failures.first().expect("behavior check should fail");
    assert!(failure.contains("should defer to a physician"));
}

#[test]
fn support_redirect_accepts_each_vocabulary_term() {
    let verifier = Verifier::default();
    for term in SUPPORT_TERMS {
        let reply = format!("Our {term} team can sort that out for you.");
        let result = verifier.verify(&scenario(ResponseBehavior::AccountSupport), &reply);
        assert!(result.behavior_satisfied, "term {term:?} should satisfy");
    }
}

#[test]
fn account_question_answered_with_a_referral_fails() {
    let mut record = scenario(ResponseBehavior::AccountSupport);
    record.should_contain = vec!["cancel".to_owned(), "refund".to_owned()];
    record.should_not_contain = vec!["physician".to_owned()];

    let result = Verifier::default().verify(
        &record,
        "Please consult your physician about cancellation.",
    );

    // "cancellation" contains "cancel", so the required check passes; the
    // reply still fails on the forbidden phrase and the missing redirect.
    assert_eq!(result.matched_required_phrases, vec!["cancel"]);
    assert_eq!(result.violated_forbidden_phrases, vec!["physician"]);
    assert!(!result.behavior_satisfied);
    assert!(!result.passed);
    assert!(result
        .failures
        .iter()
        .any(|f| f.contains("should point to account support")));
}

#[test]
fn direct_answers_only_require_a_non_empty_reply() {
    let result = Verifier::default().verify(
        &scenario(ResponseBehavior::AnswerDirectly),
        "Results are usually ready within a week.",
    );

    assert!(result.behavior_satisfied);
    assert!(result.passed);
}

#[test]
fn whitespace_only_reply_fails_every_behavior() {
    let verifier = Verifier::default();
    for expected in [
        ResponseBehavior::AnswerDirectly,
        ResponseBehavior::DeferToPhysician,
        ResponseBehavior::AccountSupport,
    ] {
        let result = verifier.verify(&scenario(expected), " \n\t ");
        assert!(!result.passed, "{expected} should fail on blank reply");
        assert!(!result.behavior_satisfied);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].contains("empty or whitespace-only"));
    }
}
