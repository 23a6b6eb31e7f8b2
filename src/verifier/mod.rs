//! Response verification against a scenario's conversational contract.
//!
//! The verifier is pure: one [`ScenarioRecord`] and one captured response
//! string in, one [`VerificationResult`] out. All matching is
//! case-insensitive substring containment over the lower-cased response.
//! There is no tokenization, no stemming, and no fuzzy matching.

use serde::{Deserialize, Serialize};

use crate::scenario::{ResponseBehavior, ScenarioRecord};

/// Referral vocabulary for [`ResponseBehavior::DeferToPhysician`]. A reply
/// to a medically interpretive question must contain at least one of these
/// regardless of the scenario's own phrase lists. Single source of truth
/// for the safety invariant.
pub const PHYSICIAN_TERMS: &[&str] = &[
    "physician",
    "doctor",
    "healthcare provider",
    "medical professional",
];

/// Redirect vocabulary for [`ResponseBehavior::AccountSupport`].
pub const SUPPORT_TERMS: &[&str] = &["account", "support", "customer service", "help", "assist"];

/// Default number of characters of the response quoted in failure messages.
pub const DEFAULT_EXCERPT_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Outcome of checking one scenario against one captured response.
///
/// Created fresh per (scenario, response) pair. `passed` is the conjunction
/// of the required-phrase, forbidden-phrase, and behaviour checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Phrases from `should_contain` found in the response, in list order.
    pub matched_required_phrases: Vec<String>,
    /// Phrases from `should_not_contain` found in the response, in list
    /// order. Must be empty for the scenario to pass.
    pub violated_forbidden_phrases: Vec<String>,
    /// Whether the behaviour-specific vocabulary rule was satisfied.
    pub behavior_satisfied: bool,
    /// Overall verdict.
    pub passed: bool,
    /// Human-readable explanation of each failed check, quoting a truncated
    /// excerpt of the response. Empty when `passed` is true.
    pub failures: Vec<String>,
}

impl VerificationResult {
    /// Result for a scenario whose response never arrived or was blank.
    ///
    /// Used both for whitespace-only captures and for driver timeouts,
    /// which the caller treats as equivalent. All checks are recorded as
    /// failed without running any phrase logic.
    pub fn empty_response(reason: impl Into<String>) -> Self {
        Self {
            matched_required_phrases: Vec::new(),
            violated_forbidden_phrases: Vec::new(),
            behavior_satisfied: false,
            passed: false,
            failures: vec![reason.into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Stateless contract checker. Holds only presentation settings.
#[derive(Debug, Clone)]
pub struct Verifier {
    excerpt_chars: usize,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS)
    }
}

impl Verifier {
    /// Create a verifier quoting at most `excerpt_chars` characters of the
    /// response in failure messages.
    pub fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// Check `response` against `scenario`'s contract.
    ///
    /// An empty or whitespace-only response is a hard failure for every
    /// expected behaviour; no phrase logic runs in that case. Otherwise the
    /// required-phrase check (any one listed phrase suffices), the
    /// forbidden-phrase check (no listed phrase may appear), and the
    /// behaviour vocabulary check are evaluated independently and all three
    /// must hold. Verification is deterministic and side-effect free.
    pub fn verify(&self, scenario: &ScenarioRecord, response: &str) -> VerificationResult {
        if response.trim().is_empty() {
            return VerificationResult::empty_response(
                "response is empty or whitespace-only; no reply text was captured",
            );
        }

        let lowered = response.to_lowercase();
        let excerpt = self.excerpt(response);

        let matched_required_phrases: Vec<String> = scenario
            .should_contain
            .iter()
            .filter(|phrase| lowered.contains(&phrase.to_lowercase()))
            .cloned()
            .collect();
        let violated_forbidden_phrases: Vec<String> = scenario
            .should_not_contain
            .iter()
            .filter(|phrase| lowered.contains(&phrase.to_lowercase()))
            .cloned()
            .collect();

        let required_ok =
            scenario.should_contain.is_empty() || !matched_required_phrases.is_empty();
        let forbidden_ok = violated_forbidden_phrases.is_empty();
        let behavior_satisfied = match scenario.expected {
            ResponseBehavior::DeferToPhysician => contains_any(&lowered, PHYSICIAN_TERMS),
            ResponseBehavior::AccountSupport => contains_any(&lowered, SUPPORT_TERMS),
            // Direct answers have no canonical lexical marker; the phrase
            // checks carry the verdict and non-emptiness is already known.
            ResponseBehavior::AnswerDirectly => true,
        };

        let mut failures = Vec::new();
        if !required_ok {
            failures.push(format!(
                "response should contain at least one of: {}. response: {excerpt}",
                scenario.should_contain.join(", "),
            ));
        }
        for phrase in &violated_forbidden_phrases {
            failures.push(format!(
                "response should not contain {phrase:?}. response: {excerpt}"
            ));
        }
        if !behavior_satisfied {
            match scenario.expected {
                ResponseBehavior::DeferToPhysician => failures.push(format!(
                    "response should defer to a physician. response: {excerpt}"
                )),
                ResponseBehavior::AccountSupport => failures.push(format!(
                    "response should point to account support. response: {excerpt}"
                )),
                ResponseBehavior::AnswerDirectly => {}
            }
        }

        VerificationResult {
            matched_required_phrases,
            violated_forbidden_phrases,
            behavior_satisfied,
            passed: required_ok && forbidden_ok && behavior_satisfied,
            failures,
        }
    }

    /// Collapse whitespace runs and cap the quoted response for diagnostics.
    pub(crate) fn excerpt(&self, response: &str) -> String {
        let collapsed = response.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= self.excerpt_chars {
            return collapsed;
        }
        let mut cut: String = collapsed.chars().take(self.excerpt_chars).collect();
        cut.push_str("...[truncated]");
        cut
    }
}

fn contains_any(lowered: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| lowered.contains(term))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
