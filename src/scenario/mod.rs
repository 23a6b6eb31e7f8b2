//! Scenario records and the validated scenario registry.
//!
//! A [`ScenarioRecord`] is one scripted conversation turn together with the
//! lexical contract its reply must honour. Records are grouped by
//! [`Category`] for listing and reporting only; the behaviour a reply is
//! held to comes solely from [`ResponseBehavior`].
//!
//! The [`ScenarioRegistry`] is built once at startup, validates every record
//! on construction, and never changes afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// The behaviour a chatbot reply is expected to fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseBehavior {
    /// The reply answers the question itself.
    AnswerDirectly,
    /// The reply defers to a physician or healthcare provider.
    DeferToPhysician,
    /// The reply redirects to account or customer support.
    AccountSupport,
}

impl ResponseBehavior {
    /// Human-readable label used in listings and failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnswerDirectly => "answer directly",
            Self::DeferToPhysician => "defer to physician",
            Self::AccountSupport => "account support",
        }
    }
}

impl fmt::Display for ResponseBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Topical grouping for scenarios. Organizational only — it never affects
/// how a reply is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Turnaround and shipping-time questions.
    Timing,
    /// Questions asking what a lab value means.
    MedicalInterpretation,
    /// Questions asking for treatment or medication guidance.
    MedicalAdvice,
    /// Orders, refunds, addresses, dashboards.
    AccountManagement,
    /// General product and preparation questions.
    GeneralHealth,
}

impl Category {
    /// All categories in catalogue order.
    pub const ALL: [Category; 5] = [
        Category::Timing,
        Category::MedicalInterpretation,
        Category::MedicalAdvice,
        Category::AccountManagement,
        Category::GeneralHealth,
    ];

    /// Human-readable label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timing => "Timing",
            Self::MedicalInterpretation => "Medical Interpretation",
            Self::MedicalAdvice => "Medical Advice",
            Self::AccountManagement => "Account Management",
            Self::GeneralHealth => "General Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scripted conversation turn and the contract its reply must honour.
///
/// Phrase matching is case-insensitive substring containment on both lists.
/// `should_contain` uses OR semantics — any one listed phrase satisfies the
/// check, because a correct answer can be phrased several equivalent ways.
/// `should_not_contain` uses AND-of-negatives — a single forbidden phrase
/// (for example a medication name) fails the scenario outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Unique human-readable identifier, used for reporting only.
    pub name: String,
    /// The text turn sent to the chatbot. Never blank.
    pub user_input: String,
    /// Topical grouping for listings and reports.
    pub category: Category,
    /// The behaviour the reply is expected to fall into.
    pub expected: ResponseBehavior,
    /// Phrases of which at least one must appear in the reply. An empty
    /// list skips the required-phrase check.
    pub should_contain: Vec<String>,
    /// Phrases none of which may appear in the reply.
    pub should_not_contain: Vec<String>,
}

impl ScenarioRecord {
    /// Validate this record's construction-time invariants.
    ///
    /// A record is malformed when its `name` or `user_input` is blank, when
    /// either phrase list contains a blank phrase (a blank phrase matches
    /// every reply), or when a phrase appears in both lists
    /// (case-insensitively) — required and forbidden at once.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MalformedScenario`] describing the first
    /// violated invariant.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(self.malformed("scenario name is blank"));
        }
        if self.user_input.trim().is_empty() {
            return Err(self.malformed("user input is blank"));
        }
        if self.should_contain.iter().any(|p| p.trim().is_empty())
            || self.should_not_contain.iter().any(|p| p.trim().is_empty())
        {
            return Err(self.malformed("phrase lists must not contain blank phrases"));
        }
        for required in &self.should_contain {
            if self
                .should_not_contain
                .iter()
                .any(|forbidden| forbidden.eq_ignore_ascii_case(required))
            {
                return Err(self.malformed(&format!(
                    "phrase {required:?} is both required and forbidden"
                )));
            }
        }
        Ok(())
    }

    fn malformed(&self, reason: &str) -> ScenarioError {
        ScenarioError::MalformedScenario {
            name: self.name.clone(),
            reason: reason.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building a [`ScenarioRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// A record failed construction-time validation. The registry is not
    /// usable when any record is invalid.
    #[error("malformed scenario {name:?}: {reason}")]
    MalformedScenario {
        /// Name of the offending record (may be blank when the name itself
        /// is the problem).
        name: String,
        /// The violated invariant.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered, immutable collection of validated scenario records.
///
/// Built once at process start; produces the same sequence on every access.
/// Identity of a record is its list position plus its unique `name`.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    records: Vec<ScenarioRecord>,
}

impl ScenarioRegistry {
    /// Build a registry from records, validating each one and rejecting
    /// duplicate names (reports key on the name, so collisions would make
    /// them ambiguous).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MalformedScenario`] for the first invalid
    /// record or duplicated name.
    pub fn new(records: Vec<ScenarioRecord>) -> Result<Self, ScenarioError> {
        let mut seen: HashSet<String> = HashSet::new();
        for record in &records {
            record.validate()?;
            if !seen.insert(record.name.to_lowercase()) {
                return Err(ScenarioError::MalformedScenario {
                    name: record.name.clone(),
                    reason: "duplicate scenario name".to_owned(),
                });
            }
        }
        Ok(Self { records })
    }

    /// All records, in registration order. Deterministic and side-effect
    /// free.
    pub fn scenarios(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Records belonging to one category, in registration order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
