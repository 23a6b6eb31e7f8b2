//! In-process driver serving canned Eva replies.
//!
//! Used for offline runs and as a stand-in for the live widget in tests.
//! The built-in corpus mirrors the answers the production chatbot gives
//! for the catalogue inputs.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{ChatDriver, DriverError, DriverHealth, DriverKind};

/// Nominal deadline reported when a scripted lookup has no reply.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Canned replies keyed by exact user input. The reply texts stay inside
/// Eva's conversational contract: medical questions defer to a physician
/// without naming medications, account questions point at support.
const CANNED_REPLIES: &[(&str, &str)] = &[
    (
        "When will my test results be ready?",
        "Most results are ready within 5 to 7 business days after the lab receives your \
         sample. We will email you as soon as they are complete.",
    ),
    (
        "How long does shipping take for my test kit?",
        "Standard shipping takes 3 to 5 business days. You will receive a tracking number \
         once your kit is on its way, and delivery updates land in your inbox.",
    ),
    (
        "When should I expect my test kit to arrive?",
        "Your kit should arrive within 3 to 5 business days of placing your order. Check \
         the tracking link in your shipping confirmation for delivery updates.",
    ),
    (
        "What does my TSH of 5.2 mean?",
        "A TSH of 5.2 is elevated above the typical reference range, which can suggest \
         your thyroid is underactive. Please review this result with your physician or \
         another healthcare provider, who can interpret it in the context of your full \
         health history.",
    ),
    (
        "What does a high cortisol level of 25 indicate?",
        "Cortisol reflects how your body responds to stress, and a value of 25 is on the \
         higher side. A physician can help you understand what this level means for you, \
         so we recommend you consult your healthcare provider about it.",
    ),
    (
        "What does my vitamin D level of 15 mean?",
        "A vitamin D level of 15 is considered low, and many clinicians would call it \
         deficient. Your physician or healthcare provider can advise on safe next steps \
         based on your full picture.",
    ),
    (
        "What does my HbA1c of 6.8 mean?",
        "An HbA1c of 6.8 reflects your average blood sugar over the past few months and \
         sits above the typical range. Please discuss this result with your doctor, who \
         can interpret what it means for your glucose control.",
    ),
    (
        "What does my testosterone level of 300 mean?",
        "A testosterone level of 300 is near the lower end of the typical range for this \
         hormone. A physician or healthcare provider can tell you whether it needs \
         attention given your age and symptoms.",
    ),
    (
        "Should I take medication for my high cholesterol?",
        "That is a decision to make together with a medical professional. We cannot advise \
         on treatment, so please consult your physician, who can weigh your cholesterol \
         numbers against your overall health.",
    ),
    (
        "What medication should I take for my thyroid?",
        "We cannot prescribe or recommend specific treatments. The right choice depends on \
         your labs and history, so please consult your physician or healthcare provider \
         about managing your thyroid.",
    ),
    (
        "Can I treat my low vitamin D with supplements?",
        "Supplement decisions are best made with a medical professional. Please consult \
         your physician or healthcare provider, who can recommend an approach suited to \
         your level and history.",
    ),
    (
        "Should I be concerned about my test results?",
        "The best step is to discuss these results with your physician, who can place them \
         in full context. A healthcare provider will help you decide what follow-up, if \
         any, makes sense for you.",
    ),
    (
        "How do I cancel my test?",
        "You can cancel an order that has not shipped from the Orders page of your \
         account. If it already shipped, contact our customer service team and they will \
         help you arrange a refund.",
    ),
    (
        "How do I update my shipping address?",
        "You can update your shipping address under Account Settings. Open your profile, \
         edit the address on file, and save before your next order ships.",
    ),
    (
        "How do I view my test results?",
        "Login to your account and open the results dashboard. From there you can view \
         each report and access a downloadable copy at any time.",
    ),
    (
        "How do I return my test kit?",
        "To return a kit, contact our support team and we will send you a prepaid \
         shipping label along with step-by-step instructions.",
    ),
    (
        "What tests do you offer?",
        "We offer at-home lab tests across categories like heart health, hormones, \
         vitamins, and general wellness. The full list of available tests is on our \
         website.",
    ),
    (
        "How accurate are your tests?",
        "Our tests are processed by CLIA certified laboratory partners, the same standard \
         used for clinical care, so accuracy matches what you would expect from a \
         traditional lab draw.",
    ),
    (
        "What should I do before taking a test?",
        "Read the instructions included with your kit before you begin. Some tests \
         require fasting or morning collection, so check the preparation steps for your \
         specific test.",
    ),
    (
        "Can I share my results with my doctor?",
        "Absolutely. You can share results with your doctor by downloading a PDF report \
         from your dashboard, then print it or send it electronically.",
    ),
];

/// Driver that answers from an in-memory reply table.
///
/// Lookup is by exact user-input string. A missing entry raises a timeout
/// (matching a live widget that never answers) unless a fallback reply has
/// been set.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    replies: HashMap<String, String>,
    fallback: Option<String>,
}

impl ScriptedDriver {
    /// Create an empty scripted driver. Every send times out until replies
    /// are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver preloaded with the canned Eva corpus for the built-in
    /// catalogue inputs.
    pub fn mock_eva() -> Self {
        let mut driver = Self::new().with_fallback(
            "I want to make sure you get the right answer. Could you rephrase your \
             question, or reach our support team for further assistance?",
        );
        for (input, reply) in CANNED_REPLIES {
            driver = driver.with_reply(*input, *reply);
        }
        driver
    }

    /// Add or replace the reply for one exact user input.
    #[must_use]
    pub fn with_reply(mut self, user_input: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies.insert(user_input.into(), reply.into());
        self
    }

    /// Set the reply used when no exact entry matches.
    #[must_use]
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }
}

#[async_trait]
impl ChatDriver for ScriptedDriver {
    async fn send_and_capture(&self, user_input: &str) -> Result<String, DriverError> {
        if let Some(reply) = self.replies.get(user_input) {
            return Ok(reply.clone());
        }
        match &self.fallback {
            Some(reply) => Ok(reply.clone()),
            None => Err(DriverError::Timeout {
                seconds: DEFAULT_TIMEOUT_SECS,
            }),
        }
    }

    async fn health_check(&self) -> Result<DriverHealth, DriverError> {
        Ok(DriverHealth::Healthy {
            kind: DriverKind::Scripted,
            details: format!("{} canned replies loaded", self.replies.len()),
        })
    }

    fn kind(&self) -> DriverKind {
        DriverKind::Scripted
    }
}
