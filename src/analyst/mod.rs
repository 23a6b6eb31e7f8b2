//! AI-assisted analysis of failed scenarios.
//!
//! Sends one failed [`ScenarioOutcome`] at a time to the Anthropic
//! `/v1/messages` API and returns the model's debugging suggestions as
//! markdown. Analyses can be saved next to the run reports for later
//! review. Entirely optional: runs work without an API key, this module
//! is only invoked on request.
//!
//! The messages-API wire types and transport live here and are shared
//! with the scenario generator in [`crate::generator`].

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runner::ScenarioOutcome;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 3000;

/// Cap on upstream error bodies quoted in `HttpStatus` errors.
const MAX_ERROR_BODY_CHARS: usize = 256;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by the failure analyst.
#[derive(Debug, thiserror::Error)]
pub enum AnalystError {
    /// HTTP transport failure.
    #[error("analyst request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("analyst response parse error: {0}")]
    Parse(String),
    /// Upstream API responded with an error status.
    #[error("analyst API returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The analysed outcome has nothing to explain.
    #[error("scenario {0:?} passed; there is no failure to analyse")]
    NothingToAnalyse(String),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request envelope for the messages API.
#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
    pub(crate) messages: Vec<Message>,
}

/// One conversation turn in a [`MessagesRequest`].
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub(crate) role: String,
    pub(crate) content: String,
}

/// Response envelope from the messages API.
#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub(crate) content: Vec<ContentBlock>,
}

/// Typed content block; non-text blocks are tolerated and skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Unknown,
}

/// POST one request to the messages API and hand back the raw status and
/// body. Callers map non-success statuses into their own error types.
pub(crate) async fn post_messages(
    client: &reqwest::Client,
    api_key: &str,
    request: &MessagesRequest,
) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
    let response = client
        .post(ANTHROPIC_API_BASE)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(request)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

/// Concatenate a response's text blocks, skipping unknown block types.
pub(crate) fn joined_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Unknown => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Analyst
// ---------------------------------------------------------------------------

/// Client for the Anthropic messages API, specialised to one job: explain
/// why a chatbot reply broke its conversational contract.
#[derive(Clone)]
pub struct FailureAnalyst {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for FailureAnalyst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureAnalyst")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl FailureAnalyst {
    /// Create an analyst using the given API key and model identifier.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Ask the model to explain one failed outcome.
    ///
    /// Returns markdown analysis text.
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::NothingToAnalyse`] for a passed outcome and
    /// API, network, or parse errors otherwise.
    pub async fn analyze(&self, outcome: &ScenarioOutcome) -> Result<String, AnalystError> {
        if outcome.passed() {
            return Err(AnalystError::NothingToAnalyse(outcome.name.clone()));
        }

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_owned(),
                content: build_prompt(outcome),
            }],
        };

        debug!(scenario = %outcome.name, model = %self.model, "requesting failure analysis");

        let (status, body) = post_messages(&self.client, &self.api_key, &request).await?;
        if !status.is_success() {
            return Err(AnalystError::HttpStatus {
                status: status.as_u16(),
                body: sanitize_error_body(&body),
            });
        }

        parse_analysis(&body)
    }
}

/// Build the analysis prompt for one failed outcome.
fn build_prompt(outcome: &ScenarioOutcome) -> String {
    let reply = if outcome.response_excerpt.is_empty() {
        "(no reply was captured)"
    } else {
        outcome.response_excerpt.as_str()
    };
    let failed_checks = outcome
        .result
        .failures
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert QA debugging specialist for conversational contract tests of \
         healthcare support chatbots.\n\n\
         A scenario has failed and needs analysis:\n\n\
         Scenario: {name}\n\
         User input: {input}\n\
         Expected behaviour: {expected}\n\
         Captured reply: {reply}\n\n\
         Failed checks:\n{failed_checks}\n\n\
         Please provide a comprehensive analysis including:\n\n\
         1. **Root Cause Analysis**\n\
            - What is the most likely cause of this failure?\n\
            - Is this a chatbot issue, a scenario-contract issue, or an environmental issue?\n\
            - Are there any red flags in the captured reply?\n\n\
         2. **Immediate Fix**\n\
            - Should the chatbot's behaviour change, or the scenario's phrase lists?\n\
            - Give the exact phrasing or contract change you recommend\n\
            - Explain why this fix works\n\n\
         3. **Robustness Improvements**\n\
            - How to make this scenario less brittle to benign rephrasings\n\
            - Better required/forbidden phrase choices\n\
            - Timeout or capture improvements if the reply was missing\n\n\
         4. **Additional Test Coverage**\n\
            - What related scenarios should also be tested?\n\
            - Are there edge cases this failure revealed?\n\n\
         5. **Healthcare-Specific Considerations**\n\
            - Could this failure let unsafe medical advice through?\n\
            - Does it weaken the physician-referral safety net?\n\
            - Any compliance concerns?\n\n\
         Be specific and actionable.",
        name = outcome.name,
        input = outcome.user_input,
        expected = outcome.expected,
    )
}

/// Extract the markdown analysis from the API response body.
fn parse_analysis(body: &str) -> Result<String, AnalystError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| AnalystError::Parse(e.to_string()))?;
    let text = joined_text(response);
    if text.is_empty() {
        return Err(AnalystError::Parse(
            "response contained no text blocks".to_owned(),
        ));
    }
    Ok(text)
}

/// Collapse and truncate an upstream error body before quoting it.
pub(crate) fn sanitize_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened: String = collapsed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return format!("{shortened}...[truncated]");
    }
    collapsed
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Save one analysis under `dir` as a dated markdown file.
///
/// Returns the path of the saved file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub async fn save_analysis(
    analysis: &str,
    scenario_name: &str,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create analysis directory {}", dir.display()))?;

    let now = Utc::now();
    let file_name = format!(
        "failure-{}-{}.md",
        safe_file_name(scenario_name),
        now.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);

    let contents = format!(
        "# Scenario Failure Analysis\n\n**Scenario:** {scenario_name}\n**Date:** {}\n\n---\n\n{analysis}\n",
        now.format("%Y-%m-%d %H:%M:%S")
    );
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("failed to write analysis file {}", path.display()))?;

    Ok(path)
}

/// Reduce a scenario name or feature description to a filesystem-safe slug.
pub(crate) fn safe_file_name(name: &str) -> String {
    name.chars()
        .take(50)
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .trim()
        .replace(' ', "-")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
