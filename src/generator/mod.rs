//! AI-assisted scenario drafting from feature descriptions.
//!
//! Sends a natural-language description of a chatbot feature to the
//! Anthropic `/v1/messages` API and parses the reply into candidate
//! [`ScenarioRecord`]s. Drafts pass the registry's validation before they
//! are saved as TOML for human review. Entirely optional: the suite runs
//! without an API key, this module is only invoked on request.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::analyst::{
    joined_text, Message, MessagesRequest, MessagesResponse, post_messages, safe_file_name,
    sanitize_error_body,
};
use crate::scenario::{ScenarioError, ScenarioRecord, ScenarioRegistry};

const MAX_TOKENS: u32 = 4000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by the scenario generator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP transport failure.
    #[error("generator request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not contain a parseable scenario list.
    #[error("generator response parse error: {0}")]
    Parse(String),
    /// Upstream API responded with an error status.
    #[error("generator API returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The drafted records do not form a valid registry.
    #[error("generated scenarios failed validation: {0}")]
    Invalid(#[from] ScenarioError),
    /// The feature description was blank.
    #[error("feature description is empty")]
    EmptyDescription,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Client for the Anthropic messages API, specialised to one job: draft
/// scenario records covering a described chatbot feature.
#[derive(Clone)]
pub struct ScenarioGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for ScenarioGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioGenerator")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl ScenarioGenerator {
    /// Create a generator using the given API key and model identifier.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Ask the model to draft scenario records for one feature description.
    ///
    /// Returned records have passed registry validation, but their phrase
    /// contracts still deserve review before anything depends on them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::EmptyDescription`] for a blank description,
    /// [`GeneratorError::Invalid`] when the drafted records do not validate,
    /// and API, network, or parse errors otherwise.
    pub async fn generate(&self, description: &str) -> Result<Vec<ScenarioRecord>, GeneratorError> {
        if description.trim().is_empty() {
            return Err(GeneratorError::EmptyDescription);
        }

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_owned(),
                content: build_prompt(description),
            }],
        };

        debug!(model = %self.model, "requesting scenario drafts");

        let (status, body) = post_messages(&self.client, &self.api_key, &request).await?;
        if !status.is_success() {
            return Err(GeneratorError::HttpStatus {
                status: status.as_u16(),
                body: sanitize_error_body(&body),
            });
        }

        parse_scenarios(&body)
    }
}

/// Build the drafting prompt for one feature description.
fn build_prompt(description: &str) -> String {
    format!(
        "You are an expert QA engineer designing conversational-contract scenarios for \
         healthcare support chatbots.\n\n\
         Given this feature description:\n{description}\n\n\
         Generate a scenario suite that includes:\n\n\
         1. **Happy Path Scenarios**\n\
            - Core questions the chatbot must answer directly\n\n\
         2. **Edge Cases**\n\
            - Boundary conditions and unusual but valid questions\n\n\
         3. **Healthcare-Specific Validations** (if applicable)\n\
            - Medical questions must defer to a physician\n\
            - No specific medication names may be suggested\n\
            - Account questions must point at customer support\n\n\
         Each scenario is one JSON object with exactly these fields:\n\
         - \"name\": short unique label\n\
         - \"user_input\": the message sent to the chatbot\n\
         - \"category\": one of \"timing\", \"medical_interpretation\", \"medical_advice\", \
         \"account_management\", \"general_health\"\n\
         - \"expected\": one of \"answer_directly\", \"defer_to_physician\", \"account_support\"\n\
         - \"should_contain\": lower-case phrases, of which at least one must appear in the reply\n\
         - \"should_not_contain\": lower-case phrases, none of which may appear in the reply\n\n\
         Phrases are matched as case-insensitive substrings, so keep them short and robust to \
         rephrasing, and never list the same phrase in both fields.\n\n\
         Output ONLY a valid JSON array of scenario objects. Do not include explanations \
         outside the JSON."
    )
}

/// Extract validated scenario records from the API response body.
fn parse_scenarios(body: &str) -> Result<Vec<ScenarioRecord>, GeneratorError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| GeneratorError::Parse(e.to_string()))?;
    let text = joined_text(response);
    if text.is_empty() {
        return Err(GeneratorError::Parse(
            "response contained no text blocks".to_owned(),
        ));
    }

    let records: Vec<ScenarioRecord> = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| GeneratorError::Parse(format!("scenario JSON did not parse: {e}")))?;
    if records.is_empty() {
        return Err(GeneratorError::Parse(
            "response contained no scenarios".to_owned(),
        ));
    }

    // The registry's construction checks guarantee a draft that loads.
    ScenarioRegistry::new(records.clone())?;
    Ok(records)
}

/// Strip a surrounding markdown code fence, if the model added one.
fn strip_code_fence(text: &str) -> &str {
    for fence in ["```json", "```"] {
        if let Some((_, after)) = text.split_once(fence) {
            return match after.split_once("```") {
                Some((inner, _)) => inner.trim(),
                None => after.trim(),
            };
        }
    }
    text.trim()
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ScenarioFile {
    scenarios: Vec<ScenarioRecord>,
}

/// Save drafted records under `dir` as a dated TOML file.
///
/// Returns the path of the saved file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub async fn save_scenarios(
    records: &[ScenarioRecord],
    description: &str,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create scenario directory {}", dir.display()))?;

    let file_name = format!(
        "generated-{}-{}.toml",
        safe_file_name(description),
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);

    let file = ScenarioFile {
        scenarios: records.to_vec(),
    };
    let contents = toml::to_string_pretty(&file).context("failed to serialize scenarios")?;
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("failed to write scenario file {}", path.display()))?;

    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
