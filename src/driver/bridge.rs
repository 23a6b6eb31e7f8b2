//! Concrete [`ChatDriver`] implementation via HTTP.
//!
//! Connects to the browser-automation sidecar and translates chat turns
//! into HTTP POST requests. The sidecar owns every browser concern: page
//! navigation, locating the chat widget iframe, typing into the message
//! input, and polling for the reply element. This side only speaks JSON.
//!
//! Wire contract, `POST {base_url}/chat`:
//! request `{"url", "message", "timeout_ms"}`, response
//! `{"success", "reply"?, "error"?, "timed_out"?}`. A `GET {base_url}/health`
//! answers 200 when the sidecar holds a usable browser session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChatDriver, DriverError, DriverHealth, DriverKind};

/// Extra budget added to the reply deadline for the HTTP round trip
/// itself, so the sidecar can report its own timeout before reqwest cuts
/// the connection.
const TIMEOUT_BUFFER_MS: u64 = 5_000;

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Cap on sidecar error bodies quoted in [`DriverError::Protocol`].
const MAX_ERROR_BODY_CHARS: usize = 256;

/// HTTP-based chat driver speaking to the browser sidecar.
pub struct BridgeDriver {
    client: reqwest::Client,
    base_url: String,
    target_url: String,
    timeout_secs: u64,
}

impl BridgeDriver {
    /// Create a driver pointing at the sidecar's HTTP API.
    ///
    /// `base_url` is the root URL of the sidecar (e.g.
    /// `http://127.0.0.1:9223`), `target_url` the page hosting the chat
    /// widget, and `timeout_secs` the reply deadline passed through to the
    /// sidecar's DOM polling.
    pub fn new(base_url: String, target_url: String, timeout_secs: u64) -> Self {
        // Build with a connect timeout; the per-request timeout depends on
        // the reply deadline. The builder can only fail on TLS backend
        // init; fall back to the default client in that unlikely case.
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with connect timeout, using default");
                reqwest::Client::default()
            });

        Self {
            client,
            base_url,
            target_url,
            timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    url: &'a str,
    message: &'a str,
    timeout_ms: u64,
}

/// Response envelope from the sidecar.
#[derive(Debug, Deserialize)]
struct ChatReply {
    success: bool,
    reply: Option<String>,
    error: Option<String>,
    #[serde(default)]
    timed_out: bool,
}

#[async_trait]
impl ChatDriver for BridgeDriver {
    /// Send one chat turn through the sidecar and capture the reply text.
    ///
    /// The HTTP timeout is the reply deadline plus a 5-second buffer, so a
    /// sidecar-side timeout normally surfaces through the envelope rather
    /// than as a dropped connection.
    async fn send_and_capture(&self, user_input: &str) -> Result<String, DriverError> {
        let timeout_ms = self.timeout_secs.saturating_mul(1_000);
        let request_timeout =
            std::time::Duration::from_millis(timeout_ms.saturating_add(TIMEOUT_BUFFER_MS));
        let url = format!("{}/chat", self.base_url);

        debug!(timeout_ms, "sending chat turn to sidecar");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                url: &self.target_url,
                message: user_input,
                timeout_ms,
            })
            .timeout(request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DriverError::Timeout {
                        seconds: self.timeout_secs,
                    }
                } else {
                    DriverError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriverError::Protocol(format!(
                "sidecar returned HTTP {status}: {}",
                sanitize_error_body(&body)
            )));
        }

        let body: ChatReply = response
            .json()
            .await
            .map_err(|e| DriverError::Protocol(format!("failed to parse sidecar response: {e}")))?;

        if body.timed_out {
            return Err(DriverError::Timeout {
                seconds: self.timeout_secs,
            });
        }
        if body.success {
            body.reply.ok_or_else(|| {
                DriverError::Protocol("sidecar returned success with no reply text".to_owned())
            })
        } else {
            Err(DriverError::Unavailable(body.error.unwrap_or_else(|| {
                "sidecar returned failure with no error message".to_owned()
            })))
        }
    }

    async fn health_check(&self) -> Result<DriverHealth, DriverError> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(DriverHealth::Healthy {
                kind: DriverKind::Bridge,
                details: format!("sidecar reachable at {}", self.base_url),
            }),
            Ok(response) => Ok(DriverHealth::Degraded {
                kind: DriverKind::Bridge,
                details: format!("sidecar responded with HTTP {}", response.status()),
            }),
            Err(e) => Ok(DriverHealth::Unavailable {
                kind: DriverKind::Bridge,
                details: format!("sidecar not reachable: {e}"),
            }),
        }
    }

    fn kind(&self) -> DriverKind {
        DriverKind::Bridge
    }
}

/// Collapse whitespace and cap an error body so diagnostics stay one line.
fn sanitize_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "(empty body)".to_owned();
    }
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened: String = collapsed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return format!("{shortened}...[truncated]");
    }
    collapsed
}
