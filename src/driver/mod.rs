//! Chat driver abstractions and implementations.
//!
//! A driver turns one user-input string into the chatbot's captured reply
//! text. Everything behind that boundary (browser lifecycle, iframe
//! traversal, DOM polling) belongs to the driver implementation; the
//! verification engine only ever sees text.

use async_trait::async_trait;

pub mod bridge;
pub mod scripted;

/// Driver implementation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// In-process canned-reply driver for offline runs.
    Scripted,
    /// HTTP client for the browser-automation sidecar.
    Bridge,
}

impl DriverKind {
    /// Short name used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scripted => "scripted",
            Self::Bridge => "bridge",
        }
    }
}

/// Health status for a concrete driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverHealth {
    /// Driver is operational.
    Healthy {
        /// Driver implementation kind.
        kind: DriverKind,
        /// Human-readable diagnostics.
        details: String,
    },
    /// Driver is reachable but not fully functional.
    Degraded {
        /// Driver implementation kind.
        kind: DriverKind,
        /// Human-readable diagnostics.
        details: String,
    },
    /// Driver is not available.
    Unavailable {
        /// Driver implementation kind.
        kind: DriverKind,
        /// Human-readable diagnostics.
        details: String,
    },
}

impl DriverHealth {
    /// Returns `true` when the driver is in a healthy state.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Errors produced by chat drivers.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// No reply was observed before the deadline. Callers treat this the
    /// same as an empty captured response.
    #[error("no reply captured within {seconds}s")]
    Timeout {
        /// Deadline budget in seconds.
        seconds: u64,
    },
    /// HTTP transport failure.
    #[error("chat transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Reply payload did not match the expected schema.
    #[error("chat driver returned malformed payload: {0}")]
    Protocol(String),
    /// Driver cannot serve requests with the current configuration.
    #[error("chat driver unavailable: {0}")]
    Unavailable(String),
}

/// Unified driver interface consumed by the suite runner.
///
/// Implementations must be `Send + Sync` so a single driver instance can be
/// shared across async task boundaries.
#[async_trait]
pub trait ChatDriver: Send + Sync {
    /// Send one user turn and block until the chatbot's reply text is
    /// captured.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Timeout`] when no reply arrives in time and
    /// [`DriverError::Transport`]/[`DriverError::Protocol`] on wire
    /// failures. Implementations must not return an `Ok` blank string for
    /// a missing reply; that case is a timeout.
    async fn send_and_capture(&self, user_input: &str) -> Result<String, DriverError>;

    /// Check health for this driver instance.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] only on failures that prevent forming a
    /// health verdict at all; an unhealthy target is reported through
    /// [`DriverHealth`], not an error.
    async fn health_check(&self) -> Result<DriverHealth, DriverError>;

    /// Returns concrete driver kind.
    fn kind(&self) -> DriverKind;
}
