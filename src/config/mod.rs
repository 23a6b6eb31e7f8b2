//! Configuration loading and management.
//!
//! Loads verifier configuration from `./turing.toml` (or `$TURING_CONFIG_PATH`).
//! Environment variables override file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
///
/// Path: `./turing.toml` or `$TURING_CONFIG_PATH`.
/// Env vars override file values; file values override defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuringConfig {
    /// Suite runner settings (`[runner]`).
    pub runner: RunnerConfig,
    /// Target chatbot selection (`[target]`).
    pub target: TargetConfig,
    /// Browser sidecar settings (`[bridge]`).
    pub bridge: BridgeConfig,
    /// Run report settings (`[report]`).
    pub report: ReportConfig,
    /// Failure analyst settings (`[analyst]`).
    pub analyst: Option<AnalystConfig>,
}

impl TuringConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$TURING_CONFIG_PATH` or `./turing.toml`.
    /// If the file does not exist, returns defaults.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Load configuration, optionally from an explicit file path.
    ///
    /// With `Some(path)` the file must exist and parse; with `None` the
    /// path is resolved as in [`Self::load`] and a missing file falls back
    /// to defaults. Env var overrides apply in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicitly given file cannot be read, or
    /// when the file contents are not valid TOML.
    pub fn load_with(path_override: Option<&Path>) -> Result<Self> {
        let mut config = match path_override {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                tracing::info!(path = %path.display(), "loading config from file");
                toml::from_str(&contents).context("failed to parse config TOML")?
            }
            None => Self::load_from_file()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path()?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: TuringConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(TuringConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config file path.
    ///
    /// Checks `$TURING_CONFIG_PATH` first, then `./turing.toml` in the
    /// working directory.
    pub fn config_path() -> Result<PathBuf> {
        Self::config_path_with(|key| std::env::var(key).ok())
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
        if let Some(p) = env("TURING_CONFIG_PATH") {
            return Ok(PathBuf::from(p));
        }
        Ok(PathBuf::from("turing.toml"))
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var` in tests).
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Runner.
        if let Some(v) = env("TURING_RESPONSE_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.runner.response_timeout_seconds = n,
                Err(_) => tracing::warn!(
                    var = "TURING_RESPONSE_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        // Target.
        if let Some(v) = env("TURING_MODE") {
            match v.to_lowercase().as_str() {
                "mock" => self.target.mode = TargetMode::Mock,
                "bridge" => self.target.mode = TargetMode::Bridge,
                _ => tracing::warn!(
                    var = "TURING_MODE",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("TURING_TARGET_URL") {
            self.target.url = v;
        }

        // Bridge.
        if let Some(v) = env("TURING_BRIDGE_URL") {
            self.bridge.base_url = v;
        }

        // Report.
        if let Some(v) = env("TURING_REPORT_DIR") {
            self.report.dir = v;
        }

        // Analyst (env var presence creates the config).
        if let Some(key) = env("TURING_ANTHROPIC_API_KEY") {
            let model = env("TURING_ANTHROPIC_MODEL").unwrap_or_else(|| {
                self.analyst
                    .as_ref()
                    .map(|c| c.model.clone())
                    .unwrap_or_else(default_analyst_model)
            });
            self.analyst = Some(AnalystConfig {
                api_key: key,
                model,
            });
        }
    }

    /// Parse a TOML string into config (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: TuringConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Runner config ───────────────────────────────────────────────

/// Suite runner settings (`[runner]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Tracing log level filter.
    pub log_level: String,
    /// Reply deadline passed to the driver, in seconds.
    pub response_timeout_seconds: u64,
    /// Characters of captured reply quoted in failure messages.
    pub excerpt_chars: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            response_timeout_seconds: 10,
            excerpt_chars: 300,
        }
    }
}

// ── Target config ───────────────────────────────────────────────

/// Which driver feeds the verification engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// In-process canned replies, no browser involved.
    Mock,
    /// Live chat widget driven through the browser sidecar.
    Bridge,
}

impl TargetMode {
    /// Short name used in logs and `doctor` output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Bridge => "bridge",
        }
    }
}

/// Target chatbot selection (`[target]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Driver mode. `mock` answers from the canned corpus; `bridge` drives
    /// the page at `url` through the sidecar.
    pub mode: TargetMode,
    /// Page hosting the chat widget; only read in bridge mode. Point it at
    /// a locally served copy of the widget to exercise the sidecar without
    /// touching production.
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            mode: TargetMode::Mock,
            url: "https://www.everlywell.com/support/eva".to_string(),
        }
    }
}

// ── Bridge config ───────────────────────────────────────────────

/// Browser sidecar settings (`[bridge]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Root URL of the sidecar's HTTP API.
    pub base_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9223".to_string(),
        }
    }
}

// ── Report config ───────────────────────────────────────────────

/// Run report settings (`[report]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving run reports and failure analyses.
    pub dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: "reports".to_string(),
        }
    }
}

// ── Analyst config ──────────────────────────────────────────────

/// Failure analyst settings (`[analyst]`).
#[derive(Clone, Deserialize)]
pub struct AnalystConfig {
    /// Anthropic API key.
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_analyst_model")]
    pub model: String,
}

impl std::fmt::Debug for AnalystConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalystConfig")
            .field("api_key", &"__REDACTED__")
            .field("model", &self.model)
            .finish()
    }
}

fn default_analyst_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

// ── Tests ───────────────────────────────────────────────────────
