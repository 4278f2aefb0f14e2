// ABOUTME: Configuration loading for voicedesk.
// ABOUTME: Reads ~/.voicedesk/config.toml, the .env secrets, and the agent credentials.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Environment variable holding the conversational agent id.
pub const AGENT_ID_VAR: &str = "AGENT_ID";
/// Environment variable holding the voice platform API key.
pub const API_KEY_VAR: &str = "ELEVENLABS_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub ui: UiConfig,
    pub search: SearchConfig,
    pub voice: VoiceConfig,
}

/// Message log location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("conversation_log.json"),
        }
    }
}

/// Renderer cadence and panel sizes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub poll_interval_ms: u64,
    pub activity_tail: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            activity_tail: 5,
        }
    }
}

impl UiConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            timeout_seconds: 15,
        }
    }
}

/// Voice session endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub base_url: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: "wss://api.elevenlabs.io".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.voicedesk/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Directory holding config, secrets, and the diagnostic log.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voicedesk")
    }

    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Secrets file loaded after the working directory's `.env`.
    pub fn secrets_env_path() -> PathBuf {
        Self::home_dir().join("secrets.env")
    }

    /// Diagnostic log written while the TUI owns the terminal.
    pub fn diagnostics_path() -> PathBuf {
        Self::home_dir().join("voicedesk.log")
    }
}

/// Agent credentials. Either field may be absent until validated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("agent_id", &self.agent_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(agent_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            api_key: Some(api_key.into()),
        }
    }

    /// Read `AGENT_ID` and `ELEVENLABS_API_KEY`; empty values count as absent.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            agent_id: read(AGENT_ID_VAR),
            api_key: read(API_KEY_VAR),
        }
    }

    pub fn has_agent_id(&self) -> bool {
        self.agent_id.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Both values, or a configuration error naming what is missing.
    pub fn require(&self) -> Result<(&str, &str), Error> {
        match (self.has_agent_id(), self.has_api_key()) {
            (true, true) => Ok((
                self.agent_id.as_deref().unwrap_or_default(),
                self.api_key.as_deref().unwrap_or_default(),
            )),
            (false, false) => Err(Error::configuration(format!(
                "missing {} and {} in environment variables",
                AGENT_ID_VAR, API_KEY_VAR
            ))),
            (false, true) => Err(Error::configuration(format!(
                "missing {} in environment variables",
                AGENT_ID_VAR
            ))),
            (true, false) => Err(Error::configuration(format!(
                "missing {} in environment variables",
                API_KEY_VAR
            ))),
        }
    }
}

/// Load `.env` from the working directory, then the voicedesk secrets file.
///
/// Runs before tracing is initialized so `RUST_LOG` from either file takes
/// effect; problems are returned for the caller to log once tracing is up.
pub fn load_env_files() -> Vec<String> {
    load_env_files_from(Path::new(".env"), &Config::secrets_env_path())
}

pub fn load_env_files_from(dotenv: &Path, secrets: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    for path in [dotenv, secrets] {
        match dotenvy::from_path(path) {
            Ok(()) => {}
            Err(e) if e.not_found() => {}
            Err(e) => problems.push(format!("failed to load {}: {}", path.display(), e)),
        }
    }
    problems
}
