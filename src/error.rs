// ABOUTME: Domain error taxonomy — configuration, session transport, log I/O, and tool failures.
// ABOUTME: Built with thiserror; the application edge wraps these in anyhow.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by voicedesk's components.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or empty credentials. Fatal to session initialization.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The voice session failed to start, stop, or deliver a message.
    #[error("session transport error: {0}")]
    SessionTransport(String),

    /// The message log file could not be read or written.
    #[error("log I/O error on {path}: {source}")]
    LogIo {
        path: PathBuf,
        #[source]
        source: LogIoSource,
    },

    /// A tool failed. Passed through instrumentation unchanged.
    #[error("tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },
}

/// Underlying cause of a [`Error::LogIo`].
#[derive(Debug, Error)]
pub enum LogIoSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::SessionTransport(message.into())
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn log_io(path: impl Into<PathBuf>, source: impl Into<LogIoSource>) -> Self {
        Self::LogIo {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
