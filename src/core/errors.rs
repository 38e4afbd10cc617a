//! Error types for the todo-md library.
//!
//! Every fallible operation in the scanner returns [`TodoMdError`]. Most of
//! these never escape a single file: the pipeline converts read and parse
//! failures into "no items from this file" and keeps going. Only the outer
//! surface (configuration, report writing) lets an error end the run.

use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Main result type for todo-md operations.
pub type Result<T> = std::result::Result<T, TodoMdError>;

/// Error type for all todo-md operations.
#[derive(Error, Debug)]
pub enum TodoMdError {
    /// I/O related errors (reading sources, writing reports)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Parsing errors raised by the scope resolvers
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Language the source was parsed as
        language: String,
        /// Error description
        message: String,
        /// File path where error occurred
        file_path: Option<String>,
        /// Line number (if available)
        line: Option<usize>,
        /// Column number (if available)
        column: Option<usize>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },
}

impl TodoMdError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
            line: None,
            column: None,
        }
    }

    /// Attach a file path to a parse error that does not carry one yet.
    pub fn in_file(mut self, path: impl Into<String>) -> Self {
        if let Self::Parse { file_path, .. } = &mut self {
            if file_path.is_none() {
                *file_path = Some(path.into());
            }
        }
        self
    }

    /// Prefix the message with context; parse errors keep their own message.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Serialization { message, .. }
            | Self::Validation { message, .. } => {
                *message = format!("{}: {}", context.into(), message);
            }
            Self::Parse { .. } => {}
        }
        self
    }
}

impl From<io::Error> for TodoMdError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for TodoMdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for TodoMdError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<Utf8Error> for TodoMdError {
    fn from(err: Utf8Error) -> Self {
        Self::parse("unknown", format!("UTF-8 encoding error: {err}"))
    }
}

impl From<regex::Error> for TodoMdError {
    fn from(err: regex::Error) -> Self {
        Self::config(format!("Invalid pattern: {err}"))
    }
}

impl From<globset::Error> for TodoMdError {
    fn from(err: globset::Error) -> Self {
        Self::config_field(format!("Invalid glob pattern: {err}"), "exclude_patterns")
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TodoMdError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}
