//! Tracing and observability setup.
//!
//! Provides [`TracingConfig`], a builder that installs a global `tracing`
//! subscriber. Flowline libraries only emit events; installing a subscriber
//! is left to the embedding binary.
//!
//! # Example
//!
//! ```no_run
//! use flowline_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! // Development: pretty colored output with debug level
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Pretty)
//!     .with_span_events(true)
//!     .init()
//!     .expect("subscriber already installed");
//! ```
//!
//! # Environment Filter
//!
//! Use `with_env_filter` to set target-specific log levels:
//!
//! ```
//! use flowline_core::TracingConfig;
//!
//! TracingConfig::default()
//!     .with_env_filter("flowline_network=debug,flowline_component=trace")
//! # ;
//! ```

use core::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl FromStr for TracingFormat {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TracingError::UnknownFormat(other.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The env-filter directive string could not be parsed.
    #[error("invalid tracing filter '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive string.
        directive: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// The requested output format is not one of `pretty`, `compact`, `json`.
    #[error("unknown tracing format: {0}")]
    UnknownFormat(String),

    /// A global subscriber was already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] TryInitError),
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing subscriber configuration.
///
/// Uses the [`tracing`] and [`tracing_subscriber`] crates under the hood.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Maximum log level, used when no env filter is given.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "flowline_network=debug").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a new `TracingConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured output format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Builds the env filter from the directive string, or from the level.
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::InvalidFilter`] if the directive does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.env_filter {
            Some(directive) => {
                EnvFilter::try_new(directive).map_err(|source| TracingError::InvalidFilter {
                    directive: directive.clone(),
                    source,
                })
            }
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Fails if the env filter is invalid or a subscriber is already installed.
    pub fn init(&self) -> Result<(), TracingError> {
        let env_filter = self.env_filter()?;

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()?,
        }

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            "tracing initialized"
        );
        Ok(())
    }

    /// Installs the global subscriber, ignoring an already-installed one.
    ///
    /// An invalid env filter falls back to the configured level.
    pub fn try_init(&self) {
        let config = if self.env_filter().is_err() {
            Self {
                env_filter: None,
                ..self.clone()
            }
        } else {
            self.clone()
        };
        config.init().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_format_default_is_pretty() {
        let format = TracingFormat::default();
        assert_eq!(format, TracingFormat::Pretty);
    }

    #[test]
    fn tracing_config_default_level_is_info() {
        let config = TracingConfig::default();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn tracing_config_with_level() {
        let config = TracingConfig::new().with_level(Level::DEBUG);
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[test]
    fn tracing_config_with_format() {
        let config = TracingConfig::new().with_format(TracingFormat::Json);
        assert_eq!(config.format(), TracingFormat::Json);
    }

    #[test]
    fn tracing_config_with_env_filter() {
        let config = TracingConfig::new().with_env_filter("flowline_network=debug");
        assert_eq!(config.env_filter, Some("flowline_network=debug".to_string()));
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn tracing_config_rejects_invalid_filter() {
        let config = TracingConfig::new().with_env_filter("flowline=notalevel");
        let err = config.env_filter().unwrap_err();
        assert!(matches!(err, TracingError::InvalidFilter { .. }));
        assert!(err.to_string().contains("flowline=notalevel"));
    }

    #[test]
    fn tracing_config_with_span_events() {
        let config = TracingConfig::new().with_span_events(true);
        assert!(config.span_events);
    }

    #[test]
    fn tracing_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<TracingFormat>().unwrap(), TracingFormat::Json);
        assert_eq!(
            " compact ".parse::<TracingFormat>().unwrap(),
            TracingFormat::Compact
        );
        assert!(matches!(
            "xml".parse::<TracingFormat>(),
            Err(TracingError::UnknownFormat(name)) if name == "xml"
        ));
    }
}
