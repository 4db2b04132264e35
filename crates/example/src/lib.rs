//! Example runner that loads a Flowline graph file and logs its traffic.
//!
//! The runner wires the graph with the core components and attaches logging
//! hooks before any initial value is delivered, so the whole run shows up in
//! the log.
//!
//! # Configuration
//!
//! Read from the environment (and a `.env` file, if present):
//!
//! - `FLOWLINE_LOG` - env-filter directive, e.g. `info,flowline_network=debug`
//! - `FLOWLINE_LOG_FORMAT` - `pretty` (default), `compact`, or `json`

use std::path::Path;
use std::sync::Arc;

use flowline_component::{ChannelEvent, ComponentRegistry, EventCategory};
use flowline_core::{TracingConfig, TracingError, TracingFormat};
use flowline_graph::{Graph, GraphError};
use flowline_network::{HookError, HookRegistry, Network, NetworkError};

/// Environment variable holding the env-filter directive.
pub const LOG_ENV: &str = "FLOWLINE_LOG";

/// Environment variable holding the log format.
pub const LOG_FORMAT_ENV: &str = "FLOWLINE_LOG_FORMAT";

/// Errors the runner can report.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Logging could not be configured.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// The graph file could not be loaded.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The graph could not be wired.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A logging hook could not be registered.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Runner settings.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Env-filter directive; the default level applies when absent.
    pub log_filter: Option<String>,
    /// Log output format.
    pub log_format: TracingFormat,
}

impl RunConfig {
    /// Reads settings from [`LOG_ENV`] and [`LOG_FORMAT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::UnknownFormat`] for an unrecognized format.
    pub fn from_env() -> Result<Self, RunError> {
        Self::from_vars(
            std::env::var(LOG_ENV).ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    /// Builds settings from raw variable values.
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::UnknownFormat`] for an unrecognized format.
    pub fn from_vars(filter: Option<String>, format: Option<String>) -> Result<Self, RunError> {
        let log_format = match format {
            Some(format) => format.parse()?,
            None => TracingFormat::default(),
        };
        Ok(Self {
            log_filter: filter.filter(|directive| !directive.trim().is_empty()),
            log_format,
        })
    }

    /// Returns the tracing configuration for these settings.
    #[must_use]
    pub fn tracing(&self) -> TracingConfig {
        let config = TracingConfig::new().with_format(self.log_format);
        match &self.log_filter {
            Some(directive) => config.with_env_filter(directive.clone()),
            None => config,
        }
    }
}

/// Returns hooks that log connect, data, and disconnect events.
///
/// # Errors
///
/// Never fails in practice; registration errors are propagated for
/// completeness.
pub fn logging_hooks() -> Result<HookRegistry, HookError> {
    let hooks = HookRegistry::new();
    hooks
        .hook_on(EventCategory::Connect, "log", |event: &ChannelEvent<'_>| {
            tracing::info!(channel = %event.channel().identity(), "connect");
        })?
        .hook_on(EventCategory::Data, "log", |event: &ChannelEvent<'_>| {
            if let Some(data) = event.data() {
                tracing::info!(channel = %event.channel().identity(), %data, "data");
            }
        })?
        .hook_on(EventCategory::Disconnect, "log", |event: &ChannelEvent<'_>| {
            tracing::info!(channel = %event.channel().identity(), "disconnect");
        })?;
    Ok(hooks)
}

/// Loads a graph file and wires it into a network with logging hooks.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the graph cannot be
/// wired.
pub fn run(path: impl AsRef<Path>) -> Result<Arc<Network>, RunError> {
    let graph = Graph::load_file(path)?;
    let network = Network::builder(Arc::new(graph))
        .components(ComponentRegistry::with_core_components())
        .hooks(logging_hooks()?)
        .build()?;
    Ok(network)
}
