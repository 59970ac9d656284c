//! Narrative run logging.
//!
//! Lines go to a caller-supplied function when one is configured, otherwise
//! they become `tracing` events.

use std::sync::Arc;

use tracing::{info, warn};

/// Caller-supplied sink for narrative log lines.
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Routes narrative log lines according to the run configuration.
#[derive(Clone)]
pub struct RunLogger {
    verbose: bool,
    custom: Option<LogFn>,
}

impl RunLogger {
    pub fn new(verbose: bool, custom: Option<LogFn>) -> Self {
        Self { verbose, custom }
    }

    /// Emits a narrative line. Dropped entirely when not verbose.
    pub fn log(&self, text: &str) {
        if !self.verbose {
            return;
        }

        match &self.custom {
            Some(log_fn) => log_fn(text),
            None => info!("{text}"),
        }
    }

    /// Emits a warning, regardless of verbosity.
    pub fn warn(&self, text: &str) {
        match &self.custom {
            Some(log_fn) => log_fn(text),
            None => warn!("{text}"),
        }
    }

    /// Whether output is redirected to a custom function.
    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }
}

impl std::fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLogger")
            .field("verbose", &self.verbose)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
