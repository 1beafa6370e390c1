//! Severity policy: what happens when validation fails.
//!
//! A [`Policy`] pairs a mode source with a diagnostic sink. Models built with
//! [`Policy::global`] read the process-wide default on every check, so
//! [`set_severity_mode`] affects only validations that run after the call.
//! Models built with [`Policy::fixed`] ignore the global default entirely.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// SeverityMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityMode {
    /// Skip all checks and install no guards.
    Off,
    /// Abort the operation on the first failure.
    #[default]
    Throw,
    /// Emit the failure to the diagnostic sink and carry on.
    Warn,
}

impl SeverityMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Throw => "throw",
            Self::Warn => "warn",
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Off => 1,
            Self::Throw => 2,
            Self::Warn => 3,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Off,
            3 => Self::Warn,
            _ => Self::Throw,
        }
    }
}

impl fmt::Display for SeverityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static GLOBAL_MODE: AtomicU8 = AtomicU8::new(SeverityMode::Throw.to_u8());

/// Set the process-wide default mode.
pub fn set_severity_mode(mode: SeverityMode) {
    GLOBAL_MODE.store(mode.to_u8(), Ordering::SeqCst);
    tracing::debug!(target: "modus", %mode, "severity mode changed");
}

/// Current process-wide default mode.
#[must_use]
pub fn severity_mode() -> SeverityMode {
    SeverityMode::from_u8(GLOBAL_MODE.load(Ordering::SeqCst))
}

// ---------------------------------------------------------------------------
// Diagnostic sinks
// ---------------------------------------------------------------------------

/// Receives failures reported in `warn` mode.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, failure: &ValidationError);
}

/// Emits each failure as a `tracing` WARN event on target `modus`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, failure: &ValidationError) {
        tracing::warn!(
            target: "modus",
            path = %failure.path(),
            code = failure.code(),
            "{failure}"
        );
    }
}

/// Keeps every reported message in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, failure: &ValidationError) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure.to_string());
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeSource {
    Global,
    Fixed(SeverityMode),
}

/// Mode source plus diagnostic sink, shared by a model and every guard it
/// produces.
#[derive(Clone)]
pub struct Policy {
    mode: ModeSource,
    sink: Arc<dyn DiagnosticSink>,
}

impl Policy {
    /// Follow the process-wide default mode; warn through `tracing`.
    #[must_use]
    pub fn global() -> Self {
        Self {
            mode: ModeSource::Global,
            sink: Arc::new(TracingSink),
        }
    }

    /// Pin `mode` regardless of the process-wide default; warn through
    /// `tracing`.
    #[must_use]
    pub fn fixed(mode: SeverityMode) -> Self {
        Self {
            mode: ModeSource::Fixed(mode),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Mode in effect right now.
    #[must_use]
    pub fn mode(&self) -> SeverityMode {
        match self.mode {
            ModeSource::Global => severity_mode(),
            ModeSource::Fixed(mode) => mode,
        }
    }

    #[must_use]
    pub fn is_off(&self) -> bool {
        self.mode() == SeverityMode::Off
    }

    /// Route a failure according to the current mode.
    ///
    /// # Errors
    ///
    /// Returns the failure back when the mode is `throw`.
    pub fn report(&self, failure: ValidationError) -> Result<(), ValidationError> {
        match self.mode() {
            SeverityMode::Throw => Err(failure),
            SeverityMode::Warn => {
                self.sink.warn(&failure);
                Ok(())
            }
            SeverityMode::Off => Ok(()),
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy").field("mode", &self.mode).finish_non_exhaustive()
    }
}
