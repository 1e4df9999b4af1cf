use std::fmt;

use log::{error, log, Level};
use serde::Serialize;

/// Why a single pattern produced no find specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A placeholder names an attribute missing from the environment
    UnknownAttribute { name: String },
    /// A placeholder marker is still present after substitution
    UnresolvedPlaceholder,
    /// The pattern does not start with the separator
    NotAbsolute,
    /// The pattern ends with a bare separator
    EmptyTrailingSegment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownAttribute { name } => write!(f, "unknown attribute '{}'", name),
            SkipReason::UnresolvedPlaceholder => write!(f, "unresolved placeholder"),
            SkipReason::NotAbsolute => write!(f, "path filter must be an absolute path"),
            SkipReason::EmptyTrailingSegment => write!(f, "empty last path segment"),
        }
    }
}

/// A local, non-fatal outcome recorded during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    PatternSkipped {
        artifact: String,
        pattern: String,
        reason: SkipReason,
    },
    UnsupportedSource {
        artifact: String,
        type_indicator: String,
    },
    /// A registry value source was reduced to its key.
    ValueDegraded {
        artifact: String,
        key: String,
        value_name: String,
    },
    HiveDropped {
        artifact: String,
        key: String,
        hive: String,
    },
}

impl Diagnostic {
    pub fn artifact(&self) -> &str {
        match self {
            Diagnostic::PatternSkipped { artifact, .. }
            | Diagnostic::UnsupportedSource { artifact, .. }
            | Diagnostic::ValueDegraded { artifact, .. }
            | Diagnostic::HiveDropped { artifact, .. } => artifact,
        }
    }

    /// True when the diagnostic means input was left out of the collection.
    pub fn is_skip(&self) -> bool {
        !matches!(self, Diagnostic::ValueDegraded { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PatternSkipped {
                artifact,
                pattern,
                reason,
            } => write!(f, "[{}] skipped {}: {}", artifact, pattern, reason),
            Diagnostic::UnsupportedSource {
                artifact,
                type_indicator,
            } => write!(f, "[{}] unsupported artifact type: {}", artifact, type_indicator),
            Diagnostic::ValueDegraded {
                artifact,
                key,
                value_name,
            } => write!(
                f,
                "[{}] value filtering not supported, collecting key {} instead of value {}",
                artifact, key, value_name
            ),
            Diagnostic::HiveDropped { artifact, key, hive } => {
                write!(f, "[{}] unsupported registry hive {} in key {}", artifact, hive, key)
            }
        }
    }
}

/// Ordered record of the diagnostics of one compilation pass.
///
/// Every recorded diagnostic is also logged, except dropped hives which
/// are only logged when `log_dropped_hives` is set.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    log_dropped_hives: bool,
}

impl Diagnostics {
    pub fn new(log_dropped_hives: bool) -> Self {
        Self {
            entries: Vec::new(),
            log_dropped_hives,
        }
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        match self.log_level(&diagnostic) {
            Some(Level::Error) => error!("Unable to expand path filter: {}", diagnostic),
            Some(level) => log!(level, "{}", diagnostic),
            None => {}
        }
        self.entries.push(diagnostic);
    }

    /// Level a diagnostic is logged at, or `None` when it is only recorded.
    pub fn log_level(&self, diagnostic: &Diagnostic) -> Option<Level> {
        match diagnostic {
            Diagnostic::PatternSkipped {
                reason: SkipReason::UnknownAttribute { .. },
                ..
            } => Some(Level::Error),
            Diagnostic::HiveDropped { .. } if !self.log_dropped_hives => None,
            _ => Some(Level::Warn),
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
