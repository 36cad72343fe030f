// error.rs - Error taxonomy for a simulation run

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

/// Every variant is terminal for the whole run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifeError {
    #[error("invalid configuration:\n{0}")]
    Config(ConfigErrors),

    #[error("rank {rank}: failed to allocate {structure} ({rows} x {columns} cells)")]
    Allocation {
        structure: &'static str,
        rank: usize,
        rows: usize,
        columns: usize,
    },

    #[error("rank {rank}: communication failure in {operation}")]
    Communication { rank: usize, operation: &'static str },

    #[error("rank {rank}: worker did not complete: {reason}")]
    Worker { rank: usize, reason: String },

    #[error("a worker task was lost: {0}")]
    Lost(String),
}

/// One minimum-value violation found while validating a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    pub what: &'static str,
    pub actual: usize,
    pub minimum: usize,
}

fn plural(value: usize) -> &'static str {
    if value == 1 { "" } else { "s" }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}; need at least {} {}{}",
            self.actual,
            self.what,
            plural(self.actual),
            self.minimum,
            self.what,
            plural(self.minimum),
        )
    }
}

/// All violations found in one validation pass, plus free-form ones that
/// are not simple minimums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigErrors {
    pub violations: Vec<ConfigViolation>,
    pub other: Vec<String>,
}

impl ConfigErrors {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty() && self.other.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len() + self.other.len()
    }

    pub(crate) fn require_at_least(&mut self, what: &'static str, actual: usize, minimum: usize) {
        if actual < minimum {
            self.violations.push(ConfigViolation { what, actual, minimum });
        }
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .violations
            .iter()
            .map(ToString::to_string)
            .chain(self.other.iter().cloned());
        for (i, line) in lines.enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "ERROR: {line}")?;
        }
        Ok(())
    }
}
