//! Resource ledger: the four run-scoped meters plus the acquired-document set.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{LANGUAGE_MAX, STRESS_MAX};

/// Sparse additive change to the resource ledger.
///
/// Absent fields deserialize to zero so catalog data only spells out the
/// resources an effect actually touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Delta {
    #[serde(default)]
    pub days: i32,
    #[serde(default)]
    pub money: i64,
    #[serde(default)]
    pub language: i32,
    #[serde(default)]
    pub stress: i32,
    #[serde(default)]
    pub log: Option<String>,
}

impl Delta {
    /// True when every numeric field is zero.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.days == 0 && self.money == 0 && self.language == 0 && self.stress == 0
    }
}

/// Why a run ended in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    /// Countdown reached zero before all documents were collected.
    Time,
    /// Money went negative.
    Money,
    /// Stress meter hit its ceiling.
    Stress,
}

impl FailureReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Money => "money",
            Self::Stress => "stress",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a run. No transitions leave a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    Failure(FailureReason),
    Victory,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(reason) => write!(f, "failure.{reason}"),
            Self::Victory => f.write_str("victory"),
        }
    }
}

/// Mutable per-run resource record.
///
/// `language` and `stress` are clamped to `[0, 100]` immediately after every
/// mutation; `days_left` and `money` are unclamped and may go negative, which
/// is exactly what the terminal checks look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub days_left: i32,
    pub money: i64,
    pub language: i32,
    pub stress: i32,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl Resources {
    #[must_use]
    pub const fn new(days_left: i32, money: i64, language: i32, stress: i32) -> Self {
        Self {
            days_left,
            money,
            language,
            stress,
            documents: Vec::new(),
        }
    }

    /// Apply every field of the delta, then clamp the bounded meters.
    ///
    /// The clamp happens before any terminal check so observers never see an
    /// out-of-range language or stress value. Crate-private: hosts mutate
    /// through `RunState::apply_delta`, which pairs every application with
    /// the terminal-condition check.
    pub(crate) fn apply_delta(&mut self, delta: &Delta) {
        self.days_left += delta.days;
        self.money += delta.money;
        self.language = (self.language + delta.language).clamp(0, LANGUAGE_MAX);
        self.stress = (self.stress + delta.stress).clamp(0, STRESS_MAX);
    }

    /// Evaluate terminal conditions in fixed priority order.
    ///
    /// Time, money, and stress failures are checked before victory so that a
    /// run which exhausts its countdown on the final document still fails.
    #[must_use]
    pub fn check_terminal(&self, required_documents: usize) -> Option<Terminal> {
        if self.days_left <= 0 {
            return Some(Terminal::Failure(FailureReason::Time));
        }
        if self.money < 0 {
            return Some(Terminal::Failure(FailureReason::Money));
        }
        if self.stress >= STRESS_MAX {
            return Some(Terminal::Failure(FailureReason::Stress));
        }
        if self.documents.len() >= required_documents {
            return Some(Terminal::Victory);
        }
        None
    }

    /// Membership test on the acquired-document set.
    #[must_use]
    pub fn holds_document(&self, id: &str) -> bool {
        self.documents.iter().any(|held| held == id)
    }
}
