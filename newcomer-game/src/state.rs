//! Run-scoped state: one value per playthrough, no shared mutability.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::character::Character;
use crate::resources::{Delta, Resources, Terminal};

/// How a host may render a catalog slot relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Already obtained or skipped.
    Completed,
    /// The document the cursor points at.
    Active,
    /// Not reachable until the cursor advances to it.
    Locked,
}

/// Productive use of a waiting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaitingActivity {
    Language,
    Work,
    Rest,
    #[default]
    #[serde(rename = "none")]
    Idle,
}

impl WaitingActivity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Work => "work",
            Self::Rest => "rest",
            Self::Idle => "none",
        }
    }
}

impl fmt::Display for WaitingActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitingActivity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "language" => Ok(Self::Language),
            "work" => Ok(Self::Work),
            "rest" => Ok(Self::Rest),
            "none" => Ok(Self::Idle),
            _ => Err(()),
        }
    }
}

/// Transient wait between submitting a document request and receiving it.
///
/// Exists only while the active document's waiting period is unresolved;
/// resolving the wait destroys it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingState {
    pub document_id: String,
    pub total_days: u32,
    pub days_remaining: u32,
    #[serde(default)]
    pub activity: Option<WaitingActivity>,
}

impl WaitingState {
    #[must_use]
    pub fn begin(document_id: &str, days: u32) -> Self {
        Self {
            document_id: document_id.to_string(),
            total_days: days,
            days_remaining: days,
            activity: None,
        }
    }
}

/// Read-only view of a run for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSnapshot<'a> {
    pub resources: &'a Resources,
    pub current_document: usize,
    pub waiting: Option<&'a WaitingState>,
    pub terminal: Option<Terminal>,
}

/// Complete state of one run.
///
/// An explicit value passed into and returned from engine operations;
/// concurrent runs are independent by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub character: Character,
    pub resources: Resources,
    /// Cursor into the catalog's required-document sequence.
    pub current_document: usize,
    /// Victory requires this many held documents.
    pub required_documents: usize,
    #[serde(default)]
    pub waiting: Option<WaitingState>,
    #[serde(default)]
    pub terminal: Option<Terminal>,
    pub seed: u64,
}

impl RunState {
    #[must_use]
    pub fn new(
        character: Character,
        resources: Resources,
        required_documents: usize,
        seed: u64,
    ) -> Self {
        Self {
            character,
            resources,
            current_document: 0,
            required_documents,
            waiting: None,
            terminal: None,
            seed,
        }
    }

    /// Apply a delta through the ledger and immediately re-evaluate terminal
    /// conditions. The check is part of the ledger path, not a separate
    /// caller responsibility.
    pub fn apply_delta(&mut self, delta: &Delta) {
        self.resources.apply_delta(delta);
        if self.terminal.is_none() {
            self.terminal = self.resources.check_terminal(self.required_documents);
        }
    }

    /// True once the run has reached victory or failure.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.terminal.is_some()
    }

    /// Render status of a catalog slot relative to the cursor.
    #[must_use]
    pub const fn document_status(&self, index: usize) -> DocumentStatus {
        if index < self.current_document {
            DocumentStatus::Completed
        } else if index == self.current_document {
            DocumentStatus::Active
        } else {
            DocumentStatus::Locked
        }
    }

    /// Read-only snapshot for the presentation layer.
    #[must_use]
    pub const fn snapshot(&self) -> RunSnapshot<'_> {
        RunSnapshot {
            resources: &self.resources,
            current_document: self.current_document,
            waiting: self.waiting.as_ref(),
            terminal: self.terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, Purpose, starting_resources};
    use crate::resources::{FailureReason, Terminal};

    fn run_state() -> RunState {
        let character = Character::new(22, "Kazakhstan", Purpose::Study).unwrap();
        let resources = starting_resources(&character);
        RunState::new(character, resources, 6, 42)
    }

    #[test]
    fn apply_delta_triggers_terminal_check() {
        let mut state = run_state();
        state.apply_delta(&Delta {
            days: -200,
            ..Delta::default()
        });
        assert_eq!(state.terminal, Some(Terminal::Failure(FailureReason::Time)));
        assert!(state.is_over());
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut state = run_state();
        state.apply_delta(&Delta {
            days: -200,
            ..Delta::default()
        });
        let first = state.terminal;
        // A later delta that would trigger a different failure must not
        // rewrite the recorded outcome.
        state.apply_delta(&Delta {
            money: -1_000_000,
            ..Delta::default()
        });
        assert_eq!(state.terminal, first);
    }

    #[test]
    fn document_status_tracks_the_cursor() {
        let mut state = run_state();
        state.current_document = 2;
        assert_eq!(state.document_status(0), DocumentStatus::Completed);
        assert_eq!(state.document_status(1), DocumentStatus::Completed);
        assert_eq!(state.document_status(2), DocumentStatus::Active);
        assert_eq!(state.document_status(3), DocumentStatus::Locked);
    }

    #[test]
    fn snapshot_reflects_waiting_state() {
        let mut state = run_state();
        assert!(state.snapshot().waiting.is_none());
        state.waiting = Some(WaitingState::begin("medical", 3));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.waiting.unwrap().days_remaining, 3);
        assert_eq!(snapshot.current_document, 0);
    }

    #[test]
    fn waiting_activity_string_round_trips() {
        for activity in [
            WaitingActivity::Language,
            WaitingActivity::Work,
            WaitingActivity::Rest,
            WaitingActivity::Idle,
        ] {
            assert_eq!(activity.as_str().parse::<WaitingActivity>(), Ok(activity));
        }
        assert!("nap".parse::<WaitingActivity>().is_err());
    }

    #[test]
    fn runs_are_independent_values() {
        let mut a = run_state();
        let b = run_state();
        a.apply_delta(&Delta {
            money: -10_000,
            ..Delta::default()
        });
        assert_ne!(a.resources.money, b.resources.money);
    }
}
