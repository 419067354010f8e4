//! Action resolution: admission checks, cost math, jitter, and branches.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::{DocumentSpec, LocationId};
use crate::character::Purpose;
use crate::constants::{
    ACTION_STRESS_BASE, ACTION_STRESS_SPREAD, EXPRESS_COST_SURCHARGE, EXPRESS_LANGUAGE_DISCOUNT,
    EXPRESS_MIN_HOURS, EXPRESS_TIME_REDUCTION_HOURS, HOURS_PER_DAY, TIME_JITTER_MAX,
    TIME_JITTER_MIN,
};
use crate::resources::{Delta, Resources};

/// Processing speed selected by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    #[default]
    Standard,
    Express,
}

impl ProcessingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(()),
        }
    }
}

/// Action submitted against the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum PlayerAction {
    /// Pay and queue for the document itself.
    Process {
        mode: ProcessingMode,
        #[serde(default)]
        cost_option: Option<String>,
    },
    /// Take one of the document's threshold-branched side choices.
    Branch { choice: String },
}

/// Recoverable rejection of a player input. Resources are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("location {requested} is not available yet (expected {expected})")]
    WrongLocation {
        requested: LocationId,
        expected: LocationId,
    },
    #[error("language skill {current}% below required {required}%")]
    InsufficientLanguage { required: i32, current: i32 },
    #[error("need {required} but only {available} available")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("a waiting period for {document_id} must be resolved first")]
    WaitingPending { document_id: String },
    #[error("no waiting period is active")]
    NotWaiting,
    #[error("the run has already ended")]
    RunEnded,
    #[error("unknown action {id} for document {document_id}")]
    UnknownAction { document_id: String, id: String },
}

/// Deterministic terms of a processing action, before jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingTerms {
    pub cost: i64,
    pub hours: f32,
    pub language_required: i32,
}

/// Compute cost, time, and language requirement for a processing mode.
///
/// Express trades money for a shorter queue and a softer language bar.
/// A cost option replaces the purpose-resolved base cost (and base time when
/// it carries one) before the express surcharge applies.
///
/// # Errors
///
/// Returns `Rejection::UnknownAction` for a cost option the document does
/// not offer.
pub fn processing_terms(
    doc: &DocumentSpec,
    purpose: Purpose,
    mode: ProcessingMode,
    cost_option: Option<&str>,
) -> Result<ProcessingTerms, Rejection> {
    let mut cost = doc.cost_for(purpose);
    let mut hours = doc.base_time_hours;

    if let Some(option_id) = cost_option {
        let Some(option) = doc.cost_option(option_id) else {
            return Err(Rejection::UnknownAction {
                document_id: doc.id.clone(),
                id: option_id.to_string(),
            });
        };
        cost = option.cost;
        if let Some(time) = option.time_hours {
            hours = time;
        }
    }

    let language_required = match mode {
        ProcessingMode::Standard => doc.language_required,
        ProcessingMode::Express => {
            cost += EXPRESS_COST_SURCHARGE;
            hours = (hours - EXPRESS_TIME_REDUCTION_HOURS).max(EXPRESS_MIN_HOURS);
            (doc.language_required - EXPRESS_LANGUAGE_DISCOUNT).max(0)
        }
    };

    Ok(ProcessingTerms {
        cost,
        hours,
        language_required,
    })
}

/// Verify the player can afford the action, both linguistically and
/// financially. Rejection must leave resources byte-for-byte unchanged, so
/// this runs before any random draw or mutation.
///
/// # Errors
///
/// Returns the first unmet requirement, language checked before funds.
pub fn admit(resources: &Resources, terms: &ProcessingTerms) -> Result<(), Rejection> {
    if resources.language < terms.language_required {
        return Err(Rejection::InsufficientLanguage {
            required: terms.language_required,
            current: resources.language,
        });
    }
    if resources.money < terms.cost {
        return Err(Rejection::InsufficientFunds {
            required: terms.cost,
            available: resources.money,
        });
    }
    Ok(())
}

/// Roll the admitted action into a concrete resource delta.
///
/// Actual time is the base jittered by a uniform factor in `[0.8, 1.2]`,
/// clamped into the document's absolute hour range when one is declared,
/// then converted to whole days spent. Stress lands in `[5, 10]`.
pub fn roll_costs<R: Rng>(terms: &ProcessingTerms, doc: &DocumentSpec, rng: &mut R) -> Delta {
    let factor = rng.gen_range(TIME_JITTER_MIN..=TIME_JITTER_MAX);
    let mut hours = (terms.hours * factor).round();
    if let Some((min, max)) = doc.time_range_hours {
        hours = hours.clamp(min, max);
    }
    let days = (hours / HOURS_PER_DAY).ceil();
    let stress = (ACTION_STRESS_BASE + rng.gen_range(0.0..ACTION_STRESS_SPREAD)).round();

    #[allow(clippy::cast_possible_truncation)]
    Delta {
        days: -(days as i32),
        money: -terms.cost,
        stress: stress as i32,
        ..Delta::default()
    }
}

/// Resolve a threshold-branched choice against the player's language skill.
///
/// The cutoff selects between the success and failure arms; there is no
/// admission gate here, a weak speaker simply gets the worse outcome.
///
/// # Errors
///
/// Returns `Rejection::UnknownAction` for a branch id the document does not
/// declare.
pub fn resolve_branch<'a>(
    doc: &'a DocumentSpec,
    choice_id: &str,
    language: i32,
) -> Result<(&'a Delta, bool), Rejection> {
    let Some(branch) = doc.branch(choice_id) else {
        return Err(Rejection::UnknownAction {
            document_id: doc.id.clone(),
            id: choice_id.to_string(),
        });
    };
    let succeeded = language >= branch.language_threshold;
    let delta = if succeeded {
        &branch.success
    } else {
        &branch.failure
    };
    Ok((delta, succeeded))
}
