//! Centralized balance and tuning constants for Newcomer game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_DOCUMENT_OBTAINED: &str = "log.document.obtained";
pub(crate) const LOG_DOCUMENT_SKIPPED: &str = "log.document.skipped";
pub(crate) const LOG_WAITING_STARTED: &str = "log.waiting.started";
pub(crate) const LOG_WAITING_RESOLVED: &str = "log.waiting.resolved";
pub(crate) const LOG_ACTION_PROCESSED: &str = "log.action.processed";
pub(crate) const LOG_EVENT_PREFIX: &str = "event.";

// Stat bounds --------------------------------------------------------------
pub(crate) const LANGUAGE_MAX: i32 = 100;
pub(crate) const STRESS_MAX: i32 = 100;

// Starting resources -------------------------------------------------------
pub(crate) const START_MONEY_STUDY: i64 = 50_000;
pub(crate) const START_MONEY_WORK: i64 = 100_000;
pub(crate) const START_MONEY_TOURISM: i64 = 70_000;
pub(crate) const START_DAYS_DEFAULT: i32 = 90;
pub(crate) const START_DAYS_TOURISM: i32 = 60;
pub(crate) const START_LANGUAGE_STUDY: i32 = 30;
pub(crate) const START_LANGUAGE_WORK: i32 = 15;
pub(crate) const START_LANGUAGE_TOURISM: i32 = 10;
pub(crate) const START_STRESS_DEFAULT: i32 = 10;
pub(crate) const START_STRESS_WORK: i32 = 15;

pub(crate) const AGE_YOUNG_CUTOFF: u8 = 25;
pub(crate) const AGE_SENIOR_CUTOFF: u8 = 50;
pub(crate) const AGE_MIN: u8 = 18;
pub(crate) const AGE_MAX: u8 = 99;
pub(crate) const YOUNG_LANGUAGE_BONUS: i32 = 10;
pub(crate) const YOUNG_STRESS_RELIEF: i32 = 5;
pub(crate) const SENIOR_STRESS_PENALTY: i32 = 10;
pub(crate) const SENIOR_MONEY_BONUS: i64 = 20_000;

pub(crate) const CIS_LANGUAGE_BONUS: i32 = 20;
pub(crate) const CIS_STRESS_RELIEF: i32 = 10;
pub(crate) const CIS_NATIONALITIES: &[&str] = &["Kazakhstan", "Belarus", "Armenia"];

// Processing tuning --------------------------------------------------------
pub(crate) const EXPRESS_COST_SURCHARGE: i64 = 3_000;
pub(crate) const EXPRESS_TIME_REDUCTION_HOURS: f32 = 1.0;
pub(crate) const EXPRESS_MIN_HOURS: f32 = 1.0;
pub(crate) const EXPRESS_LANGUAGE_DISCOUNT: i32 = 10;
pub(crate) const TIME_JITTER_MIN: f32 = 0.8;
pub(crate) const TIME_JITTER_MAX: f32 = 1.2;
pub(crate) const HOURS_PER_DAY: f32 = 24.0;
pub(crate) const ACTION_STRESS_BASE: f32 = 5.0;
pub(crate) const ACTION_STRESS_SPREAD: f32 = 5.0;

// Waiting activity tuning --------------------------------------------------
pub(crate) const WAIT_LANGUAGE_GAIN_PER_DAY: i32 = 1;
pub(crate) const WAIT_LANGUAGE_STRESS_RELIEF: i32 = 2;
pub(crate) const WAIT_WORK_PAY_PER_DAY: i64 = 500;
pub(crate) const WAIT_WORK_STRESS_PENALTY: i32 = 3;
pub(crate) const WAIT_REST_STRESS_RELIEF_PER_DAY: i32 = 5;
pub(crate) const WAIT_IDLE_STRESS_PENALTY: i32 = 3;

// Scoring ------------------------------------------------------------------
pub(crate) const SCORE_DOCUMENTS_WEIGHT: f64 = 40.0;
pub(crate) const SCORE_TIME_WEIGHT: f64 = 20.0;
pub(crate) const SCORE_MONEY_WEIGHT: f64 = 15.0;
pub(crate) const SCORE_LANGUAGE_WEIGHT: f64 = 15.0;
pub(crate) const SCORE_STRESS_WEIGHT: f64 = 10.0;
pub(crate) const SCORE_TIME_BASELINE_DAYS: f64 = 90.0;
pub(crate) const SCORE_MONEY_BASELINE: f64 = 50_000.0;
pub(crate) const SCORE_LANGUAGE_BASELINE: f64 = 100.0;
pub(crate) const SCORE_STRESS_DIVISOR: f64 = 10.0;

pub(crate) const TIER_S_MIN: i32 = 90;
pub(crate) const TIER_A_MIN: i32 = 75;
pub(crate) const TIER_B_MIN: i32 = 60;
pub(crate) const TIER_C_MIN: i32 = 45;

pub(crate) const INSIGHT_DOCUMENTS_GOOD: f64 = 35.0;
pub(crate) const INSIGHT_DOCUMENTS_WEAK: f64 = 20.0;
pub(crate) const INSIGHT_TIME_GOOD: f64 = 15.0;
pub(crate) const INSIGHT_TIME_WEAK: f64 = 5.0;
pub(crate) const INSIGHT_MONEY_GOOD: f64 = 10.0;
pub(crate) const INSIGHT_LANGUAGE_GOOD: f64 = 10.0;
pub(crate) const INSIGHT_STRESS_GOOD: f64 = 7.0;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-6;
