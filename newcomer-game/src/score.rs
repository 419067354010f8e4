//! End-of-run scoring: weighted subtotals, rank tier, and insights.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{
    INSIGHT_DOCUMENTS_GOOD, INSIGHT_DOCUMENTS_WEAK, INSIGHT_LANGUAGE_GOOD, INSIGHT_MONEY_GOOD,
    INSIGHT_STRESS_GOOD, INSIGHT_TIME_GOOD, INSIGHT_TIME_WEAK, SCORE_DOCUMENTS_WEIGHT,
    SCORE_LANGUAGE_BASELINE, SCORE_LANGUAGE_WEIGHT, SCORE_MONEY_BASELINE, SCORE_MONEY_WEIGHT,
    SCORE_STRESS_DIVISOR, SCORE_STRESS_WEIGHT, SCORE_TIME_BASELINE_DAYS, SCORE_TIME_WEIGHT,
    TIER_A_MIN, TIER_B_MIN, TIER_C_MIN, TIER_S_MIN,
};
use crate::resources::Resources;

/// Rank label from fixed percentage breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    #[must_use]
    pub const fn from_total(total: i32) -> Self {
        if total >= TIER_S_MIN {
            Self::S
        } else if total >= TIER_A_MIN {
            Self::A
        } else if total >= TIER_B_MIN {
            Self::B
        } else if total >= TIER_C_MIN {
            Self::C
        } else {
            Self::D
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative insight keys, at most one per scored dimension.
pub type Insights = SmallVec<[&'static str; 5]>;

/// Weighted breakdown of a finished run.
///
/// Subtotals use the document-heavy 40/20/15/15/10 split of the full
/// six-document run. Each subtotal is floored at zero so a deeply negative
/// clock or wallet cannot drag the total below the advertised range.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub documents: f64,
    pub time: f64,
    pub money: f64,
    pub language: f64,
    pub stress: f64,
    /// Rounded sum of the subtotals, always in `[0, 100]`.
    pub total: i32,
    pub tier: Tier,
    pub insights: Insights,
}

impl ScoreBreakdown {
    /// Score a final resource snapshot against the required document count.
    #[must_use]
    pub fn compute(resources: &Resources, required_documents: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let held = resources.documents.len().min(required_documents) as f64;
        #[allow(clippy::cast_precision_loss)]
        let required = required_documents.max(1) as f64;
        let documents = (held / required) * SCORE_DOCUMENTS_WEIGHT;

        let time = ratio_points(
            f64::from(resources.days_left),
            SCORE_TIME_BASELINE_DAYS,
            SCORE_TIME_WEIGHT,
        );
        #[allow(clippy::cast_precision_loss)]
        let money = ratio_points(resources.money as f64, SCORE_MONEY_BASELINE, SCORE_MONEY_WEIGHT);
        let language = ratio_points(
            f64::from(resources.language),
            SCORE_LANGUAGE_BASELINE,
            SCORE_LANGUAGE_WEIGHT,
        );
        let stress =
            (SCORE_STRESS_WEIGHT - f64::from(resources.stress) / SCORE_STRESS_DIVISOR).max(0.0);

        #[allow(clippy::cast_possible_truncation)]
        let total = ((documents + time + money + language + stress).round() as i32).clamp(0, 100);

        Self {
            documents,
            time,
            money,
            language,
            stress,
            total,
            tier: Tier::from_total(total),
            insights: insights(documents, time, money, language, stress),
        }
    }
}

/// Points for a resource measured as a fraction of its baseline, capped at
/// the dimension weight and floored at zero.
fn ratio_points(value: f64, baseline: f64, weight: f64) -> f64 {
    ((value / baseline) * weight).clamp(0.0, weight)
}

fn insights(documents: f64, time: f64, money: f64, language: f64, stress: f64) -> Insights {
    let mut out = Insights::new();
    if documents >= INSIGHT_DOCUMENTS_GOOD {
        out.push("result.insight.documents.good");
    } else if documents < INSIGHT_DOCUMENTS_WEAK {
        out.push("result.insight.documents.weak");
    }
    if time >= INSIGHT_TIME_GOOD {
        out.push("result.insight.time.good");
    } else if time < INSIGHT_TIME_WEAK {
        out.push("result.insight.time.weak");
    }
    if money >= INSIGHT_MONEY_GOOD {
        out.push("result.insight.money.good");
    } else {
        out.push("result.insight.money.weak");
    }
    if language >= INSIGHT_LANGUAGE_GOOD {
        out.push("result.insight.language.good");
    } else {
        out.push("result.insight.language.weak");
    }
    if stress >= INSIGHT_STRESS_GOOD {
        out.push("result.insight.stress.good");
    } else {
        out.push("result.insight.stress.weak");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;

    fn snapshot(days: i32, money: i64, language: i32, stress: i32, held: usize) -> Resources {
        let mut resources = Resources::new(days, money, language, stress);
        resources.documents = (0..held).map(|idx| format!("doc-{idx}")).collect();
        resources
    }

    #[test]
    fn perfect_run_scores_one_hundred() {
        let resources = snapshot(90, 50_000, 100, 0, 6);
        let score = ScoreBreakdown::compute(&resources, 6);
        assert_eq!(score.total, 100);
        assert_eq!(score.tier, Tier::S);
        assert!((score.documents - 40.0).abs() < FLOAT_EPSILON);
        assert!((score.time - 20.0).abs() < FLOAT_EPSILON);
        assert!((score.money - 15.0).abs() < FLOAT_EPSILON);
        assert!((score.language - 15.0).abs() < FLOAT_EPSILON);
        assert!((score.stress - 10.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn subtotals_are_capped_at_their_weights() {
        // Surplus beyond the baseline earns nothing extra.
        let resources = snapshot(200, 400_000, 100, 0, 6);
        let score = ScoreBreakdown::compute(&resources, 6);
        assert!((score.time - 20.0).abs() < FLOAT_EPSILON);
        assert!((score.money - 15.0).abs() < FLOAT_EPSILON);
        assert_eq!(score.total, 100);
    }

    #[test]
    fn negative_resources_floor_at_zero() {
        let resources = snapshot(-3, -10_000, 0, 100, 0);
        let score = ScoreBreakdown::compute(&resources, 6);
        assert!(score.time.abs() < FLOAT_EPSILON);
        assert!(score.money.abs() < FLOAT_EPSILON);
        assert!(score.stress.abs() < FLOAT_EPSILON);
        assert_eq!(score.total, 0);
        assert_eq!(score.tier, Tier::D);
    }

    #[test]
    fn half_documents_earn_half_the_weight() {
        let resources = snapshot(0, 0, 0, 100, 3);
        let score = ScoreBreakdown::compute(&resources, 6);
        assert!((score.documents - 20.0).abs() < FLOAT_EPSILON);
        assert_eq!(score.total, 20);
    }

    #[test]
    fn tier_breakpoints_match_the_table() {
        let cases = [
            (100, Tier::S),
            (90, Tier::S),
            (89, Tier::A),
            (75, Tier::A),
            (74, Tier::B),
            (60, Tier::B),
            (59, Tier::C),
            (45, Tier::C),
            (44, Tier::D),
            (0, Tier::D),
        ];
        for (total, expected) in cases {
            assert_eq!(Tier::from_total(total), expected, "total {total}");
        }
    }

    #[test]
    fn insights_are_mutually_exclusive_per_dimension() {
        let resources = snapshot(90, 50_000, 100, 0, 6);
        let score = ScoreBreakdown::compute(&resources, 6);
        for dimension in ["documents", "time", "money", "language", "stress"] {
            let mentions = score
                .insights
                .iter()
                .filter(|key| key.contains(dimension))
                .count();
            assert!(mentions <= 1, "{dimension} mentioned {mentions} times");
        }
        assert!(score.insights.contains(&"result.insight.documents.good"));
        assert!(score.insights.contains(&"result.insight.stress.good"));
    }

    #[test]
    fn middling_documents_and_time_yield_no_insight() {
        // Between the weak and good cutoffs neither side speaks up.
        let resources = snapshot(45, 0, 0, 100, 4);
        let score = ScoreBreakdown::compute(&resources, 6);
        assert!(!score
            .insights
            .iter()
            .any(|key| key.starts_with("result.insight.documents")));
        assert!(!score
            .insights
            .iter()
            .any(|key| key.starts_with("result.insight.time")));
        assert!(score.insights.contains(&"result.insight.money.weak"));
    }
}
