//! Random event deck sampled after successful action resolutions.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::resources::Delta;

/// One entry in the random-event pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub id: String,
    /// Independent firing probability in `(0, 1]`.
    pub probability: f32,
    pub effects: Delta,
    /// Restricts eligibility to one document; `None` means always eligible.
    #[serde(default)]
    pub trigger_document: Option<String>,
}

/// Container for the full event pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventDeck {
    pub events: Vec<RandomEvent>,
}

impl EventDeck {
    /// Create an empty deck (useful for tests).
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Load an event deck from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid event data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sample at most one event for the just-resolved document.
    ///
    /// Events whose `trigger_document` does not match are filtered out, the
    /// survivors each roll independently against their own probability, and
    /// one winner is drawn uniformly from the passers. Uniform tie-break is
    /// deliberate here; the terminal-condition check is the place with fixed
    /// priority, not this one.
    pub fn sample<R: Rng>(&self, document_id: &str, rng: &mut R) -> Option<&RandomEvent> {
        let passers: Vec<&RandomEvent> = self
            .events
            .iter()
            .filter(|event| {
                event
                    .trigger_document
                    .as_deref()
                    .is_none_or(|trigger| trigger == document_id)
            })
            .filter(|event| rng.r#gen::<f32>() < event.probability)
            .collect();

        if passers.is_empty() {
            return None;
        }
        let winner = rng.gen_range(0..passers.len());
        passers.get(winner).copied()
    }

    /// Compiled-in deck: the five settlement mishaps and windfalls.
    #[must_use]
    pub fn builtin() -> Self {
        fn event(
            id: &str,
            probability: f32,
            money: i64,
            days: i32,
            language: i32,
            stress: i32,
            trigger_document: Option<&str>,
        ) -> RandomEvent {
            RandomEvent {
                id: id.to_string(),
                probability,
                effects: Delta {
                    days,
                    money,
                    language,
                    stress,
                    log: None,
                },
                trigger_document: trigger_document.map(str::to_string),
            }
        }

        Self {
            events: vec![
                event("missing-stamp", 0.15, -1_000, -2, 0, 10, Some("medical")),
                event("translation-error", 0.12, -1_500, -1, 0, 8, None),
                event("helpful-stranger", 0.10, 0, 0, 5, -10, None),
                event("long-queue", 0.18, 0, -1, 0, 5, None),
                event("language-help", 0.08, 0, 0, 8, -5, None),
            ],
        }
    }
}
