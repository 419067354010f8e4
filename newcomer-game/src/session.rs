//! Session facade: owns one run's state, catalog, deck, and random source.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::catalog::{Catalog, CatalogError, LocationId};
use crate::character::{Character, starting_resources};
use crate::choices::{PlayerAction, Rejection};
use crate::events::EventDeck;
use crate::progress::{self, ActionOutcome, EnterOutcome};
use crate::score::ScoreBreakdown;
use crate::state::{RunSnapshot, RunState, WaitingActivity};

/// One playthrough from character creation to a terminal state.
///
/// The session owns the only random source of the run; replaying the same
/// seed against the same inputs reproduces the run exactly.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub state: RunState,
    pub catalog: Catalog,
    pub events: EventDeck,
    rng: ChaCha20Rng,
}

impl GameSession {
    /// Start a run for a validated character.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog violates a structural invariant;
    /// an empty or malformed catalog would otherwise hand out a victory on
    /// the first applied delta.
    pub fn new(
        character: Character,
        catalog: Catalog,
        events: EventDeck,
        seed: u64,
    ) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let resources = starting_resources(&character);
        let state = RunState::new(character, resources, catalog.len(), seed);
        Ok(Self {
            state,
            catalog,
            events,
            rng: ChaCha20Rng::seed_from_u64(seed),
        })
    }

    /// Approach a location, possibly auto-skipping an inapplicable document.
    ///
    /// # Errors
    ///
    /// Returns a rejection when the location is not the active one, a wait
    /// is pending, or the run is over.
    pub fn enter_location(&mut self, location: LocationId) -> Result<EnterOutcome, Rejection> {
        progress::enter_location(&mut self.state, &self.catalog, location)
    }

    /// Resolve a player action against the active document.
    ///
    /// # Errors
    ///
    /// Returns a rejection for unmet requirements, unknown action ids, a
    /// pending wait, or a finished run. Resources are untouched on rejection.
    pub fn submit_action(&mut self, action: &PlayerAction) -> Result<ActionOutcome, Rejection> {
        progress::resolve_action(
            &mut self.state,
            &self.catalog,
            &self.events,
            &mut self.rng,
            action,
        )
    }

    /// Spend the pending waiting period on a chosen activity.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::NotWaiting` when no wait is pending.
    pub fn submit_waiting_activity(
        &mut self,
        activity: WaitingActivity,
    ) -> Result<ActionOutcome, Rejection> {
        progress::resolve_waiting(&mut self.state, activity)
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub const fn snapshot(&self) -> RunSnapshot<'_> {
        self.state.snapshot()
    }

    /// Score the run. `None` until a terminal state is reached.
    #[must_use]
    pub fn score(&self) -> Option<ScoreBreakdown> {
        self.state.terminal?;
        Some(ScoreBreakdown::compute(
            &self.state.resources,
            self.state.required_documents,
        ))
    }
}
