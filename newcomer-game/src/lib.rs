//! Newcomer Game Engine
//!
//! Platform-agnostic core game logic for the Newcomer settlement bureaucracy
//! simulation. This crate provides all game mechanics without UI or
//! platform-specific dependencies.

pub mod catalog;
pub mod character;
pub mod choices;
pub mod constants;
pub mod events;
pub mod progress;
pub mod resources;
pub mod score;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use catalog::{
    BranchChoice, Catalog, CatalogError, CostOption, DocumentSpec, LocationId, PurposeCosts,
};
pub use character::{Character, CharacterError, Purpose, starting_resources};
pub use choices::{
    PlayerAction, ProcessingMode, ProcessingTerms, Rejection, admit, processing_terms,
    resolve_branch, roll_costs,
};
pub use events::{EventDeck, RandomEvent};
pub use progress::{ActionOutcome, EnterOutcome, NarrativeLog};
pub use resources::{Delta, FailureReason, Resources, Terminal};
pub use score::{Insights, ScoreBreakdown, Tier};
pub use session::GameSession;
pub use state::{DocumentStatus, RunSnapshot, RunState, WaitingActivity, WaitingState};

/// Trait for abstracting catalog loading operations
/// Platform-specific implementations should provide this
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the required-document catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog data cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load the random-event deck from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the event data cannot be loaded.
    fn load_events(&self) -> Result<EventDeck, Self::Error>;
}

/// Compiled-in catalog and deck, for hosts that ship without data assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    type Error = std::convert::Infallible;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::builtin())
    }

    fn load_events(&self) -> Result<EventDeck, Self::Error> {
        Ok(EventDeck::builtin())
    }
}

/// Main game engine for managing run instances
pub struct GameEngine<S>
where
    S: CatalogSource,
{
    source: S,
}

impl<S> GameEngine<S>
where
    S: CatalogSource,
{
    /// Create a new game engine with the provided catalog source
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Start a new run for a character with the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or events cannot be loaded, or if
    /// the loaded catalog violates a structural invariant.
    pub fn create_run(&self, character: Character, seed: u64) -> anyhow::Result<GameSession>
    where
        S::Error: Into<anyhow::Error>,
    {
        let catalog = self.source.load_catalog().map_err(Into::into)?;
        let events = self.source.load_events().map_err(Into::into)?;
        Ok(GameSession::new(character, catalog, events, seed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureSource {
        empty: bool,
    }

    impl CatalogSource for FixtureSource {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            if self.empty {
                Ok(Catalog::default())
            } else {
                Ok(Catalog::builtin())
            }
        }

        fn load_events(&self) -> Result<EventDeck, Self::Error> {
            Ok(EventDeck::empty())
        }
    }

    #[test]
    fn engine_creates_a_fresh_run() {
        let engine = GameEngine::new(FixtureSource::default());
        let character = Character::new(30, "Brazil", Purpose::Work).unwrap();
        let session = engine.create_run(character, 0xABCD).unwrap();
        assert_eq!(session.state.current_document, 0);
        assert_eq!(session.state.required_documents, 6);
        assert_eq!(session.state.seed, 0xABCD);
        assert!(session.state.terminal.is_none());
    }

    #[test]
    fn engine_rejects_an_invalid_catalog() {
        let engine = GameEngine::new(FixtureSource { empty: true });
        let character = Character::new(30, "Brazil", Purpose::Work).unwrap();
        assert!(engine.create_run(character, 1).is_err());
    }

    #[test]
    fn builtin_source_is_infallible_and_valid() {
        let catalog = BuiltinCatalog.load_catalog().unwrap();
        catalog.validate().unwrap();
        assert_eq!(BuiltinCatalog.load_events().unwrap().events.len(), 5);
    }
}
