//! Progression state machine: location gating, skips, waits, completion.
use rand::Rng;
use smallvec::SmallVec;

use crate::catalog::{Catalog, DocumentSpec, LocationId};
use crate::choices::{self, PlayerAction, Rejection};
use crate::constants::{
    LOG_ACTION_PROCESSED, LOG_DOCUMENT_OBTAINED, LOG_DOCUMENT_SKIPPED, LOG_EVENT_PREFIX,
    LOG_WAITING_RESOLVED, LOG_WAITING_STARTED, WAIT_IDLE_STRESS_PENALTY,
    WAIT_LANGUAGE_GAIN_PER_DAY, WAIT_LANGUAGE_STRESS_RELIEF, WAIT_REST_STRESS_RELIEF_PER_DAY,
    WAIT_WORK_PAY_PER_DAY, WAIT_WORK_STRESS_PENALTY,
};
use crate::events::EventDeck;
use crate::resources::{Delta, Terminal};
use crate::state::{RunState, WaitingActivity, WaitingState};

/// Ordered narrative log keys emitted by one engine transition.
pub type NarrativeLog = SmallVec<[String; 4]>;

/// Result of one resolved transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionOutcome {
    /// Display keys in the order the host should present them.
    pub narrative: NarrativeLog,
    /// Id of the random event that fired, if any.
    pub event: Option<String>,
    /// True when the action opened a waiting period instead of completing.
    pub entered_waiting: bool,
    /// Set once the run reached victory or failure during this transition.
    pub terminal: Option<Terminal>,
}

/// Result of approaching a location.
#[derive(Debug, Clone, PartialEq)]
pub enum EnterOutcome {
    /// The location is the active one; the host may present its actions.
    Entered,
    /// The active document did not apply to this character and was
    /// auto-completed without player interaction.
    Skipped(ActionOutcome),
}

fn active_document<'a>(state: &RunState, catalog: &'a Catalog) -> Result<&'a DocumentSpec, Rejection> {
    if state.is_over() {
        return Err(Rejection::RunEnded);
    }
    catalog
        .document_at(state.current_document)
        .ok_or(Rejection::RunEnded)
}

fn guard_not_waiting(state: &RunState) -> Result<(), Rejection> {
    if let Some(waiting) = &state.waiting {
        return Err(Rejection::WaitingPending {
            document_id: waiting.document_id.clone(),
        });
    }
    Ok(())
}

/// Approach a location.
///
/// Rejecting a wrong location is a pure no-op; the skip transition shares
/// the completion tail but deliberately never consults cost or language
/// requirements, since they do not apply to a skipped document.
///
/// # Errors
///
/// Returns a rejection when the run is over, a wait is pending, or the
/// location does not hold the active document.
pub fn enter_location(
    state: &mut RunState,
    catalog: &Catalog,
    location: LocationId,
) -> Result<EnterOutcome, Rejection> {
    guard_not_waiting(state)?;
    let doc = active_document(state, catalog)?;

    if doc.location != location {
        return Err(Rejection::WrongLocation {
            requested: location,
            expected: doc.location,
        });
    }

    if let Some(required) = doc.required_purpose
        && required != state.character.purpose
    {
        let doc_id = doc.id.clone();
        let mut outcome = ActionOutcome::default();
        outcome.narrative.push(LOG_DOCUMENT_SKIPPED.to_string());
        complete_document(state, &doc_id, &mut outcome);
        return Ok(EnterOutcome::Skipped(outcome));
    }

    Ok(EnterOutcome::Entered)
}

/// Resolve a submitted action against the active document.
///
/// Admission runs before any random draw, so a rejected action consumes
/// neither resources nor randomness. Once admitted the action runs to
/// completion in one step: delta, event sampling, then waiting entry or
/// document completion. A terminal result cuts the chain short.
///
/// # Errors
///
/// Returns a rejection for insufficient language or funds, an unknown
/// action id, a pending wait, or a finished run.
pub fn resolve_action<R: Rng>(
    state: &mut RunState,
    catalog: &Catalog,
    deck: &EventDeck,
    rng: &mut R,
    action: &PlayerAction,
) -> Result<ActionOutcome, Rejection> {
    guard_not_waiting(state)?;
    let doc = active_document(state, catalog)?;

    match action {
        PlayerAction::Process { mode, cost_option } => {
            let terms =
                choices::processing_terms(doc, state.character.purpose, *mode, cost_option.as_deref())?;
            choices::admit(&state.resources, &terms)?;

            let doc_id = doc.id.clone();
            let waiting_days = doc.waiting_days;
            let delta = choices::roll_costs(&terms, doc, rng);

            let mut outcome = ActionOutcome::default();
            outcome.narrative.push(LOG_ACTION_PROCESSED.to_string());
            state.apply_delta(&delta);
            if finish_if_terminal(state, &mut outcome) {
                return Ok(outcome);
            }

            sample_event(state, deck, rng, &doc_id, &mut outcome);
            if finish_if_terminal(state, &mut outcome) {
                return Ok(outcome);
            }

            if waiting_days > 0 {
                state.waiting = Some(WaitingState::begin(&doc_id, waiting_days));
                outcome.entered_waiting = true;
                outcome.narrative.push(LOG_WAITING_STARTED.to_string());
            } else {
                complete_document(state, &doc_id, &mut outcome);
            }
            Ok(outcome)
        }
        PlayerAction::Branch { choice } => {
            let (delta, _succeeded) =
                choices::resolve_branch(doc, choice, state.resources.language)?;
            let delta = delta.clone();
            let doc_id = doc.id.clone();

            let mut outcome = ActionOutcome::default();
            if let Some(log) = &delta.log {
                outcome.narrative.push(log.clone());
            }
            state.apply_delta(&delta);
            if finish_if_terminal(state, &mut outcome) {
                return Ok(outcome);
            }

            sample_event(state, deck, rng, &doc_id, &mut outcome);
            finish_if_terminal(state, &mut outcome);
            Ok(outcome)
        }
    }
}

/// Resolve the pending waiting period with a chosen activity.
///
/// The wait is spent regardless of activity; the activity only shapes what
/// comes back for it. Completion of the waited-on document follows.
///
/// # Errors
///
/// Returns `Rejection::NotWaiting` when no wait is pending, or
/// `Rejection::RunEnded` after a terminal state.
pub fn resolve_waiting(
    state: &mut RunState,
    activity: WaitingActivity,
) -> Result<ActionOutcome, Rejection> {
    if state.is_over() {
        return Err(Rejection::RunEnded);
    }
    let Some(mut waiting) = state.waiting.take() else {
        return Err(Rejection::NotWaiting);
    };
    waiting.activity = Some(activity);

    #[allow(clippy::cast_possible_wrap)]
    let days = waiting.days_remaining as i32;
    let mut delta = Delta {
        days: -days,
        ..Delta::default()
    };
    match activity {
        WaitingActivity::Language => {
            delta.language = days * WAIT_LANGUAGE_GAIN_PER_DAY;
            delta.stress = -WAIT_LANGUAGE_STRESS_RELIEF;
        }
        WaitingActivity::Work => {
            delta.money = i64::from(days) * WAIT_WORK_PAY_PER_DAY;
            delta.stress = WAIT_WORK_STRESS_PENALTY;
        }
        WaitingActivity::Rest => {
            delta.stress = -days * WAIT_REST_STRESS_RELIEF_PER_DAY;
        }
        WaitingActivity::Idle => {
            delta.stress = WAIT_IDLE_STRESS_PENALTY;
        }
    }

    let mut outcome = ActionOutcome::default();
    outcome.narrative.push(LOG_WAITING_RESOLVED.to_string());
    state.apply_delta(&delta);
    if finish_if_terminal(state, &mut outcome) {
        return Ok(outcome);
    }

    complete_document(state, &waiting.document_id, &mut outcome);
    Ok(outcome)
}

/// Shared completion tail for normal completion and the skip transition.
fn complete_document(state: &mut RunState, doc_id: &str, outcome: &mut ActionOutcome) {
    state.resources.documents.push(doc_id.to_string());
    state.current_document += 1;
    if state.terminal.is_none() {
        state.terminal = state
            .resources
            .check_terminal(state.required_documents);
    }
    outcome.narrative.push(LOG_DOCUMENT_OBTAINED.to_string());
    outcome.terminal = state.terminal;
}

fn sample_event<R: Rng>(
    state: &mut RunState,
    deck: &EventDeck,
    rng: &mut R,
    doc_id: &str,
    outcome: &mut ActionOutcome,
) {
    if let Some(event) = deck.sample(doc_id, rng) {
        let effects = event.effects.clone();
        outcome.event = Some(event.id.clone());
        outcome
            .narrative
            .push(format!("{LOG_EVENT_PREFIX}{}", event.id));
        state.apply_delta(&effects);
    }
}

/// Record the run's terminal state on the outcome, if one was reached.
fn finish_if_terminal(state: &RunState, outcome: &mut ActionOutcome) -> bool {
    outcome.terminal = state.terminal;
    state.is_over()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, Purpose, starting_resources};
    use crate::resources::FailureReason;
    use crate::state::DocumentStatus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(purpose: Purpose) -> (RunState, Catalog, EventDeck) {
        let character = Character::new(22, "Kazakhstan", purpose).unwrap();
        let resources = starting_resources(&character);
        let catalog = Catalog::builtin();
        let state = RunState::new(character, resources, catalog.len(), 7);
        (state, catalog, EventDeck::empty())
    }

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([42u8; 32])
    }

    #[test]
    fn wrong_location_rejects_without_state_change() {
        let (mut state, catalog, _) = setup(Purpose::Study);
        let before = state.clone();
        let result = enter_location(&mut state, &catalog, LocationId::Hospital);
        assert!(matches!(
            result,
            Err(Rejection::WrongLocation {
                requested: LocationId::Hospital,
                expected: LocationId::Airport,
            })
        ));
        assert_eq!(state, before);
    }

    fn process_standard() -> PlayerAction {
        PlayerAction::Process {
            mode: crate::choices::ProcessingMode::Standard,
            cost_option: None,
        }
    }

    #[test]
    fn purpose_mismatch_skips_without_cost() {
        let (mut state, catalog, deck) = setup(Purpose::Work);
        let mut rng = rng();
        // Clear the first two documents so the cursor reaches university-reg.
        for _ in 0..2 {
            let location = catalog.documents[state.current_document].location;
            enter_location(&mut state, &catalog, location).unwrap();
            let outcome =
                resolve_action(&mut state, &catalog, &deck, &mut rng, &process_standard())
                    .unwrap();
            if outcome.entered_waiting {
                resolve_waiting(&mut state, WaitingActivity::Rest).unwrap();
            }
        }
        assert_eq!(state.current_document, 2);
        let money_before = state.resources.money;
        let days_before = state.resources.days_left;

        let outcome = enter_location(&mut state, &catalog, LocationId::University).unwrap();
        let EnterOutcome::Skipped(outcome) = outcome else {
            panic!("expected skip transition");
        };
        assert_eq!(state.current_document, 3);
        assert!(state.resources.holds_document("university-reg"));
        assert_eq!(state.resources.money, money_before);
        assert_eq!(state.resources.days_left, days_before);
        assert!(outcome.narrative.contains(&LOG_DOCUMENT_SKIPPED.to_string()));
    }

    #[test]
    fn rejection_leaves_resources_untouched() {
        let (mut state, catalog, deck) = setup(Purpose::Tourism);
        state.resources.language = 0;
        let before = state.clone();
        let mut rng = rng();
        let result = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Process {
                mode: crate::choices::ProcessingMode::Standard,
                cost_option: None,
            },
        );
        assert!(matches!(
            result,
            Err(Rejection::InsufficientLanguage { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn processing_without_wait_completes_directly() {
        let (mut state, catalog, deck) = setup(Purpose::Study);
        let mut rng = rng();
        let outcome = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Process {
                mode: crate::choices::ProcessingMode::Standard,
                cost_option: None,
            },
        )
        .unwrap();
        assert!(!outcome.entered_waiting);
        assert!(state.resources.holds_document("migration-card"));
        assert_eq!(state.current_document, 1);
        assert_eq!(state.document_status(0), DocumentStatus::Completed);
    }

    #[test]
    fn waiting_period_blocks_further_actions() {
        let (mut state, catalog, deck) = setup(Purpose::Study);
        let mut rng = rng();
        state.current_document = 1; // registration, waiting_days = 1
        let outcome = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Process {
                mode: crate::choices::ProcessingMode::Standard,
                cost_option: Some("hotel".to_string()),
            },
        )
        .unwrap();
        assert!(outcome.entered_waiting);
        assert!(state.waiting.is_some());

        let blocked = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Process {
                mode: crate::choices::ProcessingMode::Standard,
                cost_option: None,
            },
        );
        assert!(matches!(blocked, Err(Rejection::WaitingPending { .. })));
    }

    #[test]
    fn waiting_activities_apply_the_effect_table() {
        let cases = [
            // (activity, language gained, money gained, stress change)
            (WaitingActivity::Language, 3, 0, -WAIT_LANGUAGE_STRESS_RELIEF),
            (WaitingActivity::Work, 0, 1_500, WAIT_WORK_STRESS_PENALTY),
            (WaitingActivity::Rest, 0, 0, -3 * WAIT_REST_STRESS_RELIEF_PER_DAY),
            (WaitingActivity::Idle, 0, 0, WAIT_IDLE_STRESS_PENALTY),
        ];
        for (activity, language_gain, money_gain, stress_change) in cases {
            let (mut state, _catalog, _deck) = setup(Purpose::Study);
            state.resources.stress = 50;
            let language_before = state.resources.language;
            let money_before = state.resources.money;
            let days_before = state.resources.days_left;
            state.waiting = Some(WaitingState::begin("medical", 3));

            resolve_waiting(&mut state, activity).unwrap();
            assert!(state.waiting.is_none());
            assert_eq!(state.resources.days_left, days_before - 3, "{activity}");
            assert_eq!(
                state.resources.language,
                language_before + language_gain,
                "{activity}"
            );
            assert_eq!(state.resources.money, money_before + money_gain, "{activity}");
            assert_eq!(state.resources.stress, 50 + stress_change, "{activity}");
            assert!(state.resources.holds_document("medical"));
        }
    }

    #[test]
    fn resolve_waiting_without_wait_is_rejected() {
        let (mut state, _catalog, _deck) = setup(Purpose::Study);
        assert_eq!(
            resolve_waiting(&mut state, WaitingActivity::Rest),
            Err(Rejection::NotWaiting)
        );
    }

    #[test]
    fn terminal_run_rejects_everything() {
        let (mut state, catalog, deck) = setup(Purpose::Study);
        state.apply_delta(&Delta {
            days: -500,
            ..Delta::default()
        });
        assert_eq!(state.terminal, Some(Terminal::Failure(FailureReason::Time)));

        let mut rng = rng();
        assert_eq!(
            enter_location(&mut state, &catalog, LocationId::Airport),
            Err(Rejection::RunEnded)
        );
        assert_eq!(
            resolve_action(
                &mut state,
                &catalog,
                &deck,
                &mut rng,
                &PlayerAction::Branch {
                    choice: "taxi-official".to_string()
                },
            ),
            Err(Rejection::RunEnded)
        );
    }

    #[test]
    fn branch_applies_delta_without_advancing_cursor() {
        let (mut state, catalog, deck) = setup(Purpose::Study);
        let mut rng = rng();
        let money_before = state.resources.money;
        let outcome = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Branch {
                choice: "taxi-official".to_string(),
            },
        )
        .unwrap();
        assert_eq!(state.resources.money, money_before - 2_000);
        assert_eq!(state.current_document, 0);
        assert!(outcome
            .narrative
            .contains(&"branch.taxi-official.success".to_string()));
    }

    #[test]
    fn event_fires_at_most_once_per_action() {
        let (mut state, catalog, _) = setup(Purpose::Study);
        let deck = {
            let mut deck = EventDeck::builtin();
            for event in &mut deck.events {
                event.probability = 1.0;
                event.trigger_document = None;
            }
            deck
        };
        let mut rng = rng();
        let outcome = resolve_action(
            &mut state,
            &catalog,
            &deck,
            &mut rng,
            &PlayerAction::Process {
                mode: crate::choices::ProcessingMode::Standard,
                cost_option: None,
            },
        )
        .unwrap();
        assert!(outcome.event.is_some());
        let event_keys = outcome
            .narrative
            .iter()
            .filter(|key| key.starts_with(LOG_EVENT_PREFIX))
            .count();
        assert_eq!(event_keys, 1);
    }

    #[test]
    fn completing_the_final_document_is_victory() {
        let (mut state, catalog, _deck) = setup(Purpose::Study);
        state.current_document = catalog.len() - 1;
        state.resources.documents = catalog.documents[..catalog.len() - 1]
            .iter()
            .map(|doc| doc.id.clone())
            .collect();
        state.waiting = Some(WaitingState::begin("fingerprint", 5));

        let outcome = resolve_waiting(&mut state, WaitingActivity::Rest).unwrap();
        assert_eq!(outcome.terminal, Some(Terminal::Victory));
        assert_eq!(state.terminal, Some(Terminal::Victory));
    }

    #[test]
    fn time_exhaustion_during_wait_beats_victory() {
        let (mut state, catalog, _deck) = setup(Purpose::Study);
        state.current_document = catalog.len() - 1;
        state.resources.documents = catalog.documents[..catalog.len() - 1]
            .iter()
            .map(|doc| doc.id.clone())
            .collect();
        state.resources.days_left = 2;
        state.waiting = Some(WaitingState::begin("fingerprint", 5));

        let outcome = resolve_waiting(&mut state, WaitingActivity::Rest).unwrap();
        assert_eq!(
            outcome.terminal,
            Some(Terminal::Failure(FailureReason::Time))
        );
        // The wait consumed the clock before completion could happen.
        assert!(!state.resources.holds_document("fingerprint"));
    }
}
