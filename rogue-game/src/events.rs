//! Weighted random event selection and choice resolution.

use crate::data::{Event, EventChoice};
use crate::goals::evaluate_goals;
use crate::rng::RollSource;
use crate::state::GameState;

/// Pick an event from the catalog, or `None` when nothing is eligible.
///
/// Eligibility is the day/week gate on each event; weights are walked in
/// catalog order against a single roll scaled to the total weight. The
/// comparison is strict: a roll landing exactly on a boundary selects the
/// next event, not the one ending there.
pub fn pick_event<'a, R: RollSource>(
    state: &GameState,
    events: &'a [Event],
    rng: &mut R,
) -> Option<&'a Event> {
    let eligible: Vec<&Event> = events.iter().filter(|event| event.eligible(state)).collect();
    if eligible.is_empty() {
        return None;
    }

    let total_weight: u32 = eligible.iter().map(|event| event.weight).sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.roll() * f64::from(total_weight);
    let mut cumulative = 0.0;
    for event in &eligible {
        cumulative += f64::from(event.weight);
        if roll < cumulative {
            log::debug!("event roll {roll:.4}/{total_weight} -> {}", event.id);
            return Some(event);
        }
    }

    // Rolls stay below the total weight, but keep the walk total regardless
    // of float accumulation.
    eligible.last().copied()
}

/// Apply one choice of a resolved event, then re-run goal evaluation.
///
/// The caller is responsible for validating the choice id; this function
/// assumes `choice` belongs to the event being resolved.
#[must_use]
pub fn apply_choice(state: &GameState, choice: &EventChoice) -> GameState {
    let mut next = state.clone();
    choice.effects.apply_to(&mut next);
    next.error = None;
    evaluate_goals(state, next).0
}
