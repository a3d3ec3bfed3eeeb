//! Run goal catalog and one-shot reward evaluation.

use smallvec::SmallVec;

use crate::state::GameState;

/// Newly-completed goal ids from a single evaluation pass.
pub type NewlyCompleted = SmallVec<[&'static str; 2]>;

/// A run goal: a predicate over state plus an optional one-time reward.
pub struct Goal {
    pub id: &'static str,
    pub description: &'static str,
    check: fn(&GameState) -> bool,
    reward: Option<fn(&mut GameState)>,
}

/// The fixed, ordered goal list. Order matters: rewards applied by earlier
/// goals are visible to later predicates within the same evaluation.
pub static GOALS: [Goal; 5] = [
    Goal {
        id: "nest-egg",
        description: "Accumulate $20",
        check: |state| state.money >= 20,
        reward: Some(|state| state.morale += 1),
    },
    Goal {
        id: "consistent-training",
        description: "Train 3 times in a week",
        check: |state| state.meta.counters.trains_this_week >= 3,
        reward: Some(|state| state.skill += 1),
    },
    Goal {
        id: "well-rested",
        description: "End 3 days in a row at full energy",
        check: |state| state.meta.counters.days_full_energy >= 3,
        reward: Some(|state| state.energy += 1),
    },
    Goal {
        id: "high-morale",
        description: "Reach 8 morale",
        check: |state| state.morale >= 8,
        reward: Some(|state| state.money += 2),
    },
    Goal {
        id: "skilled-agent",
        description: "Reach 10 skill",
        check: |state| state.skill >= 10,
        reward: None,
    },
];

/// Evaluate the goal list over a transition from `previous` to `candidate`.
///
/// Goals already recorded in `previous` are skipped; newly-true goals are
/// appended in list order with their reward applied immediately, so a reward
/// can complete a later goal within the same call. The completed set is
/// monotonic: entries are only ever appended.
#[must_use]
pub fn evaluate_goals(previous: &GameState, candidate: GameState) -> (GameState, NewlyCompleted) {
    let mut next = candidate;
    let mut newly = NewlyCompleted::new();

    for goal in &GOALS {
        if previous.goal_completed(goal.id) || next.goal_completed(goal.id) {
            continue;
        }
        if !(goal.check)(&next) {
            continue;
        }
        next.meta.goals_completed.push(goal.id.to_string());
        if let Some(reward) = goal.reward {
            reward(&mut next);
            next.clamp_stats();
        }
        newly.push(goal.id);
    }

    (next, newly)
}
