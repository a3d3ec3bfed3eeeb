//! Daily action table and resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::ERR_NO_ENERGY;
use crate::goals::evaluate_goals;
use crate::state::{EffectMods, GameState};

/// The three daily actions a player can spend energy on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Train,
    Work,
    Rest,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "TRAIN",
            Self::Work => "WORK",
            Self::Rest => "REST",
        }
    }

    pub const ALL: [Self; 3] = [Self::Train, Self::Work, Self::Rest];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRAIN" => Ok(Self::Train),
            "WORK" => Ok(Self::Work),
            "REST" => Ok(Self::Rest),
            _ => Err(()),
        }
    }
}

/// Fixed per-action base cost and stat deltas.
#[derive(Debug, Clone, Copy)]
struct ActionProfile {
    cost: i32,
    energy_gain: i32,
    morale: i32,
    skill: i32,
    money: i32,
}

const fn profile(action: Action) -> ActionProfile {
    match action {
        Action::Train => ActionProfile {
            cost: 3,
            energy_gain: 0,
            morale: 0,
            skill: 2,
            money: 0,
        },
        Action::Work => ActionProfile {
            cost: 2,
            energy_gain: 0,
            morale: 0,
            skill: 0,
            money: 5,
        },
        Action::Rest => ActionProfile {
            cost: 0,
            energy_gain: 2,
            morale: 1,
            skill: 0,
            money: 0,
        },
    }
}

/// Energy cost of an action after passive modifiers, never below zero.
#[must_use]
pub const fn effective_cost(action: Action, effects: &EffectMods) -> i32 {
    let base = profile(action).cost;
    let adjusted = base + effects.energy_cost_delta;
    if adjusted < 0 { 0 } else { adjusted }
}

/// Resolve a daily action against the current state.
///
/// Unaffordable actions fail atomically: the returned state carries an
/// advisory error and no stat changed. Terminal runs are frozen and returned
/// untouched. Successful transitions clear any previous advisory error and
/// are re-evaluated against the goal list before being returned.
#[must_use]
pub fn apply_action(state: &GameState, action: Action) -> GameState {
    if state.is_terminal() {
        return state.clone();
    }

    let p = profile(action);
    let cost = effective_cost(action, &state.meta.effects);
    if state.energy < cost {
        return state.with_error(ERR_NO_ENERGY);
    }

    let mut next = state.clone();
    next.energy = (next.energy - cost + p.energy_gain).clamp(0, next.max_energy);
    let rest_bonus = if matches!(action, Action::Rest) {
        next.meta.effects.rest_morale_bonus
    } else {
        0
    };
    next.morale = (next.morale + p.morale + rest_bonus).max(0);
    next.skill = (next.skill + p.skill).max(0);
    next.money = (next.money + p.money).max(0);
    if matches!(action, Action::Train) {
        next.meta.counters.trains_this_week += 1;
    }
    next.error = None;

    evaluate_goals(state, next).0
}
