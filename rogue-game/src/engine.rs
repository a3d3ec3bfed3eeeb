//! Day/turn orchestration and the serialized command surface.

use crate::actions::{Action, apply_action};
use crate::constants::{
    DAYS_PER_WEEK, ERR_EVENT_PENDING, ERR_NO_EVENT, ERR_UNKNOWN_CHOICE, EVENT_CHANCE, START_DAY,
};
use crate::data::{Event, GameData};
use crate::events::{apply_choice, pick_event};
use crate::goals::evaluate_goals;
use crate::rng::{GameRng, RollSource};
use crate::state::GameState;
use crate::upgrades::apply_upgrade;

/// Advance the calendar by one day.
///
/// Streak counters are judged on the **pre-advance** stats; passives apply to
/// the new day. Wrapping past day 7 rolls the week and resets the weekly
/// training counter. Terminal runs are frozen.
#[must_use]
pub fn advance_day(state: &GameState) -> GameState {
    if state.is_terminal() {
        return state.clone();
    }

    let mut next = state.clone();

    let counters = &mut next.meta.counters;
    counters.days_full_energy = if state.energy >= state.max_energy {
        counters.days_full_energy + 1
    } else {
        0
    };
    counters.zero_money_streak = if state.money <= 0 {
        counters.zero_money_streak + 1
    } else {
        0
    };
    counters.low_morale_streak = if state.morale <= 0 {
        counters.low_morale_streak + 1
    } else {
        0
    };

    next.day += 1;
    if next.day > DAYS_PER_WEEK {
        next.day = START_DAY;
        next.week += 1;
        next.meta.counters.trains_this_week = 0;
    }

    next.energy = next.max_energy;
    next.money += next.meta.effects.daily_income;
    next.morale += next.meta.effects.daily_morale;
    next.clamp_stats();
    next.error = None;

    evaluate_goals(state, next).0
}

/// One run of the game: state, catalogs, RNG, and the pending-event latch.
///
/// Commands are strictly serialized by the caller; the session itself has no
/// internal concurrency. Every command leaves `state()` valid and never
/// panics or returns an error across this boundary.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    data: GameData,
    rng: GameRng,
    pending: Option<Event>,
}

impl GameSession {
    /// Start a fresh run with the given seed and catalogs.
    #[must_use]
    pub fn new(seed: u64, data: GameData) -> Self {
        Self {
            state: GameState::new(),
            data,
            rng: GameRng::new(seed),
            pending: None,
        }
    }

    /// Resume a run from a loaded snapshot. The RNG restarts from `seed`;
    /// snapshots do not carry generator state.
    #[must_use]
    pub fn from_state(state: GameState, seed: u64, data: GameData) -> Self {
        Self {
            state,
            data,
            rng: GameRng::new(seed),
            pending: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn data(&self) -> &GameData {
        &self.data
    }

    /// The event awaiting a player choice, if any. While set, action,
    /// day-advance, and purchase commands are rejected.
    #[must_use]
    pub const fn pending_event(&self) -> Option<&Event> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> crate::state::Outcome {
        self.state.outcome()
    }

    /// Consume the session, returning the final state snapshot.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Spend energy on a daily action.
    pub fn apply_action(&mut self, action: Action) -> &GameState {
        if self.pending.is_some() {
            self.state = self.state.with_error(ERR_EVENT_PENDING);
            return &self.state;
        }
        self.state = apply_action(&self.state, action);
        &self.state
    }

    /// Buy one level of an upgrade.
    pub fn buy_upgrade(&mut self, upgrade_id: &str) -> &GameState {
        if self.pending.is_some() {
            self.state = self.state.with_error(ERR_EVENT_PENDING);
            return &self.state;
        }
        self.state = apply_upgrade(&self.state, &self.data, upgrade_id);
        &self.state
    }

    /// Move to the next day, possibly suspending play on a rolled event.
    ///
    /// Events only trigger when the advance leaves the run ongoing and the
    /// new day is not the first of a week; one gate roll decides whether the
    /// selector runs at all.
    pub fn advance_day(&mut self) -> &GameState {
        if self.pending.is_some() {
            self.state = self.state.with_error(ERR_EVENT_PENDING);
            return &self.state;
        }

        self.state = advance_day(&self.state);

        if !self.state.is_terminal() && !self.state.is_week_start() {
            let gate = self.rng.roll();
            if gate < EVENT_CHANCE {
                if let Some(event) = pick_event(&self.state, &self.data.events, &mut self.rng) {
                    log::debug!("day {} gate {gate:.4}: event {}", self.state.day, event.id);
                    self.pending = Some(event.clone());
                }
            }
        }

        &self.state
    }

    /// Resolve the pending event with one of its choice ids.
    ///
    /// An unknown choice id leaves the event pending and sets an advisory
    /// error; resolving with a valid id applies the choice and unlatches the
    /// session.
    pub fn resolve_choice(&mut self, choice_id: &str) -> &GameState {
        let Some(event) = self.pending.as_ref() else {
            self.state = self.state.with_error(ERR_NO_EVENT);
            return &self.state;
        };
        let Some(choice) = event.find_choice(choice_id).cloned() else {
            self.state = self.state.with_error(ERR_UNKNOWN_CHOICE);
            return &self.state;
        };
        self.state = apply_choice(&self.state, &choice);
        self.pending = None;
        &self.state
    }
}
