//! Canonical run state: stats, calendar, passive modifiers, and outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    GOAL_TARGET, MONEY_ZERO_DAYS, MORALE_ZERO_DAYS, START_DAY, START_MAX_ENERGY, START_MONEY,
    START_MORALE, START_SKILL, START_WEEK,
};

/// Passive modifiers accumulated additively by upgrade purchases.
///
/// Every field is always present so transition functions have a total input
/// domain; absent save fields simply deserialize to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectMods {
    /// Added to every action's energy cost. Negative means cheaper actions.
    pub energy_cost_delta: i32,
    /// Extra morale granted when resting.
    pub rest_morale_bonus: i32,
    /// Money granted at the start of each day.
    pub daily_income: i32,
    /// Morale granted at the start of each day.
    pub daily_morale: i32,
}

/// Rolling streak and progress counters maintained by the day engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    pub trains_this_week: u32,
    pub days_full_energy: u32,
    pub zero_money_streak: u32,
    pub low_morale_streak: u32,
}

/// Persistent run metadata beyond the visible stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    /// Purchased upgrade levels by upgrade id.
    pub upgrades: BTreeMap<String, u32>,
    pub effects: EffectMods,
    pub counters: Counters,
    /// Goal ids completed this run, in completion order. Append-only.
    pub goals_completed: Vec<String>,
}

/// Why a run was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossReason {
    Morale,
    Money,
}

impl LossReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morale => "morale",
            Self::Money => "money",
        }
    }
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived run status. Never stored; always recomputed from state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "loseReason")]
pub enum Outcome {
    Ongoing,
    Won,
    Lost(LossReason),
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Full simulation state for one run.
///
/// Owned exclusively by the session; every transition is value-returning, so
/// observers only ever hold immutable snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Day of the week, `1..=7`, wrapping.
    pub day: u32,
    /// Week number, monotonically increasing from 1.
    pub week: u32,
    pub energy: i32,
    pub max_energy: i32,
    pub morale: i32,
    pub skill: i32,
    pub money: i32,
    /// Advisory message from the last rejected command. Cleared on the next
    /// successful transition; never fatal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub meta: Meta,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            day: START_DAY,
            week: START_WEEK,
            energy: START_MAX_ENERGY,
            max_energy: START_MAX_ENERGY,
            morale: START_MORALE,
            skill: START_SKILL,
            money: START_MONEY,
            error: None,
            meta: Meta::default(),
        }
    }
}

impl GameState {
    /// Canonical fresh-run state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the run status. Win is checked before loss: a state satisfying
    /// both simultaneously reports as won.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.meta.goals_completed.len() >= GOAL_TARGET {
            return Outcome::Won;
        }
        if self.meta.counters.low_morale_streak >= MORALE_ZERO_DAYS {
            return Outcome::Lost(LossReason::Morale);
        }
        if self.meta.counters.zero_money_streak >= MONEY_ZERO_DAYS {
            return Outcome::Lost(LossReason::Money);
        }
        Outcome::Ongoing
    }

    /// Whether the run accepts no further action or day-advance commands.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    #[must_use]
    pub fn goal_completed(&self, goal_id: &str) -> bool {
        self.meta.goals_completed.iter().any(|id| id == goal_id)
    }

    #[must_use]
    pub fn upgrade_level(&self, upgrade_id: &str) -> u32 {
        self.meta
            .upgrades
            .get(upgrade_id)
            .copied()
            .unwrap_or_default()
    }

    /// True on the first day of a week; no events trigger on these days.
    #[must_use]
    pub const fn is_week_start(&self) -> bool {
        self.day == START_DAY
    }

    /// Re-establish the stat invariants after any arithmetic:
    /// `0 <= energy <= max_energy`, everything else floored at zero.
    pub(crate) fn clamp_stats(&mut self) {
        self.max_energy = self.max_energy.max(0);
        self.energy = self.energy.clamp(0, self.max_energy);
        self.morale = self.morale.max(0);
        self.skill = self.skill.max(0);
        self.money = self.money.max(0);
    }

    /// Copy of this state carrying an advisory error and nothing else changed.
    pub(crate) fn with_error(&self, message: &str) -> Self {
        let mut next = self.clone();
        next.error = Some(message.to_string());
        next
    }
}
