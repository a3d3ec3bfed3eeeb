//! Durable snapshot codec with field-by-field sanitization.
//!
//! The store is untrusted: snapshots may have been edited, truncated, or
//! written by an older build. The load path therefore never deserializes the
//! state blindly; it re-validates every field and rejects the whole snapshot
//! when the core shape is broken. No failure in this module ever reaches the
//! caller as an error; a bad save is simply "no save".

use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

use crate::constants::{ENERGY_COST_DELTA_FLOOR, SAVE_KEY};
use crate::state::{Counters, EffectMods, GameState, Meta};

/// Minimal durable key-value store, in the shape of web local storage.
///
/// Implementations are expected to be cheap and synchronous; hosts without a
/// durable store can simply not call the persistence functions.
pub trait KvStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a value, `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory store used by tests and the QA harness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cells: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.cells.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.cells
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.cells.borrow_mut().remove(key);
        Ok(())
    }
}

/// Persist a snapshot under the single save slot.
///
/// Serialization or storage failures are logged and swallowed; the in-memory
/// state is already consistent and must not be disturbed by storage trouble.
pub fn save_state<S: KvStore>(store: &S, state: &GameState) {
    match serde_json::to_string(state) {
        Ok(raw) => {
            if let Err(err) = store.set(SAVE_KEY, &raw) {
                log::warn!("failed to persist snapshot: {err}");
            }
        }
        Err(err) => {
            log::warn!("failed to serialize snapshot: {err}");
        }
    }
}

/// Load and sanitize the saved snapshot, `None` when absent or unusable.
pub fn load_state<S: KvStore>(store: &S) -> Option<GameState> {
    let raw = match store.get(SAVE_KEY) {
        Ok(found) => found?,
        Err(err) => {
            log::warn!("failed to read snapshot: {err}");
            return None;
        }
    };
    let value: Value = serde_json::from_str(&raw).ok()?;
    sanitize_state(&value)
}

/// Remove the saved snapshot.
pub fn clear_save<S: KvStore>(store: &S) {
    if let Err(err) = store.remove(SAVE_KEY) {
        log::warn!("failed to clear snapshot: {err}");
    }
}

fn finite_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key)?.as_f64().filter(|n| n.is_finite())
}

/// Saturating numeric conversion for stats read from untrusted input.
#[allow(clippy::cast_possible_truncation)]
fn to_stat(n: f64) -> i32 {
    n as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(n: f64) -> u32 {
    n as u32
}

fn sanitize_upgrades(value: Option<&Value>) -> HashMap<String, f64> {
    let mut upgrades = HashMap::new();
    let Some(map) = value.and_then(Value::as_object) else {
        return upgrades;
    };
    for (key, entry) in map {
        if let Some(level) = entry.as_f64().filter(|n| n.is_finite()) {
            upgrades.insert(key.clone(), level);
        }
    }
    upgrades
}

fn sanitize_effects(value: Option<&Value>) -> EffectMods {
    let mut effects = EffectMods::default();
    let Some(map) = value.and_then(Value::as_object) else {
        return effects;
    };
    if let Some(delta) = finite_field(map, "energyCostDelta") {
        effects.energy_cost_delta = to_stat(delta).max(ENERGY_COST_DELTA_FLOOR);
    }
    if let Some(bonus) = finite_field(map, "restMoraleBonus").filter(|n| *n >= 0.0) {
        effects.rest_morale_bonus = to_stat(bonus);
    }
    if let Some(income) = finite_field(map, "dailyIncome").filter(|n| *n >= 0.0) {
        effects.daily_income = to_stat(income);
    }
    if let Some(morale) = finite_field(map, "dailyMorale").filter(|n| *n >= 0.0) {
        effects.daily_morale = to_stat(morale);
    }
    effects
}

fn sanitize_counters(value: Option<&Value>) -> Counters {
    let mut counters = Counters::default();
    let Some(map) = value.and_then(Value::as_object) else {
        return counters;
    };
    let read = |key: &str| {
        finite_field(map, key)
            .filter(|n| *n >= 0.0)
            .map_or(0, to_count)
    };
    counters.trains_this_week = read("trainsThisWeek");
    counters.days_full_energy = read("daysFullEnergy");
    counters.zero_money_streak = read("zeroMoneyStreak");
    counters.low_morale_streak = read("lowMoraleStreak");
    counters
}

fn sanitize_goals(value: Option<&Value>) -> Vec<String> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut goals = Vec::new();
    for entry in entries {
        if let Some(id) = entry.as_str() {
            if seen.insert(id.to_string()) {
                goals.push(id.to_string());
            }
        }
    }
    goals
}

/// Rebuild a `GameState` from an untrusted JSON value.
///
/// The seven top-level numeric fields are required and must be finite; any
/// miss rejects the snapshot entirely. Everything under `meta` degrades
/// gracefully to defaults instead.
#[must_use]
pub fn sanitize_state(value: &Value) -> Option<GameState> {
    let obj = value.as_object()?;

    let day = finite_field(obj, "day")?;
    let week = finite_field(obj, "week")?;
    let energy = finite_field(obj, "energy")?;
    let max_energy = finite_field(obj, "maxEnergy")?;
    let morale = finite_field(obj, "morale")?;
    let skill = finite_field(obj, "skill")?;
    let money = finite_field(obj, "money")?;

    let meta_value = obj.get("meta");
    let meta_obj = meta_value.and_then(Value::as_object);
    let pick = |key: &str| meta_obj.and_then(|meta| meta.get(key));

    let mut upgrades = std::collections::BTreeMap::new();
    for (id, level) in sanitize_upgrades(pick("upgrades")) {
        upgrades.insert(id, to_count(level.max(0.0)));
    }

    let max_energy = to_stat(max_energy).max(0);
    let mut state = GameState {
        day: to_count(day.max(0.0)),
        week: to_count(week.max(0.0)),
        energy: to_stat(energy).clamp(0, max_energy),
        max_energy,
        morale: to_stat(morale).max(0),
        skill: to_stat(skill).max(0),
        money: to_stat(money).max(0),
        error: obj
            .get("error")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        meta: Meta {
            upgrades,
            effects: sanitize_effects(pick("effects")),
            counters: sanitize_counters(pick("counters")),
            goals_completed: sanitize_goals(pick("goalsCompleted")),
        },
    };
    state.clamp_stats();
    Some(state)
}
