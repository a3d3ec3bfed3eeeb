//! Immutable catalog data: random events and shop upgrades.
//!
//! Catalogs are read-only configuration injected into the engine at
//! construction. Hosts may supply their own JSON via [`GameData::from_json`];
//! the compiled-in [`GameData::builtin`] catalog reproduces the stock game.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::state::GameState;

/// Stat adjustment applied by an event choice.
///
/// All fields default to 0 when absent in JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatDelta {
    pub energy: i32,
    pub morale: i32,
    pub skill: i32,
    pub money: i32,
}

impl StatDelta {
    /// Apply the delta in place, keeping the stat invariants: energy capped
    /// at `max_energy`, everything floored at zero.
    pub(crate) fn apply_to(self, state: &mut GameState) {
        state.energy += self.energy;
        state.morale += self.morale;
        state.skill += self.skill;
        state.money += self.money;
        state.clamp_stats();
    }
}

/// One selectable outcome of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChoice {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub effects: StatDelta,
}

/// A random event in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Earliest day of the week this event may fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_day: Option<u32>,
    /// Earliest week this event may fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_week: Option<u32>,
    pub choices: Vec<EventChoice>,
}

const fn default_weight() -> u32 {
    1
}

impl Event {
    /// Whether the day/week gates admit this event for the given state.
    #[must_use]
    pub fn eligible(&self, state: &GameState) -> bool {
        let day_ok = self.min_day.is_none_or(|min| state.day >= min);
        let week_ok = self.min_week.is_none_or(|min| state.week >= min);
        day_ok && week_ok
    }

    #[must_use]
    pub fn find_choice(&self, choice_id: &str) -> Option<&EventChoice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }
}

/// Additive grants applied when an upgrade is purchased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpgradeGrants {
    /// Permanent raise to the energy cap.
    pub max_energy: i32,
    /// Immediate energy refill (clamped to the new cap).
    pub energy: i32,
    pub morale: i32,
    pub skill: i32,
    pub money: i32,
    /// Adjustments to the passive effect modifiers.
    pub effects: crate::state::EffectMods,
}

/// A purchasable upgrade in the shop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub desc: String,
    /// Price in money.
    pub cost: i32,
    /// Whether the upgrade can be bought more than once.
    #[serde(default)]
    pub repeatable: bool,
    /// Purchase cap for repeatable upgrades; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<u32>,
    #[serde(default)]
    pub grants: UpgradeGrants,
}

impl Upgrade {
    /// Highest purchasable level: 1 for non-repeatable upgrades, the declared
    /// cap or unbounded for repeatable ones.
    #[must_use]
    pub fn level_cap(&self) -> u32 {
        if self.repeatable {
            self.max_level.unwrap_or(u32::MAX)
        } else {
            self.max_level.unwrap_or(1)
        }
    }
}

/// Catalog validation failures.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event `{0}` needs at least two choices")]
    TooFewChoices(String),
    #[error("event `{0}` has zero weight")]
    ZeroWeight(String),
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("upgrade `{0}` has a negative cost")]
    NegativeCost(String),
}

/// Container bundling both catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameData {
    pub events: Vec<Event>,
    pub upgrades: Vec<Upgrade>,
}

impl GameData {
    /// Empty catalogs (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate catalogs from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, an event has fewer than
    /// two choices or zero weight, an upgrade has a negative cost, or any id
    /// repeats within its catalog.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(DataError::DuplicateId(event.id.clone()));
            }
            if event.choices.len() < 2 {
                return Err(DataError::TooFewChoices(event.id.clone()));
            }
            if event.weight == 0 {
                return Err(DataError::ZeroWeight(event.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for upgrade in &self.upgrades {
            if !seen.insert(upgrade.id.as_str()) {
                return Err(DataError::DuplicateId(upgrade.id.clone()));
            }
            if upgrade.cost < 0 {
                return Err(DataError::NegativeCost(upgrade.id.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn find_event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == event_id)
    }

    #[must_use]
    pub fn find_upgrade(&self, upgrade_id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|upgrade| upgrade.id == upgrade_id)
    }

    /// The stock catalogs shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            events: builtin_events(),
            upgrades: builtin_upgrades(),
        }
    }
}

fn choice(id: &str, label: &str, effects: StatDelta) -> EventChoice {
    EventChoice {
        id: id.to_string(),
        label: label.to_string(),
        effects,
    }
}

fn builtin_events() -> Vec<Event> {
    vec![
        Event {
            id: "overtime-offer".to_string(),
            title: "Overtime Offer".to_string(),
            text: "A lucrative contract needs a quick turnaround. Do you stay late?".to_string(),
            weight: 3,
            min_day: Some(2),
            min_week: None,
            choices: vec![
                choice(
                    "take-it",
                    "Take the overtime (+$8, -1 morale, -1 energy)",
                    StatDelta {
                        money: 8,
                        morale: -1,
                        energy: -1,
                        ..StatDelta::default()
                    },
                ),
                choice(
                    "decline",
                    "Decline and rest (+1 morale)",
                    StatDelta {
                        morale: 1,
                        ..StatDelta::default()
                    },
                ),
            ],
        },
        Event {
            id: "mentor-session".to_string(),
            title: "Mentor Session".to_string(),
            text: "A senior agent offers to review your work if you can spare the time."
                .to_string(),
            weight: 2,
            min_day: None,
            min_week: Some(2),
            choices: vec![
                choice(
                    "attend",
                    "Attend (+2 skill, -1 energy, +1 morale)",
                    StatDelta {
                        skill: 2,
                        energy: -1,
                        morale: 1,
                        ..StatDelta::default()
                    },
                ),
                choice(
                    "reschedule",
                    "Reschedule (-1 morale)",
                    StatDelta {
                        morale: -1,
                        ..StatDelta::default()
                    },
                ),
            ],
        },
        Event {
            id: "coffee-break".to_string(),
            title: "Coffee Break".to_string(),
            text: "The team heads out for fancy lattes. Do you join them?".to_string(),
            weight: 2,
            min_day: None,
            min_week: None,
            choices: vec![
                choice(
                    "treat-team",
                    "Treat the team (+2 morale, -$2)",
                    StatDelta {
                        morale: 2,
                        money: -2,
                        ..StatDelta::default()
                    },
                ),
                choice(
                    "skip",
                    "Skip and sip water (+1 energy)",
                    StatDelta {
                        energy: 1,
                        ..StatDelta::default()
                    },
                ),
            ],
        },
        Event {
            id: "bug-bash".to_string(),
            title: "Bug Bash".to_string(),
            text: "A critical bug bash needs volunteers to crush lingering issues.".to_string(),
            weight: 2,
            min_day: Some(3),
            min_week: Some(2),
            choices: vec![
                choice(
                    "dive-in",
                    "Dive in (+2 skill, -2 energy)",
                    StatDelta {
                        skill: 2,
                        energy: -2,
                        ..StatDelta::default()
                    },
                ),
                choice(
                    "coordinate",
                    "Coordinate (+1 skill, -1 energy, +1 morale)",
                    StatDelta {
                        skill: 1,
                        energy: -1,
                        morale: 1,
                        ..StatDelta::default()
                    },
                ),
            ],
        },
        Event {
            id: "unexpected-bill".to_string(),
            title: "Unexpected Bill".to_string(),
            text: "A forgotten invoice arrives and needs to be handled immediately.".to_string(),
            weight: 1,
            min_day: Some(2),
            min_week: None,
            choices: vec![
                choice(
                    "pay-now",
                    "Pay it now (-$4, -1 morale)",
                    StatDelta {
                        money: -4,
                        morale: -1,
                        ..StatDelta::default()
                    },
                ),
                choice(
                    "negotiate",
                    "Negotiate (-$2)",
                    StatDelta {
                        money: -2,
                        ..StatDelta::default()
                    },
                ),
            ],
        },
    ]
}

fn builtin_upgrades() -> Vec<Upgrade> {
    use crate::state::EffectMods;

    vec![
        Upgrade {
            id: "energyDrinkFridge".to_string(),
            name: "Energy Drink Fridge".to_string(),
            desc: "Increase max energy by 2.".to_string(),
            cost: 12,
            repeatable: false,
            max_level: None,
            grants: UpgradeGrants {
                max_energy: 2,
                energy: 2,
                ..UpgradeGrants::default()
            },
        },
        Upgrade {
            id: "ergonomicChair".to_string(),
            name: "Ergonomic Chair".to_string(),
            desc: "+1 morale at the start of each day.".to_string(),
            cost: 15,
            repeatable: false,
            max_level: None,
            grants: UpgradeGrants {
                effects: EffectMods {
                    daily_morale: 1,
                    ..EffectMods::default()
                },
                ..UpgradeGrants::default()
            },
        },
        Upgrade {
            id: "skillBook".to_string(),
            name: "Skill Book".to_string(),
            desc: "+1 skill immediately. Max 3 purchases.".to_string(),
            cost: 10,
            repeatable: true,
            max_level: Some(3),
            grants: UpgradeGrants {
                skill: 1,
                ..UpgradeGrants::default()
            },
        },
        Upgrade {
            id: "timeManagementCourse".to_string(),
            name: "Time Management Course".to_string(),
            desc: "Actions cost 1 less energy (min 0).".to_string(),
            cost: 20,
            repeatable: false,
            max_level: None,
            grants: UpgradeGrants {
                effects: EffectMods {
                    energy_cost_delta: -1,
                    ..EffectMods::default()
                },
                ..UpgradeGrants::default()
            },
        },
        Upgrade {
            id: "sideHustle".to_string(),
            name: "Side Hustle".to_string(),
            desc: "Earn an extra $2 each new day.".to_string(),
            cost: 18,
            repeatable: false,
            max_level: None,
            grants: UpgradeGrants {
                effects: EffectMods {
                    daily_income: 2,
                    ..EffectMods::default()
                },
                ..UpgradeGrants::default()
            },
        },
        Upgrade {
            id: "coffeeSubscription".to_string(),
            name: "Coffee Subscription".to_string(),
            desc: "+1 morale when you Rest.".to_string(),
            cost: 8,
            repeatable: false,
            max_level: None,
            grants: UpgradeGrants {
                effects: EffectMods {
                    rest_morale_bonus: 1,
                    ..EffectMods::default()
                },
                ..UpgradeGrants::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_passes_validation() {
        let data = GameData::builtin();
        data.validate().unwrap();
        assert_eq!(data.events.len(), 5);
        assert_eq!(data.upgrades.len(), 6);
        for event in &data.events {
            assert!(event.choices.len() >= 2, "{} is underbuilt", event.id);
            assert!(event.weight > 0);
        }
    }

    #[test]
    fn from_json_accepts_minimal_catalog() {
        let json = r#"{
            "events": [
                {
                    "id": "pop-quiz",
                    "title": "Pop Quiz",
                    "text": "A surprise check-in.",
                    "weight": 2,
                    "minDay": 3,
                    "choices": [
                        { "id": "ace", "label": "Ace it", "effects": { "skill": 1 } },
                        { "id": "dodge", "label": "Dodge", "effects": { "morale": -1 } }
                    ]
                }
            ],
            "upgrades": [
                {
                    "id": "standingDesk",
                    "name": "Standing Desk",
                    "desc": "+1 max energy.",
                    "cost": 9,
                    "grants": { "maxEnergy": 1 }
                }
            ]
        }"#;

        let data = GameData::from_json(json).unwrap();
        assert_eq!(data.events[0].min_day, Some(3));
        assert_eq!(data.events[0].choices[0].effects.skill, 1);
        assert_eq!(data.upgrades[0].grants.max_energy, 1);
        assert_eq!(data.upgrades[0].level_cap(), 1);
    }

    #[test]
    fn from_json_rejects_single_choice_events() {
        let json = r#"{
            "events": [
                {
                    "id": "lonely",
                    "title": "Lonely",
                    "text": "No real decision here.",
                    "choices": [ { "id": "only", "label": "Only option" } ]
                }
            ]
        }"#;
        assert!(matches!(
            GameData::from_json(json),
            Err(DataError::TooFewChoices(id)) if id == "lonely"
        ));
    }

    #[test]
    fn from_json_rejects_duplicate_ids() {
        let json = r#"{
            "upgrades": [
                { "id": "dup", "name": "A", "desc": "", "cost": 1 },
                { "id": "dup", "name": "B", "desc": "", "cost": 2 }
            ]
        }"#;
        assert!(matches!(
            GameData::from_json(json),
            Err(DataError::DuplicateId(id)) if id == "dup"
        ));
    }

    #[test]
    fn from_json_rejects_negative_costs() {
        let json = r#"{
            "upgrades": [
                { "id": "moneyPrinter", "name": "Money Printer", "desc": "", "cost": -5 }
            ]
        }"#;
        assert!(matches!(
            GameData::from_json(json),
            Err(DataError::NegativeCost(id)) if id == "moneyPrinter"
        ));
    }

    #[test]
    fn level_cap_follows_repeatable_flag() {
        let data = GameData::builtin();
        assert_eq!(data.find_upgrade("skillBook").unwrap().level_cap(), 3);
        assert_eq!(data.find_upgrade("sideHustle").unwrap().level_cap(), 1);
    }
}
