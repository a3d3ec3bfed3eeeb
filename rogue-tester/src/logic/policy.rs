//! Scripted player policies for automated runs.

use clap::ValueEnum;

use rogue_game::{Action, Event, GameData, GameState, effective_cost};

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum StrategyId {
    /// Keep money solvent, train toward the weekly goal, rest the remainder.
    Balanced,
    /// Train as hard as the energy budget allows.
    Grinder,
    /// Work every affordable slot and buy income upgrades early.
    Hustler,
}

impl StrategyId {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Grinder => "Grinder",
            Self::Hustler => "Hustler",
        }
    }

    #[must_use]
    pub fn create_policy(self) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Grinder => Box::new(GrinderPolicy),
            Self::Hustler => Box::new(HustlerPolicy),
        }
    }

    pub const ALL: [Self; 3] = [Self::Balanced, Self::Grinder, Self::Hustler];
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging and report output.
    fn name(&self) -> &'static str;

    /// Next action for today, or `None` to end the day. `taken` counts the
    /// actions already performed today; policies must eventually return
    /// `None` for any state.
    fn next_action(&mut self, state: &GameState, taken: u32) -> Option<Action>;

    /// Index of the choice to take for a pending event.
    fn pick_choice(&mut self, state: &GameState, event: &Event) -> usize;

    /// Upgrade to buy before ending the day, if any.
    fn shop(&mut self, state: &GameState, data: &GameData) -> Option<String>;
}

fn affordable(state: &GameState, action: Action) -> bool {
    state.energy >= effective_cost(action, &state.meta.effects)
}

/// Score a choice by a weighted view of its stat deltas.
fn best_choice(event: &Event, weight: impl Fn(&rogue_game::StatDelta) -> i32) -> usize {
    event
        .choices
        .iter()
        .enumerate()
        .max_by_key(|(_, choice)| weight(&choice.effects))
        .map_or(0, |(idx, _)| idx)
}

struct BalancedPolicy;

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn next_action(&mut self, state: &GameState, taken: u32) -> Option<Action> {
        if taken >= 3 {
            return None;
        }
        if state.money < 10 && affordable(state, Action::Work) {
            return Some(Action::Work);
        }
        if state.meta.counters.trains_this_week < 3 && affordable(state, Action::Train) {
            return Some(Action::Train);
        }
        Some(Action::Rest)
    }

    fn pick_choice(&mut self, _state: &GameState, event: &Event) -> usize {
        best_choice(event, |delta| delta.morale * 2 + delta.money + delta.skill)
    }

    fn shop(&mut self, state: &GameState, data: &GameData) -> Option<String> {
        for id in ["coffeeSubscription", "skillBook"] {
            if let Some(upgrade) = data.find_upgrade(id) {
                let below_cap = state.upgrade_level(id) < upgrade.level_cap();
                if below_cap && state.money >= upgrade.cost + 10 {
                    return Some(id.to_string());
                }
            }
        }
        None
    }
}

struct GrinderPolicy;

impl PlayerPolicy for GrinderPolicy {
    fn name(&self) -> &'static str {
        "grinder"
    }

    fn next_action(&mut self, state: &GameState, taken: u32) -> Option<Action> {
        if taken >= 4 {
            return None;
        }
        if state.money < 4 && affordable(state, Action::Work) {
            return Some(Action::Work);
        }
        if affordable(state, Action::Train) {
            return Some(Action::Train);
        }
        Some(Action::Rest)
    }

    fn pick_choice(&mut self, _state: &GameState, event: &Event) -> usize {
        best_choice(event, |delta| delta.skill * 2 + delta.energy)
    }

    fn shop(&mut self, state: &GameState, data: &GameData) -> Option<String> {
        let upgrade = data.find_upgrade("skillBook")?;
        let below_cap = state.upgrade_level(&upgrade.id) < upgrade.level_cap();
        (below_cap && state.money >= upgrade.cost + 5).then(|| upgrade.id.clone())
    }
}

struct HustlerPolicy;

impl PlayerPolicy for HustlerPolicy {
    fn name(&self) -> &'static str {
        "hustler"
    }

    fn next_action(&mut self, state: &GameState, taken: u32) -> Option<Action> {
        if taken >= 4 {
            return None;
        }
        if affordable(state, Action::Work) && state.energy > 2 {
            return Some(Action::Work);
        }
        Some(Action::Rest)
    }

    fn pick_choice(&mut self, _state: &GameState, event: &Event) -> usize {
        best_choice(event, |delta| delta.money * 2 + delta.morale)
    }

    fn shop(&mut self, state: &GameState, data: &GameData) -> Option<String> {
        for id in ["sideHustle", "energyDrinkFridge"] {
            if state.upgrade_level(id) == 0 {
                if let Some(upgrade) = data.find_upgrade(id) {
                    if state.money >= upgrade.cost {
                        return Some(id.to_string());
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_ends_the_day() {
        let state = GameState::new();
        for strategy in StrategyId::ALL {
            let mut policy = strategy.create_policy();
            let mut taken = 0;
            while policy.next_action(&state, taken).is_some() {
                taken += 1;
                assert!(taken < 16, "{} never ends the day", policy.name());
            }
        }
    }

    #[test]
    fn choice_indices_stay_in_bounds() {
        let data = GameData::builtin();
        let state = GameState::new();
        for strategy in StrategyId::ALL {
            let mut policy = strategy.create_policy();
            for event in &data.events {
                let idx = policy.pick_choice(&state, event);
                assert!(idx < event.choices.len());
            }
        }
    }

    #[test]
    fn shop_suggestions_exist_in_the_catalog() {
        let data = GameData::builtin();
        let mut state = GameState::new();
        state.money = 100;
        for strategy in StrategyId::ALL {
            let mut policy = strategy.create_policy();
            if let Some(id) = policy.shop(&state, &data) {
                assert!(data.find_upgrade(&id).is_some());
            }
        }
    }
}
