//! Upgrade shop purchase rules.

use crate::constants::{
    ENERGY_COST_DELTA_FLOOR, ERR_MAX_LEVEL, ERR_NO_MONEY, ERR_RUN_OVER, ERR_UNKNOWN_UPGRADE,
};
use crate::data::GameData;
use crate::state::GameState;

/// Attempt to buy one level of an upgrade.
///
/// Rejections are advisory (error string on the returned state, money and
/// stats untouched): terminal run, unknown id, level cap reached, or not
/// enough money. On success the cost is deducted, the level bumped, and the
/// upgrade's grants applied additively before a final clamp.
#[must_use]
pub fn apply_upgrade(state: &GameState, data: &GameData, upgrade_id: &str) -> GameState {
    if state.is_terminal() {
        return state.with_error(ERR_RUN_OVER);
    }
    let Some(upgrade) = data.find_upgrade(upgrade_id) else {
        return state.with_error(ERR_UNKNOWN_UPGRADE);
    };

    let level = state.upgrade_level(upgrade_id);
    if level >= upgrade.level_cap() {
        return state.with_error(ERR_MAX_LEVEL);
    }
    if state.money < upgrade.cost {
        return state.with_error(ERR_NO_MONEY);
    }

    let mut next = state.clone();
    next.money -= upgrade.cost;
    next.meta
        .upgrades
        .insert(upgrade.id.clone(), level + 1);

    let grants = &upgrade.grants;
    next.max_energy += grants.max_energy;
    next.energy += grants.energy;
    next.morale += grants.morale;
    next.skill += grants.skill;
    next.money += grants.money;

    let effects = &mut next.meta.effects;
    effects.energy_cost_delta =
        (effects.energy_cost_delta + grants.effects.energy_cost_delta).max(ENERGY_COST_DELTA_FLOOR);
    effects.rest_morale_bonus += grants.effects.rest_morale_bonus;
    effects.daily_income += grants.effects.daily_income;
    effects.daily_morale += grants.effects.daily_morale;

    next.clamp_stats();
    next.error = None;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_state(money: i32) -> GameState {
        let mut state = GameState::new();
        state.money = money;
        state
    }

    #[test]
    fn purchase_deducts_money_and_records_level() {
        let data = GameData::builtin();
        let state = rich_state(40);

        let state = apply_upgrade(&state, &data, "skillBook");
        assert_eq!(state.skill, 1);
        assert_eq!(state.money, 30);
        assert_eq!(state.upgrade_level("skillBook"), 1);
        assert!(state.error.is_none());
    }

    #[test]
    fn repeatable_purchases_stack_up_to_the_cap() {
        let data = GameData::builtin();
        let mut state = rich_state(40);

        for _ in 0..3 {
            state = apply_upgrade(&state, &data, "skillBook");
        }
        assert_eq!(state.skill, 3);
        assert_eq!(state.upgrade_level("skillBook"), 3);
        assert_eq!(state.money, 10);

        let capped = apply_upgrade(&state, &data, "skillBook");
        assert_eq!(capped.upgrade_level("skillBook"), 3);
        assert_eq!(capped.money, state.money);
        assert_eq!(capped.error.as_deref(), Some(ERR_MAX_LEVEL));
    }

    #[test]
    fn non_repeatable_upgrades_cap_at_level_one() {
        let data = GameData::builtin();
        let state = rich_state(40);
        let state = apply_upgrade(&state, &data, "coffeeSubscription");
        let again = apply_upgrade(&state, &data, "coffeeSubscription");
        assert_eq!(again.error.as_deref(), Some(ERR_MAX_LEVEL));
        assert_eq!(again.meta.effects.rest_morale_bonus, 1);
    }

    #[test]
    fn unaffordable_purchase_is_rejected() {
        let data = GameData::builtin();
        let state = rich_state(5);
        let next = apply_upgrade(&state, &data, "skillBook");
        assert_eq!(next.money, 5);
        assert_eq!(next.skill, 0);
        assert_eq!(next.error.as_deref(), Some(ERR_NO_MONEY));
    }

    #[test]
    fn unknown_upgrade_is_rejected() {
        let data = GameData::builtin();
        let state = rich_state(50);
        let next = apply_upgrade(&state, &data, "jetpack");
        assert_eq!(next.money, 50);
        assert_eq!(next.error.as_deref(), Some(ERR_UNKNOWN_UPGRADE));
    }

    #[test]
    fn terminal_run_rejects_purchases() {
        let data = GameData::builtin();
        let mut state = rich_state(50);
        state.meta.counters.zero_money_streak = 7;
        let next = apply_upgrade(&state, &data, "skillBook");
        assert_eq!(next.error.as_deref(), Some(ERR_RUN_OVER));
        assert_eq!(next.money, 50);
    }

    #[test]
    fn fridge_raises_cap_and_refills() {
        let data = GameData::builtin();
        let mut state = rich_state(20);
        state.energy = 4;
        let next = apply_upgrade(&state, &data, "energyDrinkFridge");
        assert_eq!(next.max_energy, 8);
        assert_eq!(next.energy, 6);
    }

    #[test]
    fn cost_delta_floors_at_minus_three() {
        let mut state = rich_state(100);
        // The builtin course is non-repeatable; stack a synthetic catalog to
        // exercise the cumulative floor.
        let json = r#"{
            "upgrades": [
                {
                    "id": "course", "name": "Course", "desc": "", "cost": 1,
                    "repeatable": true,
                    "grants": { "effects": { "energyCostDelta": -2 } }
                }
            ]
        }"#;
        let stacking = GameData::from_json(json).unwrap();
        for _ in 0..4 {
            state = apply_upgrade(&state, &stacking, "course");
        }
        assert_eq!(state.meta.effects.energy_cost_delta, -3);
    }

    #[test]
    fn passive_grants_accumulate() {
        let data = GameData::builtin();
        let mut state = rich_state(60);
        state = apply_upgrade(&state, &data, "sideHustle");
        state = apply_upgrade(&state, &data, "ergonomicChair");
        state = apply_upgrade(&state, &data, "coffeeSubscription");
        assert_eq!(state.meta.effects.daily_income, 2);
        assert_eq!(state.meta.effects.daily_morale, 1);
        assert_eq!(state.meta.effects.rest_morale_bonus, 1);
        assert_eq!(state.money, 60 - 18 - 15 - 8);
    }
}
