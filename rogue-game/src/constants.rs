//! Centralized balance and tuning constants for the Agent Rogue core loop.
//!
//! These values define the deterministic math for the simulation. Keeping
//! them together ensures gameplay can only be adjusted via code changes
//! reviewed in version control, rather than through external assets.

// Calendar -----------------------------------------------------------------
pub const DAYS_PER_WEEK: u32 = 7;
pub const START_DAY: u32 = 1;
pub const START_WEEK: u32 = 1;

// Fresh-run stats ----------------------------------------------------------
pub const START_MAX_ENERGY: i32 = 6;
pub const START_MORALE: i32 = 5;
pub const START_SKILL: i32 = 0;
pub const START_MONEY: i32 = 10;

// Win / loss tuning --------------------------------------------------------
/// Completed goals needed to win the run.
pub const GOAL_TARGET: usize = 3;
/// Consecutive days at zero morale before the run is lost.
pub const MORALE_ZERO_DAYS: u32 = 2;
/// Consecutive days at zero money before the run is lost.
pub const MONEY_ZERO_DAYS: u32 = 7;

// Events -------------------------------------------------------------------
/// Chance that a day-advance (outside the first day of a week) rolls an event.
pub const EVENT_CHANCE: f64 = 0.35;

// Upgrades -----------------------------------------------------------------
/// Lowest cumulative energy-cost modifier upgrades can reach.
pub const ENERGY_COST_DELTA_FLOOR: i32 = -3;

// Persistence --------------------------------------------------------------
/// Durable store key holding the single snapshot slot.
pub const SAVE_KEY: &str = "agent-rogue";

// Advisory error copy ------------------------------------------------------
pub(crate) const ERR_NO_ENERGY: &str = "Not enough energy for that action.";
pub(crate) const ERR_NO_MONEY: &str = "Not enough money for that upgrade.";
pub(crate) const ERR_MAX_LEVEL: &str = "Upgrade already at maximum level.";
pub(crate) const ERR_UNKNOWN_UPGRADE: &str = "No such upgrade is on offer.";
pub(crate) const ERR_UNKNOWN_CHOICE: &str = "That is not one of the options.";
pub(crate) const ERR_RUN_OVER: &str = "The run is already over.";
pub(crate) const ERR_EVENT_PENDING: &str = "Resolve the pending event first.";
pub(crate) const ERR_NO_EVENT: &str = "There is no event to resolve.";
