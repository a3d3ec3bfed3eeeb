//! Agent Rogue Core Engine
//!
//! Platform-agnostic simulation logic for the Agent Rogue resource-management
//! game: a player spends daily energy on actions to grow skill, morale, and
//! money, against random events and purchasable upgrades, toward goal-driven
//! win/lose conditions. This crate provides all game mechanics without UI or
//! platform-specific dependencies; hosts observe state snapshots and dispatch
//! discrete commands.

pub mod actions;
pub mod constants;
pub mod data;
pub mod engine;
pub mod events;
pub mod goals;
pub mod rng;
pub mod save;
pub mod state;
pub mod upgrades;

// Re-export commonly used types
pub use actions::{Action, apply_action, effective_cost};
pub use constants::{EVENT_CHANCE, GOAL_TARGET, MONEY_ZERO_DAYS, MORALE_ZERO_DAYS, SAVE_KEY};
pub use data::{DataError, Event, EventChoice, GameData, StatDelta, Upgrade, UpgradeGrants};
pub use engine::{GameSession, advance_day};
pub use events::{apply_choice, pick_event};
pub use goals::{GOALS, Goal, NewlyCompleted, evaluate_goals};
pub use rng::{GameRng, RollSource};
pub use save::{KvStore, MemoryStore, clear_save, load_state, save_state};
pub use state::{Counters, EffectMods, GameState, LossReason, Meta, Outcome};
pub use upgrades::apply_upgrade;

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the event and upgrade catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogs cannot be loaded or validated.
    fn load_game_data(&self) -> Result<GameData, Self::Error>;
}

/// Loader serving the compiled-in stock catalogs. Cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLoader;

impl DataLoader for StaticLoader {
    type Error = std::convert::Infallible;

    fn load_game_data(&self) -> Result<GameData, Self::Error> {
        Ok(GameData::builtin())
    }
}

/// Main entry point wiring catalogs and storage to run sessions.
pub struct RogueEngine<L, S>
where
    L: DataLoader,
    S: KvStore,
{
    data_loader: L,
    storage: S,
}

impl<L, S> RogueEngine<L, S>
where
    L: DataLoader,
    S: KvStore,
{
    /// Create an engine with the provided data loader and storage.
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    /// Start a fresh seeded run.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogs cannot be loaded.
    pub fn new_run(&self, seed: u64) -> Result<GameSession, L::Error> {
        let data = self.data_loader.load_game_data()?;
        Ok(GameSession::new(seed, data))
    }

    /// Resume from the saved snapshot, or `None` when no usable save exists.
    ///
    /// The snapshot does not carry RNG state; the resumed session replays
    /// from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogs cannot be loaded. Storage trouble is
    /// never an error here; it reads as an absent save.
    pub fn resume(&self, seed: u64) -> Result<Option<GameSession>, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let Some(state) = load_state(&self.storage) else {
            return Ok(None);
        };
        let data = self.data_loader.load_game_data().map_err(Into::into)?;
        Ok(Some(GameSession::from_state(state, seed, data)))
    }

    /// Snapshot a state into the save slot. Failures are logged and swallowed.
    pub fn save(&self, state: &GameState) {
        save_state(&self.storage, state);
    }

    /// Delete the save slot.
    pub fn clear_save(&self) {
        clear_save(&self.storage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creates_and_roundtrips_state() {
        let engine = RogueEngine::new(StaticLoader, MemoryStore::new());
        let mut session = engine.new_run(0xABCD).unwrap();
        session.apply_action(Action::Work);
        let snapshot = session.into_state();
        engine.save(&snapshot);

        let resumed = engine.resume(0xABCD).unwrap().expect("save exists");
        assert_eq!(resumed.state(), &snapshot);
    }

    #[test]
    fn resume_without_save_is_none() {
        let engine = RogueEngine::new(StaticLoader, MemoryStore::new());
        assert!(engine.resume(1).unwrap().is_none());
    }

    #[test]
    fn clear_save_forgets_the_run() {
        let engine = RogueEngine::new(StaticLoader, MemoryStore::new());
        let session = engine.new_run(7).unwrap();
        engine.save(session.state());
        engine.clear_save();
        assert!(engine.resume(7).unwrap().is_none());
    }

    #[test]
    fn static_loader_serves_the_stock_catalogs() {
        let data = StaticLoader.load_game_data().unwrap();
        assert!(!data.events.is_empty());
        assert!(!data.upgrades.is_empty());
    }
}
