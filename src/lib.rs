// Combat Labs - Core Library
// Exposes the game model for the console binary, the roster viewer and tests

pub mod access;    // Users, guarded resources and the registry
pub mod arena;     // Threaded arena: spawner + battle loop
pub mod battle;    // Campaign battles and turn sources
pub mod config;
pub mod console;   // Numbered menus
pub mod demos;     // Scripted lab walkthroughs
pub mod entities;
pub mod error;
pub mod inventory;
pub mod journal;
pub mod manager;   // GameManager<T>
pub mod queue;
pub mod record;    // Flat-file CSV records

// Re-export commonly used types
pub use access::{
    AccessControlSystem, Guarded, Principal, Resource, Role, User,
    university,
};
pub use arena::{Arena, ArenaFighter, ArenaSummary, FighterStats, MonsterPool, fight, random_monster};
pub use battle::{
    Battle, BattleEvent, BattleResult, Campaign, PlayerAction, ScriptedTurns,
    Turn, TurnOutcome, TurnSource,
};
pub use config::{ArenaConfig, Config};
pub use console::{Choice, Console};
pub use demos::{Lab, run_lab};
pub use entities::{
    AttackOutcome, AttackStyle, Bonus, Character, Combatant, Monster,
    MonsterKind, RosterEntry, Weapon, EXPERIENCE_PER_LEVEL,
};
pub use error::{GameError, GameResult};
pub use inventory::{Inventory, Item};
pub use journal::Journal;
pub use manager::{GameManager, Managed};
pub use queue::Queue;
pub use record::Record;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
