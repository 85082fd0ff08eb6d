// Entity Models
//
// Everything that takes part in a fight or sits in a roster:
// - Combatant: stat block with an attack style (crit / poison / fire)
// - Character: campaign hero with level, experience and inventory
// - Monster: campaign and arena opponents
// - RosterEntry: Player / Enemy / Boss records kept by a GameManager
// - Weapon: value type with `+` and `>`

pub mod character;
pub mod combatant;
pub mod monster;
pub mod roster;
pub mod weapon;

pub use character::{Character, EXPERIENCE_PER_LEVEL};
pub use combatant::{AttackOutcome, AttackStyle, Bonus, Combatant};
pub use monster::{Monster, MonsterKind};
pub use roster::RosterEntry;
pub use weapon::Weapon;
