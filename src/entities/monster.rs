// 👹 Monster - the things a hero fights in a campaign
//
// Goblin, Dragon and Skeleton are the campaign opponents; the arena's
// generator also draws Orc, Troll and Zombie names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::character::Character;
use super::combatant::AttackOutcome;
use crate::error::{parse_field, GameError, GameResult};
use crate::record::Record;

// ============================================================================
// MONSTER KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Goblin,
    Dragon,
    Skeleton,
    Orc,
    Troll,
    Zombie,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 6] = [
        MonsterKind::Goblin,
        MonsterKind::Orc,
        MonsterKind::Troll,
        MonsterKind::Skeleton,
        MonsterKind::Zombie,
        MonsterKind::Dragon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonsterKind::Goblin => "Goblin",
            MonsterKind::Dragon => "Dragon",
            MonsterKind::Skeleton => "Skeleton",
            MonsterKind::Orc => "Orc",
            MonsterKind::Troll => "Troll",
            MonsterKind::Zombie => "Zombie",
        }
    }

    /// Base (health, attack, defense)
    pub fn base_stats(&self) -> (i32, i32, i32) {
        match self {
            MonsterKind::Goblin => (30, 8, 3),
            MonsterKind::Dragon => (100, 20, 10),
            MonsterKind::Skeleton => (40, 10, 5),
            MonsterKind::Orc => (60, 12, 4),
            MonsterKind::Troll => (90, 15, 6),
            MonsterKind::Zombie => (50, 9, 2),
        }
    }

    /// Line printed when this kind attacks
    pub fn attack_flavor(&self) -> &'static str {
        match self {
            MonsterKind::Goblin => "Goblin attacks with a crude club!",
            MonsterKind::Dragon => "Dragon breathes fire!",
            MonsterKind::Skeleton => "Skeleton attacks with a rusty sword!",
            MonsterKind::Orc => "Orc swings a jagged axe!",
            MonsterKind::Troll => "Troll smashes with its fists!",
            MonsterKind::Zombie => "Zombie lunges and bites!",
        }
    }
}

impl FromStr for MonsterKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonsterKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidArgument(format!("unknown monster kind: {}", s)))
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MONSTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    kind: MonsterKind,
    name: String,
    health: i32,
    attack: i32,
    defense: i32,
}

impl Monster {
    /// Monster with the preset stats of its kind
    pub fn spawn(kind: MonsterKind) -> Self {
        let (health, attack, defense) = kind.base_stats();
        Monster {
            kind,
            name: kind.as_str().to_string(),
            health,
            attack,
            defense,
        }
    }

    pub fn goblin() -> Self {
        Self::spawn(MonsterKind::Goblin)
    }

    pub fn dragon() -> Self {
        Self::spawn(MonsterKind::Dragon)
    }

    pub fn skeleton() -> Self {
        Self::spawn(MonsterKind::Skeleton)
    }

    pub fn with_stats(
        kind: MonsterKind,
        name: impl Into<String>,
        health: i32,
        attack: i32,
        defense: i32,
    ) -> GameResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument("monster name cannot be empty".to_string()));
        }
        if health < 0 || attack < 0 || defense < 0 {
            return Err(GameError::InvalidArgument(format!(
                "{}: stats cannot be negative",
                name
            )));
        }
        Ok(Monster {
            kind,
            name,
            health,
            attack,
            defense,
        })
    }

    pub fn kind(&self) -> MonsterKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage.max(0)).max(0);
    }

    /// Experience a hero earns for defeating this monster
    pub fn experience_reward(&self) -> u32 {
        (self.attack.max(0) as u32).saturating_mul(5)
    }

    /// Hit the hero once. Err(Defeated) when the hero's health reaches zero.
    pub fn attack_target(&self, target: &mut Character) -> GameResult<AttackOutcome> {
        let damage = self.attack - target.defense();
        let mut outcome = AttackOutcome {
            attacker: self.name.clone(),
            target: target.name().to_string(),
            damage: 0,
            bonus: None,
        };

        if damage > 0 {
            outcome.damage = damage;
            target.take_damage(damage)?;
        }
        Ok(outcome)
    }
}

/// `Kind,name,health,attack,defense`; an unknown kind is skipped
impl Record for Monster {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.kind.to_string(),
            self.name.clone(),
            self.health.to_string(),
            self.attack.to_string(),
            self.defense.to_string(),
        ]
    }

    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>> {
        let Some(Ok(kind)) = fields.first().map(|tag| tag.parse::<MonsterKind>()) else {
            return Ok(None);
        };
        if fields.len() != 5 {
            return Err(GameError::invalid_data(line, "invalid monster data format"));
        }

        Monster::with_stats(
            kind,
            fields[1],
            parse_field(fields[2], "health", line)?,
            parse_field(fields[3], "attack", line)?,
            parse_field(fields[4], "defense", line)?,
        )
        .map(Some)
        .map_err(|e| GameError::invalid_data(line, e.to_string()))
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - HP: {}, ATK: {}, DEF: {}",
            self.name, self.health, self.attack, self.defense
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{read_records, write_records};

    #[test]
    fn test_presets() {
        let goblin = Monster::goblin();
        assert_eq!(goblin.to_string(), "Goblin - HP: 30, ATK: 8, DEF: 3");
        assert_eq!(Monster::dragon().health(), 100);
        assert_eq!(Monster::skeleton().attack(), 10);
    }

    #[test]
    fn test_experience_reward() {
        assert_eq!(Monster::goblin().experience_reward(), 40);
        assert_eq!(Monster::dragon().experience_reward(), 100);
        assert_eq!(Monster::skeleton().experience_reward(), 50);
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut skeleton = Monster::skeleton();
        skeleton.take_damage(15);
        assert_eq!(skeleton.health(), 25);
        skeleton.take_damage(100);
        assert_eq!(skeleton.health(), 0);
        assert!(!skeleton.is_alive());
    }

    #[test]
    fn test_attack_target() {
        let mut hero = Character::new("Hero", 100, 10, 5).unwrap();
        let goblin = Monster::goblin();

        let outcome = goblin.attack_target(&mut hero).unwrap();
        assert_eq!(outcome.damage, 3);
        assert_eq!(hero.health(), 97);
    }

    #[test]
    fn test_attack_without_effect() {
        let mut hero = Character::new("Tank", 100, 10, 50).unwrap();
        let outcome = Monster::dragon().attack_target(&mut hero).unwrap();
        assert!(!outcome.landed());
        assert_eq!(hero.health(), 100);
    }

    #[test]
    fn test_attack_can_defeat() {
        let mut hero = Character::new("Hero", 5, 10, 0).unwrap();
        let err = Monster::dragon().attack_target(&mut hero).unwrap_err();
        assert!(matches!(err, GameError::Defeated(ref name) if name == "Hero"));
        assert_eq!(hero.health(), 0);
    }

    #[test]
    fn test_experience_reward_saturates() {
        let titan = Monster::with_stats(MonsterKind::Goblin, "Titan", 10, i32::MAX, 0).unwrap();
        assert_eq!(titan.experience_reward(), u32::MAX);
    }

    #[test]
    fn test_record() {
        let goblin = Monster::goblin();
        assert_eq!(goblin.to_record(), vec!["Goblin", "Goblin", "30", "8", "3"]);

        let parsed = Monster::from_record(&["Troll", "Big Tom", "90", "15", "6"], 1)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.kind(), MonsterKind::Troll);
        assert_eq!(parsed.name(), "Big Tom");

        assert!(Monster::from_record(&["Goblin", "Goblin", "30", "8"], 4).is_err());
        assert!(Monster::from_record(&["Goblin", "Goblin", "x", "8", "3"], 4).is_err());
        assert!(Monster::from_record(&["Wyvern", "W", "1", "1", "1"], 4).unwrap().is_none());
    }

    #[test]
    fn test_records_keep_commas_in_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monsters.csv");
        let monsters = vec![
            Monster::with_stats(MonsterKind::Orc, "Grub, the Loud", 60, 12, 4).unwrap(),
            Monster::dragon(),
        ];

        write_records(&path, &monsters).unwrap();
        let loaded = read_records::<Monster>(&path, 1).unwrap().into_values();
        assert_eq!(loaded, monsters);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("dragon".parse::<MonsterKind>().unwrap(), MonsterKind::Dragon);
        assert!("hydra".parse::<MonsterKind>().is_err());
        assert_eq!(MonsterKind::ALL.len(), 6);
    }
}
