// 🧙 Character - the campaign hero
//
// Levels up every 100 experience, carries an inventory, and is saved as
// seven plain lines plus a companion `<save>_inventory` file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use super::combatant::AttackOutcome;
use super::monster::Monster;
use crate::config::inventory_path_for;
use crate::error::{parse_field, GameError, GameResult};
use crate::inventory::{Inventory, Item};

/// Experience needed for one level
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    name: String,
    health: i32,
    max_health: i32,
    attack: i32,
    defense: i32,
    level: u32,
    experience: u32,
    inventory: Inventory,
}

impl Character {
    pub fn new(name: impl Into<String>, health: i32, attack: i32, defense: i32) -> GameResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument("character name cannot be empty".to_string()));
        }
        if health < 1 {
            return Err(GameError::InvalidArgument(format!("{}: health must be positive", name)));
        }
        if attack < 0 || defense < 0 {
            return Err(GameError::InvalidArgument(format!(
                "{}: attack and defense cannot be negative",
                name
            )));
        }

        Ok(Character {
            name,
            health,
            max_health: health,
            attack,
            defense,
            level: 1,
            experience: 0,
            inventory: Inventory::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn add_to_inventory(&mut self, item: Item) {
        self.inventory.add_item(item);
    }

    pub fn attack_enemy(&self, enemy: &mut Monster) -> AttackOutcome {
        let damage = self.attack - enemy.defense();
        let mut outcome = AttackOutcome {
            attacker: self.name.clone(),
            target: enemy.name().to_string(),
            damage: 0,
            bonus: None,
        };
        if damage > 0 {
            enemy.take_damage(damage);
            outcome.damage = damage;
        }
        outcome
    }

    /// Health is clamped at zero; reaching zero is reported as Defeated
    pub fn take_damage(&mut self, damage: i32) -> GameResult<()> {
        self.health = (self.health - damage.max(0)).max(0);
        if self.health == 0 {
            return Err(GameError::Defeated(self.name.clone()));
        }
        Ok(())
    }

    /// Returns the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount.max(0)).min(self.max_health);
        self.health - before
    }

    /// Add experience; returns how many levels were gained
    pub fn gain_experience(&mut self, exp: u32) -> u32 {
        self.experience = self.experience.saturating_add(exp);

        let mut gained = 0;
        while self.experience >= EXPERIENCE_PER_LEVEL {
            self.experience -= EXPERIENCE_PER_LEVEL;
            self.level += 1;
            self.max_health = self.max_health.saturating_add(10);
            self.health = self.max_health;
            self.attack = self.attack.saturating_add(2);
            self.defense = self.defense.saturating_add(1);
            gained += 1;
            tracing::info!(hero = %self.name, level = self.level, "level up");
        }
        gained
    }

    /// Drink a potion (consumed) or equip a weapon (kept, once)
    pub fn use_item(&mut self, item_name: &str) -> GameResult<String> {
        let item = self
            .inventory
            .get_item_mut(item_name)
            .ok_or_else(|| GameError::ItemNotFound(item_name.to_string()))?;

        match item {
            Item::Potion { heal_amount, .. } => {
                let amount = *heal_amount;
                self.inventory.remove_item(item_name)?;
                self.heal(amount);
                Ok(format!("{} heals for {} HP!", self.name, amount))
            }
            Item::Weapon {
                name,
                attack_bonus,
                equipped,
                ..
            } => {
                if *equipped {
                    return Err(GameError::AlreadyEquipped(name.clone()));
                }
                *equipped = true;
                let line = format!("Equipped {}! Attack increased by {}", name, attack_bonus);
                self.attack = self.attack.saturating_add(*attack_bonus);
                Ok(line)
            }
        }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Seven lines: name, health, max health, attack, defense, level, experience
    pub fn save_game(&self, path: impl AsRef<Path>) -> GameResult<()> {
        let path = path.as_ref();
        let content = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.name,
            self.health,
            self.max_health,
            self.attack,
            self.defense,
            self.level,
            self.experience
        );
        fs::write(path, content)?;
        self.inventory.save_to_file(inventory_path_for(path))?;

        tracing::info!(hero = %self.name, path = ?path, "character saved");
        Ok(())
    }

    /// Replace this character with the saved one; untouched on error
    pub fn load_game(&mut self, path: impl AsRef<Path>) -> GameResult<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() < 7 {
            return Err(GameError::invalid_data(
                lines.len() + 1,
                "save file is truncated",
            ));
        }

        let name = lines[0].to_string();
        if name.trim().is_empty() {
            return Err(GameError::invalid_data(1, "empty name"));
        }

        let mut inventory = Inventory::new();
        inventory.load_from_file(inventory_path_for(path))?;

        let loaded = Character {
            name,
            health: parse_field(lines[1], "health", 2)?,
            max_health: parse_field(lines[2], "max health", 3)?,
            attack: parse_field(lines[3], "attack", 4)?,
            defense: parse_field(lines[4], "defense", 5)?,
            level: parse_field(lines[5], "level", 6)?,
            experience: parse_field(lines[6], "experience", 7)?,
            inventory,
        };
        if loaded.health < 0 || loaded.health > loaded.max_health {
            return Err(GameError::invalid_data(2, "health must be between 0 and max health"));
        }
        if loaded.max_health < 1 {
            return Err(GameError::invalid_data(3, "max health must be positive"));
        }
        if loaded.attack < 0 {
            return Err(GameError::invalid_data(4, "attack cannot be negative"));
        }
        if loaded.defense < 0 {
            return Err(GameError::invalid_data(5, "defense cannot be negative"));
        }
        if loaded.level < 1 {
            return Err(GameError::invalid_data(6, "level must be at least 1"));
        }

        *self = loaded;
        tracing::info!(hero = %self.name, path = ?path, "character loaded");
        Ok(())
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, HP: {}/{}, ATK: {}, DEF: {}, LVL: {}, EXP: {}/{}",
            self.name,
            self.health,
            self.max_health,
            self.attack,
            self.defense,
            self.level,
            self.experience,
            EXPERIENCE_PER_LEVEL
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Character {
        let mut hero = Character::new("Hero", 100, 10, 5).unwrap();
        hero.add_to_inventory(Item::weapon("Steel Sword", "A sharp steel sword", 5));
        hero.add_to_inventory(Item::potion("Health Potion", "Restores 30 HP", 30));
        hero
    }

    #[test]
    fn test_new_character() {
        let hero = hero();
        assert_eq!(hero.level(), 1);
        assert_eq!(hero.experience(), 0);
        assert_eq!(hero.health(), hero.max_health());
        assert_eq!(
            hero.to_string(),
            "Name: Hero, HP: 100/100, ATK: 10, DEF: 5, LVL: 1, EXP: 0/100"
        );

        assert!(Character::new(" ", 100, 10, 5).is_err());
        assert!(Character::new("Ghost", 0, 10, 5).is_err());
    }

    #[test]
    fn test_attack_enemy() {
        let hero = hero();
        let mut goblin = Monster::goblin();
        let outcome = hero.attack_enemy(&mut goblin);
        assert_eq!(outcome.damage, 7);
        assert_eq!(goblin.health(), 23);
        assert_eq!(outcome.to_string(), "Hero attacks Goblin for 7 damage!");

        let mut dragon = Monster::dragon();
        let outcome = hero.attack_enemy(&mut dragon);
        assert!(!outcome.landed());
        assert_eq!(dragon.health(), 100);
    }

    #[test]
    fn test_damage_and_defeat() {
        let mut hero = hero();
        hero.take_damage(40).unwrap();
        assert_eq!(hero.health(), 60);

        let err = hero.take_damage(500).unwrap_err();
        assert!(matches!(err, GameError::Defeated(_)));
        assert_eq!(hero.health(), 0);
        assert!(!hero.is_alive());
    }

    #[test]
    fn test_heal_clamps() {
        let mut hero = hero();
        hero.take_damage(10).unwrap();
        assert_eq!(hero.heal(30), 10);
        assert_eq!(hero.health(), 100);
    }

    #[test]
    fn test_huge_potion_is_clamped() {
        let mut hero = hero();
        hero.take_damage(10).unwrap();
        hero.add_to_inventory(Item::potion("Elixir", "Bottomless", i32::MAX));

        hero.use_item("Elixir").unwrap();
        assert_eq!(hero.health(), 100);
        assert!(hero.inventory().get_item("Elixir").is_none());
    }

    #[test]
    fn test_level_up() {
        let mut hero = hero();
        hero.take_damage(50).unwrap();

        assert_eq!(hero.gain_experience(40), 0);
        assert_eq!(hero.experience(), 40);

        assert_eq!(hero.gain_experience(70), 1);
        assert_eq!(hero.level(), 2);
        assert_eq!(hero.experience(), 10);
        assert_eq!(hero.max_health(), 110);
        assert_eq!(hero.health(), 110);
        assert_eq!(hero.attack(), 12);
        assert_eq!(hero.defense(), 6);
    }

    #[test]
    fn test_multi_level_up() {
        let mut hero = hero();
        assert_eq!(hero.gain_experience(250), 2);
        assert_eq!(hero.level(), 3);
        assert_eq!(hero.experience(), 50);
        assert_eq!(hero.max_health(), 120);
    }

    #[test]
    fn test_use_potion() {
        let mut hero = hero();
        hero.take_damage(50).unwrap();

        let line = hero.use_item("Health Potion").unwrap();
        assert_eq!(line, "Hero heals for 30 HP!");
        assert_eq!(hero.health(), 80);
        assert!(hero.inventory().get_item("Health Potion").is_none());
    }

    #[test]
    fn test_equip_weapon_once() {
        let mut hero = hero();
        let line = hero.use_item("Steel Sword").unwrap();
        assert_eq!(line, "Equipped Steel Sword! Attack increased by 5");
        assert_eq!(hero.attack(), 15);
        assert!(hero.inventory().get_item("Steel Sword").is_some());

        let err = hero.use_item("Steel Sword").unwrap_err();
        assert!(matches!(err, GameError::AlreadyEquipped(_)));
        assert_eq!(hero.attack(), 15);
    }

    #[test]
    fn test_use_missing_item() {
        let mut hero = hero();
        let err = hero.use_item("Shield").unwrap_err();
        assert!(matches!(err, GameError::ItemNotFound(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savegame.txt");

        let mut hero = hero();
        hero.use_item("Steel Sword").unwrap();
        hero.gain_experience(130);
        hero.take_damage(20).unwrap();
        hero.save_game(&path).unwrap();

        assert!(dir.path().join("savegame.txt_inventory").exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Hero\n90\n110\n17\n6\n2\n30\n");

        let mut loaded = Character::new("Someone", 1, 0, 0).unwrap();
        loaded.load_game(&path).unwrap();
        assert_eq!(loaded, hero);
    }

    #[test]
    fn test_load_bad_file_leaves_character_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savegame.txt");
        fs::write(&path, "Hero\n90\nlots\n17\n6\n2\n30\n").unwrap();
        fs::write(dir.path().join("savegame.txt_inventory"), "").unwrap();

        let mut hero = hero();
        let before = hero.clone();
        let err = hero.load_game(&path).unwrap_err();
        assert!(matches!(err, GameError::InvalidData { line: 3, .. }));
        assert_eq!(hero, before);

        fs::write(&path, "Hero\n90\n").unwrap();
        assert!(hero.load_game(&path).is_err());

        let missing = dir.path().join("nothing.txt");
        assert!(matches!(hero.load_game(&missing), Err(GameError::Io(_))));
    }

    #[test]
    fn test_load_rejects_impossible_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savegame.txt");
        fs::write(dir.path().join("savegame.txt_inventory"), "").unwrap();

        let cases = [
            ("Hero\n-40\n100\n3\n5\n1\n0\n", 2),
            ("Hero\n0\n0\n3\n5\n1\n0\n", 3),
            ("Hero\n40\n100\n-3\n5\n1\n0\n", 4),
            ("Hero\n40\n100\n3\n-5\n1\n0\n", 5),
            ("Hero\n40\n100\n3\n5\n0\n0\n", 6),
        ];
        let mut hero = hero();
        let before = hero.clone();
        for (content, bad_line) in cases {
            fs::write(&path, content).unwrap();
            let err = hero.load_game(&path).unwrap_err();
            assert!(
                matches!(err, GameError::InvalidData { line, .. } if line == bad_line),
                "{:?} for {:?}",
                err,
                content
            );
        }
        assert_eq!(hero, before);

        // A defeated hero may still be saved and loaded
        fs::write(&path, "Hero\n0\n100\n3\n5\n1\n0\n").unwrap();
        hero.load_game(&path).unwrap();
        assert!(!hero.is_alive());
    }
}
