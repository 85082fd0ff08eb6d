// 🎬 Demos - short scripted walkthroughs, one per lab
//
// Each lab writes its transcript to any `Write`, so the binary prints to
// stdout and tests read the bytes back.

use rand::Rng;
use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::entities::{AttackStyle, Combatant, RosterEntry, Weapon};
use crate::error::GameResult;
use crate::inventory::{Inventory, Item};
use crate::manager::GameManager;
use crate::queue::Queue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Lab {
    /// Heal and damage clamping on a plain stat block
    Basics,
    /// Player, Enemy and Boss records
    Hierarchy,
    /// Critical, poison and fire bonuses
    Styles,
    /// Creation and destruction messages
    Lifecycle,
    /// Weapon `+` and `>`
    Weapons,
    /// Mixed entities and an item inventory
    Inventory,
    /// GameManager and Queue
    Manager,
    /// GameManager and Queue misuse reported as errors
    GuardedManager,
    /// GameManager save and load
    Persistence,
}

impl Lab {
    pub const ALL: [Lab; 9] = [
        Lab::Basics,
        Lab::Hierarchy,
        Lab::Styles,
        Lab::Lifecycle,
        Lab::Weapons,
        Lab::Inventory,
        Lab::Manager,
        Lab::GuardedManager,
        Lab::Persistence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lab::Basics => "basics",
            Lab::Hierarchy => "hierarchy",
            Lab::Styles => "styles",
            Lab::Lifecycle => "lifecycle",
            Lab::Weapons => "weapons",
            Lab::Inventory => "inventory",
            Lab::Manager => "manager",
            Lab::GuardedManager => "guarded-manager",
            Lab::Persistence => "persistence",
        }
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run one lab; `roster_path` is only touched by the persistence lab
pub fn run_lab(lab: Lab, out: &mut impl Write, rng: &mut impl Rng, roster_path: &Path) -> GameResult<()> {
    tracing::debug!(%lab, "running lab");
    match lab {
        Lab::Basics => basics(out, rng),
        Lab::Hierarchy => hierarchy(out),
        Lab::Styles => styles(out, rng),
        Lab::Lifecycle => lifecycle(out),
        Lab::Weapons => weapons(out),
        Lab::Inventory => inventory(out),
        Lab::Manager => manager(out),
        Lab::GuardedManager => guarded_manager(out),
        Lab::Persistence => persistence(out, roster_path),
    }
}

// ============================================================================
// LABS
// ============================================================================

fn basics(out: &mut impl Write, rng: &mut impl Rng) -> GameResult<()> {
    let mut hero = Combatant::new("Hero", 100, 20, 10, AttackStyle::Plain)?;
    let mut goblin = Combatant::new("Goblin", 50, 15, 5, AttackStyle::Plain)?;

    writeln!(out, "{}", hero)?;
    writeln!(out, "{}", goblin)?;

    let outcome = hero.strike(&mut goblin, rng);
    writeln!(out, "{}", outcome)?;
    writeln!(out, "{}", goblin)?;

    goblin.take_damage(10);
    writeln!(out, "{} took 10 damage! HP: {}", goblin.name(), goblin.health())?;

    hero.take_damage(30);
    let healed = hero.heal(50);
    writeln!(out, "{} healed for {} HP! HP: {}", hero.name(), healed, hero.health())?;
    Ok(())
}

fn hierarchy(out: &mut impl Write) -> GameResult<()> {
    let entries = [
        RosterEntry::player("Hero", 100, 1, 50),
        RosterEntry::enemy("Goblin", 50, 1, "Melee"),
        RosterEntry::boss("Dragon", 200, 10, "Fire", "Fire Breath"),
    ];
    for entry in &entries {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

fn styles(out: &mut impl Write, rng: &mut impl Rng) -> GameResult<()> {
    let mut hero = Combatant::hero("Hero", 100, 20, 10)?;
    let mut goblin = Combatant::beast("Goblin", 50, 15, 5)?;
    let dragon = Combatant::boss("Dragon", 200, 30, 20, "Fire Breath")?;

    writeln!(out, "=== Initial Status ===")?;
    for fighter in [&hero, &goblin, &dragon] {
        writeln!(out, "{}", fighter)?;
    }

    writeln!(out, "\n=== Combat ===")?;
    writeln!(out, "{}", hero.strike(&mut goblin, rng))?;
    writeln!(out, "{}", goblin.strike(&mut hero, rng))?;
    writeln!(out, "{}", dragon.strike(&mut hero, rng))?;

    writeln!(out, "\n=== Healing ===")?;
    let healed = hero.heal(20);
    writeln!(out, "{} heals for {} HP!", hero.name(), healed)?;

    writeln!(out, "\n=== Final Status ===")?;
    for fighter in [&hero, &goblin, &dragon] {
        writeln!(out, "{}", fighter)?;
    }
    Ok(())
}

/// Records its own creation and destruction
struct Tracked<'a> {
    kind: &'static str,
    name: String,
    log: &'a RefCell<Vec<String>>,
}

impl<'a> Tracked<'a> {
    fn new(kind: &'static str, name: &str, log: &'a RefCell<Vec<String>>) -> Self {
        log.borrow_mut().push(format!("{} {} created.", kind, name));
        Tracked {
            kind,
            name: name.to_string(),
            log,
        }
    }
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.log
            .borrow_mut()
            .push(format!("{} {} destroyed.", self.kind, self.name));
    }
}

fn lifecycle(out: &mut impl Write) -> GameResult<()> {
    let log = RefCell::new(Vec::new());
    {
        let sword = Weapon::new("Sword", 25, 3.5);
        let _sword = Tracked::new("Weapon", &sword.name, &log);
        let bow = Weapon::new("Bow", 15, 1.2);
        let _bow = Tracked::new("Weapon", &bow.name, &log);

        let orc = Combatant::beast("Orc", 60, 12, 4)?;
        let _orc_base = Tracked::new("Character", orc.name(), &log);
        let _orc = Tracked::new("Monster", orc.name(), &log);

        log.borrow_mut().push(sword.details());
        log.borrow_mut().push(bow.details());
        log.borrow_mut().push(orc.to_string());
    }

    for line in log.into_inner() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn weapons(out: &mut impl Write) -> GameResult<()> {
    let hero1 = Combatant::hero("Hero", 100, 20, 10)?;
    let hero2 = Combatant::hero("Hero", 100, 20, 10)?;
    let hero3 = Combatant::hero("Warrior", 150, 25, 15)?;

    if hero1 == hero2 {
        writeln!(out, "Hero1 and Hero2 are the same!")?;
    }
    if hero1 != hero3 {
        writeln!(out, "Hero1 and Hero3 are different!")?;
    }
    writeln!(out, "{}", hero1)?;

    let sword = Weapon::new("Sword", 50, 3.5);
    let bow = Weapon::new("Bow", 30, 1.2);
    let axe = Weapon::new("Axe", 60, 4.0);

    let combined = &sword + &bow;
    writeln!(out, "{}", combined)?;

    if axe > sword {
        writeln!(out, "{} is stronger than {}", axe.name, sword.name)?;
    } else {
        writeln!(out, "{} is not stronger than {}", axe.name, sword.name)?;
    }

    if bow > combined {
        writeln!(out, "{} is stronger than combined weapon", bow.name)?;
    } else {
        writeln!(out, "Combined weapon is stronger than {}", bow.name)?;
    }
    Ok(())
}

fn inventory(out: &mut impl Write) -> GameResult<()> {
    let entities = [
        RosterEntry::player("Hero", 100, 1, 0),
        RosterEntry::enemy("Goblin", 50, 1, "Goblin"),
    ];
    for entity in &entities {
        writeln!(out, "{}", entity)?;
    }

    let mut inventory = Inventory::new();
    inventory.add_item(Item::weapon("Sword", "A trusty blade", 3));
    inventory.add_item(Item::potion("Health Potion", "Restores 30 HP", 30));
    inventory.add_item(Item::weapon("Shield", "Better than nothing", 1));
    writeln!(out, "{}", inventory.render())?;
    Ok(())
}

fn write_queue<T: fmt::Display>(out: &mut impl Write, queue: &Queue<T>) -> GameResult<()> {
    writeln!(out, "{}", queue.render()?)?;
    Ok(())
}

fn manager(out: &mut impl Write) -> GameResult<()> {
    let mut manager = GameManager::new();
    manager.add_entity(RosterEntry::player("Hero", 100, 1, 0))?;
    manager.add_entity(RosterEntry::enemy("Goblin", 50, 1, "Goblin"))?;
    writeln!(out, "GameManager output:")?;
    for line in manager.display_all() {
        writeln!(out, "{}", line)?;
    }

    let mut numbers: Queue<i32> = [10, 20, 30].into_iter().collect();
    writeln!(out, "\nInteger Queue:")?;
    write_queue(out, &numbers)?;
    numbers.pop()?;
    writeln!(out, "After pop:")?;
    write_queue(out, &numbers)?;

    let mut words: Queue<String> = ["Hello", "World", "Rust"].into_iter().map(String::from).collect();
    writeln!(out, "\nString Queue:")?;
    write_queue(out, &words)?;
    words.pop()?;
    writeln!(out, "After pop:")?;
    write_queue(out, &words)?;
    Ok(())
}

fn guarded_manager(out: &mut impl Write) -> GameResult<()> {
    let mut manager = GameManager::new();
    manager.add_entity(RosterEntry::player("Hero", 100, 1, 0))?;
    manager.add_entity(RosterEntry::enemy("Goblin", 50, 1, "Goblin"))?;
    if let Err(e) = manager.add_entity(RosterEntry::player("Invalid", -50, 1, 0)) {
        writeln!(out, "GameManager error: {}", e)?;
    }

    let mut numbers: Queue<i32> = [10, 20].into_iter().collect();
    write_queue(out, &numbers)?;
    for _ in 0..3 {
        if let Err(e) = numbers.pop() {
            writeln!(out, "Queue error: {}", e)?;
        }
    }

    let words: Queue<String> = Queue::new();
    if let Err(e) = words.render() {
        writeln!(out, "Queue error: {}", e)?;
    }
    Ok(())
}

fn persistence(out: &mut impl Write, roster_path: &Path) -> GameResult<()> {
    let mut manager = GameManager::new();
    manager.add_entity(RosterEntry::player("Hero", 100, 1, 0))?;
    manager.add_entity(RosterEntry::enemy("Goblin", 30, 1, "Normal"))?;
    manager.add_entity(RosterEntry::player("Mage", 80, 2, 150))?;
    manager.add_entity(RosterEntry::enemy("Dragon", 200, 5, "Boss"))?;

    writeln!(out, "Original characters:")?;
    for line in manager.display_all() {
        writeln!(out, "{}", line)?;
    }

    manager.save_to_file(roster_path)?;
    writeln!(out, "\nCharacters saved to {}.\n", roster_path.display())?;

    let mut loaded = GameManager::<RosterEntry>::new();
    loaded.load_from_file(roster_path)?;
    writeln!(out, "Loaded characters:")?;
    for line in loaded.display_all() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transcript(lab: Lab, roster_path: &Path) -> String {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(3);
        run_lab(lab, &mut out, &mut rng, roster_path).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_every_lab_runs() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("game_save.txt");
        for lab in Lab::ALL {
            assert!(!transcript(lab, &roster).is_empty(), "{} printed nothing", lab);
        }
    }

    #[test]
    fn test_basics_clamps() {
        let out = transcript(Lab::Basics, Path::new("unused"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "Hero attacks Goblin for 15 damage!");
        assert_eq!(lines[3], "Entity: Goblin, HP: 35, Attack: 15, Defense: 5");
        assert_eq!(lines[4], "Goblin took 10 damage! HP: 25");
        assert_eq!(lines[5], "Hero healed for 30 HP! HP: 100");
    }

    #[test]
    fn test_lifecycle_order() {
        let out = transcript(Lab::Lifecycle, Path::new("unused"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Weapon Sword created.");
        assert_eq!(lines[4], "Weapon: Sword, Damage: 25, Weight: 3.5kg");
        assert_eq!(
            &lines[lines.len() - 4..],
            &[
                "Monster Orc destroyed.",
                "Character Orc destroyed.",
                "Weapon Bow destroyed.",
                "Weapon Sword destroyed.",
            ]
        );
    }

    #[test]
    fn test_weapons() {
        let out = transcript(Lab::Weapons, Path::new("unused"));
        assert!(out.contains("Hero1 and Hero2 are the same!"));
        assert!(out.contains("Hero1 and Hero3 are different!"));
        assert!(out.contains("Weapon: Sword + Bow, Damage: 80"));
        assert!(out.contains("Axe is stronger than Sword"));
        assert!(out.contains("Combined weapon is stronger than Bow"));
    }

    #[test]
    fn test_manager_and_queues() {
        let out = transcript(Lab::Manager, Path::new("unused"));
        assert!(out.contains("Integer Queue:\n10 20 30\nAfter pop:\n20 30\n"));
        assert!(out.contains("String Queue:\nHello World Rust\nAfter pop:\nWorld Rust\n"));
    }

    #[test]
    fn test_guarded_manager_reports_errors() {
        let out = transcript(Lab::GuardedManager, Path::new("unused"));
        assert!(out.contains("GameManager error: Invalid argument: Invalid has invalid health (HP <= 0)"));
        assert_eq!(out.matches("Queue error: Queue is empty").count(), 2);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("game_save.txt");
        let out = transcript(Lab::Persistence, &roster);

        let (original, loaded) = out.split_once("Loaded characters:").unwrap();
        let original: Vec<&str> = original.lines().skip(1).take(4).collect();
        let loaded: Vec<&str> = loaded.lines().skip(1).collect();
        assert_eq!(original, loaded);
        assert!(roster.exists());
    }
}
