// 🗡️ Battle - turn-based fight between the campaign hero and one monster
//
// Flow per turn:
// 1. Player acts (attack or use an item)
// 2. If the monster died → Victory, experience is awarded
// 3. Otherwise the monster strikes back → Defeat or Continue
//
// A failed item use is reported as an error and costs no turn.

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

use crate::config::Config;
use crate::entities::{AttackOutcome, Character, Monster};
use crate::error::{GameError, GameResult};
use crate::inventory::Item;
use crate::journal::Journal;

// ============================================================================
// TURN TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    UseItem(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Victory { experience: u32, levels_gained: u32 },
    Defeat,
    Continue,
}

/// Something that happened during a turn, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    Hit(AttackOutcome),
    ItemUsed(String),
    /// The monster's attack line ("Dragon breathes fire!")
    Taunt(&'static str),
    MonsterDefeated { monster: String, experience: u32 },
    LevelUp { hero: String, level: u32 },
    HeroDefeated(String),
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::Hit(outcome) => write!(f, "{}", outcome),
            BattleEvent::ItemUsed(line) => f.write_str(line),
            BattleEvent::Taunt(line) => f.write_str(line),
            BattleEvent::MonsterDefeated {
                monster,
                experience,
            } => write!(f, "{} defeated! Gained {} EXP.", monster, experience),
            BattleEvent::LevelUp { hero, level } => {
                write!(f, "{} leveled up to level {}!", hero, level)
            }
            BattleEvent::HeroDefeated(hero) => write!(f, "{} has been defeated!", hero),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub outcome: TurnOutcome,
    pub events: Vec<BattleEvent>,
}

// ============================================================================
// BATTLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Battle {
    monster: Monster,
    turns: u32,
}

impl Battle {
    pub fn new(monster: Monster) -> Self {
        Battle { monster, turns: 0 }
    }

    pub fn monster(&self) -> &Monster {
        &self.monster
    }

    /// Completed turns, failed item uses excluded
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn player_turn(&mut self, hero: &mut Character, action: PlayerAction) -> GameResult<Turn> {
        if !hero.is_alive() || !self.monster.is_alive() {
            return Err(GameError::InvalidArgument("battle is already over".to_string()));
        }

        let mut events = Vec::new();
        match action {
            PlayerAction::Attack => {
                events.push(BattleEvent::Hit(hero.attack_enemy(&mut self.monster)));
            }
            PlayerAction::UseItem(name) => {
                events.push(BattleEvent::ItemUsed(hero.use_item(&name)?));
            }
        }
        self.turns += 1;

        if !self.monster.is_alive() {
            let experience = self.monster.experience_reward();
            let levels_gained = hero.gain_experience(experience);
            events.push(BattleEvent::MonsterDefeated {
                monster: self.monster.name().to_string(),
                experience,
            });
            if levels_gained > 0 {
                events.push(BattleEvent::LevelUp {
                    hero: hero.name().to_string(),
                    level: hero.level(),
                });
            }
            tracing::info!(monster = self.monster.name(), experience, "monster defeated");
            return Ok(Turn {
                outcome: TurnOutcome::Victory {
                    experience,
                    levels_gained,
                },
                events,
            });
        }

        events.push(BattleEvent::Taunt(self.monster.kind().attack_flavor()));
        let outcome = match self.monster.attack_target(hero) {
            Ok(hit) => {
                events.push(BattleEvent::Hit(hit));
                TurnOutcome::Continue
            }
            Err(GameError::Defeated(name)) => {
                tracing::info!(hero = %name, monster = self.monster.name(), "hero defeated");
                events.push(BattleEvent::HeroDefeated(name));
                TurnOutcome::Defeat
            }
            Err(e) => return Err(e),
        };

        Ok(Turn { outcome, events })
    }
}

// ============================================================================
// TURN SOURCES
// ============================================================================

/// Where a campaign gets the player's decisions from
pub trait TurnSource {
    /// None means the player walked away from the fight
    fn next_action(&mut self, hero: &Character, battle: &Battle) -> Option<PlayerAction>;

    /// A line of battle narration
    fn report(&mut self, line: &str);
}

/// Pre-recorded actions; narration is kept for inspection
#[derive(Debug, Default)]
pub struct ScriptedTurns {
    actions: VecDeque<PlayerAction>,
    pub transcript: Vec<String>,
}

impl ScriptedTurns {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        ScriptedTurns {
            actions: actions.into_iter().collect(),
            transcript: Vec::new(),
        }
    }
}

impl TurnSource for ScriptedTurns {
    fn next_action(&mut self, _hero: &Character, _battle: &Battle) -> Option<PlayerAction> {
        self.actions.pop_front()
    }

    fn report(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }
}

// ============================================================================
// CAMPAIGN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleResult {
    Won { experience: u32, levels_gained: u32 },
    /// Input ran out before the fight was decided
    Abandoned,
}

/// One play session: the hero, the journal and where saves go
pub struct Campaign {
    hero: Character,
    journal: Journal<String>,
    save_path: PathBuf,
}

impl Campaign {
    pub fn new(name: &str, config: &Config) -> GameResult<Self> {
        let journal = Journal::open(&config.journal_path)?;
        Self::with_journal(name, journal, config.save_path.clone())
    }

    /// Fresh hero (100 HP, 10 ATK, 5 DEF) with a sword and a potion
    pub fn with_journal(name: &str, journal: Journal<String>, save_path: PathBuf) -> GameResult<Self> {
        let mut hero = Character::new(name, 100, 10, 5)?;
        hero.add_to_inventory(Item::weapon("Steel Sword", "A sharp steel sword", 5));
        hero.add_to_inventory(Item::potion("Health Potion", "Restores 30 HP", 30));

        let mut campaign = Campaign {
            hero,
            journal,
            save_path,
        };
        campaign.record(format!("Game started with player: {}", name))?;
        Ok(campaign)
    }

    pub fn hero(&self) -> &Character {
        &self.hero
    }

    pub fn journal(&self) -> &Journal<String> {
        &self.journal
    }

    fn record(&mut self, message: String) -> GameResult<()> {
        self.journal.log(&message)
    }

    /// Fight until someone drops. Err(Defeated) when the hero loses.
    pub fn start_battle(&mut self, monster: Monster, input: &mut impl TurnSource) -> GameResult<BattleResult> {
        self.record(format!(
            "Battle started between {} and {}",
            self.hero.name(),
            monster.name()
        ))?;
        tracing::info!(hero = self.hero.name(), monster = monster.name(), "battle started");

        let mut battle = Battle::new(monster);
        input.report("=== BATTLE START ===");
        input.report(&self.hero.to_string());
        input.report(&battle.monster().to_string());

        loop {
            let Some(action) = input.next_action(&self.hero, &battle) else {
                self.record(format!("Battle with {} abandoned", battle.monster().name()))?;
                return Ok(BattleResult::Abandoned);
            };

            let turn = match battle.player_turn(&mut self.hero, action) {
                Ok(turn) => turn,
                Err(e) => {
                    input.report(&format!("Error: {}", e));
                    continue;
                }
            };

            for event in &turn.events {
                input.report(&event.to_string());
                self.record(event.to_string())?;
            }

            match turn.outcome {
                TurnOutcome::Victory {
                    experience,
                    levels_gained,
                } => {
                    self.record(format!(
                        "{} defeated {} and gained {} EXP",
                        self.hero.name(),
                        battle.monster().name(),
                        experience
                    ))?;
                    return Ok(BattleResult::Won {
                        experience,
                        levels_gained,
                    });
                }
                TurnOutcome::Defeat => {
                    let err = GameError::Defeated(self.hero.name().to_string());
                    self.record(format!("Battle ended: {}", err))?;
                    return Err(err);
                }
                TurnOutcome::Continue => {
                    input.report("Current status:");
                    input.report(&self.hero.to_string());
                    input.report(&battle.monster().to_string());
                }
            }
        }
    }

    pub fn save(&mut self) -> GameResult<()> {
        match self.hero.save_game(&self.save_path) {
            Ok(()) => self.record("Game saved successfully".to_string()),
            Err(e) => {
                self.record(format!("Save failed: {}", e))?;
                Err(e)
            }
        }
    }

    pub fn load(&mut self) -> GameResult<()> {
        match self.hero.load_game(&self.save_path) {
            Ok(()) => self.record("Game loaded successfully".to_string()),
            Err(e) => {
                self.record(format!("Load failed: {}", e))?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MonsterKind;
    use std::fs;

    fn hero() -> Character {
        let mut hero = Character::new("Hero", 100, 10, 5).unwrap();
        hero.add_to_inventory(Item::weapon("Steel Sword", "A sharp steel sword", 5));
        hero.add_to_inventory(Item::potion("Health Potion", "Restores 30 HP", 30));
        hero
    }

    #[test]
    fn test_attack_turn_continues() {
        let mut hero = hero();
        let mut battle = Battle::new(Monster::goblin());

        let turn = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        assert_eq!(turn.outcome, TurnOutcome::Continue);
        assert_eq!(battle.monster().health(), 23);
        assert_eq!(hero.health(), 97);

        let lines: Vec<String> = turn.events.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Hero attacks Goblin for 7 damage!",
                "Goblin attacks with a crude club!",
                "Goblin attacks Hero for 3 damage!",
            ]
        );
    }

    #[test]
    fn test_victory_awards_experience() {
        let mut hero = hero();
        let mut battle = Battle::new(Monster::goblin());

        battle
            .player_turn(&mut hero, PlayerAction::UseItem("Steel Sword".to_string()))
            .unwrap();
        assert_eq!(hero.attack(), 15);
        battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        let turn = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();

        assert_eq!(
            turn.outcome,
            TurnOutcome::Victory {
                experience: 40,
                levels_gained: 0
            }
        );
        assert_eq!(hero.experience(), 40);
        assert_eq!(hero.health(), 91);
        assert_eq!(battle.turns(), 4);

        let err = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
    }

    #[test]
    fn test_victory_with_level_up() {
        let mut hero = hero();
        hero.gain_experience(70);
        let runt = Monster::with_stats(MonsterKind::Goblin, "Runt", 5, 8, 0).unwrap();
        let mut battle = Battle::new(runt);

        let turn = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        assert_eq!(
            turn.outcome,
            TurnOutcome::Victory {
                experience: 40,
                levels_gained: 1
            }
        );
        assert_eq!(turn.events.last().unwrap().to_string(), "Hero leveled up to level 2!");
    }

    #[test]
    fn test_defeat() {
        let mut hero = Character::new("Hero", 20, 10, 5).unwrap();
        let mut battle = Battle::new(Monster::dragon());

        let turn = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        assert_eq!(turn.outcome, TurnOutcome::Continue);
        assert_eq!(turn.events[0].to_string(), "Hero attacks Dragon, but it has no effect!");
        assert_eq!(hero.health(), 5);

        let turn = battle.player_turn(&mut hero, PlayerAction::Attack).unwrap();
        assert_eq!(turn.outcome, TurnOutcome::Defeat);
        assert_eq!(turn.events.last().unwrap().to_string(), "Hero has been defeated!");
        assert_eq!(hero.health(), 0);
    }

    #[test]
    fn test_failed_item_keeps_turn() {
        let mut hero = hero();
        let mut battle = Battle::new(Monster::skeleton());

        let err = battle
            .player_turn(&mut hero, PlayerAction::UseItem("Shield".to_string()))
            .unwrap_err();
        assert!(matches!(err, GameError::ItemNotFound(_)));
        assert_eq!(hero.health(), 100);
        assert_eq!(battle.monster().health(), 40);
        assert_eq!(battle.turns(), 0);
    }

    fn campaign(dir: &tempfile::TempDir) -> Campaign {
        let journal = Journal::open(dir.path().join("game_log.txt")).unwrap();
        Campaign::with_journal("Hero", journal, dir.path().join("savegame.txt")).unwrap()
    }

    #[test]
    fn test_campaign_battle_is_journaled() {
        let dir = tempfile::tempdir().unwrap();
        let mut campaign = campaign(&dir);

        let mut input = ScriptedTurns::new(
            std::iter::once(PlayerAction::UseItem("Shield".to_string()))
                .chain(std::iter::repeat(PlayerAction::Attack).take(10)),
        );
        let result = campaign.start_battle(Monster::goblin(), &mut input).unwrap();
        assert_eq!(
            result,
            BattleResult::Won {
                experience: 40,
                levels_gained: 0
            }
        );
        assert_eq!(input.transcript[0], "=== BATTLE START ===");
        assert!(input
            .transcript
            .contains(&"Error: Item not found in inventory: Shield".to_string()));

        let log = fs::read_to_string(dir.path().join("game_log.txt")).unwrap();
        assert!(log.contains(": Game started with player: Hero"));
        assert!(log.contains(": Battle started between Hero and Goblin"));
        assert!(log.contains(": Hero defeated Goblin and gained 40 EXP"));
    }

    #[test]
    fn test_campaign_abandon_and_defeat() {
        let dir = tempfile::tempdir().unwrap();
        let mut campaign = campaign(&dir);

        let mut input = ScriptedTurns::new(vec![PlayerAction::Attack]);
        let result = campaign.start_battle(Monster::dragon(), &mut input).unwrap();
        assert_eq!(result, BattleResult::Abandoned);
        assert_eq!(campaign.hero().health(), 85);

        let mut input = ScriptedTurns::new(std::iter::repeat(PlayerAction::Attack).take(20));
        let err = campaign.start_battle(Monster::dragon(), &mut input).unwrap_err();
        assert!(err.is_fatal());

        let log = fs::read_to_string(dir.path().join("game_log.txt")).unwrap();
        assert!(log.contains(": Battle ended: Hero has been defeated!"));
    }

    #[test]
    fn test_campaign_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut campaign = campaign(&dir);

        let err = campaign.load().unwrap_err();
        assert!(matches!(err, GameError::Io(_)));

        campaign.save().unwrap();
        let mut input = ScriptedTurns::new(std::iter::repeat(PlayerAction::Attack).take(10));
        campaign.start_battle(Monster::goblin(), &mut input).unwrap();
        assert_eq!(campaign.hero().experience(), 40);

        campaign.load().unwrap();
        assert_eq!(campaign.hero().experience(), 0);
        assert_eq!(campaign.hero().health(), 100);
        assert_eq!(campaign.hero().inventory().len(), 2);

        let log = fs::read_to_string(dir.path().join("game_log.txt")).unwrap();
        assert!(log.contains(": Load failed: "));
        assert!(log.contains(": Game saved successfully"));
        assert!(log.contains(": Game loaded successfully"));
    }
}
