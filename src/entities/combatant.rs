// ⚔️ Combatant - shared stat block for anything that fights
//
// Heroes, plain monsters and bosses differ only in how they attack:
// a hero may land a critical hit, a beast may poison, a boss may burn.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GameError, GameResult};

// ============================================================================
// ATTACK STYLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Damage = attack - defense, nothing else
    Plain,

    /// 20% chance to double the damage
    Hero,

    /// 30% chance of +5 poison damage
    Beast,

    /// 50% chance of +10 fire damage
    Boss { ability: String },
}

/// Extra effect rolled on top of base damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    Critical,
    Poison,
    Fire,
}

impl Bonus {
    pub fn label(&self) -> &'static str {
        match self {
            Bonus::Critical => "Critical hit!",
            Bonus::Poison => "Poisonous attack!",
            Bonus::Fire => "Fire attack!",
        }
    }
}

impl AttackStyle {
    /// Chance in percent and the bonus it grants
    fn bonus_roll(&self) -> Option<(u32, Bonus)> {
        match self {
            AttackStyle::Plain => None,
            AttackStyle::Hero => Some((20, Bonus::Critical)),
            AttackStyle::Beast => Some((30, Bonus::Poison)),
            AttackStyle::Boss { .. } => Some((50, Bonus::Fire)),
        }
    }

    fn apply(bonus: Bonus, damage: i32) -> i32 {
        match bonus {
            Bonus::Critical => damage.saturating_mul(2),
            Bonus::Poison => damage.saturating_add(5),
            Bonus::Fire => damage.saturating_add(10),
        }
    }
}

// ============================================================================
// ATTACK OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: String,
    pub target: String,
    /// Damage actually dealt; 0 when the attack bounced off
    pub damage: i32,
    pub bonus: Option<Bonus>,
}

impl AttackOutcome {
    pub fn landed(&self) -> bool {
        self.damage > 0
    }
}

impl fmt::Display for AttackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.landed() {
            return write!(f, "{} attacks {}, but it has no effect!", self.attacker, self.target);
        }
        if let Some(bonus) = self.bonus {
            write!(f, "{} ", bonus.label())?;
        }
        write!(f, "{} attacks {} for {} damage!", self.attacker, self.target, self.damage)
    }
}

// ============================================================================
// COMBATANT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    name: String,
    health: i32,
    max_health: i32,
    attack: i32,
    defense: i32,
    style: AttackStyle,
}

impl Combatant {
    /// Health starts full; `max_health` must be at least 1
    pub fn new(
        name: impl Into<String>,
        max_health: i32,
        attack: i32,
        defense: i32,
        style: AttackStyle,
    ) -> GameResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidArgument("name cannot be empty".to_string()));
        }
        if max_health < 1 {
            return Err(GameError::InvalidArgument(format!(
                "{}: max health must be positive",
                name
            )));
        }
        if attack < 0 || defense < 0 {
            return Err(GameError::InvalidArgument(format!(
                "{}: attack and defense cannot be negative",
                name
            )));
        }

        Ok(Combatant {
            name,
            health: max_health,
            max_health,
            attack,
            defense,
            style,
        })
    }

    pub fn hero(name: impl Into<String>, health: i32, attack: i32, defense: i32) -> GameResult<Self> {
        Self::new(name, health, attack, defense, AttackStyle::Hero)
    }

    pub fn beast(name: impl Into<String>, health: i32, attack: i32, defense: i32) -> GameResult<Self> {
        Self::new(name, health, attack, defense, AttackStyle::Beast)
    }

    pub fn boss(
        name: impl Into<String>,
        health: i32,
        attack: i32,
        defense: i32,
        ability: impl Into<String>,
    ) -> GameResult<Self> {
        Self::new(
            name,
            health,
            attack,
            defense,
            AttackStyle::Boss {
                ability: ability.into(),
            },
        )
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

    pub fn style(&self) -> &AttackStyle {
        &self.style
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health never drops below zero
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Health never rises above max; returns what was actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount.max(0)).min(self.max_health);
        self.health - before
    }

    /// Strike `target` once, rolling this combatant's bonus on `rng`
    pub fn strike(&self, target: &mut Combatant, rng: &mut impl Rng) -> AttackOutcome {
        let base = self.attack - target.defense;
        let mut outcome = AttackOutcome {
            attacker: self.name.clone(),
            target: target.name.clone(),
            damage: 0,
            bonus: None,
        };

        if base <= 0 {
            return outcome;
        }

        let mut damage = base;
        if let Some((chance, bonus)) = self.style.bonus_roll() {
            if rng.gen_range(0..100) < chance {
                damage = AttackStyle::apply(bonus, damage);
                outcome.bonus = Some(bonus);
            }
        }

        target.take_damage(damage);
        outcome.damage = damage;
        outcome
    }

    /// Class label used by `Display`
    pub fn title(&self) -> &'static str {
        match self.style {
            AttackStyle::Plain => "Entity",
            AttackStyle::Hero => "Character",
            AttackStyle::Beast | AttackStyle::Boss { .. } => "Monster",
        }
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, HP: {}, Attack: {}, Defense: {}",
            self.title(),
            self.name,
            self.health,
            self.attack,
            self.defense
        )?;
        if let AttackStyle::Boss { ability } = &self.style {
            write!(f, "\nSpecial Ability: {}", ability)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Rng whose gen_range always lands on the low end
    fn always_low() -> impl Rng {
        rand::rngs::mock::StepRng::new(0, 0)
    }

    /// Rng whose percent roll is always 50, above every bonus chance
    fn always_fifty() -> impl Rng {
        rand::rngs::mock::StepRng::new(1 << 31, 0)
    }

    #[test]
    fn test_new_validates() {
        assert!(Combatant::hero("", 100, 20, 10).is_err());
        assert!(Combatant::hero("Hero", 0, 20, 10).is_err());
        assert!(Combatant::hero("Hero", 100, -1, 10).is_err());
        assert!(Combatant::hero("Hero", 100, 20, -1).is_err());

        let hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        assert_eq!(hero.health(), 100);
        assert_eq!(hero.max_health(), 100);
        assert!(hero.is_alive());
    }

    #[test]
    fn test_heal_never_exceeds_max() {
        let mut hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        hero.take_damage(15);
        assert_eq!(hero.heal(20), 15);
        assert_eq!(hero.health(), 100);

        assert_eq!(hero.heal(50), 0);
        assert_eq!(hero.health(), 100);
    }

    #[test]
    fn test_huge_heal_is_clamped() {
        let mut hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        hero.take_damage(10);
        assert_eq!(hero.heal(i32::MAX), 10);
        assert_eq!(hero.health(), 100);
    }

    #[test]
    fn test_bonus_damage_saturates() {
        let titan = Combatant::hero("Titan", 100, i32::MAX, 0).unwrap();
        let mut target = Combatant::new("Wall", 50, 1, 0, AttackStyle::Plain).unwrap();

        let outcome = titan.strike(&mut target, &mut always_low());
        assert_eq!(outcome.bonus, Some(Bonus::Critical));
        assert_eq!(outcome.damage, i32::MAX);
        assert_eq!(target.health(), 0);
        assert_eq!(AttackStyle::apply(Bonus::Fire, i32::MAX - 3), i32::MAX);
    }

    #[test]
    fn test_damage_never_below_zero() {
        let mut goblin = Combatant::beast("Goblin", 50, 15, 5).unwrap();
        goblin.take_damage(500);
        assert_eq!(goblin.health(), 0);
        assert!(!goblin.is_alive());

        // Negative damage does not heal
        goblin.take_damage(-10);
        assert_eq!(goblin.health(), 0);
    }

    #[test]
    fn test_plain_strike() {
        let attacker = Combatant::new("Hero", 100, 20, 10, AttackStyle::Plain).unwrap();
        let mut target = Combatant::new("Goblin", 50, 15, 5, AttackStyle::Plain).unwrap();

        let outcome = attacker.strike(&mut target, &mut always_low());
        assert_eq!(outcome.damage, 15);
        assert_eq!(outcome.bonus, None);
        assert_eq!(target.health(), 35);
        assert_eq!(outcome.to_string(), "Hero attacks Goblin for 15 damage!");
    }

    #[test]
    fn test_strike_without_effect() {
        let weak = Combatant::beast("Rat", 10, 3, 0).unwrap();
        let mut tank = Combatant::hero("Knight", 100, 10, 20).unwrap();

        let outcome = weak.strike(&mut tank, &mut always_low());
        assert!(!outcome.landed());
        assert_eq!(tank.health(), 100);
        assert_eq!(outcome.to_string(), "Rat attacks Knight, but it has no effect!");
    }

    #[test]
    fn test_hero_critical_hit() {
        let hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        let mut goblin = Combatant::beast("Goblin", 50, 15, 5).unwrap();

        let outcome = hero.strike(&mut goblin, &mut always_low());
        assert_eq!(outcome.bonus, Some(Bonus::Critical));
        assert_eq!(outcome.damage, 30);
        assert_eq!(goblin.health(), 20);
        assert_eq!(outcome.to_string(), "Critical hit! Hero attacks Goblin for 30 damage!");
    }

    #[test]
    fn test_bonus_not_rolled_on_high_values() {
        let hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        let mut goblin = Combatant::beast("Goblin", 50, 15, 5).unwrap();
        let dragon = Combatant::boss("Dragon", 200, 30, 20, "Fire Breath").unwrap();

        let outcome = hero.strike(&mut goblin, &mut always_fifty());
        assert_eq!(outcome.bonus, None);
        assert_eq!(outcome.damage, 15);

        let mut target = Combatant::hero("Target", 100, 0, 0).unwrap();
        let outcome = dragon.strike(&mut target, &mut always_fifty());
        assert_eq!(outcome.bonus, None);
        assert_eq!(outcome.damage, 30);
    }

    #[test]
    fn test_poison_and_fire_bonuses() {
        let mut hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        let goblin = Combatant::beast("Goblin", 50, 15, 5).unwrap();
        let dragon = Combatant::boss("Dragon", 200, 30, 20, "Fire Breath").unwrap();

        let poison = goblin.strike(&mut hero, &mut always_low());
        assert_eq!(poison.bonus, Some(Bonus::Poison));
        assert_eq!(poison.damage, 10);

        let fire = dragon.strike(&mut hero, &mut always_low());
        assert_eq!(fire.bonus, Some(Bonus::Fire));
        assert_eq!(fire.damage, 30);
        assert_eq!(hero.health(), 60);
    }

    #[test]
    fn test_bonus_rate_is_roughly_right() {
        let hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let crits = (0..2000)
            .filter(|_| {
                let mut dummy = Combatant::beast("Dummy", 1000, 0, 0).unwrap();
                hero.strike(&mut dummy, &mut rng).bonus.is_some()
            })
            .count();

        // 20% of 2000 = 400
        assert!(crits > 300 && crits < 500, "crits = {}", crits);
    }

    #[test]
    fn test_display() {
        let dragon = Combatant::boss("Dragon", 200, 30, 20, "Fire Breath").unwrap();
        assert_eq!(
            dragon.to_string(),
            "Monster: Dragon, HP: 200, Attack: 30, Defense: 20\nSpecial Ability: Fire Breath"
        );

        let hero = Combatant::hero("Hero", 100, 20, 10).unwrap();
        assert_eq!(hero.to_string(), "Character: Hero, HP: 100, Attack: 20, Defense: 10");
    }
}
