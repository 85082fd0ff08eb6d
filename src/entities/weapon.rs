// 🗡️ Weapon - value type with arithmetic and comparison
//
// `sword + bow` forges a combined weapon; `axe > sword` compares damage.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: i32,
    /// Kilograms. A NaN weight makes the weapon unequal to itself.
    pub weight: f32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: i32, weight: f32) -> Self {
        Weapon {
            name: name.into(),
            damage,
            weight,
        }
    }

    /// Longer description including weight
    pub fn details(&self) -> String {
        format!(
            "Weapon: {}, Damage: {}, Weight: {}kg",
            self.name, self.damage, self.weight
        )
    }
}

impl Add for Weapon {
    type Output = Weapon;

    fn add(self, other: Weapon) -> Weapon {
        &self + &other
    }
}

impl<'a> Add<&'a Weapon> for &'a Weapon {
    type Output = Weapon;

    fn add(self, other: &Weapon) -> Weapon {
        Weapon {
            name: format!("{} + {}", self.name, other.name),
            damage: self.damage.saturating_add(other.damage),
            weight: self.weight + other.weight,
        }
    }
}

/// Ordering looks at damage only. Weapons with equal damage that are not
/// equal are unordered, so `<=` and `>=` agree with `==`.
impl PartialOrd for Weapon {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.damage.cmp(&other.damage) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weapon: {}, Damage: {}", self.name, self.damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        let sword = Weapon::new("Sword", 50, 3.5);
        let bow = Weapon::new("Bow", 30, 1.2);

        let combined = &sword + &bow;
        assert_eq!(combined.to_string(), "Weapon: Sword + Bow, Damage: 80");
        assert!((combined.weight - 4.7).abs() < 1e-5);

        // By value works too and leaves nothing behind
        let owned = sword + bow;
        assert_eq!(owned.name, "Sword + Bow");
    }

    #[test]
    fn test_compare_by_damage() {
        let sword = Weapon::new("Sword", 50, 3.5);
        let bow = Weapon::new("Bow", 30, 1.2);
        let axe = Weapon::new("Axe", 60, 4.0);

        assert!(axe > sword);
        assert!(!(bow > sword));
        assert!(bow < &sword + &bow);

        // Same damage, different weapon: neither is greater, but not equal
        let club = Weapon::new("Club", 50, 5.0);
        assert!(!(club > sword) && !(club < sword));
        assert_ne!(club, sword);
        assert_eq!(club.partial_cmp(&sword), None);
        assert!(!(club <= sword) && !(club >= sword));

        let twin = sword.clone();
        assert_eq!(twin.partial_cmp(&sword), Some(Ordering::Equal));
        assert!(twin <= sword && twin >= sword);
    }

    #[test]
    fn test_details() {
        let bow = Weapon::new("Bow", 15, 1.2);
        assert_eq!(bow.details(), "Weapon: Bow, Damage: 15, Weight: 1.2kg");
    }
}
