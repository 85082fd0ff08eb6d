// 🎒 Inventory - ordered list of items a character carries
//
// Save format: one CSV row per item, type tag first.
//   Weapon,<name>,<description>,<attack bonus>[,equipped]
//   Potion,<name>,<description>,<heal amount>
// Rows with an unknown tag are skipped; rows with a known tag but bad
// fields are an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{parse_field, GameError, GameResult};
use crate::record::{read_records, write_records, Record};

// ============================================================================
// ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Weapon {
        name: String,
        description: String,
        attack_bonus: i32,
        equipped: bool,
    },
    Potion {
        name: String,
        description: String,
        heal_amount: i32,
    },
}

impl Item {
    pub fn weapon(name: impl Into<String>, description: impl Into<String>, attack_bonus: i32) -> Self {
        Item::Weapon {
            name: name.into(),
            description: description.into(),
            attack_bonus,
            equipped: false,
        }
    }

    pub fn potion(name: impl Into<String>, description: impl Into<String>, heal_amount: i32) -> Self {
        Item::Potion {
            name: name.into(),
            description: description.into(),
            heal_amount,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Weapon { name, .. } | Item::Potion { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Item::Weapon { description, .. } | Item::Potion { description, .. } => description,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Item::Weapon { .. } => "Weapon",
            Item::Potion { .. } => "Potion",
        }
    }
}

impl Record for Item {
    fn to_record(&self) -> Vec<String> {
        match self {
            Item::Weapon {
                name,
                description,
                attack_bonus,
                equipped,
            } => {
                let mut record = vec![
                    "Weapon".to_string(),
                    name.clone(),
                    description.clone(),
                    attack_bonus.to_string(),
                ];
                if *equipped {
                    record.push("equipped".to_string());
                }
                record
            }
            Item::Potion {
                name,
                description,
                heal_amount,
            } => vec![
                "Potion".to_string(),
                name.clone(),
                description.clone(),
                heal_amount.to_string(),
            ],
        }
    }

    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>> {
        let tag = fields.first().copied().unwrap_or("").trim();
        let label = match tag {
            "Weapon" => "weapon",
            "Potion" => "potion",
            _ => return Ok(None),
        };

        // Only a weapon may carry a fifth field, and only the equipped flag
        let arity_ok = match (tag, fields.len()) {
            (_, 4) => true,
            ("Weapon", 5) => fields[4].trim() == "equipped",
            _ => false,
        };
        if !arity_ok {
            return Err(GameError::invalid_data(
                line,
                format!("invalid {} data format: got {} fields", label, fields.len()),
            ));
        }

        let name = fields[1].to_string();
        let description = fields[2].to_string();
        let amount: i32 = parse_field(fields[3], "amount", line)?;

        let item = match tag {
            "Weapon" => Item::Weapon {
                name,
                description,
                attack_bonus: amount,
                equipped: fields.len() == 5,
            },
            _ => Item::Potion {
                name,
                description,
                heal_amount: amount,
            },
        };

        Ok(Some(item))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.description())?;
        if let Item::Weapon { equipped: true, .. } = self {
            write!(f, " [equipped]")?;
        }
        Ok(())
    }
}

// ============================================================================
// INVENTORY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove the first item with this name
    pub fn remove_item(&mut self, name: &str) -> GameResult<Item> {
        let pos = self
            .items
            .iter()
            .position(|item| item.name() == name)
            .ok_or_else(|| GameError::ItemNotFound(name.to_string()))?;
        Ok(self.items.remove(pos))
    }

    pub fn get_item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn get_item_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.name() == name)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Multi-line listing as shown in the game menu
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "Inventory is empty".to_string();
        }

        let mut out = String::from("Inventory:");
        for item in &self.items {
            out.push_str(&format!("\n- {}", item));
        }
        out
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> GameResult<()> {
        write_records(path.as_ref(), &self.items)?;
        Ok(())
    }

    /// Replace the contents with what the file holds
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> GameResult<()> {
        self.items = read_records(path.as_ref(), 2)?.into_values();
        Ok(())
    }
}
