// 📋 Roster entries - what a GameManager keeps track of
//
// Player, Enemy and Boss share name/health/level; the tag is written last
// in the save record so a line reads `Hero,100,1,0,Player`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{parse_field, GameError, GameResult};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEntry {
    Player {
        name: String,
        health: i32,
        level: u32,
        experience: u32,
    },
    Enemy {
        name: String,
        health: i32,
        level: u32,
        /// Free-form enemy type ("Normal", "Melee", "Boss", ...)
        kind: String,
    },
    Boss {
        name: String,
        health: i32,
        level: u32,
        kind: String,
        special_ability: String,
    },
}

impl RosterEntry {
    pub fn player(name: impl Into<String>, health: i32, level: u32, experience: u32) -> Self {
        RosterEntry::Player {
            name: name.into(),
            health,
            level,
            experience,
        }
    }

    pub fn enemy(name: impl Into<String>, health: i32, level: u32, kind: impl Into<String>) -> Self {
        RosterEntry::Enemy {
            name: name.into(),
            health,
            level,
            kind: kind.into(),
        }
    }

    pub fn boss(
        name: impl Into<String>,
        health: i32,
        level: u32,
        kind: impl Into<String>,
        special_ability: impl Into<String>,
    ) -> Self {
        RosterEntry::Boss {
            name: name.into(),
            health,
            level,
            kind: kind.into(),
            special_ability: special_ability.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RosterEntry::Player { name, .. }
            | RosterEntry::Enemy { name, .. }
            | RosterEntry::Boss { name, .. } => name,
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            RosterEntry::Player { health, .. }
            | RosterEntry::Enemy { health, .. }
            | RosterEntry::Boss { health, .. } => *health,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            RosterEntry::Player { level, .. }
            | RosterEntry::Enemy { level, .. }
            | RosterEntry::Boss { level, .. } => *level,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            RosterEntry::Player { .. } => "Player",
            RosterEntry::Enemy { .. } => "Enemy",
            RosterEntry::Boss { .. } => "Boss",
        }
    }

}

impl Record for RosterEntry {
    fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.name().to_string(),
            self.health().to_string(),
            self.level().to_string(),
        ];
        match self {
            RosterEntry::Player { experience, .. } => record.push(experience.to_string()),
            RosterEntry::Enemy { kind, .. } => record.push(kind.clone()),
            RosterEntry::Boss {
                kind,
                special_ability,
                ..
            } => {
                record.push(kind.clone());
                record.push(special_ability.clone());
            }
        }
        record.push(self.type_tag().to_string());
        record
    }

    /// Ok(None) for an unknown tag
    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>> {
        let Some((tag, rest)) = fields.split_last() else {
            return Ok(None);
        };

        let expected = match tag.trim() {
            "Player" | "Enemy" => 4,
            "Boss" => 5,
            _ => return Ok(None),
        };
        if rest.len() != expected {
            return Err(GameError::invalid_data(
                line,
                format!(
                    "invalid data format for {}: expected {} fields, got {}",
                    tag.trim(),
                    expected + 1,
                    fields.len()
                ),
            ));
        }

        let name = rest[0].to_string();
        if name.trim().is_empty() {
            return Err(GameError::invalid_data(line, "empty name"));
        }
        let health = parse_field(rest[1], "health", line)?;
        let level = parse_field(rest[2], "level", line)?;

        let entry = match tag.trim() {
            "Player" => RosterEntry::Player {
                name,
                health,
                level,
                experience: parse_field(rest[3], "experience", line)?,
            },
            "Enemy" => RosterEntry::Enemy {
                name,
                health,
                level,
                kind: rest[3].to_string(),
            },
            _ => RosterEntry::Boss {
                name,
                health,
                level,
                kind: rest[3].to_string(),
                special_ability: rest[4].to_string(),
            },
        };
        Ok(Some(entry))
    }
}

impl fmt::Display for RosterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Health: {}, Level: {}",
            self.name(),
            self.health(),
            self.level()
        )?;
        match self {
            RosterEntry::Player { experience, .. } => write!(f, ", Experience: {}", experience),
            RosterEntry::Enemy { kind, .. } => write!(f, ", Type: {}", kind),
            RosterEntry::Boss {
                kind,
                special_ability,
                ..
            } => write!(f, ", Type: {}, Special Ability: {}", kind, special_ability),
        }
    }
}
