// 🗂️ GameManager - generic collection of managed entities
//
// Linear add / remove / search / sort over a Vec, plus CSV save and load.
// Anything that implements `Managed` can live in a manager.

use std::fmt::Display;
use std::path::Path;

use crate::entities::RosterEntry;
use crate::error::{GameError, GameResult};
use crate::record::{read_records, write_records, Record};

// ============================================================================
// MANAGED TRAIT
// ============================================================================

/// What a GameManager needs from its entries
pub trait Managed: Record + Display {
    fn name(&self) -> &str;

    fn health(&self) -> i32;
}

impl Managed for RosterEntry {
    fn name(&self) -> &str {
        RosterEntry::name(self)
    }

    fn health(&self) -> i32 {
        RosterEntry::health(self)
    }
}

// ============================================================================
// GAME MANAGER
// ============================================================================

#[derive(Debug, Clone)]
pub struct GameManager<T> {
    entities: Vec<T>,
}

impl<T> Default for GameManager<T> {
    fn default() -> Self {
        GameManager {
            entities: Vec::new(),
        }
    }
}

impl<T: Managed> GameManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries with health <= 0 are rejected
    pub fn add_entity(&mut self, entity: T) -> GameResult<()> {
        if entity.health() <= 0 {
            return Err(GameError::InvalidArgument(format!(
                "{} has invalid health (HP <= 0)",
                entity.name()
            )));
        }
        tracing::debug!(name = entity.name(), "entity added");
        self.entities.push(entity);
        Ok(())
    }

    /// Remove the first entry with this name
    pub fn remove_by_name(&mut self, name: &str) -> Option<T> {
        let pos = self.entities.iter().position(|e| e.name() == name)?;
        Some(self.entities.remove(pos))
    }

    pub fn search_by_name(&self, name: &str) -> Vec<&T> {
        self.entities.iter().filter(|e| e.name() == name).collect()
    }

    /// Stable sort by any key
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&T) -> K) {
        self.entities.sort_by_key(key);
    }

    pub fn entities(&self) -> &[T] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// One line per entry, in order
    pub fn display_all(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.to_string()).collect()
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> GameResult<()> {
        let count = write_records(path.as_ref(), &self.entities)?;
        tracing::info!(path = ?path.as_ref(), count, "roster saved");
        Ok(())
    }

    /// Replace the contents with the file's entries
    ///
    /// Rows without a comma and rows with an unknown tag are skipped.
    /// The manager is left untouched when the file is malformed.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> GameResult<()> {
        let rows = read_records::<T>(path.as_ref(), 2)?;

        let mut loaded = GameManager::new();
        for (line, entity) in rows.records {
            loaded
                .add_entity(entity)
                .map_err(|e| GameError::invalid_data(line, e.to_string()))?;
        }

        *self = loaded;
        Ok(())
    }
}
