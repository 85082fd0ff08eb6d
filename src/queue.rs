// 🚶 Queue - FIFO wrapper that reports misuse instead of ignoring it

use std::collections::VecDeque;
use std::fmt::Display;

use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue {
            items: VecDeque::new(),
        }
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Err(EmptyQueue) when there is nothing to pop
    pub fn pop(&mut self) -> GameResult<T> {
        self.items.pop_front().ok_or(GameError::EmptyQueue)
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Display> Queue<T> {
    /// Items front to back, separated by single spaces
    pub fn render(&self) -> GameResult<String> {
        if self.items.is_empty() {
            return Err(GameError::EmptyQueue);
        }
        Ok(self
            .items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Queue {
            items: iter.into_iter().collect(),
        }
    }
}
