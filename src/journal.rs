// 📜 Game Journal - append-only, timestamped log of what happened in a session
//
// This is the player-facing record (battles, saves, loads). Diagnostic
// logging goes through tracing instead.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::Path;

use crate::error::GameResult;

/// Journal of messages of type `T`
///
/// Each entry is written as `<rfc3339 timestamp>: <message>` on its own line.
pub struct Journal<T> {
    writer: Box<dyn Write + Send>,
    entries: usize,
    _message: PhantomData<fn(&T)>,
}

impl<T: Display> Journal<T> {
    /// Open (or create) a journal file in append mode
    pub fn open(path: impl AsRef<Path>) -> GameResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_writer(file))
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Journal {
            writer: Box::new(writer),
            entries: 0,
            _message: PhantomData,
        }
    }

    /// Journal that drops everything (used when no file is wanted)
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    pub fn log(&mut self, message: &T) -> GameResult<()> {
        self.log_at(Utc::now(), message)
    }

    pub fn log_at(&mut self, at: DateTime<Utc>, message: &T) -> GameResult<()> {
        tracing::debug!(%message, "journal entry");
        writeln!(self.writer, "{}: {}", at.to_rfc3339(), message)?;
        self.writer.flush()?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries written through this handle
    pub fn entries(&self) -> usize {
        self.entries
    }
}
