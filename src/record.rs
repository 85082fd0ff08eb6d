// 💾 Flat-file records - headerless CSV rows, one value per row
//
// Every save file in the game (inventory, roster, access users and
// resources) goes through these two functions.

use std::fs;
use std::path::Path;

use crate::error::GameResult;

/// A value that can be written as one CSV row and read back
pub trait Record: Sized {
    fn to_record(&self) -> Vec<String>;

    /// Parse one row; Ok(None) means "unknown row type, skip it"
    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>>;
}

/// Rows read from a file, with the 1-based line each one started on
#[derive(Debug)]
pub struct LoadedRecords<T> {
    pub records: Vec<(usize, T)>,
    pub skipped: usize,
}

impl<T> LoadedRecords<T> {
    pub fn into_values(self) -> Vec<T> {
        self.records.into_iter().map(|(_, value)| value).collect()
    }
}

pub fn write_records<'a, T: Record + 'a>(
    path: &Path,
    values: impl IntoIterator<Item = &'a T>,
) -> GameResult<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut written = 0;
    for value in values {
        writer.write_record(value.to_record())?;
        written += 1;
    }
    writer.flush()?;

    tracing::debug!(path = ?path, rows = written, "records written");
    Ok(written)
}

/// Read every row of `path`
///
/// Rows with fewer than `min_fields` fields and rows the parser does not
/// recognise are counted in `skipped`. A recognised but malformed row
/// stops the load with an error.
pub fn read_records<T: Record>(path: &Path, min_fields: usize) -> GameResult<LoadedRecords<T>> {
    let content = fs::read_to_string(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut loaded = LoadedRecords {
        records: Vec::new(),
        skipped: 0,
    };

    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| line_at(&content, p.byte() as usize))
            .unwrap_or(0);

        if record.len() < min_fields {
            loaded.skipped += 1;
            continue;
        }

        let fields: Vec<&str> = record.iter().collect();
        match T::from_record(&fields, line)? {
            Some(value) => loaded.records.push((line, value)),
            None => loaded.skipped += 1,
        }
    }

    if loaded.skipped > 0 {
        tracing::warn!(path = ?path, skipped = loaded.skipped, "skipped unrecognised rows");
    }
    Ok(loaded)
}

/// 1-based line of the record starting at `offset`. The csv reader does not
/// count blank lines, and a record's position sits before any blank lines
/// it skipped, so the line is taken from the raw text instead.
fn line_at(content: &str, offset: usize) -> usize {
    let bytes = content.as_bytes();
    let mut start = offset.min(bytes.len());
    while start < bytes.len() && matches!(bytes[start], b'\n' | b'\r') {
        start += 1;
    }
    bytes[..start].iter().filter(|&&b| b == b'\n').count() + 1
}
