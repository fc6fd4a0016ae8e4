//! Rolling CSV archives
//!
//! A `RollingArchive` keeps the most recent records of some serialisable type
//! and mirrors them into a CSV file, so that the file never grows beyond a
//! fixed number of rows.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A CSV archive holding at most `max_rows` records.
///
/// The whole file is rewritten on every push, which keeps the file consistent
/// with the in-memory records at the cost of O(max_rows) work per push.
#[derive(Debug)]
pub struct RollingArchive<T> {
    path: PathBuf,
    max_rows: usize,
    records: VecDeque<T>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while reading or writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not access the archive file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not read or write CSV data: {0}")]
    CsvError(#[from] csv::Error),

    #[error("An archive must be allowed to hold at least one row")]
    ZeroMaxRows,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> RollingArchive<T>
where
    T: Serialize + DeserializeOwned
{
    /// Open an archive at the given path.
    ///
    /// If the file already exists its records are loaded, keeping only the
    /// last `max_rows` of them. Parent directories are created if needed.
    pub fn open<P: AsRef<Path>>(path: P, max_rows: usize) -> Result<Self, ArchiveError> {
        if max_rows == 0 {
            return Err(ArchiveError::ZeroMaxRows);
        }

        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut archive = Self {
            path,
            max_rows,
            records: VecDeque::with_capacity(max_rows),
        };

        if archive.path.exists() {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .from_path(&archive.path)?;

            for record in reader.deserialize() {
                archive.records.push_back(record?);
                archive.trim();
            }
        }

        Ok(archive)
    }

    /// Push a record onto the end of the archive, dropping the oldest record
    /// if full, and rewrite the file.
    pub fn push(&mut self, record: T) -> Result<(), ArchiveError> {
        self.records.push_back(record);
        self.trim();
        self.flush()
    }

    /// Push several records at once, rewriting the file only once.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, records: I) -> Result<(), ArchiveError> {
        for record in records {
            self.records.push_back(record);
            self.trim();
        }
        self.flush()
    }

    /// The records currently held, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    /// The number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn trim(&mut self) {
        while self.records.len() > self.max_rows {
            self.records.pop_front();
        }
    }

    fn flush(&self) -> Result<(), ArchiveError> {
        let file = File::create(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        for record in self.records.iter() {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }
}
