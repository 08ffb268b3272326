// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log of [`mx_core::Event`] facts, one JSON
//! object per line. Durability discipline: every accepted mutation is
//! appended and flushed before the in-memory materialized view is
//! updated, so a crash mid-operation never exposes a fact nothing can
//! replay.

use crate::error::StoreError;
use mx_core::Event;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct Wal {
    path: PathBuf,
    file: File,
}

impl Wal {
    /// Open (creating if absent) the WAL file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Replay every fact previously appended, in order. Corrupt trailing
    /// lines (e.g. a partial write from a crash mid-append) are logged
    /// and skipped rather than failing the whole replay.
    pub fn replay(&self) -> Result<Vec<Event>, StoreError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Event>(&line) {
                Ok(event) => events.push(event),
                Err(err) => {
                    tracing::warn!(line = lineno, error = %err, "skipping malformed WAL entry");
                }
            }
        }
        Ok(events)
    }

    /// Append one fact and flush to disk before returning.
    pub fn append(&mut self, event: &Event) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
