//! JSON-lines log of finished rounds.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::types::RoundSummary;

/// Appends one serialized [`RoundSummary`] per line.
pub struct ResultsLog {
    path: PathBuf,
    out: BufWriter<File>,
    rounds: u32,
    tickets: u32,
}

impl ResultsLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open results log {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            rounds: 0,
            tickets: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, summary: &RoundSummary) -> Result<()> {
        serde_json::to_writer(&mut self.out, summary)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.rounds += 1;
        self.tickets = self.tickets.saturating_add(summary.tickets.total);
        Ok(())
    }

    /// Rounds written through this handle.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Tickets earned across the rounds written through this handle.
    pub fn tickets(&self) -> u32 {
        self.tickets
    }
}

/// Read every summary back, skipping lines that do not parse.
pub fn read_summaries(path: &Path) -> Result<Vec<RoundSummary>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results log {}", path.display()))?;
    Ok(raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
