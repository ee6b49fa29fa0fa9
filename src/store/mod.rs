//! Persisted state - portfolio document and universe snapshot
//!
//! Both stores live under the data directory and are plain read-modify-write
//! files for a single active session. A missing or empty portfolio document is
//! an empty portfolio; a malformed one is reset to a valid empty document so
//! the session can continue.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config;
use crate::error::{FiitrackError, Result};
use crate::portfolio::Portfolio;
use crate::universe::UniverseEntry;

pub const PORTFOLIO_FILE: &str = "portfolio.json";
pub const UNIVERSE_FILE: &str = "universe.csv";

/// JSON document store for the portfolio: `{"positions": [...]}`.
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: config::data_dir()?.join(PORTFOLIO_FILE),
        })
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the portfolio. Missing or empty file means an empty portfolio;
    /// malformed content resets the store to a valid empty document.
    pub fn load(&self) -> Result<Portfolio> {
        if !self.path.exists() {
            return Ok(Portfolio::default());
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        if raw.trim().is_empty() {
            return Ok(Portfolio::default());
        }

        match serde_json::from_str::<Portfolio>(&raw) {
            Ok(portfolio) => Ok(portfolio),
            Err(e) => {
                warn!(
                    "Malformed portfolio document at {:?} ({}), resetting to empty",
                    self.path, e
                );
                let empty = Portfolio::default();
                self.save(&empty)?;
                Ok(empty)
            }
        }
    }

    /// Persist the portfolio document, creating parent directories if needed.
    pub fn save(&self, portfolio: &Portfolio) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(portfolio)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}

/// CSV-backed universe snapshot, keyed by ticker. Writes are full-table
/// overwrites after each refresh batch.
pub struct UniverseStore {
    path: PathBuf,
}

impl UniverseStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: config::data_dir()?.join(UNIVERSE_FILE),
        })
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load all universe entries. A missing snapshot is an empty universe.
    pub fn load(&self) -> Result<Vec<UniverseEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open {:?}", self.path))?;

        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let entry: UniverseEntry = record.map_err(|e| {
                FiitrackError::Store(format!("malformed row in {:?}: {}", self.path, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Overwrite the snapshot with the given entries.
    pub fn save(&self, entries: &[UniverseEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;

        info!("Saved {} universe entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}
