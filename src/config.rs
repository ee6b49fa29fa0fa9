//! Configuration loading
//!
//! The data directory holds every persisted file (portfolio document, universe
//! snapshot, config). The Brapi API key comes from the `BRAPI_API_KEY`
//! environment variable, falling back to `config.toml` in the data directory.
//! A missing key is fatal for any command that reaches the quote API.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{FiitrackError, Result};

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub brapi_api_key: String,
}

/// On-disk layout of `config.toml`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    brapi_api_key: Option<String>,
}

/// Get the data directory (~/.fiitrack), creating it if needed.
///
/// `FIITRACK_DATA_DIR` overrides the default, which keeps tests away from the
/// real home directory.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("FIITRACK_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".fiitrack")
        }
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory at {:?}", dir))?;

    Ok(dir)
}

/// Load the configuration, requiring a Brapi API key.
pub fn load() -> Result<Config> {
    if let Ok(key) = std::env::var("BRAPI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(Config {
                brapi_api_key: key.trim().to_string(),
            });
        }
    }

    let path = data_dir()?.join("config.toml");
    let file = if path.exists() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        toml::from_str::<ConfigFile>(&raw).with_context(|| format!("Failed to parse {:?}", path))?
    } else {
        ConfigFile::default()
    };

    match file.brapi_api_key {
        Some(key) if !key.trim().is_empty() => Ok(Config {
            brapi_api_key: key.trim().to_string(),
        }),
        _ => Err(FiitrackError::Config(format!(
            "BRAPI_API_KEY not set; export it or add brapi_api_key to {:?}",
            path
        ))
        .into()),
    }
}
