use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("failed to read manifest {path}: {message}")]
    Read { path: String, message: String },

    #[error("error deserializing manifest")]
    Deserialize(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
    pub weight_kg: f64,
    pub file: PathBuf,
}

/// Manifest naming one performance table CSV per weight class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(rename = "table")]
    pub tables: Vec<TableConfig>,
}

impl Config {
    /// Reads a manifest; relative CSV paths are resolved against the
    /// manifest's directory.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|e| Error::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config = parse_string(&raw)?;

        if let Some(dir) = path.parent() {
            for table in &mut config.tables {
                if table.file.is_relative() {
                    table.file = dir.join(&table.file);
                }
            }
        }

        Ok(config)
    }
}

pub fn parse_string(raw: &str) -> Result<Config, Error> {
    Ok(toml::from_str(raw)?)
}
