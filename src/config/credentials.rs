// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider credential files.
//!
//! Credentials live in small provider-specific JSON files, by default under
//! `~/.config/homeops/`, and are loaded with `serde_json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OpsError, Result};

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        OpsError::Config(format!(
            "Failed to read credentials file {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        OpsError::Config(format!(
            "Failed to parse credentials file {}: {e}",
            path.display()
        ))
    })
}

fn default_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| OpsError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join("homeops"))
}

/// Credentials for the voice-call provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceCredentials {
    /// Account SID.
    pub sid: String,
    /// API auth token.
    pub token: String,
    /// Default caller number in E.164 form.
    pub from: String,
}

impl VoiceCredentials {
    /// Load from a specific JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref())
    }

    /// Load from the default location (`~/.config/homeops/twilio.json`).
    pub fn load_default() -> Result<Self> {
        Self::load_from_path(Self::default_path()?)
    }

    /// The default credentials file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(default_dir()?.join("twilio.json"))
    }
}

/// Credentials for the Telegram bot API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelegramCredentials {
    /// Bot identifier of the form `<id>:<token>`.
    pub bot_id: String,
    /// Numeric chat to post into.
    pub chat_id: i64,
}

impl TelegramCredentials {
    /// Load from a specific JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref())
    }

    /// Load from the default location (`~/.config/homeops/telegram.json`).
    pub fn load_default() -> Result<Self> {
        Self::load_from_path(Self::default_path()?)
    }

    /// The default credentials file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(default_dir()?.join("telegram.json"))
    }
}
