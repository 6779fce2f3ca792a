// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credentials files and other fixed-path inputs.

mod credentials;

pub use credentials::{TelegramCredentials, VoiceCredentials};

use std::fs;
use std::path::Path;

use crate::error::{OpsError, Result};

/// Default location of the one-line User-Agent file.
pub const DEFAULT_USER_AGENT_PATH: &str = "/opt/user_agent.txt";

/// Read the default HTTP User-Agent from a one-line text file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn user_agent(path: impl AsRef<Path>) -> Result<String> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        OpsError::Config(format!(
            "Failed to read user agent file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    Ok(content.trim().to_string())
}
