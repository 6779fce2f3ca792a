// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small formatting and path helpers for calling scripts.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{OpsError, Result};

/// Render a rate with thousands scaling: `humanize(12_345.0, "bps")` gives
/// `"12 Kbps"`. Values beyond giga keep dividing and render with `T`.
#[must_use]
pub fn humanize(n: f64, suffix: &str) -> String {
    let mut n = n.round();
    for unit in ["", "K", "M", "G"] {
        if n.abs() < 1000.0 {
            return format!("{} {unit}{suffix}", n as i64);
        }
        n /= 1000.0;
    }
    format!("{} T{suffix}", n as i64)
}

/// Path of a per-script state file next to the current executable, named
/// `state_<stem>.<extension>`.
///
/// # Errors
///
/// Returns an error if the current executable path cannot be determined.
pub fn statefile(extension: &str) -> Result<PathBuf> {
    let exe = env::current_exe()?;
    let stem = exe
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| OpsError::Config("Cannot determine executable name".to_string()))?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(format!("state_{stem}.{extension}")))
}
