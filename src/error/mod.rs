// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection refused by {0}")]
    ConnectionRefused(String),

    #[error("Connection to {0} timed out after {1:?}")]
    ConnectTimeout(String, Duration),

    #[error("DNS resolution failed for {0}: {1}")]
    DnsResolution(String, String),

    #[error("Connection error for {0}: {1}")]
    Connection(String, String),

    #[error("Send to {0} failed: {1}")]
    Send(String, String),

    #[error("SMTP reply {code}: {line}")]
    SmtpReply { code: u16, line: String },

    #[error("Connection retries exhausted for {0}")]
    RetriesExhausted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpsError {
    /// True for failures that stand a chance of succeeding on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            OpsError::Http(e) => e.is_connect() || e.is_timeout(),
            OpsError::ConnectionRefused(_)
            | OpsError::ConnectTimeout(_, _)
            | OpsError::DnsResolution(_, _)
            | OpsError::Connection(_, _)
            | OpsError::Send(_, _) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_transient() {
        assert!(OpsError::ConnectionRefused("10.0.0.2:2003".to_string()).is_transient());
        assert!(
            OpsError::ConnectTimeout("10.0.0.2:2003".to_string(), Duration::from_secs(5))
                .is_transient()
        );
        assert!(
            OpsError::DnsResolution("graphite".to_string(), "no such host".to_string())
                .is_transient()
        );
    }

    #[test]
    fn test_config_errors_are_permanent() {
        assert!(!OpsError::Config("missing credentials".to_string()).is_transient());
        assert!(!OpsError::SmtpReply {
            code: 550,
            line: "550 mailbox unavailable".to_string()
        }
        .is_transient());
    }
}
