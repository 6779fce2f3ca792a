// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of metric lines over TCP, spilling to the pending buffer on
//! failure.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::error::{OpsError, Result};

use super::buffer::PendingBuffer;
use super::line::MetricLine;

/// What happens to previously buffered lines when a send fails again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Keep previously buffered lines ahead of the new batch, so nothing is
    /// lost across consecutive failures.
    #[default]
    MergePrevious,
    /// Discard previously buffered lines and keep only the new batch.
    ///
    /// This reproduces the historical behavior where a second consecutive
    /// failure dropped the lines buffered by the first.
    DropPrevious,
}

/// Configuration for [`GraphitePublisher`].
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Hostname or IP of the metrics server.
    pub host: String,
    /// Plaintext ingester port, conventionally 2003.
    pub port: u16,
    /// Bound on the TCP connect; the send itself is not separately bounded.
    pub connect_timeout: Duration,
    /// Failed-send handling for previously buffered lines.
    pub recovery: RecoveryMode,
    /// Log every delivered line at info level.
    pub verbose: bool,
}

impl PublisherConfig {
    /// Create a configuration with the default 5 second connect timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(5),
            recovery: RecoveryMode::default(),
            verbose: false,
        }
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the recovery mode for failed sends.
    #[must_use]
    pub fn with_recovery(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }

    /// Enable or disable per-line delivery logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Result of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// All lines were sent; the pending buffer is now empty.
    Delivered {
        /// Lines sent, including previously buffered ones.
        lines: usize,
    },
    /// The server was unreachable; lines were written to the pending buffer.
    Buffered {
        /// Lines now waiting in the pending buffer.
        lines: usize,
        /// The classified connection failure, rendered as text.
        reason: String,
    },
}

/// Publishes metric lines to a Graphite plaintext ingester, spilling
/// undelivered lines to a local file for a later attempt.
///
/// There is no retry loop inside a single call; retry happens by the caller
/// (typically a scheduled job) invoking [`publish`](Self::publish) again and
/// finding the pending buffer non-empty.
#[derive(Debug)]
pub struct GraphitePublisher {
    config: PublisherConfig,
    buffer: PendingBuffer,
}

impl GraphitePublisher {
    /// Create a publisher over the given buffer file.
    #[must_use]
    pub fn new(config: PublisherConfig, buffer: PendingBuffer) -> Self {
        Self { config, buffer }
    }

    /// The pending buffer backing this publisher.
    #[must_use]
    pub fn buffer(&self) -> &PendingBuffer {
        &self.buffer
    }

    /// Attempt to deliver `batch`, together with any previously undelivered
    /// lines, to the configured server.
    ///
    /// Connection failures are not errors: the batch is written to the
    /// pending buffer per the configured [`RecoveryMode`] and the failure is
    /// reported in the outcome. Buffer-file I/O failures do propagate.
    pub async fn publish(&self, batch: &[MetricLine]) -> Result<PublishOutcome> {
        let pending = self.buffer.load();
        if !pending.is_empty() {
            warn!(
                "Previously unwritten graphite data is {} entries long.",
                pending.len()
            );
        }

        let new_lines: Vec<String> = batch.iter().map(ToString::to_string).collect();
        if pending.is_empty() && new_lines.is_empty() {
            // Nothing to send; skip the socket entirely.
            self.buffer.store(&[])?;
            return Ok(PublishOutcome::Delivered { lines: 0 });
        }

        match self.send_all(&pending, &new_lines).await {
            Ok(()) => {
                if self.config.verbose {
                    for line in &new_lines {
                        info!("{line}");
                    }
                }
                self.buffer.store(&[])?;
                Ok(PublishOutcome::Delivered {
                    lines: pending.len() + new_lines.len(),
                })
            }
            Err(e) => {
                error!("Couldn't connect to graphite at {}: {e}", self.endpoint());
                error!("Queueing data for later writing...");
                let keep: Vec<String> = match self.config.recovery {
                    RecoveryMode::MergePrevious => {
                        pending.iter().chain(new_lines.iter()).cloned().collect()
                    }
                    RecoveryMode::DropPrevious => new_lines,
                };
                self.buffer.store(&keep)?;
                Ok(PublishOutcome::Buffered {
                    lines: keep.len(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    async fn send_all(&self, pending: &[String], new_lines: &[String]) -> Result<()> {
        let mut stream = self.connect().await?;

        let mut payload = pending
            .iter()
            .chain(new_lines.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        payload.push('\n');

        stream
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| OpsError::Send(self.endpoint(), e.to_string()))?;
        stream
            .shutdown()
            .await
            .map_err(|e| OpsError::Send(self.endpoint(), e.to_string()))?;
        Ok(())
    }

    /// Open the socket, classifying refused, timed-out, and unresolvable
    /// endpoints as distinct errors.
    async fn connect(&self) -> Result<TcpStream> {
        let endpoint = self.endpoint();
        let addr: SocketAddr = lookup_host(endpoint.as_str())
            .await
            .map_err(|e| OpsError::DnsResolution(self.config.host.clone(), e.to_string()))?
            .next()
            .ok_or_else(|| {
                OpsError::DnsResolution(self.config.host.clone(), "no addresses".to_string())
            })?;

        match timeout(self.config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                Err(OpsError::ConnectionRefused(endpoint))
            }
            Ok(Err(e)) => Err(OpsError::Connection(endpoint, e.to_string())),
            Err(_) => Err(OpsError::ConnectTimeout(
                endpoint,
                self.config.connect_timeout,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PublisherConfig::new("10.0.0.2", 2003);
        assert_eq!(config.host, "10.0.0.2");
        assert_eq!(config.port, 2003);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.recovery, RecoveryMode::MergePrevious);
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_builder() {
        let config = PublisherConfig::new("graphite.local", 2003)
            .with_connect_timeout(Duration::from_millis(250))
            .with_recovery(RecoveryMode::DropPrevious)
            .with_verbose(true);

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.recovery, RecoveryMode::DropPrevious);
        assert!(config.verbose);
    }

    #[tokio::test]
    async fn test_connect_refused_is_classified() {
        // Bind a listener to grab a free port, then drop it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let publisher = GraphitePublisher::new(
            PublisherConfig::new("127.0.0.1", port),
            PendingBuffer::new(dir.path().join("pending.txt")),
        );

        match publisher.connect().await {
            Err(OpsError::ConnectionRefused(endpoint)) => {
                assert_eq!(endpoint, format!("127.0.0.1:{port}"));
            }
            other => panic!("expected ConnectionRefused, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dns_failure_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = GraphitePublisher::new(
            PublisherConfig::new("definitely-not-a-real-host.invalid", 2003),
            PendingBuffer::new(dir.path().join("pending.txt")),
        );

        match publisher.connect().await {
            Err(OpsError::DnsResolution(host, _)) => {
                assert_eq!(host, "definitely-not-a-real-host.invalid");
            }
            other => panic!("expected DnsResolution, got {other:?}"),
        }
    }
}
