// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buffered metric publishing to a Graphite plaintext ingester.
//!
//! Metric lines are delivered over a raw TCP socket in the plaintext line
//! protocol (`name value timestamp`, newline-delimited). When the server is
//! unreachable the batch is spilled to a local pending-buffer file and picked
//! up by the next publish attempt, giving cron-driven scripts at-least-once
//! delivery without a daemon.
//!
//! # Example
//!
//! ```no_run
//! use homeops::graphite::{stamp_now, GraphitePublisher, PendingBuffer, PublisherConfig};
//!
//! # async fn run() -> homeops::Result<()> {
//! let publisher = GraphitePublisher::new(
//!     PublisherConfig::new("10.0.0.2", 2003),
//!     PendingBuffer::new("/opt/graphite_data.txt"),
//! );
//!
//! let batch = stamp_now(&[("net.rx_bps", 1234.0)], Some("host1"));
//! publisher.publish(&batch).await?;
//! # Ok(())
//! # }
//! ```

mod buffer;
mod line;
mod publisher;

pub use buffer::PendingBuffer;
pub use line::{stamp_now, MetricLine};
pub use publisher::{GraphitePublisher, PublishOutcome, PublisherConfig, RecoveryMode};
