// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod config;
pub mod error;
pub mod graphite;
pub mod http;
pub mod notify;
pub mod runtime;
pub mod util;

pub use error::{OpsError, Result};
pub use graphite::{
    GraphitePublisher, MetricLine, PendingBuffer, PublishOutcome, PublisherConfig, RecoveryMode,
};
