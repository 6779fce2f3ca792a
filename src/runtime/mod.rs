// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime utilities: process logging setup and the retry engine.

mod logging;
mod retry;

pub use logging::{init_logging, LoggingOptions};
pub use retry::{Backoff, RetryConfig};
