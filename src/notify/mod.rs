// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notifications: voice calls, Telegram messages, and email.
//!
//! Each channel is an independent wrapper around one provider; none of them
//! share state. Credentials come from the JSON files in [`crate::config`].

pub mod email;
pub mod telegram;
pub mod voice;

pub use email::{send_email, EmailConfig, EmailMessage};
pub use telegram::send_message;
pub use voice::{place_call, CallRequest};
