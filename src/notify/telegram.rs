// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram bot messages.

use reqwest::Client;
use tracing::debug;

use crate::config::TelegramCredentials;
use crate::error::Result;

fn send_message_url(bot_id: &str) -> String {
    format!("https://api.telegram.org/bot{bot_id}/sendMessage")
}

/// Post a message to the configured chat, with link previews disabled.
///
/// # Errors
///
/// Returns an error if the request cannot be sent or the API rejects it.
pub async fn send_message(creds: &TelegramCredentials, text: &str) -> Result<()> {
    let chat_id = creds.chat_id.to_string();
    Client::new()
        .post(send_message_url(&creds.bot_id))
        .query(&[
            ("chat_id", chat_id.as_str()),
            ("disable_web_page_preview", "true"),
            ("text", text),
        ])
        .send()
        .await?
        .error_for_status()?;

    debug!("Telegram message of {} chars sent", text.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        assert_eq!(
            send_message_url("12345:ABC-token"),
            "https://api.telegram.org/bot12345:ABC-token/sendMessage"
        );
    }
}
