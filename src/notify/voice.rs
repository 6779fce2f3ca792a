// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice calls through the Twilio Calls API.
//!
//! See <https://www.twilio.com/docs/voice/api/call-resource>.

use reqwest::Client;
use tracing::info;

use crate::config::VoiceCredentials;
use crate::error::Result;

/// A call to place: who to ring and what to say.
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// Number to call, E.164 form.
    pub to: String,
    /// Caller number; falls back to the credentials file's `from`.
    pub from: Option<String>,
    /// Text spoken when the call is answered.
    pub message: String,
}

impl CallRequest {
    /// Create a request with the default caller number.
    #[must_use]
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            message: message.into(),
        }
    }

    /// Override the caller number.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// TwiML document instructing the call to speak the message.
    #[must_use]
    pub fn twiml(&self) -> String {
        format!("<Response><Say>{}</Say></Response>", self.message)
    }
}

fn calls_url(sid: &str) -> String {
    format!("https://api.twilio.com/2010-04-01/Accounts/{sid}/Calls.json")
}

/// Place the call.
///
/// # Errors
///
/// Returns an error if the request cannot be sent or the API rejects it.
pub async fn place_call(creds: &VoiceCredentials, request: &CallRequest) -> Result<()> {
    let from = request.from.clone().unwrap_or_else(|| creds.from.clone());
    let twiml = request.twiml();

    let response = Client::new()
        .post(calls_url(&creds.sid))
        .basic_auth(&creds.sid, Some(&creds.token))
        .form(&[
            ("From", from.as_str()),
            ("To", request.to.as_str()),
            ("Twiml", twiml.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    info!("Voice call to {} accepted: {}", request.to, response.status());
    Ok(())
}
