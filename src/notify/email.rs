// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML email over SMTP.
//!
//! Speaks the SMTP dialogue directly over a TCP stream to a fixed relay, the
//! way a cron script talks to the local smarthost. The message body is a
//! MIME multipart document with a single HTML part; `fixed_width` wraps the
//! body in `<pre>` for tabular command output.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{error, info};

use crate::error::{OpsError, Result};

const MIME_BOUNDARY: &str = "=-homeops-part";

/// Where and how to reach the SMTP relay.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Relay address, `host:port`.
    pub relay: String,
    /// Name announced in the HELO command.
    pub helo_name: String,
    /// Bound on the TCP connect.
    pub connect_timeout: Duration,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            relay: "10.0.0.2:25".to_string(),
            helo_name: "localhost".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl EmailConfig {
    /// Create a configuration for a specific relay.
    #[must_use]
    pub fn new(relay: impl Into<String>) -> Self {
        Self {
            relay: relay.into(),
            ..Self::default()
        }
    }

    /// Set the HELO name.
    #[must_use]
    pub fn with_helo_name(mut self, name: impl Into<String>) -> Self {
        self.helo_name = name.into();
        self
    }
}

/// An email to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Sender address, also used as the envelope sender.
    pub from: String,
    /// Comma-separated recipient header; each entry becomes an envelope
    /// recipient.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body: String,
    /// Wrap the body in `<pre>` to preserve fixed-width formatting.
    pub fixed_width: bool,
}

impl EmailMessage {
    /// Create a message.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            fixed_width: false,
        }
    }

    /// Enable or disable fixed-width rendering.
    #[must_use]
    pub fn fixed_width(mut self, enabled: bool) -> Self {
        self.fixed_width = enabled;
        self
    }

    /// Envelope recipients parsed from the comma-separated `To` header.
    #[must_use]
    pub fn envelope_recipients(&self) -> Vec<String> {
        self.to
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Render the full message with MIME headers, CRLF line endings.
    #[must_use]
    pub fn to_mime(&self) -> String {
        let body = if self.fixed_width {
            format!("<pre>{}</pre>", self.body)
        } else {
            self.body.clone()
        };

        let mut msg = String::new();
        msg.push_str(&format!("From: {}\r\n", self.from));
        msg.push_str(&format!("To: {}\r\n", self.to));
        msg.push_str(&format!("Subject: {}\r\n", self.subject));
        msg.push_str("MIME-Version: 1.0\r\n");
        msg.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{MIME_BOUNDARY}\"\r\n"
        ));
        msg.push_str("\r\n");
        msg.push_str(&format!("--{MIME_BOUNDARY}\r\n"));
        msg.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
        msg.push_str("Content-Transfer-Encoding: 8bit\r\n");
        msg.push_str("\r\n");
        msg.push_str(&body);
        msg.push_str("\r\n");
        msg.push_str(&format!("--{MIME_BOUNDARY}--\r\n"));
        msg
    }
}

/// Send the message through the configured relay.
///
/// Headers and the outcome are logged; failures come back as typed errors
/// after being logged at error level.
pub async fn send_email(config: &EmailConfig, message: &EmailMessage) -> Result<()> {
    info!("Subject: {:?}", message.subject);
    info!("From: {}", message.from);
    info!("To: {}", message.to);
    info!("Body length: {}", message.body.len());

    let result = async {
        let mut session = SmtpSession::connect(config).await?;
        session.send(message).await?;
        session.quit().await
    }
    .await;

    match result {
        Ok(()) => {
            info!("Success.");
            Ok(())
        }
        Err(e) => {
            error!("Sending email failed: {e}");
            Err(e)
        }
    }
}

/// One SMTP conversation: greeting, HELO, envelope, DATA, QUIT.
struct SmtpSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl SmtpSession {
    async fn connect(config: &EmailConfig) -> Result<Self> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(&config.relay))
            .await
            .map_err(|_| OpsError::ConnectTimeout(config.relay.clone(), config.connect_timeout))?
            .map_err(|e| match e.kind() {
                ErrorKind::ConnectionRefused => OpsError::ConnectionRefused(config.relay.clone()),
                _ => OpsError::Connection(config.relay.clone(), e.to_string()),
            })?;

        let (read_half, writer) = stream.into_split();
        let mut session = Self {
            reader: BufReader::new(read_half),
            writer,
        };
        session.expect(220).await?;
        session
            .command(&format!("HELO {}", config.helo_name), 250)
            .await?;
        Ok(session)
    }

    async fn send(&mut self, message: &EmailMessage) -> Result<()> {
        self.command(&format!("MAIL FROM:<{}>", message.from), 250)
            .await?;
        for rcpt in message.envelope_recipients() {
            self.command(&format!("RCPT TO:<{rcpt}>"), 250).await?;
        }
        self.command("DATA", 354).await?;

        // Dot-stuff the payload and terminate with the lone-dot line.
        let mut data = String::new();
        for line in message.to_mime().split("\r\n") {
            if line.starts_with('.') {
                data.push('.');
            }
            data.push_str(line);
            data.push_str("\r\n");
        }
        data.push_str(".\r\n");

        self.writer.write_all(data.as_bytes()).await?;
        self.expect(250).await
    }

    async fn quit(&mut self) -> Result<()> {
        self.command("QUIT", 221).await
    }

    async fn command(&mut self, line: &str, expected: u16) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.expect(expected).await
    }

    /// Read one (possibly multi-line) reply and check its code.
    async fn expect(&mut self, expected: u16) -> Result<()> {
        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).await?;
            if n == 0 {
                return Err(OpsError::SmtpReply {
                    code: 0,
                    line: "connection closed".to_string(),
                });
            }
            let reply = line.trim_end();
            let code: u16 = reply
                .get(..3)
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| OpsError::SmtpReply {
                    code: 0,
                    line: reply.to_string(),
                })?;
            // A dash after the code marks a continuation line.
            if reply.as_bytes().get(3) == Some(&b'-') {
                continue;
            }
            if code != expected {
                return Err(OpsError::SmtpReply {
                    code,
                    line: reply.to_string(),
                });
            }
            return Ok(());
        }
    }
}
