use super::CheckOutcome;
use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

const QUIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Checks whether a mail exchange accepts a recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxProber: Send + Sync {
    async fn probe(&self, exchange: &str, email: &str) -> CheckOutcome;
}

/// Connection parameters for the SMTP probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeSettings {
    /// Address used in `MAIL FROM`
    pub sender: String,
    /// Name announced in `HELO`
    pub helo_name: String,
    pub port: u16,
    /// Upper bound for connect through the `RCPT TO` reply
    pub timeout: Duration,
}

impl Default for SmtpProbeSettings {
    fn default() -> Self {
        Self {
            sender: "verify@example.com".to_string(),
            helo_name: "example.com".to_string(),
            port: 25,
            timeout: Duration::from_secs(5),
        }
    }
}

/// A parsed SMTP reply. For multi-line replies `text` is the last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub text: String,
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

#[derive(Debug, Error)]
enum SmtpSessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("server refused the session: {0}")]
    Greeting(SmtpReply),
    #[error("malformed reply: {0:?}")]
    Malformed(String),
    #[error("connection closed by server")]
    Closed,
}

/// Probes mailboxes with a partial SMTP transaction:
/// `HELO`, `MAIL FROM`, `RCPT TO`, then `QUIT`. No message is sent.
///
/// The recipient counts as existing only if `RCPT TO` is answered with
/// exactly `250`. Replies to `HELO` and `MAIL FROM` are logged but do not
/// end the session early.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    settings: SmtpProbeSettings,
}

impl SmtpProber {
    pub fn new(settings: SmtpProbeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SmtpProbeSettings {
        &self.settings
    }

    /// Runs the transaction up to `RCPT TO` and hands back the open session
    /// together with the `RCPT TO` reply.
    async fn rcpt_reply(
        &self,
        exchange: &str,
        email: &str,
    ) -> Result<(SmtpSession, SmtpReply), SmtpSessionError> {
        let stream = TcpStream::connect((exchange, self.settings.port)).await?;
        let mut session = SmtpSession::new(stream);

        let greeting = session.read_reply().await?;
        if greeting.code != 220 {
            return Err(SmtpSessionError::Greeting(greeting));
        }

        let helo = session
            .command(&format!("HELO {}", self.settings.helo_name))
            .await?;
        debug!("{exchange}: HELO -> {helo}");

        let mail = session
            .command(&format!("MAIL FROM:<{}>", self.settings.sender))
            .await?;
        debug!("{exchange}: MAIL FROM -> {mail}");

        let rcpt = session.command(&format!("RCPT TO:<{email}>")).await?;
        debug!("{exchange}: RCPT TO <{email}> -> {rcpt}");

        Ok((session, rcpt))
    }
}

#[async_trait]
impl MailboxProber for SmtpProber {
    async fn probe(&self, exchange: &str, email: &str) -> CheckOutcome {
        let timeout = self.settings.timeout;
        let result = tokio::time::timeout(timeout, self.rcpt_reply(exchange, email))
            .await
            .unwrap_or(Err(SmtpSessionError::Timeout(timeout)));

        match result {
            Ok((mut session, reply)) => {
                // The verdict is already known; QUIT gets its own short bound
                // and its outcome is ignored.
                let quit_timeout = timeout.min(QUIT_TIMEOUT);
                if tokio::time::timeout(quit_timeout, session.command("QUIT"))
                    .await
                    .is_err()
                {
                    debug!("{exchange}: no reply to QUIT within {quit_timeout:?}");
                }

                if reply.code == 250 {
                    CheckOutcome::Passed(())
                } else {
                    CheckOutcome::Failed(reply.to_string())
                }
            }
            Err(error) => CheckOutcome::Unavailable(format!("{exchange}: {error}")),
        }
    }
}

struct SmtpSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl SmtpSession {
    fn new(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
        }
    }

    async fn command(&mut self, line: &str) -> Result<SmtpReply, SmtpSessionError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        self.read_reply().await
    }

    /// Reads lines until the final line of a reply (`250 ok`, not `250-...`).
    async fn read_reply(&mut self) -> Result<SmtpReply, SmtpSessionError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await? == 0 {
                return Err(SmtpSessionError::Closed);
            }

            let line = line.trim_end_matches(['\r', '\n']);
            let (code, is_last, text) = parse_reply_line(line)
                .ok_or_else(|| SmtpSessionError::Malformed(line.to_string()))?;
            if is_last {
                return Ok(SmtpReply {
                    code,
                    text: text.to_string(),
                });
            }
        }
    }
}

/// Splits `"250-text"` / `"250 text"` / `"250"` into code, last-line flag and
/// text.
fn parse_reply_line(line: &str) -> Option<(u16, bool, &str)> {
    let code = line.get(..3)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = code.parse().ok()?;

    match line.as_bytes().get(3) {
        None => Some((code, true, "")),
        Some(b' ') => Some((code, true, &line[4..])),
        Some(b'-') => Some((code, false, &line[4..])),
        Some(_) => None,
    }
}
