//! Line-oriented transport
//!
//! Inbound lines look like `<user id> <text>`; each reply line is written as
//! `<user id>: <line>`.

use super::{Inbound, Transport};
use crate::models::UserId;
use crate::utils::TransportError;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::io::{Stdin, Stdout};
use tokio::sync::Mutex;

/// Transport over stdin/stdout
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

pub struct LineTransport<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer, e.g. to inspect what was sent
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}

/// Split `<user id> <text>`; `None` for lines that are not addressed to a user
pub fn parse_line(line: &str) -> Option<Inbound> {
    let (user, text) = line.trim().split_once(char::is_whitespace)?;
    let user = user.parse::<UserId>().ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(Inbound {
        user,
        text: text.to_string(),
    })
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&self) -> Result<Option<Inbound>, TransportError> {
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(TransportError::Receive)?;
            if read == 0 {
                return Ok(None);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Ignoring undecodable line ({}): {:?}", e, buf);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(inbound) => return Ok(Some(inbound)),
                None => tracing::warn!("Ignoring malformed line: {:?}", line),
            }
        }
    }

    async fn send(&self, user: UserId, text: &str) -> Result<(), TransportError> {
        let mut out = String::new();
        for line in text.lines() {
            out.push_str(&format!("{}: {}\n", user, line));
        }

        let mut writer = self.writer.lock().await;
        writer
            .write_all(out.as_bytes())
            .await
            .map_err(|source| TransportError::Send { user, source })?;
        writer
            .flush()
            .await
            .map_err(|source| TransportError::Send { user, source })
    }
}
