//! Streaming writer for the bar's JSON line protocol.
//!
//! The output is the header object immediately followed by an array that
//! grows by one element per status line:
//!
//! ```text
//! {"version":1}[[{"full_text":"A"}],[{"full_text":"B"}]]
//! ```
//!
//! The closing bracket is only written once every [`LineSender`] is dropped,
//! so while the producer is alive the document stays open.
//!
//! [`LineSender`]: crate::handoff::LineSender

use crate::error::{EncodeError, Result};
use crate::handoff::LineReceiver;
use crate::protocol::Header;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub struct StreamEncoder<W> {
    out: W,
    header: Header,
    write_timeout: Option<Duration>,
}

impl<W: AsyncWrite + Unpin> StreamEncoder<W> {
    pub fn new(out: W, header: Header) -> Self {
        Self {
            out,
            header,
            write_timeout: None,
        }
    }

    /// Bounds each write+flush so a stalled reader fails the stream instead
    /// of wedging it.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Writes the header, then every line received until the handoff ends,
    /// then the closing bracket. Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Any serialization failure, write failure or write timeout is terminal.
    /// The receiver is dropped on return, so a blocked producer observes the
    /// failure on its next send.
    pub async fn run(mut self, mut lines: LineReceiver) -> Result<u64> {
        let mut opening = serde_json::to_vec(&self.header)?;
        opening.push(b'[');
        self.write(&opening).await?;
        tracing::debug!(version = self.header.version, "Stream header written");

        let mut written: u64 = 0;
        let mut buf = Vec::new();
        while let Some(line) = lines.recv().await {
            buf.clear();
            if written > 0 {
                buf.push(b',');
            }
            serde_json::to_writer(&mut buf, &line)?;
            self.write(&buf).await?;
            written += 1;
            tracing::trace!(line = written, blocks = line.len(), "Status line written");
        }

        self.write(b"]").await?;
        tracing::debug!(lines = written, "Stream closed");
        Ok(written)
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let limit = self.write_timeout;
        let out = &mut self.out;
        let io = async move {
            out.write_all(bytes).await?;
            out.flush().await
        };
        match limit {
            Some(limit) => tokio::time::timeout(limit, io)
                .await
                .map_err(|_| EncodeError::WriteTimeout(limit))??,
            None => io.await?,
        }
        Ok(())
    }
}

/// Encodes the whole stream to `out` without a write bound.
///
/// # Errors
///
/// See [`StreamEncoder::run`].
pub async fn encode<W>(out: W, header: &Header, lines: LineReceiver) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    StreamEncoder::new(out, header.clone()).run(lines).await?;
    Ok(())
}
