//! Line-delimited JSON transport.
//!
//! Each JSON-RPC message is a single line terminated by `\n`, as the MCP
//! stdio transport requires. Generic over reader/writer so tests can use
//! in-memory buffers.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl StdioTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next line, trimmed. Returns `None` on EOF.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read message")?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim().to_string();
        trace!(len = trimmed.len(), "read message");
        Ok(Some(trimmed))
    }

    /// Writes one message followed by `\n` and flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<()> {
        trace!(len = message.len(), "writing message");

        self.writer
            .write_all(message.as_bytes())
            .await
            .context("Failed to write message")?;
        self.writer
            .write_all(b"\n")
            .await
            .context("Failed to write message")?;
        self.writer.flush().await.context("Failed to flush output")?;

        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_read_lines_until_eof() {
        let input = b"{\"jsonrpc\":\"2.0\"}\n\n  second  \n";
        let mut transport = StdioTransport::new(Cursor::new(input.to_vec()), Vec::<u8>::new());

        assert_eq!(
            transport.read_line().await.unwrap(),
            Some("{\"jsonrpc\":\"2.0\"}".to_string())
        );
        assert_eq!(transport.read_line().await.unwrap(), Some(String::new()));
        assert_eq!(transport.read_line().await.unwrap(), Some("second".to_string()));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_appends_newline() {
        let mut transport = StdioTransport::new(Cursor::new(Vec::<u8>::new()), Vec::<u8>::new());
        transport.write_line("{\"ok\":true}").await.unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        assert_eq!(output, "{\"ok\":true}\n");
    }
}
