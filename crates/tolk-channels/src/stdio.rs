//! JSON-lines bridge channel.
//!
//! A bridge process owns the real platform connection and speaks to tolk
//! over pipes: one [`IncomingEvent`] per line in, one [`OutgoingMessage`]
//! per line out.
//!
//! ```text
//! in:  {"type":"message","author_id":"u1","channel_id":"c1","server_id":"s1","text":"hola"}
//! in:  {"type":"command","id":"i1","user_id":"u1","channel_id":"c1","server_id":"s1","text":"/banword list"}
//! out: {"channel_id":"c1","text":"Translated: hello"}
//! ```

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tolk_core::{
    config::StdioConfig,
    error::TolkError,
    message::{IncomingEvent, OutgoingMessage},
    traits::Channel,
};
use tracing::{debug, info, warn};

type Reader = Box<dyn AsyncBufRead + Send + Unpin>;
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// Channel reading events from a line stream and writing posts to another.
pub struct StdioChannel {
    config: StdioConfig,
    /// Taken by `start`; a channel can only be started once.
    reader: Mutex<Option<Reader>>,
    writer: Mutex<Writer>,
}

impl StdioChannel {
    /// Bridge over the process's stdin and stdout.
    pub fn new(config: StdioConfig) -> Self {
        Self::with_io(
            config,
            Box::new(BufReader::new(tokio::io::stdin())),
            Box::new(tokio::io::stdout()),
        )
    }

    /// Bridge over arbitrary streams.
    pub fn with_io(config: StdioConfig, reader: Reader, writer: Writer) -> Self {
        Self {
            config,
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(writer),
        }
    }
}

/// Parse one input line. Blank lines yield `None`.
fn parse_line(line: &str) -> Result<Option<IncomingEvent>, TolkError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

#[async_trait]
impl Channel for StdioChannel {
    fn name(&self) -> &str {
        "stdio"
    }

    fn self_id(&self) -> Option<String> {
        Some(self.config.bot_id.clone())
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, TolkError> {
        let mut reader = self
            .reader
            .lock()
            .await
            .take()
            .ok_or_else(|| TolkError::Channel("stdio channel already started".into()))?;

        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(async move {
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        info!("stdio: input closed");
                        break;
                    }
                    Ok(_) => match parse_line(&line) {
                        Ok(Some(event)) => {
                            if tx.send(event).await.is_err() {
                                debug!("stdio: receiver dropped, stopping reader");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!("stdio: skipping malformed line: {e}"),
                    },
                    Err(e) => {
                        warn!("stdio: read failed: {e}");
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TolkError> {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TolkError::Channel(format!("stdio write failed: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| TolkError::Channel(format!("stdio flush failed: {e}")))?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), TolkError> {
        let mut writer = self.writer.lock().await;
        writer
            .flush()
            .await
            .map_err(|e| TolkError::Channel(format!("stdio flush failed: {e}")))?;
        info!("stdio channel stopped");
        Ok(())
    }
}
