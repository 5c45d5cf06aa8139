//! Gateway: the event loop connecting channels, the pipeline, and commands.

mod pipeline;


pub use pipeline::{Pipeline, PipelineSettings};

use crate::commands::{self, Command, CommandContext};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tolk_core::{
    message::{CommandInvocation, Decision, InboundMessage, IncomingEvent, OutgoingMessage},
    traits::Channel,
};
use tracing::{debug, error, info, warn};

/// Routes events from every channel through the pipeline or command handler.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    pipeline: Pipeline,
}

impl Gateway {
    pub fn new(channels: HashMap<String, Arc<dyn Channel>>, pipeline: Pipeline) -> Self {
        Self { channels, pipeline }
    }

    /// Run the main event loop until ctrl-c or every channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "tolk gateway running | channels: {} | enrolled: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.pipeline.registry().snapshot().enrolled_count(),
        );

        let (tx, mut rx) = mpsc::channel::<(String, IncomingEvent)>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(event) = channel_rx.recv().await {
                    if tx.send((channel_name.clone(), event)).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        loop {
            tokio::select! {
                incoming = rx.recv() => {
                    let Some((channel_name, event)) = incoming else {
                        info!("all channels closed");
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch(&channel_name, event).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn shutdown(&self) {
        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }
        info!("tolk gateway stopped");
    }

    /// Handle one event from `channel_name`.
    pub(crate) async fn dispatch(&self, channel_name: &str, event: IncomingEvent) {
        let Some(channel) = self.channels.get(channel_name) else {
            error!("event from unknown channel {channel_name}");
            return;
        };
        match event {
            IncomingEvent::Message(msg) => self.handle_message(channel.as_ref(), msg).await,
            IncomingEvent::Command(inv) => self.handle_command(channel.as_ref(), inv).await,
        }
    }

    /// Run a chat message through the pipeline and post the translation.
    async fn handle_message(&self, channel: &dyn Channel, msg: InboundMessage) {
        let self_id = channel.self_id();
        let result = match self.pipeline.evaluate(&msg, self_id.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    "translation failed for message {} in {}: {e}",
                    msg.id, msg.channel_id
                );
                return;
            }
        };

        match result.decision {
            Decision::Suppressed(reason) => {
                debug!(
                    "suppressed message {} in {}: {reason}",
                    msg.id, msg.channel_id
                );
            }
            Decision::Emitted(text) => {
                info!("translated message {} in {}", msg.id, msg.channel_id);
                let out = OutgoingMessage {
                    channel_id: msg.channel_id.clone(),
                    text,
                    reply_to: None,
                };
                if let Err(e) = channel.send(out).await {
                    error!("failed to post translation to {}: {e}", msg.channel_id);
                }
            }
        }
    }

    /// Execute a configuration command and reply with its result.
    async fn handle_command(&self, channel: &dyn Channel, inv: CommandInvocation) {
        let reply = match Command::parse(&inv.text) {
            Some(cmd) => {
                let ctx = CommandContext {
                    registry: self.pipeline.registry(),
                    server_id: &inv.server_id,
                    text: &inv.text,
                };
                commands::handle(cmd, &ctx).await
            }
            None => commands::unknown_command(&inv.text),
        };

        info!(
            "command from {} on server {}: {}",
            inv.user_id,
            inv.server_id,
            inv.text.split_whitespace().next().unwrap_or_default()
        );

        let out = OutgoingMessage {
            channel_id: inv.channel_id.clone(),
            text: reply,
            reply_to: (!inv.id.is_empty()).then(|| inv.id.clone()),
        };
        if let Err(e) = channel.send(out).await {
            error!("failed to reply to command in {}: {e}", inv.channel_id);
        }
    }
}
