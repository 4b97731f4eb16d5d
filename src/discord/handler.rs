//! Discord event handler for serenity.
//!
//! Implements the EventHandler trait: admission happens here, relaying
//! happens on the worker fed through `queue`.

use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::convert::admitted_event;
use crate::relay::{ConduitId, Gatekeeper, InboundEvent, UserId};

/// Handler for Discord gateway events.
pub struct RelayHandler {
    gatekeeper: Gatekeeper,
    target: ConduitId,
    queue: mpsc::Sender<InboundEvent>,
}

impl RelayHandler {
    /// Create a handler admitting events from `gatekeeper`'s source channel.
    pub fn new(gatekeeper: Gatekeeper, target: ConduitId, queue: mpsc::Sender<InboundEvent>) -> Self {
        Self {
            gatekeeper,
            target,
            queue,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(bot_name = %ready.user.name, "bot is ready");
        info!(
            source_channel = %self.gatekeeper.source(),
            target_channel = %self.target,
            "forwarding messages"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let self_id = UserId(ctx.cache.current_user().id.get());
        let Some(event) = admitted_event(&self.gatekeeper, &msg, self_id) else {
            return;
        };

        debug!(
            author = %event.author.name,
            attachments = event.attachments.len(),
            embeds = event.embeds.len(),
            "message admitted"
        );

        if let Err(e) = self.queue.send(event).await {
            warn!(error = %e, "relay queue closed, dropping message");
        }
    }
}
