//! serenity/reqwest implementations of the relay's client-layer traits.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateAttachment, CreateMessage, Http};
use tracing::debug;

use super::convert::create_embed;
use crate::relay::{
    Attachment, AttachmentFetcher, Conduit, ConduitId, ConduitResolver, Embed, OutboundFile,
    RelayError,
};

/// Resolves channels with one REST lookup per event.
#[derive(Clone)]
pub struct DiscordResolver {
    http: Arc<Http>,
}

impl DiscordResolver {
    /// Create a resolver sharing the client's HTTP handle.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ConduitResolver for DiscordResolver {
    async fn resolve(&self, id: ConduitId) -> Result<Arc<dyn Conduit>, RelayError> {
        // ChannelId::new panics on zero.
        if id.get() == 0 {
            return Err(RelayError::ConduitNotFound(id));
        }
        let channel_id = ChannelId::new(id.get());

        if let Err(e) = self.http.get_channel(channel_id).await {
            debug!(channel = %id, error = %e, "channel lookup failed");
            return Err(RelayError::ConduitNotFound(id));
        }

        Ok(Arc::new(DiscordConduit {
            http: Arc::clone(&self.http),
            id,
            channel_id,
        }))
    }
}

/// A resolved Discord text channel.
pub struct DiscordConduit {
    http: Arc<Http>,
    id: ConduitId,
    channel_id: ChannelId,
}

#[async_trait]
impl Conduit for DiscordConduit {
    fn id(&self) -> ConduitId {
        self.id
    }

    async fn send_text(&self, text: &str) -> Result<(), RelayError> {
        self.channel_id
            .say(self.http.as_ref(), text)
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Transport(e.to_string()))
    }

    async fn send_file(&self, file: OutboundFile) -> Result<(), RelayError> {
        let attachment = CreateAttachment::bytes(file.data, file.filename);
        self.channel_id
            .send_message(self.http.as_ref(), CreateMessage::new().add_file(attachment))
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Transport(e.to_string()))
    }

    async fn send_embeds(&self, embeds: &[Embed]) -> Result<(), RelayError> {
        let builders = embeds
            .iter()
            .map(create_embed)
            .collect::<Result<Vec<_>, _>>()?;
        self.channel_id
            .send_message(self.http.as_ref(), CreateMessage::new().embeds(builders))
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Transport(e.to_string()))
    }
}

/// Downloads attachments from their CDN URL.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with its own connection pool.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, RelayError> {
        let response = self
            .client
            .get(&attachment.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RelayError::Fetch(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
