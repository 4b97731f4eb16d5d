//! Translation between serenity models and the relay's plain data.

use serenity::all::{CreateEmbed, Embed as DiscordEmbed, Message};
use tracing::warn;

use crate::relay::{
    Attachment, Author, ConduitId, Embed, Gatekeeper, InboundEvent, RelayError, UserId,
};

/// Build an [`InboundEvent`] from a live gateway message.
///
/// Embeds that fail to serialize are dropped with a warning; everything
/// else is copied as-is.
pub fn inbound_event(msg: &Message) -> InboundEvent {
    let attachments = msg
        .attachments
        .iter()
        .map(|a| Attachment {
            filename: a.filename.clone(),
            url: a.url.clone(),
            size: u64::from(a.size),
        })
        .collect();

    let embeds = msg
        .embeds
        .iter()
        .filter_map(|e| match serde_json::to_value(e) {
            Ok(value) => Some(Embed(value)),
            Err(err) => {
                warn!(message_id = %msg.id, error = %err, "dropping unserializable embed");
                None
            }
        })
        .collect();

    InboundEvent {
        author: Author {
            id: UserId(msg.author.id.get()),
            name: msg.author.name.clone(),
        },
        origin: ConduitId(msg.channel_id.get()),
        content: msg.content.clone(),
        attachments,
        embeds,
    }
}

/// Convert `msg` only if `gatekeeper` admits it.
///
/// Messages from other channels are dropped on their channel id alone, so
/// they are never copied or have their embeds serialized.
pub fn admitted_event(
    gatekeeper: &Gatekeeper,
    msg: &Message,
    self_identity: UserId,
) -> Option<InboundEvent> {
    if ConduitId(msg.channel_id.get()) != gatekeeper.source() {
        return None;
    }
    let event = inbound_event(msg);
    gatekeeper.admit(&event, self_identity).then_some(event)
}

/// Turn an opaque [`Embed`] back into a serenity embed builder.
///
/// # Errors
///
/// Returns [`RelayError::InvalidEmbed`] when the JSON does not describe a
/// Discord embed.
pub fn create_embed(embed: &Embed) -> Result<CreateEmbed, RelayError> {
    let parsed: DiscordEmbed = serde_json::from_value(embed.as_json().clone())
        .map_err(|e| RelayError::InvalidEmbed(e.to_string()))?;
    Ok(CreateEmbed::from(parsed))
}
