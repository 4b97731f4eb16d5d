//! Plain-data representation of an observed chat message.
//!
//! Nothing in here depends on the Discord SDK; the adapter in
//! [`crate::discord::convert`] builds these values from live serenity
//! objects.

use std::fmt;

/// Numeric identity of a chat account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric identifier of a conduit (channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConduitId(pub u64);

impl ConduitId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConduitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message author: identity plus the name shown in relayed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Unique account handle. Loop prevention compares this, never `name`.
    pub id: UserId,
    /// Display name used when rendering relayed content.
    pub name: String,
}

/// Reference to a platform-hosted file. Bytes are fetched at forward time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original filename; reused for the forwarded file.
    pub filename: String,
    /// Download URL.
    pub url: String,
    /// Size in bytes as advertised by the platform.
    pub size: u64,
}

/// Rich embed, kept as opaque JSON and passed through unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed(pub serde_json::Value);

impl Embed {
    /// Borrow the raw JSON object.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// One observed chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Who posted the message.
    pub author: Author,
    /// Conduit the message was posted in.
    pub origin: ConduitId,
    /// Text body, possibly empty.
    pub content: String,
    /// Attachments in arrival order.
    pub attachments: Vec<Attachment>,
    /// Embeds in arrival order.
    pub embeds: Vec<Embed>,
}

/// File payload handed to [`super::Conduit::send_file`].
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundFile {
    /// Name the file is posted under.
    pub filename: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl fmt::Debug for OutboundFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundFile")
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}
