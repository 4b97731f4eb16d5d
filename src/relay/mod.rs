//! Relay core: admission filter and facet forwarding pipeline.
//!
//! The core only talks to the chat platform through three traits:
//! - [`ConduitResolver`] — turns a [`ConduitId`] into a sendable handle
//! - [`Conduit`] — sends text, files and embed batches
//! - [`AttachmentFetcher`] — downloads attachment bytes
//!
//! The serenity-backed implementations live in [`crate::discord::client`].

use std::sync::Arc;

use async_trait::async_trait;

pub mod event;
pub mod gatekeeper;
pub mod pipeline;
pub mod worker;

pub use event::{Attachment, Author, ConduitId, Embed, InboundEvent, OutboundFile, UserId};
pub use gatekeeper::{admit, Gatekeeper};
pub use pipeline::{
    render_content, AttachmentOutcome, FacetOutcome, FacetReport, RelayPipeline, RelayReport,
};
pub use worker::{run_worker, WorkerStats};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single relay step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// The target conduit could not be resolved.
    #[error("could not find target channel with ID {0}")]
    ConduitNotFound(ConduitId),
    /// Sending to the platform failed (network, permissions, limits).
    #[error("send failed: {0}")]
    Transport(String),
    /// Downloading attachment bytes failed.
    #[error("download failed: {0}")]
    Fetch(String),
    /// An embed could not be converted into the platform's format.
    #[error("invalid embed: {0}")]
    InvalidEmbed(String),
}

// ---------------------------------------------------------------------------
// Client-layer seams
// ---------------------------------------------------------------------------

/// A resolved destination conduit.
#[async_trait]
pub trait Conduit: Send + Sync {
    /// Identifier this handle was resolved from.
    fn id(&self) -> ConduitId;

    /// Post a plain text message.
    async fn send_text(&self, text: &str) -> Result<(), RelayError>;

    /// Post a single file.
    async fn send_file(&self, file: OutboundFile) -> Result<(), RelayError>;

    /// Post all embeds in one message, preserving order.
    async fn send_embeds(&self, embeds: &[Embed]) -> Result<(), RelayError>;
}

/// Resolves conduit identifiers to sendable handles.
#[async_trait]
pub trait ConduitResolver: Send + Sync {
    /// Look up a conduit.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ConduitNotFound`] when the conduit does not
    /// exist or is not visible to the relay.
    async fn resolve(&self, id: ConduitId) -> Result<Arc<dyn Conduit>, RelayError>;
}

/// Downloads attachment contents.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Fetch the full byte stream of `attachment`.
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, RelayError>;
}
