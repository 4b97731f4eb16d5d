//! Facet forwarding: content, then attachments, then embeds.
//!
//! Each facet is its own failure domain. A failed content send does not stop
//! attachments, a failed attachment does not stop the next one, and neither
//! stops the embed batch. Every failure is logged once and recorded in the
//! returned [`FacetReport`].

use std::sync::Arc;

use tracing::{debug, error};

use super::event::{Attachment, ConduitId, InboundEvent, OutboundFile};
use super::{AttachmentFetcher, Conduit, ConduitResolver, RelayError};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Result of one facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetOutcome {
    /// Nothing to forward.
    Skipped,
    /// Forwarded successfully.
    Sent,
    /// Forwarding failed; already logged.
    Failed(RelayError),
}

impl FacetOutcome {
    /// Returns `true` for [`FacetOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of forwarding a single attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentOutcome {
    /// Original filename.
    pub filename: String,
    /// Whether it was sent.
    pub outcome: FacetOutcome,
}

/// Per-facet results for one forwarded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetReport {
    /// Text content.
    pub content: FacetOutcome,
    /// One entry per attachment, in arrival order.
    pub attachments: Vec<AttachmentOutcome>,
    /// Embed batch.
    pub embeds: FacetOutcome,
}

impl FacetReport {
    /// Number of failed facets, counting each attachment separately.
    pub fn failure_count(&self) -> usize {
        let attachments = self
            .attachments
            .iter()
            .filter(|a| a.outcome.is_failed())
            .count();
        attachments
            + usize::from(self.content.is_failed())
            + usize::from(self.embeds.is_failed())
    }

    /// Returns `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Filenames of attachments that failed, in arrival order.
    pub fn failed_attachments(&self) -> Vec<&str> {
        self.attachments
            .iter()
            .filter(|a| a.outcome.is_failed())
            .map(|a| a.filename.as_str())
            .collect()
    }
}

/// Result of [`RelayPipeline::relay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReport {
    /// The target could not be resolved; no facet was attempted.
    Abandoned(RelayError),
    /// Facets were attempted.
    Forwarded(FacetReport),
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Render the relayed text line for `content` posted by `author_name`.
pub fn render_content(author_name: &str, content: &str) -> String {
    format!("**{author_name}**: {content}")
}

/// Forwards admitted events to the target conduit.
#[derive(Clone)]
pub struct RelayPipeline {
    target: ConduitId,
    resolver: Arc<dyn ConduitResolver>,
    fetcher: Arc<dyn AttachmentFetcher>,
}

impl RelayPipeline {
    /// Create a pipeline that relays into `target`.
    pub fn new(
        target: ConduitId,
        resolver: Arc<dyn ConduitResolver>,
        fetcher: Arc<dyn AttachmentFetcher>,
    ) -> Self {
        Self {
            target,
            resolver,
            fetcher,
        }
    }

    /// Resolve the target, then forward every facet of `event`.
    ///
    /// Never fails: a resolution error abandons the event, facet errors are
    /// contained. Both are logged and reported.
    pub async fn relay(&self, event: &InboundEvent) -> RelayReport {
        let conduit = match self.resolver.resolve(self.target).await {
            Ok(conduit) => conduit,
            Err(e) => {
                error!(target_channel = %self.target, error = %e, "could not resolve target channel");
                return RelayReport::Abandoned(e);
            }
        };

        RelayReport::Forwarded(self.forward(event, conduit.as_ref()).await)
    }

    /// Forward `event` to an already-resolved conduit.
    pub async fn forward(&self, event: &InboundEvent, conduit: &dyn Conduit) -> FacetReport {
        let content = forward_content(event, conduit).await;

        let mut attachments = Vec::with_capacity(event.attachments.len());
        for attachment in &event.attachments {
            let outcome = match self.fetch_and_send(attachment, conduit).await {
                Ok(()) => {
                    debug!(
                        filename = %attachment.filename,
                        size = attachment.size,
                        "forwarded attachment"
                    );
                    FacetOutcome::Sent
                }
                Err(e) => {
                    error!(
                        target_channel = %conduit.id(),
                        filename = %attachment.filename,
                        size = attachment.size,
                        error = %e,
                        "failed to forward attachment"
                    );
                    FacetOutcome::Failed(e)
                }
            };
            attachments.push(AttachmentOutcome {
                filename: attachment.filename.clone(),
                outcome,
            });
        }

        let embeds = forward_embeds(event, conduit).await;

        FacetReport {
            content,
            attachments,
            embeds,
        }
    }

    async fn fetch_and_send(
        &self,
        attachment: &Attachment,
        conduit: &dyn Conduit,
    ) -> Result<(), RelayError> {
        let data = self.fetcher.fetch(attachment).await?;
        conduit
            .send_file(OutboundFile {
                filename: attachment.filename.clone(),
                data,
            })
            .await
    }
}

async fn forward_content(event: &InboundEvent, conduit: &dyn Conduit) -> FacetOutcome {
    if event.content.is_empty() {
        return FacetOutcome::Skipped;
    }

    let author = &event.author.name;
    let line = render_content(author, &event.content);
    match conduit.send_text(&line).await {
        Ok(()) => {
            debug!(author = %author, "forwarded message content");
            FacetOutcome::Sent
        }
        Err(e) => {
            error!(
                target_channel = %conduit.id(),
                author = %author,
                error = %e,
                "failed to forward message content"
            );
            FacetOutcome::Failed(e)
        }
    }
}

async fn forward_embeds(event: &InboundEvent, conduit: &dyn Conduit) -> FacetOutcome {
    if event.embeds.is_empty() {
        return FacetOutcome::Skipped;
    }

    match conduit.send_embeds(&event.embeds).await {
        Ok(()) => {
            debug!(count = event.embeds.len(), "forwarded embeds");
            FacetOutcome::Sent
        }
        Err(e) => {
            error!(
                target_channel = %conduit.id(),
                count = event.embeds.len(),
                error = %e,
                "failed to forward embeds"
            );
            FacetOutcome::Failed(e)
        }
    }
}
