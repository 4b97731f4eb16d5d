//! Tests for `src/relay/pipeline.rs` — facet forwarding and failure isolation.

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::json;

use discord_relay::relay::{
    render_content, Embed, FacetOutcome, RelayError, RelayPipeline, RelayReport,
};

use crate::mock::{attachment, event, MockConduit, MockFetcher, MockResolver, Sent, TARGET};

fn pipeline(conduit: Arc<MockConduit>, fetcher: MockFetcher) -> RelayPipeline {
    RelayPipeline::new(
        TARGET,
        Arc::new(MockResolver::with(conduit)),
        Arc::new(fetcher),
    )
}

fn forwarded(report: RelayReport) -> discord_relay::relay::FacetReport {
    match report {
        RelayReport::Forwarded(report) => report,
        RelayReport::Abandoned(e) => panic!("expected forwarded report, got abandoned: {e}"),
    }
}

#[test]
fn content_is_rendered_with_bold_author() {
    assert_eq!(render_content("alice", "hello"), "**alice**: hello");
}

#[tokio::test]
async fn text_message_is_forwarded_once() {
    let conduit = Arc::new(MockConduit::default());
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let report = forwarded(relay.relay(&event(42, "alice", "hello")).await);

    assert_eq!(conduit.sent(), vec![Sent::Text("**alice**: hello".to_owned())]);
    assert_eq!(report.content, FacetOutcome::Sent);
    assert_eq!(report.embeds, FacetOutcome::Skipped);
    assert!(report.attachments.is_empty());
    assert!(report.is_clean());
}

#[tokio::test]
async fn failing_attachment_does_not_block_the_others() {
    let conduit = Arc::new(MockConduit {
        fail_files: HashSet::from(["b.png".to_owned()]),
        ..MockConduit::default()
    });
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let mut ev = event(42, "alice", "");
    ev.attachments = vec![attachment("a.png"), attachment("b.png"), attachment("c.png")];

    let report = forwarded(relay.relay(&ev).await);

    assert_eq!(
        conduit.sent(),
        vec![
            Sent::File {
                filename: "a.png".to_owned(),
                data: b"a.png".to_vec(),
            },
            Sent::File {
                filename: "c.png".to_owned(),
                data: b"c.png".to_vec(),
            },
        ]
    );
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.failed_attachments(), vec!["b.png"]);
    assert_eq!(report.content, FacetOutcome::Skipped);
}

#[tokio::test]
async fn failed_download_is_reported_per_attachment() {
    let conduit = Arc::new(MockConduit::default());
    let fetcher = MockFetcher {
        fail: HashSet::from(["gone.pdf".to_owned()]),
        ..MockFetcher::default()
    };
    let relay = pipeline(Arc::clone(&conduit), fetcher);

    let mut ev = event(42, "alice", "");
    ev.attachments = vec![attachment("gone.pdf"), attachment("kept.pdf")];

    let report = forwarded(relay.relay(&ev).await);

    assert_eq!(report.failed_attachments(), vec!["gone.pdf"]);
    assert!(matches!(
        report.attachments[0].outcome,
        FacetOutcome::Failed(RelayError::Fetch(_))
    ));
    assert_eq!(report.attachments[1].outcome, FacetOutcome::Sent);
    assert_eq!(conduit.sent().len(), 1);
}

#[tokio::test]
async fn embed_only_message_sends_one_batch() {
    let conduit = Arc::new(MockConduit::default());
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let embed = Embed(json!({"title": "Build passed", "description": "main @ 1a2b3c"}));
    let mut ev = event(42, "ci-bot", "");
    ev.embeds = vec![embed.clone()];

    let report = forwarded(relay.relay(&ev).await);

    assert_eq!(conduit.sent(), vec![Sent::Embeds(vec![embed])]);
    assert_eq!(report.content, FacetOutcome::Skipped);
    assert!(report.attachments.is_empty());
    assert_eq!(report.embeds, FacetOutcome::Sent);
}

#[tokio::test]
async fn embeds_keep_their_order_in_one_call() {
    let conduit = Arc::new(MockConduit::default());
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let embeds = vec![
        Embed(json!({"title": "first"})),
        Embed(json!({"title": "second"})),
        Embed(json!({"title": "third"})),
    ];
    let mut ev = event(42, "alice", "");
    ev.embeds = embeds.clone();

    relay.relay(&ev).await;

    assert_eq!(conduit.sent(), vec![Sent::Embeds(embeds)]);
}

#[tokio::test]
async fn unresolvable_target_abandons_the_event() {
    let conduit = Arc::new(MockConduit::default());
    let resolver = Arc::new(MockResolver::missing());
    let fetcher = Arc::new(MockFetcher::default());
    let relay = RelayPipeline::new(TARGET, resolver.clone(), fetcher.clone());

    let mut ev = event(42, "alice", "hello");
    ev.attachments = vec![attachment("a.png")];
    ev.embeds = vec![Embed(json!({"title": "x"}))];

    let report = relay.relay(&ev).await;

    assert_eq!(report, RelayReport::Abandoned(RelayError::ConduitNotFound(TARGET)));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    assert!(conduit.sent().is_empty());
    assert!(fetcher.fetched.lock().expect("fetched lock").is_empty());
}

#[tokio::test]
async fn content_failure_still_forwards_attachments_and_embeds() {
    let conduit = Arc::new(MockConduit {
        fail_text: true,
        ..MockConduit::default()
    });
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let embed = Embed(json!({"title": "x"}));
    let mut ev = event(42, "alice", "hello");
    ev.attachments = vec![attachment("a.png")];
    ev.embeds = vec![embed.clone()];

    let report = forwarded(relay.relay(&ev).await);

    assert!(report.content.is_failed());
    assert_eq!(report.failure_count(), 1);
    assert_eq!(
        conduit.sent(),
        vec![
            Sent::File {
                filename: "a.png".to_owned(),
                data: b"a.png".to_vec(),
            },
            Sent::Embeds(vec![embed]),
        ]
    );
}

#[tokio::test]
async fn facets_are_sent_content_then_files_then_embeds() {
    let conduit = Arc::new(MockConduit::default());
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let embed = Embed(json!({"title": "x"}));
    let mut ev = event(42, "alice", "look");
    ev.attachments = vec![attachment("one.jpg"), attachment("two.jpg")];
    ev.embeds = vec![embed.clone()];

    relay.relay(&ev).await;

    let kinds: Vec<&str> = conduit
        .sent()
        .iter()
        .map(|s| match s {
            Sent::Text(_) => "text",
            Sent::File { .. } => "file",
            Sent::Embeds(_) => "embeds",
        })
        .collect();
    assert_eq!(kinds, vec!["text", "file", "file", "embeds"]);
}

#[tokio::test]
async fn embed_failure_is_contained() {
    let conduit = Arc::new(MockConduit {
        fail_embeds: true,
        ..MockConduit::default()
    });
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let mut ev = event(42, "alice", "hello");
    ev.embeds = vec![Embed(json!({"title": "x"}))];

    let report = forwarded(relay.relay(&ev).await);

    assert_eq!(report.content, FacetOutcome::Sent);
    assert!(report.embeds.is_failed());
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn empty_message_sends_nothing() {
    let conduit = Arc::new(MockConduit::default());
    let relay = pipeline(Arc::clone(&conduit), MockFetcher::default());

    let report = forwarded(relay.relay(&event(42, "alice", "")).await);

    assert!(conduit.sent().is_empty());
    assert_eq!(report.content, FacetOutcome::Skipped);
    assert_eq!(report.embeds, FacetOutcome::Skipped);
    assert!(report.is_clean());
}

#[tokio::test]
async fn forward_uses_the_given_handle_without_resolving() {
    let conduit = Arc::new(MockConduit::default());
    let resolver = Arc::new(MockResolver::missing());
    let relay = RelayPipeline::new(
        TARGET,
        resolver.clone(),
        Arc::new(MockFetcher::default()),
    );

    let report = relay.forward(&event(42, "alice", "hi"), conduit.as_ref()).await;

    assert_eq!(report.content, FacetOutcome::Sent);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}
