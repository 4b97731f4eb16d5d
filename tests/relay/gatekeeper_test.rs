//! Tests for `src/relay/gatekeeper.rs` — admission of observed events.

use discord_relay::relay::{admit, ConduitId, Gatekeeper, UserId};

use crate::mock::{event, BOT, SOURCE};

#[test]
fn own_messages_are_never_admitted() {
    let own = event(BOT.0, "relay-bot", "**alice**: hello");
    assert!(!admit(&own, BOT, SOURCE));
}

#[test]
fn other_channels_are_rejected_regardless_of_content() {
    let mut elsewhere = event(42, "alice", "hello");
    elsewhere.origin = ConduitId(999);
    assert!(!admit(&elsewhere, BOT, SOURCE));

    elsewhere.content.clear();
    assert!(!admit(&elsewhere, BOT, SOURCE));
}

#[test]
fn source_channel_messages_from_others_are_admitted() {
    assert!(admit(&event(42, "alice", "hello"), BOT, SOURCE));
}

#[test]
fn shared_display_name_does_not_suppress_other_accounts() {
    // Same name as the bot, different account.
    let impostor = event(7, "relay-bot", "hi");
    assert!(admit(&impostor, BOT, SOURCE));
}

#[test]
fn self_check_wins_over_channel_match() {
    let gatekeeper = Gatekeeper::new(SOURCE);
    let own = event(99, "relay-bot", "hello");
    assert!(!gatekeeper.admit(&own, UserId(99)));
    assert!(gatekeeper.admit(&own, UserId(1)));
}

#[test]
fn empty_events_are_still_admitted() {
    // Admission does not look at payloads; empty messages just forward nothing.
    assert!(Gatekeeper::new(SOURCE).admit(&event(42, "alice", ""), BOT));
}
