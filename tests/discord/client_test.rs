//! Tests for `src/discord/client.rs` that need no network.

use std::sync::Arc;

use serenity::all::Http;

use discord_relay::discord::client::DiscordResolver;
use discord_relay::relay::{ConduitId, ConduitResolver, RelayError};

#[tokio::test]
async fn zero_channel_id_is_not_found_without_a_lookup() {
    let resolver = DiscordResolver::new(Arc::new(Http::new("unused-token")));

    let result = resolver.resolve(ConduitId(0)).await;

    assert!(matches!(
        result,
        Err(RelayError::ConduitNotFound(ConduitId(0)))
    ));
}
