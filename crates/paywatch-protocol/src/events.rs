// Well-known push event names — must match dashboard client expectations.

/// Full history replay, sent once right after a connection is established.
pub const EXISTING_WEBHOOKS: &str = "existingWebhooks";

/// Single freshly ingested record, fanned out to every connected client.
pub const NEW_WEBHOOK: &str = "newWebhook";
