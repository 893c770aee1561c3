//! Deep-link channel trait definition

use serde::{Deserialize, Serialize};

/// Rendered notification ready to hand to the messaging app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Message text as the recipient will read it
    pub text: String,
    /// URL that opens the messaging app with `text` prefilled
    pub link: String,
}

/// A messaging channel reachable through a prefilled-message URL
///
/// Channels only build links. Opening the link and confirming delivery are
/// left to whoever consumes the [`OutboundMessage`].
pub trait DeepLinkChannel: Send + Sync {
    /// Channel name (used in logs)
    fn name(&self) -> &str;

    /// Canonical recipient address for this channel
    fn normalize_recipient(&self, raw: &str) -> String;

    /// Link for an already normalized recipient
    fn link(&self, recipient: &str, text: &str) -> String;

    /// Normalize then link
    fn message(&self, raw_recipient: &str, text: String) -> OutboundMessage {
        let recipient = self.normalize_recipient(raw_recipient);
        let link = self.link(&recipient, &text);
        OutboundMessage { text, link }
    }
}
