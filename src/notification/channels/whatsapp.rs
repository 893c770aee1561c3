//! WhatsApp channel (wa.me click-to-chat links)

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::notification::channel::DeepLinkChannel;

pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Bytes escaped in the `text` query value
///
/// Same unreserved set as JavaScript's `encodeURIComponent`, so spaces become
/// `%20` rather than `+`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// WhatsApp channel configuration
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Link base, without trailing slash
    pub base_url: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// WhatsApp channel
#[derive(Debug, Clone, Default)]
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config: WhatsAppConfig { base_url },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

/// Keep only ASCII digits: `"+54 9 11-1234"` → `"549111234"`
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Percent-encode a query component like `encodeURIComponent`
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

impl DeepLinkChannel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn normalize_recipient(&self, raw: &str) -> String {
        normalize_phone(raw)
    }

    fn link(&self, recipient: &str, text: &str) -> String {
        format!("{}/{}?text={}", self.config.base_url, recipient, encode_component(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_keeps_digits_only() {
        assert_eq!(normalize_phone("+54 9 11-12345"), "5491112345");
        assert_eq!(normalize_phone("(011) 4555.1234"), "01145551234");
        assert_eq!(normalize_phone("sin teléfono"), "");
        assert_eq!(normalize_phone("١٢٣"), "");
    }

    #[test]
    fn test_encode_component_matches_js() {
        assert_eq!(encode_component("Hola Ana!"), "Hola%20Ana!");
        assert_eq!(encode_component("a&b=c?d/e"), "a%26b%3Dc%3Fd%2Fe");
        assert_eq!(encode_component("días"), "d%C3%ADas");
        assert_eq!(encode_component("(ok)*'~-_."), "(ok)*'~-_.");
        assert_eq!(encode_component("10:00 a 12:00"), "10%3A00%20a%2012%3A00");
        assert_eq!(encode_component("+\n"), "%2B%0A");
    }

    #[test]
    fn test_link_shape() {
        let channel = WhatsAppChannel::default();
        let msg = channel.message("+54 9 11-12345", "Buenas tardes Ana".to_string());
        assert_eq!(msg.link, "https://wa.me/5491112345?text=Buenas%20tardes%20Ana");
        assert_eq!(msg.text, "Buenas tardes Ana");
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let channel = WhatsAppChannel::new(WhatsAppConfig {
            base_url: "https://api.whatsapp.com/send/".to_string(),
        });
        assert_eq!(channel.base_url(), "https://api.whatsapp.com/send");
        assert_eq!(channel.link("123", "hi"), "https://api.whatsapp.com/send/123?text=hi");
    }
}
