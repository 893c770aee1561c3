//! Message formatter - turns a delivery row into a personalized message
//!
//! Steps:
//! 1. greeting from the local hour
//! 2. visit window string from the estimated visit time
//! 3. random template filled with the row values
//! 4. channel deep link with the recipient phone

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::channel::{DeepLinkChannel, OutboundMessage};
use super::channels::WhatsAppChannel;
use super::greeting::{Clock, Greeting};
use super::template::{fill, TemplateCatalog, TemplateVars};
use super::window::build_time_range_string;
use crate::manifest::DeliveryRow;

/// Message formatter
#[derive(Clone)]
pub struct MessageFormatter {
    catalog: TemplateCatalog,
    channel: Arc<dyn DeepLinkChannel>,
}

impl MessageFormatter {
    /// Built-in templates over WhatsApp
    pub fn new() -> Self {
        Self {
            catalog: TemplateCatalog::builtin(),
            channel: Arc::new(WhatsAppChannel::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_channel(mut self, channel: Arc<dyn DeepLinkChannel>) -> Self {
        self.channel = channel;
        self
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Render the message text for `row`
    pub fn render<R: Rng + ?Sized>(
        &self,
        row: &DeliveryRow,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> String {
        let greeting = Greeting::now(clock);
        let window = build_time_range_string(&row.estimated_visit_time, row.delivery_window_hours);
        let template = self.catalog.pick(rng);

        fill(
            template,
            &TemplateVars {
                greeting: greeting.as_str(),
                recipient: &row.recipient,
                client: &row.client,
                address: &row.address,
                window: &window,
            },
        )
    }

    /// Render the text and build the channel link
    ///
    /// No side effects: nothing is sent, the caller decides what to do with
    /// the link.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        row: &DeliveryRow,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> OutboundMessage {
        let text = self.render(row, clock, rng);
        let message = self.channel.message(&row.phone, text);

        debug!(
            channel = self.channel.name(),
            code = %row.code,
            text_len = message.text.len(),
            "Message composed"
        );

        message
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageFormatter")
            .field("templates", &self.catalog.len())
            .field("channel", &self.channel.name())
            .finish()
    }
}
