//! Notify session - the single owner of a loaded batch
//!
//! Holds the rows of the current manifest together with their
//! [`NotifyBoard`]. Loading another manifest replaces both wholesale; tickets
//! still in flight for the old batch are ignored when they arrive.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::manifest::{load_manifest, DeliveryRow, LoadOptions, ManifestError};
use crate::notification::{
    Clock, CooldownScope, CooldownTicket, IgnoreReason, MessageFormatter, NotificationState,
    NotifyBoard, NotifyOutcome, OutboundMessage, Scheduler, SystemClock, WhatsAppChannel,
    WhatsAppConfig,
};

/// Notify settings that survive a reload
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub load: LoadOptions,
    pub scope: CooldownScope,
    pub cooldown: std::time::Duration,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            load: config.load_options(),
            scope: config.cooldown_scope,
            cooldown: config.cooldown(),
        }
    }
}

/// Result of a notify request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyReply {
    /// Row marked sent; open `message.link` to deliver it
    Sent(OutboundMessage),
    Ignored(IgnoreReason),
}

/// Session over one loaded manifest
pub struct Session {
    settings: SessionSettings,
    rows: Vec<DeliveryRow>,
    board: NotifyBoard,
    formatter: MessageFormatter,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl Session {
    /// Session over already normalized rows
    pub fn new(rows: Vec<DeliveryRow>, settings: SessionSettings) -> Self {
        let board = NotifyBoard::with_cooldown(rows.len(), settings.scope, settings.cooldown);
        Self {
            settings,
            rows,
            board,
            formatter: MessageFormatter::new(),
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
        }
    }

    /// Parse `bytes` and start a session over the result
    pub fn load(bytes: &[u8], settings: SessionSettings) -> Result<Self, ManifestError> {
        let rows = load_manifest(bytes, &settings.load)?;
        Ok(Self::new(rows, settings))
    }

    /// Build the session, formatter and clock from config
    pub fn from_config(bytes: &[u8], config: &AppConfig) -> Result<Self, ManifestError> {
        let formatter = MessageFormatter::new()
            .with_catalog(config.catalog())
            .with_channel(Arc::new(WhatsAppChannel::new(WhatsAppConfig {
                base_url: config.channel_base_url.clone(),
            })));
        Ok(Self::load(bytes, SessionSettings::from(config))?.with_formatter(formatter))
    }

    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fix the template choice sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace rows and notification state with a new manifest
    ///
    /// On failure the current batch is kept untouched.
    pub fn reload(&mut self, bytes: &[u8]) -> Result<usize, ManifestError> {
        let rows = match load_manifest(bytes, &self.settings.load) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "Reload failed, keeping current batch");
                return Err(err);
            }
        };
        self.board =
            NotifyBoard::with_cooldown(rows.len(), self.settings.scope, self.settings.cooldown);
        self.rows = rows;
        info!(rows = self.rows.len(), batch = self.board.batch(), "Batch replaced");
        Ok(self.rows.len())
    }

    pub fn rows(&self) -> &[DeliveryRow] {
        &self.rows
    }

    pub fn board(&self) -> &NotifyBoard {
        &self.board
    }

    pub fn state(&self, row: usize) -> NotificationState {
        self.board.state(row)
    }

    pub fn can_notify(&self, row: usize) -> bool {
        self.board.can_notify(row)
    }

    /// Message for `row` without touching notification state
    pub fn preview(&mut self, row: usize) -> Option<OutboundMessage> {
        let delivery = self.rows.get(row)?;
        Some(self.formatter.compose(delivery, self.clock.as_ref(), &mut self.rng))
    }

    /// Notify `row`: render its message, mark it sent and schedule the cooldown
    pub fn notify(&mut self, row: usize, scheduler: &dyn Scheduler) -> NotifyReply {
        self.notify_at(row, Instant::now(), scheduler)
    }

    pub fn notify_at(
        &mut self,
        row: usize,
        now: Instant,
        scheduler: &dyn Scheduler,
    ) -> NotifyReply {
        let Some(delivery) = self.rows.get(row) else {
            return NotifyReply::Ignored(IgnoreReason::UnknownRow);
        };
        if let Some(reason) = self.board.check(row) {
            return NotifyReply::Ignored(reason);
        }

        let message = self.formatter.compose(delivery, self.clock.as_ref(), &mut self.rng);
        match self.board.notify(row, now) {
            NotifyOutcome::Fired(ticket) => {
                scheduler.schedule(ticket);
                NotifyReply::Sent(message)
            }
            NotifyOutcome::Ignored(reason) => NotifyReply::Ignored(reason),
        }
    }

    /// Apply a ticket delivered by the scheduler
    pub fn release(&mut self, ticket: CooldownTicket) -> bool {
        self.release_at(ticket, Instant::now())
    }

    pub fn release_at(&mut self, ticket: CooldownTicket, now: Instant) -> bool {
        self.board.release(ticket, now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("rows", &self.rows.len())
            .field("board", &self.board)
            .field("formatter", &self.formatter)
            .finish()
    }
}
