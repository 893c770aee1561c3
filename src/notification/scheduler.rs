//! Cooldown scheduling - deliver tickets back to the board owner
//!
//! Timers never touch board state. They only send the ticket through a
//! channel; the owner applies it with `NotifyBoard::release`, so the
//! transition cannot interleave with a concurrent notify.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tracing::debug;

use super::throttle::CooldownTicket;

/// Delays a ticket until its deadline
pub trait Scheduler: Send + Sync {
    /// Must return immediately
    fn schedule(&self, ticket: CooldownTicket);
}

/// Tokio timer task per ticket, delivered over an mpsc channel
///
/// `schedule` must be called from inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<CooldownTicket>,
}

impl TokioScheduler {
    /// Scheduler plus the receiving end the board owner listens on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CooldownTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, ticket: CooldownTicket) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep_until(ticket.deadline).await;
            if tx.send(ticket).is_err() {
                debug!(key = ?ticket.key, "Ticket receiver dropped");
            }
        });
    }
}

/// Records tickets for tests and step-by-step drivers
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<CooldownTicket>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every ticket scheduled so far
    pub fn drain(&self) -> Vec<CooldownTicket> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, ticket: CooldownTicket) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(ticket),
            Err(poisoned) => poisoned.into_inner().push(ticket),
        }
    }
}
