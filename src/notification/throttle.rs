//! Notify throttle - per-row sent/cooldown state machine
//!
//! Each row moves `Idle → Cooling → Ready` and never goes back:
//! - `Idle`: not notified yet
//! - `Cooling`: notified, cooldown running
//! - `Ready`: notified, cooldown over
//!
//! With [`CooldownScope::Global`] a notify also blocks every other row until
//! the cooldown ends. With [`CooldownScope::PerRow`] other rows stay
//! actionable.
//!
//! The board never sleeps. [`NotifyBoard::notify`] returns a
//! [`CooldownTicket`]; whoever owns the board hands it to a scheduler and
//! feeds it back through [`NotifyBoard::release`] once the deadline passes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

/// Default cooldown after a notify
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Longest accepted cooldown; longer values are clamped
pub const MAX_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

static NEXT_BATCH: AtomicU64 = AtomicU64::new(1);

/// Which rows a notify locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownScope {
    /// Every row waits, with a visible countdown
    #[default]
    Global,
    /// Only the notified row waits
    PerRow,
}

/// Flags of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NotificationState {
    /// Monotonic: once true, never reset
    pub sent: bool,
    /// True from notify until the cooldown is released
    pub cooling: bool,
}

/// Row lifecycle derived from [`NotificationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    Idle,
    Cooling,
    Ready,
}

impl NotificationState {
    pub fn phase(&self) -> RowPhase {
        match (self.sent, self.cooling) {
            (false, _) => RowPhase::Idle,
            (true, true) => RowPhase::Cooling,
            (true, false) => RowPhase::Ready,
        }
    }
}

/// Lock a ticket releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Global,
    Row(usize),
}

/// Deferred "cooldown elapsed" message for the board owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownTicket {
    /// Board the ticket belongs to
    pub batch: u64,
    pub key: LockKey,
    pub generation: u64,
    pub deadline: Instant,
}

/// Result of a notify attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Row marked sent; schedule the ticket
    Fired(CooldownTicket),
    /// Nothing changed
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownRow,
    AlreadySent,
    CoolingDown,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IgnoreReason::UnknownRow => "unknown row",
            IgnoreReason::AlreadySent => "row already notified",
            IgnoreReason::CoolingDown => "cooldown in progress",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy)]
struct Lock {
    row: usize,
    generation: u64,
    deadline: Instant,
}

/// Notification state of one loaded batch
#[derive(Debug)]
pub struct NotifyBoard {
    batch: u64,
    scope: CooldownScope,
    cooldown: Duration,
    states: Vec<NotificationState>,
    locks: HashMap<LockKey, Lock>,
    next_generation: u64,
}

impl NotifyBoard {
    /// Board for `rows` rows, all `Idle`
    pub fn new(rows: usize, scope: CooldownScope) -> Self {
        Self::with_cooldown(rows, scope, DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(rows: usize, scope: CooldownScope, cooldown: Duration) -> Self {
        Self {
            batch: NEXT_BATCH.fetch_add(1, Ordering::Relaxed),
            scope,
            cooldown: cooldown.min(MAX_COOLDOWN),
            states: vec![NotificationState::default(); rows],
            locks: HashMap::new(),
            next_generation: 0,
        }
    }

    pub fn batch(&self) -> u64 {
        self.batch
    }

    pub fn scope(&self) -> CooldownScope {
        self.scope
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Flags of `row`; out-of-range rows read as `Idle`
    pub fn state(&self, row: usize) -> NotificationState {
        self.states.get(row).copied().unwrap_or_default()
    }

    fn lock_key(&self, row: usize) -> LockKey {
        match self.scope {
            CooldownScope::Global => LockKey::Global,
            CooldownScope::PerRow => LockKey::Row(row),
        }
    }

    /// Why `row` cannot be notified right now, if anything
    pub fn check(&self, row: usize) -> Option<IgnoreReason> {
        let state = self.states.get(row)?;
        if state.sent {
            Some(IgnoreReason::AlreadySent)
        } else if self.locks.contains_key(&self.lock_key(row)) {
            Some(IgnoreReason::CoolingDown)
        } else {
            None
        }
    }

    /// Whether a notify on `row` would fire
    pub fn can_notify(&self, row: usize) -> bool {
        row < self.states.len() && self.check(row).is_none()
    }

    /// Fire the notify transition
    ///
    /// Safe to call at any time: an invalid call returns
    /// [`NotifyOutcome::Ignored`] and leaves the board untouched.
    pub fn notify(&mut self, row: usize, now: Instant) -> NotifyOutcome {
        if row >= self.states.len() {
            return NotifyOutcome::Ignored(IgnoreReason::UnknownRow);
        }
        if let Some(reason) = self.check(row) {
            debug!(row, reason = %reason, "Notify ignored");
            return NotifyOutcome::Ignored(reason);
        }

        let key = self.lock_key(row);
        let generation = self.next_generation;
        self.next_generation += 1;
        let deadline = now + self.cooldown;

        self.locks.insert(key, Lock { row, generation, deadline });
        self.states[row] = NotificationState {
            sent: true,
            cooling: true,
        };

        info!(
            row,
            scope = ?self.scope,
            cooldown_secs = self.cooldown.as_secs(),
            "Row notified, cooldown started"
        );

        NotifyOutcome::Fired(CooldownTicket {
            batch: self.batch,
            key,
            generation,
            deadline,
        })
    }

    /// Apply a cooldown ticket
    ///
    /// Returns `true` when the cooldown ended. Tickets from another board,
    /// superseded tickets and tickets delivered before their deadline are
    /// ignored.
    pub fn release(&mut self, ticket: CooldownTicket, now: Instant) -> bool {
        if ticket.batch != self.batch {
            debug!(batch = ticket.batch, "Ticket from a discarded batch ignored");
            return false;
        }
        if now < ticket.deadline {
            debug!(key = ?ticket.key, "Ticket delivered early, ignored");
            return false;
        }
        let Some(lock) = self.locks.get(&ticket.key).copied() else {
            return false;
        };
        if lock.generation != ticket.generation {
            return false;
        }

        self.locks.remove(&ticket.key);
        if let Some(state) = self.states.get_mut(lock.row) {
            state.cooling = false;
        }

        info!(row = lock.row, key = ?ticket.key, "Cooldown released");
        true
    }

    /// Time left on the global lock (`None` when not locked or per-row scope)
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.locks
            .get(&LockKey::Global)
            .map(|lock| lock.deadline.saturating_duration_since(now))
    }

    /// Time left on `row`'s own cooldown
    pub fn row_remaining(&self, row: usize, now: Instant) -> Option<Duration> {
        self.locks
            .values()
            .find(|lock| lock.row == row)
            .map(|lock| lock.deadline.saturating_duration_since(now))
    }
}

/// Whole seconds for a countdown display, rounded up
pub fn countdown_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
