//! Time-of-day greeting and the clock it reads from

use chrono::{Local, NaiveDateTime, Timelike};

/// Source of the current local time
///
/// Injected so greetings can be tested without depending on the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given local time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Greeting bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    /// [00:00, 12:00)
    Morning,
    /// [12:00, 19:00)
    Afternoon,
    /// [19:00, 24:00)
    Evening,
}

impl Greeting {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Greeting::Morning,
            12..=18 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    pub fn now(clock: &dyn Clock) -> Self {
        Self::for_hour(clock.now().hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Greeting::Morning => "Buenos días",
            Greeting::Afternoon => "Buenas tardes",
            Greeting::Evening => "Buenas noches",
        }
    }
}

impl std::fmt::Display for Greeting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
