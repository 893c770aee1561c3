//! Customer notification - message rendering and notify cooldowns
//!
//! # Components
//! 1. `greeting` / `window` / `template`: the pieces of a message
//! 2. `formatter`: row → text + deep link (`MessageFormatter`)
//! 3. `channel` / `channels`: deep-link channels (WhatsApp)
//! 4. `throttle`: per-row sent/cooling state (`NotifyBoard`)
//! 5. `scheduler`: delivers cooldown tickets back to the board owner
//!
//! # Example
//! ```ignore
//! use delivery_notify::notification::{MessageFormatter, SystemClock};
//!
//! let formatter = MessageFormatter::new();
//! let message = formatter.compose(&row, &SystemClock, &mut rand::thread_rng());
//! println!("{}", message.link);
//! ```

pub mod channel;
pub mod channels;
pub mod formatter;
pub mod greeting;
pub mod scheduler;
pub mod template;
pub mod throttle;
pub mod window;

pub use channel::{DeepLinkChannel, OutboundMessage};
pub use channels::{WhatsAppChannel, WhatsAppConfig};
pub use formatter::MessageFormatter;
pub use greeting::{Clock, FixedClock, Greeting, SystemClock};
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use template::{fill, TemplateCatalog, TemplateVars};
pub use throttle::{
    countdown_secs, CooldownScope, CooldownTicket, IgnoreReason, NotificationState, NotifyBoard,
    NotifyOutcome, RowPhase, DEFAULT_COOLDOWN, MAX_COOLDOWN,
};
pub use window::build_time_range_string;
