//! Delivery Notify - courier manifest loading and recipient notifications

pub mod cli;
pub mod config;
pub mod manifest;
pub mod notification;
pub mod session;

pub use config::AppConfig;
pub use manifest::{
    load_manifest, normalize, read_table, resolve, CanonicalField, DeliveryRow, HeaderMap,
    HeaderStrategy, LoadOptions, ManifestError, RawTable, ResolvedHeader,
};
pub use notification::{
    build_time_range_string, Clock, CooldownScope, CooldownTicket, Greeting, MessageFormatter,
    NotificationState, NotifyBoard, NotifyOutcome, OutboundMessage, Scheduler, TokioScheduler,
};
pub use session::{NotifyReply, Session, SessionSettings};
