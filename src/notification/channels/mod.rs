//! Concrete channel implementations

pub mod whatsapp;

pub use whatsapp::{WhatsAppChannel, WhatsAppConfig};
