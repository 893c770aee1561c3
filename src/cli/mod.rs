//! CLI command handling

pub mod load;
pub mod message;
pub mod output;
pub mod run;

pub use load::*;
pub use message::*;
pub use output::*;
pub use run::*;
