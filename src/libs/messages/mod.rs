//! User-facing message catalog.
//!
//! Every string the CLI prints lives in the [`Message`] enum so wording
//! stays in one place. The `msg_*` macros in [`macros`] route each message
//! either to the console or through `tracing`, depending on debug mode.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
