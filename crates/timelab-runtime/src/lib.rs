//! TimeLab Runtime - drives the engine
//!
//! The engine has no notion of scheduling. This crate supplies it:
//! 1. Render once at startup
//! 2. Render every tick interval (1 s by default)
//! 3. Apply host events (timezone change, countdown submit) and render
//!    immediately after each
//! 4. Report user input errors through a blocking notifier

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use logging::*;
