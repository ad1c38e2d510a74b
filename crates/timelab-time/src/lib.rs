//! TimeLab Time Engine - clocks, progress and countdown
//!
//! This crate implements the TimeLab engine:
//! - Zone resolution (host zone and named IANA zones)
//! - Localized formatting
//! - Main clock and world clocks
//! - Day and year progress bars
//! - Countdown to a user-chosen instant
//!
//! The engine is synchronous and has no scheduling knowledge; a driver
//! calls [`TimeLabEngine::tick`] once per second.

pub mod clock;
pub mod countdown;
pub mod engine;
pub mod formatter;
pub mod progress;
pub mod zone;

pub use clock::*;
pub use countdown::*;
pub use engine::*;
pub use formatter::*;
pub use progress::*;
pub use zone::*;
