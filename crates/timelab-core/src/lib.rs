//! TimeLab Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout TimeLab:
//! - Time primitives (Instant)
//! - Zone selection (TimezoneSelector, WorldZoneEntry)
//! - Display targets and the board capability they are written through
//! - Error types

pub mod display;
pub mod error;
pub mod time;
pub mod zone;

pub use display::*;
pub use error::*;
pub use time::*;
pub use zone::*;
