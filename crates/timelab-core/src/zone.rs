//! Zone selection types
//!
//! Zone identifiers are kept as strings here; they are validated when a
//! formatter resolves them, so an unknown identifier surfaces as an error
//! at render time instead of being silently replaced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::display::targets;

/// Selection value that maps to the host's local zone
pub const LOCAL_SELECTION: &str = "local";

/// Which zone the main clock renders in
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimezoneSelector {
    /// Host default zone
    #[default]
    Local,
    /// Named IANA zone, e.g. "Asia/Tokyo"
    Named(String),
}

impl TimezoneSelector {
    /// Parse a selection value; `"local"` or a blank value selects the
    /// host zone
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == LOCAL_SELECTION {
            TimezoneSelector::Local
        } else {
            TimezoneSelector::Named(value.to_string())
        }
    }

    /// Zone identifier to format with, `None` meaning the host zone
    pub fn zone_id(&self) -> Option<&str> {
        match self {
            TimezoneSelector::Local => None,
            TimezoneSelector::Named(id) => Some(id),
        }
    }
}

impl From<&str> for TimezoneSelector {
    fn from(value: &str) -> Self {
        TimezoneSelector::parse(value)
    }
}

impl From<String> for TimezoneSelector {
    fn from(value: String) -> Self {
        TimezoneSelector::parse(&value)
    }
}

impl From<TimezoneSelector> for String {
    fn from(selector: TimezoneSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for TimezoneSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezoneSelector::Local => f.write_str(LOCAL_SELECTION),
            TimezoneSelector::Named(id) => f.write_str(id),
        }
    }
}

/// A world clock: where to write, and which zone to render
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldZoneEntry {
    /// Display target identifier
    pub target: String,
    /// IANA zone identifier
    pub zone: String,
}

impl WorldZoneEntry {
    pub fn new(target: impl Into<String>, zone: impl Into<String>) -> Self {
        WorldZoneEntry {
            target: target.into(),
            zone: zone.into(),
        }
    }

    /// Shanghai, London, New York, Tokyo
    pub fn defaults() -> Vec<WorldZoneEntry> {
        vec![
            WorldZoneEntry::new(targets::TIME_BEIJING, "Asia/Shanghai"),
            WorldZoneEntry::new(targets::TIME_LONDON, "Europe/London"),
            WorldZoneEntry::new(targets::TIME_NEW_YORK, "America/New_York"),
            WorldZoneEntry::new(targets::TIME_TOKYO, "Asia/Tokyo"),
        ]
    }
}
