//! Display targets
//!
//! The engine never owns presentation. It writes through a [`DisplayBoard`],
//! which maps a logical target identifier to a [`DisplaySink`]. Targets that
//! the board does not know are skipped by the renderers.

use std::collections::BTreeMap;

/// Identifiers of the targets the engine writes to
pub mod targets {
    pub const CLOCK_TIME: &str = "clock-time";
    pub const CLOCK_DATE: &str = "clock-date";

    pub const TIME_BEIJING: &str = "time-bj";
    pub const TIME_LONDON: &str = "time-ldn";
    pub const TIME_NEW_YORK: &str = "time-ny";
    pub const TIME_TOKYO: &str = "time-tyo";

    pub const DAY_PROGRESS_BAR: &str = "day-progress-bar";
    pub const DAY_PROGRESS_TEXT: &str = "day-progress-text";
    pub const YEAR_PROGRESS_BAR: &str = "year-progress-bar";
    pub const YEAR_PROGRESS_TEXT: &str = "year-progress-text";

    pub const COUNTDOWN_LABEL: &str = "countdown-label";
    pub const COUNTDOWN_DETAIL: &str = "countdown-detail";

    /// Every target of the standard layout
    pub const ALL: [&str; 12] = [
        CLOCK_TIME,
        CLOCK_DATE,
        TIME_BEIJING,
        TIME_LONDON,
        TIME_NEW_YORK,
        TIME_TOKYO,
        DAY_PROGRESS_BAR,
        DAY_PROGRESS_TEXT,
        YEAR_PROGRESS_BAR,
        YEAR_PROGRESS_TEXT,
        COUNTDOWN_LABEL,
        COUNTDOWN_DETAIL,
    ];
}

/// A single writable display element
pub trait DisplaySink {
    /// Replace the element's text
    fn set_text(&mut self, value: &str);
    /// Set the element's width, e.g. `"42.00%"`
    fn set_width_percent(&mut self, value: &str);
}

/// Lookup from target identifier to sink
pub trait DisplayBoard {
    fn has_target(&self, id: &str) -> bool;
    fn sink(&mut self, id: &str) -> Option<&mut dyn DisplaySink>;

    /// Write text to `id`. Returns false if the target does not exist
    fn write_text(&mut self, id: &str, value: &str) -> bool {
        match self.sink(id) {
            Some(sink) => {
                sink.set_text(value);
                true
            }
            None => false,
        }
    }

    /// Write a width to `id`. Returns false if the target does not exist
    fn write_width(&mut self, id: &str, value: &str) -> bool {
        match self.sink(id) {
            Some(sink) => {
                sink.set_width_percent(value);
                true
            }
            None => false,
        }
    }
}

/// Last values written to a target; `None` until first written
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetState {
    pub text: Option<String>,
    pub width: Option<String>,
}

impl DisplaySink for TargetState {
    fn set_text(&mut self, value: &str) {
        self.text = Some(value.to_string());
    }

    fn set_width_percent(&mut self, value: &str) {
        self.width = Some(value.to_string());
    }
}

/// In-memory board for headless hosts and tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBoard {
    targets: BTreeMap<String, TargetState>,
}

impl MemoryBoard {
    /// Empty board with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Board with the given targets registered
    pub fn with_targets<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut board = Self::new();
        for id in ids {
            board.register(id);
        }
        board
    }

    /// Board with every target of the standard layout
    pub fn standard() -> Self {
        Self::with_targets(targets::ALL)
    }

    pub fn register(&mut self, id: impl Into<String>) {
        self.targets.entry(id.into()).or_default();
    }

    pub fn remove(&mut self, id: &str) -> Option<TargetState> {
        self.targets.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&TargetState> {
        self.targets.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.targets.get(id).and_then(|t| t.text.as_deref())
    }

    pub fn width(&self, id: &str) -> Option<&str> {
        self.targets.get(id).and_then(|t| t.width.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetState)> {
        self.targets.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl DisplayBoard for MemoryBoard {
    fn has_target(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    fn sink(&mut self, id: &str) -> Option<&mut dyn DisplaySink> {
        self.targets
            .get_mut(id)
            .map(|state| state as &mut dyn DisplaySink)
    }
}
