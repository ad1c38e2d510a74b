//! Main clock and world clocks

use timelab_core::{
    targets, DisplayBoard, Instant, TimeLabResult, TimezoneSelector, WorldZoneEntry,
};

use crate::formatter::{FormatFields, Formatter};

/// Writes the main clock and the world clocks
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockRenderer {
    formatter: Formatter,
}

impl ClockRenderer {
    pub fn new(formatter: Formatter) -> Self {
        ClockRenderer { formatter }
    }

    /// Write time and date for the selected zone.
    /// Both strings are formatted before anything is written
    pub fn render_main(
        &self,
        board: &mut dyn DisplayBoard,
        instant: Instant,
        selector: &TimezoneSelector,
    ) -> TimeLabResult<()> {
        let zone = selector.zone_id();
        let time = self.formatter.format_time(instant, zone)?;
        let date = self
            .formatter
            .format(instant, zone, &FormatFields::date_time())?;

        if !board.write_text(targets::CLOCK_TIME, &time) {
            tracing::trace!(target_id = targets::CLOCK_TIME, "display target missing");
        }
        if !board.write_text(targets::CLOCK_DATE, &date) {
            tracing::trace!(target_id = targets::CLOCK_DATE, "display target missing");
        }
        Ok(())
    }

    /// Write each world clock's time in its own zone.
    /// Returns how many entries were written
    pub fn render_world(
        &self,
        board: &mut dyn DisplayBoard,
        instant: Instant,
        zones: &[WorldZoneEntry],
    ) -> TimeLabResult<usize> {
        let mut written = 0;
        for entry in zones {
            if !board.has_target(&entry.target) {
                tracing::trace!(target_id = %entry.target, "display target missing");
                continue;
            }
            let time = self.formatter.format_time(instant, Some(&entry.zone))?;
            if board.write_text(&entry.target, &time) {
                written += 1;
            }
        }
        Ok(written)
    }
}
