//! Shared fixtures for the TimeLab benchmarks

use chrono_tz::Tz;

use timelab_core::Instant;
use timelab_time::{TimeLabConfig, TimeLabEngine};

/// 2024-12-31T15:00:00Z, 23:00 in Shanghai
pub const BENCH_INSTANT: Instant = Instant(1_735_657_200_000);

/// Engine pinned to Shanghai with a countdown target set
pub fn bench_engine() -> TimeLabEngine {
    let mut engine = TimeLabEngine::with_config(TimeLabConfig::fixed_host(Tz::Asia__Shanghai));
    // A literal date always parses
    let _ = engine.submit_countdown("2025-01-01", Some("00:00"));
    engine
}
