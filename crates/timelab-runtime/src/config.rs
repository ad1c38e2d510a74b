//! Runtime configuration
//!
//! Loaded from JSON. Every field is optional; omitted fields take the
//! engine defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use timelab_core::{TimezoneSelector, WorldZoneEntry};
use timelab_time::{HostZone, TimeLabConfig, TimeLabEngine};

use crate::RuntimeResult;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Tick period in milliseconds
    pub tick_interval_ms: Option<u64>,
    /// `"system"` or an IANA zone standing in for the host
    pub host_zone: Option<String>,
    /// Main clock zone at startup, `"local"` or an IANA zone
    pub initial_timezone: Option<TimezoneSelector>,
    /// Replaces the default world clocks
    pub world_zones: Option<Vec<WorldZoneEntry>>,
    /// Tracing filter directive, overrides `RUST_LOG`
    pub log_filter: Option<String>,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl RuntimeConfig {
    pub fn from_json(json: &str) -> RuntimeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> RuntimeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Engine configuration; an unknown host zone is an error
    pub fn engine_config(&self) -> RuntimeResult<TimeLabConfig> {
        let mut config = TimeLabConfig::default();
        if let Some(zone) = &self.host_zone {
            config.host_zone = HostZone::parse(zone)?;
        }
        if let Some(zones) = &self.world_zones {
            config.world_zones = zones.clone();
        }
        if let Some(ms) = self.tick_interval_ms {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }
        Ok(config)
    }

    /// Engine with the initial timezone applied
    pub fn build_engine(&self) -> RuntimeResult<TimeLabEngine> {
        let mut engine = TimeLabEngine::with_config(self.engine_config()?);
        if let Some(selector) = &self.initial_timezone {
            engine.select_timezone(selector.clone());
        }
        Ok(engine)
    }
}
