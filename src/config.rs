//! Runtime configuration.
//!
//! Defaults mirror the values the visualization was first tuned with
//! (90-day window, 50 results, 20 LD threshold). A TOML file can override
//! any of them, and CLI flags override the file.
//!
//! ```toml
//! threshold_ld = 40.0
//! window_days = 60
//! reference_date = "2020-12-02"   # quoted: parsed as YYYY-MM-DD
//! seed = 7
//! ```

use std::ops::RangeInclusive;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{NeoError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://ssd-api.jpl.nasa.gov/cad.api";

/// Number of horizontal lanes; lane digits run 0–9.
pub const LANE_COUNT: u8 = 10;

/// Accepted distance thresholds, shared by validation and the toolbar.
pub const THRESHOLD_LD_RANGE: RangeInclusive<f64> = 1.0..=400.0;
pub const WINDOW_DAYS_RANGE: RangeInclusive<u32> = 1..=3650;

/// Upper bound on distance gridlines in one chart.
pub const MAX_GRID_LINES: u32 = 200;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VizConfig {
    pub endpoint: String,
    /// Days after the reference date covered by the primary fetch
    pub window_days: u32,
    pub limit: u32,
    /// Records at or beyond this current distance (LD) are not displayed
    pub threshold_ld: f64,
    /// `None` means "today" in local time
    pub reference_date: Option<NaiveDate>,
    pub timeout_secs: u64,
    pub lookahead_workers: usize,
    /// Search horizon for the next-approach lookup
    pub lookahead_years: u32,
    /// Fixed seed for lane jitter; unseeded layouts differ on every run
    pub seed: Option<u64>,
    pub width: f64,
    pub height: f64,
    pub grid_step_ld: f64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            window_days: 90,
            limit: 50,
            threshold_ld: 20.0,
            reference_date: None,
            timeout_secs: 15,
            lookahead_workers: 4,
            lookahead_years: 10,
            seed: None,
            width: 1000.0,
            height: 600.0,
            grid_step_ld: 5.0,
        }
    }
}

impl VizConfig {
    /// Read a TOML file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NeoError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: VizConfig =
            toml::from_str(content).map_err(|e| NeoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !THRESHOLD_LD_RANGE.contains(&self.threshold_ld) {
            return Err(NeoError::Config(format!(
                "threshold_ld must be within {}..={}, got {}",
                THRESHOLD_LD_RANGE.start(),
                THRESHOLD_LD_RANGE.end(),
                self.threshold_ld
            )));
        }
        if !WINDOW_DAYS_RANGE.contains(&self.window_days) {
            return Err(NeoError::Config(format!(
                "window_days must be within {}..={}, got {}",
                WINDOW_DAYS_RANGE.start(),
                WINDOW_DAYS_RANGE.end(),
                self.window_days
            )));
        }
        if self.limit == 0 {
            return Err(NeoError::Config("limit must be at least 1".into()));
        }
        if self.lookahead_workers == 0 {
            return Err(NeoError::Config("lookahead_workers must be at least 1".into()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(NeoError::Config(format!(
                "chart size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.grid_step_ld > 0.0) {
            return Err(NeoError::Config("grid_step_ld must be positive".into()));
        }
        if self.threshold_ld / self.grid_step_ld > MAX_GRID_LINES as f64 {
            return Err(NeoError::Config(format!(
                "grid_step_ld {} draws more than {} gridlines up to {} LD",
                self.grid_step_ld, MAX_GRID_LINES, self.threshold_ld
            )));
        }
        Ok(())
    }

    /// The date distances are projected to.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Vertical pixels per lunar distance.
    pub fn y_multiplier(&self) -> f64 {
        self.height / self.threshold_ld
    }

    pub fn lane_width(&self) -> f64 {
        self.width / LANE_COUNT as f64
    }
}
