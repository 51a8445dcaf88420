//! Raw API rows → enriched, filtered [`NeoRecord`]s.

pub mod convert;
pub mod date;
pub mod enrich;
pub mod schema;

use chrono::NaiveDate;

/// State of the asynchronous next-approach lookup for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextApproach {
    /// Lookup queued or in flight
    #[default]
    Pending,
    Found(NaiveDate),
    /// No later approach in the search horizon, or the lookup failed
    Unavailable,
}

impl NextApproach {
    /// Tooltip text.
    pub fn label(&self) -> String {
        match self {
            NextApproach::Pending => "Loading…".to_string(),
            NextApproach::Found(date) => date.to_string(),
            NextApproach::Unavailable => "N/A".to_string(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, NextApproach::Pending)
    }
}

/// One close approach with every derived display metric.
#[derive(Debug, Clone, PartialEq)]
pub struct NeoRecord {
    /// Position in the displayed list; unique per fetch, not across reloads
    pub id: usize,
    pub designation: String,
    pub orbit_id: String,
    /// Absolute magnitude
    pub h: f64,
    /// Relative velocity at closest approach, km/s
    pub v_rel: f64,
    /// Closest-approach distance, AU
    pub dist: f64,
    /// Closest-approach time as reported by the API
    pub cd: String,
    pub closest_dist_ld: f64,
    /// Estimated diameter in metres
    pub diameter: f64,
    pub closest_date: NaiveDate,
    /// Whole days between the reference date and closest approach, unsigned
    pub days_to_closest: i64,
    /// Same as `days_to_closest` but negative when the approach already happened
    pub days_until_closest: i64,
    pub ld_per_day: f64,
    /// Extrapolated distance at the reference date, LD
    pub current_dist_ld: f64,
    /// Write-once; only the lookahead result for this `id` may set it
    pub next_approach: NextApproach,
}

impl NeoRecord {
    /// Closest-approach date as `YYYY-MM-DD`.
    pub fn closest_date_iso(&self) -> String {
        self.closest_date.format("%Y-%m-%d").to_string()
    }

    pub fn approach_passed(&self) -> bool {
        self.days_until_closest < 0
    }

    /// Apply a lookahead result. Returns `false` if the slot was already set.
    pub fn resolve_next_approach(&mut self, result: NextApproach) -> bool {
        if !self.next_approach.is_pending() || result.is_pending() {
            return false;
        }
        self.next_approach = result;
        true
    }
}
