//! Close-approach API contract: query parameters, response shape and the
//! two lookups the visualizer performs.

use chrono::{Days, Months, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{NeoError, Result};
use crate::transform::date::parse_cd;
use crate::transform::schema::FIELD_CALENDAR_DATE;

/// Only Earth approaches are requested.
pub const CAD_BODY: &str = "Earth";

/// One request against the close-approach endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachQuery {
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub limit: u32,
    /// Restrict to a single object
    pub designation: Option<String>,
}

impl ApproachQuery {
    /// Every approach from `reference` to `reference + window_days`.
    pub fn window(reference: NaiveDate, window_days: u32, limit: u32) -> Self {
        let date_max = reference
            .checked_add_days(Days::new(window_days as u64))
            .unwrap_or(NaiveDate::MAX);
        Self {
            date_min: reference,
            date_max,
            limit,
            designation: None,
        }
    }

    /// The first approach of `designation` strictly after `after`, searched
    /// `years` ahead.
    pub fn next_after(designation: &str, after: NaiveDate, years: u32) -> Self {
        let date_min = after.succ_opt().unwrap_or(after);
        let date_max = date_min
            .checked_add_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            date_min,
            date_max,
            limit: 1,
            designation: Some(designation.to_string()),
        }
    }

    /// Query string pairs in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("body", CAD_BODY.to_string()),
            ("limit", self.limit.to_string()),
            ("date-min", self.date_min.format("%Y-%m-%d").to_string()),
            ("date-max", self.date_max.format("%Y-%m-%d").to_string()),
        ];
        if let Some(ref des) = self.designation {
            params.push(("des", des.clone()));
        }
        params
    }

    pub fn to_url(&self, endpoint: &str) -> Result<Url> {
        Url::parse_with_params(endpoint, self.params())
            .map_err(|e| NeoError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))
    }
}

/// Decoded `{fields, data}` response.
///
/// The API omits both keys when nothing matched; that decodes to an empty
/// table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApproachTable {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl ApproachTable {
    pub fn from_json(body: &str) -> Result<Self> {
        let table: ApproachTable = serde_json::from_str(body)?;
        if !table.data.is_empty() && table.fields.is_empty() {
            return Err(NeoError::Decode(format!(
                "{} rows returned without a fields list",
                table.data.len()
            )));
        }
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Anything that can answer an [`ApproachQuery`].
///
/// The HTTP client implements it for production; tests supply fixtures.
pub trait ApproachSource: Send + Sync {
    fn fetch(&self, query: &ApproachQuery) -> Result<ApproachTable>;
}

/// Primary lookup: every approach in the viewing window.
pub fn fetch_approaches<S: ApproachSource + ?Sized>(
    source: &S,
    reference: NaiveDate,
    window_days: u32,
    limit: u32,
) -> Result<ApproachTable> {
    source.fetch(&ApproachQuery::window(reference, window_days, limit))
}

/// Secondary lookup: date of the next approach of one object after `after`.
///
/// `Ok(None)` when the search horizon holds no further approach.
pub fn fetch_next_approach<S: ApproachSource + ?Sized>(
    source: &S,
    designation: &str,
    after: NaiveDate,
    years: u32,
) -> Result<Option<NaiveDate>> {
    let table = source.fetch(&ApproachQuery::next_after(designation, after, years))?;
    let Some(row) = table.data.first() else {
        return Ok(None);
    };

    let cd_idx = table
        .fields
        .iter()
        .position(|f| f == FIELD_CALENDAR_DATE)
        .ok_or_else(|| NeoError::Decode("field 'cd' missing from response fields".into()))?;
    let cd = row
        .get(cd_idx)
        .and_then(Value::as_str)
        .ok_or_else(|| NeoError::Decode("next approach row has no calendar date".into()))?;

    parse_cd(cd).map(Some)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_query_params() {
        let q = ApproachQuery::window(ymd(2020, 12, 2), 90, 50);
        assert_eq!(q.date_max, ymd(2021, 3, 2));
        let url = q.to_url("https://ssd-api.jpl.nasa.gov/cad.api").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ssd-api.jpl.nasa.gov/cad.api?body=Earth&limit=50&date-min=2020-12-02&date-max=2021-03-02"
        );
    }

    #[test]
    fn next_approach_query_starts_the_day_after() {
        let q = ApproachQuery::next_after("2020 XY", ymd(2020, 12, 31), 10);
        assert_eq!(q.date_min, ymd(2021, 1, 1));
        assert_eq!(q.date_max, ymd(2031, 1, 1));
        assert_eq!(q.limit, 1);
        let url = q.to_url("https://ssd-api.jpl.nasa.gov/cad.api").unwrap();
        assert!(url.as_str().ends_with("&des=2020+XY"), "{}", url);
    }

    #[test]
    fn bad_endpoint_is_config_error() {
        let q = ApproachQuery::window(ymd(2020, 12, 2), 1, 1);
        assert!(matches!(q.to_url("not a url"), Err(NeoError::Config(_))));
    }

    #[test]
    fn decodes_api_payload() {
        let body = r#"{
            "signature": {"source": "NASA/JPL SBDB Close Approach Data API", "version": "1.5"},
            "count": "1",
            "fields": ["des","orbit_id","jd","cd","dist","dist_min","dist_max","v_rel","v_inf","t_sigma_f","h"],
            "data": [["2020 XY","4","2459193.5","2020-Dec-10 00:00","0.01","0.0099","0.0101","10","9.9","00:01","20"]]
        }"#;
        let table = ApproachTable::from_json(body).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.fields[3], "cd");
    }

    #[test]
    fn empty_result_decodes_to_empty_table() {
        let body = r#"{"signature": {"version": "1.5"}, "count": "0"}"#;
        let table = ApproachTable::from_json(body).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        assert!(matches!(ApproachTable::from_json("[1,2]"), Err(NeoError::Decode(_))));
        assert!(matches!(
            ApproachTable::from_json(r#"{"data": [["a"]]}"#),
            Err(NeoError::Decode(_))
        ));
        assert!(matches!(
            ApproachTable::from_json(r#"{"fields": "des", "data": []}"#),
            Err(NeoError::Decode(_))
        ));
    }

    #[test]
    fn next_approach_lookup() {
        let mut source = FixtureSource::default();
        source.next.insert(
            "433".into(),
            Some(cad_table(vec![cad_row("433", "659", "2056-Jan-24 11:38", "0.15", "5.9", "10.8")])),
        );
        source.next.insert("99942".into(), None);

        let found = fetch_next_approach(&source, "433", ymd(2020, 12, 10), 10).unwrap();
        assert_eq!(found, Some(ymd(2056, 1, 24)));

        let none = fetch_next_approach(&source, "2020 XY", ymd(2020, 12, 10), 10).unwrap();
        assert_eq!(none, None);

        let err = fetch_next_approach(&source, "99942", ymd(2020, 12, 10), 10);
        assert!(matches!(err, Err(NeoError::Network(_))));

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].date_min, ymd(2020, 12, 11));
        assert_eq!(seen[0].designation.as_deref(), Some("433"));
    }

    #[test]
    fn primary_lookup_uses_window() {
        let source = FixtureSource {
            window: Some(cad_table(vec![])),
            ..Default::default()
        };
        let table = fetch_approaches(&source, ymd(2020, 12, 2), 30, 5).unwrap();
        assert!(table.is_empty());
        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].date_max, ymd(2021, 1, 1));
        assert_eq!(seen[0].limit, 5);
    }
}
