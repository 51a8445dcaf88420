//! Column mapping for the API's tabular response.
//!
//! The API reports field names in a separate `fields` list and every row is a
//! positional array. Instead of trusting fixed positions, the indices are
//! looked up by name once per response and each row is projected into a
//! named [`RawApproach`].

use serde_json::Value;

use crate::error::{NeoError, Result};

pub const FIELD_DESIGNATION: &str = "des";
pub const FIELD_ORBIT_ID: &str = "orbit_id";
pub const FIELD_CALENDAR_DATE: &str = "cd";
pub const FIELD_DISTANCE: &str = "dist";
pub const FIELD_VELOCITY: &str = "v_rel";
pub const FIELD_MAGNITUDE: &str = "h";

/// Column positions of the fields the visualizer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproachSchema {
    pub designation: usize,
    pub orbit_id: usize,
    pub cd: usize,
    pub dist: usize,
    pub v_rel: usize,
    pub h: usize,
}

impl ApproachSchema {
    /// Resolve every required column; fails if the API stopped reporting one.
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        let find = |name: &str| {
            fields.iter().position(|f| f == name).ok_or_else(|| {
                NeoError::Decode(format!(
                    "field '{}' missing from response fields {:?}",
                    name, fields
                ))
            })
        };

        Ok(Self {
            designation: find(FIELD_DESIGNATION)?,
            orbit_id: find(FIELD_ORBIT_ID)?,
            cd: find(FIELD_CALENDAR_DATE)?,
            dist: find(FIELD_DISTANCE)?,
            v_rel: find(FIELD_VELOCITY)?,
            h: find(FIELD_MAGNITUDE)?,
        })
    }
}

/// The named subset of one close-approach row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawApproach {
    pub designation: String,
    pub orbit_id: String,
    pub h: f64,
    pub v_rel: f64,
    pub dist: f64,
    pub cd: String,
}

/// Project one positional row through the schema.
pub fn to_record(row: &[Value], schema: &ApproachSchema) -> Result<RawApproach> {
    Ok(RawApproach {
        designation: text(row, schema.designation, FIELD_DESIGNATION)?,
        orbit_id: text(row, schema.orbit_id, FIELD_ORBIT_ID)?,
        h: number(row, schema.h, FIELD_MAGNITUDE)?,
        v_rel: number(row, schema.v_rel, FIELD_VELOCITY)?,
        dist: number(row, schema.dist, FIELD_DISTANCE)?,
        cd: text(row, schema.cd, FIELD_CALENDAR_DATE)?,
    })
}

fn cell<'a>(row: &'a [Value], idx: usize, name: &str) -> Result<&'a Value> {
    match row.get(idx) {
        Some(Value::Null) | None => Err(NeoError::Decode(format!(
            "row has no value for '{}' (column {})",
            name, idx
        ))),
        Some(v) => Ok(v),
    }
}

fn text(row: &[Value], idx: usize, name: &str) -> Result<String> {
    match cell(row, idx, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(NeoError::Decode(format!(
            "'{}' is not text: {}",
            name, other
        ))),
    }
}

// The API sends numbers as JSON strings.
fn number(row: &[Value], idx: usize, name: &str) -> Result<f64> {
    let parsed = match cell(row, idx, name)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| NeoError::Decode(format!("'{}' is not numeric in column {}", name, idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cad_fields() -> Vec<String> {
        [
            "des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", "v_inf",
            "t_sigma_f", "h",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn resolves_standard_cad_layout() {
        let schema = ApproachSchema::from_fields(&cad_fields()).unwrap();
        assert_eq!(
            schema,
            ApproachSchema { designation: 0, orbit_id: 1, cd: 3, dist: 4, v_rel: 7, h: 10 }
        );
    }

    #[test]
    fn follows_reordered_fields() {
        let mut fields = cad_fields();
        fields.swap(0, 10);
        let schema = ApproachSchema::from_fields(&fields).unwrap();
        assert_eq!(schema.h, 0);
        assert_eq!(schema.designation, 10);
    }

    #[test]
    fn missing_field_is_decode_error() {
        let fields: Vec<String> = cad_fields().into_iter().filter(|f| f != "v_rel").collect();
        let err = ApproachSchema::from_fields(&fields).unwrap_err();
        assert!(matches!(err, NeoError::Decode(ref m) if m.contains("v_rel")));
    }

    #[test]
    fn projects_named_values() {
        let schema = ApproachSchema::from_fields(&cad_fields()).unwrap();
        let row = vec![
            json!("2020 XY"),
            json!("7"),
            json!("2459193.5"),
            json!("2020-Dec-10 00:00"),
            json!("0.01"),
            json!("0.0099"),
            json!("0.0101"),
            json!("10"),
            json!("9.9"),
            json!("< 00:01"),
            json!("20"),
        ];
        let raw = to_record(&row, &schema).unwrap();
        assert_eq!(raw.designation, "2020 XY");
        assert_eq!(raw.orbit_id, "7");
        assert_eq!(raw.cd, "2020-Dec-10 00:00");
        assert_eq!(raw.dist, 0.01);
        assert_eq!(raw.v_rel, 10.0);
        assert_eq!(raw.h, 20.0);
    }

    #[test]
    fn null_or_garbage_numbers_are_rejected() {
        let schema = ApproachSchema { designation: 0, orbit_id: 1, cd: 2, dist: 3, v_rel: 4, h: 5 };
        let null_h = vec![
            json!("A"), json!("1"), json!("2020-Dec-10 00:00"), json!("0.01"), json!("10"), Value::Null,
        ];
        assert!(matches!(to_record(&null_h, &schema), Err(NeoError::Decode(_))));

        let short = vec![json!("A"), json!("1")];
        assert!(matches!(to_record(&short, &schema), Err(NeoError::Decode(_))));

        let garbage = vec![
            json!("A"), json!("1"), json!("2020-Dec-10 00:00"), json!("far"), json!("10"), json!("20"),
        ];
        assert!(matches!(to_record(&garbage, &schema), Err(NeoError::Decode(_))));
    }
}
