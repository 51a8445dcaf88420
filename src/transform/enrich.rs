//! Derived metrics, distance filter and ordering.

use chrono::NaiveDate;

use super::convert::{convert_au_to_ld, current_distance, diameter_from_magnitude, ld_per_day};
use super::date::{days_between, parse_cd};
use super::schema::RawApproach;
use super::{NeoRecord, NextApproach};
use crate::error::Result;

/// Compute every derived field of one approach relative to `reference`.
///
/// `index` becomes the provisional `id`; [`filter_and_sort`] renumbers.
pub fn enrich(raw: RawApproach, reference: NaiveDate, index: usize) -> Result<NeoRecord> {
    let closest_dist_ld = convert_au_to_ld(raw.dist);
    let diameter = diameter_from_magnitude(raw.h);
    let closest_date = parse_cd(&raw.cd)?;
    let days_until_closest = days_between(reference, closest_date);
    let days_to_closest = days_until_closest.abs();
    let speed = ld_per_day(raw.v_rel);
    // Before and after closest approach the object is farther away, so the
    // projection always uses the unsigned day count.
    let current_dist_ld = current_distance(closest_dist_ld, speed, days_to_closest);

    Ok(NeoRecord {
        id: index,
        designation: raw.designation,
        orbit_id: raw.orbit_id,
        h: raw.h,
        v_rel: raw.v_rel,
        dist: raw.dist,
        cd: raw.cd,
        closest_dist_ld,
        diameter,
        closest_date,
        days_to_closest,
        days_until_closest,
        ld_per_day: speed,
        current_dist_ld,
        next_approach: NextApproach::Pending,
    })
}

/// Keep records currently closer than `threshold_ld`, nearest first, and
/// assign positional ids.
pub fn filter_and_sort(records: Vec<NeoRecord>, threshold_ld: f64) -> Vec<NeoRecord> {
    let mut kept: Vec<NeoRecord> = records
        .into_iter()
        .filter(|r| r.current_dist_ld < threshold_ld)
        .collect();
    kept.sort_by(|a, b| a.current_dist_ld.total_cmp(&b.current_dist_ld));
    for (id, record) in kept.iter_mut().enumerate() {
        record.id = id;
    }
    kept
}
