//! Chart placement for enriched records.
//!
//! Horizontal: one lane per orbit-solution digit, jittered inside the lane so
//! neighbours overlap less. Vertical: proportional to current distance, Earth
//! at the top. Size and fill come from fixed lookup tables.

use rand::Rng;

use super::color::ApproachColor;
use crate::config::VizConfig;
use crate::error::{NeoError, Result};
use crate::transform::NeoRecord;

/// Sub-intervals a lane is split into for jitter.
pub const JITTER_SLOTS: u32 = 5;

/// Display attributes of one record. Joined to the record through `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: usize,
    pub lane: u8,
    pub x: f64,
    pub y: f64,
    pub radius: u32,
    pub color: ApproachColor,
}

/// Lane index from the last character of the orbit id.
pub fn lane(orbit_id: &str) -> Result<u8> {
    orbit_id
        .trim_end()
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
        .ok_or_else(|| {
            NeoError::Parse(format!("orbit id '{}' does not end in a lane digit", orbit_id))
        })
}

/// Lane center plus an offset drawn from one of [`JITTER_SLOTS`] equal
/// sub-intervals of the lane. Always stays inside the lane.
pub fn x_position<R: Rng + ?Sized>(lane: u8, lane_width: f64, rng: &mut R) -> f64 {
    let center = (lane as f64 + 0.5) * lane_width;
    let slot_width = lane_width / JITTER_SLOTS as f64;
    let slot = rng.gen_range(0..JITTER_SLOTS) as f64;
    let within: f64 = rng.gen();
    center - lane_width / 2.0 + (slot + within) * slot_width
}

pub fn y_position(distance_ld: f64, multiplier: f64) -> f64 {
    (distance_ld * multiplier).ceil()
}

/// Circle radius from estimated diameter in metres.
pub fn radius_bucket(diameter_m: f64) -> u32 {
    match diameter_m {
        d if d < 10.0 => 5,
        d if d < 30.0 => 10,
        d if d < 100.0 => 20,
        d if d < 1000.0 => 40,
        _ => 80,
    }
}

/// Fill from whole days to closest approach.
pub fn color_bucket(days_to_closest: i64) -> ApproachColor {
    match days_to_closest {
        d if d < 1 => ApproachColor::White,
        d if d < 7 => ApproachColor::LightGray,
        d if d < 30 => ApproachColor::MidGray,
        d if d < 60 => ApproachColor::DarkGray,
        _ => ApproachColor::Darkest,
    }
}

/// Place every record; records without a usable lane are left out.
pub fn layout_records<R: Rng + ?Sized>(
    records: &[NeoRecord],
    config: &VizConfig,
    rng: &mut R,
) -> Vec<Placement> {
    let lane_width = config.lane_width();
    let multiplier = config.y_multiplier();

    records
        .iter()
        .filter_map(|record| match lane(&record.orbit_id) {
            Ok(lane) => Some(Placement {
                id: record.id,
                lane,
                x: x_position(lane, lane_width, rng),
                y: y_position(record.current_dist_ld, multiplier),
                radius: radius_bucket(record.diameter),
                color: color_bucket(record.days_to_closest),
            }),
            Err(e) => {
                log::warn!("skipping {}: {}", record.designation, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lane_from_last_digit() {
        assert_eq!(lane("17").unwrap(), 7);
        assert_eq!(lane("JPL 3").unwrap(), 3);
        assert_eq!(lane("0").unwrap(), 0);
        assert!(matches!(lane("12a"), Err(NeoError::Parse(_))));
        assert!(matches!(lane(""), Err(NeoError::Parse(_))));
    }

    #[test]
    fn radius_boundaries() {
        assert_eq!(radius_bucket(0.0), 5);
        assert_eq!(radius_bucket(9.99), 5);
        assert_eq!(radius_bucket(10.0), 10);
        assert_eq!(radius_bucket(30.0), 20);
        assert_eq!(radius_bucket(100.0), 40);
        assert_eq!(radius_bucket(999.0), 40);
        assert_eq!(radius_bucket(1000.0), 80);
    }

    #[test]
    fn color_boundaries_are_half_open() {
        assert_eq!(color_bucket(0), ApproachColor::White);
        assert_eq!(color_bucket(1), ApproachColor::LightGray);
        assert_eq!(color_bucket(6), ApproachColor::LightGray);
        assert_eq!(color_bucket(7), ApproachColor::MidGray);
        assert_eq!(color_bucket(30), ApproachColor::DarkGray);
        assert_eq!(color_bucket(59), ApproachColor::DarkGray);
        assert_eq!(color_bucket(60), ApproachColor::Darkest);
    }

    #[test]
    fn y_rounds_up() {
        assert_eq!(y_position(3.2, 30.0), 96.0);
        assert_eq!(y_position(0.01, 30.0), 1.0);
        assert_eq!(y_position(0.0, 30.0), 0.0);
    }

    #[test]
    fn seeded_layout_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs_a: Vec<f64> = (0..20).map(|i| x_position(i % 10, 100.0, &mut a)).collect();
        let xs_b: Vec<f64> = (0..20).map(|i| x_position(i % 10, 100.0, &mut b)).collect();
        assert_eq!(xs_a, xs_b);
    }

    proptest! {
        #[test]
        fn radius_is_monotonic(a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(radius_bucket(lo) <= radius_bucket(hi));
        }

        #[test]
        fn color_is_total_and_ordered(a in 0i64..400, b in 0i64..400) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ApproachColor::ALL.contains(&color_bucket(lo)));
            prop_assert!(color_bucket(lo) <= color_bucket(hi));
        }

        #[test]
        fn jitter_stays_in_lane(lane in 0u8..10, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let x = x_position(lane, 100.0, &mut rng);
            prop_assert!(x >= lane as f64 * 100.0);
            prop_assert!(x < (lane as f64 + 1.0) * 100.0);
        }
    }
}
