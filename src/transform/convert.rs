//! Unit conversions behind the derived record fields.

pub const SECONDS_PER_DAY: f64 = 86400.0;

/// One lunar distance expressed in astronomical units.
pub const AU_AS_LD: f64 = 0.002569;

/// Mean Earth–Moon distance in kilometres.
pub const LD_TO_KM: f64 = 384402.0;

/// Geometric albedo assumed for every object (the value JPL most often uses).
pub const ALBEDO: f64 = 0.14;

/// Diameter/magnitude relation constant, in kilometres.
const DIAMETER_CONSTANT_KM: f64 = 1329.0;

/// Astronomical units to lunar distances.
#[inline]
pub fn convert_au_to_ld(au: f64) -> f64 {
    au / AU_AS_LD
}

/// Estimated diameter in metres from absolute magnitude `h`.
///
/// `D = 1329 km / sqrt(albedo) * 10^(-h/5)`
#[inline]
pub fn diameter_from_magnitude(h: f64) -> f64 {
    10f64.powf(-0.2 * h) / ALBEDO.sqrt() * DIAMETER_CONSTANT_KM * 1000.0
}

/// Relative velocity in km/s to lunar distances per day.
#[inline]
pub fn ld_per_day(velocity_km_s: f64) -> f64 {
    velocity_km_s * SECONDS_PER_DAY / LD_TO_KM
}

/// Distance at the reference date, assuming the object closes on (or recedes
/// from) its closest point at constant speed.
#[inline]
pub fn current_distance(closest_ld: f64, ld_per_day: f64, days: i64) -> f64 {
    closest_ld + ld_per_day * days as f64
}
