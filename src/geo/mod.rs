//! Great-circle distance and speed derivation for consecutive fixes.

/// Mean Earth radius in meters used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates, via haversine.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Speed in m/s from a distance and the elapsed time. Returns 0 when the
/// elapsed time is zero or negative (clock non-monotonicity).
pub fn speed_mps(distance_m: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        distance_m / elapsed_secs
    } else {
        0.0
    }
}
