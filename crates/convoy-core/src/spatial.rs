//! Spatial math for graph construction and obstacle queries.

/// Mean earth radius used by every distance computation in the engine.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points given in decimal degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance in kilometers, the unit edges and candidates carry.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance(lat1, lon1, lat2, lon2) / 1000.0
}

/// Signed road gradient in percent for a climb of `altitude_delta_m` over
/// `distance_km` of ground track. Zero-length segments are flat.
pub fn gradient_percent(altitude_delta_m: f64, distance_km: f64) -> f64 {
    let run_m = distance_km * 1000.0;
    if run_m <= f64::EPSILON {
        return 0.0;
    }
    altitude_delta_m / run_m * 100.0
}
