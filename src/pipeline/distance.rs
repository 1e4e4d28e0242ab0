//! Two-dimensional point distances, matching the usual GPX "length 2D"
//! convention: a flat-earth approximation for nearby points and haversine
//! for anything further apart.

const EARTH_RADIUS_M: f64 = 6_378_137.0;
const ONE_DEGREE_M: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M / 360.0;

/// Beyond this many degrees in either axis the flat approximation is dropped.
const FLAT_LIMIT_DEG: f64 = 0.2;

/// Distance in meters between two `(lat, lon)` pairs, ignoring elevation.
pub fn distance_2d(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    if (lat1 - lat2).abs() > FLAT_LIMIT_DEG || (lon1 - lon2).abs() > FLAT_LIMIT_DEG {
        return haversine_distance(from, to);
    }

    let coef = lat1.to_radians().cos();
    let x = lat1 - lat2;
    let y = (lon1 - lon2) * coef;

    (x * x + y * y).sqrt() * ONE_DEGREE_M
}

pub fn haversine_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let d_lat = (lat1 - lat2).to_radians();
    let d_lon = (lon1 - lon2).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * lat1.to_radians().cos() * lat2.to_radians().cos();

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
