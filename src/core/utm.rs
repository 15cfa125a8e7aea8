//! Inverse UTM projection on the WGS84 ellipsoid.
//!
//! Closed-form series (footpoint latitude plus polynomial corrections in the
//! scaled distance from the central meridian). Accurate to well under a metre
//! inside a zone, degrading gracefully outside it.

use crate::domain::model::{CoordinateQuadruple, GeodeticResult};
use std::f64::consts::PI;

/// Semi-major axis (m)
const A: f64 = 6_378_137.0;
/// First eccentricity
const E: f64 = 0.081_819_191;
/// Second eccentricity squared
const E1SQ: f64 = 0.006_739_497;
/// Central-meridian scale factor
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Longitude of the zone's central meridian.
///
/// Zones below 1 are not valid UTM zones; they get 3.0 instead of an error,
/// which existing consumers rely on.
pub fn central_meridian(zone: i64) -> f64 {
    if zone > 0 {
        6.0 * zone as f64 - 183.0
    } else {
        3.0
    }
}

/// Converts a validated UTM coordinate to geodetic latitude/longitude in
/// degrees. Never fails: nonsensical input yields nonsensical (or NaN) output.
pub fn utm_to_lat_long(input: &CoordinateQuadruple) -> GeodeticResult {
    let northing = if input.northern {
        input.northing
    } else {
        FALSE_NORTHING_SOUTH - input.northing
    };

    let e2 = E * E;
    let arc = northing / K0;
    let mu = arc / (A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let ei = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
    let ca = 3.0 * ei / 2.0 - 27.0 * ei.powi(3) / 32.0;
    let cb = 21.0 * ei.powi(2) / 16.0 - 55.0 * ei.powi(4) / 32.0;
    let cc = 151.0 * ei.powi(3) / 96.0;
    let cd = 1097.0 * ei.powi(4) / 512.0;
    let phi1 = mu
        + ca * (2.0 * mu).sin()
        + cb * (4.0 * mu).sin()
        + cc * (6.0 * mu).sin()
        + cd * (8.0 * mu).sin();

    let sin_term = 1.0 - (E * phi1.sin()).powi(2);
    let n0 = A / sin_term.sqrt();
    let r0 = A * (1.0 - e2) / sin_term.powf(1.5);

    // positive west of the central meridian
    let d0 = (FALSE_EASTING - input.easting) / (n0 * K0);

    let t0 = phi1.tan().powi(2);
    let q0 = E1SQ * phi1.cos().powi(2);

    let fact1 = n0 * phi1.tan() / r0;
    let fact2 = d0 * d0 / 2.0;
    let fact3 = (5.0 + 3.0 * t0 + 10.0 * q0 - 4.0 * q0 * q0 - 9.0 * E1SQ) * d0.powi(4) / 24.0;
    let fact4 = (61.0 + 90.0 * t0 + 298.0 * q0 + 45.0 * t0 * t0 - 252.0 * E1SQ - 3.0 * q0 * q0)
        * d0.powi(6)
        / 720.0;

    let lof1 = d0;
    let lof2 = (1.0 + 2.0 * t0 + q0) * d0.powi(3) / 6.0;
    let lof3 = (5.0 - 2.0 * q0 + 28.0 * t0 - 3.0 * q0.powi(2) + 8.0 * E1SQ + 24.0 * t0.powi(2))
        * d0.powi(5)
        / 120.0;
    let delta_lon = (lof1 - lof2 + lof3) / phi1.cos() * 180.0 / PI;

    let mut latitude = 180.0 * (phi1 - fact1 * (fact2 + fact3 + fact4)) / PI;
    if !input.northern {
        latitude = -latitude;
    }

    GeodeticResult {
        latitude,
        longitude: central_meridian(input.zone) - delta_lon,
    }
}
