//! WGS84 earth model constants

/// Semi-major axis [m]
pub const RE: f64 = 6378137.0;

/// 1 / 298.257223563
pub const FLATTENING: f64 = 0.00335281066475;

/// First eccentricity squared
pub const E2: f64 = 0.00669437999014;

/// Earth rotation rate [rad/s]
pub const RATE: f64 = 7.2921157e-5;

/// Schuler frequency [rad/s]
pub const SF: f64 = 1.2383e-3;

/// Gravitational parameter [m^3/s^2]
pub const MU: f64 = 3.986004418e14;

/// Equatorial gravity [m/s^2]
pub const G0: f64 = 9.7803253359;

/// Nominal gravity [m/s^2]
pub const GRAVITY: f64 = 9.81;

/// Semi-minor axis [m]
pub fn semi_minor_axis() -> f64 {
    RE * (1.0 - FLATTENING)
}
