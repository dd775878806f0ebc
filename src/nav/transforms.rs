use nalgebra::{Matrix3, Vector3};

use super::{
    Error,
    wgs84::{E2, RE, semi_minor_axis},
};
use crate::parameters::ParameterMap;

/// ECEF position [m] to latitude [deg], longitude [deg] and height [m], using Bowring's
/// closed form approximation.
pub fn ecef2llh(ecef: &Vector3<f64>) -> Vector3<f64> {
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);

    let p = x.hypot(y);
    let b = semi_minor_axis();
    let ep = (RE * RE - b * b) / (b * b);
    let theta = f64::atan2(z * RE, p * b);

    let lon = f64::atan2(y, x);
    let lat = f64::atan2(
        z + ep * b * theta.sin().powi(3),
        p - E2 * RE * theta.cos().powi(3),
    );

    let rn = prime_vertical_radius(lat);
    let h = p / lat.cos() - rn;

    Vector3::new(lat.to_degrees(), lon.to_degrees(), h)
}

/// Latitude [deg], longitude [deg] and height [m] to ECEF position [m].
pub fn llh2ecef(llh: &Vector3<f64>) -> Vector3<f64> {
    let lat = llh.x.to_radians();
    let lon = llh.y.to_radians();
    let h = llh.z;

    let rn = prime_vertical_radius(lat);

    Vector3::new(
        (rn + h) * lat.cos() * lon.cos(),
        (rn + h) * lat.cos() * lon.sin(),
        (rn * (1.0 - E2) + h) * lat.sin(),
    )
}

/// Direction cosine matrix from ECEF to a wander azimuth navigation frame.
///
/// `lat` and `lon` are in radians, `wander_rad` is the wander angle between north and the
/// frame x axis. With a zero wander angle this is the ECEF to NED rotation.
pub fn llh2dcm(lat: f64, lon: f64, wander_rad: f64) -> Matrix3<f64> {
    let (sw, cw) = wander_rad.sin_cos();

    #[rustfmt::skip]
    let c_gn = Matrix3::new(
        cw,  sw,  0.0,
        -sw, cw,  0.0,
        0.0, 0.0, 1.0,
    );

    c_gn * ecef2ned_dcm(lat, lon)
}

fn prime_vertical_radius(lat: f64) -> f64 {
    RE / (1.0 - E2 * lat.sin().powi(2)).sqrt()
}

#[rustfmt::skip]
fn ecef2ned_dcm(lat: f64, lon: f64) -> Matrix3<f64> {
    let (sl, cl) = lat.sin_cos();
    let (so, co) = lon.sin_cos();

    Matrix3::new(
        -sl * co, -sl * so, cl,
        -so,      co,       0.0,
        -cl * co, -cl * so, -sl,
    )
}

#[rustfmt::skip]
fn ecef2enu_dcm(lat: f64, lon: f64) -> Matrix3<f64> {
    let (sl, cl) = lat.sin_cos();
    let (so, co) = lon.sin_cos();

    Matrix3::new(
        -so,      co,       0.0,
        -sl * co, -sl * so, cl,
        cl * co,  cl * so,  sl,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Ned,
    Enu,
}

impl TryFrom<&str> for FrameType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "ned" => Ok(FrameType::Ned),
            "enu" => Ok(FrameType::Enu),
            _ => Err(Error::BadFrameType(value.to_string())),
        }
    }
}

/// Local tangent plane frame anchored at an ECEF origin.
///
/// Two frames compare equal when they have the same type, regardless of their origin.
#[derive(Debug, Clone, Copy)]
pub struct NavigationFrame {
    origin: Vector3<f64>,
    r: Matrix3<f64>,
    frame_type: FrameType,
}

impl PartialEq for NavigationFrame {
    fn eq(&self, other: &Self) -> bool {
        self.frame_type == other.frame_type
    }
}

impl NavigationFrame {
    pub fn ned_from_llh(lat: f64, lon: f64, alt: f64) -> Result<Self, Error> {
        check_latitude(lat)?;

        Ok(Self {
            origin: llh2ecef(&Vector3::new(lat, lon, alt)),
            r: ecef2ned_dcm(lat.to_radians(), lon.to_radians()),
            frame_type: FrameType::Ned,
        })
    }

    pub fn ned_from_ecef(origin: &Vector3<f64>) -> Self {
        let llh = ecef2llh(origin);

        Self {
            origin: *origin,
            r: ecef2ned_dcm(llh.x.to_radians(), llh.y.to_radians()),
            frame_type: FrameType::Ned,
        }
    }

    pub fn enu_from_llh(lat: f64, lon: f64, alt: f64) -> Result<Self, Error> {
        check_latitude(lat)?;

        Ok(Self {
            origin: llh2ecef(&Vector3::new(lat, lon, alt)),
            r: ecef2enu_dcm(lat.to_radians(), lon.to_radians()),
            frame_type: FrameType::Enu,
        })
    }

    /// Reads `nav.frame` ("ned" or "enu") and `nav.origin_llh` ([deg, deg, m]).
    pub fn from_params(params: &ParameterMap) -> Result<Self, Error> {
        let frame_type = FrameType::try_from(params.get_param("nav.frame")?.value_string()?)?;
        let origin = params.get_param("nav.origin_llh")?.value_vec3()?;

        match frame_type {
            FrameType::Ned => Self::ned_from_llh(origin.x, origin.y, origin.z),
            FrameType::Enu => Self::enu_from_llh(origin.x, origin.y, origin.z),
        }
    }

    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.r
    }

    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    pub fn ecef2nav(&self, p_ecef: &Vector3<f64>) -> Vector3<f64> {
        self.r * (p_ecef - self.origin)
    }

    pub fn nav2ecef(&self, p_nav: &Vector3<f64>) -> Vector3<f64> {
        self.r.transpose() * p_nav + self.origin
    }
}

fn check_latitude(lat: f64) -> Result<(), Error> {
    if lat.is_finite() && lat.abs() <= 90.0 {
        Ok(())
    } else {
        Err(Error::BadLatitude(lat))
    }
}
