pub mod transforms;
pub mod wgs84;

use thiserror::Error;

use crate::parameters;

pub use transforms::{FrameType, NavigationFrame, ecef2llh, llh2dcm, llh2ecef};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("Latitude {0} deg is outside [-90, 90]")]
    BadLatitude(f64),

    #[error("Unknown navigation frame type '{0}'")]
    BadFrameType(String),

    #[error("Error reading navigation parameters")]
    Parameter(#[from] parameters::Error),
}
