pub mod synthetic;

use thiserror::Error;

use crate::parameters;

pub use synthetic::{SyntheticSensor, SyntheticSensorParams};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("Noise standard deviation must be finite and non negative, got {0}")]
    BadNoise(f64),

    #[error("Field norm must be finite and positive, got {0}")]
    BadFieldNorm(f64),

    #[error("At least one sample must be generated")]
    NoSamples,

    #[error("Error reading sensor parameters")]
    Parameter(#[from] parameters::Error),
}
