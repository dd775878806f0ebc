pub mod bias;

use log::info;
use thiserror::Error;

use crate::parameters::{self, ParameterMap};

pub use bias::{
    Bias, Sample, accel_bias, apply_bias, mag_bias, sample_from_slice, samples_from_rows,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot calibrate from an empty sample sequence")]
    EmptyInput,

    #[error("Sample has {found} components, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Error reading calibration parameters")]
    Parameter(#[from] parameters::Error),
}

/// Bias corrections for a magnetometer / accelerometer pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorCalibration {
    pub mag_bias: Bias,
    pub accel_bias: Bias,
}

impl SensorCalibration {
    pub fn new(mag_bias: Bias, accel_bias: Bias) -> Self {
        Self {
            mag_bias,
            accel_bias,
        }
    }

    /// Estimates both biases, the magnetometer from a tumble dataset and the accelerometer
    /// from a still dataset recorded in the orientation described by `reference`.
    pub fn estimate(
        tumble_mag: &[Sample],
        still_accel: &[Sample],
        reference: &Sample,
    ) -> Result<Self, Error> {
        let mag_bias = mag_bias(tumble_mag)?;
        let accel_bias = accel_bias(still_accel, reference)?;

        info!(
            "Calibrated from {} tumble and {} still samples. mag bias: [{:.4}, {:.4}, {:.4}], accel bias: [{:.4}, {:.4}, {:.4}]",
            tumble_mag.len(),
            still_accel.len(),
            mag_bias.x,
            mag_bias.y,
            mag_bias.z,
            accel_bias.x,
            accel_bias.y,
            accel_bias.z,
        );

        Ok(Self::new(mag_bias, accel_bias))
    }

    /// Loads a previously computed calibration from `calibration.mag.bias` and
    /// `calibration.accel.bias`.
    pub fn from_params(params: &ParameterMap) -> Result<Self, Error> {
        let mag_bias = params.get_param("calibration.mag.bias")?.value_vec3()?;
        let accel_bias = params.get_param("calibration.accel.bias")?.value_vec3()?;

        Ok(Self::new(mag_bias, accel_bias))
    }

    pub fn correct_mag(&self, samples: &[Sample]) -> Result<Vec<Sample>, Error> {
        apply_bias(samples, &self.mag_bias)
    }

    pub fn correct_accel(&self, samples: &[Sample]) -> Result<Vec<Sample>, Error> {
        apply_bias(samples, &self.accel_bias)
    }

    pub fn correct_mag_sample(&self, sample: &Sample) -> Sample {
        sample - self.mag_bias
    }

    pub fn correct_accel_sample(&self, sample: &Sample) -> Sample {
        sample - self.accel_bias
    }
}

/// Expected still reading of the accelerometer, from `calibration.accel.reference`.
pub fn reference_from_params(params: &ParameterMap) -> Result<Sample, Error> {
    Ok(params
        .get_param("calibration.accel.reference")?
        .value_vec3()?)
}
