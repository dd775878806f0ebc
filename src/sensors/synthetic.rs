use std::f64::consts::PI;

use log::debug;
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256StarStar;

use super::Error;
use crate::{calibration::Sample, parameters::ParameterMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSensorParams {
    pub bias: Vector3<f64>,
    pub noise_std: f64,
}

impl SyntheticSensorParams {
    /// Reads `bias` (float[3]) and `noise_std` (float) from a sensor parameter map.
    pub fn from_params(params: &ParameterMap) -> Result<Self, Error> {
        let bias = params.get_param("bias")?.value_vec3()?;
        let noise_std = params.get_param("noise_std")?.value_float()?;

        Ok(Self { bias, noise_std })
    }
}

/// 3-axis sensor with a constant bias and gaussian white noise on every axis.
#[derive(Debug, Clone)]
pub struct SyntheticSensor {
    params: SyntheticSensorParams,
    noise: Normal<f64>,
    rngs: [Xoshiro256StarStar; 3],
}

impl SyntheticSensor {
    pub fn new(params: SyntheticSensorParams, seed: u64) -> Result<Self, Error> {
        if !params.noise_std.is_finite() || params.noise_std < 0.0 {
            return Err(Error::BadNoise(params.noise_std));
        }

        let noise =
            Normal::new(0.0, params.noise_std).map_err(|_| Error::BadNoise(params.noise_std))?;

        // Independent streams per axis
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let rngs = std::array::from_fn(|_| {
            let axis_rng = rng.clone();
            rng.jump();
            axis_rng
        });

        Ok(Self {
            params,
            noise,
            rngs,
        })
    }

    pub fn params(&self) -> &SyntheticSensorParams {
        &self.params
    }

    pub fn measure(&mut self, truth: &Vector3<f64>) -> Sample {
        let noise: Vector3<f64> =
            Vector3::from_fn(|axis, _| self.noise.sample(&mut self.rngs[axis]));

        truth + self.params.bias + noise
    }

    /// Readings of a field of norm `field_norm` seen from `n` orientations evenly spread
    /// over the sphere.
    pub fn tumble(&mut self, n: usize, field_norm: f64) -> Result<Vec<Sample>, Error> {
        if n == 0 {
            return Err(Error::NoSamples);
        }
        if !field_norm.is_finite() || field_norm <= 0.0 {
            return Err(Error::BadFieldNorm(field_norm));
        }

        debug!("Generating {n} tumble samples, field norm {field_norm}");

        Ok(fibonacci_sphere(n)
            .map(|dir| self.measure(&(dir * field_norm)))
            .collect())
    }

    /// Readings of a stationary sensor whose ideal output is `reference`.
    pub fn still(&mut self, n: usize, reference: &Vector3<f64>) -> Result<Vec<Sample>, Error> {
        if n == 0 {
            return Err(Error::NoSamples);
        }

        debug!("Generating {n} still samples");

        Ok((0..n).map(|_| self.measure(reference)).collect())
    }
}

fn fibonacci_sphere(n: usize) -> impl Iterator<Item = Vector3<f64>> {
    let golden_angle = PI * (3.0 - 5f64.sqrt());

    (0..n).map(move |i| {
        let z = 1.0 - (2.0 * i as f64 + 1.0) / n as f64;
        let r = (1.0 - z * z).sqrt();
        let (s, c) = (golden_angle * i as f64).sin_cos();

        Vector3::new(r * c, r * s, z)
    })
}
