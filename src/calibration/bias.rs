use itertools::{Itertools, MinMaxResult};
use log::debug;
use nalgebra::Vector3;

use super::Error;

/// A single 3-axis sensor reading.
pub type Sample = Vector3<f64>;

/// Constant per-axis offset subtracted from every sample of a sensor.
pub type Bias = Vector3<f64>;

pub fn sample_from_slice(row: &[f64]) -> Result<Sample, Error> {
    if row.len() != 3 {
        return Err(Error::DimensionMismatch {
            expected: 3,
            found: row.len(),
        });
    }

    Ok(Sample::from_column_slice(row))
}

pub fn samples_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Vec<Sample>, Error> {
    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }

    rows.iter().map(|r| sample_from_slice(r.as_ref())).collect()
}

/// Hard iron offset of a magnetometer: the midpoint of the range observed on each axis.
///
/// `samples` should come from a tumble dataset, where the sensor was rotated through as
/// many orientations as possible. The estimate assumes the field response is symmetric
/// around the offset on every axis, it is not an ellipsoid fit.
pub fn mag_bias(samples: &[Sample]) -> Result<Bias, Error> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut bias = Bias::zeros();

    for axis in 0..3 {
        bias[axis] = match samples.iter().map(|s| s[axis]).minmax() {
            MinMaxResult::NoElements => return Err(Error::EmptyInput),
            MinMaxResult::OneElement(v) => v,
            MinMaxResult::MinMax(min, max) => (max + min) / 2.0,
        };
    }

    debug!(
        "Magnetometer bias from {} samples: [{:.6}, {:.6}, {:.6}]",
        samples.len(),
        bias.x,
        bias.y,
        bias.z
    );

    Ok(bias)
}

/// Accelerometer offset as the mean of a still dataset minus the expected `reference`
/// reading for the orientation it was recorded in.
pub fn accel_bias(samples: &[Sample], reference: &Sample) -> Result<Bias, Error> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mean = samples.iter().sum::<Sample>() / samples.len() as f64;
    let bias = mean - reference;

    debug!(
        "Accelerometer bias from {} samples: [{:.6}, {:.6}, {:.6}]",
        samples.len(),
        bias.x,
        bias.y,
        bias.z
    );

    Ok(bias)
}

pub fn apply_bias(samples: &[Sample], bias: &Bias) -> Result<Vec<Sample>, Error> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(samples.iter().map(|s| s - bias).collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_mag_bias_symmetric_range() {
        let b = Vector3::new(3.0, -7.5, 12.25);

        let samples = vec![
            b - Vector3::new(1.0, 1.0, 1.0),
            b - Vector3::new(1.0, 1.0, 1.0),
            b + Vector3::new(1.0, 1.0, 1.0),
        ];

        assert_eq!(mag_bias(&samples), Ok(b));
    }

    #[test]
    fn test_mag_bias_independent_axes() {
        let samples = vec![
            Vector3::new(-10.0, 40.0, 0.0),
            Vector3::new(30.0, -20.0, 1.0),
            Vector3::new(5.0, 0.0, -3.0),
        ];

        assert_eq!(mag_bias(&samples), Ok(Vector3::new(10.0, 10.0, -1.0)));
    }

    #[test]
    fn test_mag_bias_single_sample() {
        let s = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(mag_bias(&[s]), Ok(s));
    }

    #[test]
    fn test_accel_bias_constant() {
        let v = Vector3::new(0.02, -0.01, 1.03);
        let r = Vector3::new(0.0, 0.0, 1.0);
        let samples = vec![v; 64];

        assert_relative_eq!(accel_bias(&samples, &r).unwrap(), v - r, epsilon = 1e-12);

        let level = vec![r; 10];
        assert_eq!(accel_bias(&level, &r), Ok(Vector3::zeros()));
    }

    #[test]
    fn test_accel_bias_mean() {
        let samples = vec![
            Vector3::new(1.0, 0.0, 9.0),
            Vector3::new(3.0, 2.0, 11.0),
        ];
        let r = Vector3::new(0.0, 0.0, 9.81);

        assert_relative_eq!(
            accel_bias(&samples, &r).unwrap(),
            Vector3::new(2.0, 1.0, 10.0 - 9.81),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_input() {
        let r = Vector3::new(0.0, 0.0, 1.0);

        assert_eq!(mag_bias(&[]), Err(Error::EmptyInput));
        assert_eq!(accel_bias(&[], &r), Err(Error::EmptyInput));
        assert_eq!(apply_bias(&[], &r), Err(Error::EmptyInput));
        assert_eq!(
            samples_from_rows::<Vec<f64>>(&[]),
            Err(Error::EmptyInput)
        );
    }

    #[test]
    fn test_apply_bias_round_trip() {
        let original = vec![
            Vector3::new(0.1, -0.2, 0.3),
            Vector3::new(-45.0, 12.5, 3.0),
            Vector3::new(1e3, -1e-3, 0.0),
        ];
        let b = Vector3::new(-1.5, 22.0, 0.125);

        let shifted: Vec<Sample> = original.iter().map(|s| s + b).collect();
        let restored = apply_bias(&shifted, &b).unwrap();

        for (r, o) in restored.iter().zip(original.iter()) {
            assert_relative_eq!(r, o, epsilon = 1e-9);
        }

        // Input left untouched
        assert_relative_eq!(shifted[0], original[0] + b);
    }

    #[test]
    fn test_apply_zero_bias() {
        let samples = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 5.5, -6.25)];

        assert_eq!(apply_bias(&samples, &Vector3::zeros()), Ok(samples));
    }

    #[test]
    fn test_rows() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(
            samples_from_rows(&rows),
            Ok(vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)])
        );

        let rows = [[1.0, 2.0, 3.0]];
        assert_eq!(samples_from_rows(&rows), Ok(vec![Vector3::new(1.0, 2.0, 3.0)]));

        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
        assert_eq!(
            samples_from_rows(&rows),
            Err(Error::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );

        assert_eq!(
            sample_from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Err(Error::DimensionMismatch {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_end_to_end() {
        let mag = vec![Vector3::new(-10.0, -5.0, 2.0), Vector3::new(10.0, 5.0, -2.0)];
        assert_eq!(mag_bias(&mag), Ok(Vector3::zeros()));

        let accel = vec![Vector3::new(0.1, 0.0, 0.95), Vector3::new(-0.1, 0.0, 1.05)];
        let bias = accel_bias(&accel, &Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(bias, Vector3::zeros(), epsilon = 1e-12);
    }
}
