use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ins_nav::{
    calibration::{self, Bias, SensorCalibration},
    parameters,
    sensors::{SyntheticSensor, SyntheticSensorParams},
};
use log::{info, warn};

/// Estimates magnetometer and accelerometer biases from synthetic tumble and still datasets
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/params.toml")]
    params: PathBuf,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Samples per dataset, overrides `sim.samples`
    #[arg(short = 'n', long)]
    samples: Option<usize>,
}

fn main() -> Result<()> {
    // Default log level to "info"
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") }
    }

    pretty_env_logger::init();

    let args = Args::parse();

    info!("Reading parameters from '{}'", args.params.display());
    let params = parameters::parse_file(&args.params)?;

    let num_samples = match args.samples {
        Some(n) => n,
        None => usize::try_from(params.get_param("sim.samples")?.value_int()?)
            .context("'sim.samples' must not be negative")?,
    };

    let mag_params = SyntheticSensorParams::from_params(params.get_map("sim.magnetometer")?)?;
    let field_norm = params
        .get_param("sim.magnetometer.field_norm")?
        .value_float()?;
    let accel_params = SyntheticSensorParams::from_params(params.get_map("sim.accelerometer")?)?;
    let reference = calibration::reference_from_params(&params)?;

    let mut mag = SyntheticSensor::new(mag_params, args.seed)?;
    let mut accel = SyntheticSensor::new(accel_params, args.seed.wrapping_add(1))?;

    let tumble = mag.tumble(num_samples, field_norm)?;
    let still = accel.still(num_samples, &reference)?;

    let stored = SensorCalibration::from_params(&params)?;
    let cal = SensorCalibration::estimate(&tumble, &still, &reference)?;

    log_error("mag", &cal.mag_bias, &mag_params.bias, &stored.mag_bias);
    log_error("accel", &cal.accel_bias, &accel_params.bias, &stored.accel_bias);

    let mag_residual = calibration::mag_bias(&cal.correct_mag(&tumble)?)?;
    let accel_residual = calibration::accel_bias(&cal.correct_accel(&still)?, &reference)?;

    info!(
        "Residual after correction: mag {:.3e}, accel {:.3e}",
        mag_residual.norm(),
        accel_residual.norm()
    );

    println!("[calibration.mag]");
    println!("bias = {}", toml_vec3(&cal.mag_bias));
    println!();
    println!("[calibration.accel]");
    println!("bias = {}", toml_vec3(&cal.accel_bias));

    Ok(())
}

fn log_error(sensor: &str, estimated: &Bias, truth: &Bias, stored: &Bias) {
    let error = (estimated - truth).norm();

    info!(
        "{sensor}: estimated [{:.4}, {:.4}, {:.4}], true [{:.4}, {:.4}, {:.4}], error {:.4}",
        estimated.x, estimated.y, estimated.z, truth.x, truth.y, truth.z, error
    );

    if (stored - estimated).norm() > error.max(f64::EPSILON) {
        warn!(
            "{sensor}: stored bias [{:.4}, {:.4}, {:.4}] is out of date",
            stored.x, stored.y, stored.z
        );
    }
}

fn toml_vec3(v: &Bias) -> String {
    format!(
        "{{ val = [ {}, {}, {} ], type = \"float[]\" }}",
        v.x, v.y, v.z
    )
}
