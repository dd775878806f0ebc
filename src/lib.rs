pub mod calibration;
pub mod nav;
pub mod parameters;
pub mod sensors;
