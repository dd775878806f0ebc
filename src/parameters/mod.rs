pub mod parameters;

pub use parameters::{
    Error, Parameter, ParameterMap, ParameterTree, ParameterValue, parse_file, parse_str,
};
