//! Utility module for command line interfaces

use std::{error::Error, fmt, fmt::Display, str::FromStr};

/// An error struct to wrap simple static error messages
#[derive(Debug)]
pub struct CliErr(pub &'static str);

impl Display for CliErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for CliErr {}

/// Read a tunable from the environment, falling back to a default when the var is not set.
pub fn env_override<T: FromStr>(var: &str, default: T) -> T
where
    T::Err: fmt::Debug,
{
    std::env::var(var).map_or(default, |val| val.parse().unwrap())
}
