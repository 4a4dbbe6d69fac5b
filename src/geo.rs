//! WGS84 coordinates and their OSRM wire rendering.

use std::fmt;

/// A WGS84 coordinate.
///
/// The input CSVs store latitude before longitude while OSRM request paths
/// want longitude first. Reading a record is the only place where the two
/// orders meet, everything downstream uses this struct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl fmt::Display for Coordinate {
    // "{lng},{lat}" as OSRM expects it in a request path
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_longitude_first() {
        let rio = Coordinate { lng: -43.196388, lat: -22.908333 };
        assert_eq!(format!("{}", rio), "-43.196388,-22.908333");
    }
}
