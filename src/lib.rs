//! CSV to OSRM distance table tooling.
//!
//! Reads geographic coordinates from CSV files by fixed column index, queries
//! an OSRM routing engine for driving distance and duration between coordinate
//! pairs and writes the results as long-form CSV tables. All shortest path
//! machinery lives inside the engine, this crate only contains the client and
//! the CSV plumbing around it.

pub mod cli;
pub mod geo;
pub mod io;
pub mod osrm;
pub mod report;
pub mod table;

#[allow(dead_code)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
