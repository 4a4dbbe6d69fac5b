//! Reading coordinate CSVs and writing result tables.
//!
//! Inputs are only ever accessed by fixed column index. The first row is
//! always a header and skipped, an optional row limit cuts off the rest.
//! Outputs are the long-form tables downstream tooling consumes, including
//! the ` error` sentinel for pairs the engine could not route.

use std::{
    error::Error,
    fmt,
    io::{Read, Write},
};

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};

use crate::{cli::env_override, geo::Coordinate, osrm::RouteSummary};

/// Sentinel written to the distance and duration columns of unroutable pairs.
/// The leading space is part of the format, downstream consumers string-match on it.
pub const ERROR_SENTINEL: &str = " error";

/// Which columns of an input record hold the coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPair {
    pub lat: usize,
    pub lng: usize,
}

impl ColumnPair {
    /// Column indices can be overridden through the given env vars.
    pub fn from_env(lat_var: &str, lng_var: &str, default: Self) -> Self {
        ColumnPair {
            lat: env_override(lat_var, default.lat),
            lng: env_override(lng_var, default.lng),
        }
    }
}

/// A record had fewer columns than the configured indices.
#[derive(Debug)]
pub struct ColumnOutOfRange {
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for ColumnOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "data row {} has no column {}", self.row, self.column)
    }
}

impl Error for ColumnOutOfRange {}

/// Read the coordinate columns of at most `max_rows` data rows.
pub fn read_coordinates<R: Read>(input: R, columns: ColumnPair, max_rows: Option<usize>) -> Result<Vec<Coordinate>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(input);

    let mut coordinates = Vec::new();
    for (row, line) in reader.records().enumerate() {
        if max_rows.map_or(false, |max| row >= max) {
            break;
        }
        let record = line?;
        let lat = parse_field(&record, row, columns.lat)?;
        let lng = parse_field(&record, row, columns.lng)?;
        coordinates.push(Coordinate { lng, lat });
    }

    Ok(coordinates)
}

fn parse_field(record: &StringRecord, row: usize, column: usize) -> Result<f64, Box<dyn Error>> {
    let field = record.get(column).ok_or(ColumnOutOfRange { row, column })?;
    Ok(field.trim().parse()?)
}

fn render(summary: Option<&RouteSummary>) -> (String, String) {
    match summary {
        Some(summary) => (summary.distance.to_string(), summary.duration.to_string()),
        None => (ERROR_SENTINEL.to_string(), ERROR_SENTINEL.to_string()),
    }
}

/// Writer for the single-file pairwise table.
pub struct PairwiseWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> PairwiseWriter<W> {
    /// Create the writer and emit the header row.
    pub fn new(output: W) -> csv::Result<Self> {
        let mut writer = WriterBuilder::new().from_writer(output);
        writer.write_record(["origin", "destination", "distance", "duration"])?;
        Ok(PairwiseWriter { writer })
    }

    pub fn write_row(&mut self, origin: usize, destination: usize, summary: Option<&RouteSummary>) -> csv::Result<()> {
        let (distance, duration) = render(summary);
        self.writer.write_record([origin.to_string(), destination.to_string(), distance, duration])
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Travel direction of a cross table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromDepot,
    ToDepot,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::FromDepot => "from_depot",
            Direction::ToDepot => "to_depot",
        }
    }
}

/// Writer for the two-file depot/customer table.
///
/// The depot and customer index columns keep their meaning in both directions,
/// only the `direction` column tells which endpoint was the origin.
pub struct CrossWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CrossWriter<W> {
    /// Create the writer and emit the header row.
    pub fn new(output: W) -> csv::Result<Self> {
        let mut writer = WriterBuilder::new().from_writer(output);
        writer.write_record(["direction", "depot", "customer", "distance", "duration"])?;
        Ok(CrossWriter { writer })
    }

    pub fn write_row(&mut self, direction: Direction, depot: usize, customer: usize, summary: Option<&RouteSummary>) -> csv::Result<()> {
        let (distance, duration) = render(summary);
        self.writer
            .write_record([direction.as_str().to_string(), depot.to_string(), customer.to_string(), distance, duration])
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
