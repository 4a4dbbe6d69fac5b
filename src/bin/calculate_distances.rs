// Pairwise driving distances within one coordinate file, the long-form N x N table.

#[macro_use]
extern crate distance_tables;
use distance_tables::{
    cli::CliErr,
    io::{read_coordinates, ColumnPair, PairwiseWriter},
    osrm::{Config, Router},
    report::*,
    table,
};
use std::{env, error::Error, fs::File, io::BufWriter};

// matches the per-city coordinate exports, index column included
const COLUMNS: ColumnPair = ColumnPair { lat: 8, lng: 9 };

fn main() -> Result<(), Box<dyn Error>> {
    let _reporter = enable_reporting("calculate_distances");

    let mut args = env::args().skip(1);
    let input = args.next().ok_or(CliErr("No coordinate csv arg given"))?;
    let output = args.next().ok_or(CliErr("No output csv arg given"))?;
    let max_rows = args.next().map(|arg| arg.parse()).transpose()?;
    report!("input", input);
    report!("output", output);
    report!("max_rows", max_rows);

    let columns = ColumnPair::from_env("LAT_COLUMN", "LNG_COLUMN", COLUMNS);
    let coordinates = read_coordinates(File::open(&input)?, columns, max_rows)?;
    report!("num_coordinates", coordinates.len());
    report!("num_threads", rayon::current_num_threads());

    let router = Router::connect(Config::from_env())?;
    let mut writer = PairwiseWriter::new(BufWriter::new(File::create(&output)?))?;
    let stats = report_time("pairwise distance table", || table::distance_table(&coordinates, &router, &mut writer))?;
    writer.flush()?;

    report!("num_rows", stats.rows);
    report!("num_route_errors", stats.errors);

    Ok(())
}
