// Driving distances between two coordinate files, depot to customer and back.

#[macro_use]
extern crate distance_tables;
use distance_tables::{
    cli::CliErr,
    io::{read_coordinates, ColumnPair, CrossWriter},
    osrm::{Config, Router},
    report::*,
    table,
};
use std::{env, error::Error, fs::File, io::BufWriter};

// the seller and customer exports carry their coordinates in different columns
const DEPOT_COLUMNS: ColumnPair = ColumnPair { lat: 9, lng: 10 };
const CUSTOMER_COLUMNS: ColumnPair = ColumnPair { lat: 7, lng: 8 };

fn main() -> Result<(), Box<dyn Error>> {
    let _reporter = enable_reporting("calculate_cross_distances");

    let mut args = env::args().skip(1);
    let depots_input = args.next().ok_or(CliErr("No depot csv arg given"))?;
    let customers_input = args.next().ok_or(CliErr("No customer csv arg given"))?;
    let output = args.next().ok_or(CliErr("No output csv arg given"))?;
    let max_rows = args.next().map(|arg| arg.parse()).transpose()?;
    report!("depots_input", depots_input);
    report!("customers_input", customers_input);
    report!("output", output);
    report!("max_rows", max_rows);

    let depot_columns = ColumnPair::from_env("DEPOT_LAT_COLUMN", "DEPOT_LNG_COLUMN", DEPOT_COLUMNS);
    let customer_columns = ColumnPair::from_env("CUSTOMER_LAT_COLUMN", "CUSTOMER_LNG_COLUMN", CUSTOMER_COLUMNS);

    // the same row limit applies to both files, like it always has
    let depots = read_coordinates(File::open(&depots_input)?, depot_columns, max_rows)?;
    let customers = read_coordinates(File::open(&customers_input)?, customer_columns, max_rows)?;
    report!("num_depots", depots.len());
    report!("num_customers", customers.len());
    report!("num_threads", rayon::current_num_threads());

    let router = Router::connect(Config::from_env())?;
    let mut writer = CrossWriter::new(BufWriter::new(File::create(&output)?))?;
    let stats = report_time("cross distance table", || {
        table::cross_distance_table(&depots, &customers, &router, &mut writer)
    })?;
    writer.flush()?;

    report!("num_rows", stats.rows);
    report!("num_route_errors", stats.errors);

    Ok(())
}
