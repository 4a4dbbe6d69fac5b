//! Pair enumeration and table assembly.
//!
//! Routing fans out over the rayon thread pool, rows are written strictly in
//! enumeration order afterwards. The engine seam is the `RouteService` trait,
//! so the loops can be driven by a stub in tests.

use std::{error::Error, io::Write};

use rayon::prelude::*;

use crate::{
    geo::Coordinate,
    io::{CrossWriter, Direction, PairwiseWriter},
    osrm::{RouteError, RouteService, RouteSummary},
};

/// Row and error counts of a finished table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub rows: usize,
    pub errors: usize,
}

impl TableStats {
    fn count(&mut self, outcome: &Option<RouteSummary>) {
        self.rows += 1;
        if outcome.is_none() {
            self.errors += 1;
        }
    }
}

/// Route all pairs on the worker pool. Unroutable pairs become `None` and end
/// up as sentinel rows, engine failures abort the whole run.
fn route_all<S: RouteService + ?Sized>(pairs: Vec<(Coordinate, Coordinate)>, service: &S) -> Result<Vec<Option<RouteSummary>>, RouteError> {
    pairs
        .into_par_iter()
        .map(|(from, to)| match service.route(from, to) {
            Ok(summary) => Ok(Some(summary)),
            Err(RouteError::NoRoute { .. }) => Ok(None),
            Err(err) => Err(err),
        })
        .collect()
}

/// Write the full ordered-pair table for one coordinate list, row-major and
/// including the diagonal.
pub fn distance_table<W: Write, S: RouteService + ?Sized>(
    coordinates: &[Coordinate],
    service: &S,
    writer: &mut PairwiseWriter<W>,
) -> Result<TableStats, Box<dyn Error>> {
    let pairs = coordinates
        .iter()
        .flat_map(|&from| coordinates.iter().map(move |&to| (from, to)))
        .collect();
    let outcomes = route_all(pairs, service)?;

    let mut stats = TableStats::default();
    let n = coordinates.len();
    for (idx, outcome) in outcomes.iter().enumerate() {
        writer.write_row(idx / n, idx % n, outcome.as_ref())?;
        stats.count(outcome);
    }
    Ok(stats)
}

/// Write the depot to customer table followed by the customer to depot table.
/// The index columns keep their depot/customer meaning in both directions.
pub fn cross_distance_table<W: Write, S: RouteService + ?Sized>(
    depots: &[Coordinate],
    customers: &[Coordinate],
    service: &S,
    writer: &mut CrossWriter<W>,
) -> Result<TableStats, Box<dyn Error>> {
    let mut pairs: Vec<(Coordinate, Coordinate)> = Vec::with_capacity(2 * depots.len() * customers.len());
    pairs.extend(depots.iter().flat_map(|&from| customers.iter().map(move |&to| (from, to))));
    pairs.extend(customers.iter().flat_map(|&from| depots.iter().map(move |&to| (from, to))));
    let outcomes = route_all(pairs, service)?;

    let mut stats = TableStats::default();
    let (from_depot, to_depot) = outcomes.split_at(depots.len() * customers.len());
    for (idx, outcome) in from_depot.iter().enumerate() {
        writer.write_row(Direction::FromDepot, idx / customers.len(), idx % customers.len(), outcome.as_ref())?;
        stats.count(outcome);
    }
    for (idx, outcome) in to_depot.iter().enumerate() {
        writer.write_row(Direction::ToDepot, idx % depots.len(), idx / depots.len(), outcome.as_ref())?;
        stats.count(outcome);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    // grid world: distance is manhattan in millidegrees, duration a minute per degree,
    // anything touching lng 99 is unroutable
    struct GridService;

    impl RouteService for GridService {
        fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, RouteError> {
            if from.lng == 99.0 || to.lng == 99.0 {
                return Err(RouteError::NoRoute { code: "NoRoute".to_string() });
            }
            let delta = (from.lng - to.lng).abs() + (from.lat - to.lat).abs();
            Ok(RouteSummary {
                distance: delta * 1000.0,
                duration: delta * 60.0,
            })
        }
    }

    fn coordinate(lng: f64, lat: f64) -> Coordinate {
        Coordinate { lng, lat }
    }

    #[test]
    fn pairwise_table_is_row_major_with_diagonal() {
        let coordinates = [coordinate(0.0, 0.0), coordinate(1.0, 0.0), coordinate(2.0, 0.0)];
        let mut buffer = Vec::new();
        let stats = {
            let mut writer = PairwiseWriter::new(&mut buffer).unwrap();
            let stats = distance_table(&coordinates, &GridService, &mut writer).unwrap();
            writer.flush().unwrap();
            stats
        };

        assert_eq!(stats, TableStats { rows: 9, errors: 0 });
        let output = String::from_utf8(buffer).unwrap();
        let expected = "\
origin,destination,distance,duration
0,0,0,0
0,1,1000,60
0,2,2000,120
1,0,1000,60
1,1,0,0
1,2,1000,60
2,0,2000,120
2,1,1000,60
2,2,0,0
";
        assert_eq!(output, expected);
    }

    #[test]
    fn unroutable_pairs_do_not_abort_the_table() {
        let coordinates = [coordinate(0.0, 0.0), coordinate(99.0, 0.0)];
        let mut buffer = Vec::new();
        let stats = {
            let mut writer = PairwiseWriter::new(&mut buffer).unwrap();
            let stats = distance_table(&coordinates, &GridService, &mut writer).unwrap();
            writer.flush().unwrap();
            stats
        };

        assert_eq!(stats, TableStats { rows: 4, errors: 3 });
        let output = String::from_utf8(buffer).unwrap();
        let expected = "\
origin,destination,distance,duration
0,0,0,0
0,1, error, error
1,0, error, error
1,1, error, error
";
        assert_eq!(output, expected);
    }

    #[test]
    fn empty_coordinate_list_gives_a_header_only_table() {
        let mut buffer = Vec::new();
        let stats = {
            let mut writer = PairwiseWriter::new(&mut buffer).unwrap();
            let stats = distance_table(&[], &GridService, &mut writer).unwrap();
            writer.flush().unwrap();
            stats
        };

        assert_eq!(stats, TableStats { rows: 0, errors: 0 });
        assert_eq!(String::from_utf8(buffer).unwrap(), "origin,destination,distance,duration\n");
    }

    #[test]
    fn cross_table_keeps_index_meaning_in_both_directions() {
        let depots = [coordinate(0.0, 0.0)];
        let customers = [coordinate(1.0, 0.0), coordinate(99.0, 0.0)];
        let mut buffer = Vec::new();
        let stats = {
            let mut writer = CrossWriter::new(&mut buffer).unwrap();
            let stats = cross_distance_table(&depots, &customers, &GridService, &mut writer).unwrap();
            writer.flush().unwrap();
            stats
        };

        assert_eq!(stats, TableStats { rows: 4, errors: 2 });
        let output = String::from_utf8(buffer).unwrap();
        let expected = "\
direction,depot,customer,distance,duration
from_depot,0,0,1000,60
from_depot,0,1, error, error
to_depot,0,0,1000,60
to_depot,0,1, error, error
";
        assert_eq!(output, expected);
    }

    #[test]
    fn cross_table_row_order_is_depot_major_then_customer_major() {
        let depots = [coordinate(0.0, 0.0), coordinate(0.0, 1.0)];
        let customers = [coordinate(1.0, 0.0), coordinate(2.0, 0.0), coordinate(3.0, 0.0)];
        let mut buffer = Vec::new();
        {
            let mut writer = CrossWriter::new(&mut buffer).unwrap();
            cross_distance_table(&depots, &customers, &GridService, &mut writer).unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let index_columns: Vec<(String, String, String)> = output
            .lines()
            .skip(1)
            .map(|line| {
                let mut fields = line.split(',');
                (
                    fields.next().unwrap().to_string(),
                    fields.next().unwrap().to_string(),
                    fields.next().unwrap().to_string(),
                )
            })
            .collect();

        let expected: Vec<(String, String, String)> = [
            ("from_depot", "0", "0"),
            ("from_depot", "0", "1"),
            ("from_depot", "0", "2"),
            ("from_depot", "1", "0"),
            ("from_depot", "1", "1"),
            ("from_depot", "1", "2"),
            ("to_depot", "0", "0"),
            ("to_depot", "1", "0"),
            ("to_depot", "0", "1"),
            ("to_depot", "1", "1"),
            ("to_depot", "0", "2"),
            ("to_depot", "1", "2"),
        ]
        .iter()
        .map(|(direction, depot, customer)| (direction.to_string(), depot.to_string(), customer.to_string()))
        .collect();
        assert_eq!(index_columns, expected);
    }
}
