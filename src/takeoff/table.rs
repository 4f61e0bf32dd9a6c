use std::{fs::File, io, path::Path};

use csv::StringRecord;
use itertools::Itertools;
use log::info;
use once_cell::sync::Lazy;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::config::Config;

/// Temperature grid points of the performance charts, in °C. Table columns
/// must match this grid exactly.
pub const TEMPERATURE_GRID_C: [f64; 4] = [-25.0, 0.0, 25.0, 50.0];

const ALTITUDE_COLUMN: &str = "Pressure Altitude (ft)";
const MEASUREMENT_COLUMN: &str = "Measurement";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("no performance tables loaded")]
    NoWeightClasses,

    #[error("empty {axis} grid")]
    EmptyGrid { axis: &'static str },

    #[error("duplicate table for weight class {weight_kg} kg")]
    DuplicateWeightClass { weight_kg: f64 },

    #[error(
        "no value tabulated for {measurement} at {weight_kg} kg, {altitude_ft} ft, {temperature_c} °C"
    )]
    MissingCell {
        weight_kg: f64,
        altitude_ft: f64,
        measurement: Measurement,
        temperature_c: f64,
    },

    #[error("tables for {low_kg} kg and {high_kg} kg share no pressure altitude entries")]
    DisjointAltitudeGrids { low_kg: f64, high_kg: f64 },

    #[error("failed to read table {file}: {message}")]
    Read { file: String, message: String },

    #[error("table {file} has unexpected header {got:?}")]
    BadHeader { file: String, got: Vec<String> },

    #[error("table {file}, line {line}: {message}")]
    BadRecord {
        file: String,
        line: u64,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Measurement {
    #[strum(serialize = "Ground Roll")]
    GroundRoll,
    #[strum(serialize = "At 50 ft AGL")]
    Distance50ft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub altitude_ft: f64,
    pub measurement: Measurement,
    pub distances_m: [f64; TEMPERATURE_GRID_C.len()],
}

/// Takeoff distances charted for a single certified weight class. Rows are
/// rectangular: every tabulated pressure altitude carries both measurement
/// kinds, each with a value per temperature grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceTable {
    weight_kg: f64,
    altitudes_ft: Vec<f64>,
    rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    pub fn new(weight_kg: f64, rows: Vec<PerformanceRow>) -> Result<Self, Error> {
        let mut altitudes_ft: Vec<f64> = rows.iter().map(|r| r.altitude_ft).collect();
        altitudes_ft.sort_by(f64::total_cmp);
        altitudes_ft.dedup();

        if altitudes_ft.is_empty() {
            return Err(Error::EmptyGrid {
                axis: "pressure altitude",
            });
        }

        let table = Self {
            weight_kg,
            altitudes_ft,
            rows,
        };

        for &altitude_ft in &table.altitudes_ft {
            for measurement in [Measurement::GroundRoll, Measurement::Distance50ft] {
                table.lookup(altitude_ft, measurement, TEMPERATURE_GRID_C[0])?;
            }
        }

        Ok(table)
    }

    pub fn from_csv_path(weight_kg: f64, path: &Path) -> Result<Self, Error> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::Read {
            file: label.clone(),
            message: e.to_string(),
        })?;

        Self::from_csv_reader(weight_kg, &label, file)
    }

    pub fn from_csv_reader<R: io::Read>(
        weight_kg: f64,
        file: &str,
        reader: R,
    ) -> Result<Self, Error> {
        let mut rdr = csv::Reader::from_reader(reader);

        let got: Vec<String> = rdr
            .headers()
            .map_err(|e| Error::Read {
                file: file.to_string(),
                message: e.to_string(),
            })?
            .iter()
            .map(str::to_string)
            .collect();
        if got != expected_header() {
            return Err(Error::BadHeader {
                file: file.to_string(),
                got,
            });
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| Error::Read {
                file: file.to_string(),
                message: e.to_string(),
            })?;
            rows.push(parse_record(file, &record)?);
        }

        Self::new(weight_kg, rows)
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Sorted distinct pressure altitude grid of this table.
    pub fn altitudes_ft(&self) -> &[f64] {
        &self.altitudes_ft
    }

    /// Tabulated distance at an exact (altitude, measurement, temperature)
    /// grid point. A missing cell means a malformed source chart and is
    /// fatal for the whole computation.
    pub fn lookup(
        &self,
        altitude_ft: f64,
        measurement: Measurement,
        temperature_c: f64,
    ) -> Result<f64, Error> {
        let missing = || Error::MissingCell {
            weight_kg: self.weight_kg,
            altitude_ft,
            measurement,
            temperature_c,
        };

        let row = self
            .rows
            .iter()
            .find(|r| r.altitude_ft == altitude_ft && r.measurement == measurement)
            .ok_or_else(missing)?;
        let index = TEMPERATURE_GRID_C
            .iter()
            .position(|&t| t == temperature_c)
            .ok_or_else(missing)?;

        Ok(row.distances_m[index])
    }
}

fn expected_header() -> Vec<String> {
    let mut columns = vec![ALTITUDE_COLUMN.to_string(), MEASUREMENT_COLUMN.to_string()];
    columns.extend(TEMPERATURE_GRID_C.iter().map(|t| format!("{t}°C")));
    columns
}

fn parse_record(file: &str, record: &StringRecord) -> Result<PerformanceRow, Error> {
    let line = record.position().map_or(0, |p| p.line());
    let bad = |message: String| Error::BadRecord {
        file: file.to_string(),
        line,
        message,
    };

    let altitude_ft: f64 = record[0]
        .parse()
        .map_err(|_| bad(format!("bad pressure altitude '{}'", &record[0])))?;
    let measurement: Measurement = record[1]
        .parse()
        .map_err(|_| bad(format!("unknown measurement '{}'", &record[1])))?;

    let mut distances_m = [0.0; TEMPERATURE_GRID_C.len()];
    for (i, value) in distances_m.iter_mut().enumerate() {
        *value = record[i + 2]
            .parse()
            .map_err(|_| bad(format!("bad distance '{}'", &record[i + 2])))?;
    }

    Ok(PerformanceRow {
        altitude_ft,
        measurement,
        distances_m,
    })
}

/// The full set of charted weight classes, sorted by weight. Built once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSet {
    tables: Vec<PerformanceTable>,
}

impl TableSet {
    pub fn new(mut tables: Vec<PerformanceTable>) -> Result<Self, Error> {
        if tables.is_empty() {
            return Err(Error::NoWeightClasses);
        }

        tables.sort_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg));
        for (a, b) in tables.iter().tuple_windows() {
            if a.weight_kg == b.weight_kg {
                return Err(Error::DuplicateWeightClass {
                    weight_kg: a.weight_kg,
                });
            }
        }

        Ok(Self { tables })
    }

    pub fn load(config: &Config) -> Result<Self, Error> {
        let tables = config
            .tables
            .iter()
            .map(|t| PerformanceTable::from_csv_path(t.weight_kg, &t.file))
            .collect::<Result<Vec<_>, _>>()?;

        let set = Self::new(tables)?;
        info!(
            "loaded performance tables for weight classes {:?} kg",
            set.weights_kg()
        );

        Ok(set)
    }

    /// Sorted charted weight classes.
    pub fn weights_kg(&self) -> Vec<f64> {
        self.tables.iter().map(|t| t.weight_kg).collect()
    }

    pub fn table_for(&self, weight_kg: f64) -> Option<&PerformanceTable> {
        self.tables.iter().find(|t| t.weight_kg == weight_kg)
    }
}

/// Compiled-in performance data, loaded once per process.
pub static DEFAULT_TABLES: Lazy<TableSet> = Lazy::new(|| {
    let embedded = [
        (
            550.0,
            "takeoff_550.csv (embedded)",
            include_str!("../../config/takeoff_550.csv"),
        ),
        (
            600.0,
            "takeoff_600.csv (embedded)",
            include_str!("../../config/takeoff_600.csv"),
        ),
        (
            650.0,
            "takeoff_650.csv (embedded)",
            include_str!("../../config/takeoff_650.csv"),
        ),
    ];

    embedded
        .into_iter()
        .map(|(weight_kg, file, data)| {
            PerformanceTable::from_csv_reader(weight_kg, file, data.as_bytes())
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(TableSet::new)
        .expect("embedded performance tables are well formed")
});

#[cfg(test)]
mod tests {
    use super::*;

    fn row(altitude_ft: f64, measurement: Measurement, distances_m: [f64; 4]) -> PerformanceRow {
        PerformanceRow {
            altitude_ft,
            measurement,
            distances_m,
        }
    }

    #[test]
    fn test_lookup() {
        let table = PerformanceTable::new(
            600.0,
            vec![
                row(0.0, Measurement::GroundRoll, [100.0, 120.0, 140.0, 160.0]),
                row(0.0, Measurement::Distance50ft, [200.0, 220.0, 240.0, 260.0]),
            ],
        )
        .unwrap();

        assert_eq!(table.lookup(0.0, Measurement::GroundRoll, -25.0), Ok(100.0));
        assert_eq!(
            table.lookup(0.0, Measurement::Distance50ft, 50.0),
            Ok(260.0)
        );

        assert_eq!(
            table.lookup(1000.0, Measurement::GroundRoll, 0.0),
            Err(Error::MissingCell {
                weight_kg: 600.0,
                altitude_ft: 1000.0,
                measurement: Measurement::GroundRoll,
                temperature_c: 0.0,
            })
        );
        // 15 °C is not a grid point.
        assert!(table.lookup(0.0, Measurement::GroundRoll, 15.0).is_err());
    }

    #[test]
    fn test_rectangularity_enforced() {
        // 1000 ft has a ground roll row but no 50 ft row.
        let result = PerformanceTable::new(
            600.0,
            vec![
                row(0.0, Measurement::GroundRoll, [100.0, 120.0, 140.0, 160.0]),
                row(0.0, Measurement::Distance50ft, [200.0, 220.0, 240.0, 260.0]),
                row(1000.0, Measurement::GroundRoll, [110.0, 130.0, 150.0, 170.0]),
            ],
        );

        assert_eq!(
            result,
            Err(Error::MissingCell {
                weight_kg: 600.0,
                altitude_ft: 1000.0,
                measurement: Measurement::Distance50ft,
                temperature_c: TEMPERATURE_GRID_C[0],
            })
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            PerformanceTable::new(600.0, vec![]),
            Err(Error::EmptyGrid {
                axis: "pressure altitude"
            })
        );
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "\
Pressure Altitude (ft),Measurement,-25°C,0°C,25°C,50°C
0,Ground Roll,100,120,140,160
0,At 50 ft AGL,200,220,240,260
2000,Ground Roll,130,150,170,190
2000,At 50 ft AGL,250,270,290,310
";

        let table = PerformanceTable::from_csv_reader(550.0, "inline", data.as_bytes()).unwrap();

        assert_eq!(table.weight_kg(), 550.0);
        assert_eq!(table.altitudes_ft(), &[0.0, 2000.0]);
        assert_eq!(
            table.lookup(2000.0, Measurement::Distance50ft, 25.0),
            Ok(290.0)
        );
    }

    #[test]
    fn test_bad_header_rejected() {
        let data = "\
Pressure Altitude (ft),Measurement,-25°C,0°C,25°C
0,Ground Roll,100,120,140
";

        let result = PerformanceTable::from_csv_reader(550.0, "inline", data.as_bytes());
        assert!(matches!(result, Err(Error::BadHeader { .. })));
    }

    #[test]
    fn test_bad_record_rejected() {
        let data = "\
Pressure Altitude (ft),Measurement,-25°C,0°C,25°C,50°C
0,Ground Roll,100,oops,140,160
";

        let result = PerformanceTable::from_csv_reader(550.0, "inline", data.as_bytes());
        assert!(matches!(result, Err(Error::BadRecord { line: 2, .. })));
    }

    #[test]
    fn test_table_set_rejects_duplicates() {
        let table = PerformanceTable::new(
            600.0,
            vec![
                row(0.0, Measurement::GroundRoll, [100.0, 120.0, 140.0, 160.0]),
                row(0.0, Measurement::Distance50ft, [200.0, 220.0, 240.0, 260.0]),
            ],
        )
        .unwrap();

        assert_eq!(TableSet::new(vec![]), Err(Error::NoWeightClasses));
        assert_eq!(
            TableSet::new(vec![table.clone(), table]),
            Err(Error::DuplicateWeightClass { weight_kg: 600.0 })
        );
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(DEFAULT_TABLES.weights_kg(), vec![550.0, 600.0, 650.0]);

        let table = DEFAULT_TABLES.table_for(600.0).unwrap();
        assert_eq!(table.lookup(0.0, Measurement::GroundRoll, 25.0), Ok(175.0));
        assert_eq!(
            table.lookup(10000.0, Measurement::Distance50ft, 50.0),
            Ok(976.0)
        );
    }
}
