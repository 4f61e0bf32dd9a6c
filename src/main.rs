use std::{env, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use log::warn;
use perfcalc::{
    config::Config,
    takeoff::{
        corrections::RunwaySurface,
        engine::TakeoffQuery,
        table::{DEFAULT_TABLES, TableSet},
    },
};

#[derive(Debug, Parser)]
#[command(version, about = "Takeoff performance calculator")]
struct Args {
    /// Aircraft weight [kg]
    #[arg(long)]
    weight_kg: f64,

    /// Pressure altitude [ft]
    #[arg(long)]
    altitude_ft: f64,

    /// Outside air temperature [°C]
    #[arg(long)]
    temperature_c: f64,

    /// Wind component [kt], positive for headwind
    #[arg(long, default_value_t = 0.0)]
    wind_kt: f64,

    /// Runway surface
    #[arg(long, default_value_t = RunwaySurface::Paved)]
    surface: RunwaySurface,

    /// Runway slope [%], positive uphill
    #[arg(long, default_value_t = 0.0)]
    slope_percent: f64,

    /// Table manifest; the compiled-in tables are used when omitted
    #[arg(long)]
    tables: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Default log level to "info"
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") }
    }

    pretty_env_logger::init();

    let args = Args::parse();

    let loaded;
    let tables = match &args.tables {
        Some(path) => {
            loaded = TableSet::load(&Config::from_path(path)?)?;
            &loaded
        }
        None => &*DEFAULT_TABLES,
    };

    let query = TakeoffQuery {
        weight_kg: args.weight_kg,
        pressure_altitude_ft: args.altitude_ft,
        temperature_c: args.temperature_c,
        wind_kt: args.wind_kt,
        surface: args.surface,
        slope_percent: args.slope_percent,
    };

    let report = tables.takeoff_distances(&query)?;

    for advisory in &report.advisories {
        warn!("{advisory}");
    }

    println!("Corrected ground roll: {} m", report.distances.ground_roll_m);
    println!(
        "Corrected distance over 50 ft AGL: {} m",
        report.distances.distance_50ft_m
    );

    Ok(())
}
