//! Taxi dropoff analysis tool
//!
//! Reads trip records from CSV, keeps the trips picked up near a location
//! within a date window, then reports the dominant dropoff destinations
//! (adaptive DBSCAN), pickups per hour and fare/distance summaries.

use chrono::NaiveDate;
use clap::Parser;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

mod cluster;
mod error;
mod geometry;
mod report;
mod trips;


use cluster::{Point, SearchConfig};
use error::AnalysisError;
use report::{AnalysisReport, ReportConfig, ReportRenderer, TextRenderer, write_clusters_csv};
use trips::{DEFAULT_RADIUS_MILES, TripDataset, TripFilter};

#[derive(Parser)]
#[command(name = "taxi_dropoff_analyzer")]
#[command(about = "Taxi trip dropoff clustering and pickup statistics", long_about = None)]
struct Args {
    /// Input CSV file with trip records
    #[arg(short, long, default_value = "trips.csv")]
    input: PathBuf,

    /// First pickup date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last pickup date to include (YYYY-MM-DD, default: same as --from)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Pickup longitude to search around
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Pickup latitude to search around
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Pickup search radius in miles
    #[arg(long, default_value_t = DEFAULT_RADIUS_MILES)]
    radius_miles: f64,

    /// Number of destination clusters to report
    #[arg(short = 'k', long, default_value_t = 10)]
    top_k: usize,

    /// Starting DBSCAN radius in degrees
    #[arg(long, default_value_t = SearchConfig::default().eps_start)]
    eps_start: f64,

    /// Radius decrement per pass in degrees
    #[arg(long, default_value_t = SearchConfig::default().eps_step)]
    eps_step: f64,

    /// Largest share of dropoffs a single cluster may hold
    #[arg(long, default_value_t = SearchConfig::default().max_share)]
    max_share: f64,

    /// Maximum number of DBSCAN passes
    #[arg(long, default_value_t = SearchConfig::default().max_iterations)]
    max_iterations: usize,

    /// Fail on trips without dropoff coordinates instead of skipping them
    #[arg(long)]
    strict_coordinates: bool,

    /// Output file for the text report (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional CSV file for the top clusters
    #[arg(long)]
    clusters_csv: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn filter(&self) -> TripFilter {
        TripFilter {
            from: self.from,
            to: self.to.or(self.from),
            center: self
                .longitude
                .zip(self.latitude)
                .map(|(lon, lat)| Point::new(lon, lat)),
            radius_miles: self.radius_miles,
        }
    }

    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            top_k: self.top_k,
            strict_coordinates: self.strict_coordinates,
            search: SearchConfig {
                eps_start: self.eps_start,
                eps_step: self.eps_step,
                max_share: self.max_share,
                max_iterations: self.max_iterations,
                ..SearchConfig::default()
            },
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut logger = pretty_env_logger::formatted_builder();
    if args.debug {
        logger.filter_level(LevelFilter::Debug);
    } else if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    } else {
        logger.filter_level(LevelFilter::Info);
    }
    logger.init();

    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AnalysisError> {
    let config = args.report_config();
    config.search.validate()?;

    let dataset = TripDataset::load_csv(&args.input, &args.filter())?;
    log::info!("Analysing {} trips from {:?}", dataset.size(), args.input);

    let report = AnalysisReport::build(&dataset, &config)?;

    match &args.output {
        None => TextRenderer::new(io::stdout().lock()).render(&report)?,
        Some(path) => {
            TextRenderer::new(BufWriter::new(File::create(path)?)).render(&report)?;
            log::info!("Report written to {path:?}");
        }
    }

    if let Some(path) = &args.clusters_csv {
        write_clusters_csv(path, &report.top_clusters)?;
        log::info!("Clusters written to {path:?}");
    }

    Ok(())
}
