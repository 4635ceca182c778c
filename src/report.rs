//! The analysis products of one session and their rendering
//!
//! `AnalysisReport::build` only wires dataset views into the clustering and
//! summary routines; presentation is left to a `ReportRenderer`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::cluster::{CentroidResult, PointList, SearchConfig, top_clusters};
use crate::error::AnalysisError;
use crate::geometry::{SummaryStats, percentile_summary};
use crate::trips::{HourHistogram, TripDataset};

const BAR_WIDTH: usize = 50;

/// Parameters for building a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Number of destination clusters to keep
    pub top_k: usize,
    /// Fail on trips without dropoff coordinates instead of skipping them
    pub strict_coordinates: bool,
    pub search: SearchConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            top_k: 10,
            strict_coordinates: false,
            search: SearchConfig::default(),
        }
    }
}

/// Everything derived from one dataset
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub size: usize,
    pub dropoffs: PointList,
    pub top_clusters: Vec<CentroidResult>,
    pub pickup_distribution: HourHistogram,
    pub rate_stats: SummaryStats,
    pub distance_stats: SummaryStats,
}

impl AnalysisReport {
    /// Runs every analysis over `dataset`
    ///
    /// # Errors
    ///
    /// * `NoTrips` if the dataset is empty
    /// * `EmptyInput` if no trip has a dropoff location, fare or distance
    /// * `InvalidCoordinate` in strict mode, for a trip without a dropoff location
    /// * `ClusteringDidNotConverge` from the destination search; the other
    ///   products are discarded with it, and fewer than 7 usable dropoffs
    ///   always end here at the default `max_share`
    ///
    /// The series are summarised before clustering, so missing fares or
    /// distances are reported ahead of a clustering failure.
    pub fn build(dataset: &TripDataset, config: &ReportConfig) -> Result<Self, AnalysisError> {
        if dataset.is_empty() {
            return Err(AnalysisError::NoTrips);
        }

        let pickup_distribution = dataset.pickup_hour_histogram();
        let rate_stats = percentile_summary(&dataset.fare_series())?;
        let distance_stats = percentile_summary(&dataset.distance_series())?;

        let dropoffs = if config.strict_coordinates {
            dataset.dropoff_points()?
        } else {
            dataset.valid_dropoff_points()
        };
        let top_clusters = top_clusters(&dropoffs, config.top_k, &config.search)?;

        Ok(AnalysisReport {
            size: dataset.size(),
            dropoffs,
            top_clusters,
            pickup_distribution,
            rate_stats,
            distance_stats,
        })
    }
}

/// Presentation layer for a finished report
pub trait ReportRenderer {
    fn render(&mut self, report: &AnalysisReport) -> Result<(), AnalysisError>;
}

/// Plain-text report with an ASCII pickup chart
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        TextRenderer { out }
    }

    fn render_stats(&mut self, title: &str, stats: &SummaryStats) -> std::io::Result<()> {
        writeln!(self.out, "{title}")?;
        for (label, value) in stats.entries() {
            writeln!(self.out, "  {label:<8} {}", format_value(value))?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> ReportRenderer for TextRenderer<W> {
    fn render(&mut self, report: &AnalysisReport) -> Result<(), AnalysisError> {
        writeln!(self.out, "Trips analysed: {}", report.size)?;
        writeln!(self.out, "Dropoffs with coordinates: {}", report.dropoffs.len())?;
        writeln!(self.out)?;

        writeln!(self.out, "Top Destinations")?;
        writeln!(
            self.out,
            "  {:>4} {:>12} {:>12} {:>10} {:>7}",
            "#", "longitude", "latitude", "radius", "trips"
        )?;
        for (rank, c) in report.top_clusters.iter().enumerate() {
            writeln!(
                self.out,
                "  {:>4} {:>12.6} {:>12.6} {:>10.6} {:>7}",
                rank + 1,
                c.longitude,
                c.latitude,
                c.radius,
                c.members
            )?;
        }
        writeln!(self.out)?;

        let histogram = &report.pickup_distribution;
        let peak = histogram.max_count().max(1);
        writeln!(self.out, "Pick Ups Distribution Over Time")?;
        for (label, count) in histogram.entries() {
            let bar = "#".repeat(count * BAR_WIDTH / peak);
            writeln!(self.out, "  {label} {count:>6} {bar}")?;
        }
        writeln!(self.out, "  total {:>6}", histogram.total())?;
        writeln!(self.out)?;

        self.render_stats("Total Amount", &report.rate_stats)?;
        self.render_stats("Trip Distance", &report.distance_stats)?;
        self.out.flush()?;
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Writes cluster summaries as `longitude,latitude,radius,members` rows
pub fn write_clusters_csv(path: &Path, clusters: &[CentroidResult]) -> Result<(), AnalysisError> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record(["longitude", "latitude", "radius", "members"])?;
    for c in clusters {
        writer.write_record([
            c.longitude.to_string(),
            c.latitude.to_string(),
            c.radius.to_string(),
            c.members.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
