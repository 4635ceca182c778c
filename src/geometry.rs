//! Scalar building blocks: centroid, point distances and percentile summaries

use crate::cluster::{Point, euclidean};
use crate::error::AnalysisError;

/// Mean, sample standard deviation, quartiles and maximum of a series
///
/// `std_dev` is NaN for a single-element series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub std_dev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Labelled values in display order
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("Mean", self.mean),
            ("Std Dev", self.std_dev),
            ("25%", self.p25),
            ("50%", self.p50),
            ("75%", self.p75),
            ("Max", self.max),
        ]
    }
}

/// Coordinate-wise mean of `points`
pub fn centroid(points: &[Point]) -> Result<Point, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput { what: "points" });
    }

    let n = points.len() as f64;
    let (lon, lat) = points
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p.0[0], lat + p.0[1]));
    Ok(Point([lon / n, lat / n]))
}

/// Euclidean distance from `center` to each point, in input order
pub fn distances_to(points: &[Point], center: &Point) -> Vec<f64> {
    points.iter().map(|p| euclidean(p, center)).collect()
}

/// Summarises `values` the way a dataframe `describe()` does
///
/// Percentiles interpolate linearly between order statistics.
pub fn percentile_summary(values: &[f64]) -> Result<SummaryStats, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyInput { what: "series" });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std_dev = if sorted.len() < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1.0)).sqrt()
    };

    Ok(SummaryStats {
        mean,
        std_dev,
        p25: quantile(&sorted, 0.25),
        p50: quantile(&sorted, 0.50),
        p75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolated quantile of an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
