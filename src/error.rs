use thiserror::Error;

/// Errors produced while loading trips or deriving the analytics.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A centroid or summary was requested over an empty series.
    #[error("empty input: {what}")]
    EmptyInput {
        /// Which series was empty.
        what: &'static str,
    },

    /// A point with a missing or non-finite coordinate reached the clustering code.
    #[error("invalid coordinate at record {index}")]
    InvalidCoordinate {
        /// Load-order index of the offending record.
        index: usize,
    },

    /// The epsilon search ran out of iterations or hit its floor.
    #[error(
        "clustering did not converge after {iterations} iterations \
         (last eps {last_eps}, largest cluster {largest} > {threshold})"
    )]
    ClusteringDidNotConverge {
        iterations: usize,
        last_eps: f64,
        largest: usize,
        threshold: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The date/location filter matched nothing.
    #[error("no data for this date or this location, please select another one")]
    NoTrips,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
