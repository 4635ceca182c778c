//! Trip records and the in-memory dataset the analytics run over
//!
//! Records come from a CSV export of the trips table. Loading applies the
//! same restriction the upstream query does: a pickup date window and a
//! great-circle radius around a pickup location, ordered by pickup time.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer, de};

use crate::cluster::{Point, PointList, great_circle_miles};
use crate::error::AnalysisError;

/// Pickup radius of the upstream query, about 100 m
pub const DEFAULT_RADIUS_MILES: f64 = 0.0621371;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One taxi trip; any column may be missing
///
/// Accepts both the trips-table column names and the public yellow cab
/// export headers.
#[allow(dead_code)] // full trips-table row; the analytics read a subset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TripRecord {
    #[serde(alias = "VendorID")]
    pub vendor_id: Option<u32>,
    #[serde(alias = "tpep_pickup_datetime", deserialize_with = "deserialize_timestamp")]
    pub pickup_datetime: Option<NaiveDateTime>,
    #[serde(alias = "tpep_dropoff_datetime", deserialize_with = "deserialize_timestamp")]
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub passenger_count: Option<u32>,
    pub trip_distance: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub pickup_latitude: Option<f64>,
    #[serde(alias = "RateCodeID")]
    pub rate_code_id: Option<u32>,
    pub store_and_fwd_flag: Option<String>,
    pub dropoff_longitude: Option<f64>,
    pub dropoff_latitude: Option<f64>,
    pub payment_type: Option<u32>,
    pub fare_amount: Option<f64>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tip_amount: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub total_amount: Option<f64>,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp {s:?}"))),
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS`, with either a space or `T` separator and
/// optional fractional seconds
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn coordinate_pair(longitude: Option<f64>, latitude: Option<f64>) -> Option<Point> {
    let point = Point::new(longitude?, latitude?);
    point.is_finite().then_some(point)
}

impl TripRecord {
    /// Dropoff location, if both coordinates are present and finite
    pub fn dropoff(&self) -> Option<Point> {
        coordinate_pair(self.dropoff_longitude, self.dropoff_latitude)
    }

    /// Pickup location, if both coordinates are present and finite
    pub fn pickup(&self) -> Option<Point> {
        coordinate_pair(self.pickup_longitude, self.pickup_latitude)
    }
}

/// Restriction applied while loading trips
#[derive(Debug, Clone, PartialEq)]
pub struct TripFilter {
    /// First pickup date included
    pub from: Option<NaiveDate>,
    /// Last pickup date included
    pub to: Option<NaiveDate>,
    /// Target pickup location; no proximity check when absent
    pub center: Option<Point>,
    pub radius_miles: f64,
}

impl Default for TripFilter {
    fn default() -> Self {
        TripFilter {
            from: None,
            to: None,
            center: None,
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }
}

impl TripFilter {
    pub fn accepts(&self, record: &TripRecord) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = record.pickup_datetime.map(|dt| dt.date()) else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        match (self.center, record.pickup()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(center), Some(pickup)) => great_circle_miles(&center, &pickup) < self.radius_miles,
        }
    }
}

/// Fixed 24-bucket count of pickups per hour of day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourHistogram {
    counts: [usize; 24],
}

impl HourHistogram {
    /// Display key for an hour, `"HH:00"`
    pub fn label(hour: usize) -> String {
        format!("{hour:02}:00")
    }

    /// Counts one pickup; hours past 23 are ignored
    pub fn record(&mut self, hour: u32) {
        if let Some(slot) = self.counts.get_mut(hour as usize) {
            *slot += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// All 24 `(key, count)` pairs in chronological order
    pub fn entries(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(hour, &count)| (Self::label(hour), count))
    }
}

/// Trips of one analysis session, in pickup order
#[derive(Debug, Clone, Default)]
pub struct TripDataset {
    records: Vec<TripRecord>,
}

impl TripDataset {
    /// Wraps records that were already filtered upstream
    pub fn new(records: Vec<TripRecord>) -> Self {
        TripDataset { records }
    }

    /// Reads trips from a CSV file, keeping those that pass `filter`
    ///
    /// # Errors
    ///
    /// * `Io`/`Csv` if the file cannot be read or a row is malformed
    /// * `NoTrips` if no trip passes the filter
    pub fn load_csv(path: &Path, filter: &TripFilter) -> Result<Self, AnalysisError> {
        let file = File::open(path)?;
        Self::from_reader(file, filter)
    }

    pub fn from_reader<R: Read>(reader: R, filter: &TripFilter) -> Result<Self, AnalysisError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut read = 0;
        let mut records = Vec::new();
        for result in reader.deserialize::<TripRecord>() {
            let record = result?;
            read += 1;
            if filter.accepts(&record) {
                records.push(record);
            }
        }
        log::info!("Read {read} trips, {} matched the filter", records.len());

        if records.is_empty() {
            return Err(AnalysisError::NoTrips);
        }

        // stable, so equal pickup times keep file order
        records.sort_by_key(|r| r.pickup_datetime);
        Ok(Self::new(records))
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dropoff coordinates of every record, in load order
    ///
    /// Fails on the first record without a usable dropoff location.
    pub fn dropoff_points(&self) -> Result<PointList, AnalysisError> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, r)| r.dropoff().ok_or(AnalysisError::InvalidCoordinate { index }))
            .collect()
    }

    /// Dropoff coordinates, skipping records without a usable location
    pub fn valid_dropoff_points(&self) -> PointList {
        let points: PointList = self.records.iter().filter_map(TripRecord::dropoff).collect();
        let skipped = self.records.len() - points.len();
        if skipped > 0 {
            log::warn!("Skipped {skipped} trips without dropoff coordinates");
        }
        points
    }

    /// Pickups per hour of day, from the stored timestamp as-is
    pub fn pickup_hour_histogram(&self) -> HourHistogram {
        let mut histogram = HourHistogram::default();
        for dt in self.records.iter().filter_map(|r| r.pickup_datetime) {
            histogram.record(dt.hour());
        }
        histogram
    }

    /// `total_amount` of every record with a finite value
    pub fn fare_series(&self) -> Vec<f64> {
        self.finite_series("total_amount", |r| r.total_amount)
    }

    /// `trip_distance` of every record with a finite value
    pub fn distance_series(&self) -> Vec<f64> {
        self.finite_series("trip_distance", |r| r.trip_distance)
    }

    /// NaN and infinite cells count as missing, like empty ones
    fn finite_series(&self, column: &str, value: impl Fn(&TripRecord) -> Option<f64>) -> Vec<f64> {
        let mut non_finite = 0;
        let series: Vec<f64> = self
            .records
            .iter()
            .filter_map(&value)
            .filter(|v| {
                let keep = v.is_finite();
                if !keep {
                    non_finite += 1;
                }
                keep
            })
            .collect();
        if non_finite > 0 {
            log::warn!("Skipped {non_finite} non-finite {column} values");
        }
        series
    }
}
