use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::ParseError;
use crate::pipeline::distance::distance_2d;
use crate::pipeline::parse::{self, TrackSink};
use crate::types::track::{FileFormat, RideTime, TrackPoint, TrackSummary};

/// Reads a GPX file from disk and summarizes it for `user`.
pub fn ingest_file(path: impl AsRef<Path>, user: &str) -> Result<TrackSummary, ParseError> {
    let path = path.as_ref();
    tracing::debug!("Reading GPX file {}", path.display());
    let bytes = std::fs::read(path)?;
    ingest(&bytes, FileFormat::Gpx, user)
}

pub fn ingest(bytes: &[u8], format: FileFormat, user: &str) -> Result<TrackSummary, ParseError> {
    let mut builder = SummaryBuilder::default();
    parse::parse(bytes, format, &mut builder)?;
    let summary = builder.finish(user)?;

    tracing::info!(
        "Summarized ride for {}: {} points, {:.2} km in {}",
        summary.user,
        summary.point_count(),
        summary.distance_km,
        summary.ride_time
    );

    Ok(summary)
}

/// Folds points into a [`TrackSummary`] in a single forward pass.
///
/// Start time comes from the first point visited and end time from the last
/// one visited, regardless of whether the file is in chronological order.
#[derive(Default)]
pub struct SummaryBuilder {
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    previous: Option<(f64, f64)>,
    segment_m: f64,
    distance_m: f64,
    points: Vec<[f64; 2]>,
    heart_rate: Vec<f64>,
    elevation: Vec<f64>,
}

impl TrackSink for SummaryBuilder {
    fn begin_segment(&mut self) {
        self.distance_m += self.segment_m;
        self.segment_m = 0.0;
        self.previous = None;
    }

    fn push_point(&mut self, point: TrackPoint) {
        if self.points.is_empty() {
            self.start_time = point.time;
        }
        self.end_time = point.time;

        let here = (point.lat, point.lon);
        if let Some(previous) = self.previous {
            self.segment_m += distance_2d(here, previous);
        }
        self.previous = Some(here);

        self.points.push([point.lat, point.lon]);
        self.elevation.push(point.elevation_scaled);
        self.heart_rate.push(point.heart_rate);
    }
}

impl SummaryBuilder {
    pub fn finish(mut self, user: &str) -> Result<TrackSummary, ParseError> {
        if self.points.is_empty() {
            return Err(ParseError::EmptyFile);
        }
        self.begin_segment();

        let (Some(start), Some(end)) = (self.start_time, self.end_time) else {
            return Err(ParseError::MissingTimestamp);
        };

        let elapsed = (end - start).num_seconds();
        if elapsed <= 0 {
            return Err(ParseError::NonPositiveDuration(elapsed));
        }

        let distance_km = self.distance_m / 1000.0;
        let avg_speed_kmh = distance_km / elapsed as f64 * 3600.0;
        let avg_heart_rate = self.heart_rate.iter().sum::<f64>() / self.heart_rate.len() as f64;

        Ok(TrackSummary {
            user: user.to_string(),
            ride_date: start,
            ride_time: RideTime::from_seconds(elapsed as u64),
            distance_km,
            avg_speed_kmh,
            avg_heart_rate,
            points: self.points,
            heart_rate: self.heart_rate,
            elevation: self.elevation,
        })
    }
}
