use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `<trkpt>` as it leaves the GPX reader.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    /// Source elevation divided by 100.
    pub elevation_scaled: f64,
    /// Carried in the point's `<desc>` text.
    pub heart_rate: f64,
    pub time: Option<DateTime<Utc>>,
}

/// Elapsed ride time in whole seconds. Displays as `HH:MM:SS`; hours keep
/// counting past 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RideTime(u64);

impl RideTime {
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    pub fn as_seconds(&self) -> u64 {
        self.0
    }

    /// Parses the stored `HH:MM:SS` form.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split(':');
        let hours: u64 = parts.next()?.parse().ok()?;
        let minutes: u64 = parts.next()?.parse().ok()?;
        let seconds: u64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self(hours * 3600 + minutes * 60 + seconds))
    }
}

impl fmt::Display for RideTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Serialize for RideTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RideTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        RideTime::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ride time: {text}")))
    }
}

/// The record produced by one successful GPX load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub user: String,
    pub ride_date: DateTime<Utc>,
    pub ride_time: RideTime,
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub avg_heart_rate: f64,
    pub points: Vec<[f64; 2]>,
    pub heart_rate: Vec<f64>,
    pub elevation: Vec<f64>,
}

impl TrackSummary {
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn serialize_series(&self) -> Result<SerializedSeries, serde_json::Error> {
        Ok(SerializedSeries {
            points: serde_json::to_string(&self.points)?,
            heart_rate: serde_json::to_string(&self.heart_rate)?,
            elevation: serde_json::to_string(&self.elevation)?,
        })
    }
}

/// Storage form of the three per-point series, each a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedSeries {
    pub points: String,
    pub heart_rate: String,
    pub elevation: String,
}

/// Decoded form of [`SerializedSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<[f64; 2]>,
    pub heart_rate: Vec<f64>,
    pub elevation: Vec<f64>,
}

impl SerializedSeries {
    pub fn decode(&self) -> Result<Series, serde_json::Error> {
        Ok(Series {
            points: serde_json::from_str(&self.points)?,
            heart_rate: serde_json::from_str(&self.heart_rate)?,
            elevation: serde_json::from_str(&self.elevation)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrack {
    pub id: i64,
    #[serde(flatten)]
    pub summary: TrackSummary,
}

/// A stored ride without its series, for browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackListing {
    pub id: i64,
    pub ride_date: DateTime<Utc>,
    pub ride_time: RideTime,
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub avg_heart_rate: f64,
}

impl From<&StoredTrack> for TrackListing {
    fn from(track: &StoredTrack) -> Self {
        Self {
            id: track.id,
            ride_date: track.summary.ride_date,
            ride_time: track.summary.ride_time,
            distance_km: track.summary.distance_km,
            avg_speed_kmh: track.summary.avg_speed_kmh,
            avg_heart_rate: track.summary.avg_heart_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum FileFormat {
    Gpx,
}

impl FileFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "gpx" => Some(FileFormat::Gpx),
            _ => None,
        }
    }
}
