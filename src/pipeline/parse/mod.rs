mod gpx;

use crate::error::ParseError;
use crate::types::track::{FileFormat, TrackPoint};

/// Receives track points in document order while a file is being read.
pub trait TrackSink {
    /// Called when a new `<trkseg>` opens; distances never bridge segments.
    fn begin_segment(&mut self);
    fn push_point(&mut self, point: TrackPoint);
}

pub trait Parser {
    fn parse(&self, bytes: &[u8], sink: &mut dyn TrackSink) -> Result<(), ParseError>;
}

pub fn parse(bytes: &[u8], format: FileFormat, sink: &mut dyn TrackSink) -> Result<(), ParseError> {
    match format {
        FileFormat::Gpx => gpx::GpxParser.parse(bytes, sink),
    }
}
