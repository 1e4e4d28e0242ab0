use crate::error::ParseError;
use crate::pipeline::parse::{Parser, TrackSink};
use crate::types::track::TrackPoint;
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxParser;

#[derive(Clone, Copy)]
enum Field {
    Elevation,
    Time,
    Description,
}

#[derive(Default)]
struct PendingPoint {
    lat: Option<String>,
    lon: Option<String>,
    elevation: Option<String>,
    time: Option<String>,
    description: Option<String>,
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8], sink: &mut dyn TrackSink) -> Result<(), ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut index = 0usize;
        let mut in_trkseg = false;
        let mut current_point: Option<PendingPoint> = None;
        let mut current_field: Option<Field> = None;
        let mut saw_gpx_root = false;
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    check_root(&e, depth, &mut saw_gpx_root)?;
                    depth += 1;
                    match e.local_name().as_ref() {
                        b"trkseg" => {
                            in_trkseg = true;
                            sink.begin_segment();
                        }
                        b"trkpt" if in_trkseg => current_point = Some(read_coordinates(&e)?),
                        b"ele" if current_point.is_some() => current_field = Some(Field::Elevation),
                        b"time" if current_point.is_some() => current_field = Some(Field::Time),
                        b"desc" if current_point.is_some() => {
                            current_field = Some(Field::Description)
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(e)) => {
                    check_root(&e, depth, &mut saw_gpx_root)?;
                    if e.local_name().as_ref() == b"trkpt" && in_trkseg {
                        let pending = read_coordinates(&e)?;
                        sink.push_point(finish_point(pending, index)?);
                        index += 1;
                    }
                }
                Ok(Event::Text(e)) => {
                    if let (Some(point), Some(field)) = (current_point.as_mut(), current_field) {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                        point.set(field, text.into_owned());
                    }
                }
                Ok(Event::CData(e)) => {
                    if let (Some(point), Some(field)) = (current_point.as_mut(), current_field) {
                        let text = String::from_utf8(e.into_inner().into_owned())
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                        point.set(field, text.trim().to_string());
                    }
                }
                Ok(Event::End(e)) => {
                    depth = depth.saturating_sub(1);
                    match e.local_name().as_ref() {
                        b"trkseg" => in_trkseg = false,
                        b"trkpt" => {
                            if let Some(pending) = current_point.take() {
                                sink.push_point(finish_point(pending, index)?);
                                index += 1;
                            }
                            current_field = None;
                        }
                        b"ele" | b"time" | b"desc" => current_field = None,
                        _ => {}
                    }
                }
                Ok(Event::Eof) => {
                    if depth != 0 {
                        return Err(ParseError::InvalidGpx(format!(
                            "document ends with {} unclosed element(s)",
                            depth
                        )));
                    }
                    break;
                }
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !saw_gpx_root {
            return Err(ParseError::InvalidGpx("missing <gpx> root element".to_string()));
        }

        Ok(())
    }
}

impl PendingPoint {
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Elevation => &mut self.elevation,
            Field::Time => &mut self.time,
            Field::Description => &mut self.description,
        };
        match slot {
            Some(existing) => existing.push_str(&text),
            None => *slot = Some(text),
        }
    }
}

/// Only `<gpx>` may appear at the top level of the document.
fn check_root(
    e: &BytesStart<'_>,
    depth: usize,
    saw_gpx_root: &mut bool,
) -> Result<(), ParseError> {
    if depth > 0 {
        return Ok(());
    }
    if e.local_name().as_ref() != b"gpx" {
        return Err(ParseError::InvalidGpx(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }
    *saw_gpx_root = true;
    Ok(())
}

fn read_coordinates(e: &BytesStart<'_>) -> Result<PendingPoint, ParseError> {
    let mut point = PendingPoint::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?
            .into_owned();

        match attr.key.local_name().as_ref() {
            b"lat" => point.lat = Some(value),
            b"lon" => point.lon = Some(value),
            _ => {}
        }
    }

    Ok(point)
}

fn finish_point(pending: PendingPoint, index: usize) -> Result<TrackPoint, ParseError> {
    let lat = required_number(pending.lat, index, "lat")?;
    let lon = required_number(pending.lon, index, "lon")?;
    let elevation = required_number(pending.elevation, index, "elevation")?;
    let heart_rate = required_number(pending.description, index, "heart rate (desc)")?;
    let time = pending
        .time
        .map(|value| parse_time(&value).ok_or(ParseError::InvalidTime { index, value }))
        .transpose()?;

    Ok(TrackPoint {
        lat,
        lon,
        elevation_scaled: elevation / 100.0,
        heart_rate,
        time,
    })
}

fn required_number(
    value: Option<String>,
    index: usize,
    field: &'static str,
) -> Result<f64, ParseError> {
    let value = value.ok_or(ParseError::MissingField { index, field })?;
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ParseError::NotNumeric {
            index,
            field,
            value,
        }),
    }
}

/// Accepts RFC 3339 with an offset, or a bare timestamp (`T` or space
/// separated) taken as UTC.
fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
