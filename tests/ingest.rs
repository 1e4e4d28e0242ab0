mod common;

use chrono::{TimeZone, Utc};
use ridelog_rs::error::ParseError;
use ridelog_rs::pipeline::distance::distance_2d;
use ridelog_rs::pipeline::process::{ingest, ingest_file};
use ridelog_rs::types::track::FileFormat;

fn ingest_gpx(text: &str) -> Result<ridelog_rs::types::track::TrackSummary, ParseError> {
    ingest(text.as_bytes(), FileFormat::Gpx, "ola")
}

fn gpx(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">{body}</gpx>"#
    )
}

fn trkpt(lat: f64, lon: f64, ele: &str, hr: &str, time: &str) -> String {
    format!(r#"<trkpt lat="{lat}" lon="{lon}"><ele>{ele}</ele><time>{time}</time><desc>{hr}</desc></trkpt>"#)
}

#[test]
fn two_point_ride_summary() {
    let summary = ingest_gpx(common::TWO_POINT_GPX).expect("summary");

    let expected_km = distance_2d((54.1, 18.1), (54.0, 18.0)) / 1000.0;

    assert_eq!(summary.user, "ola");
    assert_eq!(
        summary.ride_date,
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(summary.ride_time.to_string(), "00:30:00");
    assert_eq!(summary.avg_heart_rate, 130.0);
    assert_eq!(summary.elevation, vec![1.0, 1.5]);
    assert_eq!(summary.heart_rate, vec![120.0, 140.0]);
    assert_eq!(summary.points, vec![[54.0, 18.0], [54.1, 18.1]]);
    assert_eq!(summary.distance_km, expected_km);
    assert!(summary.distance_km > 12.85 && summary.distance_km < 12.95);
    assert!((summary.avg_speed_kmh - expected_km / 0.5).abs() < 1e-9);
}

#[test]
fn series_span_every_track_and_segment_in_order() {
    let text = gpx(&format!(
        "<trk><trkseg>{}{}</trkseg><trkseg>{}</trkseg></trk><trk><trkseg>{}</trkseg></trk>",
        trkpt(54.0, 18.0, "10", "100", "2023-05-01T08:00:00Z"),
        trkpt(54.001, 18.0, "20", "110", "2023-05-01T08:01:00Z"),
        trkpt(54.002, 18.0, "30", "120", "2023-05-01T08:02:00Z"),
        trkpt(54.003, 18.0, "40", "130", "2023-05-01T08:03:00Z"),
    ));

    let summary = ingest_gpx(&text).expect("summary");

    assert_eq!(summary.points.len(), 4);
    assert_eq!(summary.heart_rate.len(), 4);
    assert_eq!(summary.elevation.len(), 4);
    assert_eq!(summary.elevation, vec![0.1, 0.2, 0.3, 0.4]);
    assert_eq!(summary.ride_time.to_string(), "00:03:00");
    assert_eq!(summary.avg_heart_rate, 115.0);

    // Only the first pair shares a segment.
    let expected_km = distance_2d((54.001, 18.0), (54.0, 18.0)) / 1000.0;
    assert!((summary.distance_km - expected_km).abs() < 1e-12);
}

#[test]
fn end_time_follows_document_order_not_chronology() {
    let text = gpx(&format!(
        "<trk><trkseg>{}{}</trkseg><trkseg>{}</trkseg></trk>",
        trkpt(54.0, 18.0, "0", "100", "2023-05-01T08:00:00Z"),
        trkpt(54.0, 18.001, "0", "100", "2023-05-01T09:00:00Z"),
        trkpt(54.0, 18.002, "0", "100", "2023-05-01T08:15:00Z"),
    ));

    let summary = ingest_gpx(&text).expect("summary");
    assert_eq!(summary.ride_time.to_string(), "00:15:00");
}

#[test]
fn long_rides_do_not_wrap_at_24_hours() {
    let text = gpx(&format!(
        "<trk><trkseg>{}{}</trkseg></trk>",
        trkpt(54.0, 18.0, "0", "100", "2023-05-01T00:00:00Z"),
        trkpt(54.1, 18.0, "0", "100", "2023-05-02T01:00:00Z"),
    ));

    let summary = ingest_gpx(&text).expect("summary");
    assert_eq!(summary.ride_time.to_string(), "25:00:00");
}

#[test]
fn parsing_is_deterministic() {
    let first = ingest_gpx(common::TWO_POINT_GPX).expect("first");
    let second = ingest_gpx(common::TWO_POINT_GPX).expect("second");
    assert_eq!(first, second);
}

#[test]
fn serialized_series_restore_exact_values() {
    let text = gpx(&format!(
        "<trk><trkseg>{}{}</trkseg></trk>",
        trkpt(54.123456789012, 18.987654321098, "123.456", "141.5", "2023-05-01T08:00:00Z"),
        trkpt(0.1, -0.30000000000000004, "7", "99", "2023-05-01T08:00:10Z"),
    ));
    let summary = ingest_gpx(&text).expect("summary");

    let serialized = summary.serialize_series().expect("serialize");
    let series = serialized.decode().expect("decode");

    assert_eq!(series.points, summary.points);
    assert_eq!(series.heart_rate, summary.heart_rate);
    assert_eq!(series.elevation, summary.elevation);
    assert!(serialized.points.starts_with("[[54.123456789012,18.987654321098]"));
}

#[test]
fn single_point_is_rejected() {
    let text = gpx(&format!(
        "<trk><trkseg>{}</trkseg></trk>",
        trkpt(54.0, 18.0, "0", "100", "2023-05-01T08:00:00Z"),
    ));

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NonPositiveDuration(0))
    ));
}

#[test]
fn non_numeric_heart_rate_is_rejected() {
    let text = gpx(&format!(
        "<trk><trkseg>{}{}</trkseg></trk>",
        trkpt(54.0, 18.0, "0", "fast", "2023-05-01T08:00:00Z"),
        trkpt(54.1, 18.0, "0", "slow", "2023-05-01T09:00:00Z"),
    ));

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NotNumeric { index: 0, .. })
    ));
}

#[test]
fn missing_elevation_is_rejected() {
    let text = gpx(
        r#"<trk><trkseg>
            <trkpt lat="54.0" lon="18.0"><time>2023-05-01T08:00:00Z</time><desc>100</desc></trkpt>
        </trkseg></trk>"#,
    );

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::MissingField { index: 0, field: "elevation" })
    ));
}

#[test]
fn bad_coordinates_are_rejected() {
    let text = gpx(
        r#"<trk><trkseg>
            <trkpt lat="north" lon="18.0"><ele>1</ele><time>2023-05-01T08:00:00Z</time><desc>100</desc></trkpt>
        </trkseg></trk>"#,
    );

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NotNumeric { field: "lat", .. })
    ));
}

#[test]
fn missing_last_timestamp_is_rejected() {
    let text = gpx(
        r#"<trk><trkseg>
            <trkpt lat="54.0" lon="18.0"><ele>1</ele><time>2023-05-01T08:00:00Z</time><desc>100</desc></trkpt>
            <trkpt lat="54.1" lon="18.0"><ele>1</ele><desc>100</desc></trkpt>
        </trkseg></trk>"#,
    );

    assert!(matches!(ingest_gpx(&text), Err(ParseError::MissingTimestamp)));
}

#[test]
fn empty_track_is_rejected() {
    let text = gpx("<trk><trkseg></trkseg></trk>");
    assert!(matches!(ingest_gpx(&text), Err(ParseError::EmptyFile)));
}

#[test]
fn malformed_xml_is_rejected() {
    let text = gpx(r#"<trk><trkseg><trkpt lat="54.0" lon="18.0"></trk>"#);
    assert!(matches!(ingest_gpx(&text), Err(ParseError::InvalidGpx(_))));
    assert!(matches!(ingest_gpx("not xml at all"), Err(ParseError::InvalidGpx(_))));
}

#[test]
fn truncated_document_is_rejected() {
    let full = common::TWO_POINT_GPX;
    let truncated = &full[..full.find("</trkseg>").expect("closing segment")];

    assert!(matches!(ingest_gpx(truncated), Err(ParseError::InvalidGpx(_))));
}

#[test]
fn root_element_must_be_gpx() {
    let wrapped = r#"<export><gpx version="1.1"><trk><trkseg></trkseg></trk></gpx></export>"#;
    assert!(matches!(ingest_gpx(wrapped), Err(ParseError::InvalidGpx(_))));

    let kml = r#"<kml><Document><name>ride</name></Document></kml>"#;
    assert!(matches!(ingest_gpx(kml), Err(ParseError::InvalidGpx(_))));
}

#[test]
fn infinite_elevation_is_rejected() {
    let text = common::TWO_POINT_GPX.replace("<ele>150</ele>", "<ele>inf</ele>");

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NotNumeric { index: 1, field: "elevation", .. })
    ));
}

#[test]
fn nan_heart_rate_is_rejected() {
    let text = common::TWO_POINT_GPX.replace("<desc>120</desc>", "<desc>NaN</desc>");

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NotNumeric { index: 0, field: "heart rate (desc)", .. })
    ));
}

#[test]
fn infinite_coordinates_are_rejected() {
    let text = common::TWO_POINT_GPX.replace(r#"lon="18.1""#, r#"lon="-infinity""#);

    assert!(matches!(
        ingest_gpx(&text),
        Err(ParseError::NotNumeric { index: 1, field: "lon", .. })
    ));
}

#[test]
fn space_separated_times_are_read_as_utc() {
    let text = common::TWO_POINT_GPX
        .replace("2023-01-01T10:00:00Z", "2023-01-01 10:00:00")
        .replace("2023-01-01T10:30:00Z", "2023-01-01 10:30:00");

    let summary = ingest_gpx(&text).expect("summary");
    assert_eq!(
        summary.ride_date,
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(summary.ride_time.to_string(), "00:30:00");
}

#[test]
fn reads_files_from_disk() {
    let path = std::env::temp_dir().join(format!("ridelog-{}.gpx", uuid::Uuid::new_v4()));
    std::fs::write(&path, common::TWO_POINT_GPX).expect("write fixture");

    let summary = ingest_file(&path, "ola");
    std::fs::remove_file(&path).ok();

    assert_eq!(summary.expect("summary").avg_heart_rate, 130.0);
}

#[test]
fn missing_file_is_a_parse_error() {
    let path = std::env::temp_dir().join("ridelog-does-not-exist.gpx");
    assert!(matches!(ingest_file(&path, "ola"), Err(ParseError::Io(_))));
}
