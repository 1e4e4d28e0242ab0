pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    salt TEXT NOT NULL,
    password TEXT NOT NULL
);
"#;

pub const CREATE_GPX_TRACKS: &str = r#"
CREATE TABLE IF NOT EXISTS gpx_tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    "user" TEXT NOT NULL,
    avg_speed REAL NOT NULL,
    distance REAL NOT NULL,
    avg_hr REAL NOT NULL,
    date TEXT NOT NULL,
    ride_time TEXT NOT NULL,
    points TEXT NOT NULL,
    hr TEXT NOT NULL,
    elevation TEXT NOT NULL
);
"#;

pub const CREATE_GPX_TRACKS_USER_DATE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS gpx_tracks_user_date ON gpx_tracks ("user", date);
"#;

pub const INSERT_USER: &str = r#"
INSERT INTO users (name, salt, password) VALUES (?, ?, ?);
"#;

pub const SELECT_USER_CREDENTIALS: &str = r#"
SELECT salt, password FROM users WHERE name = ?;
"#;

pub const INSERT_GPX_TRACK: &str = r#"
INSERT INTO gpx_tracks ("user", avg_speed, distance, avg_hr, date, ride_time, points, hr, elevation)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?);
"#;

pub const SELECT_TRACK_DATES: &str = r#"
SELECT date FROM gpx_tracks WHERE "user" = ? ORDER BY date ASC, id ASC;
"#;

pub const SELECT_TRACK_LISTINGS: &str = r#"
SELECT id, date, ride_time, distance, avg_speed, avg_hr
FROM gpx_tracks WHERE "user" = ? ORDER BY date ASC, id ASC;
"#;

pub const SELECT_TRACK_BY_USER_DATE: &str = r#"
SELECT id, "user", avg_speed, distance, avg_hr, date, ride_time, points, hr, elevation
FROM gpx_tracks WHERE "user" = ? AND date = ? ORDER BY id DESC LIMIT 1;
"#;

pub const DELETE_TRACK: &str = r#"
DELETE FROM gpx_tracks WHERE id = ? AND "user" = ?;
"#;
