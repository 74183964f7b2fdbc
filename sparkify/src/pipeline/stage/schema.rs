use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TABLE_NAME: Regex =
        Regex::new(r"(?:CREATE TABLE IF NOT EXISTS|DROP TABLE IF EXISTS)\s+(\w+)").unwrap();
}

pub const TABLES: [&str; 7] = [
    "staging_events",
    "staging_songs",
    "songplays",
    "users",
    "songs",
    "artists",
    "time",
];

// STAGING

const STAGING_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS staging_events (
    artist          VARCHAR,
    auth            VARCHAR,
    firstName       VARCHAR,
    gender          VARCHAR(1),
    itemInSession   INT,
    lastName        VARCHAR,
    length          FLOAT,
    level           VARCHAR,
    location        VARCHAR,
    method          VARCHAR,
    page            VARCHAR,
    registration    BIGINT,
    sessionId       INT,
    song            VARCHAR,
    status          INT,
    ts              BIGINT,
    userAgent       VARCHAR,
    userId          INT
);
"#;

const STAGING_SONGS: &str = r#"
CREATE TABLE IF NOT EXISTS staging_songs (
    num_songs        INT,
    artist_id        VARCHAR,
    artist_latitude  FLOAT,
    artist_longitude FLOAT,
    artist_location  VARCHAR,
    artist_name      VARCHAR,
    song_id          VARCHAR,
    title            VARCHAR,
    duration         FLOAT,
    year             INT
);
"#;

// FACT

const SONGPLAYS: &str = r#"
CREATE TABLE IF NOT EXISTS songplays (
    songplay_id   INT IDENTITY(0,1) PRIMARY KEY,
    start_time    TIMESTAMP NOT NULL,
    user_id       INT NOT NULL,
    level         VARCHAR,
    song_id       VARCHAR,
    artist_id     VARCHAR,
    session_id    INT,
    location      VARCHAR,
    user_agent    VARCHAR
);
"#;

// DIMENSION

const USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id     INT PRIMARY KEY,
    first_name  VARCHAR,
    last_name   VARCHAR,
    gender      VARCHAR(1),
    level       VARCHAR
);
"#;

const SONGS: &str = r#"
CREATE TABLE IF NOT EXISTS songs (
    song_id   VARCHAR PRIMARY KEY,
    title     VARCHAR,
    artist_id VARCHAR,
    year      INT,
    duration  FLOAT
);
"#;

const ARTISTS: &str = r#"
CREATE TABLE IF NOT EXISTS artists (
    artist_id VARCHAR PRIMARY KEY,
    name      VARCHAR,
    location  VARCHAR,
    latitude  FLOAT,
    longitude FLOAT
);
"#;

const TIME: &str = r#"
CREATE TABLE IF NOT EXISTS time (
    start_time TIMESTAMP PRIMARY KEY,
    hour       INT,
    day        INT,
    week       INT,
    month      INT,
    year       INT,
    weekday    INT
);
"#;

pub fn drop_table_requests() -> Vec<String> {
    TABLES
        .iter()
        .map(|table| format!("DROP TABLE IF EXISTS {table};"))
        .collect()
}

pub fn create_table_requests() -> Vec<String> {
    [
        STAGING_EVENTS,
        STAGING_SONGS,
        SONGPLAYS,
        USERS,
        SONGS,
        ARTISTS,
        TIME,
    ]
    .iter()
    .map(|request| request.to_string())
    .collect()
}

/// Tables dropped or created by the given DDL, in order of appearance.
pub fn table_names(request: &str) -> Vec<String> {
    TABLE_NAME
        .captures_iter(request)
        .map(|capture| capture[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_table_requests() {
        let requests = drop_table_requests();

        assert_eq!(requests.len(), 7);
        assert_eq!(requests[0], "DROP TABLE IF EXISTS staging_events;");
        assert_eq!(requests[6], "DROP TABLE IF EXISTS time;");
    }

    #[test]
    fn test_create_table_requests() {
        let requests = create_table_requests();

        assert_eq!(requests.len(), 7);
        assert!(requests
            .iter()
            .all(|request| request.contains("CREATE TABLE IF NOT EXISTS")));
    }

    #[test]
    fn test_drop_and_create_cover_same_tables() {
        let dropped: Vec<String> = drop_table_requests()
            .iter()
            .flat_map(|request| table_names(request))
            .collect();
        let created: Vec<String> = create_table_requests()
            .iter()
            .flat_map(|request| table_names(request))
            .collect();

        assert_eq!(dropped, TABLES);
        assert_eq!(created, TABLES);
    }

    #[test]
    fn test_songplays_identity_key() {
        let request = &create_table_requests()[2];

        assert!(request.contains("songplay_id   INT IDENTITY(0,1) PRIMARY KEY"));
        assert!(request.contains("start_time    TIMESTAMP NOT NULL"));
        assert!(request.contains("user_id       INT NOT NULL"));
    }

    #[test]
    fn test_table_names_without_ddl() {
        assert!(table_names("SELECT 1;").is_empty());
    }
}
