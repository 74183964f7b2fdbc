// FACT

const SONGPLAYS: &str = r#"
INSERT INTO songplays (
    start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
)
SELECT DISTINCT
    TIMESTAMP 'epoch' + se.ts/1000 * INTERVAL '1 second' AS start_time,
    se.userId,
    se.level,
    ss.song_id,
    ss.artist_id,
    se.sessionId,
    se.location,
    se.userAgent
FROM staging_events se
JOIN staging_songs ss
    ON se.song = ss.title AND se.artist = ss.artist_name
WHERE se.page = 'NextSong';
"#;

// DIMENSION
// Redshift does not enforce primary keys, rows already present are skipped explicitly.

const USERS: &str = r#"
INSERT INTO users (
    user_id, first_name, last_name, gender, level
)
SELECT DISTINCT
    se.userId,
    se.firstName,
    se.lastName,
    se.gender,
    se.level
FROM staging_events se
WHERE se.userId IS NOT NULL
    AND NOT EXISTS (SELECT 1 FROM users u WHERE u.user_id = se.userId);
"#;

const SONGS: &str = r#"
INSERT INTO songs (
    song_id, title, artist_id, year, duration
)
SELECT DISTINCT
    ss.song_id,
    ss.title,
    ss.artist_id,
    ss.year,
    ss.duration
FROM staging_songs ss
WHERE NOT EXISTS (SELECT 1 FROM songs s WHERE s.song_id = ss.song_id);
"#;

const ARTISTS: &str = r#"
INSERT INTO artists (
    artist_id, name, location, latitude, longitude
)
SELECT DISTINCT
    ss.artist_id,
    ss.artist_name,
    ss.artist_location,
    ss.artist_latitude,
    ss.artist_longitude
FROM staging_songs ss
WHERE NOT EXISTS (SELECT 1 FROM artists a WHERE a.artist_id = ss.artist_id);
"#;

// Reads songplays, must stay after SONGPLAYS.
const TIME: &str = r#"
INSERT INTO time (
    start_time, hour, day, week, month, year, weekday
)
SELECT DISTINCT
    sp.start_time,
    EXTRACT(hour FROM sp.start_time),
    EXTRACT(day FROM sp.start_time),
    EXTRACT(week FROM sp.start_time),
    EXTRACT(month FROM sp.start_time),
    EXTRACT(year FROM sp.start_time),
    EXTRACT(weekday FROM sp.start_time)
FROM songplays sp
WHERE NOT EXISTS (SELECT 1 FROM time t WHERE t.start_time = sp.start_time);
"#;

pub fn insert_table_requests() -> Vec<String> {
    [SONGPLAYS, USERS, SONGS, ARTISTS, TIME]
        .iter()
        .map(|request| request.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_table(request: &str) -> &str {
        request
            .trim_start()
            .trim_start_matches("INSERT INTO ")
            .split_whitespace()
            .next()
            .unwrap()
    }

    #[test]
    fn test_insert_table_requests_order() {
        let targets: Vec<String> = insert_table_requests()
            .iter()
            .map(|request| target_table(request).to_string())
            .collect();

        assert_eq!(targets, ["songplays", "users", "songs", "artists", "time"]);
    }

    #[test]
    fn test_time_reads_songplays() {
        let requests = insert_table_requests();
        let time = requests.last().unwrap();

        assert!(time.contains("FROM songplays sp"));
    }

    #[test]
    fn test_songplays_filters_next_song() {
        let songplays = &insert_table_requests()[0];

        assert!(songplays.contains("WHERE se.page = 'NextSong'"));
        assert!(songplays.contains("ON se.song = ss.title AND se.artist = ss.artist_name"));
        assert!(songplays.contains("TIMESTAMP 'epoch' + se.ts/1000 * INTERVAL '1 second'"));
        assert!(!songplays.contains("NOT EXISTS"));
    }

    #[test]
    fn test_dimensions_skip_existing_rows() {
        let requests = insert_table_requests();

        assert!(requests[1..]
            .iter()
            .all(|request| request.contains("NOT EXISTS")));
    }
}
