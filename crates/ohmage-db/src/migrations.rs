use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

// Table and column identifiers are fixed strings shared with every past
// install; renaming any of them breaks existing databases.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ohmlets (
            ohmlet_id       TEXT NOT NULL PRIMARY KEY,
            ohmlet_name     TEXT,
            description     TEXT,
            privacy_state   TEXT
        );

        CREATE TABLE IF NOT EXISTS surveys (
            survey_id                TEXT NOT NULL,
            survey_version           INTEGER NOT NULL,
            survey_name              TEXT,
            survey_description       TEXT,
            survey_pending_time      INTEGER,
            survey_pending_timezone  TEXT,
            survey_items             TEXT,
            PRIMARY KEY (survey_id, survey_version)
        );

        CREATE INDEX IF NOT EXISTS idx_surveys_pending
            ON surveys(survey_pending_time);

        CREATE TABLE IF NOT EXISTS streams (
            stream_id           TEXT NOT NULL,
            stream_version      INTEGER NOT NULL,
            stream_name         TEXT,
            stream_description  TEXT,
            PRIMARY KEY (stream_id, stream_version)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
