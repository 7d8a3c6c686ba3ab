use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const SCHEMA: &[&str] = &[
    r#"
        CREATE TABLE IF NOT EXISTS a001_event_category (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            emoji TEXT,
            color TEXT,
            created_at TEXT NOT NULL
        );
    "#,
    r#"
        CREATE TABLE IF NOT EXISTS a002_event (
            id TEXT PRIMARY KEY NOT NULL,
            category_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            fields TEXT NOT NULL DEFAULT '{}',
            delivery_status TEXT NOT NULL DEFAULT 'PENDING'
        );
    "#,
    r#"
        CREATE INDEX IF NOT EXISTS idx_a002_event_category_created
        ON a002_event (category_id, created_at);
    "#,
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/events.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for sql in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Timestamps are stored as fixed-width RFC 3339 text so that string
/// comparison in SQL matches chronological order.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    Ok(chrono::DateTime::parse_from_rfc3339(raw)?.with_timezone(&chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_timestamp_text_orders_chronologically() {
        let a = Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(5);
        let c = Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 1).unwrap();
        let (fa, fb, fc) = (format_timestamp(&a), format_timestamp(&b), format_timestamp(&c));
        assert_eq!(fa, "2024-05-12T00:00:00.000Z");
        assert!(fa < fb && fb < fc);
        assert_eq!(parse_timestamp(&fb).unwrap(), b);
    }
}
