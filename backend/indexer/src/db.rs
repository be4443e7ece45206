//! Database layer — migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::errors::Result;
use crate::events::{ApplicationRecord, EventRecord, ScholarshipEvent};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    init_pool_with(database_url, 5).await
}

/// Like [`init_pool`] with an explicit pool size. In-memory databases need a
/// single connection, since each connection gets its own database.
pub async fn init_pool_with(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Last-seen ledger, `0` when nothing has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Pagination cursor to resume from, if any.
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction and fold the new
/// ones into the `applications` projection.
///
/// Events already stored (same ledger, tx, type, scholarship, index and
/// actor) are ignored, so re-polling a page is harmless. Returns the number
/// of newly stored events.
pub async fn insert_events(pool: &SqlitePool, events: &[ScholarshipEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_type, scholarship_id, application_index, actor, amount,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ev.event_type)
        .bind(&ev.scholarship_id)
        .bind(ev.application_index)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            continue;
        }
        count += rows_affected as usize;

        let kind = ev.kind();
        let (Some(status), Some(scholarship_id), Some(index)) = (
            kind.application_status(),
            ev.scholarship_id.as_deref(),
            ev.application_index,
        ) else {
            continue;
        };
        // Reviews carry the reviewer as actor, not the applicant.
        let applicant = match kind.application_status() {
            Some("submitted") | Some("paid") => ev.actor.as_deref(),
            _ => None,
        };

        sqlx::query(
            r#"
            INSERT INTO applications
                (scholarship_id, application_index, applicant, status, updated_ledger)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (scholarship_id, application_index) DO UPDATE SET
                applicant      = COALESCE(applications.applicant, excluded.applicant),
                status         = excluded.status,
                updated_ledger = excluded.updated_ledger
            WHERE excluded.updated_ledger >= applications.updated_ledger
            "#,
        )
        .bind(scholarship_id)
        .bind(index)
        .bind(applicant)
        .bind(status)
        .bind(ev.ledger)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

/// All events for one scholarship, oldest first.
pub async fn get_events_for_scholarship(
    pool: &SqlitePool,
    scholarship_id: &str,
) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_type, scholarship_id, application_index, actor, amount,
               ledger, timestamp, contract_id, tx_hash, created_at
        FROM   events
        WHERE  scholarship_id = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(scholarship_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every stored event, oldest first.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_type, scholarship_id, application_index, actor, amount,
               ledger, timestamp, contract_id, tx_hash, created_at
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Latest known status of each application of a scholarship, by index.
pub async fn get_applications_for_scholarship(
    pool: &SqlitePool,
    scholarship_id: &str,
) -> Result<Vec<ApplicationRecord>> {
    let rows = sqlx::query_as::<_, ApplicationRecord>(
        r#"
        SELECT scholarship_id, application_index, applicant, status, updated_ledger
        FROM   applications
        WHERE  scholarship_id = ?1
        ORDER  BY application_index ASC
        "#,
    )
    .bind(scholarship_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
