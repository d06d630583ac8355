//! Record persistence.
//!
//! Each flush replaces the table contents with the current snapshot inside a
//! single transaction, mirroring how the output files are overwritten.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::ScrapedRecord;

/// Replaces all stored records with `records`, preserving their order.
///
/// Returns the number of rows written.
pub async fn replace_records(
    pool: &SqlitePool,
    records: &[ScrapedRecord],
) -> Result<usize, DatabaseError> {
    let flushed_at = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM scraped_records")
        .execute(&mut *tx)
        .await?;

    for (position, record) in records.iter().enumerate() {
        sqlx::query(
            "INSERT INTO scraped_records (position, title, link, flushed_at) VALUES (?, ?, ?, ?)",
        )
        .bind(position as i64)
        .bind(&record.title)
        .bind(&record.link)
        .bind(flushed_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(records.len())
}

/// Loads the stored records in flush order.
pub async fn load_records(pool: &SqlitePool) -> Result<Vec<ScrapedRecord>, DatabaseError> {
    let rows = sqlx::query("SELECT title, link FROM scraped_records ORDER BY position")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| ScrapedRecord {
            title: row.get("title"),
            link: row.get("link"),
        })
        .collect())
}
