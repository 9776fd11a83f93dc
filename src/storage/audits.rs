//! Audit table schema and queries.
//!
//! All queries are parameterized. The full [`AuditResult`] round-trips
//! through the `report_json` column; the score and status columns exist so
//! history listings never have to deserialize the blob.

use log::info;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::report::AuditResult;

/// One row of audit history, without the full report payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSummary {
    /// Identifier in the form `audit_<timestamp_millis>`.
    pub audit_id: String,
    /// The audited URL.
    pub url: String,
    /// SEO dimension score.
    pub seo_score: u8,
    /// AEO dimension score.
    pub aeo_score: u8,
    /// GEO dimension score.
    pub geo_score: u8,
    /// `completed` or `failed`.
    pub status: String,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

/// Creates the `audits` table if it is missing.
pub(super) async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            audit_id TEXT NOT NULL UNIQUE,
            url TEXT NOT NULL,
            seo_score INTEGER NOT NULL,
            aeo_score INTEGER NOT NULL,
            geo_score INTEGER NOT NULL,
            status TEXT NOT NULL,
            error TEXT,
            report_json TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;
    Ok(())
}

/// Persists one audit result.
pub async fn insert_audit(pool: &SqlitePool, result: &AuditResult) -> Result<(), DatabaseError> {
    let report_json = serde_json::to_string(result)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO audits (audit_id, url, seo_score, aeo_score, geo_score, status, error, report_json, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&result.audit_id)
    .bind(&result.url)
    .bind(result.seo_score as i64)
    .bind(result.aeo_score as i64)
    .bind(result.geo_score as i64)
    .bind(result.status.to_string())
    .bind(result.error.as_deref())
    .bind(&report_json)
    .bind(result.created_at)
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    info!("Stored audit {} for {}", result.audit_id, result.url);
    Ok(())
}

/// Loads one stored audit by its identifier, if present.
pub async fn get_audit(
    pool: &SqlitePool,
    audit_id: &str,
) -> Result<Option<AuditResult>, DatabaseError> {
    let row = sqlx::query("SELECT report_json FROM audits WHERE audit_id = ?")
        .bind(audit_id)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::SqlError)?;

    match row {
        Some(row) => {
            let report_json: String = row.get("report_json");
            let result = serde_json::from_str(&report_json)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

/// Lists the most recent audits, newest first.
pub async fn list_audits(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<AuditSummary>, DatabaseError> {
    let rows = sqlx::query(
        r#"
        SELECT audit_id, url, seo_score, aeo_score, geo_score, status, created_at
        FROM audits
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(rows
        .into_iter()
        .map(|row| AuditSummary {
            audit_id: row.get("audit_id"),
            url: row.get("url"),
            seo_score: row.get::<i64, _>("seo_score") as u8,
            aeo_score: row.get::<i64, _>("aeo_score") as u8,
            geo_score: row.get::<i64, _>("geo_score") as u8,
            status: row.get("status"),
            created_at: row.get("created_at"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AuditResult, AuditStatus, DimensionReport};

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn completed_result(audit_id: &str, created_at: i64) -> AuditResult {
        AuditResult {
            audit_id: audit_id.to_string(),
            url: "https://example.com/".to_string(),
            seo_score: 85,
            aeo_score: 68,
            geo_score: 44,
            seo_details: DimensionReport::empty(),
            aeo_details: DimensionReport::empty(),
            geo_details: DimensionReport::empty(),
            recommendations: Vec::new(),
            status: AuditStatus::Completed,
            error: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let pool = memory_pool().await;
        let stored = completed_result("audit_1700000000000", 1_700_000_000_000);
        insert_audit(&pool, &stored).await.unwrap();

        let loaded = get_audit(&pool, "audit_1700000000000").await.unwrap();
        assert_eq!(loaded, Some(stored));
    }

    #[tokio::test]
    async fn test_get_missing_audit_is_none() {
        let pool = memory_pool().await;
        assert_eq!(get_audit(&pool, "audit_0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_audit_id_rejected() {
        let pool = memory_pool().await;
        let result = completed_result("audit_1", 1);
        insert_audit(&pool, &result).await.unwrap();
        assert!(insert_audit(&pool, &result).await.is_err());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_limits() {
        let pool = memory_pool().await;
        for (id, ts) in [("audit_1", 1), ("audit_3", 3), ("audit_2", 2)] {
            insert_audit(&pool, &completed_result(id, ts)).await.unwrap();
        }

        let listed = list_audits(&pool, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].audit_id, "audit_3");
        assert_eq!(listed[1].audit_id, "audit_2");
        assert_eq!(listed[0].status, "completed");
    }

    #[tokio::test]
    async fn test_failed_audit_stores_error_column() {
        let pool = memory_pool().await;
        let failed = AuditResult::failed(
            "audit_9".into(),
            "https://down.example/".into(),
            "Failed to fetch website content".into(),
            9,
        );
        insert_audit(&pool, &failed).await.unwrap();

        let loaded = get_audit(&pool, "audit_9").await.unwrap().unwrap();
        assert_eq!(loaded.status, AuditStatus::Failed);
        assert_eq!(
            loaded.error.as_deref(),
            Some("Failed to fetch website content")
        );
    }
}
