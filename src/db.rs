use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Persistent set of entry ids that have already been notified.
///
/// Backed by a single SQLite connection; the poller is the only writer.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notified_entries (
                entry_id TEXT PRIMARY KEY
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn exists(&self, entry_id: &str) -> anyhow::Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM notified_entries WHERE entry_id = ?")
                .bind(entry_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Marks an entry as notified. Recording an id twice is a no-op.
    pub async fn record(&self, entry_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notified_entries (entry_id)
            VALUES (?)
            ON CONFLICT(entry_id) DO NOTHING
            "#,
        )
        .bind(entry_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes every record, returning how many were deleted.
    pub async fn clear(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM notified_entries")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notified_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_db() -> Database {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.initialize().await.unwrap();
        db
    }

    mod initialization_tests {
        use super::*;

        #[tokio::test]
        async fn test_database_creation() {
            let db = Database::new("sqlite::memory:").await;
            assert!(db.is_ok());
        }

        #[tokio::test]
        async fn test_database_initialization() {
            let db = create_test_db().await;
            assert_eq!(db.count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_double_initialization_is_safe() {
            let db = create_test_db().await;
            db.record("kept").await.unwrap();

            // IF NOT EXISTS keeps the existing table and its rows
            let result = db.initialize().await;
            assert!(result.is_ok());
            assert!(db.exists("kept").await.unwrap());
        }
    }

    mod record_tests {
        use super::*;

        #[tokio::test]
        async fn test_unknown_id_does_not_exist() {
            let db = create_test_db().await;
            assert!(!db.exists("https://example.com/post/1").await.unwrap());
        }

        #[tokio::test]
        async fn test_record_then_exists() {
            let db = create_test_db().await;
            db.record("https://example.com/post/1").await.unwrap();

            assert!(db.exists("https://example.com/post/1").await.unwrap());
            assert!(!db.exists("https://example.com/post/2").await.unwrap());
        }

        #[tokio::test]
        async fn test_record_is_idempotent() {
            let db = create_test_db().await;
            for _ in 0..3 {
                db.record("guid-123").await.unwrap();
            }

            assert_eq!(db.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_ids_are_exact_matches() {
            let db = create_test_db().await;
            db.record("Guid-123").await.unwrap();

            assert!(!db.exists("guid-123").await.unwrap());
            assert!(!db.exists("Guid-12").await.unwrap());
        }
    }

    mod clear_tests {
        use super::*;

        #[tokio::test]
        async fn test_clear_removes_everything() {
            let db = create_test_db().await;
            for i in 1..=3 {
                db.record(&format!("guid-{}", i)).await.unwrap();
            }

            let removed = db.clear().await.unwrap();

            assert_eq!(removed, 3);
            assert_eq!(db.count().await.unwrap(), 0);
            assert!(!db.exists("guid-1").await.unwrap());
        }

        #[tokio::test]
        async fn test_clear_empty_store() {
            let db = create_test_db().await;
            assert_eq!(db.clear().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_record_after_clear() {
            let db = create_test_db().await;
            db.record("guid-1").await.unwrap();
            db.clear().await.unwrap();
            db.record("guid-1").await.unwrap();

            assert_eq!(db.count().await.unwrap(), 1);
        }
    }
}
