use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::{Error, Result};

const INIT_SQL: &str = r"
CREATE TABLE IF NOT EXISTS summaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT,
    summary TEXT
);
";

/// Destination for finished summaries.
#[async_trait::async_trait]
pub trait SummarySink: Send + Sync {
    /// Append one record and return its id.
    async fn save(&self, filename: &str, summary: &str) -> Result<i64>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub id: i64,
    pub filename: Option<String>,
    pub summary: Option<String>,
}

pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn open(path: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{path}?mode=rwc"))
            .await?;

        let storage = Self { pool };
        storage.init().await?;
        Ok(storage)
    }

    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self { pool };
        storage.init().await?;
        Ok(storage)
    }

    /// Create the summaries table if it is missing. Safe to call repeatedly.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(INIT_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn insert_summary(&self, filename: &str, summary: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO summaries (filename, summary) VALUES (?, ?)")
            .bind(filename)
            .bind(summary)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_summary(&self, id: i64) -> Result<StoredSummary> {
        let row: Option<(i64, Option<String>, Option<String>)> =
            sqlx::query_as("SELECT id, filename, summary FROM summaries WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(parse_summary_row).ok_or(Error::SummaryNotFound(id))
    }

    /// Most recent first.
    pub async fn list_summaries(&self, limit: u32) -> Result<Vec<StoredSummary>> {
        let rows: Vec<(i64, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT id, filename, summary FROM summaries ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(parse_summary_row).collect())
    }
}

#[async_trait::async_trait]
impl SummarySink for Storage {
    async fn save(&self, filename: &str, summary: &str) -> Result<i64> {
        self.insert_summary(filename, summary).await
    }
}

fn parse_summary_row(row: (i64, Option<String>, Option<String>)) -> StoredSummary {
    let (id, filename, summary) = row;
    StoredSummary {
        id,
        filename,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_read_back() {
        let storage = Storage::open_memory().await.unwrap();

        let id = storage.save("lease.pdf", "# Executive Summary\nShort.").await.unwrap();

        let stored = storage.get_summary(id).await.unwrap();
        assert_eq!(stored.filename.as_deref(), Some("lease.pdf"));
        assert_eq!(stored.summary.as_deref(), Some("# Executive Summary\nShort."));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let storage = Storage::open_memory().await.unwrap();
        storage.save("a.pdf", "first").await.unwrap();

        storage.init().await.unwrap();
        storage.init().await.unwrap();

        assert_eq!(storage.list_summaries(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_limited() {
        let storage = Storage::open_memory().await.unwrap();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            storage.save(name, "text").await.unwrap();
        }

        let listed = storage.list_summaries(2).await.unwrap();

        let names: Vec<_> = listed.iter().filter_map(|s| s.filename.as_deref()).collect();
        assert_eq!(names, ["c.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_missing_summary() {
        let storage = Storage::open_memory().await.unwrap();

        let result = storage.get_summary(42).await;

        assert!(matches!(result, Err(Error::SummaryNotFound(42))));
    }
}
