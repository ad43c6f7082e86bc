//! Database queries for candidates and categories

use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::{debug, instrument};

use super::pool::{DbError, DbPool};
use crate::domain::{Candidate, Category};

/// Read access to the candidate tables
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// All candidates of a category, ordered by candidate number ascending
    async fn candidates(&self, event_id: i64, category_id: i64) -> Result<Vec<Candidate>, DbError>;

    /// The category row, if present
    async fn category(&self, event_id: i64, category_id: i64) -> Result<Option<Category>, DbError>;
}

/// Repository for candidate database operations
pub struct CandidateRepository {
    pool: DbPool,
}

impl CandidateRepository {
    /// Create a new candidate repository
    pub fn new(pool: DbPool) -> Self {
        CandidateRepository { pool }
    }
}

#[async_trait]
impl CandidateSource for CandidateRepository {
    #[instrument(skip(self))]
    async fn candidates(&self, event_id: i64, category_id: i64) -> Result<Vec<Candidate>, DbError> {
        let client = self.pool.get().await?;

        let rows = client.query(
            r#"
            SELECT
                id_event::int8 AS id_event,
                id_category::int8 AS id_category,
                id_candidate::int8 AS id_candidate,
                COALESCE(name, '') AS name
            FROM candidates
            WHERE id_event = $1::int8 AND id_category = $2::int8
            ORDER BY id_candidate ASC
            "#,
            &[&event_id, &category_id]
        ).await?;

        let candidates = rows.iter().map(candidate_from_row).collect::<Result<Vec<_>, _>>()?;

        debug!(count = candidates.len(), "Loaded candidates");
        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn category(&self, event_id: i64, category_id: i64) -> Result<Option<Category>, DbError> {
        let client = self.pool.get().await?;

        let row = client.query_opt(
            r#"
            SELECT
                id_event::int8 AS id_event,
                id_category::int8 AS id_category,
                COALESCE(name, '') AS name
            FROM categories
            WHERE id_event = $1::int8 AND id_category = $2::int8
            LIMIT 1
            "#,
            &[&event_id, &category_id]
        ).await?;

        row.as_ref().map(category_from_row).transpose()
    }
}

fn candidate_from_row(row: &Row) -> Result<Candidate, DbError> {
    Ok(Candidate {
        event_id: row.try_get("id_event")?,
        category_id: row.try_get("id_category")?,
        candidate_number: row.try_get("id_candidate")?,
        display_name: row.try_get("name")?,
    })
}

fn category_from_row(row: &Row) -> Result<Category, DbError> {
    Ok(Category {
        event_id: row.try_get("id_event")?,
        category_id: row.try_get("id_category")?,
        display_name: row.try_get("name")?,
    })
}
