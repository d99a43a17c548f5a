use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{CompletedSessionRecord, SessionStatus};
use crate::services::store::{SessionHistory, StoreError};

/// Errors that can occur when reading session history from PostgreSQL
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid session row: {0}")]
    InvalidRow(String),
}

/// PostgreSQL reader for mentoring session history
///
/// Expects a `mentor_sessions` table with `mentor_id`, `participant_id`,
/// `status` (text) and `completed_at` (timestamptz, nullable) columns.
/// Only completed sessions are read.
pub struct PostgresSessionHistory {
    pool: PgPool,
}

impl PostgresSessionHistory {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, SessionStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, SessionStoreError> {
        tracing::info!("Connecting to session history database");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Completed sessions for one participant, newest first
    pub async fn completed_sessions(
        &self,
        participant_id: &str,
    ) -> Result<Vec<CompletedSessionRecord>, SessionStoreError> {
        let query = r#"
            SELECT mentor_id, participant_id, status, completed_at
            FROM mentor_sessions
            WHERE participant_id = $1 AND status = 'completed'
            ORDER BY completed_at DESC NULLS LAST
        "#;

        let rows = sqlx::query(query)
            .bind(participant_id)
            .fetch_all(&self.pool)
            .await?;

        let sessions = rows
            .iter()
            .map(|row| -> Result<CompletedSessionRecord, SessionStoreError> {
                let status: String = row.try_get("status")?;
                Ok(CompletedSessionRecord {
                    mentor_id: row.try_get("mentor_id")?,
                    participant_id: row.try_get("participant_id")?,
                    status: parse_status(&status)?,
                    completed_at: row.try_get("completed_at")?,
                })
            })
            .collect::<Result<Vec<_>, SessionStoreError>>()?;

        tracing::debug!(
            "Participant {} has {} completed sessions",
            participant_id,
            sessions.len()
        );

        Ok(sessions)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, SessionStoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl SessionHistory for PostgresSessionHistory {
    async fn find_completed_sessions(
        &self,
        participant_id: &str,
    ) -> Result<Vec<CompletedSessionRecord>, StoreError> {
        Ok(self.completed_sessions(participant_id).await?)
    }
}

fn parse_status(status: &str) -> Result<SessionStatus, SessionStoreError> {
    match status.trim().to_lowercase().as_str() {
        "scheduled" => Ok(SessionStatus::Scheduled),
        "completed" => Ok(SessionStatus::Completed),
        "cancelled" | "canceled" => Ok(SessionStatus::Cancelled),
        other => Err(SessionStoreError::InvalidRow(format!(
            "unknown session status '{}'",
            other
        ))),
    }
}
