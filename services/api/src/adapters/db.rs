//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `TextStore` port from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use typing_core::domain::{NewResult, NewText, TestResult, Text};
use typing_core::ports::{PortError, PortResult, TextStore};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `TextStore` port.
///
/// Each call checks a connection out of the pool for the duration of the
/// query and returns it afterwards; no state is held between calls.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct TextRecord {
    id: i32,
    duration: i32,
    content: String,
    active: bool,
}
impl TextRecord {
    fn to_domain(self) -> Text {
        Text {
            id: self.id,
            duration: self.duration,
            content: self.content,
            active: self.active,
        }
    }
}

#[derive(FromRow)]
struct ResultRecord {
    id: i32,
    user_id: Option<String>,
    duration: i32,
    wpm: i32,
    accuracy: i32,
    correct_chars: i32,
    raw_keystrokes: i32,
    text_id: i32,
    created_at: DateTime<Utc>,
}
impl ResultRecord {
    fn to_domain(self) -> TestResult {
        TestResult {
            id: self.id,
            user_id: self.user_id,
            duration: self.duration,
            wpm: self.wpm,
            accuracy: self.accuracy,
            correct_chars: self.correct_chars,
            raw_keystrokes: self.raw_keystrokes,
            text_id: self.text_id,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `TextStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextStore for PgStore {
    async fn list_texts(&self) -> PortResult<Vec<Text>> {
        let records = sqlx::query_as::<_, TextRecord>(
            "SELECT id, duration, content, active FROM texts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(TextRecord::to_domain).collect())
    }

    async fn active_texts_for_duration(&self, duration: i32) -> PortResult<Vec<Text>> {
        let records = sqlx::query_as::<_, TextRecord>(
            "SELECT id, duration, content, active FROM texts WHERE duration = $1 AND active = TRUE",
        )
        .bind(duration)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(TextRecord::to_domain).collect())
    }

    async fn get_text(&self, id: i32) -> PortResult<Text> {
        let record = sqlx::query_as::<_, TextRecord>(
            "SELECT id, duration, content, active FROM texts WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Text {} not found", id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn create_text(&self, text: NewText) -> PortResult<Text> {
        let record = sqlx::query_as::<_, TextRecord>(
            "INSERT INTO texts (duration, content, active) VALUES ($1, $2, $3) \
             RETURNING id, duration, content, active",
        )
        .bind(text.duration)
        .bind(&text.content)
        .bind(text.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn delete_text(&self, id: i32) -> PortResult<()> {
        let outcome = sqlx::query("DELETE FROM texts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if outcome.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Text {} not found", id)));
        }
        Ok(())
    }

    async fn count_texts(&self) -> PortResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM texts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(count)
    }

    async fn create_result(&self, result: NewResult) -> PortResult<TestResult> {
        let record = sqlx::query_as::<_, ResultRecord>(
            "INSERT INTO results (user_id, duration, wpm, accuracy, correct_chars, raw_keystrokes, text_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, duration, wpm, accuracy, correct_chars, raw_keystrokes, text_id, created_at",
        )
        .bind(&result.user_id)
        .bind(result.duration)
        .bind(result.wpm)
        .bind(result.accuracy)
        .bind(result.correct_chars)
        .bind(result.raw_keystrokes)
        .bind(result.text_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn top_results(&self, duration: i32, limit: i64) -> PortResult<Vec<TestResult>> {
        let records = sqlx::query_as::<_, ResultRecord>(
            "SELECT id, user_id, duration, wpm, accuracy, correct_chars, raw_keystrokes, text_id, created_at \
             FROM results WHERE duration = $1 ORDER BY wpm DESC LIMIT $2",
        )
        .bind(duration)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(ResultRecord::to_domain).collect())
    }
}
