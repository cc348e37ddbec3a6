//! crates/typing_core/src/ports.rs
//!
//! Defines the service contract (trait) between the request handlers and the
//! persistence store. The handlers only ever see this boundary, so a second
//! adapter (e.g. an in-memory store in tests) can stand in for the database.

use async_trait::async_trait;

use crate::domain::{NewResult, NewText, TestResult, Text};

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// The persistence port for texts and results.
///
/// One store session is scoped to one request; the adapter is responsible
/// for acquisition and release. No method starts a cross-request
/// transaction.
#[async_trait]
pub trait TextStore: Send + Sync {
    // --- Texts ---

    /// Every stored text, active and inactive.
    async fn list_texts(&self) -> PortResult<Vec<Text>>;

    /// Texts eligible for random selection: active and matching `duration`.
    async fn active_texts_for_duration(&self, duration: i32) -> PortResult<Vec<Text>>;

    /// `NotFound` if no text has this id.
    async fn get_text(&self, id: i32) -> PortResult<Text>;

    async fn create_text(&self, text: NewText) -> PortResult<Text>;

    /// `NotFound` if no text has this id.
    async fn delete_text(&self, id: i32) -> PortResult<()>;

    /// Emptiness check used by the startup seeding step.
    async fn count_texts(&self) -> PortResult<i64>;

    // --- Results ---

    async fn create_result(&self, result: NewResult) -> PortResult<TestResult>;

    /// Results for `duration`, descending by WPM, truncated to `limit`.
    async fn top_results(&self, duration: i32, limit: i64) -> PortResult<Vec<TestResult>>;
}
