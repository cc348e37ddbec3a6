//! services/api/src/testing.rs
//!
//! An in-memory `TextStore` for the tests in this crate. Rows live in a
//! `Mutex`-guarded table and ids are assigned sequentially, like the
//! database's SERIAL columns.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use typing_core::domain::{NewResult, NewText, TestResult, Text};
use typing_core::ports::{PortError, PortResult, TextStore};

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    texts: Vec<Text>,
    results: Vec<TestResult>,
    next_text_id: i32,
    next_result_id: i32,
}

#[async_trait]
impl TextStore for InMemoryStore {
    async fn list_texts(&self) -> PortResult<Vec<Text>> {
        Ok(self.inner.lock().unwrap().texts.clone())
    }

    async fn active_texts_for_duration(&self, duration: i32) -> PortResult<Vec<Text>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .texts
            .iter()
            .filter(|t| t.active && t.duration == duration)
            .cloned()
            .collect())
    }

    async fn get_text(&self, id: i32) -> PortResult<Text> {
        self.inner
            .lock()
            .unwrap()
            .texts
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Text {} not found", id)))
    }

    async fn create_text(&self, text: NewText) -> PortResult<Text> {
        let mut tables = self.inner.lock().unwrap();
        tables.next_text_id += 1;
        let stored = Text {
            id: tables.next_text_id,
            duration: text.duration,
            content: text.content,
            active: text.active,
        };
        tables.texts.push(stored.clone());
        Ok(stored)
    }

    async fn delete_text(&self, id: i32) -> PortResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.texts.len();
        tables.texts.retain(|t| t.id != id);
        if tables.texts.len() == before {
            return Err(PortError::NotFound(format!("Text {} not found", id)));
        }
        Ok(())
    }

    async fn count_texts(&self) -> PortResult<i64> {
        Ok(self.inner.lock().unwrap().texts.len() as i64)
    }

    async fn create_result(&self, result: NewResult) -> PortResult<TestResult> {
        let mut tables = self.inner.lock().unwrap();
        tables.next_result_id += 1;
        let stored = TestResult {
            id: tables.next_result_id,
            user_id: result.user_id,
            duration: result.duration,
            wpm: result.wpm,
            accuracy: result.accuracy,
            correct_chars: result.correct_chars,
            raw_keystrokes: result.raw_keystrokes,
            text_id: result.text_id,
            created_at: Utc::now(),
        };
        tables.results.push(stored.clone());
        Ok(stored)
    }

    async fn top_results(&self, duration: i32, limit: i64) -> PortResult<Vec<TestResult>> {
        let mut rows: Vec<TestResult> = self
            .inner
            .lock()
            .unwrap()
            .results
            .iter()
            .filter(|r| r.duration == duration)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.wpm.cmp(&a.wpm));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}
