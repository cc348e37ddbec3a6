//! services/api/src/seed.rs
//!
//! Startup seeding: when the text table is empty, insert one demo paragraph
//! per supported duration before the service accepts traffic.

use typing_core::domain::NewText;
use typing_core::ports::{PortResult, TextStore};

/// The demo paragraphs inserted on first startup, one per duration.
const SEED_TEXTS: [(i32, &str); 3] = [
    (60, "Short 60s paragraph. Warm up and find rhythm."),
    (90, "Medium 90s paragraph. Balance speed and accuracy."),
    (120, "Long 120s paragraph. Maintain form and consistency."),
];

/// Inserts the demo paragraphs if the store holds no texts at all.
///
/// The guard is the emptiness check only; partially seeded data is left
/// alone. Returns the number of texts inserted.
pub async fn seed_texts_if_empty(store: &dyn TextStore) -> PortResult<usize> {
    if store.count_texts().await? > 0 {
        return Ok(0);
    }

    for (duration, content) in SEED_TEXTS {
        store
            .create_text(NewText {
                duration,
                content: content.to_string(),
                active: true,
            })
            .await?;
    }
    Ok(SEED_TEXTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    #[tokio::test]
    async fn seeds_exactly_three_texts_into_an_empty_store() {
        let store = InMemoryStore::default();

        let inserted = seed_texts_if_empty(&store).await.unwrap();
        assert_eq!(inserted, 3);

        let texts = store.list_texts().await.unwrap();
        assert_eq!(texts.len(), 3);
        let durations: Vec<i32> = texts.iter().map(|t| t.duration).collect();
        assert_eq!(durations, vec![60, 90, 120]);
        assert!(texts.iter().all(|t| t.active));
    }

    #[tokio::test]
    async fn leaves_a_non_empty_store_alone() {
        let store = InMemoryStore::default();
        store
            .create_text(NewText {
                duration: 90,
                content: "already here".to_string(),
                active: false,
            })
            .await
            .unwrap();

        let inserted = seed_texts_if_empty(&store).await.unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(store.list_texts().await.unwrap().len(), 1);
    }
}
