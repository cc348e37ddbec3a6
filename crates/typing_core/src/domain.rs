//! crates/typing_core/src/domain.rs
//!
//! Defines the pure, core data structures for the typing test application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// Test lengths the application supports, in seconds.
pub const ALLOWED_DURATIONS: [i32; 3] = [60, 90, 120];

/// Returns `true` if `duration` is one of the supported test lengths.
pub fn is_allowed_duration(duration: i32) -> bool {
    ALLOWED_DURATIONS.contains(&duration)
}

/// A practice paragraph served to typists.
#[derive(Debug, Clone)]
pub struct Text {
    pub id: i32,
    pub duration: i32,
    pub content: String,
    /// Only active texts are eligible for random selection.
    pub active: bool,
}

/// A practice paragraph that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewText {
    pub duration: i32,
    pub content: String,
    pub active: bool,
}

/// One completed typing-test submission.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub id: i32,
    /// `None` means the submission was anonymous.
    pub user_id: Option<String>,
    pub duration: i32,
    pub wpm: i32,
    pub accuracy: i32,
    pub correct_chars: i32,
    pub raw_keystrokes: i32,
    pub text_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A submission that has not been stored yet. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub user_id: Option<String>,
    pub duration: i32,
    pub wpm: i32,
    pub accuracy: i32,
    pub correct_chars: i32,
    pub raw_keystrokes: i32,
    pub text_id: i32,
}

/// Speed tier shown on the leaderboard.
///
/// Derived from WPM at read time and never persisted, so threshold changes
/// apply to old results as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    Beginner,
    Pro,
    Advanced,
}

impl Achievement {
    /// Maps a words-per-minute figure to its tier.
    pub fn from_wpm(wpm: i32) -> Self {
        if wpm >= 70 {
            Achievement::Advanced
        } else if wpm >= 40 {
            Achievement::Pro
        } else {
            Achievement::Beginner
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::Beginner => "Beginner",
            Achievement::Pro => "Pro",
            Achievement::Advanced => "Advanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_a_pure_function_of_wpm() {
        assert_eq!(Achievement::from_wpm(95), Achievement::Advanced);
        assert_eq!(Achievement::from_wpm(55), Achievement::Pro);
        assert_eq!(Achievement::from_wpm(20), Achievement::Beginner);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(Achievement::from_wpm(70), Achievement::Advanced);
        assert_eq!(Achievement::from_wpm(69), Achievement::Pro);
        assert_eq!(Achievement::from_wpm(40), Achievement::Pro);
        assert_eq!(Achievement::from_wpm(39), Achievement::Beginner);
        assert_eq!(Achievement::from_wpm(0), Achievement::Beginner);
    }

    #[test]
    fn only_the_three_fixed_durations_are_allowed() {
        assert!(is_allowed_duration(60));
        assert!(is_allowed_duration(90));
        assert!(is_allowed_duration(120));
        assert!(!is_allowed_duration(30));
        assert!(!is_allowed_duration(0));
        assert!(!is_allowed_duration(-60));
        assert!(!is_allowed_duration(61));
    }
}
