//! Quest Model

use serde::{Deserialize, Serialize};

/// Time-windowed gamification quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Quest {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Green points rewarded on completion
    pub points: i64,
    /// Window start (Unix millis, inclusive)
    pub start_at: i64,
    /// Window end (Unix millis, exclusive)
    pub end_at: i64,
    /// Stored status, refreshed from the window by the quest service
    pub is_active: bool,
    pub created_at: i64,
}

impl Quest {
    /// Status the quest should have at `now` (Unix millis)
    pub fn is_active_at(&self, now: i64) -> bool {
        quest_window_contains(self.start_at, self.end_at, now)
    }
}

/// `start_at <= now < end_at`
pub fn quest_window_contains(start_at: i64, end_at: i64, now: i64) -> bool {
    start_at <= now && now < end_at
}

/// Create quest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestCreate {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub start_at: i64,
    pub end_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_contains() {
        assert!(!quest_window_contains(10, 20, 9));
        assert!(quest_window_contains(10, 20, 10));
        assert!(quest_window_contains(10, 20, 19));
        assert!(!quest_window_contains(10, 20, 20));
    }
}
