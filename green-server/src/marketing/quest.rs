//! Quest Service
//!
//! A quest is active while `start_at <= now < end_at`. The stored flag is
//! computed at creation and brought up to date by the refresh operations.

use shared::models::{Quest, QuestCreate, quest_window_contains};
use shared::util::now_millis;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::repository::quest;
use crate::utils::{AppError, AppResult, EntityKind};

#[derive(Clone)]
pub struct QuestService {
    pool: SqlitePool,
}

impl QuestService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_quests(&self) -> AppResult<Vec<Quest>> {
        Ok(quest::find_all(&self.pool).await?)
    }

    pub async fn get_quest(&self, id: i64) -> AppResult<Quest> {
        Ok(quest::require(&self.pool, id).await?)
    }

    pub async fn get_active_quests(&self) -> AppResult<Vec<Quest>> {
        Ok(quest::find_by_active(&self.pool, true).await?)
    }

    pub async fn get_inactive_quests(&self) -> AppResult<Vec<Quest>> {
        Ok(quest::find_by_active(&self.pool, false).await?)
    }

    pub async fn add_quest(&self, data: QuestCreate) -> AppResult<Quest> {
        self.add_quest_at(data, now_millis()).await
    }

    /// Create a quest with its status evaluated at `now`
    pub async fn add_quest_at(&self, data: QuestCreate, now: i64) -> AppResult<Quest> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("quest title must not be empty"));
        }
        if data.end_at <= data.start_at {
            return Err(AppError::validation(format!(
                "quest must end after it starts (start_at={}, end_at={})",
                data.start_at, data.end_at
            )));
        }

        let mut tx = self.pool.begin().await?;
        if quest::find_by_title(&mut *tx, &data.title).await?.is_some() {
            return Err(AppError::AlreadyExists(EntityKind::Quest));
        }
        let is_active = quest_window_contains(data.start_at, data.end_at, now);
        let created = quest::create(&mut *tx, data, is_active).await?;
        tx.commit().await?;

        info!(quest_id = created.id, title = %created.title, is_active, "Quest created");
        Ok(created)
    }

    pub async fn delete_quest(&self, id: i64) -> AppResult<()> {
        quest::delete(&self.pool, id).await?;
        info!(quest_id = id, "Quest deleted");
        Ok(())
    }

    pub async fn refresh_quest(&self, id: i64) -> AppResult<Quest> {
        self.refresh_quest_at(id, now_millis()).await
    }

    /// Re-evaluate one quest's status at `now`
    pub async fn refresh_quest_at(&self, id: i64, now: i64) -> AppResult<Quest> {
        let mut tx = self.pool.begin().await?;
        let mut existing = quest::require(&mut *tx, id).await?;
        let is_active = existing.is_active_at(now);
        if existing.is_active != is_active {
            quest::set_active(&mut *tx, id, is_active).await?;
            existing.is_active = is_active;
            debug!(quest_id = id, is_active, "Quest status changed");
        }
        tx.commit().await?;
        Ok(existing)
    }

    pub async fn refresh_all(&self) -> AppResult<usize> {
        self.refresh_all_at(now_millis()).await
    }

    /// Re-evaluate every quest at `now`; returns how many changed status
    pub async fn refresh_all_at(&self, now: i64) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;
        let quests = quest::find_all(&mut *tx).await?;

        let mut changed = 0;
        for q in quests {
            let is_active = q.is_active_at(now);
            if q.is_active != is_active {
                quest::set_active(&mut *tx, q.id, is_active).await?;
                changed += 1;
            }
        }
        tx.commit().await?;

        info!(changed, "Quest statuses refreshed");
        Ok(changed)
    }
}
