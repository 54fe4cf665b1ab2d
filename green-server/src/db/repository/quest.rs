//! Quest Repository

use super::{RepoError, RepoResult, map_unique};
use crate::utils::EntityKind;
use shared::models::{Quest, QuestCreate};
use shared::util::now_millis;
use sqlx::SqliteExecutor;

const SELECT_QUEST: &str =
    "SELECT id, title, description, points, start_at, end_at, is_active, created_at FROM quest";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Quest>> {
    let sql = format!("{SELECT_QUEST} ORDER BY start_at, id");
    let quests = sqlx::query_as::<_, Quest>(&sql).fetch_all(exec).await?;
    Ok(quests)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Quest>> {
    let sql = format!("{SELECT_QUEST} WHERE id = ?");
    let quest = sqlx::query_as::<_, Quest>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(quest)
}

/// Find quest by id, returning `NotFound(Quest)` otherwise
pub async fn require(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Quest> {
    find_by_id(exec, id)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Quest))
}

pub async fn find_by_title(exec: impl SqliteExecutor<'_>, title: &str) -> RepoResult<Option<Quest>> {
    let sql = format!("{SELECT_QUEST} WHERE title = ? LIMIT 1");
    let quest = sqlx::query_as::<_, Quest>(&sql)
        .bind(title)
        .fetch_optional(exec)
        .await?;
    Ok(quest)
}

/// Quests by stored activity flag
pub async fn find_by_active(exec: impl SqliteExecutor<'_>, is_active: bool) -> RepoResult<Vec<Quest>> {
    let sql = format!("{SELECT_QUEST} WHERE is_active = ? ORDER BY start_at, id");
    let quests = sqlx::query_as::<_, Quest>(&sql)
        .bind(is_active)
        .fetch_all(exec)
        .await?;
    Ok(quests)
}

pub async fn create(
    exec: impl SqliteExecutor<'_>,
    data: QuestCreate,
    is_active: bool,
) -> RepoResult<Quest> {
    let sql = "INSERT INTO quest (title, description, points, start_at, end_at, is_active, created_at) \
               VALUES (?, ?, ?, ?, ?, ?, ?) \
               RETURNING id, title, description, points, start_at, end_at, is_active, created_at";
    let quest = sqlx::query_as::<_, Quest>(sql)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.points)
        .bind(data.start_at)
        .bind(data.end_at)
        .bind(is_active)
        .bind(now_millis())
        .fetch_one(exec)
        .await
        .map_err(map_unique(EntityKind::Quest))?;
    Ok(quest)
}

pub async fn set_active(exec: impl SqliteExecutor<'_>, id: i64, is_active: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE quest SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Quest));
    }
    Ok(())
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM quest WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Quest));
    }
    Ok(())
}
