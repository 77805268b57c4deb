use crate::db::DbPool;
use crate::entities::{follows, likes, message, user};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::collections::HashSet;

pub const TIMELINE_LIMIT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredMessage {
    pub message: message::Model,
    pub author: user::Model,
}

fn with_authors(rows: Vec<(message::Model, Option<user::Model>)>) -> Vec<AuthoredMessage> {
    rows.into_iter()
        .filter_map(|(message, author)| author.map(|author| AuthoredMessage { message, author }))
        .collect()
}

pub async fn create(db: &DbPool, user_id: i32, text: &str) -> AppResult<message::Model> {
    let model = message::ActiveModel {
        text: Set(text.trim().to_string()),
        timestamp: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    };

    let message = message::Entity::insert(model)
        .exec_with_returning(db)
        .await?;

    log::info!("User #{} posted message #{}", user_id, message.id);
    Ok(message)
}

pub async fn get(db: &DbPool, message_id: i32) -> AppResult<AuthoredMessage> {
    let row = message::Entity::find_by_id(message_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?;

    match row {
        Some((message, Some(author))) => Ok(AuthoredMessage { message, author }),
        _ => Err(AppError::NotFound("Message")),
    }
}

/// Only the author may delete a message.
pub async fn delete(db: &DbPool, viewer_id: i32, message_id: i32) -> AppResult<()> {
    let found = message::Entity::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Message"))?;

    if found.user_id != viewer_id {
        return Err(AppError::Forbidden);
    }

    message::Entity::delete_by_id(message_id).exec(db).await?;
    log::info!("User #{} deleted message #{}", viewer_id, message_id);
    Ok(())
}

/// Likes the message if the user has not yet, unlikes it otherwise.
/// Returns whether the message is liked afterwards.
pub async fn toggle_like(db: &DbPool, user_id: i32, message_id: i32) -> AppResult<bool> {
    if message::Entity::find_by_id(message_id).one(db).await?.is_none() {
        return Err(AppError::NotFound("Message"));
    }

    let existing = likes::Entity::find_by_id((user_id, message_id))
        .one(db)
        .await?;

    if existing.is_some() {
        likes::Entity::delete_by_id((user_id, message_id))
            .exec(db)
            .await?;
        log::info!("User #{} unliked message #{}", user_id, message_id);
        return Ok(false);
    }

    let like = likes::ActiveModel {
        user_id: Set(user_id),
        message_id: Set(message_id),
    };
    likes::Entity::insert(like).exec_without_returning(db).await?;
    log::info!("User #{} liked message #{}", user_id, message_id);
    Ok(true)
}

/// Ids of every message the user has liked.
pub async fn liked_ids(db: &DbPool, user_id: i32) -> AppResult<HashSet<i32>> {
    let rows = likes::Entity::find()
        .filter(likes::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|like| like.message_id).collect())
}

pub async fn liked_by(db: &DbPool, user_id: i32) -> AppResult<Vec<AuthoredMessage>> {
    let rows = message::Entity::find()
        .join(JoinType::InnerJoin, likes::Relation::Message.def().rev())
        .filter(likes::Column::UserId.eq(user_id))
        .order_by_desc(message::Column::Timestamp)
        .find_also_related(user::Entity)
        .all(db)
        .await?;
    Ok(with_authors(rows))
}

pub async fn by_user(db: &DbPool, user_id: i32) -> AppResult<Vec<message::Model>> {
    let messages = message::Entity::find()
        .filter(message::Column::UserId.eq(user_id))
        .order_by_desc(message::Column::Timestamp)
        .all(db)
        .await?;
    Ok(messages)
}

/// Newest messages written by the user or anyone they follow.
pub async fn timeline(db: &DbPool, user_id: i32) -> AppResult<Vec<AuthoredMessage>> {
    let mut author_ids: Vec<i32> = follows::Entity::find()
        .filter(follows::Column::UserFollowingId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|edge| edge.user_being_followed_id)
        .collect();
    author_ids.push(user_id);

    let rows = message::Entity::find()
        .filter(message::Column::UserId.is_in(author_ids))
        .order_by_desc(message::Column::Timestamp)
        .limit(TIMELINE_LIMIT)
        .find_also_related(user::Entity)
        .all(db)
        .await?;
    Ok(with_authors(rows))
}
