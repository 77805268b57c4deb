use crate::auth::{hash_password, verify_password};
use crate::db::DbPool;
use crate::entities::user::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use crate::entities::{follows, likes, message, user};
use crate::error::{AppError, AppResult};
use crate::forms::{non_empty, EditUserForm};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, IntoActiveModel,
    JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

#[derive(Debug, Clone)]
pub struct NewUser {
    /// `None` is passed through to the insert so the NOT NULL constraint
    /// rejects it.
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub messages: u64,
    pub following: u64,
    pub followers: u64,
    pub likes: u64,
}

/// Hashes the password and inserts the user in one statement.
pub async fn signup(db: &DbPool, new_user: NewUser, bcrypt_cost: u32) -> AppResult<user::Model> {
    let password = hash_password(&new_user.password, bcrypt_cost)?;

    let username = match new_user.username {
        Some(username) => Set(username),
        None => NotSet,
    };
    let image_url = new_user
        .image_url
        .and_then(|url| non_empty(&url))
        .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

    let model = user::ActiveModel {
        username,
        email: Set(new_user.email),
        password: Set(password),
        image_url: Set(image_url),
        header_image_url: Set(DEFAULT_HEADER_IMAGE_URL.to_string()),
        bio: Set(None),
        location: Set(None),
        ..Default::default()
    };

    let user = user::Entity::insert(model)
        .exec_with_returning(db)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if err.is_integrity() {
                log::warn!("Signup rejected by storage: {}", err);
            }
            err
        })?;

    log::info!("Signed up {}", user);
    Ok(user)
}

/// `None` covers both an unknown username and a wrong password.
pub async fn authenticate(
    db: &DbPool,
    username: &str,
    password: &str,
) -> AppResult<Option<user::Model>> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(user.filter(|u| verify_password(password, &u.password)))
}

pub async fn get(db: &DbPool, user_id: i32) -> AppResult<user::Model> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// Users whose username contains `query`, case-sensitively; everyone when
/// it is empty.
pub async fn search(db: &DbPool, query: Option<&str>) -> AppResult<Vec<user::Model>> {
    let mut select = user::Entity::find();
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        // LIKE ignores ASCII case on SQLite, so match by position instead.
        let position = match db.get_database_backend() {
            DbBackend::Postgres => "strpos(username, ?) > 0",
            _ => "instr(username, ?) > 0",
        };
        select = select.filter(Expr::cust_with_values(position, [q]));
    }

    Ok(select.order_by_asc(user::Column::Username).all(db).await?)
}

/// Does `user_id` follow `other_id`?
pub async fn is_following(db: &DbPool, user_id: i32, other_id: i32) -> AppResult<bool> {
    let row = follows::Entity::find_by_id((other_id, user_id)).one(db).await?;
    Ok(row.is_some())
}

/// Is `user_id` followed by `other_id`?
pub async fn is_followed_by(db: &DbPool, user_id: i32, other_id: i32) -> AppResult<bool> {
    let row = follows::Entity::find_by_id((user_id, other_id)).one(db).await?;
    Ok(row.is_some())
}

pub async fn follow(db: &DbPool, follower_id: i32, followed_id: i32) -> AppResult<()> {
    let edge = follows::ActiveModel {
        user_being_followed_id: Set(followed_id),
        user_following_id: Set(follower_id),
    };
    follows::Entity::insert(edge)
        .exec_without_returning(db)
        .await?;

    log::info!("User #{} now follows user #{}", follower_id, followed_id);
    Ok(())
}

pub async fn unfollow(db: &DbPool, follower_id: i32, followed_id: i32) -> AppResult<()> {
    let result = follows::Entity::delete_by_id((followed_id, follower_id))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        log::info!("User #{} stopped following user #{}", follower_id, followed_id);
    }
    Ok(())
}

/// Users that `user_id` follows.
pub async fn following(db: &DbPool, user_id: i32) -> AppResult<Vec<user::Model>> {
    let users = user::Entity::find()
        .join(JoinType::InnerJoin, follows::Relation::Followed.def().rev())
        .filter(follows::Column::UserFollowingId.eq(user_id))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;
    Ok(users)
}

/// Users following `user_id`.
pub async fn followers(db: &DbPool, user_id: i32) -> AppResult<Vec<user::Model>> {
    let users = user::Entity::find()
        .join(JoinType::InnerJoin, follows::Relation::Following.def().rev())
        .filter(follows::Column::UserBeingFollowedId.eq(user_id))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;
    Ok(users)
}

pub async fn stats(db: &DbPool, user_id: i32) -> AppResult<UserStats> {
    let messages = message::Entity::find()
        .filter(message::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    let following = follows::Entity::find()
        .filter(follows::Column::UserFollowingId.eq(user_id))
        .count(db)
        .await?;
    let followers = follows::Entity::find()
        .filter(follows::Column::UserBeingFollowedId.eq(user_id))
        .count(db)
        .await?;
    let likes = likes::Entity::find()
        .filter(likes::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    Ok(UserStats {
        messages,
        following,
        followers,
        likes,
    })
}

/// Applies a validated edit form. Returns `None` without writing when the
/// confirmation password does not match.
pub async fn update_profile(
    db: &DbPool,
    user: user::Model,
    form: &EditUserForm,
) -> AppResult<Option<user::Model>> {
    if !verify_password(&form.password, &user.password) {
        log::warn!("Profile edit for {} rejected: wrong password", user);
        return Ok(None);
    }

    let mut model = user.into_active_model();
    model.username = Set(form.username.trim().to_string());
    model.email = Set(form.email.trim().to_string());
    model.image_url = Set(non_empty(&form.image_url).unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()));
    model.header_image_url = Set(non_empty(&form.header_image_url)
        .unwrap_or_else(|| DEFAULT_HEADER_IMAGE_URL.to_string()));
    model.bio = Set(non_empty(&form.bio));
    model.location = Set(non_empty(&form.location));

    let updated = model.update(db).await?;
    log::info!("Updated profile of {}", updated);
    Ok(Some(updated))
}

/// Removes the user; messages, follows and likes go with it.
pub async fn delete(db: &DbPool, user_id: i32) -> AppResult<()> {
    let result = user::Entity::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }

    log::info!("Deleted user #{}", user_id);
    Ok(())
}
