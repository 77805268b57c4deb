use crate::api::{html, load_viewer, redirect, require_viewer};
use crate::auth::{logout_cookie, CurrentUser};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::forms::{EditUserForm, Form, FormErrors};
use crate::services::{messages, users};
use crate::views;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of the username to look for.
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Users, optionally filtered by username", body = String, content_type = "text/html")
    ),
    tag = "users"
)]
pub async fn list_users(
    query: web::Query<SearchQuery>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let viewer = load_viewer(pool.get_ref(), current).await?;
    let q = query.q.as_deref().filter(|q| !q.trim().is_empty());
    let found = users::search(pool.get_ref(), q).await?;

    Ok(html(views::users::user_list(viewer.as_ref(), &found, q)))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile with the user's messages", body = String, content_type = "text/html"),
        (status = 404, description = "No such user")
    ),
    tag = "users"
)]
pub async fn show_user(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let shown = users::get(db, path.into_inner()).await?;
    let viewer = load_viewer(db, current).await?;

    let viewer_follows = match &viewer {
        Some(me) => users::is_following(db, me.id, shown.id).await?,
        None => false,
    };
    let stats = users::stats(db, shown.id).await?;
    let posted = messages::by_user(db, shown.id).await?;

    Ok(html(views::users::profile(
        viewer.as_ref(),
        &shown,
        &stats,
        viewer_follows,
        &posted,
    )))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/following",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Users this user follows", body = String, content_type = "text/html"),
        (status = 302, description = "Not logged in")
    ),
    tag = "users"
)]
pub async fn show_following(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let shown = users::get(db, path.into_inner()).await?;
    let list = users::following(db, shown.id).await?;

    Ok(html(views::users::follow_list(
        Some(&viewer),
        "Following",
        &shown,
        &list,
    )))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/followers",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Users following this user", body = String, content_type = "text/html"),
        (status = 302, description = "Not logged in")
    ),
    tag = "users"
)]
pub async fn show_followers(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let shown = users::get(db, path.into_inner()).await?;
    let list = users::followers(db, shown.id).await?;

    Ok(html(views::users::follow_list(
        Some(&viewer),
        "Followers",
        &shown,
        &list,
    )))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/likes",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Messages this user liked", body = String, content_type = "text/html"),
        (status = 302, description = "Not logged in")
    ),
    tag = "users"
)]
pub async fn show_likes(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let shown = users::get(db, path.into_inner()).await?;
    let liked_messages = messages::liked_by(db, shown.id).await?;
    let liked = messages::liked_ids(db, viewer.id).await?;

    Ok(html(views::messages::likes_page(
        Some(&viewer),
        &shown,
        &liked_messages,
        &liked,
    )))
}

#[utoipa::path(
    post,
    path = "/users/follow/{user_id}",
    params(("user_id" = i32, Path, description = "User to follow")),
    responses(
        (status = 302, description = "Followed, redirect to the viewer's following page"),
        (status = 404, description = "No such user")
    ),
    tag = "users"
)]
pub async fn add_follow(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let followed = users::get(db, path.into_inner()).await?;

    match users::follow(db, viewer.id, followed.id).await {
        Ok(()) => {}
        Err(e) if e.is_integrity() => {
            log::warn!("{} already follows {}", viewer, followed);
        }
        Err(e) => return Err(e),
    }

    Ok(redirect(&format!("/users/{}/following", viewer.id)))
}

#[utoipa::path(
    post,
    path = "/users/stop-following/{user_id}",
    params(("user_id" = i32, Path, description = "User to stop following")),
    responses(
        (status = 302, description = "Unfollowed, redirect to the viewer's following page"),
        (status = 404, description = "No such user")
    ),
    tag = "users"
)]
pub async fn stop_following(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let followed = users::get(db, path.into_inner()).await?;

    users::unfollow(db, viewer.id, followed.id).await?;

    Ok(redirect(&format!("/users/{}/following", viewer.id)))
}

#[utoipa::path(
    get,
    path = "/users/profile",
    responses(
        (status = 200, description = "Profile edit form", body = String, content_type = "text/html"),
        (status = 302, description = "Not logged in")
    ),
    tag = "users"
)]
pub async fn edit_profile_page(
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let viewer = require_viewer(pool.get_ref(), current).await?;
    let form = EditUserForm::from_user(&viewer);

    Ok(html(views::users::edit_profile_page(
        &viewer,
        &form,
        &FormErrors::default(),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/users/profile",
    request_body(content = EditUserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Profile saved, redirect to the profile"),
        (status = 200, description = "Form re-rendered with errors, wrong password or a taken username/email", body = String, content_type = "text/html")
    ),
    tag = "users"
)]
pub async fn edit_profile(
    form: web::Form<EditUserForm>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let form = form.into_inner();

    if let Err(errors) = form.validate() {
        return Ok(html(views::users::edit_profile_page(
            &viewer, &form, &errors, None,
        )));
    }

    let notice = match users::update_profile(db, viewer.clone(), &form).await {
        Ok(Some(updated)) => return Ok(redirect(&format!("/users/{}", updated.id))),
        Ok(None) => "Wrong password, please try again.",
        Err(e) if e.is_integrity() => "Username or email already taken",
        Err(e) => return Err(e),
    };

    Ok(html(views::users::edit_profile_page(
        &viewer,
        &form,
        &FormErrors::default(),
        Some(notice),
    )))
}

#[utoipa::path(
    post,
    path = "/users/delete",
    responses(
        (status = 302, description = "Account deleted, redirect to /signup")
    ),
    tag = "users"
)]
pub async fn delete_user(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;

    users::delete(db, viewer.id).await?;

    let mut response = redirect("/signup");
    if let Err(e) = response.add_cookie(&logout_cookie()) {
        log::warn!("Failed to clear session cookie: {:?}", e);
    }
    Ok(response)
}
