use crate::api::{html, load_viewer, redirect, require_viewer};
use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::forms::{Form, FormErrors, MessageForm};
use crate::services::messages;
use crate::views;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/messages/new",
    responses(
        (status = 200, description = "New message form", body = String, content_type = "text/html"),
        (status = 302, description = "Not logged in")
    ),
    tag = "messages"
)]
pub async fn new_message_page(
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let viewer = require_viewer(pool.get_ref(), current).await?;

    Ok(html(views::messages::new_message_page(
        &viewer,
        &MessageForm::default(),
        &FormErrors::default(),
    )))
}

#[utoipa::path(
    post,
    path = "/messages/new",
    request_body(content = MessageForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Message posted, redirect to the author's profile"),
        (status = 200, description = "Form re-rendered with errors", body = String, content_type = "text/html")
    ),
    tag = "messages"
)]
pub async fn new_message(
    form: web::Form<MessageForm>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;
    let form = form.into_inner();

    if let Err(errors) = form.validate() {
        return Ok(html(views::messages::new_message_page(
            &viewer, &form, &errors,
        )));
    }

    messages::create(db, viewer.id, &form.text).await?;

    Ok(redirect(&format!("/users/{}", viewer.id)))
}

#[utoipa::path(
    get,
    path = "/messages/{message_id}",
    params(("message_id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "A single message", body = String, content_type = "text/html"),
        (status = 404, description = "No such message")
    ),
    tag = "messages"
)]
pub async fn show_message(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let item = messages::get(db, path.into_inner()).await?;
    let viewer = load_viewer(db, current).await?;

    Ok(html(views::messages::show(viewer.as_ref(), &item)))
}

#[utoipa::path(
    post,
    path = "/messages/{message_id}/delete",
    params(("message_id" = i32, Path, description = "Message ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the author's profile; redirect to / when not the author"),
        (status = 404, description = "No such message")
    ),
    tag = "messages"
)]
pub async fn delete_message(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;

    messages::delete(db, viewer.id, path.into_inner()).await?;

    Ok(redirect(&format!("/users/{}", viewer.id)))
}

#[utoipa::path(
    post,
    path = "/messages/{message_id}/like",
    params(("message_id" = i32, Path, description = "Message ID")),
    responses(
        (status = 302, description = "Like toggled, redirect to /"),
        (status = 404, description = "No such message")
    ),
    tag = "messages"
)]
pub async fn toggle_like(
    path: web::Path<i32>,
    current: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let viewer = require_viewer(db, current).await?;

    messages::toggle_like(db, viewer.id, path.into_inner()).await?;

    Ok(redirect("/"))
}
