use crate::api::{html, load_viewer};
use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::messages;
use crate::views;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Timeline for a logged-in user, landing page otherwise", body = String, content_type = "text/html")
    ),
    tag = "messages"
)]
pub async fn index(
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let viewer = match load_viewer(pool.get_ref(), current).await? {
        Some(viewer) => viewer,
        None => return Ok(html(views::users::anon_home())),
    };

    let timeline = messages::timeline(pool.get_ref(), viewer.id).await?;
    let liked = messages::liked_ids(pool.get_ref(), viewer.id).await?;

    Ok(html(views::messages::home(&viewer, &timeline, &liked)))
}
