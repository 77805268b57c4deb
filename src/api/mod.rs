pub mod auth;
pub mod home;
pub mod messages;
pub mod users;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::forms::{EditUserForm, LoginForm, MessageForm, UserAddForm};
use actix_web::{http::header, web, HttpResponse};
use sea_orm::EntityTrait;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Home
        home::index,
        // Auth endpoints
        auth::signup_page,
        auth::signup,
        auth::login_page,
        auth::login,
        auth::logout,
        // User endpoints
        users::list_users,
        users::show_user,
        users::show_following,
        users::show_followers,
        users::show_likes,
        users::add_follow,
        users::stop_following,
        users::edit_profile_page,
        users::edit_profile,
        users::delete_user,
        // Message endpoints
        messages::new_message_page,
        messages::new_message,
        messages::show_message,
        messages::delete_message,
        messages::toggle_like,
    ),
    components(schemas(UserAddForm, LoginForm, EditUserForm, MessageForm, users::SearchQuery)),
    tags(
        (name = "auth", description = "Signup, login and logout"),
        (name = "users", description = "Profiles and follow relationships"),
        (name = "messages", description = "Posting, deleting and liking messages"),
    ),
)]
pub struct ApiDoc;

/// Registers every Warbler route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::index))
        .route("/signup", web::get().to(auth::signup_page))
        .route("/signup", web::post().to(auth::signup))
        .route("/login", web::get().to(auth::login_page))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::get().to(auth::logout))
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("/profile", web::get().to(users::edit_profile_page))
                .route("/profile", web::post().to(users::edit_profile))
                .route("/delete", web::post().to(users::delete_user))
                .route("/follow/{user_id}", web::post().to(users::add_follow))
                .route(
                    "/stop-following/{user_id}",
                    web::post().to(users::stop_following),
                )
                .route("/{user_id}", web::get().to(users::show_user))
                .route("/{user_id}/following", web::get().to(users::show_following))
                .route("/{user_id}/followers", web::get().to(users::show_followers))
                .route("/{user_id}/likes", web::get().to(users::show_likes)),
        )
        .service(
            web::scope("/messages")
                .route("/new", web::get().to(messages::new_message_page))
                .route("/new", web::post().to(messages::new_message))
                .route("/{message_id}", web::get().to(messages::show_message))
                .route(
                    "/{message_id}/delete",
                    web::post().to(messages::delete_message),
                )
                .route("/{message_id}/like", web::post().to(messages::toggle_like)),
        );
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// The logged-in user's row, if the token still names an existing user.
pub(crate) async fn load_viewer(
    pool: &DbPool,
    current: Option<CurrentUser>,
) -> AppResult<Option<user::Model>> {
    match current {
        Some(current) => Ok(user::Entity::find_by_id(current.user_id).one(pool).await?),
        None => Ok(None),
    }
}

pub(crate) async fn require_viewer(pool: &DbPool, current: CurrentUser) -> AppResult<user::Model> {
    load_viewer(pool, Some(current))
        .await?
        .ok_or(AppError::Unauthorized)
}
