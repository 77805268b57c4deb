use crate::auth::{issue_session, read_session};
use crate::config::Config;
use crate::entities::user;
use crate::error::AppError;
use actix_web::cookie::Cookie;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const TOKEN_COOKIE: &str = "warbler_token";

/// The logged-in user, read from the session cookie or a bearer token.
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
}

impl CurrentUser {
    fn from_request_sync(req: &HttpRequest) -> Result<Self, AppError> {
        let token = req
            .cookie(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| {
                req.headers()
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(str::to_string)
            })
            .ok_or(AppError::Unauthorized)?;

        let config = req
            .app_data::<web::Data<Config>>()
            .ok_or(AppError::Unauthorized)?;

        let claims = read_session(&token, &config.jwt).map_err(|e| {
            log::warn!("Invalid session token: {:?}", e);
            AppError::Unauthorized
        })?;
        let user_id = claims.user_id().ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            user_id,
            username: claims.username,
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}

/// Builds the cookie that logs `user` in.
pub fn login_cookie(user: &user::Model, config: &Config) -> Result<Cookie<'static>, AppError> {
    let token = issue_session(user, &config.jwt)?;

    Ok(Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish())
}

pub fn logout_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}
