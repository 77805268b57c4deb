use crate::api::{html, redirect};
use crate::auth::{login_cookie, logout_cookie};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::forms::{non_empty, Form, FormErrors, LoginForm, UserAddForm};
use crate::services::users::{self, NewUser};
use crate::views;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/signup",
    responses(
        (status = 200, description = "Signup form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn signup_page() -> HttpResponse {
    html(views::users::signup_page(
        &UserAddForm::default(),
        &FormErrors::default(),
        None,
    ))
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = UserAddForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "User created and logged in, redirect to /"),
        (status = 200, description = "Form re-rendered with validation errors or a taken username/email", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn signup(
    form: web::Form<UserAddForm>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if let Err(errors) = form.validate() {
        return Ok(html(views::users::signup_page(&form, &errors, None)));
    }

    let new_user = NewUser {
        username: Some(form.username.trim().to_string()),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        image_url: non_empty(&form.image_url),
    };

    match users::signup(pool.get_ref(), new_user, config.auth.bcrypt_cost).await {
        Ok(user) => {
            let cookie = login_cookie(&user, &config)?;
            Ok(HttpResponse::Found()
                .cookie(cookie)
                .insert_header((actix_web::http::header::LOCATION, "/"))
                .finish())
        }
        Err(e) if e.is_integrity() => Ok(html(views::users::signup_page(
            &form,
            &FormErrors::default(),
            Some("Username or email already taken"),
        ))),
        Err(e) => Err(e),
    }
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn login_page() -> HttpResponse {
    html(views::users::login_page(
        &LoginForm::default(),
        &FormErrors::default(),
        None,
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in, redirect to /"),
        (status = 200, description = "Form re-rendered with errors or invalid credentials", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if let Err(errors) = form.validate() {
        return Ok(html(views::users::login_page(&form, &errors, None)));
    }

    match users::authenticate(pool.get_ref(), form.username.trim(), &form.password).await? {
        Some(user) => {
            log::info!("Logged in {}", user);
            let cookie = login_cookie(&user, &config)?;
            Ok(HttpResponse::Found()
                .cookie(cookie)
                .insert_header((actix_web::http::header::LOCATION, "/"))
                .finish())
        }
        None => {
            log::warn!("Invalid credentials for username {:?}", form.username);
            Ok(html(views::users::login_page(
                &form,
                &FormErrors::default(),
                Some("Invalid credentials."),
            )))
        }
    }
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Session cookie cleared, redirect to /login")
    ),
    tag = "auth"
)]
pub async fn logout() -> HttpResponse {
    let mut response = redirect("/login");
    if let Err(e) = response.add_cookie(&logout_cookie()) {
        log::warn!("Failed to clear session cookie: {:?}", e);
    }
    response
}
