use crate::views;
use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, RuntimeErr};
use sqlx::error::ErrorKind;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A unique, foreign-key, not-null or check constraint rejected a write.
    #[error("integrity constraint violated: {0}")]
    Integrity(DbErr),
    #[error("database error: {0}")]
    Database(DbErr),
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("access unauthorized")]
    Unauthorized,
    #[error("access forbidden")]
    Forbidden,
}

impl AppError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, AppError::Integrity(_))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if is_constraint_violation(&err) {
            AppError::Integrity(err)
        } else {
            AppError::Database(err)
        }
    }
}

fn is_constraint_violation(err: &DbErr) -> bool {
    if err.sql_err().is_some() {
        return true;
    }

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => matches!(
            e.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ),
        _ => false,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Forbidden => StatusCode::FOUND,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized | AppError::Forbidden => {
                log::warn!("Rejected request: {}", self);
                HttpResponse::Found()
                    .insert_header((header::LOCATION, "/"))
                    .finish()
            }
            AppError::NotFound(what) => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(views::not_found(what)),
            _ => {
                log::error!("Request failed: {}", self);
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(views::server_error())
            }
        }
    }
}
