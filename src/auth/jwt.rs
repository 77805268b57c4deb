use crate::config::JwtConfig;
use crate::entities::user;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Payload of the session token held in the login cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn for_user(user: &user::Model, lifetime_hours: i64) -> Self {
        let now = Utc::now();
        SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (now + Duration::hours(lifetime_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// `None` when `sub` is not a user id.
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

pub fn issue_session(user: &user::Model, jwt: &JwtConfig) -> Result<String, Error> {
    let claims = SessionClaims::for_user(user, jwt.expiration_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
}

/// Decodes a session token. Expired tokens are rejected with no leeway.
pub fn read_session(token: &str, jwt: &JwtConfig) -> Result<SessionClaims, Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
