// Shared fixtures for the integration tests. Every call to `setup` opens a
// fresh in-memory SQLite database, so tests never see each other's rows.
#![allow(dead_code)]

use sea_orm::{EntityTrait, PaginatorTrait, Set};
use warbler::config::{AuthConfig, Config, DatabaseConfig, JwtConfig, ServerConfig};
use warbler::db::{self, DbPool};
use warbler::entities::user;
use warbler::services::users::{self, NewUser};

/// Lowest work factor bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

pub const IMAGE_URL: &str = "https://images.example.com/warbler/avatar.jpeg?w=1600&h=900";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        },
        auth: AuthConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
        },
    }
}

pub struct Fixture {
    pub config: Config,
    pub pool: DbPool,
    /// Signed up through `users::signup`, password "HASHED_PASSWORD".
    pub u1: user::Model,
    /// Inserted directly with the literal string "HASHED_PASSWORD" as its
    /// stored password, which is not a bcrypt hash.
    pub u2: user::Model,
}

pub async fn setup() -> Fixture {
    let config = test_config();
    let pool = db::create_pool(&config)
        .await
        .expect("Failed to create test database");

    let u1 = users::signup(
        &pool,
        NewUser {
            username: Some("testuser1".to_string()),
            email: "test1@test.com".to_string(),
            password: "HASHED_PASSWORD".to_string(),
            image_url: None,
        },
        config.auth.bcrypt_cost,
    )
    .await
    .expect("Failed to sign up testuser1");

    let u2 = insert_raw_user(&pool, "testuser2", "test2@test.com", "HASHED_PASSWORD").await;

    Fixture {
        config,
        pool,
        u1,
        u2,
    }
}

pub async fn insert_raw_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
) -> user::Model {
    let model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(password.to_string()),
        image_url: Set(user::DEFAULT_IMAGE_URL.to_string()),
        header_image_url: Set(user::DEFAULT_HEADER_IMAGE_URL.to_string()),
        bio: Set(None),
        location: Set(None),
        ..Default::default()
    };
    user::Entity::insert(model)
        .exec_with_returning(pool)
        .await
        .expect("Failed to insert user")
}

pub async fn user_count(pool: &DbPool) -> u64 {
    user::Entity::find()
        .count(pool)
        .await
        .expect("Failed to count users")
}
