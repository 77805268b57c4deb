// User model tests: signup, authenticate and follow relationships.
// Run with: cargo test --test user_model_test

mod common;

use common::{setup, user_count, IMAGE_URL};
use sea_orm::{EntityTrait, PaginatorTrait, Set};
use warbler::entities::{follows, message, user};
use warbler::error::AppError;
use warbler::forms::EditUserForm;
use warbler::services::messages;
use warbler::services::users::{self, NewUser};

fn new_user(username: Option<&str>, email: &str) -> NewUser {
    NewUser {
        username: username.map(str::to_string),
        email: email.to_string(),
        password: "password".to_string(),
        image_url: Some(IMAGE_URL.to_string()),
    }
}

async fn insert_follow(pool: &warbler::db::DbPool, followed: i32, follower: i32) {
    let edge = follows::ActiveModel {
        user_being_followed_id: Set(followed),
        user_following_id: Set(follower),
    };
    follows::Entity::insert(edge)
        .exec_without_returning(pool)
        .await
        .expect("Failed to insert follow");
}

#[actix_web::test]
async fn test_user_model() {
    let fx = setup().await;

    let posted = messages::by_user(&fx.pool, fx.u1.id).await.unwrap();
    let followers = users::followers(&fx.pool, fx.u1.id).await.unwrap();

    assert!(posted.is_empty(), "New user should have no messages");
    assert!(followers.is_empty(), "New user should have no followers");
    assert!(!users::is_following(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
    assert!(!users::is_followed_by(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
}

#[actix_web::test]
async fn test_user_display() {
    let fx = setup().await;

    assert_eq!(
        fx.u1.to_string(),
        format!("<User #{}: testuser1, test1@test.com>", fx.u1.id)
    );
}

#[actix_web::test]
async fn test_signup_stores_hash_and_defaults() {
    let fx = setup().await;

    assert_ne!(fx.u1.password, "HASHED_PASSWORD");
    assert!(fx.u1.password.starts_with("$2"));
    assert_eq!(fx.u1.image_url, user::DEFAULT_IMAGE_URL);
    assert_eq!(fx.u1.header_image_url, user::DEFAULT_HEADER_IMAGE_URL);
    assert_eq!(fx.u1.bio, None);
}

#[actix_web::test]
async fn test_signup_blank_image_url_uses_default() {
    let fx = setup().await;

    let mut blank = new_user(Some("blankpic"), "blank@test.com");
    blank.image_url = Some("   ".to_string());
    let user = users::signup(&fx.pool, blank, fx.config.auth.bcrypt_cost)
        .await
        .unwrap();

    assert_eq!(user.image_url, user::DEFAULT_IMAGE_URL);
}

#[actix_web::test]
async fn test_signup_keeps_given_image_url() {
    let fx = setup().await;

    let user = users::signup(
        &fx.pool,
        new_user(Some("withpic"), "pic@test.com"),
        fx.config.auth.bcrypt_cost,
    )
    .await
    .unwrap();

    assert_eq!(user.image_url, IMAGE_URL);
}

#[actix_web::test]
async fn test_is_following() {
    let fx = setup().await;

    insert_follow(&fx.pool, fx.u2.id, fx.u1.id).await;

    assert!(users::is_following(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
    assert!(
        !users::is_following(&fx.pool, fx.u2.id, fx.u1.id).await.unwrap(),
        "Following is not symmetric"
    );
}

#[actix_web::test]
async fn test_is_not_following() {
    let fx = setup().await;

    assert!(!users::is_following(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
}

#[actix_web::test]
async fn test_is_followed_by() {
    let fx = setup().await;

    insert_follow(&fx.pool, fx.u1.id, fx.u2.id).await;

    assert!(users::is_followed_by(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
    assert!(!users::is_followed_by(&fx.pool, fx.u2.id, fx.u1.id).await.unwrap());
}

#[actix_web::test]
async fn test_is_not_followed_by() {
    let fx = setup().await;

    assert!(!users::is_followed_by(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
}

#[actix_web::test]
async fn test_valid_signup() {
    let fx = setup().await;
    let before = user_count(&fx.pool).await;

    let user = users::signup(
        &fx.pool,
        new_user(Some("testuser"), "test@test.com"),
        fx.config.auth.bcrypt_cost,
    )
    .await
    .expect("Signup should succeed");

    assert_eq!(user.username, "testuser");
    assert_eq!(user.image_url, IMAGE_URL);
    assert_eq!(user_count(&fx.pool).await, before + 1);
}

#[actix_web::test]
async fn test_signup_duplicate_username() {
    let fx = setup().await;
    let before = user_count(&fx.pool).await;

    let result = users::signup(
        &fx.pool,
        new_user(Some("testuser1"), "test@test.com"),
        fx.config.auth.bcrypt_cost,
    )
    .await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
    assert_eq!(user_count(&fx.pool).await, before);
}

#[actix_web::test]
async fn test_signup_duplicate_email() {
    let fx = setup().await;
    let before = user_count(&fx.pool).await;

    let result = users::signup(
        &fx.pool,
        new_user(Some("someoneelse"), "test1@test.com"),
        fx.config.auth.bcrypt_cost,
    )
    .await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
    assert_eq!(user_count(&fx.pool).await, before);
}

#[actix_web::test]
async fn test_signup_without_username_fails_in_storage() {
    let fx = setup().await;
    let before = user_count(&fx.pool).await;

    let result = users::signup(
        &fx.pool,
        new_user(None, "test.com"),
        fx.config.auth.bcrypt_cost,
    )
    .await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
    assert_eq!(user_count(&fx.pool).await, before);
}

#[actix_web::test]
async fn test_authenticate_valid_user() {
    let fx = setup().await;

    let user = users::authenticate(&fx.pool, "testuser1", "HASHED_PASSWORD")
        .await
        .unwrap();

    assert_eq!(user, Some(fx.u1));
}

#[actix_web::test]
async fn test_authenticate_bad_username() {
    let fx = setup().await;

    let user = users::authenticate(&fx.pool, "testuser", "HASHED_PASSWORD")
        .await
        .unwrap();

    assert_eq!(user, None);
}

#[actix_web::test]
async fn test_authenticate_wrong_password() {
    let fx = setup().await;

    let user = users::authenticate(&fx.pool, "testuser1", "BAD_PASSWORD")
        .await
        .unwrap();

    assert_eq!(user, None);
}

#[actix_web::test]
async fn test_authenticate_against_unhashed_password() {
    let fx = setup().await;

    let user = users::authenticate(&fx.pool, "testuser2", "HASHED_PASSWORD")
        .await
        .unwrap();

    assert_eq!(user, None, "A plaintext stored password never verifies");
}

#[actix_web::test]
async fn test_follow_and_unfollow() {
    let fx = setup().await;

    users::follow(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap();

    let following = users::following(&fx.pool, fx.u1.id).await.unwrap();
    let followers = users::followers(&fx.pool, fx.u2.id).await.unwrap();
    assert_eq!(following, vec![fx.u2.clone()]);
    assert_eq!(followers, vec![fx.u1.clone()]);
    assert!(users::following(&fx.pool, fx.u2.id).await.unwrap().is_empty());

    users::unfollow(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap();

    assert!(!users::is_following(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap());
    assert!(users::followers(&fx.pool, fx.u2.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_follow_twice_is_integrity_error() {
    let fx = setup().await;

    users::follow(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap();
    let second = users::follow(&fx.pool, fx.u1.id, fx.u2.id).await;

    assert!(matches!(second, Err(AppError::Integrity(_))));
}

#[actix_web::test]
async fn test_self_follow_allowed() {
    let fx = setup().await;

    users::follow(&fx.pool, fx.u1.id, fx.u1.id).await.unwrap();

    assert!(users::is_following(&fx.pool, fx.u1.id, fx.u1.id).await.unwrap());
}

#[actix_web::test]
async fn test_follow_unknown_user_is_integrity_error() {
    let fx = setup().await;

    let result = users::follow(&fx.pool, fx.u1.id, 999_999).await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
}

#[actix_web::test]
async fn test_stats() {
    let fx = setup().await;

    users::follow(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap();
    let msg = messages::create(&fx.pool, fx.u2.id, "hello").await.unwrap();
    messages::toggle_like(&fx.pool, fx.u1.id, msg.id).await.unwrap();

    let s1 = users::stats(&fx.pool, fx.u1.id).await.unwrap();
    let s2 = users::stats(&fx.pool, fx.u2.id).await.unwrap();

    assert_eq!((s1.messages, s1.following, s1.followers, s1.likes), (0, 1, 0, 1));
    assert_eq!((s2.messages, s2.following, s2.followers, s2.likes), (1, 0, 1, 0));
}

#[actix_web::test]
async fn test_delete_cascades() {
    let fx = setup().await;

    users::follow(&fx.pool, fx.u1.id, fx.u2.id).await.unwrap();
    users::follow(&fx.pool, fx.u2.id, fx.u1.id).await.unwrap();
    messages::create(&fx.pool, fx.u1.id, "going away")
        .await
        .unwrap();

    users::delete(&fx.pool, fx.u1.id).await.unwrap();

    assert!(matches!(
        users::get(&fx.pool, fx.u1.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(message::Entity::find().count(&fx.pool).await.unwrap(), 0);
    assert_eq!(follows::Entity::find().count(&fx.pool).await.unwrap(), 0);
    assert!(users::followers(&fx.pool, fx.u2.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_delete_unknown_user() {
    let fx = setup().await;

    let result = users::delete(&fx.pool, 999_999).await;

    assert!(matches!(result, Err(AppError::NotFound("User"))));
}

#[actix_web::test]
async fn test_update_profile() {
    let fx = setup().await;

    let mut form = EditUserForm::from_user(&fx.u1);
    form.bio = "Just warbling".to_string();
    form.location = "Lisbon".to_string();
    form.password = "HASHED_PASSWORD".to_string();

    let updated = users::update_profile(&fx.pool, fx.u1.clone(), &form)
        .await
        .unwrap()
        .expect("Correct password should allow the edit");

    assert_eq!(updated.bio.as_deref(), Some("Just warbling"));
    assert_eq!(updated.location.as_deref(), Some("Lisbon"));
    assert_eq!(updated.password, fx.u1.password);
}

#[actix_web::test]
async fn test_update_profile_wrong_password() {
    let fx = setup().await;

    let mut form = EditUserForm::from_user(&fx.u1);
    form.bio = "Should not be saved".to_string();
    form.password = "BAD_PASSWORD".to_string();

    let updated = users::update_profile(&fx.pool, fx.u1.clone(), &form)
        .await
        .unwrap();

    assert_eq!(updated, None);
    assert_eq!(users::get(&fx.pool, fx.u1.id).await.unwrap().bio, None);
}

#[actix_web::test]
async fn test_update_profile_taken_username() {
    let fx = setup().await;

    let mut form = EditUserForm::from_user(&fx.u1);
    form.username = "testuser2".to_string();
    form.bio = "bio".to_string();
    form.password = "HASHED_PASSWORD".to_string();

    let result = users::update_profile(&fx.pool, fx.u1.clone(), &form).await;

    assert!(matches!(result, Err(AppError::Integrity(_))));
}

#[actix_web::test]
async fn test_search() {
    let fx = setup().await;

    let all = users::search(&fx.pool, None).await.unwrap();
    let matched = users::search(&fx.pool, Some("user2")).await.unwrap();
    let none = users::search(&fx.pool, Some("nobody")).await.unwrap();

    assert_eq!(all, vec![fx.u1.clone(), fx.u2.clone()]);
    assert_eq!(matched, vec![fx.u2.clone()]);
    assert!(none.is_empty());
}

#[actix_web::test]
async fn test_search_is_case_sensitive() {
    let fx = setup().await;

    let upper = users::search(&fx.pool, Some("TESTUSER")).await.unwrap();
    let mixed = users::search(&fx.pool, Some("User1")).await.unwrap();
    let exact = users::search(&fx.pool, Some("user1")).await.unwrap();

    assert!(upper.is_empty(), "Search must not ignore case");
    assert!(mixed.is_empty());
    assert_eq!(exact, vec![fx.u1.clone()]);
}
