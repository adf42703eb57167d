use std::net::TcpListener;

use bookshelf::auth::SessionConfig;
use bookshelf::configuration::{get_configuration, DatabaseSettings};
use bookshelf::startup::run;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    let connection_pool = configure_database(&configuration.database).await;

    let session_config = SessionConfig::from_settings(&configuration.auth);
    let server = run(listener, connection_pool.clone(), session_config)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

async fn register(app: &TestApp, username: &str, password: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(&format!("{}/users/", &app.address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn login(app: &TestApp, username: &str, password: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(&format!("{}/token/", &app.address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn login_token(app: &TestApp, username: &str, password: &str) -> String {
    let response = login(app, username, password).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    body["access_token"]
        .as_str()
        .expect("Missing access_token")
        .to_string()
}

// --- Registration ---

#[tokio::test]
async fn register_returns_201_and_persists_the_user() {
    let app = spawn_app().await;

    let response = register(&app, "alice", "s3cret-password").await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "alice");
    assert!(body["id"].as_i64().is_some());
    // The password hash must never appear in the response
    assert!(body.get("password_hash").is_none());

    let row: (String, String) =
        sqlx::query_as("SELECT username, password_hash FROM users WHERE username = 'alice'")
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch created user");

    assert_eq!(row.0, "alice");
    // Only a bcrypt hash is persisted, never the plaintext
    assert!(row.1.starts_with("$2"));
    assert_ne!(row.1, "s3cret-password");
}

#[tokio::test]
async fn duplicate_registration_returns_400_and_keeps_one_record() {
    let app = spawn_app().await;

    let first = register(&app, "bob", "x").await;
    assert_eq!(201, first.status().as_u16());

    let second = register(&app, "bob", "another-password").await;
    assert_eq!(400, second.status().as_u16());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'bob'")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to count users");
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn register_rejects_invalid_payloads() {
    let app = spawn_app().await;

    let cases = vec![
        ("", "password", "empty username"),
        ("   ", "password", "blank username"),
        ("has spaces", "password", "username with spaces"),
        ("valid_user", "", "empty password"),
    ];

    for (username, password, description) in cases {
        let response = register(&app, username, password).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject {}",
            description
        );
    }
}

// --- Login ---

#[tokio::test]
async fn login_returns_a_bearer_token_for_valid_credentials() {
    let app = spawn_app().await;
    register(&app, "alice", "correct-password").await;

    let response = login(&app, "alice", "correct-password").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_fail_identically() {
    let app = spawn_app().await;
    register(&app, "alice", "correct-password").await;

    let wrong_password = login(&app, "alice", "wrong-password").await;
    assert_eq!(401, wrong_password.status().as_u16());
    let wrong_password_body: Value = wrong_password.json().await.unwrap();

    let unknown_user = login(&app, "nonexistent", "anything").await;
    assert_eq!(401, unknown_user.status().as_u16());
    let unknown_user_body: Value = unknown_user.json().await.unwrap();

    // Same code, same message: no username enumeration via the error shape
    assert_eq!(wrong_password_body["code"], unknown_user_body["code"]);
    assert_eq!(wrong_password_body["message"], unknown_user_body["message"]);
}

// --- Request gate ---

#[tokio::test]
async fn a_valid_token_reaches_a_protected_route() {
    let app = spawn_app().await;
    register(&app, "alice", "correct-password").await;
    let token = login_token(&app, "alice", "correct-password").await;

    let response = reqwest::Client::new()
        .get(&format!("{}/books/", &app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn missing_malformed_and_invalid_tokens_are_rejected_uniformly() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/books/", &app.address);

    // A well-signed token under a key the server does not hold
    let foreign_token = bookshelf::auth::issue_token("alice", 3600, b"some-other-key")
        .expect("Failed to issue token");

    let requests = vec![
        ("missing header", client.get(&url)),
        ("wrong scheme", client.get(&url).header("Authorization", "Basic abc")),
        ("no token", client.get(&url).header("Authorization", "Bearer ")),
        ("garbage token", client.get(&url).bearer_auth("not.a.token")),
        ("foreign key", client.get(&url).bearer_auth(&foreign_token)),
    ];

    for (description, request) in requests {
        let response = request.send().await.expect("Failed to execute request.");
        assert_eq!(
            401,
            response.status().as_u16(),
            "Should reject request with {}",
            description
        );
        // Every rejection carries the bearer challenge
        assert_eq!(
            response
                .headers()
                .get("WWW-Authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer"),
            "Missing bearer challenge for {}",
            description
        );
    }
}

#[tokio::test]
async fn a_token_for_a_deleted_user_is_rejected() {
    let app = spawn_app().await;
    register(&app, "ghost", "password").await;
    let token = login_token(&app, "ghost", "password").await;

    // The token is validly signed and unexpired, but the identity is gone
    let user = bookshelf::store::users::find_by_username(&app.db_pool, "ghost")
        .await
        .expect("Failed to look up user")
        .expect("User should exist");
    let deleted = bookshelf::store::users::delete(&app.db_pool, user.id)
        .await
        .expect("Failed to delete user");
    assert!(deleted);

    let response = reqwest::Client::new()
        .get(&format!("{}/books/", &app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
}

// --- Health check ---

#[tokio::test]
async fn health_check_works_without_authentication() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
}
