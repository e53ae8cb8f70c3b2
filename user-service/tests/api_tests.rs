mod common;

use auth::PasswordHasher;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use user_service::domain::user::models::UserId;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "nicola",
            "email_address": "nicola@example.com",
            "password": "correcthorsebattery"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_stores_argon2id_hash() {
    let app = TestApp::spawn().await;

    let body = app
        .register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let user_id = UserId::from_string(body["data"]["id"].as_str().unwrap()).unwrap();

    let stored = app.store.password_hash(&user_id).await.unwrap();
    assert!(stored.as_str().starts_with("$argon2id$v=19$"));
    assert!(!stored.as_str().contains("correcthorsebattery"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "nicola2",
            "email_address": "nicola@example.com",
            "password": "correcthorsebattery"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = TestApp::spawn().await;

    for (username, email, password) in [
        ("n", "nicola@example.com", "correcthorsebattery"),
        ("nicola", "not-an-email", "correcthorsebattery"),
        ("nicola", "nicola@example.com", "short"),
    ] {
        let response = app
            .post("/api/users")
            .json(&json!({
                "username": username,
                "email_address": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    let registered = app
        .register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "correcthorsebattery"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["expires_at"].is_string());
    assert_eq!(body["data"]["user"]["id"], registered["data"]["id"]);

    let subject = app.authenticator.validate_token(token).unwrap();
    assert_eq!(subject.to_string(), registered["data"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_login_by_user_id() {
    let app = TestApp::spawn().await;

    let registered = app
        .register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let user_id = registered["data"]["id"].as_str().unwrap();

    let token = app.login(user_id, "correcthorsebattery").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;

    let mut bodies = Vec::new();
    for (identifier, password) in [
        ("nicola@example.com", "wrong"),
        ("nobody@example.com", "correcthorsebattery"),
        ("not an identifier", "correcthorsebattery"),
    ] {
        let response = app
            .post("/api/auth/login")
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.text().await.unwrap());
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(bodies[0].contains("Invalid credentials"));
}

#[tokio::test]
async fn test_get_profile() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let token = app.login("nicola@example.com", "correcthorsebattery").await;

    let response = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
}

#[tokio::test]
async fn test_get_profile_rejections() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(reqwest::header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "missing authorization header");

    let response = app
        .get("/api/users/me")
        .header(reqwest::header::AUTHORIZATION, "Token abc")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "invalid authorization format");

    let response = app
        .get_authenticated("/api/users/me", "invalid.token.here")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "invalid or expired token");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::spawn_with_ttl(chrono::Duration::milliseconds(1)).await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let token = app.login("nicola@example.com", "correcthorsebattery").await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "invalid or expired token");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let token = app.login("nicola@example.com", "correcthorsebattery").await;

    let response = app
        .put_authenticated("/api/users/me/password", &token)
        .json(&json!({
            "current_password": "wrong-password",
            "new_password": "staplebatteryhorse"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .put_authenticated("/api/users/me/password", &token)
        .json(&json!({
            "current_password": "correcthorsebattery",
            "new_password": "staplebatteryhorse"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "correcthorsebattery"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login("nicola@example.com", "staplebatteryhorse").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_deactivate_blocks_login() {
    let app = TestApp::spawn().await;

    app.register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let token = app.login("nicola@example.com", "correcthorsebattery").await;

    let response = app
        .delete_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "correcthorsebattery"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Account is deactivated");

    // Wrong password still reports only invalid credentials.
    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nicola@example.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The token outlives the account but no longer reaches the profile.
    let response = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_upgrades_outdated_hash() {
    let app = TestApp::spawn().await;

    let registered = app
        .register("nicola", "nicola@example.com", "correcthorsebattery")
        .await;
    let user_id = UserId::from_string(registered["data"]["id"].as_str().unwrap()).unwrap();

    let outdated = PasswordHasher::new(auth::HashParameters {
        iterations: 2,
        ..common::test_parameters()
    })
    .unwrap()
    .hash("correcthorsebattery")
    .unwrap();
    app.store
        .replace_password_hash(&user_id, outdated.clone())
        .await;

    app.login("nicola@example.com", "correcthorsebattery").await;

    let upgraded = app.store.password_hash(&user_id).await.unwrap();
    assert_ne!(upgraded, outdated);
    assert!(upgraded.as_str().contains("t=1"));

    // And the upgraded hash keeps working.
    app.login("nicola@example.com", "correcthorsebattery").await;
}
