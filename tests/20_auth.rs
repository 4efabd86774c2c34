mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

use alpha_backoffice::types::Role;

fn sign_up_body(email: &str) -> Value {
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": email,
        "password": "Sup3r$ecret",
        "confirmPassword": "Sup3r$ecret",
        "termsAndConditions": true
    })
}

#[tokio::test]
async fn first_sign_up_becomes_admin_then_users() {
    let app = TestApp::new();

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("grace@example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["ok"], true);
    assert_eq!(res.data()["message"], "User was successfully created.");

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("alan@example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let grace = app.db.user_by_email("grace@example.com").unwrap();
    let alan = app.db.user_by_email("alan@example.com").unwrap();
    assert_eq!(grace.role.as_deref(), Some("Admin"));
    assert_eq!(alan.role.as_deref(), Some("User"));
    assert_eq!(alan.username, "alan@example.com");
    assert_ne!(alan.password_hash.as_deref(), Some("Sup3r$ecret"));
}

#[tokio::test]
async fn sign_up_validation_messages() {
    let app = TestApp::new();

    let mut body = sign_up_body("grace@example.com");
    body["email"] = json!("");
    let res = app.post_json("/api/Auth/SignUp", body).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Required fields are missing in form");

    let mut body = sign_up_body("grace@example.com");
    body["confirmPassword"] = json!("different");
    let res = app.post_json("/api/Auth/SignUp", body).await;
    assert_eq!(res.message(), "Passwords do not match");

    let mut body = sign_up_body("grace@example.com");
    body["termsAndConditions"] = json!(false);
    let res = app.post_json("/api/Auth/SignUp", body).await;
    assert_eq!(res.message(), "Must accept Terms and Conditions");

    let mut body = sign_up_body("grace@example.com");
    body["lastName"] = json!("H");
    let res = app.post_json("/api/Auth/SignUp", body).await;
    assert_eq!(res.message(), "Length must be at least 2 characters.");

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("not-an-email")).await;
    assert_eq!(res.message(), "Invalid email address");

    let mut body = sign_up_body("grace@example.com");
    body["password"] = json!("password");
    body["confirmPassword"] = json!("password");
    let res = app.post_json("/api/Auth/SignUp", body).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Invalid password");

    assert!(app.db.user_by_email("grace@example.com").is_none());
}

#[tokio::test]
async fn sign_up_rejects_existing_account() {
    let app = TestApp::new();
    app.db.seed_user("grace@example.com", Some("Passw0rd!"), Some(Role::User));

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("grace@example.com")).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.message(), "User already has an account.");
}

#[tokio::test]
async fn email_identity_ignores_letter_case() {
    let app = TestApp::new();

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("grace@example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("GRACE@example.com")).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.message(), "User already has an account.");

    let res = app
        .post_json(
            "/api/Auth/SignIn",
            json!({ "email": " Grace@Example.com ", "password": "Sup3r$ecret" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let token = res.data()["accessToken"].as_str().unwrap().to_string();
    let res = app.get("/api/Users/me", Auth::Bearer(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["information"]["email"], "grace@example.com");
}

#[tokio::test]
async fn sign_up_stores_email_lowercased() {
    let app = TestApp::new();

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("Ada.Lovelace@Example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let ada = app.db.user_by_email("ada.lovelace@example.com").unwrap();
    assert_eq!(ada.email, "ada.lovelace@example.com");
}

#[tokio::test]
async fn sign_up_claims_admin_created_user() {
    let app = TestApp::new();
    let id = app.db.seed_user("grace@example.com", None, Some(Role::User));

    let res = app.post_json("/api/Auth/SignUp", sign_up_body("grace@example.com")).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["message"], "User updated successfully.");
    assert!(app.db.user(&id).unwrap().has_password());

    let res = app
        .post_json(
            "/api/Auth/SignIn",
            json!({ "email": "grace@example.com", "password": "Sup3r$ecret" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["isAdmin"], false);
}

#[tokio::test]
async fn admin_sign_in_returns_token_and_api_key() {
    let app = TestApp::new();
    app.db.seed_user("root@example.com", Some("Passw0rd!"), Some(Role::Admin));

    let res = app
        .post_json("/api/Auth/SignIn", json!({ "email": "root@example.com", "password": "Passw0rd!" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let data = res.data();
    assert_eq!(data["isAdmin"], true);
    assert_eq!(data["apiKey"], ADMIN_KEY);

    let token = data["accessToken"].as_str().unwrap().to_string();
    let res = app.get("/api/Users/me", Auth::Bearer(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["information"]["email"], "root@example.com");
}

#[tokio::test]
async fn user_sign_in_has_no_api_key() {
    let app = TestApp::new();
    app.db.seed_user("user@example.com", Some("Passw0rd!"), None);

    let res = app
        .post_json("/api/Auth/SignIn", json!({ "email": "user@example.com", "password": "Passw0rd!" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["isAdmin"], false);
    assert!(res.data().get("apiKey").is_none());
}

#[tokio::test]
async fn sign_in_failures_are_unauthorized() {
    let app = TestApp::new();
    app.db.seed_user("user@example.com", Some("Passw0rd!"), Some(Role::User));
    app.db.seed_user("pending@example.com", None, Some(Role::User));

    let res = app
        .post_json("/api/Auth/SignIn", json!({ "email": "nobody@example.com", "password": "Passw0rd!" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid email.");

    let res = app
        .post_json("/api/Auth/SignIn", json!({ "email": "user@example.com", "password": "wrong" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid email or password.");

    let res = app
        .post_json("/api/Auth/SignIn", json!({ "email": "pending@example.com", "password": "" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid email or password.");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();
    let res = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/Auth/SignIn")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new();

    let res = app.get("/api/Projects", Auth::None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Missing Authorization header");

    let res = app.get("/api/Statuses", Auth::Bearer("not.a.token")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let token = app.token_for("user@example.com", Role::User);
    let res = app.get("/api/Statuses", Auth::Bearer(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_need_the_api_key() {
    let app = TestApp::new();
    let token = app.admin_token();
    let client_id = app.db.seed_client("Acme");
    let uri = format!("/api/Clients/{}", client_id);

    let res = app.get(&uri, Auth::Bearer(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid api-key or api-key is missing.");

    let res = app
        .send(
            axum::http::Request::builder()
                .uri(&uri)
                .header("authorization", format!("Bearer {}", token))
                .header("X-ADM-API-KEY", "wrong-key")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid api-key.");

    let res = app.get(&uri, Auth::Admin(&token)).await;
    assert_eq!(res.status, StatusCode::OK);

    // The key alone is not enough
    let res = app
        .send(
            axum::http::Request::builder()
                .uri(&uri)
                .header("X-ADM-API-KEY", ADMIN_KEY)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}
