//! End-to-end flows through the router against an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use bookshelf_server::db::{BookRepo, NewBook};
use bookshelf_server::{connect_in_memory, router, AppState, CredentialService, ServerConfig};

struct TestApp {
    app: Router,
    pool: SqlitePool,
}

impl TestApp {
    async fn new() -> Self {
        let pool = connect_in_memory().await.unwrap();
        let state = AppState {
            pool: pool.clone(),
            credentials: CredentialService::new(argon2::Params::new(8, 1, 1, None).unwrap()),
        };
        Self {
            app: router(state, &ServerConfig::default()),
            pool,
        }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(&self, username: &str, email: &str) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/register",
                Some(json!({
                    "username": username,
                    "email": email,
                    "password": "secret",
                    "confirmPassword": "secret"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["userId"].as_i64().unwrap()
    }

    async fn book(&self, title: &str) -> i64 {
        BookRepo::new(&self.pool)
            .insert(&NewBook {
                title: title.to_owned(),
                author: "Anon".to_owned(),
                genre_id: None,
                summary: None,
                cover_image: None,
            })
            .await
            .unwrap()
            .id
    }
}

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new().await;
    let user_id = app.register("alice", "alice@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "alice@example.com", "password": "secret"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], user_id);

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "alice", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect password");
}

#[tokio::test]
async fn login_unknown_user_is_401() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "nobody", "password": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No user found with this email/username");
}

#[tokio::test]
async fn login_accepts_bcrypt_digest_from_older_accounts() {
    let app = TestApp::new().await;
    let digest = bcrypt::hash("secret", 10).unwrap();
    assert!(digest.starts_with("$2b$10$"));

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password) VALUES ('legacy', 'legacy@example.com', ?) RETURNING id",
    )
    .bind(&digest)
    .fetch_one(&app.pool)
    .await
    .unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "legacy@example.com", "password": "secret"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id);

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "legacy@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect password");
}

#[tokio::test]
async fn register_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::POST, "/register", Some(json!({"username": "bob"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = app
        .call(
            Method::POST,
            "/register",
            Some(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "a",
                "confirmPassword": "b"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match");
}

#[tokio::test]
async fn padded_username_is_accepted() {
    let app = TestApp::new().await;
    let user_id = app.register(" spaced name ", "spaced@example.com").await;

    let (status, profile) = app
        .call(Method::GET, &format!("/user/{user_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], " spaced name ");
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = TestApp::new().await;
    app.register("alice", "alice@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/register",
            Some(json!({
                "username": "alice2",
                "email": "alice@example.com",
                "password": "secret",
                "confirmPassword": "secret"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email is already registered");
}

#[tokio::test]
async fn reset_password_changes_login() {
    let app = TestApp::new().await;
    app.register("carol", "carol@example.com").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/reset-password",
            Some(json!({
                "email": "carol@example.com",
                "newPassword": "fresh",
                "confirmNewPassword": "fresh"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::POST,
            "/login",
            Some(json!({"usernameOrEmail": "carol", "password": "fresh"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/reset-password",
            Some(json!({
                "email": "ghost@example.com",
                "newPassword": "x",
                "confirmNewPassword": "x"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email not found");
}

#[tokio::test]
async fn missing_book_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/books/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn books_are_listed_and_fetched() {
    let app = TestApp::new().await;
    let first = app.book("Dune").await;
    app.book("Emma").await;

    let (status, body) = app.call(Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app.call(Method::GET, &format!("/books/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
    assert!(body["cover_image"].is_null());
}

#[tokio::test]
async fn favourites_add_list_remove() {
    let app = TestApp::new().await;
    let user_id = app.register("dave", "dave@example.com").await;
    let book_id = app.book("Dune").await;

    // userId as a string, the way the mobile client stores it
    let body = json!({"userId": user_id.to_string(), "bookId": book_id});

    let (status, _) = app
        .call(Method::POST, "/add-to-favourites", Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = app
        .call(Method::POST, "/add-to-favourites", Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "Book is already in favourites");

    let (_, list) = app
        .call(Method::GET, &format!("/favourites/{user_id}"), None)
        .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], book_id);

    let (status, _) = app
        .call(Method::PUT, "/update-favourite", Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::DELETE, "/remove-from-favourites", Some(body))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app
        .call(Method::GET, &format!("/favourites/{user_id}"), None)
        .await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn favourite_for_unknown_book_is_404() {
    let app = TestApp::new().await;
    let user_id = app.register("erin", "erin@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/add-to-favourites",
            Some(json!({"userId": user_id, "bookId": 424242})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User or book not found");
}

#[tokio::test]
async fn learnings_lifecycle() {
    let app = TestApp::new().await;
    let user_id = app.register("fay", "fay@example.com").await;
    let book_id = app.book("Dune").await;

    let (status, saved) = app
        .call(
            Method::POST,
            "/save-learnings",
            Some(json!({"userId": user_id, "bookId": book_id, "learning": "Fear is the mind-killer"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = saved["id"].as_i64().unwrap();
    assert_eq!(saved["userId"], user_id);

    let uri = format!("/learnings?userId={user_id}&bookId={book_id}");
    let (_, list) = app.call(Method::GET, &uri, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app
        .call(
            Method::PUT,
            "/update-learning",
            Some(json!({"id": id, "userId": user_id, "bookId": book_id, "learning": "revised"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["learning"], "revised");

    // Same id, wrong book
    let (status, body) = app
        .call(
            Method::PUT,
            "/update-learning",
            Some(json!({"id": id, "userId": user_id, "bookId": book_id + 1, "learning": "nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Learning entry not found");

    let (status, body) = app
        .call(Method::DELETE, &format!("/learnings/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Learning deleted successfully");

    let (_, list) = app.call(Method::GET, &uri, None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn save_learning_requires_text() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/save-learnings",
            Some(json!({"userId": 1, "bookId": 1, "learning": ""})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");
}

#[tokio::test]
async fn partial_user_update_keeps_username() {
    let app = TestApp::new().await;
    let user_id = app.register("gus", "gus@example.com").await;
    let uri = format!("/user/{user_id}");

    let (status, _) = app
        .call(Method::PUT, &uri, Some(json!({"email": "gus@new.example"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, profile) = app.call(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "gus");
    assert_eq!(profile["email"], "gus@new.example");

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one field is required");
}

#[tokio::test]
async fn deleting_user_cascades() {
    let app = TestApp::new().await;
    let user_id = app.register("hal", "hal@example.com").await;
    let book_id = app.book("Dune").await;

    app.call(
        Method::POST,
        "/add-to-favourites",
        Some(json!({"userId": user_id, "bookId": book_id})),
    )
    .await;
    app.call(
        Method::POST,
        "/save-learnings",
        Some(json!({"userId": user_id, "bookId": book_id, "learning": "note"})),
    )
    .await;

    let (status, _) = app
        .call(Method::DELETE, &format!("/user/{user_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::GET, &format!("/user/{user_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let favourites: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favourites")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let learnings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_learnings")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!((favourites, learnings), (0, 0));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::new().await;
    let request = Request::post("/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
