use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let router = notekeep::build_app(pool.clone(), false).await;

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response<axum::body::Body> {
        tower::ServiceExt::oneshot(self.router.clone(), req).await.unwrap()
    }

    /// Send a GET request with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<axum::body::Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a JSON request with the given method and optional cookie.
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<axum::body::Body> {
        let mut builder = Request::builder()
            .uri(uri)
            .method(method)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.request(req).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<axum::body::Body> {
        self.send_json("POST", uri, body, cookie).await
    }

    pub async fn patch_json(
        &self,
        uri: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<axum::body::Body> {
        self.send_json("PATCH", uri, body, cookie).await
    }

    /// Send a DELETE request with an optional session cookie.
    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response<axum::body::Body> {
        let mut builder = Request::builder().uri(uri).method("DELETE");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Sign up a fresh user and return (user_id, session cookie).
    pub async fn signup(&self, username: &str, email: &str) -> (String, String) {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": "correct-horse-battery",
        });
        let resp = self.post_json("/api/auth/signup", &body, None).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .expect("Signup should set a session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let json = body_json(resp).await;
        let user_id = json["data"]["user"]["id"].as_str().unwrap().to_string();
        (user_id, cookie)
    }

    /// Create a note through the API and return it as JSON.
    pub async fn create_note(&self, cookie: &str, body: Value) -> Value {
        let resp = self.post_json("/api/notes", &body, Some(cookie)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["data"]["note"].clone()
    }

    /// Create a folder through the API and return its id.
    pub async fn create_folder(&self, cookie: &str, name: &str) -> String {
        let resp = self
            .post_json("/api/folders", &serde_json::json!({ "name": name }), Some(cookie))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["data"]["folder"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Create a tag through the API and return its id.
    pub async fn create_tag(&self, cookie: &str, name: &str) -> String {
        let resp = self
            .post_json("/api/tags", &serde_json::json!({ "name": name }), Some(cookie))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["data"]["tag"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// List notes with a raw query string and return the notes array.
    pub async fn list_notes(&self, cookie: &str, query: &str) -> Vec<Value> {
        let uri = if query.is_empty() {
            "/api/notes".to_string()
        } else {
            format!("/api/notes?{query}")
        };
        let resp = self.get(&uri, Some(cookie)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await["data"]["notes"]
            .as_array()
            .expect("notes should always be an array")
            .clone()
    }
}

/// Read the full response body as JSON.
pub async fn body_json(resp: Response<axum::body::Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}
