//! Integration tests for Kit Shop.
//!
//! Every test builds the real storefront router on top of a fresh SQLite
//! file and drives it with `tower::ServiceExt::oneshot`. [`TestContext`]
//! plays the browser: it remembers the session cookie between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kitshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Home page filters, product detail, static files, health
//! - `cart` - Session cart operations
//! - `admin` - Login guard, product form, CSV upload

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use sqlx::SqlitePool;
use tower::ServiceExt;

use kitshop_storefront::config::StorefrontConfig;
use kitshop_storefront::db::{self, ProductRepository};
use kitshop_storefront::state::AppState;

/// Multipart boundary used by [`TestContext::post_multipart`].
const BOUNDARY: &str = "kitshop-test-boundary";

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Assert this is a redirect to `target` and return `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 3xx or the location differs.
    #[track_caller]
    pub fn assert_redirect(&self, target: &str) -> &Self {
        assert!(
            self.status.is_redirection(),
            "expected redirect to {target}, got {}",
            self.status
        );
        assert_eq!(self.location(), Some(target));
        self
    }
}

/// One part of a multipart body.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

/// A storefront instance backed by its own temporary database.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
    db_path: PathBuf,
}

impl TestContext {
    /// Fresh, migrated, empty database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created.
    pub async fn new() -> Self {
        let db_path = std::env::temp_dir().join(format!(
            "kitshop-test-{}-{}.sqlite",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let mut config = StorefrontConfig::local(&database_url);
        config.static_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static"));

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to create database pool");
        db::migrate(&pool).await.expect("Failed to run migrations");

        let app = kitshop_storefront::app(AppState::new(config, pool.clone()));

        Self {
            app,
            pool,
            cookie: None,
            db_path,
        }
    }

    /// Database holding the six demo products.
    ///
    /// # Panics
    ///
    /// Panics if seeding fails.
    pub async fn seeded() -> Self {
        let ctx = Self::new().await;
        db::seed::seed_demo(&ctx.pool, false)
            .await
            .expect("Failed to seed demo catalog");
        ctx
    }

    /// Send a request with the current session cookie and remember any new one.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body is not UTF-8.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("Invalid cookie header"),
            );
        }

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().expect("Invalid Set-Cookie header");
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            if set_cookie.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair);
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = String::from_utf8(bytes.to_vec()).expect("Response body was not UTF-8");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Drop the session cookie, as a new browser would.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    /// `GET uri`.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(request("GET", uri).body(Body::empty()).expect("Invalid request"))
            .await
    }

    /// `GET uri` as if following a link on `referer`.
    pub async fn get_from(&mut self, uri: &str, host: &str, referer: &str) -> TestResponse {
        self.send(
            request("GET", uri)
                .header(header::HOST, host)
                .header(header::REFERER, referer)
                .body(Body::empty())
                .expect("Invalid request"),
        )
        .await
    }

    /// `POST uri` with an urlencoded form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        self.send(
            request("POST", uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("Invalid request"),
        )
        .await
    }

    /// `POST uri` with a `multipart/form-data` body.
    pub async fn post_multipart(&mut self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        self.send(
            request("POST", uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(parts)))
                .expect("Invalid request"),
        )
        .await
    }

    /// Upload `content` as the `file` field under `filename`.
    pub async fn upload_csv(&mut self, filename: &str, content: &str) -> TestResponse {
        self.post_multipart(
            "/admin/bulk_add",
            &[Part {
                name: "file",
                filename: Some(filename),
                content: content.as_bytes(),
            }],
        )
        .await
    }

    /// Log in with the default admin credentials.
    ///
    /// # Panics
    ///
    /// Panics if the login is not accepted.
    pub async fn login_admin(&mut self) {
        self.post_form(
            "/admin_login",
            &[("username", "admin"), ("password", "password")],
        )
        .await
        .assert_redirect("/admin_dashboard");
    }

    /// Number of rows in the product table.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn product_count(&self) -> i64 {
        ProductRepository::new(&self.pool)
            .count()
            .await
            .expect("Failed to count products")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n\
                     Content-Type: text/csv\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
