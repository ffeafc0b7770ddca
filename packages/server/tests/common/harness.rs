//! Test harness: in-memory service wiring, an HTTP driver for the router, and
//! a shared PostgreSQL container for store tests.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use hornet_core::domains::posts::{InMemoryPostStore, PgPostStore, PostService, PostStore};
use hornet_core::server::build_app;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

/// Route tracing output through the test writer. Run tests with
/// `RUST_LOG=debug cargo test -- --nocapture` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Service over a fresh in-memory store. The store handle shares state with
/// the one inside the service.
pub fn memory_service() -> (Arc<PostService>, InMemoryPostStore) {
    init_tracing();
    let store = InMemoryPostStore::new();
    let service = Arc::new(PostService::new(Arc::new(store.clone())));
    (service, store)
}

/// Service over any store.
pub fn service_over(store: Arc<dyn PostStore>) -> Arc<PostService> {
    init_tracing();
    Arc::new(PostService::new(store))
}

pub fn test_app(posts: Arc<PostService>) -> Router {
    build_app(posts, Duration::from_secs(5))
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// `POST /posts` with a JSON body and optional X-User-ID header.
pub fn create_request(user_id: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("X-User-ID", user_id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Send one request through the router and decode the JSON response body
/// (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// Shared container, started once per test binary and reused.
struct SharedPostgres {
    db_url: String,
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

/// Fresh pool and store against the shared, migrated database.
pub struct PgHarness {
    pub db_pool: PgPool,
    pub store: PgPostStore,
}

impl PgHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedPostgres::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;
        Ok(Self {
            store: PgPostStore::new(db_pool.clone()),
            db_pool,
        })
    }
}
