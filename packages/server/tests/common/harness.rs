//! Test harnesses.
//!
//! `TestHarness` runs the lifecycle against the in-memory store and needs
//! nothing external. `PgHarness` runs against a real Postgres in a shared
//! testcontainer; tests using it are `#[ignore]`d and need Docker:
//!
//! ```text
//! cargo test -- --ignored
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use roomie_core::domains::matches::TransitionGuard;
use roomie_core::kernel::{MemoryStore, PgStore, ServerDeps};
use roomie_core::server::{auth::JwtService, build_app};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::ApiClient;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "roomie-test";

/// Initialize tracing once, respecting RUST_LOG.
///
/// Run tests with: RUST_LOG=roomie_core=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory harness: a fresh store per test.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let room = ctx.seed_room().await;
/// }
/// ```
pub struct TestHarness {
    pub store: MemoryStore,
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_guard(TransitionGuard::Permissive)
    }

    pub fn with_guard(guard: TransitionGuard) -> Self {
        init_tracing();
        let store = MemoryStore::new();
        let deps = ServerDeps::new(Arc::new(store.clone()), guard);
        Self { store, deps }
    }

    /// HTTP client over the full router, backed by this harness's store.
    pub fn api(&self) -> ApiClient {
        let jwt = Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string()));
        ApiClient::new(build_app(self.deps.clone(), jwt.clone()), jwt)
    }
}

/// Shared Postgres container, started once per test binary.
struct SharedPostgres {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        // Run migrations once on the shared database
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

/// Postgres harness: shared container, fresh pool per test.
///
/// Every test seeds its own members and rooms, so tests never see each
/// other's rows through the lifecycle operations.
pub struct PgHarness {
    pub pool: PgPool,
    pub deps: ServerDeps,
}

impl AsyncTestContext for PgHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create Postgres harness")
    }
}

impl PgHarness {
    pub async fn new() -> Result<Self> {
        let shared = SharedPostgres::get().await;
        let pool = PgPool::connect(&shared.db_url)
            .await
            .context("Failed to connect to test database")?;
        let deps = ServerDeps::new(
            Arc::new(PgStore::new(pool.clone())),
            TransitionGuard::Permissive,
        );
        Ok(Self { pool, deps })
    }
}
