use court_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::user::{Role, User},
    domain::services::seed::seed_catalog,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_resource_repo::SqliteResourceRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use std::str::FromStr;
use std::time::Duration;
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub const TEST_DATE: &str = "2030-06-03";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            timezone: chrono_tz::UTC,
            seed_demo_data: false,
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteResourceRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
        ));

        seed_catalog(state.resource_repo.as_ref()).await.expect("Failed to seed catalog");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn create_user(&self, name: &str, role: Role) -> User {
        let email = format!("{}@test.com", Uuid::new_v4());
        let user = User::new(name.to_string(), email, role);
        self.state.user_repo.create(&user).await.expect("Failed to create test user")
    }

    pub async fn staff(&self) -> User {
        self.create_user("Accueil", Role::Staff).await
    }

    pub async fn client(&self, name: &str) -> User {
        self.create_user(name, Role::Client).await
    }

    pub async fn send(&self, method: &str, uri: &str, user_id: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user_id {
            builder = builder.header("X-User-Id", id);
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends the request and returns status plus parsed JSON body.
    pub async fn call(&self, method: &str, uri: &str, user_id: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, user_id, body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Books `resource_id` at `hour` for `client_id` through the staff endpoint.
    pub async fn staff_booking(&self, staff_id: &str, client_id: &str, resource_id: &str, hour: u32) -> (StatusCode, Value) {
        self.call("POST", "/api/v1/admin/bookings", Some(staff_id), Some(serde_json::json!({
            "user_id": client_id,
            "resource_id": resource_id,
            "date": TEST_DATE,
            "hour": hour,
        }))).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
