use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use ::common::StorageConfig;
use ::common::storage::{
    PresignedUpload, StorageError, UploadRestrictions, UploadSigner, validate_object_key,
};
use docuexpiry::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use docuexpiry::state::AppState;
use docuexpiry::utils::jwt::{self, SessionClaims};

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const ME: &str = "/api/v1/auth/me";
    pub const DOCUMENTS: &str = "/api/v1/documents";
    pub const CATEGORIES: &str = "/api/v1/categories";
    pub const TAGS: &str = "/api/v1/tags";
    pub const DASHBOARD_SUMMARY: &str = "/api/v1/dashboard/summary";
    pub const DASHBOARD_EXPIRING: &str = "/api/v1/dashboard/expiring-soon";
    pub const DASHBOARD_RECENT: &str = "/api/v1/dashboard/recent";
    pub const UPLOAD_TOKEN: &str = "/api/v1/uploads/token";
    pub const UPLOAD_COMPLETE: &str = "/api/v1/uploads/complete";

    pub fn document(id: i32) -> String {
        format!("/api/v1/documents/{id}")
    }

    pub fn documents_query(query: &str) -> String {
        format!("/api/v1/documents?{query}")
    }
}

/// Signs nothing; hands out deterministic URLs so tests can assert on them.
pub struct FakeSigner;

#[async_trait]
impl UploadSigner for FakeSigner {
    async fn presign_put(
        &self,
        key: &str,
        restrictions: &UploadRestrictions,
        expires_in_secs: u32,
    ) -> Result<PresignedUpload, StorageError> {
        validate_object_key(key)?;
        Ok(PresignedUpload {
            url: format!("https://uploads.test/{key}?X-Amz-Signature=fake"),
            headers: restrictions.headers(),
            expires_at: Utc::now() + Duration::seconds(i64::from(expires_in_secs)),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let db = docuexpiry::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                upload_token_ttl_secs: 3600,
            },
            storage: StorageConfig {
                max_upload_size: 1024 * 1024,
                ..Default::default()
            },
        };

        let state = AppState {
            db: db.clone(),
            config: app_config,
            uploads: Arc::new(FakeSigner),
        };

        let app = docuexpiry::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Mint a session token the way the external auth provider would.
    pub fn token_for(&self, user_id: &str) -> String {
        sign_session(user_id, Duration::hours(1))
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a document via the API and return its `id`.
    pub async fn create_document(&self, token: &str, body: Value) -> i32 {
        let res = self.post_with_token(routes::DOCUMENTS, &body, token).await;
        assert_eq!(res.status, 201, "create_document failed: {}", res.text);
        res.id()
    }

    /// Create a document with just a name and an expiry `days` from now.
    pub async fn create_named(&self, token: &str, name: &str, days: i64) -> i32 {
        self.create_document(
            token,
            serde_json::json!({ "name": name, "expiresAt": days_from_now(days) }),
        )
        .await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }

    /// Names of the items in a document list response, in order.
    pub fn item_names(&self) -> Vec<String> {
        self.body["items"]
            .as_array()
            .expect("response body should contain 'items'")
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect()
    }
}

pub fn sign_session(user_id: &str, valid_for: Duration) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        name: Some(format!("User {user_id}")),
        email: Some(format!("{user_id}@example.com")),
        picture: None,
        exp: (Utc::now() + valid_for).timestamp() as usize,
    };
    jwt::sign(&claims, JWT_SECRET).expect("Failed to sign session token")
}

/// RFC 3339 timestamp `days` from now (negative for the past).
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}
