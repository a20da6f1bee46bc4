#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use shopfloor::api::{self, AppState};
use shopfloor::db::init_db;
use shopfloor::{Config, Email, MockPaymentProvider, PaymentProvider, Repository};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";

pub struct TestApp {
    pub app: axum::Router,
    pub state: AppState,
    pub payments: MockPaymentProvider,
    _temp: TempDir,
}

pub fn test_config(db_path: String) -> Config {
    Config {
        port: 0,
        database_path: db_path,
        access_token_secret: "test-secret".to_string(),
        token_ttl_hours: 1,
        admin_email: Email::from_str(ADMIN_EMAIL).unwrap(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        payment_api_url: "http://example.invalid".to_string(),
        payment_secret_key: "sk_test".to_string(),
        payment_currency: "usd".to_string(),
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(MockPaymentProvider::new()).await
}

pub async fn setup_test_app_with(payments: MockPaymentProvider) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let config = test_config(db_path);
    repo.ensure_admin(&config.admin_email).await.unwrap();

    let provider: Arc<dyn PaymentProvider> = Arc::new(payments.clone());
    let state = AppState::new(repo, config, provider);
    let app = api::create_router(state.clone());

    TestApp {
        app,
        state,
        payments,
        _temp: temp_dir,
    }
}

impl TestApp {
    /// Send a request and return the status with the parsed JSON body (`Null` if empty).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, body) = self.send_raw(method, uri, cookie, body).await;
        (status, body)
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, set_cookies, json)
    }

    /// Obtain a session cookie for `email` through `/jwt`.
    pub async fn login(&self, email: &str) -> String {
        let (status, set_cookies, _) = self
            .send_raw("POST", "/jwt", None, Some(serde_json::json!({ "email": email })))
            .await;
        assert_eq!(status, StatusCode::OK);
        let cookie = set_cookies
            .iter()
            .find(|c| c.starts_with("userToken="))
            .expect("session cookie");
        cookie.split(';').next().unwrap().to_string()
    }

    /// Register `email` with a display name and log in.
    pub async fn register(&self, email: &str, name: &str) -> String {
        let (status, _) = self
            .send(
                "POST",
                "/users",
                None,
                Some(serde_json::json!({ "email": email, "name": name })),
            )
            .await;
        assert!(status.is_success());
        self.login(email).await
    }

    pub async fn create_shop(&self, cookie: &str) -> Value {
        let (status, shop) = self
            .send(
                "POST",
                "/shops",
                Some(cookie),
                Some(serde_json::json!({ "name": "Corner Store", "location": "Dhaka" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        shop
    }

    pub async fn create_product(&self, cookie: &str, cost: f64, margin: f64, quantity: i64) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/products",
            Some(cookie),
            Some(serde_json::json!({
                "name": "Lamp",
                "cost": cost,
                "profitMargin": margin,
                "quantity": quantity,
            })),
        )
        .await
    }
}
