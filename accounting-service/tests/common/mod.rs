//! Common test utilities for accounting-service integration tests.
//!
//! The suite needs a MongoDB replica set (multi-document transactions).
//! Set TEST_MONGODB_URI to run it; without the variable every test logs a
//! skip and returns, so the unit suite stays green on machines without a
//! database.

use accounting_service::config::{AccountingConfig, MongoConfig};
use accounting_service::startup::Application;
use backoffice_core::config::Config as CommonConfig;
use serde_json::Value;
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,accounting_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// Spawn a test application on a random port against a throwaway database.
/// Returns None when TEST_MONGODB_URI is not set.
pub async fn spawn_app() -> Option<TestApp> {
    init_tracing();

    let Ok(uri) = std::env::var("TEST_MONGODB_URI") else {
        eprintln!("skipping: TEST_MONGODB_URI not set");
        return None;
    };

    let config = AccountingConfig {
        common: CommonConfig { port: 0 },
        mongodb: MongoConfig {
            uri,
            database: format!("backoffice_test_{}", Uuid::new_v4().simple()),
        },
    };

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("X-User-Id", "test-user".parse().unwrap());
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to build client");

    Some(TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client,
    })
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Request failed");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Request failed");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn delete(&self, path: &str) -> u16 {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Request failed")
            .status()
            .as_u16()
    }

    /// Create a project and return its id.
    pub async fn create_project(&self) -> String {
        let (status, body) = self
            .post_json(
                "/api/v1/projects",
                serde_json::json!({
                    "name": "Green Valley Estate",
                    "code": format!("GVE-{}", Uuid::new_v4().simple()),
                    "location": "Pune",
                }),
            )
            .await;
        assert_eq!(status, 201, "project creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a plot in the project and return its id.
    pub async fn create_plot(&self, project_id: &str, size: f64, rate: f64) -> String {
        let (status, body) = self
            .post_json(
                "/api/v1/plots",
                serde_json::json!({
                    "project_id": project_id,
                    "plot_number": format!("P-{}", Uuid::new_v4().simple()),
                    "size_sqft": size,
                    "rate_per_sqft": rate,
                }),
            )
            .await;
        assert_eq!(status, 201, "plot creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a sales executive and return its id.
    pub async fn create_executive(&self) -> String {
        let (status, body) = self
            .post_json(
                "/api/v1/executives",
                serde_json::json!({
                    "name": "Ravi Kulkarni",
                    "phone": "9820012345",
                    "role": "sales_executive",
                }),
            )
            .await;
        assert_eq!(status, 201, "executive creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Book a customer against the plot and return the customer id.
    pub async fn create_customer(
        &self,
        project_id: &str,
        plot_id: &str,
        executive_id: Option<&str>,
        deal_value: f64,
    ) -> String {
        let mut body = serde_json::json!({
            "name": "Asha Patil",
            "phone": "9820054321",
            "project_id": project_id,
            "plot_id": plot_id,
            "deal_value": deal_value,
        });
        if let Some(executive_id) = executive_id {
            body["executive_id"] = Value::String(executive_id.to_string());
        }
        let (status, body) = self.post_json("/api/v1/customers", body).await;
        assert_eq!(status, 201, "customer creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Record a payment for the customer and return the transaction id.
    pub async fn record_payment(&self, customer_id: &str, amount: f64) -> String {
        let (status, body) = self
            .post_json(
                "/api/v1/payments",
                serde_json::json!({
                    "customer_id": customer_id,
                    "amount": amount,
                    "method": "bank_transfer",
                }),
            )
            .await;
        assert_eq!(status, 201, "payment failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a ledger account and return its id.
    pub async fn create_ledger_account(&self, name: &str, opening_balance: f64) -> String {
        let (status, body) = self
            .post_json(
                "/api/v1/ledger-accounts",
                serde_json::json!({
                    "name": name,
                    "account_type": "bank",
                    "opening_balance": opening_balance,
                }),
            )
            .await;
        assert_eq!(status, 201, "account creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
