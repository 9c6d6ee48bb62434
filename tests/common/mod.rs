use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, ensure, Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jobboard::auth::jwt::JwtService;
use jobboard::config::AppConfig;
use jobboard::db;
use jobboard::mailer::Mailer;
use jobboard::metrics::DropoutFeatures;
use jobboard::prediction::DropoutPredictor;
use jobboard::routes;
use jobboard::state::AppState;
use jobboard::store::MemoryStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("SMTP relay unavailable");
        }
        let mut guard = self.sent.lock().await;
        guard.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

impl FakeMailer {
    #[allow(dead_code)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// The code from the most recent OTP email addressed to `email`.
    #[allow(dead_code)]
    pub async fn last_otp_for(&self, email: &str) -> Result<String> {
        let guard = self.sent.lock().await;
        let mail = guard
            .iter()
            .rev()
            .find(|mail| mail.to == email && mail.subject == "Your OTP")
            .ok_or_else(|| anyhow!("no OTP mail sent to {email}"))?;
        let code = mail
            .body
            .rsplit(' ')
            .next()
            .ok_or_else(|| anyhow!("OTP mail has no code"))?;
        Ok(code.to_string())
    }
}

#[derive(Default)]
pub struct FakePredictor {
    requests: Mutex<Vec<DropoutFeatures>>,
    failing: AtomicBool,
}

#[async_trait]
impl DropoutPredictor for FakePredictor {
    async fn predict(&self, features: &DropoutFeatures) -> Result<Value> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        self.requests.lock().await.push(features.clone());
        Ok(json!({ "dropout_percentage": 42.5 }))
    }
}

impl FakePredictor {
    #[allow(dead_code)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub async fn requests(&self) -> Vec<DropoutFeatures> {
        self.requests.lock().await.clone()
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
    store: Arc<MemoryStore>,
    mailer: Arc<FakeMailer>,
    predictor: Arc<FakePredictor>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/jobboard_test".to_string(),
        database_max_pool_size: db::DEFAULT_MAX_POOL_SIZE,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_issuer: "test-issuer".to_string(),
        jwt_audience: "test-audience".to_string(),
        jwt_expiry_minutes: 60,
        cors_allowed_origin: Some("http://localhost:3000".to_string()),
        smtp_host: "smtp.invalid".to_string(),
        smtp_port: 587,
        smtp_username: "noreply@jobboard.test".to_string(),
        smtp_password: "unused".to_string(),
        mail_from: "noreply@jobboard.test".to_string(),
        prediction_service_url: "http://127.0.0.1:9/predict".to_string(),
        prediction_timeout_secs: 1,
        campaign_sweep_interval_secs: 0,
    }
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(FakeMailer::default());
        let predictor = Arc::new(FakePredictor::default());
        let jwt = JwtService::from_config(&config)?;
        let state = AppState::new(
            store.clone(),
            config,
            mailer.clone(),
            predictor.clone(),
            jwt,
        );
        let router = routes::create_router(state.clone());

        Ok(Self {
            state,
            router,
            store,
            mailer,
            predictor,
        })
    }

    #[allow(dead_code)]
    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    #[allow(dead_code)]
    pub fn mailer(&self) -> Arc<FakeMailer> {
        self.mailer.clone()
    }

    #[allow(dead_code)]
    pub fn predictor(&self) -> Arc<FakePredictor> {
        self.predictor.clone()
    }

    /// Registers an employee and returns its id and token.
    #[allow(dead_code)]
    pub async fn register_employee(&self, name: &str, phone: &str, pin: &str) -> Result<(i32, String)> {
        let response = self
            .post_json(
                "/employees",
                &json!({ "name": name, "phone": phone, "pin": pin }),
                None,
            )
            .await?;
        ensure!(
            response.status() == StatusCode::CREATED,
            "employee registration failed with status {}",
            response.status()
        );
        let body: Value = read_json(response).await?;
        token_pair(&body)
    }

    /// Registers an employer and completes OTP verification.
    #[allow(dead_code)]
    pub async fn register_verified_employer(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(i32, String)> {
        let response = self
            .post_json(
                "/employers",
                &json!({ "name": name, "email": email, "password": password }),
                None,
            )
            .await?;
        ensure!(
            response.status() == StatusCode::CREATED,
            "employer registration failed with status {}",
            response.status()
        );

        let otp = self.mailer.last_otp_for(email).await?;
        let response = self
            .post_json(
                "/employers/verify-otp",
                &json!({ "email": email, "otp": otp }),
                None,
            )
            .await?;
        ensure!(
            response.status() == StatusCode::OK,
            "OTP verification failed with status {}",
            response.status()
        );
        let body: Value = read_json(response).await?;
        token_pair(&body)
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        self.send_body(Method::POST, path, Body::from(body), token).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        self.send_body(Method::PUT, path, Body::from(body), token).await
    }

    #[allow(dead_code)]
    pub async fn post_raw(
        &self,
        path: &str,
        raw: &'static str,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        self.send_body(Method::POST, path, Body::from(raw), token).await
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        let builder = Request::builder().method(Method::DELETE).uri(path);
        let builder = if let Some(token) = token {
            builder.header("authorization", format!("Bearer {token}"))
        } else {
            builder
        };
        let request = builder.body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    async fn send_body(
        &self,
        method: Method,
        path: &str,
        body: Body,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(body)?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

pub async fn read_json<T: DeserializeOwned>(response: hyper::Response<Body>) -> Result<T> {
    let body = body_to_vec(response.into_body()).await?;
    serde_json::from_slice(&body).with_context(|| {
        format!(
            "response body is not the expected JSON: {}",
            String::from_utf8_lossy(&body)
        )
    })
}

fn token_pair(body: &Value) -> Result<(i32, String)> {
    let id = body["id"]
        .as_i64()
        .ok_or_else(|| anyhow!("response has no id: {body}"))?;
    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow!("response has no token: {body}"))?;
    Ok((i32::try_from(id)?, token.to_string()))
}
