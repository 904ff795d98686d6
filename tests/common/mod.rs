#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use todo_api::{
    app::build_app,
    auth::TOKEN_HEADER,
    config::{AppConfig, JwtConfig, TranslateConfig},
    db,
    state::AppState,
    translate::{ChainStep, ProviderError, Translation, TranslationChain, TranslationProvider},
};

/// Provider returning a fixed reply, or failing when `reply` is `None`.
pub struct FixedProvider {
    pub name: &'static str,
    pub reply: Option<&'static str>,
}

#[async_trait]
impl TranslationProvider for FixedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn attempt(&self, _text: &str, _target: &str) -> Result<Translation, ProviderError> {
        let text = self
            .reply
            .ok_or_else(|| ProviderError::Malformed("offline".into()))?;
        Ok(Translation {
            text: text.to_string(),
            source_language: "en".into(),
            service: self.name.into(),
        })
    }
}

/// Provider that echoes its input back unchanged.
pub struct EchoProvider;

#[async_trait]
impl TranslationProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn attempt(&self, text: &str, _target: &str) -> Result<Translation, ProviderError> {
        Ok(Translation {
            text: text.to_string(),
            source_language: "en".into(),
            service: "echo".into(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn spawn_app(steps: Vec<ChainStep>) -> TestApp {
    let pool = db::connect_in_memory().await.expect("open db");
    db::migrate(&pool).await.expect("migrate");

    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60 * 24,
        },
        translate: TranslateConfig::default(),
    });
    let translator = Arc::new(TranslationChain::new(steps, Duration::from_secs(5)));
    let state = AppState::from_parts(pool, config, translator);

    TestApp {
        router: build_app(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(TOKEN_HEADER, token);
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning the session token.
    pub async fn user_token(&self, name: &str, email: &str) -> String {
        let (status, _) = self.register(name, email, "pw").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": "pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_item(&self, token: &str, body: Value) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/items", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("id").to_string()
    }

    pub async fn items(&self, token: &str) -> Vec<Value> {
        let (status, body) = self.send(Method::GET, "/api/items", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().expect("array").clone()
    }
}
