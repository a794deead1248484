#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use talent_backend::{
    config::{Config, ProviderConfig},
    database::MemoryStore,
    models::talent::NewTalent,
    routes, AppState,
};
use tower::ServiceExt;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub provider: MockServer,
}

pub fn test_config(provider_uri: &str) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "memory://".into(),
        public_url: "http://testserver".into(),
        jwt_secret: "test_secret_key".into(),
        jwt_ttl_hours: 1,
        http_timeout_secs: 5,
        cors_allowed_origins: vec![],
        discord: ProviderConfig {
            client_id: "discord-client".into(),
            client_secret: "discord-secret".into(),
            redirect_uri: "http://testserver/discord/login/redirect".into(),
            api_endpoint: format!("{}/discord", provider_uri),
            authorize_url: "https://discord.test/oauth2/authorize".into(),
        },
        twitter: ProviderConfig {
            client_id: "twitter-client".into(),
            client_secret: "twitter-secret".into(),
            redirect_uri: "http://testserver/twitter/login/redirect".into(),
            api_endpoint: format!("{}/twitter", provider_uri),
            authorize_url: "https://twitter.test/i/oauth2/authorize".into(),
        },
    }
}

/// App on a fresh in-memory store, with both identity providers served by
/// one mock server (`/discord/...` and `/twitter/...`).
pub async fn spawn_app() -> TestApp {
    let provider = MockServer::start().await;
    let config = test_config(&provider.uri());
    let state = AppState::new(Arc::new(MemoryStore::new()), config).expect("app state");
    TestApp {
        router: routes::router(state.clone()),
        state,
        provider,
    }
}

pub fn discord_user(id: i64, username: &str) -> Value {
    json!({
        "id": id.to_string(),
        "username": username,
        "discriminator": "0",
        "global_name": format!("{} Global", username),
        "avatar": "abc123",
        "locale": "en-US",
        "email": format!("{}@example.com", username),
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        self.request_with_headers(method, uri, auth, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.request(Method::GET, uri, None, None).await;
        (status, body)
    }

    /// Makes `token` a valid Discord access token for `user`.
    pub async fn stub_discord_user(&self, token: &str, user: Value) {
        Mock::given(method("GET"))
            .and(path("/discord/users/@me"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.provider)
            .await;
    }

    /// Registers a talent reachable with `Bearer <token>`.
    pub async fn talent(&self, id: i64, username: &str) -> String {
        let token = format!("token-{}", id);
        self.stub_discord_user(&token, discord_user(id, username))
            .await;
        format!("Bearer {}", token)
    }

    /// Inserts a talent straight into the store.
    pub async fn seed_talent(&self, id: i64, username: &str) {
        self.state
            .store
            .insert_talent(NewTalent {
                id,
                username: username.into(),
                ..NewTalent::default()
            })
            .await
            .unwrap();
    }

    /// Registers a company and returns its `Token <jwt>` header value.
    pub async fn company(&self, email: &str, name: &str) -> String {
        let (status, _, body) = self
            .request(
                Method::POST,
                "/api/company/register",
                None,
                Some(json!({ "email": email, "name": name, "password": "s3cret-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        format!("Token {}", body["token"].as_str().unwrap())
    }
}
