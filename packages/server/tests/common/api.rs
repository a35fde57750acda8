//! Thin HTTP client over the router, for end-to-end tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use roomie_core::common::Actor;
use roomie_core::server::auth::JwtService;
use serde_json::Value;
use tower::ServiceExt;

pub struct ApiClient {
    app: Router,
    jwt: Arc<JwtService>,
}

impl ApiClient {
    pub fn new(app: Router, jwt: Arc<JwtService>) -> Self {
        Self { app, jwt }
    }

    /// Send a request, optionally authenticated as `actor`, and return the
    /// status and body: parsed JSON, `Value::Null` when empty, or the raw
    /// text for non-JSON rejections.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        actor: Option<&Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(actor) = actor {
            let token = self
                .jwt
                .create_token(actor.member_id, actor.role)
                .expect("create token");
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.app.clone().oneshot(request).await.expect("router call");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, actor: &Actor) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(actor), None).await
    }

    pub async fn post(&self, uri: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(actor), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(actor), Some(body)).await
    }
}
