//! In-process stub servers for the deployment platform.
//!
//! Each stub serves an axum router from a random loopback port on a
//! background task; the task is aborted when the handle drops so the port
//! is released as soon as the test is done with the stub.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::task::JoinHandle;

/// Environment the stub applications report from `/env`.
pub type StubEnv = HashMap<String, String>;

/// Handle to one spawned stub application.
pub struct StubApp {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl StubApp {
    /// Serve the given router from a random loopback port.
    pub async fn spawn(router: Router) -> Result<Self, anyhow::Error> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind stub server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Stub server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Base URL of the stub.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Socket address of the stub.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for StubApp {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Stub operations manager advertising the given apps domain.
pub async fn spawn_ops_manager(apps_domain: &str) -> Result<StubApp, anyhow::Error> {
    let body = serde_json::json!({ "apps_domain": apps_domain });
    spawn_raw_ops_manager(StatusCode::OK, body).await
}

/// Stub operations manager serving an arbitrary status and body, for
/// error-path tests.
pub async fn spawn_raw_ops_manager(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<StubApp, anyhow::Error> {
    let router = Router::new().route(
        "/api/v0/deployed/cf_info",
        get(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    StubApp::spawn(router).await
}

async fn env_handler(State(env): State<StubEnv>) -> Json<StubEnv> {
    Json(env)
}

async fn hello_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "greeting": "hello" }))
}

/// Stub target application serving `/env` and `/hello`.
pub async fn spawn_target(env: StubEnv) -> Result<StubApp, anyhow::Error> {
    let router = Router::new()
        .route("/env", get(env_handler))
        .route("/hello", get(hello_handler))
        .with_state(env);

    StubApp::spawn(router).await
}

#[derive(Deserialize)]
struct ProxyParams {
    url: String,
}

/// Forward the request to the URL carried in the `url` query parameter and
/// return the upstream response verbatim.
async fn proxy_handler(Query(params): Query<ProxyParams>) -> Response {
    match reqwest::get(&params.url).await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            let body = upstream.bytes().await.unwrap_or_default();
            (status, body).into_response()
        }
        Err(_) => StatusCode::BAD_GATEWAY.into_response(),
    }
}

/// Stub relay application serving `/env` and `/proxy?url=...`.
pub async fn spawn_relay(env: StubEnv) -> Result<StubApp, anyhow::Error> {
    let router = Router::new()
        .route("/env", get(env_handler))
        .route("/proxy", get(proxy_handler))
        .with_state(env);

    StubApp::spawn(router).await
}
