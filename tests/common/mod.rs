#![allow(dead_code)]

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use flightdesk::config::Config;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ACCESS_KEY: &str = "test-access-key";

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn slow(body: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::json(body)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Fake flight data API on an ephemeral port.
#[derive(Clone)]
pub struct MockUpstream {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
    reply: Arc<Mutex<Reply>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub async fn start(reply: Reply) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream addr");

        let mock = Self {
            base_url: format!("http://{addr}/v1"),
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Arc::new(Mutex::new(reply)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/v1/{resource}", get(handle))
            .with_state(mock.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream");
        });

        mock
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn last_request(&self) -> Option<Recorded> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn config(&self) -> Config {
        config_for(&self.base_url)
    }
}

async fn handle(
    State(mock): State<MockUpstream>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    mock.requests.lock().unwrap().push(Recorded {
        path: format!("/v1/{resource}"),
        query,
    });

    let reply = mock.reply.lock().unwrap().clone();
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.aviation.base_url = base_url.to_string();
    config.aviation.access_key = ACCESS_KEY.to_string();
    config.observability.metrics_enabled = false;
    config
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}/v1")
}

pub const FLIGHT_BODY: &str = r#"{
    "pagination": {"limit": 100, "offset": 0, "count": 1, "total": 1},
    "data": [{
        "flight_date": "2024-05-01",
        "flight_status": "scheduled",
        "departure": {"airport": "Heathrow", "iata": "LHR", "scheduled": "2024-05-01T09:30:00+00:00"},
        "arrival": {"airport": "John F Kennedy International", "iata": "JFK"},
        "airline": {"name": "British Airways", "iata": "BA"},
        "flight": {"number": "117", "iata": "BA117"}
    }]
}"#;
