//! An in-process stand-in for the Dwolla API, serving JSON fixtures and
//! recording every request it receives

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use dwolla::{
    transaction::TransactionParams, Client, Config, Result, TransactionFactory, TransactionId,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub const BASE_PATH: &str = "/oauth/rest";
pub const TOKEN: &str = "valid_token";

pub mod fixtures {
    pub const ACCOUNT_INFORMATION: &str = include_str!("../fixtures/account_information.json");
    pub const BASIC_INFORMATION: &str = include_str!("../fixtures/basic_information.json");
    pub const BALANCE: &str = include_str!("../fixtures/balance.json");
    pub const CONTACTS: &str = include_str!("../fixtures/contacts.json");
    pub const ERROR: &str = include_str!("../fixtures/error.json");
    pub const INSUFFICIENT_FUNDS: &str = include_str!("../fixtures/insufficient_funds.json");
    pub const SOURCE: &str = include_str!("../fixtures/source.json");
    pub const SOURCES: &str = include_str!("../fixtures/sources.json");
    pub const TRANSACTION: &str = include_str!("../fixtures/transaction.json");
}

/// A request as seen by the mock API
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Debug, Default)]
struct Shared {
    fixtures: HashMap<String, &'static str>,
    requests: Vec<Recorded>,
}

type SharedState = Arc<Mutex<Shared>>;

#[derive(Debug)]
pub struct MockApi {
    base_url: String,
    state: SharedState,
}

impl MockApi {
    pub async fn start() -> Self {
        init_tracing();

        let state = SharedState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}{}", addr, BASE_PATH),
            state,
        }
    }

    /// Serve `body` for requests to `path`, relative to the base path.
    ///
    /// `path` must be given percent-encoded, as it appears on the wire.
    pub fn mock(&self, path: &str, body: &'static str) {
        self.state
            .lock()
            .unwrap()
            .fixtures
            .insert(format!("{}{}", BASE_PATH, path), body);
    }

    pub fn client(&self) -> Client {
        Client::new(Config::with_base_url(&self.base_url)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn only_request(&self) -> Recorded {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}

async fn respond(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut shared = state.lock().unwrap();

    shared.requests.push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(ToString::to_string),
        headers,
        body,
    });

    match shared.fixtures.get(uri.path()) {
        Some(fixture) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            *fixture,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A [`TransactionFactory`] that records the parameters it is given instead
/// of submitting anything
#[derive(Debug)]
pub struct RecordingFactory {
    id: TransactionId,
    params: Mutex<Vec<TransactionParams>>,
}

impl RecordingFactory {
    pub fn returning(id: TransactionId) -> Arc<Self> {
        Arc::new(Self {
            id,
            params: Mutex::default(),
        })
    }

    pub fn params(&self) -> Vec<TransactionParams> {
        self.params.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TransactionFactory for RecordingFactory {
    async fn submit(&self, _client: &Client, params: TransactionParams) -> Result<TransactionId> {
        self.params.lock().unwrap().push(params);
        Ok(self.id)
    }
}
