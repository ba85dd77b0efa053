//! An in-process stand-in for the record store, served on an ephemeral
//! localhost port so the real HTTP client can be exercised end to end.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{
    record_store::RecordStoreClient,
    transaction::{Transaction, TransactionId, TransactionPayload},
};

pub(crate) const FAKE_USERNAME: &str = "alice";
pub(crate) const FAKE_PASSWORD: &str = "correct horse battery";
pub(crate) const VALID_RESET_TOKEN: &str = "valid-reset-token";

const SESSION_COOKIE: &str = "SESSION";

struct FakeState {
    transactions: Mutex<Vec<Transaction>>,
    next_id: AtomicI64,
    users: Mutex<HashMap<String, String>>,
    sessions: Mutex<HashSet<String>>,
    session_counter: AtomicUsize,
    request_count: AtomicUsize,
    next_response: Mutex<Option<(StatusCode, Value)>>,
    last_json_body: Mutex<Option<Value>>,
}

pub(crate) struct FakeRecordStore {
    base_url: String,
    state: Arc<FakeState>,
}

impl FakeRecordStore {
    pub(crate) async fn start() -> Self {
        Self::with_transactions(Vec::new()).await
    }

    pub(crate) async fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let state = Arc::new(FakeState {
            transactions: Mutex::new(transactions),
            next_id: AtomicI64::new(next_id),
            users: Mutex::new(HashMap::from([(
                FAKE_USERNAME.to_owned(),
                FAKE_PASSWORD.to_owned(),
            )])),
            sessions: Mutex::new(HashSet::new()),
            session_counter: AtomicUsize::new(0),
            request_count: AtomicUsize::new(0),
            next_response: Mutex::new(None),
            last_json_body: Mutex::new(None),
        });

        let api = Router::new()
            .route("/auth/login", post(log_in))
            .route("/auth/logout", post(log_out))
            .route("/auth/status", get(status))
            .route("/auth/register", post(register))
            .route("/auth/forgot-password", post(forgot_password))
            .route("/auth/reset-password", post(reset_password))
            .route("/transactions", get(list).post(create))
            .route(
                "/transactions/{id}",
                get(get_one).put(update).delete(delete_one),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                count_and_override,
            ));
        let router = Router::new().nest("/api", api).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake record store");
        let address = listener.local_addr().expect("Could not get local address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fake record store stopped");
        });

        Self {
            base_url: format!("http://{address}/api"),
            state,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client for this store that has already logged in.
    pub(crate) async fn logged_in_client(&self) -> RecordStoreClient {
        let client = RecordStoreClient::new(&self.base_url).expect("Could not create client");
        client
            .log_in(FAKE_USERNAME, FAKE_PASSWORD)
            .await
            .expect("Could not log in to fake record store");

        client
    }

    pub(crate) fn transactions(&self) -> Vec<Transaction> {
        self.state.transactions.lock().unwrap().clone()
    }

    /// The number of requests received so far, including rejected ones.
    pub(crate) fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Answer the next request with `status` and `body` regardless of route.
    pub(crate) fn respond_next_with(&self, status: StatusCode, body: Value) {
        *self.state.next_response.lock().unwrap() = Some((status, body));
    }

    /// The JSON body of the most recent auth request that carried one.
    pub(crate) fn last_json_body(&self) -> Option<Value> {
        self.state.last_json_body.lock().unwrap().clone()
    }
}

/// A base URL that refuses connections.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind");
    let address = listener.local_addr().expect("Could not get local address");
    drop(listener);

    format!("http://{address}/api")
}

async fn count_and_override(
    State(state): State<Arc<FakeState>>,
    request: Request,
    next: Next,
) -> Response {
    state.request_count.fetch_add(1, Ordering::SeqCst);

    let override_response = state.next_response.lock().unwrap().take();
    if let Some((status, body)) = override_response {
        return (status, Json(body)).into_response();
    }

    next.run(request).await
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_owned())
}

fn has_session(state: &FakeState, headers: &HeaderMap) -> bool {
    session_token(headers)
        .is_some_and(|token| state.sessions.lock().unwrap().contains(&token))
}

#[derive(Deserialize)]
struct LogInForm {
    username: String,
    password: String,
}

async fn log_in(State(state): State<Arc<FakeState>>, Form(form): Form<LogInForm>) -> Response {
    let accepted = state.users.lock().unwrap().get(&form.username) == Some(&form.password);
    if !accepted {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let token = format!(
        "session-{}",
        state.session_counter.fetch_add(1, Ordering::SeqCst)
    );
    state.sessions.lock().unwrap().insert(token.clone());

    (
        [(SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"))],
        Json(json!({"username": form.username})),
    )
        .into_response()
}

async fn log_out(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.lock().unwrap().remove(&token);
    }

    (
        [(SET_COOKIE, format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"))],
        StatusCode::OK,
    )
        .into_response()
}

async fn status(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> StatusCode {
    if has_session(&state, &headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn register(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    *state.last_json_body.lock().unwrap() = Some(body.clone());

    let username = body["username"].as_str().unwrap_or_default().to_owned();
    let password = body["password"].as_str().unwrap_or_default().to_owned();
    let mut users = state.users.lock().unwrap();

    if users.contains_key(&username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": "already exists"})),
        )
            .into_response();
    }

    users.insert(username, password);
    StatusCode::CREATED.into_response()
}

async fn forgot_password(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> StatusCode {
    *state.last_json_body.lock().unwrap() = Some(body);
    StatusCode::OK
}

async fn reset_password(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    *state.last_json_body.lock().unwrap() = Some(body.clone());

    if body["token"].as_str() == Some(VALID_RESET_TOKEN) {
        StatusCode::OK.into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"token": "invalid or expired"})),
        )
            .into_response()
    }
}

async fn list(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if !has_session(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(state.transactions.lock().unwrap().clone()).into_response()
}

async fn get_one(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<TransactionId>,
    headers: HeaderMap,
) -> Response {
    if !has_session(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let transactions = state.transactions.lock().unwrap();
    match transactions.iter().find(|t| t.id == id) {
        Some(transaction) => Json(transaction.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(payload): Json<TransactionPayload>,
) -> Response {
    if !has_session(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let transaction = payload.into_transaction(id);
    state.transactions.lock().unwrap().push(transaction.clone());

    (StatusCode::CREATED, Json(transaction)).into_response()
}

async fn update(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<TransactionId>,
    headers: HeaderMap,
    Json(payload): Json<TransactionPayload>,
) -> Response {
    if !has_session(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut transactions = state.transactions.lock().unwrap();
    match transactions.iter_mut().find(|t| t.id == id) {
        Some(transaction) => {
            *transaction = payload.into_transaction(id);
            Json(transaction.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_one(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<TransactionId>,
    headers: HeaderMap,
) -> StatusCode {
    if !has_session(&state, &headers) {
        return StatusCode::UNAUTHORIZED;
    }

    let mut transactions = state.transactions.lock().unwrap();
    let count_before = transactions.len();
    transactions.retain(|t| t.id != id);

    if transactions.len() < count_before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
