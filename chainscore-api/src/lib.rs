use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chainscore_session::{run_query, Evaluator, ScoreSession};
use chainscore_types::{ActiveView, ScoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub mod page;

pub use page::{BaseScoreView, PageModel, ViewBody};

/// Asset symbol used by the combined view when the client does not pick one.
pub const DEFAULT_ASSET: &str = "ETH";

type SharedSession = Arc<RwLock<ScoreSession>>;

/// Server-wide state. Every session is isolated behind its own lock; there
/// is no global query state.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<u64, SharedSession>>>,
    next_id: Arc<AtomicU64>,
    evaluator: Arc<dyn Evaluator>,
    eval_timeout: Duration,
}

impl AppState {
    pub fn new(evaluator: Arc<dyn Evaluator>, eval_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            evaluator,
            eval_timeout,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn session_not_found(id: u64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("unknown session: {id}"),
        }
    }
}

impl From<ScoreError> for ApiError {
    fn from(e: ScoreError) -> Self {
        let status = match e {
            ScoreError::EmptyInput | ScoreError::MalformedIdentity => StatusCode::BAD_REQUEST,
            ScoreError::NoResultAvailable => StatusCode::CONFLICT,
            ScoreError::ScoringUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ScoreError::IncompleteFactorSet { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct OpenSessionRequest {
    /// Wallet address prefilled from a connected session, if any. Treated
    /// exactly like a user submission.
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct OpenSessionResponse {
    pub session_id: u64,
    pub page: PageModel,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub address: String,
}

#[derive(Deserialize)]
pub struct SelectViewRequest {
    pub view: ActiveView,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub asset: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/session", post(open_session))
        .route("/session/:id/submit", post(submit))
        .route("/session/:id/view", post(select_view))
        .route("/session/:id/reset", post(reset))
        .route("/session/:id/page", get(get_page))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> &'static str {
    "ChainScore API v0.1"
}

async fn session_by_id(state: &AppState, id: u64) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::session_not_found(id))
}

async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<OpenSessionResponse>, ApiError> {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let session: SharedSession = Arc::new(RwLock::new(ScoreSession::new()));
    state.sessions.write().await.insert(id, session.clone());
    info!(session = id, "session opened");

    if let Some(address) = req.address {
        // A bad prefill lands the session in Failed; the page carries the
        // message, so opening still succeeds.
        if let Err(e) = run_query(
            session.clone(),
            state.evaluator.clone(),
            state.eval_timeout,
            &address,
        )
        .await
        {
            warn!(session = id, error = %e, "prefilled address rejected");
        }
    }

    let page = page::render(&*session.read().await, DEFAULT_ASSET).await;
    Ok(Json(OpenSessionResponse {
        session_id: id,
        page,
    }))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<PageModel>, ApiError> {
    let session = session_by_id(&state, id).await?;
    run_query(
        session.clone(),
        state.evaluator.clone(),
        state.eval_timeout,
        &req.address,
    )
    .await?;
    let page = page::render(&*session.read().await, DEFAULT_ASSET).await;
    Ok(Json(page))
}

async fn select_view(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SelectViewRequest>,
) -> Result<Json<PageModel>, ApiError> {
    let session = session_by_id(&state, id).await?;
    session.write().await.select_view(req.view)?;
    let page = page::render(&*session.read().await, DEFAULT_ASSET).await;
    Ok(Json(page))
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PageModel>, ApiError> {
    let session = session_by_id(&state, id).await?;
    session.write().await.reset();
    let page = page::render(&*session.read().await, DEFAULT_ASSET).await;
    Ok(Json(page))
}

async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageModel>, ApiError> {
    let session = session_by_id(&state, id).await?;
    let asset = query.asset.as_deref().unwrap_or(DEFAULT_ASSET);
    let page = page::render(&*session.read().await, asset).await;
    Ok(Json(page))
}
