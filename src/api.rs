//! HTTP surface for the dashboard front-end. Every view of the original
//! page (metric cards, comment list, keyword explorer, pie chart, word
//! cloud, export) is a JSON or CSV endpoint here.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::aggregate::{round_to, SentimentCounts, SentimentPercentages, Slice};
use crate::batch::{AnalysisBatch, CommentRecord, KeywordMatch};
use crate::config::DashboardConfig;
use crate::export::{EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
use crate::ingest::DataSource;
use crate::keywords::{intensity, Intensity, KeywordCount};
use crate::pipeline;
use crate::sentiment::SentimentAnalyzer;
use crate::session::{PhaseKind, SessionError, SessionHandle};
use crate::wordcloud::{self, CloudWord};

/// Decimal places for polarity in list views.
const POLARITY_PLACES: i32 = 3;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub analyzer: SentimentAnalyzer,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            session: SessionHandle::new(),
            analyzer: SentimentAnalyzer::new(),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // JSON-wrapped uploads carry escaping overhead on top of the raw size
    let body_limit = state
        .config
        .ingest
        .max_upload_bytes
        .saturating_mul(2)
        .saturating_add(64 * 1024);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/analyze/upload", post(analyze_upload))
        .route("/reset", post(reset))
        .route("/new-analysis", post(reset))
        .route("/state", get(state_view))
        .route("/summary", get(summary))
        .route("/comments", get(comments))
        .route("/distribution", get(distribution))
        .route("/keywords", get(keywords))
        .route("/keywords/top", get(top_keywords))
        .route(
            "/keywords/select",
            post(select_keyword).delete(clear_keyword),
        )
        .route("/keywords/matches", get(keyword_matches))
        .route("/wordcloud", get(word_cloud))
        .route("/export.csv", get(export_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/* ----------------------------
Errors
---------------------------- */

#[derive(Debug)]
pub enum ApiError {
    Session(SessionError),
    BadRequest(String),
    TooLarge { limit: usize },
    Superseded,
    Internal(anyhow::Error),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Session(e @ SessionError::NotReady(_)) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Session(e @ SessionError::EmptyKeyword) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::TooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("upload exceeds {limit} bytes"),
            ),
            ApiError::Superseded => (
                StatusCode::CONFLICT,
                "analysis was reset or superseded before it finished".to_string(),
            ),
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiResult<T> = Result<T, ApiError>;

/* ----------------------------
Views
---------------------------- */

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub batch_id: String,
    pub source: DataSource,
    pub created_at: DateTime<Utc>,
    pub total: usize,
    pub counts: SentimentCounts,
    pub percentages: SentimentPercentages,
    pub keywords: usize,
}

impl SummaryView {
    fn of(b: &AnalysisBatch) -> Self {
        let counts = b.counts();
        Self {
            batch_id: b.id().to_string(),
            source: b.source().clone(),
            created_at: b.created_at(),
            total: b.len(),
            counts,
            percentages: counts.percentages(),
            keywords: b.keywords().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub index: usize,
    pub comment: String,
    pub sentiment: &'static str,
    pub class: &'static str,
    pub polarity: f64,
}

impl From<CommentRecord<'_>> for CommentView {
    fn from(r: CommentRecord<'_>) -> Self {
        Self {
            index: r.index,
            comment: r.comment.to_string(),
            sentiment: r.sentiment.label.display(),
            class: r.sentiment.class(),
            polarity: round_to(r.sentiment.polarity, POLARITY_PLACES),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeywordView {
    pub word: String,
    pub count: usize,
    pub intensity: Intensity,
}

fn keyword_views(rows: &[KeywordCount]) -> Vec<KeywordView> {
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0);
    rows.iter()
        .map(|r| KeywordView {
            word: r.word.clone(),
            count: r.count,
            intensity: intensity(r.count, max),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    pub index: usize,
    pub comment: String,
    pub highlighted: String,
    pub sentiment: &'static str,
    pub class: &'static str,
    pub polarity: f64,
}

impl From<KeywordMatch> for MatchView {
    fn from(m: KeywordMatch) -> Self {
        Self {
            index: m.index,
            comment: m.comment,
            highlighted: m.highlighted,
            sentiment: m.sentiment.label.display(),
            class: m.sentiment.class(),
            polarity: round_to(m.sentiment.polarity, POLARITY_PLACES),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchesView {
    pub keyword: String,
    pub in_table: bool,
    pub matches: Vec<MatchView>,
}

#[derive(Debug, Serialize)]
pub struct StateView {
    pub phase: PhaseKind,
    pub batch_id: Option<String>,
    pub source: Option<DataSource>,
    pub comments: Option<usize>,
    pub selected_keyword: Option<String>,
}

/* ----------------------------
Analysis lifecycle
---------------------------- */

#[derive(Debug, Default, Deserialize)]
struct AnalyzeReq {
    #[serde(default)]
    filename: Option<String>,
    /// Raw file content; absent means "use the sample corpus".
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    filename: Option<String>,
}

/// An empty body analyzes the sample corpus.
async fn analyze(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<SummaryView>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        AnalyzeReq::default()
    } else {
        serde_json::from_slice::<AnalyzeReq>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid analyze request: {e}")))?
    };
    run_analysis(state, req.filename, req.content.map(String::into_bytes)).await
}

async fn analyze_upload(
    State(state): State<AppState>,
    Query(q): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<SummaryView>> {
    run_analysis(state, q.filename, Some(body.to_vec())).await
}

async fn run_analysis(
    state: AppState,
    filename: Option<String>,
    content: Option<Vec<u8>>,
) -> ApiResult<Json<SummaryView>> {
    let limit = state.config.ingest.max_upload_bytes;
    if content.as_ref().is_some_and(|c| c.len() > limit) {
        return Err(ApiError::TooLarge { limit });
    }

    let source = DataSource::from_request(filename.as_deref(), content.is_some());
    let ticket = state.session.write().begin(source.clone());

    let analyzer = state.analyzer.clone();
    let joined = tokio::task::spawn_blocking(move || {
        pipeline::run(source, content.as_deref(), &analyzer)
    })
    .await;

    let batch = match joined {
        Ok(b) => b,
        Err(e) => {
            state.session.write().abandon(ticket);
            return Err(ApiError::Internal(anyhow::anyhow!("analysis task failed: {e}")));
        }
    };

    let view = SummaryView::of(&batch);
    if !state.session.write().complete(ticket, batch) {
        warn!(batch = %view.batch_id, "analysis finished after reset; discarded");
        return Err(ApiError::Superseded);
    }
    Ok(Json(view))
}

async fn reset(State(state): State<AppState>) -> Json<StateView> {
    let mut s = state.session.write();
    s.reset();
    Json(StateView {
        phase: s.phase(),
        batch_id: None,
        source: None,
        comments: None,
        selected_keyword: None,
    })
}

async fn state_view(State(state): State<AppState>) -> Json<StateView> {
    let s = state.session.read();
    let batch = s.batch().ok();
    Json(StateView {
        phase: s.phase(),
        batch_id: batch.as_ref().map(|b| b.id().to_string()),
        source: batch
            .as_ref()
            .map(|b| b.source().clone())
            .or_else(|| s.processing_source().cloned()),
        comments: batch.as_ref().map(|b| b.len()),
        selected_keyword: s.selected_keyword().map(str::to_string),
    })
}

fn ready_batch(state: &AppState) -> ApiResult<Arc<AnalysisBatch>> {
    Ok(state.session.read().batch()?)
}

/* ----------------------------
Read views
---------------------------- */

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

async fn summary(State(state): State<AppState>) -> ApiResult<Json<SummaryView>> {
    let b = ready_batch(&state)?;
    Ok(Json(SummaryView::of(&b)))
}

async fn comments(
    State(state): State<AppState>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let b = ready_batch(&state)?;
    let limit = q.limit.unwrap_or(state.config.display.recent_comments);
    Ok(Json(b.recent(limit).into_iter().map(CommentView::from).collect()))
}

async fn distribution(State(state): State<AppState>) -> ApiResult<Json<Vec<Slice>>> {
    let b = ready_batch(&state)?;
    Ok(Json(b.counts().distribution()))
}

async fn keywords(
    State(state): State<AppState>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Vec<KeywordView>>> {
    let b = ready_batch(&state)?;
    let limit = q.limit.unwrap_or(state.config.display.keyword_list);
    Ok(Json(keyword_views(b.keywords().top(limit))))
}

async fn top_keywords(
    State(state): State<AppState>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Vec<KeywordView>>> {
    let b = ready_batch(&state)?;
    let limit = q.limit.unwrap_or(state.config.display.top_keywords);
    Ok(Json(keyword_views(b.keywords().top(limit))))
}

async fn word_cloud(State(state): State<AppState>) -> ApiResult<Json<Vec<CloudWord>>> {
    let b = ready_batch(&state)?;
    Ok(Json(wordcloud::layout(b.keywords(), &state.config.wordcloud)))
}

/* ----------------------------
Keyword explorer
---------------------------- */

#[derive(Debug, Deserialize)]
struct SelectReq {
    word: String,
}

#[derive(Debug, Deserialize)]
struct MatchesQuery {
    word: Option<String>,
}

async fn select_keyword(
    State(state): State<AppState>,
    Json(req): Json<SelectReq>,
) -> ApiResult<Json<MatchesView>> {
    let (word, batch) = {
        let mut s = state.session.write();
        let word = s.select_keyword(&req.word)?.to_string();
        (word, s.batch()?)
    };
    Ok(Json(matches_view(&batch, word)))
}

async fn clear_keyword(State(state): State<AppState>) -> StatusCode {
    state.session.write().clear_keyword();
    StatusCode::NO_CONTENT
}

async fn keyword_matches(
    State(state): State<AppState>,
    Query(q): Query<MatchesQuery>,
) -> ApiResult<Json<MatchesView>> {
    let (word, batch) = {
        let s = state.session.read();
        let batch = s.batch()?;
        let word = q
            .word
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .or_else(|| s.selected_keyword().map(str::to_string));
        (word, batch)
    };
    let word = word.ok_or_else(|| {
        ApiError::BadRequest("no keyword selected; pass ?word= or select one".to_string())
    })?;
    Ok(Json(matches_view(&batch, word)))
}

fn matches_view(batch: &AnalysisBatch, word: String) -> MatchesView {
    MatchesView {
        in_table: batch.keywords().contains(&word),
        matches: batch.matches(&word).into_iter().map(MatchView::from).collect(),
        keyword: word,
    }
}

/* ----------------------------
Export
---------------------------- */

async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let b = ready_batch(&state)?;
    let csv = b.to_csv().map_err(ApiError::Internal)?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
