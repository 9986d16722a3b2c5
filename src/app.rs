//! HTTP surface: the landing page, the episode player and the sales dashboard.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::{
    Form,
    cookie::{Cookie, CookieJar},
};
use handlebars::{Handlebars, TemplateError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::ServerSettings;
use crate::dashboard::DashboardView;
use crate::downloader;
use crate::error::{ExportError, GraphError, LoadError, PageError, VideoError};
use crate::filter::FilterSelection;
use crate::graph::{hourly_sales_chart, product_sales_chart};
use crate::loader::load_sales;
use crate::presenter;
use crate::session::{SESSION_COOKIE, SessionState, SessionStore};
use crate::templates;
use crate::video::VideoCatalog;

/// Shared state handed to every handler.
pub struct AppState {
    pub settings: ServerSettings,
    pub catalog: VideoCatalog,
    pub sessions: SessionStore,
    pub templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(settings: ServerSettings, catalog: VideoCatalog) -> Result<Self, TemplateError> {
        let sessions = SessionStore::new(Duration::from_secs(settings.session_ttl_secs));
        Ok(Self {
            settings,
            catalog,
            sessions,
            templates: templates::registry()?,
        })
    }
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    /// The sales spreadsheet could not be loaded
    Load(LoadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Load(e) => {
                let mut body = ApiError::new("LOAD_ERROR", e.to_string());
                if let LoadError::MissingFile { listing, .. } = &e {
                    body = body.with_details(listing.join(", "));
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::Load(err)
    }
}

impl From<VideoError> for AppError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::OutOfRange { .. } => AppError::BadRequest(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Dashboard filter form; a multi-select with nothing chosen sends no field.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub city: Vec<String>,
    #[serde(default)]
    pub customer_type: Vec<String>,
    #[serde(default)]
    pub gender: Vec<String>,
}

impl From<FilterForm> for FilterSelection {
    fn from(form: FilterForm) -> Self {
        FilterSelection::new(form.city, form.customer_type, form.gender)
    }
}

/// Build the application router
///
/// # Arguments
/// * `state` - Shared state with settings, catalog, sessions and templates
///
/// # Returns
/// * `Router` - Router with every page, download and API route plus `/static`
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = state.settings.static_dir.clone();

    Router::new()
        .route("/", get(serve_landing))
        .route("/player", get(serve_player))
        .route("/player/select/:index", post(select_episode))
        .route("/dashboard", get(serve_dashboard))
        .route("/dashboard/filter", post(update_filter))
        .route("/dashboard/reset", post(reset_filter))
        .route("/dashboard/charts/:kind", get(download_chart))
        .route("/dashboard/export/:format", get(export_rows))
        .route("/api/dashboard", get(dashboard_summary))
        .route("/api/videos", get(video_catalog))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Start the web server
///
/// Loads the video catalog, checks the sales file once so a bad path shows up
/// in the log at startup, then serves until the process stops.
pub async fn run(settings: ServerSettings) -> anyhow::Result<()> {
    let catalog = VideoCatalog::from_json_file(&settings.videos_file).map_err(|e| {
        anyhow::anyhow!(
            "cannot load video catalog {}: {}",
            settings.videos_file.display(),
            e
        )
    })?;
    info!("loaded {} episodes of {}", catalog.len(), catalog.title);

    if let Err(e) = load_sales(&settings.source.load_options()) {
        warn!("sales data is not loadable yet: {}", e);
    }

    let addr = settings.addr.clone();
    let state = Arc::new(AppState::new(settings, catalog)?);
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Returns the caller's live session id, starting a new session when the
/// cookie is missing, unknown or expired.
fn session(state: &AppState, jar: CookieJar) -> (CookieJar, String) {
    let existing = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| state.sessions.is_valid(id));
    if let Some(id) = existing {
        return (jar, id);
    }

    let id = state.sessions.create();
    let max_age = i64::try_from(state.sessions.ttl().as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(max_age))
        .build();
    (jar.add(cookie), id)
}

fn session_state(state: &AppState, id: &str) -> SessionState {
    state.sessions.get(id).unwrap_or_default()
}

/// State of the caller's session without starting one; downloads never set a cookie.
fn existing_session_state(state: &AppState, jar: &CookieJar) -> SessionState {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()))
        .unwrap_or_default()
}

/// One full dashboard run. The spreadsheet is read on every call.
async fn build_view(
    state: &Arc<AppState>,
    selection: Option<FilterSelection>,
) -> Result<DashboardView, AppError> {
    let options = state.settings.source.load_options();
    let table = tokio::task::spawn_blocking(move || load_sales(&options))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(DashboardView::build(&table, selection.as_ref()))
}

async fn serve_landing(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    Ok(Html(presenter::landing_page(&state.templates, &state.catalog)?))
}

async fn serve_player(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, id) = session(&state, jar);
    let current = session_state(&state, &id);
    let page = presenter::player_page(&state.templates, &state.catalog, &current.player)?;
    Ok((jar, Html(page)))
}

/// Switch the session's episode
///
/// # Arguments
/// * `index` - Zero-based position in the catalog
///
/// # Returns
/// * `303 See Other` to `/player`, or `400` when `index` is out of range
async fn select_episode(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(index): Path<usize>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (jar, id) = session(&state, jar);
    state
        .sessions
        .update(&id, |session| session.player.select(index, &state.catalog))
        .ok_or_else(|| AppError::Internal("session vanished".to_string()))??;
    Ok((jar, Redirect::to("/player")))
}

async fn serve_dashboard(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, id) = session(&state, jar);
    let selection = session_state(&state, &id).filter;

    let page = match build_view(&state, selection).await {
        Ok(view) => presenter::dashboard_page(&state.templates, &view).map(|page| (StatusCode::OK, page)),
        Err(AppError::Load(e)) => {
            error!("failed to load sales data: {}", e);
            presenter::load_error_page(&state.templates, &e)
                .map(|page| (StatusCode::INTERNAL_SERVER_ERROR, page))
        }
        Err(e) => return e.into_response(),
    };

    match page {
        Ok((status, page)) => (status, jar, Html(page)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

async fn update_filter(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FilterForm>,
) -> (CookieJar, Redirect) {
    let (jar, id) = session(&state, jar);
    let selection = FilterSelection::from(form);
    state
        .sessions
        .update(&id, move |session| session.filter = Some(selection));
    (jar, Redirect::to("/dashboard"))
}

async fn reset_filter(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, id) = session(&state, jar);
    state.sessions.update(&id, |session| session.filter = None);
    (jar, Redirect::to("/dashboard"))
}

fn attachment(content_type: &'static str, filename: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

async fn download_chart(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(kind): Path<String>,
) -> Result<Response, AppError> {
    let selection = existing_session_state(&state, &jar).filter;
    let view = build_view(&state, selection).await?;

    let svg = match kind.as_str() {
        "product" => product_sales_chart(&view.product_sales)?,
        "hour" => hourly_sales_chart(&view.hourly_sales)?,
        other => return Err(AppError::NotFound(format!("no chart named {}", other))),
    };
    Ok(attachment("image/svg+xml", &format!("{}_sales.svg", kind), svg))
}

async fn export_rows(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(format): Path<String>,
) -> Result<Response, AppError> {
    let selection = existing_session_state(&state, &jar).filter;
    let view = build_view(&state, selection).await?;

    match format.as_str() {
        "csv" => {
            let csv = downloader::to_csv(&view.filtered)?;
            Ok(attachment("text/csv; charset=utf-8", "sales.csv", csv))
        }
        "xlsx" => {
            let bytes = downloader::to_xlsx(&view.filtered)?;
            Ok(attachment(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "sales.xlsx",
                bytes,
            ))
        }
        other => Err(AppError::NotFound(format!("unsupported export format {}", other))),
    }
}

async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, id) = session(&state, jar);
    let view = build_view(&state, session_state(&state, &id).filter).await?;
    Ok((jar, Json(view.summary())).into_response())
}

async fn video_catalog(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, id) = session(&state, jar);
    let current = session_state(&state, &id).player.index();
    (
        jar,
        Json(serde_json::json!({
            "catalog": state.catalog,
            "current": current,
        })),
    )
        .into_response()
}
