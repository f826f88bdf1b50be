use crate::catalog::{Catalog, ElementRecord};
use crate::fact::{Fact, FactError, FactGenerator, FactRequest};
use crate::favorites::{FavoritesSet, FavoritesStore};
use crate::i18n::{Dictionary, LocaleResolver, Translations};
use crate::language::{Language, LanguageError};
use crate::query::{self, parse_element_param, PhaseFilter, PhaseFilterError, QueryState};
use crate::view::{ElementDetail, Layout, SharePayload};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/public/index.html"));

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub translations: Arc<Translations>,
    pub favorites: Arc<FavoritesStore>,
    pub facts: Arc<dyn FactGenerator>,
    pub public_url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/languages", get(languages))
        .route("/api/i18n", get(dictionary))
        .route("/api/elements", get(list_elements))
        .route("/api/elements/:number", get(element_detail))
        .route("/api/elements/:number/share", get(share))
        .route("/api/elements/:number/fact", post(fact))
        .route("/api/favorites", get(favorites).delete(clear_favorites))
        .route("/api/favorites/:number/toggle", post(toggle_favorite))
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Language(#[from] LanguageError),
    #[error(transparent)]
    Phase(#[from] PhaseFilterError),
    #[error("no element with atomic number {0}")]
    NotFound(u32),
    #[error(transparent)]
    Fact(#[from] FactError),
    #[error("background task failed: {0}")]
    Task(String),
    #[error("{0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `axum::extract::Query` whose rejection is a JSON [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct Query<T>(T);

/// `axum::extract::Path` whose rejection is a JSON [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
struct Path<T>(T);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Language(_) | ApiError::Phase(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Fact(FactError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Fact(_) => StatusCode::BAD_GATEWAY,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Provider bodies stay in the log; clients only see the status.
        let error = match &self {
            ApiError::Fact(FactError::Provider { status, .. }) => {
                format!("fact provider returned {status}")
            }
            other => other.to_string(),
        };
        let body = ErrorBody { error };
        (status, Json(body)).into_response()
    }
}

impl AppState {
    fn element(&self, number: u32) -> Result<&ElementRecord, ApiError> {
        self.catalog.get(number).ok_or(ApiError::NotFound(number))
    }

    /// `lang` when given, else the first supported language the client reports.
    fn locale(&self, lang: Option<&str>, headers: &HeaderMap) -> Result<LocaleResolver, ApiError> {
        let language = match lang.filter(|l| !l.is_empty()) {
            Some(code) => code.parse()?,
            None => Language::detect(
                headers
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok()),
            ),
        };
        Ok(LocaleResolver::new(self.translations.clone(), language))
    }
}

#[derive(Deserialize)]
struct IndexQuery {
    element: Option<String>,
}

async fn index(State(state): State<AppState>, Query(q): Query<IndexQuery>) -> impl IntoResponse {
    let initial = q
        .element
        .as_deref()
        .and_then(parse_element_param)
        .filter(|n| state.catalog.contains(*n))
        .map_or_else(|| "null".to_string(), |n| n.to_string());
    Html(INDEX_HTML.replace("__INITIAL_ELEMENT__", &initial))
}

#[derive(Serialize)]
struct LanguageInfo {
    code: Language,
    name: &'static str,
}

async fn languages() -> impl IntoResponse {
    let list: Vec<LanguageInfo> = Language::ALL
        .into_iter()
        .map(|code| LanguageInfo {
            code,
            name: code.native_name(),
        })
        .collect();
    Json(list)
}

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

#[derive(Serialize)]
struct DictionaryResponse<'a> {
    language: Language,
    messages: Option<&'a Dictionary>,
}

async fn dictionary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<LangQuery>,
) -> Result<Response, ApiError> {
    let locale = state.locale(q.lang.as_deref(), &headers)?;
    let body = DictionaryResponse {
        language: locale.language(),
        messages: state.translations.dictionary(locale.language()),
    };
    Ok(Json(body).into_response())
}

#[derive(Deserialize)]
struct ElementsQuery {
    q: Option<String>,
    favorites: Option<bool>,
    phase: Option<String>,
    group: Option<bool>,
    lang: Option<String>,
}

#[derive(Serialize)]
struct ElementsResponse {
    language: Language,
    count: usize,
    #[serde(flatten)]
    layout: Layout,
}

async fn list_elements(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<ElementsQuery>,
) -> Result<Json<ElementsResponse>, ApiError> {
    let locale = state.locale(q.lang.as_deref(), &headers)?;
    let query = QueryState {
        text: q.q.unwrap_or_default(),
        favorites_only: q.favorites.unwrap_or(false),
        phase: match q.phase.as_deref() {
            Some(raw) => raw.parse()?,
            None => PhaseFilter::All,
        },
        group_by_category: q.group.unwrap_or(false),
    };
    let favorites = state.favorites.current();
    let result = query::resolve(&state.catalog, &query, locale.language(), &favorites);
    debug!(?query, language = %locale.language(), matched = result.len(), "resolved element query");

    Ok(Json(ElementsResponse {
        language: locale.language(),
        count: result.len(),
        layout: Layout::new(&result, &locale, &favorites),
    }))
}

async fn element_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<u32>,
    Query(q): Query<LangQuery>,
) -> Result<Json<ElementDetail>, ApiError> {
    let locale = state.locale(q.lang.as_deref(), &headers)?;
    let element = state.element(number)?;
    let favorite = state.favorites.contains(number);
    Ok(Json(ElementDetail::new(element, &locale, favorite)))
}

async fn share(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<u32>,
    Query(q): Query<LangQuery>,
) -> Result<Json<SharePayload>, ApiError> {
    let locale = state.locale(q.lang.as_deref(), &headers)?;
    let element = state.element(number)?;
    Ok(Json(SharePayload::new(element, &locale, &state.public_url)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FactResponse {
    atomic_number: u32,
    language: Language,
    fact: String,
}

async fn fact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<u32>,
    Query(q): Query<LangQuery>,
) -> Result<Json<FactResponse>, ApiError> {
    let locale = state.locale(q.lang.as_deref(), &headers)?;
    let element = state.element(number)?;
    let request = FactRequest {
        element_name: locale.localize(&element.name).to_string(),
        element_symbol: element.symbol.clone(),
        element_summary: locale.localize(&element.summary).to_string(),
        language: locale.language(),
    };
    let Fact { fact } = state.facts.generate_fact(&request).await.map_err(|e| {
        match &e {
            FactError::Provider { status, body } => {
                error!(atomic_number = number, status, body = %body, "fact provider rejected request")
            }
            other => error!(atomic_number = number, error = %other, "fact generation failed"),
        }
        e
    })?;
    Ok(Json(FactResponse {
        atomic_number: number,
        language: locale.language(),
        fact,
    }))
}

#[derive(Serialize)]
struct FavoritesResponse {
    favorites: FavoritesSet,
}

async fn favorites(State(state): State<AppState>) -> Json<FavoritesResponse> {
    Json(FavoritesResponse {
        favorites: state.favorites.current(),
    })
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    state.element(number)?;
    let store = state.favorites.clone();
    let favorites = tokio::task::spawn_blocking(move || store.toggle(number))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?;
    Ok(Json(FavoritesResponse { favorites }))
}

async fn clear_favorites(State(state): State<AppState>) -> Result<Json<FavoritesResponse>, ApiError> {
    let store = state.favorites.clone();
    let favorites = tokio::task::spawn_blocking(move || store.clear())
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?;
    Ok(Json(FavoritesResponse { favorites }))
}
