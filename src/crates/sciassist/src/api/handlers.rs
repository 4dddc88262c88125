//! Form and JSON endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    Json,
};

use crate::api::{
    error::ApiResult,
    models::{
        DebugRequest, DebugResponse, HealthResponse, QueryRequest, QueryResponse,
        VisualizeRequest, VisualizeResponse,
    },
    response,
    routes::AppState,
};

const FORM_PAGE: &str = include_str!("form.html");

/// GET /
pub async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    response::ok(HealthResponse::new("ok", state.dispatcher.can_deploy()))
}

/// Route a query to code generation or lookup
///
/// POST /api/v1/query
pub async fn query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    let outcome = state.dispatcher.dispatch(&req.query).await?;
    tracing::info!("Answered query via {}", outcome.route);
    Ok(response::ok(QueryResponse {
        route: outcome.route,
        text: outcome.text,
    }))
}

/// POST /api/v1/debug
pub async fn debug(
    State(state): State<AppState>,
    body: Result<Json<DebugRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    let code = state.dispatcher.debug(&req.code).await?;
    Ok(response::ok(DebugResponse {
        code: code.into_string(),
    }))
}

/// POST /api/v1/visualize
pub async fn visualize(
    State(state): State<AppState>,
    body: Result<Json<VisualizeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    Ok(response::ok(VisualizeResponse {
        text: state.dispatcher.visualize(&req.data),
    }))
}
