use axum::{
    extract::{FromRequest, Request, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Extension, Form, Json,
};

use super::{ApiError, AppState};
use crate::middleware::RequestId;
use crate::render::leads_page;
use crate::search::SearchForm;

pub(super) async fn index(State(state): State<AppState>) -> Html<String> {
    let leads = state.store.load_or_empty().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read saved leads");
        Vec::new()
    });
    leads_page(&leads, None)
}

/// Always renders a page; a body that cannot be decoded searches for
/// nothing and shows the saved leads.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    req: Request,
) -> Html<String> {
    tracing::info!(request_id = %req_id.0, "search requested");
    let form = decode_search_form(req).await.unwrap_or_default();
    let outcome = state.orchestrator.run_form(&form).await;
    leads_page(outcome.leads(), Some(&outcome.notice()))
}

/// JSON for `application/json`, URL-encoded form for anything else.
async fn decode_search_form(req: Request) -> Option<SearchForm> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));

    let decoded = if is_json {
        Json::<SearchForm>::from_request(req, &())
            .await
            .map(|Json(form)| form)
            .map_err(|e| e.body_text())
    } else {
        Form::<SearchForm>::from_request(req, &())
            .await
            .map(|Form(form)| form)
            .map_err(|e| e.body_text())
    };

    decoded
        .map_err(|reason| tracing::warn!(%reason, "could not decode search body"))
        .ok()
}

pub(super) async fn clear(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.store.clear().await?;
    Ok(Redirect::to("/"))
}
