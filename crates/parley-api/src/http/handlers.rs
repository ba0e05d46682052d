//! Envelope dispatch handler.
//!
//! One POST endpoint carries all three routes. Gating order matches the
//! contract: origin allow-list first, then schema validation into a typed
//! request, then the owner allow-list (skipped for trusted origins), then
//! dispatch into the session service.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::http::extractors::origin::RequestOrigin;
use crate::http::request::{Envelope, RouteRequest};
use crate::http::response::ApiError;
use crate::state::AppState;

/// POST / - validate, gate, and dispatch a routed envelope.
pub async fn dispatch(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    body: Result<Json<Envelope>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let origin = origin.unwrap_or_default();
    if !state.config.access.origin_allowed(&origin) {
        warn!(%origin, "origin not allowed");
        return Err(ApiError::OriginNotAllowed);
    }

    // A body that never parses still has to come back as `{error}`.
    let Json(envelope) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let request = RouteRequest::parse(envelope)?;

    if !state.config.access.origin_trusted(&origin)
        && !state.config.access.owner_allowed(request.owner_id())
    {
        warn!(owner_id = request.owner_id(), "owner not allowed");
        return Err(ApiError::OwnerNotAllowed);
    }

    let request_id = Uuid::now_v7();
    info!(%request_id, route = request.route_name(), "dispatching request");

    let result = match request {
        RouteRequest::Initialize(p) => {
            let view = state
                .session_service
                .initialize_or_fetch(&p.session_id, &p.owner_id, &p.seeds)
                .await?;
            to_json(&view)?
        }
        RouteRequest::Chat(p) => {
            let reply = state
                .session_service
                .append_and_respond(&p.session_id, &p.owner_id, &p.message)
                .await?;
            to_json(&reply)?
        }
        RouteRequest::History(p) => {
            let record = state
                .session_service
                .fetch_history(&p.session_id, &p.owner_id)
                .await?;
            to_json(&record)?
        }
    };

    Ok(Json(result))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(format!("serialization: {e}")))
}
