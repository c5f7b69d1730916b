//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use crime_dashboard_aggregator::{
    RecentWindow, annotate, count_incidents, raw_counts, recent_incidents,
};
use crime_dashboard_server_models::{
    ApiHealth, CHAT_EMPTY_MESSAGE_REPLY, ChatReply, ChatRequest, WindowQueryParams,
};

use crate::{AppState, features};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/neighborhoods`
///
/// Returns the boundary `FeatureCollection` with `name` and `crime_count`
/// on every feature. Counts are recomputed per request so a windowed
/// result always reflects the current time.
pub async fn neighborhoods(
    state: web::Data<AppState>,
    params: web::Query<WindowQueryParams>,
) -> HttpResponse {
    let window = resolve_window(params.window_days, state.neighborhood_window);
    let counts = count_incidents(&state.data.incidents, window, Utc::now());
    let annotated = annotate(&state.data.boundaries, &counts);

    log::debug!(
        "neighborhoods: {} regions, {} incidents counted (window: {window:?})",
        annotated.len(),
        counts.total()
    );

    HttpResponse::Ok().json(annotated.to_feature_collection())
}

/// `GET /api/hospitals`
///
/// Returns hospital point features with simulated `occupancy`.
pub async fn hospitals(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(features::hospital_collection(
        &state.data.hospitals,
        state.generator.as_ref(),
    ))
}

/// `GET /api/hotspots`
///
/// Returns recent incidents that have coordinates as point features with
/// simulated `intensity`.
pub async fn hotspots(
    state: web::Data<AppState>,
    params: web::Query<WindowQueryParams>,
) -> HttpResponse {
    let window = resolve_window(params.window_days, Some(state.hotspot_window));
    let recent = recent_incidents(&state.data.incidents, window, Utc::now());
    HttpResponse::Ok().json(features::hotspot_collection(
        recent,
        state.generator.as_ref(),
    ))
}

/// `POST /api/chat`
///
/// Forwards the message to the configured LLM. Any upstream failure is
/// logged and answered with a generic reply and a 500 status.
pub async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> HttpResponse {
    let message = body.message.trim();
    if message.is_empty() {
        return HttpResponse::BadRequest().json(ChatReply {
            reply: CHAT_EMPTY_MESSAGE_REPLY.to_string(),
        });
    }

    let Some(provider) = state.chat.as_ref() else {
        log::error!("Chat request received but no chat provider is configured");
        return HttpResponse::InternalServerError().json(ChatReply::failure());
    };

    match provider.reply(message).await {
        Ok(reply) => HttpResponse::Ok().json(ChatReply { reply }),
        Err(e) => {
            log::error!("Chat provider failed: {e}");
            HttpResponse::InternalServerError().json(ChatReply::failure())
        }
    }
}

/// `GET /api/debug_counts`
///
/// Raw neighborhood name to incident count, without normalization.
pub async fn debug_counts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(raw_counts(&state.data.incidents))
}

/// An explicit `windowDays` wins over the server default; `0` means all
/// time.
fn resolve_window(
    requested: Option<u32>,
    default: Option<RecentWindow>,
) -> Option<RecentWindow> {
    match requested {
        Some(0) => None,
        Some(days) => Some(RecentWindow::days(days)),
        None => default,
    }
}
