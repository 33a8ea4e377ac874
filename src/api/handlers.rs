use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures::future::{try_join, try_join3};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::api::error::ApiError;
use crate::api::models::{
    EventsQuery, HealthStatus, HubDetailResponse, MachineDetailResponse, SessionResponse, SortQuery,
};
use crate::api::AppState;
use crate::auth::{check_token, decode_claims, extract_token, Session, TOKEN_COOKIE};
use crate::client::Credentials;
use crate::table_sort::sort_rows;

/// Resolves the caller's session: a well-formed unexpired token plus the
/// profile the backend returns for it.
async fn authenticate(request: &HttpRequest, state: &AppState) -> Result<Session, ApiError> {
    let token = extract_token(request).ok_or(ApiError::Unauthorized)?;
    check_token(&token).map_err(|e| {
        debug!("Rejected session token: {}", e);
        e
    })?;
    let user = state.client.profile(&token).await?;
    Ok(Session::new(token, user))
}

/// Demo accounts may look at everything and change nothing
fn require_writable(session: &Session) -> Result<(), ApiError> {
    if session.demo_mode().is_active() {
        warn!("Demo account {} attempted a write", session.user.id);
        return Err(ApiError::DemoReadOnly);
    }
    Ok(())
}

fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();
    if let Ok(claims) = decode_claims(token) {
        let remaining = claims.exp - Utc::now().timestamp();
        if remaining > 0 {
            cookie.set_max_age(time::Duration::seconds(remaining));
        }
    }
    cookie
}

#[instrument(skip(state, credentials), fields(email = %credentials.email))]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let result = state.client.login(&credentials).await?;
    info!("Operator {} logged in (demo: {})", result.user.id, result.user.is_demo());
    let cookie = session_cookie(&result.token, state.config.secure_cookies);
    Ok(HttpResponse::Ok().cookie(cookie).json(result))
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").http_only(true).finish();
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).json(json!({ "status": "ok" }))
}

#[instrument(skip(request, state))]
pub async fn session_info(request: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let expires_at = decode_claims(&session.token).ok().and_then(|c| c.expires_at());
    let is_demo = session.demo_mode().is_active();
    Ok(HttpResponse::Ok().json(SessionResponse {
        user: session.user,
        is_demo,
        expires_at,
    }))
}

#[instrument(skip(request, state))]
pub async fn list_stores(
    request: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SortQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let stores = state.client.stores(&session.token).await?;
    let mut stores = session.anonymizer().anonymize_stores(stores);
    if let Some(column) = query.sort.as_deref() {
        sort_rows(&mut stores, column, query.order.unwrap_or_default());
    }
    debug!("Returning {} stores", stores.len());
    Ok(HttpResponse::Ok().json(json!({ "stores": stores })))
}

#[instrument(skip(request, state))]
pub async fn list_hubs(
    request: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SortQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let hubs = state.client.hubs(&session.token).await?;
    let mut hubs = session.anonymizer().anonymize_hubs(hubs);
    if let Some(column) = query.sort.as_deref() {
        sort_rows(&mut hubs, column, query.order.unwrap_or_default());
    }
    debug!("Returning {} hubs", hubs.len());
    Ok(HttpResponse::Ok().json(json!({ "hubs": hubs })))
}

#[instrument(skip(request, state))]
pub async fn hub_detail(
    request: HttpRequest,
    state: web::Data<AppState>,
    hub_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let token = session.token.as_str();
    let (hub, machines, events) = try_join3(
        state.client.hub(token, &hub_id),
        state.client.hub_discovered_machines(token, &hub_id),
        state.client.hub_events(token, &hub_id, Some(state.config.event_limit)),
    )
    .await?;

    let anonymizer = session.anonymizer();
    Ok(HttpResponse::Ok().json(HubDetailResponse {
        hub: anonymizer.anonymize_hub(hub),
        discovered_machines: anonymizer.anonymize_machines(machines),
        events: anonymizer.anonymize_hub_events(events),
    }))
}

#[instrument(skip(request, state))]
pub async fn hub_events(
    request: HttpRequest,
    state: web::Data<AppState>,
    hub_id: web::Path<String>,
    query: web::Query<EventsQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let limit = query.limit.unwrap_or(state.config.event_limit);
    let events = state.client.hub_events(&session.token, &hub_id, Some(limit)).await?;
    let events = session.anonymizer().anonymize_hub_events(events);
    Ok(HttpResponse::Ok().json(json!({ "events": events })))
}

#[instrument(skip(request, state))]
pub async fn regenerate_hub_token(
    request: HttpRequest,
    state: web::Data<AppState>,
    hub_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    require_writable(&session)?;
    let result = state.client.regenerate_hub_token(&session.token, &hub_id).await?;
    info!("Hub token regenerated for {} by {}", hub_id, session.user.id);
    Ok(HttpResponse::Ok().json(result))
}

#[instrument(skip(request, state))]
pub async fn machine_detail(
    request: HttpRequest,
    state: web::Data<AppState>,
    machine_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let (machine, stats) = try_join(
        state.client.machine(&session.token, &machine_id),
        state.client.machine_stats(&session.token, &machine_id),
    )
    .await?;
    let anonymizer = session.anonymizer();
    Ok(HttpResponse::Ok().json(MachineDetailResponse {
        machine: anonymizer.anonymize_machine(machine),
        stats: anonymizer.anonymize_payload(stats),
    }))
}

#[instrument(skip(request, state))]
pub async fn get_user(
    request: HttpRequest,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let user = state.client.user(&session.token, &user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": session.anonymizer().anonymize_user(user) })))
}

#[instrument(skip(request, state, changes))]
pub async fn update_user(
    request: HttpRequest,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    changes: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    require_writable(&session)?;
    let user = state.client.update_user(&session.token, &user_id, &changes).await?;
    info!("User {} updated by {}", user_id, session.user.id);
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[instrument(skip(request, state, binding))]
pub async fn validate_binding(
    request: HttpRequest,
    state: web::Data<AppState>,
    binding: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let result = state.client.validate_binding(&session.token, &binding).await?;
    Ok(HttpResponse::Ok().json(session.anonymizer().anonymize_payload(result)))
}

#[instrument(skip(request, state, binding))]
pub async fn bind_machine(
    request: HttpRequest,
    state: web::Data<AppState>,
    binding: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    require_writable(&session)?;
    let result = state.client.bind_machine(&session.token, &binding).await?;
    info!("Machine binding submitted by {}", session.user.id);
    Ok(HttpResponse::Ok().json(result))
}

#[instrument(skip(request, state))]
pub async fn machine_qr_code(
    request: HttpRequest,
    state: web::Data<AppState>,
    machine_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = authenticate(&request, &state).await?;
    let result = state.client.machine_qr_code(&session.token, &machine_id).await?;
    Ok(HttpResponse::Ok().json(session.anonymizer().anonymize_payload(result)))
}

/// Health check endpoint for monitoring service status
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        backend_url: state.client.base_url().to_string(),
    })
}
