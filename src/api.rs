use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::warn;
use serde::de::DeserializeOwned;

use crate::domain::coordinator::{Coordinator, CoordinatorError, ExecutionOutcome};
use crate::models::{AgentRequest, ExecuteRequest, ValidateRequest};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Shared per-worker state.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
    pub api_key: Option<String>,
}

// ---------- Route handlers ----------

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// GET /problems
pub async fn problems(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.coordinator.registry())
}

/// POST /validate
pub async fn validate(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }
    let request: ValidateRequest = match parse_optional_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.coordinator.validate(request) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => bad_request(e),
    }
}

/// POST /execute
pub async fn execute(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }
    let request: ExecuteRequest = match parse_optional_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.coordinator.execute(request).await {
        Ok(ExecutionOutcome::Completed(report)) => HttpResponse::Ok().json(report),
        Ok(ExecutionOutcome::Aborted { validation, message }) => HttpResponse::UnprocessableEntity()
            .json(serde_json::json!({ "error": message, "validation": validation })),
        Err(e) => bad_request(e),
    }
}

/// POST /agent
pub async fn agent(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }
    let request: AgentRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.coordinator.handle(request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => bad_request(e),
    }
}

/// Register all routes on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/problems", web::get().to(problems))
        .route("/validate", web::post().to(validate))
        .route("/execute", web::post().to(execute))
        .route("/agent", web::post().to(agent));
}

/// Body size limit for every POST route; oversized payloads get `413`.
pub fn payload_config(limit: usize) -> web::PayloadConfig {
    web::PayloadConfig::new(limit)
}

// ---------- Helpers ----------

fn authorize(req: &HttpRequest, state: &AppState) -> Result<(), HttpResponse> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(());
    };
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided == Some(expected) {
        Ok(())
    } else {
        warn!("rejected request to {} without a valid API key", req.path());
        Err(HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Invalid or missing API key" })))
    }
}

/// Bodies are parsed only after `authorize`, so bad input from an
/// unauthenticated caller still gets `401`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpResponse> {
    serde_json::from_slice(body).map_err(|e| {
        HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
    })
}

/// An empty body means "use the registry".
fn parse_optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_body(body)
}

fn bad_request(e: CoordinatorError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}
