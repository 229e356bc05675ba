//! Routes and handlers: `POST /analyze`, `GET /health`, `GET /info`.

use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use faultline_core::error::FaultlineError;
use faultline_core::types::{FixProposal, Language, ReadSource};
use faultline_investigate::investigate;
use faultline_patch::compute_diffs;

use crate::{auth, SharedState};

pub fn router(state: SharedState) -> Router {
    let cors = auth::cors_layer(&state.config.server);

    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .route("/info", get(info))
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub log: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub project_root: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdditionalFixResponse {
    pub filepath: Option<String>,
    pub full_code_block: String,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub explanation: String,
    pub code: String,
    pub filepath: Option<String>,
    pub diff: Option<String>,
    pub root_cause_file: Option<String>,
    pub root_cause_explanation: Option<String>,
    pub additional_fixes: Vec<AdditionalFixResponse>,
    pub files_read: Vec<String>,
    pub files_read_sources: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub multi_language: bool,
    pub deep_debugging: bool,
    pub root_cause_analysis: bool,
    pub multiple_fixes: bool,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub supported_languages: Vec<&'static str>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_key_configured: state.config.api_key_configured(),
    })
}

async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_languages: vec!["python", "javascript", "typescript", "go", "rust", "java"],
        capabilities: Capabilities {
            multi_language: true,
            deep_debugging: true,
            root_cause_analysis: true,
            multiple_fixes: true,
        },
    })
}

async fn analyze(
    State(state): State<SharedState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.log.trim().is_empty() {
        return Err(to_response_error(FaultlineError::LogEmpty));
    }
    if req.log.len() > state.config.size_caps.max_log_bytes {
        return Err(to_response_error(FaultlineError::SizeCapExceeded {
            what: "log".to_string(),
            actual: req.log.len(),
            limit: state.config.size_caps.max_log_bytes,
        }));
    }

    let root = resolve_root(&state, req.project_root.as_deref());

    let hint = req.language.as_deref().and_then(Language::from_str_loose);
    let parsed = faultline_parsers::traceback::parse(&req.log, hint);

    let context = investigate(
        &root,
        &parsed.frames,
        parsed.language,
        parsed.error_message.as_deref(),
        &state.config.size_caps,
    );

    let mut prompt = faultline_llm::build_prompt(&req.log, &context);
    if let Some(extra) = &req.context {
        prompt.push_str("\n\nADDITIONAL CONTEXT:\n");
        prompt.push_str(extra);
    }

    let proposal = state.client.generate_fix_proposal(&prompt).await.map_err(to_response_error)?;
    let diffs = compute_diffs(&root, &proposal);

    Ok(Json(build_response(&proposal, &diffs, &context.files_read)))
}

fn resolve_root(state: &SharedState, client_root: Option<&str>) -> PathBuf {
    if state.config.server.allow_client_project_root {
        if let Some(root) = client_root {
            return PathBuf::from(root);
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn build_response(
    proposal: &FixProposal,
    diffs: &[faultline_core::types::FileDiff],
    files_read: &[(String, ReadSource)],
) -> AnalyzeResponse {
    let diff = proposal
        .filepath
        .as_deref()
        .and_then(|fp| diffs.iter().find(|d| d.filepath == fp))
        .map(|d| d.diff_text.clone());

    let additional_fixes = proposal
        .additional_fixes
        .iter()
        .map(|f| AdditionalFixResponse {
            filepath: f.filepath.clone(),
            full_code_block: f.full_code_block.clone(),
            explanation: f.explanation.clone(),
        })
        .collect();

    let files_read_sources = files_read
        .iter()
        .map(|(path, source)| (path.clone(), read_source_str(*source).to_string()))
        .collect();

    AnalyzeResponse {
        explanation: proposal.explanation.clone(),
        code: proposal.full_code_block.clone(),
        filepath: proposal.filepath.clone(),
        diff,
        root_cause_file: proposal.root_cause_file.clone(),
        root_cause_explanation: proposal.root_cause_explanation.clone(),
        additional_fixes,
        files_read: files_read.iter().map(|(path, _)| path.clone()).collect(),
        files_read_sources,
    }
}

fn read_source_str(source: ReadSource) -> &'static str {
    match source {
        ReadSource::Traceback => "traceback",
        ReadSource::Import => "import",
        ReadSource::Scan => "scan",
        ReadSource::Manual => "manual",
    }
}

fn to_response_error(err: FaultlineError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        FaultlineError::LogEmpty | FaultlineError::SizeCapExceeded { .. } | FaultlineError::PathEscape(_) => {
            StatusCode::BAD_REQUEST
        }
        FaultlineError::UpstreamRateLimited { .. }
        | FaultlineError::UpstreamExhausted
        | FaultlineError::ModelOutputInvalid(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}
