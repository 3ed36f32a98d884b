//! HTTP handlers for the generation API

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use generation::{
    BackendError, BackendInfo, ContextFile, Framework, Generation, GenerationError,
    GenerationRequest, SharedGenerator,
};
use repo_context::{parse_repo_url, ContextError, RepoExtractor, RepoInfo};

/// Shared state for the handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: SharedGenerator,
    pub extractor: RepoExtractor,
}

/// Embedded single-page front-end
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub description: String,
    #[serde(default)]
    pub framework: Framework,
    /// Optional GitHub repository whose front-end files seed the prompt
    #[serde(default)]
    pub repo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RefineParams {
    pub code: String,
    pub feedback: String,
    #[serde(default)]
    pub framework: Framework,
}

#[derive(Debug, Serialize)]
pub struct GenerateReply {
    /// Provider text, verbatim
    pub raw: String,
    /// First fenced code block, if the reply contained one
    pub code: Option<String>,
    pub model: String,
    pub backend: String,
    /// Paths of repository files that were embedded as context
    pub context_files: Vec<String>,
    /// Repository metadata when context was requested
    pub repo: Option<RepoInfo>,
}

impl GenerateReply {
    fn new(generation: Generation, context_files: Vec<String>, repo: Option<RepoInfo>) -> Self {
        Self {
            raw: generation.raw,
            code: generation.code,
            model: generation.model,
            backend: generation.backend,
            context_files,
            repo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub ready: bool,
    pub backend: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors the handlers map onto HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Generation(GenerationError::EmptyPrompt) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Generation(GenerationError::Backend(e)) => backend_status(e),
            ApiError::Generation(GenerationError::Prompt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Generation(GenerationError::SwitchFailed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Context(ContextError::InvalidUrl(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Context(ContextError::NoFrontendFiles(_)) => StatusCode::NOT_FOUND,
            ApiError::Context(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

fn backend_status(error: &BackendError) -> StatusCode {
    if error.is_timeout() {
        return StatusCode::GATEWAY_TIMEOUT;
    }
    match error {
        BackendError::Auth(_) => StatusCode::UNAUTHORIZED,
        BackendError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        BackendError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("Request failed ({}): {}", status, self);
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Generate UI code from a description, optionally seeded with repository context
pub async fn generate(
    State(state): State<AppState>,
    Json(params): Json<GenerateParams>,
) -> Result<Json<GenerateReply>, ApiError> {
    let mut request = GenerationRequest::new(params.description, params.framework);
    let mut repo_info = None;

    if let Some(repo_url) = params
        .repo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        let (owner, repo) = parse_repo_url(repo_url)?;
        let files = state.extractor.fetch_frontend_files(&owner, &repo).await?;
        log::info!(
            "Embedding {} context files from {}/{}",
            files.len(),
            owner,
            repo
        );
        request.context = files
            .into_iter()
            .map(|file| ContextFile {
                path: file.path,
                contents: file.contents,
            })
            .collect();

        // metadata is display-only, so a failure here is not fatal
        repo_info = match state.extractor.fetch_repo_info(&owner, &repo).await {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Couldn't fetch repository info for {}/{}: {}", owner, repo, e);
                None
            }
        };
    }

    let context_files = request.context.iter().map(|file| file.path.clone()).collect();
    let generation = state.generator.generate(&request).await?;
    Ok(Json(GenerateReply::new(generation, context_files, repo_info)))
}

/// Improve previously generated code based on feedback
pub async fn refine(
    State(state): State<AppState>,
    Json(params): Json<RefineParams>,
) -> Result<Json<GenerateReply>, ApiError> {
    let generation = state
        .generator
        .refine(&params.code, &params.feedback, params.framework)
        .await?;
    Ok(Json(GenerateReply::new(generation, Vec::new(), None)))
}

/// Switch the active backend and return the updated listing
pub async fn switch_backend(
    State(state): State<AppState>,
    Json(params): Json<SwitchParams>,
) -> Result<Json<Vec<BackendInfo>>, ApiError> {
    state.generator.switch_backend(&params.name).await?;
    Ok(Json(state.generator.available_backends().await))
}

/// Backend reachability
pub async fn health(State(state): State<AppState>) -> Json<HealthReply> {
    Json(HealthReply {
        ready: state.generator.health_check().await,
        backend: state.generator.current_backend_name().await,
    })
}

/// Registry listing for the backend picker
pub async fn backends(State(state): State<AppState>) -> Json<Vec<BackendInfo>> {
    Json(state.generator.available_backends().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_maps_to_422() {
        let err = ApiError::Generation(GenerationError::EmptyPrompt);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_auth_failure_maps_to_401() {
        let err = ApiError::Generation(GenerationError::Backend(BackendError::Auth(
            "bad key".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        let err = ApiError::Generation(GenerationError::Backend(BackendError::RateLimited(
            "slow down".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_upstream_failure_maps_to_502() {
        let err = ApiError::Generation(GenerationError::Backend(BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_repo_url_maps_to_422() {
        let err = ApiError::Context(ContextError::InvalidUrl("ftp://nope".to_string()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_generate_params_accept_minimal_body() {
        let params: GenerateParams =
            serde_json::from_str(r#"{"description":"a card"}"#).unwrap();
        assert_eq!(params.description, "a card");
        assert_eq!(params.framework, Framework::Svelte);
        assert!(params.repo_url.is_none());
    }
}
