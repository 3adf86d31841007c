//! Axum route handlers for the two coaching endpoints.
//!
//! Validation is checked left-to-right and the first violation wins; a request
//! that fails validation is rejected before any LLM call is issued.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::coaching::feedback::{validate_report, CoachReport, ReportValidation};
use crate::coaching::prompts;
use crate::errors::AppError;
use crate::models::role::Role;
use crate::state::AppState;

/// Optional per-request credential for coach-answer. Takes precedence over the
/// process-wide key for that call only; question generation always uses the
/// default credential.
const OVERRIDE_KEY_HEADER: &str = "x-openai-api-key";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionResponse {
    pub question: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachAnswerRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-question
///
/// Builds a role/context-aware prompt and returns one behavioral interview
/// question as bare text.
pub async fn handle_generate_question(
    State(state): State<AppState>,
    body: Result<Json<GenerateQuestionRequest>, JsonRejection>,
) -> Result<Json<GenerateQuestionResponse>, AppError> {
    let Json(request) =
        body.map_err(|_| AppError::Validation("Invalid JSON payload.".to_string()))?;

    let role = Role::from_code(&request.role)
        .ok_or_else(|| AppError::Validation("Invalid role provided.".to_string()))?;

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required.".to_string(),
        ));
    }

    let prompt = prompts::question_user_prompt(
        role,
        &request.resume_text,
        &request.blurb,
        &request.job_description,
    );

    let question = state
        .llm
        .complete(
            prompts::QUESTION_SYSTEM,
            &prompt,
            prompts::QUESTION_TEMPERATURE,
            None,
        )
        .await
        .map_err(|e| AppError::Llm(format!("question generation failed: {e}")))?;

    Ok(Json(GenerateQuestionResponse { question }))
}

/// POST /coach-answer
///
/// Scores the candidate's answer and returns the validated
/// `{score, summary, improvedAnswer, watchouts}` payload verbatim.
pub async fn handle_coach_answer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CoachAnswerRequest>, JsonRejection>,
) -> Result<Json<CoachReport>, AppError> {
    let Json(request) =
        body.map_err(|_| AppError::Validation("Invalid JSON payload.".to_string()))?;

    let role = Role::from_code(&request.role)
        .ok_or_else(|| AppError::Validation("Invalid role provided.".to_string()))?;

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required.".to_string(),
        ));
    }

    if request.question.trim().is_empty() {
        return Err(AppError::Validation("Question is required.".to_string()));
    }

    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("Answer is required.".to_string()));
    }

    let api_key_override = headers
        .get(OVERRIDE_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let prompt = prompts::coach_user_prompt(
        role,
        &request.resume_text,
        &request.blurb,
        &request.job_description,
        &request.question,
        &request.answer,
    );

    let raw = state
        .llm
        .complete(
            prompts::COACH_SYSTEM,
            &prompt,
            prompts::COACH_TEMPERATURE,
            api_key_override,
        )
        .await
        .map_err(|e| AppError::Llm(format!("answer coaching failed: {e}")))?;

    match validate_report(&raw) {
        ReportValidation::Valid(report) => Ok(Json(report)),
        // The raw text goes to the log via AppError::Llm, never to the client.
        ReportValidation::Invalid(reason) => Err(AppError::Llm(format!(
            "{reason}; raw model output: {raw}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::routes::build_router;
    use crate::state::AppState;

    /// Spawns a one-route mock of the completions endpoint that always replies
    /// with `reply`, counting how many calls it received.
    async fn spawn_backend(reply: Value) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let app = Router::new().route(
            "/",
            post(move || {
                let reply = reply.clone();
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    axum::Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), calls)
    }

    fn completion_reply(content: &str) -> Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1}
        })
    }

    fn test_app(backend_url: String) -> Router {
        let state = AppState {
            llm: LlmClient::new("test-key".to_string()).with_base_url(backend_url),
            config: Config {
                openai_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
        };
        build_router(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_question_rejects_unknown_role_without_backend_call() {
        let (url, calls) = spawn_backend(completion_reply("unused")).await;
        let body = json!({"role": "barista", "jobDescription": "jd"});
        let (status, response) = post_json(test_app(url), "/generate-question", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Invalid role provided.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_question_requires_job_description() {
        let (url, calls) = spawn_backend(completion_reply("unused")).await;
        let body = json!({"role": "ai_pm", "jobDescription": "   "});
        let (status, response) = post_json(test_app(url), "/generate-question", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Job description is required.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_question_rejects_malformed_json_body() {
        let (url, _calls) = spawn_backend(completion_reply("unused")).await;
        let response = test_app(url)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate-question")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid JSON payload.");
    }

    #[tokio::test]
    async fn test_generate_question_returns_trimmed_model_text() {
        let (url, calls) = spawn_backend(completion_reply("  Tell me about a launch.  ")).await;
        let body = json!({
            "role": "eng_manager",
            "resumeText": "resume",
            "blurb": "blurb",
            "jobDescription": "jd"
        });
        let (status, response) = post_json(test_app(url), "/generate-question", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["question"], "Tell me about a launch.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_question_maps_empty_output_to_generic_500() {
        let (url, _calls) = spawn_backend(completion_reply("   ")).await;
        let body = json!({"role": "designer", "jobDescription": "jd"});
        let (status, response) = post_json(test_app(url), "/generate-question", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["error"], "Something went wrong. Please try again.");
    }

    #[tokio::test]
    async fn test_coach_answer_validates_fields_in_order() {
        let (url, calls) = spawn_backend(completion_reply("unused")).await;

        // Invalid role wins even when every other field is also missing.
        let (status, response) = post_json(
            test_app(url.clone()),
            "/coach-answer",
            json!({"role": "nope"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Invalid role provided.");

        let (_, response) = post_json(
            test_app(url.clone()),
            "/coach-answer",
            json!({"role": "ai_pm"}),
        )
        .await;
        assert_eq!(response["error"], "Job description is required.");

        let (_, response) = post_json(
            test_app(url.clone()),
            "/coach-answer",
            json!({"role": "ai_pm", "jobDescription": "jd"}),
        )
        .await;
        assert_eq!(response["error"], "Question is required.");

        let (_, response) = post_json(
            test_app(url.clone()),
            "/coach-answer",
            json!({"role": "ai_pm", "jobDescription": "jd", "question": "Q?", "answer": " "}),
        )
        .await;
        assert_eq!(response["error"], "Answer is required.");

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_coach_answer_returns_validated_payload_verbatim() {
        let payload = r#"{"score":4,"summary":"S","improvedAnswer":"I","watchouts":["a","b"]}"#;
        let (url, _calls) = spawn_backend(completion_reply(payload)).await;
        let body = json!({
            "role": "ai_pm",
            "resumeText": "resume",
            "blurb": "blurb",
            "jobDescription": "jd",
            "question": "Q?",
            "answer": "A."
        });
        let (status, response) = post_json(test_app(url), "/coach-answer", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response,
            json!({"score": 4, "summary": "S", "improvedAnswer": "I", "watchouts": ["a", "b"]})
        );
    }

    #[tokio::test]
    async fn test_coach_answer_hides_unparsable_model_output() {
        let raw = "Here is my take: a solid seven.";
        let (url, _calls) = spawn_backend(completion_reply(raw)).await;
        let body = json!({
            "role": "designer",
            "jobDescription": "jd",
            "question": "Q?",
            "answer": "A."
        });
        let (status, response) = post_json(test_app(url), "/coach-answer", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["error"], "Something went wrong. Please try again.");
        assert!(!response.to_string().contains("solid seven"));
    }

    #[tokio::test]
    async fn test_coach_answer_rejects_partially_valid_payload() {
        let payload = r#"{"score":4,"summary":"S","improvedAnswer":42,"watchouts":[]}"#;
        let (url, _calls) = spawn_backend(completion_reply(payload)).await;
        let body = json!({
            "role": "eng_manager",
            "jobDescription": "jd",
            "question": "Q?",
            "answer": "A."
        });
        let (status, response) = post_json(test_app(url), "/coach-answer", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["error"], "Something went wrong. Please try again.");
    }

    #[tokio::test]
    async fn test_health_route() {
        let (url, _calls) = spawn_backend(completion_reply("unused")).await;
        let response = test_app(url)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
