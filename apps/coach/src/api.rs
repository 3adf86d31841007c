//! Typed client for the two coaching endpoints.
//!
//! The `CoachingApi` trait is the seam between the session controller and the
//! network; the controller is exercised in tests against a scripted
//! implementation. Nothing here retries: every failure surfaces to the caller
//! and requires explicit user re-initiation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::session::Role;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("response was missing an expected field")]
    MalformedResponse,
}

/// Setup context sent with every request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub role: Role,
    pub resume: String,
    pub blurb: String,
    pub job_description: String,
}

/// Successful coach-answer body as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachReportBody {
    pub score: f64,
    pub summary: String,
    pub improved_answer: String,
    pub watchouts: Vec<String>,
}

#[async_trait]
pub trait CoachingApi: Send + Sync {
    async fn generate_question(&self, ctx: &SessionContext) -> Result<String, ApiClientError>;

    async fn coach_answer(
        &self,
        ctx: &SessionContext,
        question: &str,
        answer: &str,
    ) -> Result<CoachReportBody, ApiClientError>;
}

/// reqwest-backed implementation talking to the prep coach API.
#[derive(Debug, Clone)]
pub struct HttpCoachingApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCoachingApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn context_body(ctx: &SessionContext) -> Value {
        json!({
            "role": ctx.role.code(),
            "resumeText": ctx.resume,
            "blurb": ctx.blurb,
            "jobDescription": ctx.job_description,
        })
    }
}

#[async_trait]
impl CoachingApi for HttpCoachingApi {
    async fn generate_question(&self, ctx: &SessionContext) -> Result<String, ApiClientError> {
        let response = self
            .client
            .post(format!("{}/generate-question", self.base_url))
            .json(&Self::context_body(ctx))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|_| ApiClientError::MalformedResponse)?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Failed to generate a question")
                .to_string();
            return Err(ApiClientError::Api(message));
        }

        body.get("question")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ApiClientError::MalformedResponse)
    }

    async fn coach_answer(
        &self,
        ctx: &SessionContext,
        question: &str,
        answer: &str,
    ) -> Result<CoachReportBody, ApiClientError> {
        let mut request_body = Self::context_body(ctx);
        request_body["question"] = Value::String(question.to_string());
        request_body["answer"] = Value::String(answer.to_string());

        let response = self
            .client
            .post(format!("{}/coach-answer", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|_| ApiClientError::MalformedResponse)?;

        if !status.is_success() || body.get("error").is_some() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Failed to coach answer")
                .to_string();
            return Err(ApiClientError::Api(message));
        }

        serde_json::from_value(body).map_err(|_| ApiClientError::MalformedResponse)
    }
}
