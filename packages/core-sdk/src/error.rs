use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::telemetry;

/**
 * \brief 裁判流程的错误分类。单个候选模型的失败在 fallback 内部消化，不会出现在这里。
 */
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("GEMINI_API_KEY or GOOGLE_GENERATIVE_AI_API_KEY is not configured. Please add it to your .env.local file.")]
    MissingCredential,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no model candidates configured")]
    NoCandidates,

    #[error("All models failed. Last error: {last_error}. Available models: {}", .candidates.join(", "))]
    AllCandidatesExhausted {
        last_error: String,
        candidates: Vec<String>,
    },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl JudgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            JudgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /**
     * \brief 客户端输入问题，按 WARN 记录。
     */
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for JudgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if self.is_client_error() {
            telemetry::log_warn("server", &message);
        } else {
            telemetry::log_error("server", &message);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
