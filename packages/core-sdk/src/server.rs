use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, get_service, post},
    Json, Router,
};
use tower_http::services::ServeDir;

use crate::{
    config::JudgeConfig,
    error::JudgeError,
    judge,
    llm::{GeminiBackend, GenerationBackend},
    models::{ChatRequest, ChatResponse},
    telemetry,
};

/**
 * \brief 请求处理共享状态；凭据缺失时 backend 为 None。
 */
pub struct AppState<B> {
    pub config: Arc<JudgeConfig>,
    pub backend: Option<Arc<B>>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        AppState {
            config: self.config.clone(),
            backend: self.backend.clone(),
        }
    }
}

impl AppState<GeminiBackend> {
    /**
     * \brief 按配置创建 Gemini 后端。
     */
    pub fn from_config(config: JudgeConfig) -> Self {
        let backend = config
            .api_key
            .as_deref()
            .map(|key| Arc::new(GeminiBackend::new(&config.api_base, key)));
        AppState {
            config: Arc::new(config),
            backend,
        }
    }
}

/**
 * \brief 组装 API 路由与静态前端。
 */
pub fn router<B: GenerationBackend + 'static>(state: AppState<B>) -> Router {
    let static_service =
        get_service(ServeDir::new(&state.config.ui_dir).append_index_html_on_directories(true));

    Router::new()
        .route("/api/chat", post(chat::<B>))
        .route("/api/models", get(list_candidates::<B>))
        .route("/api/health", get(health_check::<B>))
        .fallback_service(static_service)
        .with_state(state)
}

/**
 * \brief 启动本地 HTTP 服务。
 * \param addr 监听地址，如 "127.0.0.1:3000"
 */
pub async fn run(addr: &str, config: JudgeConfig) -> Result<()> {
    if config.api_key.is_none() {
        telemetry::log_warn(
            "server",
            "no API key configured, /api/chat will answer with a configuration error",
        );
    }
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief 聊天裁决接口：POST /api/chat
 */
async fn chat<B: GenerationBackend + 'static>(
    State(state): State<AppState<B>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, JudgeError> {
    let backend = state.backend.as_ref().ok_or(JudgeError::MissingCredential)?;
    let Json(request) = payload.map_err(|e| JudgeError::InvalidRequest(e.body_text()))?;

    let verdict = judge::judge(&**backend, &state.config.models, &request).await?;
    Ok(Json(verdict.into()))
}

async fn list_candidates<B: GenerationBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "models": state.config.models }))
}

/**
 * \brief 健康检查：尝试列出模型并返回状态。
 */
async fn health_check<B: GenerationBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<serde_json::Value> {
    let Some(backend) = state.backend.as_ref() else {
        return Json(serde_json::json!({
            "ok": false,
            "candidates": state.config.models,
            "error": JudgeError::MissingCredential.to_string()
        }));
    };
    match backend.list_models().await {
        Ok(list) => Json(serde_json::json!({
            "ok": true,
            "candidates": state.config.models,
            "models": list.len()
        })),
        Err(e) => {
            telemetry::log_error("server.health", &format!("list models failed: {}", e));
            Json(serde_json::json!({
                "ok": false,
                "candidates": state.config.models,
                "error": e.to_string()
            }))
        }
    }
}
