use crate::{
    error::JudgeError,
    fallback::invoke_with_fallback,
    llm::GenerationBackend,
    models::{ChatRequest, Verdict},
    prompt::build_prompt,
    selection::extract_selection,
    telemetry,
};

/**
 * \brief 完整裁决流程：校验 → 构建提示词 → 候选模型回退调用 → 解析选择。
 * \param candidates 候选模型，按偏好排序
 */
pub async fn judge<B: GenerationBackend>(
    backend: &B,
    candidates: &[String],
    request: &ChatRequest,
) -> Result<Verdict, JudgeError> {
    let message = request
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| JudgeError::InvalidRequest("message is required".to_string()))?;

    let image_uri1 = image_or_empty(request.image_uri1.as_deref(), "imageUri1");
    let image_uri2 = image_or_empty(request.image_uri2.as_deref(), "imageUri2");
    let history = request.chat_history.as_deref().unwrap_or_default();

    let prompt = build_prompt(image_uri1, image_uri2, history, message);
    telemetry::log_event(
        "judge",
        &format!(
            "history={} prompt_len={} candidates={}",
            history.len(),
            prompt.len(),
            candidates.len()
        ),
    );

    let generation = invoke_with_fallback(backend, candidates, &prompt).await?;
    let selection = extract_selection(&generation.text);
    telemetry::log_event(
        "judge",
        &format!(
            "model={} selection={}",
            generation.model,
            selection.map(|s| s.as_str()).unwrap_or("unknown")
        ),
    );

    Ok(Verdict {
        model: generation.model,
        text: generation.text,
        selection,
    })
}

fn image_or_empty<'a>(uri: Option<&'a str>, field: &str) -> &'a str {
    match uri {
        Some(uri) => uri,
        None => {
            telemetry::log_warn("judge", &format!("{} missing, prompting with empty identifier", field));
            ""
        }
    }
}
