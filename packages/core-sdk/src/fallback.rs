use crate::{error::JudgeError, llm::GenerationBackend, telemetry};

/** \brief 所有候选模型共用的采样温度。 */
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/**
 * \brief 单次候选尝试的结果。
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { text: String },
    Failure { message: String },
}

/**
 * \brief 胜出的候选模型及其输出。
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub model: String,
    pub text: String,
}

/**
 * \brief 对单个模型发起一次调用，把后端错误折叠为 Failure。
 */
pub async fn attempt<B: GenerationBackend>(backend: &B, model: &str, prompt: &str) -> AttemptOutcome {
    match backend.generate(model, prompt, GENERATION_TEMPERATURE).await {
        Ok(text) => AttemptOutcome::Success { text },
        Err(e) => AttemptOutcome::Failure {
            message: e.to_string(),
        },
    }
}

/**
 * \brief 按顺序逐个尝试候选模型，返回第一个成功的结果。
 *
 * 空字符串同样算成功，不会继续尝试下一个模型。
 * 全部失败时返回 AllCandidatesExhausted，携带最后一次错误与完整候选列表。
 */
pub async fn invoke_with_fallback<B: GenerationBackend>(
    backend: &B,
    candidates: &[String],
    prompt: &str,
) -> Result<Generation, JudgeError> {
    let mut last_error = None;

    for model in candidates {
        match attempt(backend, model, prompt).await {
            AttemptOutcome::Success { text } => {
                telemetry::log_event("fallback", &format!("model={} ok", model));
                return Ok(Generation {
                    model: model.clone(),
                    text,
                });
            }
            AttemptOutcome::Failure { message } => {
                telemetry::log_warn("fallback", &format!("model={} failed: {}", model, message));
                last_error = Some(message);
            }
        }
    }

    match last_error {
        Some(last_error) => Err(JudgeError::AllCandidatesExhausted {
            last_error,
            candidates: candidates.to_vec(),
        }),
        None => Err(JudgeError::NoCandidates),
    }
}
