pub mod config;
pub mod error;
pub mod fallback;
pub mod judge;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod selection;
pub mod server;
pub mod telemetry;

/**
 * \brief SDK 预导入集合，方便外部引用常用模块。
 */
pub mod prelude {
    pub use crate::config::JudgeConfig;
    pub use crate::error::JudgeError;
    pub use crate::llm::{GeminiBackend, GenerationBackend};
    pub use crate::models::{ChatRequest, ChatResponse, ChatRole, ChatTurn, Selection, Verdict};
    pub use crate::{config, judge, llm, server, telemetry};
}
