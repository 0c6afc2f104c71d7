use std::path::PathBuf;

/** \brief 凭据可使用的两个环境变量名，按顺序查找。 */
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/** \brief 默认候选模型，偏好度从高到低。 */
pub const DEFAULT_MODELS: [&str; 7] = [
    "gemini-1.5-flash-002",
    "gemini-1.5-flash-001",
    "gemini-1.5-pro-002",
    "gemini-1.5-pro-001",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-2.0-flash",
];

const DEFAULT_UI_DIR: &str = "web";

/**
 * \brief 运行配置，启动时解析一次后显式传入各组件。
 */
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /** \brief API 密钥；缺失时服务仍可启动，但聊天接口返回配置错误 */
    pub api_key: Option<String>,
    /** \brief Gemini API 基地址 */
    pub api_base: String,
    /** \brief 候选模型列表，运行期不会修改 */
    pub models: Vec<String>,
    /** \brief 静态前端目录 */
    pub ui_dir: PathBuf,
    /** \brief 是否开启文件日志 */
    pub telemetry_enabled: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            models: default_models(),
            ui_dir: PathBuf::from(DEFAULT_UI_DIR),
            telemetry_enabled: false,
        }
    }
}

impl JudgeConfig {
    /**
     * \brief 从进程环境变量读取配置。
     */
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /**
     * \brief 从任意查找函数读取配置，空字符串视为未设置。
     */
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS.iter().find_map(|key| get(*key));
        let api_base = get("NFTJUDGE_GEMINI_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let models = get("NFTJUDGE_MODELS")
            .map(|raw| parse_model_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(default_models);
        let ui_dir = get("NFTJUDGE_UI_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UI_DIR));
        let telemetry_enabled = get("NFTJUDGE_TELEMETRY")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        JudgeConfig {
            api_key,
            api_base,
            models,
            ui_dir,
            telemetry_enabled,
        }
    }
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
