use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/**
 * \brief 对话角色；无法识别的角色统一归入 Other，构建提示词时会被跳过。
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    #[default]
    #[serde(other)]
    Other,
}

/**
 * \brief 单条历史消息，仅在一次请求内存在。
 */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /** \brief 角色：user/assistant，其余（含缺失、null、非字符串）忽略 */
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: ChatRole,
    /** \brief 内容；非字符串按 JSON 文本保留，null 视为空 */
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChatRole, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(role) if role == "user" => ChatRole::User,
        Value::String(role) if role == "assistant" => ChatRole::Assistant,
        _ => ChatRole::Other,
    })
}

fn lenient_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/**
 * \brief 裁判选出的 NFT。未知结果以 None 表示，序列化为 null。
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[serde(rename = "NFT1")]
    Nft1,
    #[serde(rename = "NFT2")]
    Nft2,
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::Nft1 => "NFT1",
            Selection::Nft2 => "NFT2",
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * \brief POST /api/chat 请求体。
 */
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /** \brief 当前用户消息（必填，由调用方校验） */
    #[serde(default)]
    pub message: Option<String>,
    /** \brief 第一个 NFT 的图片地址 */
    #[serde(default)]
    pub image_uri1: Option<String>,
    /** \brief 第二个 NFT 的图片地址 */
    #[serde(default)]
    pub image_uri2: Option<String>,
    /** \brief 历史对话，可缺省或为 null */
    #[serde(default)]
    pub chat_history: Option<Vec<ChatTurn>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub selection: Option<Selection>,
}

/**
 * \brief 一次完整裁决的结果，额外记录胜出的模型名。
 */
#[derive(Debug, Clone)]
pub struct Verdict {
    pub model: String,
    pub text: String,
    pub selection: Option<Selection>,
}

impl From<Verdict> for ChatResponse {
    fn from(v: Verdict) -> Self {
        ChatResponse {
            text: v.text,
            selection: v.selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_camel_case_fields() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"hi","imageUri1":"ipfs://a","imageUri2":"ipfs://b","chatHistory":null}"#,
        )
        .expect("parse request");
        assert_eq!(req.message.as_deref(), Some("hi"));
        assert_eq!(req.image_uri1.as_deref(), Some("ipfs://a"));
        assert_eq!(req.image_uri2.as_deref(), Some("ipfs://b"));
        assert!(req.chat_history.is_none());
    }

    #[test]
    fn test_unknown_role_deserializes_as_other() {
        let turns: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"role":"system","content":"x"},{"role":"assistant","content":"y"}]"#,
        )
        .expect("parse turns");
        assert_eq!(turns[0].role, ChatRole::Other);
        assert_eq!(turns[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_malformed_turns_become_skippable() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"next","chatHistory":[
                {"content":"no role"},
                {"role":null,"content":"null role"},
                {"role":7,"content":"numeric role"},
                {"role":"tool","content":{"a":1}},
                {"role":"user","content":"ok"},
                {"role":"assistant"}
            ]}"#,
        )
        .expect("lenient history");
        let turns = req.chat_history.expect("history");
        let roles: Vec<ChatRole> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::Other,
                ChatRole::Other,
                ChatRole::Other,
                ChatRole::Other,
                ChatRole::User,
                ChatRole::Assistant
            ]
        );
        assert_eq!(turns[3].content, r#"{"a":1}"#);
        assert_eq!(turns[5].content, "");

        let prompt = crate::prompt::build_prompt("a", "b", &turns, "next");
        assert!(!prompt.contains("no role"));
        assert!(!prompt.contains("null role"));
        assert!(!prompt.contains("numeric role"));
        assert!(prompt.contains("User: ok\n\nAssistant: \n\nUser: next\n\nAssistant:"));
    }

    #[test]
    fn test_selection_serializes_as_marker_or_null() {
        let resp = ChatResponse {
            text: "ok".into(),
            selection: Some(Selection::Nft2),
        };
        assert_eq!(
            serde_json::to_value(&resp).expect("to json"),
            serde_json::json!({"text": "ok", "selection": "NFT2"})
        );
        let resp = ChatResponse {
            text: String::new(),
            selection: None,
        };
        assert_eq!(
            serde_json::to_value(&resp).expect("to json"),
            serde_json::json!({"text": "", "selection": null})
        );
    }
}
