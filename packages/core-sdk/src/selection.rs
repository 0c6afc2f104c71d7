use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Selection;

static SELECTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SELECTION:\s*(NFT[12])").expect("selection marker regex"));

/**
 * \brief 从模型输出中解析选择结果。
 *
 * 优先匹配任意位置的 "SELECTION: NFTx"（大小写不敏感）；
 * 否则退化为检查整段文本是否以 NFT1/NFT2 结尾；都不满足时返回 None。
 * 对任意输入（含空串）都不会失败。
 */
pub fn extract_selection(text: &str) -> Option<Selection> {
    if let Some(token) = SELECTION_MARKER.captures(text).and_then(|c| c.get(1)) {
        return parse_token(&token.as_str().to_ascii_uppercase());
    }

    let normalized = text.trim().to_uppercase();
    if normalized.ends_with("NFT1") || normalized.contains("SELECTION: NFT1") {
        Some(Selection::Nft1)
    } else if normalized.ends_with("NFT2") || normalized.contains("SELECTION: NFT2") {
        Some(Selection::Nft2)
    } else {
        None
    }
}

fn parse_token(token: &str) -> Option<Selection> {
    match token {
        "NFT1" => Some(Selection::Nft1),
        "NFT2" => Some(Selection::Nft2),
        _ => None,
    }
}
