use crate::models::{ChatRole, ChatTurn};

/**
 * \brief 生成裁判指令块，两个 NFT 地址原样嵌入。
 */
fn instruction_block(image_uri1: &str, image_uri2: &str) -> String {
    format!(
        r#"You are an AI judge for an NFT battle game. You will evaluate two NFTs represented by their image URIs:
- NFT 1: {uri1}
- NFT 2: {uri2}

IMPORTANT: After EACH conversation turn with the user, you MUST choose which NFT you prefer and respond with EXACTLY one of these formats at the END of your response:
- "SELECTION: NFT1" if you prefer the first NFT ({uri1})
- "SELECTION: NFT2" if you prefer the second NFT ({uri2})

Your response format should be:
1. First, provide a conversational response about the NFTs based on the user's question
2. Then, at the VERY END, include your selection in the exact format above

Make your selection based on:
- The user's conversation and questions
- The visual appeal and quality of the images
- The creative and artistic merit
- Any context provided about the NFTs
- The URL or characteristics described

CRITICAL: You MUST end EVERY response with either "SELECTION: NFT1" or "SELECTION: NFT2". This is required for the battle system to work."#,
        uri1 = image_uri1,
        uri2 = image_uri2,
    )
}

/**
 * \brief 拼接完整提示词：指令块 + 历史对话 + 当前消息，末尾留出 "Assistant:" 续写位。
 * \param history 历史对话，非 user/assistant 角色被跳过
 */
pub fn build_prompt(
    image_uri1: &str,
    image_uri2: &str,
    history: &[ChatTurn],
    message: &str,
) -> String {
    let mut prompt = instruction_block(image_uri1, image_uri2);
    prompt.push_str("\n\n");

    for turn in history {
        let speaker = match turn.role {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
            ChatRole::Other => continue,
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push_str("\n\n");
    }

    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\n\nAssistant:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_of(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?} in prompt", needle))
    }

    #[test]
    fn test_history_follows_instruction_in_order() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let prompt = build_prompt("ipfs://one.png", "ipfs://two.png", &history, "bye");

        let nft1 = position_of(&prompt, "ipfs://one.png");
        let nft2 = position_of(&prompt, "ipfs://two.png");
        let marker = position_of(&prompt, "SELECTION: NFT1");
        let user_hi = position_of(&prompt, "User: hi");
        let assistant_hello = position_of(&prompt, "Assistant: hello");
        let user_bye = position_of(&prompt, "User: bye");

        assert!(nft1 < user_hi && nft2 < user_hi && marker < user_hi);
        assert!(prompt.contains("SELECTION: NFT2"));
        assert!(user_hi < assistant_hello);
        assert!(assistant_hello < user_bye);
        assert!(prompt.ends_with("User: bye\n\nAssistant:"));
    }

    #[test]
    fn test_turns_are_blank_line_separated() {
        let history = vec![ChatTurn::user("first")];
        let prompt = build_prompt("a", "b", &history, "second");
        assert!(prompt.contains("\n\nUser: first\n\nUser: second\n\nAssistant:"));
    }

    #[test]
    fn test_unknown_role_is_skipped() {
        let history = vec![
            ChatTurn {
                role: ChatRole::Other,
                content: "secret system note".into(),
            },
            ChatTurn::user("visible"),
        ];
        let prompt = build_prompt("a", "b", &history, "next");
        assert!(!prompt.contains("secret system note"));
        assert!(prompt.contains("User: visible"));
    }

    #[test]
    fn test_empty_history() {
        let prompt = build_prompt("a", "b", &[], "only");
        assert!(prompt.ends_with("to work.\n\nUser: only\n\nAssistant:"));
    }
}
