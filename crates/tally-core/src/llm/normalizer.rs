//! Response normalization
//!
//! Collapses a response's content blocks into one canonical string.
//! Text blocks win over tool-use blocks; the first tool-use payload is
//! used only when there is no text at all.

use crate::error::{GatewayError, GatewayResult};
use crate::llm::messages::{ChatResponse, ResponseBlock};

/// Message of the error raised for responses with nothing usable in them
pub const NO_CONTENT_MESSAGE: &str = "no text content found";

/// Turn a response into its canonical string
pub fn normalize(response: &ChatResponse) -> GatewayResult<String> {
    normalize_blocks(&response.content)
}

/// Turn a block sequence into its canonical string.
///
/// Text blocks are joined with `\n`. Without any text block, the input of
/// the first tool-use block is serialized as JSON.
pub fn normalize_blocks(blocks: &[ResponseBlock]) -> GatewayResult<String> {
    let texts: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            ResponseBlock::Text { text } => Some(text.as_str()),
            ResponseBlock::ToolUse { .. } | ResponseBlock::Other => None,
        })
        .collect();

    if !texts.is_empty() {
        return Ok(texts.join("\n"));
    }

    let structured = blocks.iter().find_map(|block| match block {
        ResponseBlock::ToolUse { input, .. } => Some(input),
        ResponseBlock::Text { .. } | ResponseBlock::Other => None,
    });

    match structured {
        Some(input) => Ok(serde_json::to_string(input)?),
        None => Err(GatewayError::response_format(NO_CONTENT_MESSAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_blocks_joined_with_newline() {
        let blocks = vec![
            ResponseBlock::text("First part"),
            ResponseBlock::text("Second part"),
        ];
        assert_eq!(normalize_blocks(&blocks).unwrap(), "First part\nSecond part");
    }

    #[test]
    fn test_tool_use_serialized_to_json() {
        let blocks = vec![ResponseBlock::tool_use(
            "categorize",
            json!({"categories": ["A", "B"]}),
        )];
        assert_eq!(
            normalize_blocks(&blocks).unwrap(),
            r#"{"categories":["A","B"]}"#
        );
    }

    #[test]
    fn test_empty_blocks_is_format_error() {
        let err = normalize_blocks(&[]).unwrap_err();
        assert!(matches!(err, GatewayError::ResponseFormat { .. }));
        assert!(err.to_string().contains(NO_CONTENT_MESSAGE));
    }

    #[test]
    fn test_text_takes_precedence_over_tool_use() {
        let blocks = vec![
            ResponseBlock::tool_use("categorize", json!({"x": 1})),
            ResponseBlock::text("plain answer"),
        ];
        assert_eq!(normalize_blocks(&blocks).unwrap(), "plain answer");
    }

    #[test]
    fn test_unknown_blocks_only_is_format_error() {
        let blocks = vec![ResponseBlock::Other];
        assert!(normalize_blocks(&blocks).is_err());
    }

    #[test]
    fn test_empty_text_block_still_counts() {
        let response = ChatResponse::from_text("");
        assert_eq!(normalize(&response).unwrap(), "");
    }
}
