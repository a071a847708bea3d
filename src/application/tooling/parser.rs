//! Structured tool-call grammar.
//!
//! A response may contain any number of invocations, each a single-line JSON
//! object `{"tool": <name>, "args": {...}}`, separated by semicolons. Marker
//! tokens the model wraps around code output are stripped before decoding.
//! Segments that do not decode to a tool call are dropped, not fatal.

use super::ToolCall;
use crate::application::prompt::{EOM, EOT, PYTHON_TAG};
use serde_json::{Map, Value};
use tracing::debug;

const MARKERS: [&str; 3] = [PYTHON_TAG, EOM, EOT];

/// Extracts every well-formed tool call from one model response, in
/// left-to-right order. Returns an empty vector for plain speech.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    let mut cleaned = text.to_string();
    for marker in MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    cleaned.split(';').filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<ToolCall> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(segment) {
        Ok(value) => value,
        Err(err) => {
            debug!(%err, "Discarding segment that is not a tool call");
            return None;
        }
    };

    let Value::Object(map) = value else {
        debug!("Discarding non-object tool call segment");
        return None;
    };

    let Some(tool) = map.get("tool").and_then(Value::as_str) else {
        debug!("Discarding tool call segment without a tool name");
        return None;
    };

    let args = match map.get("args") {
        None => Map::new(),
        Some(Value::Object(args)) => args.clone(),
        Some(_) => {
            debug!(tool, "Discarding tool call with non-object args");
            return None;
        }
    };

    Some(ToolCall {
        tool: tool.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_speech_has_no_calls() {
        assert!(parse_tool_calls("I think we should split this story; it is too big.").is_empty());
    }

    #[test]
    fn single_call_is_parsed() {
        let calls =
            parse_tool_calls(r#"{"tool": "create_user_story", "args": {"user_story": "As a user..."}}"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, "create_user_story");
        assert_eq!(calls[0].args["user_story"], json!("As a user..."));
    }

    #[test]
    fn marker_tokens_are_stripped() {
        let text = format!(r#"{PYTHON_TAG}{{"tool": "create_user_story", "args": {{}}}}{EOM}"#);
        let calls = parse_tool_calls(&text);
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn multiple_calls_keep_left_to_right_order() {
        let text = r#"{"tool": "a", "args": {}}; {"tool": "b", "args": {}}"#;
        let tools: Vec<_> = parse_tool_calls(text)
            .into_iter()
            .map(|call| call.tool)
            .collect();
        assert_eq!(tools, vec!["a", "b"]);
    }

    #[test]
    fn malformed_segments_are_dropped_and_rest_survive() {
        let text = r#"{"tool": "a", "args": {}}; {not json}; {"note": "no tool"}; {"tool": "b"}"#;
        let tools: Vec<_> = parse_tool_calls(text)
            .into_iter()
            .map(|call| call.tool)
            .collect();
        // a missing args field defaults to empty args; a missing tool field is dropped
        assert_eq!(tools, vec!["a", "b"]);
    }

    #[test]
    fn non_object_args_are_rejected() {
        assert!(parse_tool_calls(r#"{"tool": "a", "args": "oops"}"#).is_empty());
    }
}
