//! Builtin tool catalog bound to the backlog store.

use super::{ParamKind, ToolDescriptor, ToolParam};
use crate::infrastructure::backlog::BacklogStore;
use serde_json::{Value, json};
use std::sync::Arc;

/// Descriptors for the backlog tools. Callers pick the subset each agent is
/// configured with and register it into that agent's registry.
pub fn backlog_tools(store: &Arc<BacklogStore>) -> Vec<ToolDescriptor> {
    let story_store = store.clone();
    let subtask_store = store.clone();

    vec![
        ToolDescriptor::new(
            "create_user_story",
            "Records a user story in the product backlog and returns its id.",
            vec![ToolParam::new("user_story", ParamKind::String)],
            Box::new(move |args| {
                let user_story = args
                    .get("user_story")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let id = story_store.create_user_story(user_story)?;
                Ok(json!({ "user_story_id": id }))
            }),
        ),
        ToolDescriptor::new(
            "create_subtask",
            "Records a subtask under an existing user story and returns its id.",
            vec![
                ToolParam::new("user_story_id", ParamKind::Integer),
                ToolParam::new("subtask", ParamKind::String),
            ],
            Box::new(move |args| {
                let user_story_id = args
                    .get("user_story_id")
                    .and_then(Value::as_u64)
                    .unwrap_or_default();
                let subtask = args.get("subtask").and_then(Value::as_str).unwrap_or_default();
                let id = subtask_store.create_subtask(user_story_id, subtask)?;
                Ok(json!({ "subtask_id": id }))
            }),
        ),
    ]
}
