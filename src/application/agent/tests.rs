use super::runner::parse_decision;
use super::*;
use crate::application::tooling::{ParamKind, ToolDescriptor, ToolParam, ToolRegistry};
use crate::domain::types::thoughts_role;
use crate::infrastructure::model::{
    GenerateRequest, GenerateResponse, ModelError, ModelProvider, SamplingOptions,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

#[derive(Clone)]
struct ScriptedProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn requests(&self) -> Vec<GenerateRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        }
        let response = responses.remove(0);
        self.recordings.lock().await.push(request);
        Ok(GenerateResponse { text: response })
    }
}

struct FailingProvider;

#[async_trait]
impl ModelProvider for FailingProvider {
    async fn complete(&self, _request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        Err(ModelError::invalid_response("scripted", "endpoint down"))
    }
}

fn developer(provider: &ScriptedProvider, registry: ToolRegistry, dir: &TempDir) -> Agent {
    Agent::new(
        AgentSpec {
            role: "Developer".into(),
            model: "llama3.1:8b-instruct-q8_0".into(),
            system_message: "You are a skilled developer in the team.".into(),
            is_human: false,
        },
        registry,
        Arc::new(provider.clone()),
        SamplingOptions::default(),
        4,
        dir.path(),
    )
}

#[test]
fn decision_yes_is_case_insensitive_substring() {
    assert!(parse_decision("I have thought about it. DECISION: YES"));
    assert!(parse_decision("decision: yes, because the sprint goal is unclear"));
}

#[test]
fn decision_defaults_to_no() {
    assert!(!parse_decision("Thinking about it. Decision: No"));
    assert!(!parse_decision("I am really not sure."));
    assert!(!parse_decision(""));
}

#[tokio::test]
async fn take_turn_deliberates_then_speaks() {
    let provider = ScriptedProvider::new(vec![
        "The owner just spoke, let them finish. Decision: No",
        "Still no open question for me. Decision: no",
        "Maybe I should weigh in soon. DECISION: NO",
        "The plan needs my input now. Decision: Yes",
        "Looks good",
    ]);
    let dir = TempDir::new().expect("tempdir");
    let mut agent = developer(&provider, ToolRegistry::new(), &dir);

    let spoken = agent.take_turn().await.expect("turn succeeds");
    assert_eq!(spoken.as_deref(), Some("Looks good"));

    assert_eq!(provider.requests().await.len(), 5);

    let thoughts = thoughts_role("Developer");
    let history = agent.history();
    assert_eq!(
        history.iter().filter(|m| m.role == thoughts).count(),
        3,
        "one private thought per declined deliberation"
    );
    let last = history.last().expect("non-empty history");
    assert_eq!(last.role, "Developer");
    assert_eq!(last.content, "Looks good");
}

#[tokio::test]
async fn take_turn_yields_after_max_deliberations() {
    let provider = ScriptedProvider::new(vec![
        "Not my turn. Decision: No",
        "Not my turn. Decision: No",
        "Not my turn. Decision: No",
        "Not my turn. Decision: No",
    ]);
    let dir = TempDir::new().expect("tempdir");
    let mut agent = developer(&provider, ToolRegistry::new(), &dir);

    let spoken = agent.take_turn().await.expect("turn succeeds");
    assert!(spoken.is_none());
    assert_eq!(provider.requests().await.len(), 4);
}

#[tokio::test]
async fn decision_prompt_carries_history_and_elicitation() {
    let provider = ScriptedProvider::new(vec!["Quiet for now. Decision: No"]);
    let dir = TempDir::new().expect("tempdir");
    let mut agent = developer(&provider, ToolRegistry::new(), &dir);
    agent.observe_message("Product Owner", "This sprint we build the login page.");

    let (retain, _) = agent.decide_retain_floor().await.expect("decision succeeds");
    assert!(!retain);

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("This sprint we build the login page."));
    assert!(requests[0].prompt.contains("'Decision: Yes' or 'Decision: No'"));
}

#[tokio::test]
async fn generate_response_executes_embedded_tool_calls() {
    let recorded = Arc::new(std::sync::Mutex::new(Value::Null));
    let seen = recorded.clone();
    let mut registry = ToolRegistry::new();
    registry
        .register(ToolDescriptor::new(
            "create_user_story",
            "Records a user story in the product backlog and returns its id.",
            vec![ToolParam::new("user_story", ParamKind::String)],
            Box::new(move |args| {
                *seen.lock().unwrap() = args["user_story"].clone();
                Ok(json!({"user_story_id": 1}))
            }),
        ))
        .unwrap();

    let provider = ScriptedProvider::new(vec![
        "Time to record this. Decision: Yes",
        r#"{"tool": "create_user_story", "args": {"user_story": "As a user, I want to log in."}}"#,
    ]);
    let dir = TempDir::new().expect("tempdir");
    let mut agent = developer(&provider, registry, &dir);

    let spoken = agent.take_turn().await.expect("turn succeeds");
    let response = spoken.expect("agent speaks");
    assert!(response.contains("create_user_story"));
    assert!(response.contains("user_story_id"));
    assert_eq!(*recorded.lock().unwrap(), json!("As a user, I want to log in."));

    let last = agent.history().last().expect("non-empty history");
    assert_eq!(last.role, "Developer");
    assert_eq!(last.content, response);
}

#[tokio::test]
async fn gateway_failure_aborts_the_turn() {
    let dir = TempDir::new().expect("tempdir");
    let mut agent = Agent::new(
        AgentSpec {
            role: "Developer".into(),
            model: "llama3.1:8b-instruct-q8_0".into(),
            system_message: String::new(),
            is_human: false,
        },
        ToolRegistry::new(),
        Arc::new(FailingProvider),
        SamplingOptions::default(),
        4,
        dir.path(),
    );

    let err = agent.take_turn().await.expect_err("turn fails");
    assert!(matches!(err, AgentError::Model(_)));
}
