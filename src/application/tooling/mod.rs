//! Tool registry and invoker.
//!
//! Tools are registered once as closed descriptors (name, description, typed
//! parameter list, bound handler) and invoked by name with raw arguments
//! parsed out of model output. Every invocation outcome, success or failure,
//! is converted into a natural-language acknowledgment string that re-enters
//! the conversation; invocation never raises past this module.

mod parser;

pub mod builtin;

pub use parser::parse_tool_calls;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Tools whose name starts with this prefix are internal: invokable, but
/// never advertised in the manifest.
const INTERNAL_PREFIX: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamKind {
    pub fn type_tag(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
        }
    }

    /// Maps a declared type name onto a kind; unknown names fall back to
    /// String.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "integer" => ParamKind::Integer,
            "number" => ParamKind::Number,
            "boolean" => ParamKind::Boolean,
            "object" => ParamKind::Object,
            "array" => ParamKind::Array,
            _ => ParamKind::String,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolParam {
    pub name: String,
    pub kind: ParamKind,
}

impl ToolParam {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

pub type ToolHandler = Box<
    dyn Fn(&Map<String, Value>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// A registered tool: immutable once registered.
pub struct ToolDescriptor {
    name: String,
    description: String,
    params: Vec<ToolParam>,
    handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        params: Vec<ToolParam>,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A tool invocation parsed from one model response. Constructed by
/// [`parse_tool_calls`], consumed immediately by [`ToolRegistry::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub tool: String,
    pub args: Map<String, Value>,
}

/// Manifest of the advertised tools, with JSON-schema-like parameter typing.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ToolManifest {
    pub entries: Vec<ManifestEntry>,
}

impl ToolManifest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub description: String,
    pub params: Vec<ManifestParam>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: &'static str,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("tool '{tool}' is missing required argument '{arg}'")]
    MissingArgument { tool: String, arg: String },
    #[error("argument '{arg}' of tool '{tool}' is not a valid {expected}")]
    InvalidArgumentType {
        tool: String,
        arg: String,
        expected: &'static str,
    },
    #[error("failed to execute tool '{tool}': {source}")]
    Execution {
        tool: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ToolError {
    /// Converts the failure into conversation text spoken by the agent.
    pub fn acknowledgment(&self) -> String {
        match self {
            ToolError::UnknownTool(name) => {
                format!("I tried to use the tool '{name}', but no such tool is available.")
            }
            ToolError::MissingArgument { tool, arg } => {
                format!(
                    "I tried to use the tool '{tool}', but the required argument '{arg}' was missing."
                )
            }
            ToolError::InvalidArgumentType {
                tool,
                arg,
                expected,
            } => {
                format!(
                    "I tried to use the tool '{tool}', but the argument '{arg}' was not a valid {expected}."
                )
            }
            ToolError::Execution { tool, source } => {
                format!("I tried to use the tool '{tool}', but it failed: {source}")
            }
        }
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        let key = descriptor.name.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(RegistryError::Duplicate(descriptor.name));
        }
        self.index.insert(key, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Produces the advertised manifest, skipping internal tools. Each
    /// description is reduced to its first paragraph.
    pub fn describe(&self) -> ToolManifest {
        let entries = self
            .tools
            .iter()
            .filter(|tool| !tool.name.starts_with(INTERNAL_PREFIX))
            .map(|tool| ManifestEntry {
                name: tool.name.clone(),
                description: tool
                    .description
                    .split("\n\n")
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                params: tool
                    .params
                    .iter()
                    .map(|param| ManifestParam {
                        name: param.name.clone(),
                        type_tag: param.kind.type_tag(),
                    })
                    .collect(),
            })
            .collect();
        ToolManifest { entries }
    }

    /// Executes a tool by name and reports the outcome as conversation text.
    /// Lookup failures, argument validation failures, and execution faults
    /// all come back as acknowledgment strings, never as errors.
    pub fn invoke(&self, name: &str, args: &Map<String, Value>) -> String {
        match self.try_invoke(name, args) {
            Ok(outcome) => {
                info!(tool = name, "Tool executed");
                success_acknowledgment(name, &outcome)
            }
            Err(err) => {
                warn!(tool = name, %err, "Tool invocation failed");
                err.acknowledgment()
            }
        }
    }

    fn try_invoke(&self, name: &str, args: &Map<String, Value>) -> Result<Value, ToolError> {
        let descriptor = self
            .index
            .get(&name.to_lowercase())
            .map(|&idx| &self.tools[idx])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let mut coerced = Map::new();
        for param in &descriptor.params {
            let raw = args
                .get(&param.name)
                .ok_or_else(|| ToolError::MissingArgument {
                    tool: descriptor.name.clone(),
                    arg: param.name.clone(),
                })?;
            coerced.insert(param.name.clone(), coerce(&descriptor.name, param, raw)?);
        }

        (descriptor.handler)(&coerced).map_err(|source| ToolError::Execution {
            tool: descriptor.name.clone(),
            source,
        })
    }
}

/// Integer and string arguments are coerced to their declared kind; every
/// other kind passes through unconverted.
fn coerce(tool: &str, param: &ToolParam, raw: &Value) -> Result<Value, ToolError> {
    match param.kind {
        ParamKind::Integer => match raw {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(raw.clone()),
            Value::String(s) => s.trim().parse::<i64>().map(Value::from).map_err(|_| {
                ToolError::InvalidArgumentType {
                    tool: tool.to_string(),
                    arg: param.name.clone(),
                    expected: "integer",
                }
            }),
            _ => Err(ToolError::InvalidArgumentType {
                tool: tool.to_string(),
                arg: param.name.clone(),
                expected: "integer",
            }),
        },
        ParamKind::String => Ok(Value::String(match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
        _ => Ok(raw.clone()),
    }
}

fn success_acknowledgment(name: &str, outcome: &Value) -> String {
    match outcome {
        Value::Null => format!("Tool '{name}' executed successfully."),
        Value::String(text) => format!("Tool '{name}' executed successfully: {text}"),
        other => format!("Tool '{name}' executed successfully with result {other}."),
    }
}
