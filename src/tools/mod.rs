pub mod args;
pub mod catalog;
pub mod details;
pub mod discover;
pub mod list;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::registry::RegistryError;

pub use catalog::ToolCatalog;
pub use details::GetSkillDetailsTool;
pub use discover::DiscoverSkillsTool;
pub use list::ListSkillsTool;

/// Failure of a tool invocation.
///
/// Every variant is converted into an error-flagged result by the
/// dispatcher; none of them reaches the protocol layer as a JSON-RPC error.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("Skill not found: {0}. Try using discover_skills first.")]
    NotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A tool the agent can invoke through `tools/call`.
///
/// Each tool declares its name, a description shown to the LLM, and the
/// JSON Schema of its arguments. `execute()` returns the normalized,
/// JSON-serializable result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier advertised in `tools/list`.
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM so it knows
    /// when to invoke this tool.
    fn description(&self) -> &str;

    /// JSON Schema describing the arguments this tool accepts.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, params: Value) -> Result<Value, ToolError>;
}
