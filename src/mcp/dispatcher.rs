//! Tool dispatch.
//!
//! Resolves an invocation to a catalog entry, runs it, and wraps the
//! outcome in a [`CallToolResult`]. This is the one boundary where tool
//! failures stop propagating: the caller always gets a well-formed
//! envelope, with `isError` set when something went wrong.

use serde_json::Value;
use tracing::{debug, warn};

use super::protocol::CallToolResult;
use crate::tools::{ToolCatalog, ToolError};

pub struct Dispatcher {
    catalog: ToolCatalog,
}

impl Dispatcher {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub async fn dispatch(&self, name: &str, arguments: Value) -> CallToolResult {
        match self.invoke(name, arguments).await {
            Ok(text) => {
                let result = CallToolResult::success(text);
                debug!("Tool {name} succeeded ({} bytes)", result.text().len());
                result
            }
            Err(e) => {
                warn!("Tool {name} failed: {e}");
                CallToolResult::error(format!("Error: {e}"))
            }
        }
    }

    async fn invoke(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let tool = self
            .catalog
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let result = tool.execute(arguments).await?;
        Ok(serde_json::to_string_pretty(&result)?)
    }
}
