use std::collections::HashMap;
use std::sync::Arc;

use sa_domain::error::{Error, Result};
use sa_domain::tool::ToolDefinition;

/// A tool implementation the DAG executor can invoke for a `tool` task.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value>;
}

/// Name-keyed tool lookup: definitions (for schema validation, also exposed
/// to the planner LLM) plus their handlers.
#[derive(Default)]
pub struct ToolRegistry {
    defs: HashMap<String, ToolDefinition>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: ToolDefinition, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(def.name.clone(), handler);
        self.defs.insert(def.name.clone(), def);
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.defs.values().cloned().collect()
    }

    /// Validate `params` against the tool's declared JSON-schema `required`
    /// array (a lightweight check, not full schema validation — this corpus
    /// carries no JSON-schema-validator dependency) and invoke the handler.
    pub async fn invoke(&self, tool_name: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let def = self
            .defs
            .get(tool_name)
            .ok_or_else(|| Error::PermanentInput(format!("unknown tool '{tool_name}'")))?;
        validate_required(&def.parameters, &params)
            .map_err(|missing| Error::PermanentInput(format!("tool '{tool_name}' missing required param '{missing}'")))?;

        let handler = self
            .handlers
            .get(tool_name)
            .ok_or_else(|| Error::PermanentInput(format!("no handler registered for tool '{tool_name}'")))?;
        handler.invoke(params).await
    }
}

/// Returns `Err(field_name)` for the first declared-required field missing
/// from `params`.
fn validate_required(schema: &serde_json::Value, params: &serde_json::Value) -> std::result::Result<(), String> {
    let Some(required) = schema.get("required").and_then(|r| r.as_array()) else {
        return Ok(());
    };
    for field in required {
        let Some(name) = field.as_str() else { continue };
        if params.get(name).is_none() {
            return Err(name.to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl ToolHandler for EchoTool {
        async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value> {
            Ok(params)
        }
    }

    fn registry() -> ToolRegistry {
        let mut reg = ToolRegistry::new();
        reg.register(
            ToolDefinition {
                name: "echo".to_string(),
                description: "echoes back its input".to_string(),
                parameters: json!({"type": "object", "required": ["text"]}),
            },
            Arc::new(EchoTool),
        );
        reg
    }

    #[tokio::test]
    async fn invokes_registered_tool() {
        let reg = registry();
        let out = reg.invoke("echo", json!({"text": "hi"})).await.unwrap();
        assert_eq!(out, json!({"text": "hi"}));
    }

    #[tokio::test]
    async fn unknown_tool_errors() {
        let reg = registry();
        assert!(reg.invoke("missing", json!({})).await.is_err());
    }

    #[tokio::test]
    async fn missing_required_param_errors() {
        let reg = registry();
        assert!(reg.invoke("echo", json!({})).await.is_err());
    }
}
