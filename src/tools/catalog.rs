use std::sync::Arc;

use crate::mcp::protocol::ToolDeclaration;
use crate::registry::RegistryClient;

use super::{DiscoverSkillsTool, GetSkillDetailsTool, ListSkillsTool, Tool};

/// The fixed, ordered set of tools this server exposes.
///
/// Built once at startup and never mutated; the order is the order
/// advertised in `tools/list`.
pub struct ToolCatalog {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolCatalog {
    pub fn new(registry: Arc<RegistryClient>) -> Self {
        Self::with_tools(vec![
            Box::new(DiscoverSkillsTool::new(Arc::clone(&registry))),
            Box::new(GetSkillDetailsTool::new(Arc::clone(&registry))),
            Box::new(ListSkillsTool::new(registry)),
        ])
    }

    pub(crate) fn with_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Resolves a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| &**tool)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Declarations for `tools/list`, in catalog order.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools
            .iter()
            .map(|tool| ToolDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters_schema(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;

    fn catalog() -> ToolCatalog {
        let registry = RegistryClient::new(&RegistryConfig::default()).unwrap();
        ToolCatalog::new(Arc::new(registry))
    }

    #[test]
    fn test_catalog_has_three_tools_in_order() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.names(),
            vec!["discover_skills", "get_skill_details", "list_skills"]
        );
    }

    #[test]
    fn test_get_exact_match_only() {
        let catalog = catalog();
        assert!(catalog.get("list_skills").is_some());
        assert!(catalog.get("List_Skills").is_none());
        assert!(catalog.get("list_skills ").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_declarations_have_object_schemas() {
        let declarations = catalog().declarations();
        assert_eq!(declarations.len(), 3);
        for declaration in &declarations {
            assert!(!declaration.description.is_empty());
            assert_eq!(declaration.input_schema["type"], "object");
        }
        assert_eq!(declarations[1].input_schema["required"][0], "skill_id");
    }

    #[test]
    fn test_declarations_are_stable() {
        let catalog = catalog();
        let first = serde_json::to_value(catalog.declarations()).unwrap();
        let second = serde_json::to_value(catalog.declarations()).unwrap();
        assert_eq!(first, second);
    }
}
