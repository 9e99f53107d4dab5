//! Tool: browse the registry with optional filters.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{args, Tool, ToolError};
use crate::registry::{ListFilters, RawSkill, RegistryClient, SkillCategory, SkillPage};

/// Number of results requested when the caller gives no limit.
pub const DEFAULT_LIMIT: u64 = 20;

/// Reduced summary used in listings. There is no search intent here,
/// so relevance fields are not carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedSkill {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub verified: Option<bool>,
    pub trust_score: Option<f64>,
    /// `pricing_model` only
    pub pricing: Option<String>,
}

impl From<RawSkill> for ListedSkill {
    fn from(skill: RawSkill) -> Self {
        Self {
            name: skill.name,
            slug: skill.slug,
            description: skill.description,
            category: skill.category,
            verified: skill.verified,
            trust_score: skill.trust_score,
            pricing: skill.pricing_model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListOutcome {
    NoMatches {
        message: String,
        total: u64,
        skills: Vec<ListedSkill>,
    },
    Found {
        total: u64,
        filters: ListFilters,
        skills: Vec<ListedSkill>,
        tip: String,
    },
}

impl ListOutcome {
    fn from_page(filters: ListFilters, page: SkillPage) -> Self {
        if page.is_empty() {
            return ListOutcome::NoMatches {
                message: "No skills found matching your criteria".to_string(),
                total: 0,
                skills: Vec::new(),
            };
        }

        let reported_total = page.total.filter(|t| *t > 0);
        let skills: Vec<ListedSkill> = page
            .into_skills()
            .into_iter()
            .map(ListedSkill::from)
            .collect();

        ListOutcome::Found {
            // The registry total may exceed the page; without one, the page is all we know
            total: reported_total.unwrap_or(skills.len() as u64),
            filters,
            skills,
            tip: "Use get_skill_details with any slug to see full information".to_string(),
        }
    }
}

pub struct ListSkillsTool {
    registry: Arc<RegistryClient>,
}

impl ListSkillsTool {
    pub fn new(registry: Arc<RegistryClient>) -> Self {
        Self { registry }
    }

    pub async fn list(&self, filters: ListFilters) -> Result<ListOutcome, ToolError> {
        debug!(
            "Listing skills (category: {:?}, verified: {:?}, limit: {})",
            filters.category, filters.verified, filters.limit
        );
        let page = self.registry.list(&filters).await?;
        Ok(ListOutcome::from_page(filters, page))
    }
}

fn parse_filters(params: &Value) -> Result<ListFilters, ToolError> {
    let category = args::optional_str(params, "category")?
        .map(|c| c.parse::<SkillCategory>())
        .transpose()
        .map_err(|e| ToolError::InvalidArguments(format!("Invalid parameter: {e}")))?;

    Ok(ListFilters {
        category,
        verified: args::optional_bool(params, "verified")?,
        limit: args::optional_count(params, "limit")?.unwrap_or(DEFAULT_LIMIT),
    })
}

#[async_trait]
impl Tool for ListSkillsTool {
    fn name(&self) -> &str {
        "list_skills"
    }

    fn description(&self) -> &str {
        "List all available skills, optionally filtered by category or verification status. \
         Useful for browsing what's available."
    }

    fn parameters_schema(&self) -> Value {
        let categories: Vec<&str> = SkillCategory::ALL.iter().map(SkillCategory::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Filter by category: api, library, tool, dataset",
                    "enum": categories
                },
                "verified": {
                    "type": "boolean",
                    "description": "Only show verified skills"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of results (default: 20)",
                    "default": DEFAULT_LIMIT
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let filters = parse_filters(&params)?;
        let outcome = self.list(filters).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
