//! Tool: discover skills by natural-language intent.
//!
//! Forwards the intent to the registry's semantic search and reshapes
//! each hit into a [`SkillSummary`]. An empty result is a normal outcome
//! and carries suggestions for refining the query.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{args, Tool, ToolError};
use crate::registry::{RawSkill, RegistryClient, SkillPage};

/// Number of results requested when the caller gives no limit.
pub const DEFAULT_LIMIT: u64 = 5;

/// A discovered skill, as shown to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSummary {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub capabilities: Option<Vec<String>>,
    pub endpoint: Option<String>,
    pub auth_type: Option<String>,
    /// `cost_estimate`, falling back to `pricing_model`
    pub pricing: Option<String>,
    pub trust_score: Option<f64>,
    pub relevance_score: Option<f64>,
    pub why_relevant: Option<String>,
    pub quick_start: Option<Value>,
}

impl From<RawSkill> for SkillSummary {
    fn from(skill: RawSkill) -> Self {
        let pricing = skill.pricing().map(str::to_string);
        Self {
            name: skill.name,
            slug: skill.slug,
            description: skill.description,
            category: skill.category,
            capabilities: skill.capabilities,
            endpoint: skill.endpoint,
            auth_type: skill.auth_type,
            pricing,
            trust_score: skill.trust_score,
            relevance_score: skill.relevance_score,
            why_relevant: skill.why_relevant,
            quick_start: skill.quick_start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiscoverOutcome {
    NoMatches {
        message: String,
        suggestions: Vec<String>,
    },
    Found {
        query: String,
        results_count: usize,
        skills: Vec<SkillSummary>,
        next_steps: Vec<String>,
    },
}

impl DiscoverOutcome {
    fn from_page(intent: &str, page: SkillPage) -> Self {
        if page.is_empty() {
            return DiscoverOutcome::NoMatches {
                message: format!("No skills found for intent: \"{intent}\""),
                suggestions: vec![
                    "Try rephrasing your query".to_string(),
                    "Be more specific about what you want to do".to_string(),
                    "Example intents: \"send emails\", \"process payments\", \"get weather data\""
                        .to_string(),
                ],
            };
        }

        let skills: Vec<SkillSummary> = page
            .into_skills()
            .into_iter()
            .map(SkillSummary::from)
            .collect();

        DiscoverOutcome::Found {
            query: intent.to_string(),
            results_count: skills.len(),
            skills,
            next_steps: vec![
                "Use get_skill_details with slug to see full documentation".to_string(),
                "Try different queries to find alternatives".to_string(),
                "Check trust_score and pricing before using".to_string(),
            ],
        }
    }
}

pub struct DiscoverSkillsTool {
    registry: Arc<RegistryClient>,
}

impl DiscoverSkillsTool {
    pub fn new(registry: Arc<RegistryClient>) -> Self {
        Self { registry }
    }

    pub async fn discover(&self, intent: &str, limit: u64) -> Result<DiscoverOutcome, ToolError> {
        debug!("Discovering skills for intent \"{intent}\" (limit {limit})");
        let page = self.registry.discover(intent, limit).await?;
        Ok(DiscoverOutcome::from_page(intent, page))
    }
}

#[async_trait]
impl Tool for DiscoverSkillsTool {
    fn name(&self) -> &str {
        "discover_skills"
    }

    fn description(&self) -> &str {
        "Search for APIs, tools, and services using natural language. Returns the top 5 \
         most relevant resources based on semantic similarity."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "intent": {
                    "type": "string",
                    "description": "What you want to do in natural language. Examples: \
                        \"send transactional emails\", \"accept credit card payments\", \
                        \"get weather forecast\""
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of results to return (default: 5)",
                    "default": DEFAULT_LIMIT
                }
            },
            "required": ["intent"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let intent = args::required_str(&params, "intent")?;
        let limit = args::optional_count(&params, "limit")?.unwrap_or(DEFAULT_LIMIT);
        let outcome = self.discover(intent, limit).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
