//! Tool: full details of a single skill.
//!
//! The identifier the agent passes is usually a slug taken from a
//! discover result, but may also be a registry id. The lookup tries the
//! slug first and falls back to the id exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{args, Tool, ToolError};
use crate::registry::{RawSkill, RegistryClient, SkillId};

const VERIFIED_TIP: &str = "✅ This is a verified skill";
const UNVERIFIED_TIP: &str = "⚠️ Unverified - use with caution";

/// Everything the registry knows about one skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDetail {
    pub id: Option<SkillId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub capabilities: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub endpoint: Option<String>,
    pub auth_type: Option<String>,
    pub docs_url: Option<String>,
    pub homepage_url: Option<String>,
    pub github_url: Option<String>,
    pub pricing_model: Option<String>,
    pub cost_estimate: Option<String>,
    pub verified: Option<bool>,
    pub trust_score: Option<f64>,
    pub uptime_7d: Option<f64>,
    pub rating: Option<f64>,
    pub usage_count: Option<u64>,
    pub code_snippet: Option<String>,
    pub example_request: Option<Value>,
    pub example_response: Option<Value>,
}

impl From<RawSkill> for SkillDetail {
    fn from(skill: RawSkill) -> Self {
        Self {
            id: skill.id,
            name: skill.name,
            slug: skill.slug,
            description: skill.description,
            long_description: skill.long_description,
            category: skill.category,
            capabilities: skill.capabilities,
            tags: skill.tags,
            endpoint: skill.endpoint,
            auth_type: skill.auth_type,
            docs_url: skill.docs_url,
            homepage_url: skill.homepage_url,
            github_url: skill.github_url,
            pricing_model: skill.pricing_model,
            cost_estimate: skill.cost_estimate,
            verified: skill.verified,
            trust_score: skill.trust_score,
            uptime_7d: skill.uptime_7d,
            rating: skill.rating,
            usage_count: skill.usage_count,
            code_snippet: skill.code_snippet,
            example_request: skill.example_request,
            example_response: skill.example_response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsOutcome {
    pub skill: SkillDetail,
    pub usage_tips: Vec<String>,
}

impl From<RawSkill> for DetailsOutcome {
    fn from(skill: RawSkill) -> Self {
        let usage_tips = usage_tips(&skill);
        Self {
            skill: SkillDetail::from(skill),
            usage_tips,
        }
    }
}

/// Practical hints for calling the skill: docs, auth, price and trust.
fn usage_tips(skill: &RawSkill) -> Vec<String> {
    vec![
        format!(
            "Read the documentation at: {}",
            skill.docs_url.as_deref().filter(|u| !u.is_empty()).unwrap_or("N/A")
        ),
        format!(
            "Authentication type: {}",
            skill.auth_type.as_deref().unwrap_or("N/A")
        ),
        format!("Pricing: {}", skill.pricing().unwrap_or("N/A")),
        if skill.is_verified() {
            VERIFIED_TIP.to_string()
        } else {
            UNVERIFIED_TIP.to_string()
        },
    ]
}

pub struct GetSkillDetailsTool {
    registry: Arc<RegistryClient>,
}

impl GetSkillDetailsTool {
    pub fn new(registry: Arc<RegistryClient>) -> Self {
        Self { registry }
    }

    pub async fn details(&self, skill_id: &str) -> Result<DetailsOutcome, ToolError> {
        let skill = self.lookup_skill(skill_id).await?;
        Ok(DetailsOutcome::from(skill))
    }

    /// Two-branch lookup: by slug, then by id when the slug matched nothing.
    ///
    /// An empty slug result is not an error, it only selects the id branch.
    /// A registry failure on either branch, or an empty id result, is
    /// reported as `NotFound`.
    async fn lookup_skill(&self, skill_id: &str) -> Result<RawSkill, ToolError> {
        let by_slug = self
            .registry
            .find_by_slug(skill_id)
            .await
            .map_err(|e| {
                warn!("Slug lookup for '{skill_id}' failed: {e}");
                ToolError::NotFound(skill_id.to_string())
            })?;

        if let Some(skill) = by_slug.into_skills().into_iter().next() {
            return Ok(skill);
        }

        debug!("No skill with slug '{skill_id}', trying it as an id");

        self.registry
            .get_by_id(skill_id)
            .await
            .map_err(|e| {
                warn!("Id lookup for '{skill_id}' failed: {e}");
                ToolError::NotFound(skill_id.to_string())
            })?
            .ok_or_else(|| ToolError::NotFound(skill_id.to_string()))
    }
}

#[async_trait]
impl Tool for GetSkillDetailsTool {
    fn name(&self) -> &str {
        "get_skill_details"
    }

    fn description(&self) -> &str {
        "Get detailed information about a specific API or tool by its slug or ID. Returns \
         endpoint, authentication, pricing, documentation, and usage examples."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "skill_id": {
                    "type": "string",
                    "description": "The slug or ID of the skill (e.g., \"resend-email-api\", \
                        \"stripe-payment-api\")"
                }
            },
            "required": ["skill_id"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let skill_id = args::required_str(&params, "skill_id")?;
        let outcome = self.details(skill_id).await?;
        Ok(serde_json::to_value(outcome)?)
    }
}
