//! Wire types for the skill registry API.
//!
//! Registry records are loosely shaped: fields may be missing, renamed
//! extras are common, and numeric columns sometimes arrive as strings.
//! Every field this server consumes is declared here as optional so the
//! normalization rules in `crate::tools` can be stated per field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registry identifier of a skill: numeric in most deployments,
/// an opaque string in others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillId::Number(n) => write!(f, "{n}"),
            SkillId::Text(s) => f.write_str(s),
        }
    }
}

/// A skill record as returned by the registry.
///
/// A field with an unexpected JSON type reads as `None` rather than
/// failing the record, so one odd column never hides a whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkill {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<SkillId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub capabilities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub endpoint: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub auth_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub docs_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub homepage_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pricing_model: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cost_estimate: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub verified: Option<bool>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub trust_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub relevance_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub why_relevant: Option<String>,
    #[serde(default)]
    pub quick_start: Option<Value>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub uptime_7d: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub usage_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub example_request: Option<Value>,
    #[serde(default)]
    pub example_response: Option<Value>,
}

impl RawSkill {
    /// Price signal shown to the agent: `cost_estimate` when set and
    /// non-empty, otherwise `pricing_model`.
    pub fn pricing(&self) -> Option<&str> {
        non_empty(self.cost_estimate.as_deref()).or(self.pricing_model.as_deref())
    }

    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A page of skills, as returned by the discover and listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillPage {
    #[serde(default)]
    pub skills: Option<Vec<RawSkill>>,
    /// Total matches reported by the registry, when it reports one.
    #[serde(default, deserialize_with = "lenient::u64")]
    pub total: Option<u64>,
}

impl SkillPage {
    pub fn is_empty(&self) -> bool {
        self.skills.as_ref().map_or(true, Vec::is_empty)
    }

    /// Consumes the page, returning its records (empty when absent).
    pub fn into_skills(self) -> Vec<RawSkill> {
        self.skills.unwrap_or_default()
    }
}

/// Skill category accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Api,
    Library,
    Tool,
    Dataset,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Api,
        SkillCategory::Library,
        SkillCategory::Tool,
        SkillCategory::Dataset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Api => "api",
            SkillCategory::Library => "library",
            SkillCategory::Tool => "tool",
            SkillCategory::Dataset => "dataset",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}' (expected api, library, tool or dataset)"))
    }
}

/// Filters for the listing endpoint. Only the filters that are set
/// end up in the query string; `limit` is always sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListFilters {
    pub category: Option<SkillCategory>,
    pub verified: Option<bool>,
    pub limit: u64,
}

impl ListFilters {
    /// Query parameters in the order the registry documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(verified) = self.verified {
            pairs.push(("verified", verified.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// Deserializers that coerce the common alternate encodings (numbers as
/// strings, booleans as 0/1, numbers where text is expected) and map
/// anything else to `None` instead of failing the whole record.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::SkillId;

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// `true`/`false`, `1`/`0` (SQLite-style), or their string forms.
    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Bool(b)) => Some(b),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if f == 1.0 => Some(true),
                Some(f) if f == 0.0 => Some(false),
                _ => None,
            },
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.and_then(text))
    }

    /// A list of strings; elements that are not text or numbers are dropped.
    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(items.into_iter().filter_map(text).collect()),
            _ => None,
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SkillId>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => Some(match n.as_i64() {
                Some(i) => SkillId::Number(i),
                None => SkillId::Text(n.to_string()),
            }),
            Some(Value::String(s)) => Some(SkillId::Text(s)),
            _ => None,
        })
    }

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
