//! Shapes the model must answer in, one per structured step.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::pipeline::state::Step;
use crate::ports::ResponseSchema;

/// What the project is and who it is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSummary {
    /// Two or three sentence overview.
    pub summary: String,
    /// The problem the project solves.
    #[serde(default)]
    pub purpose: String,
    /// Languages, frameworks and major libraries.
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Headline capabilities.
    #[serde(default)]
    pub key_features: Vec<String>,
    /// Intended users.
    #[serde(default)]
    pub target_audience: String,
}

/// One architectural component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Component {
    /// Component name.
    pub name: String,
    /// What it is responsible for.
    #[serde(default)]
    pub responsibility: String,
    /// Files that implement it.
    #[serde(default)]
    pub files: Vec<String>,
}

/// How the code is organized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArchitectureAnalysis {
    /// Named pattern, e.g. "layered", "MVC", "plugin-based".
    pub pattern: String,
    /// Paragraph describing the structure.
    #[serde(default)]
    pub description: String,
    /// Major components.
    #[serde(default)]
    pub components: Vec<Component>,
    /// How data moves between components.
    #[serde(default)]
    pub data_flow: String,
    /// Files where execution starts.
    #[serde(default)]
    pub entry_points: Vec<String>,
}

/// Install and run instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SetupGuide {
    /// Tools that must be installed first.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Ordered install commands.
    #[serde(default)]
    pub install_steps: Vec<String>,
    /// Commands that start or test the project.
    #[serde(default)]
    pub run_commands: Vec<String>,
    /// Environment variables the project reads.
    #[serde(default)]
    pub environment_variables: Vec<String>,
    /// Anything else worth knowing.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl SetupGuide {
    /// `true` when the model found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prerequisites.is_empty()
            && self.install_steps.is_empty()
            && self.run_commands.is_empty()
            && self.environment_variables.is_empty()
            && self.notes.is_empty()
    }
}

/// How bad a pitfall is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or unlikely.
    Low,
    /// Worth fixing.
    #[default]
    Medium,
    /// Likely to bite.
    High,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A risk a newcomer should know about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pitfall {
    /// Short title.
    pub title: String,
    /// Severity.
    #[serde(default)]
    pub severity: Severity,
    /// What goes wrong.
    #[serde(default)]
    pub description: String,
    /// File or area affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// How to avoid or fix it.
    #[serde(default)]
    pub recommendation: String,
}

/// Wire shape of the pitfall step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PitfallReport {
    /// Pitfalls, most important first.
    #[serde(default)]
    pub pitfalls: Vec<Pitfall>,
}

/// Builds the declared schema for `T` under `name`.
///
/// # Errors
///
/// Returns [`ReportError::StructuredResponse`] if the schema cannot be
/// rendered as JSON.
pub fn response_schema<T: JsonSchema>(
    step: Step,
    name: &str,
) -> Result<ResponseSchema, ReportError> {
    let schema = serde_json::to_value(schema_for!(T)).map_err(|e| {
        ReportError::StructuredResponse { step, message: format!("schema for {name}: {e}") }
    })?;
    Ok(ResponseSchema { name: name.to_string(), schema })
}
