//! Diagnostic report produced by the external classification service.
//!
//! The visualizer reads exactly one field from it, `visual_intervention`.
//! The remaining fields are carried so a report file written by the host can
//! be loaded as-is.

use serde::{Deserialize, Deserializer, Serialize};

use crate::state::Intervention;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    Critical,
    #[serde(rename = "Quantum Collapse")]
    QuantumCollapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
    Stabilize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAdjustment {
    pub parameter: String,
    pub value: String,
    pub direction: Direction,
}

/// A diagnostic report as emitted by the host's classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub timestamp: String,
    pub summary: String,
    pub recommendation: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub suggested_adjustments: Vec<SuggestedAdjustment>,
    /// Unknown tags deserialize to `None` rather than failing the report.
    #[serde(
        default,
        deserialize_with = "lenient_intervention",
        skip_serializing_if = "Option::is_none"
    )]
    pub visual_intervention: Option<Intervention>,
}

impl DiagnosticReport {
    /// The render-mode tag, if the report carries a recognized one.
    pub fn intervention(&self) -> Option<Intervention> {
        self.visual_intervention
    }
}

fn lenient_intervention<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Intervention>, D::Error> {
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(Intervention::from_tag))
}
