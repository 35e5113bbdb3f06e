//! Core data types shared across the scan pipeline (spec §3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Totally ordered threat level, serialized as its variant name (never an
/// integer) so downstream consumers never need to know the ordinal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    None,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ThreatLevel::None => "None",
            ThreatLevel::Info => "Info",
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
            ThreatLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// The unit of result for one analyzer (spec §3 Finding).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    pub certainty: u8,
    pub threat_level: ThreatLevel,
    pub description: String,
    #[serde(default)]
    pub metadata: Value,
}

impl Finding {
    pub fn new(name: impl Into<String>, certainty: u8, threat_level: ThreatLevel, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            certainty: certainty.min(100),
            threat_level,
            description: description.into(),
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// header string + ordered list of (section-name, section-text) pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpPayload {
    pub header: String,
    pub sections: Vec<(String, String)>,
}

/// Carries exactly one of { Finding, HelpPayload }.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResultEnvelope {
    Finding(Finding),
    Help(HelpPayload),
}

impl ResultEnvelope {
    pub fn as_finding(&self) -> Option<&Finding> {
        match self {
            ResultEnvelope::Finding(f) => Some(f),
            ResultEnvelope::Help(_) => None,
        }
    }

    pub fn as_help(&self) -> Option<&HelpPayload> {
        match self {
            ResultEnvelope::Help(h) => Some(h),
            ResultEnvelope::Finding(_) => None,
        }
    }
}

/// (target, taskId, Finding, endFlag) — reporter -> sink wire unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundReport {
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "TestId")]
    pub task_id: String,
    #[serde(rename = "Result")]
    pub result: OutboundResult,
    #[serde(rename = "EndFlag")]
    pub end_flag: bool,
}

/// The `Result` object in the outbound wire body. Empty for the end-flag
/// report (spec §6: "The end-of-stream marker uses an empty Result object").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboundResult {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Certainty", default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<u8>,
    #[serde(rename = "ThreatLevel", default, skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
    #[serde(rename = "Metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Finding> for OutboundResult {
    fn from(f: &Finding) -> Self {
        Self {
            name: Some(f.name.clone()),
            certainty: Some(f.certainty),
            threat_level: Some(f.threat_level),
            metadata: Some(f.metadata.clone()),
            description: Some(f.description.clone()),
        }
    }
}

impl OutboundReport {
    pub fn for_finding(target: &str, task_id: &str, finding: &Finding) -> Self {
        Self {
            target: target.to_string(),
            task_id: task_id.to_string(),
            result: finding.into(),
            end_flag: false,
        }
    }

    pub fn end_of_stream(target: &str, task_id: &str) -> Self {
        Self {
            target: target.to_string(),
            task_id: task_id.to_string(),
            result: OutboundResult::default(),
            end_flag: true,
        }
    }
}
