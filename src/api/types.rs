use crate::cms::Key;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub company_name: String,
    pub email: Option<String>,
    pub access_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub client: ClientInfo,
}

/// Values the analyzer extracted from the uploaded specification. Optional
/// fields were simply not present in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedSpec {
    pub work_type: String,
    pub volume: Option<f64>,
    pub soil_type: Option<String>,
    pub required_profile: Option<String>,
    pub depth: Option<f64>,
    pub groundwater_level: Option<f64>,
    pub special_conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetPileMatch {
    pub name: String,
    pub price: f64,
    pub stock: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineryMatch {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}

/// Full result of a document audit, as produced by the analyzer and echoed
/// back verbatim for report generation and lead capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditResult {
    pub parsed_data: ParsedSpec,
    pub technical_summary: String,
    pub risks: Vec<RiskItem>,
    pub matched_shpunts: Vec<SheetPileMatch>,
    pub recommended_machinery: Vec<MachineryMatch>,
    pub estimated_total: Option<f64>,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
}

/// A lead captured by the hero form, the rental dialog or the audit flow.
/// `audit_data` carries the audit result verbatim when one exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
    pub lead_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub active_projects: u32,
    pub total_audits: u32,
    pub completed_projects: u32,
    pub company_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardProject {
    pub id: Key,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub progress: Option<f64>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tags: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRecord {
    pub id: Key,
    pub filename: String,
    pub work_type: Option<String>,
    pub confidence_score: Option<f64>,
    pub risks_count: Option<u32>,
    pub estimated_total: Option<f64>,
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub company_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub access_level: String,
}

/// Profile fields a client is allowed to change; the backend discards
/// anything else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub recent_projects: Vec<DashboardProject>,
    pub recent_audits: Vec<AuditRecord>,
}
