use serde::{Deserialize, Serialize};

use crate::prompts::SurveyItem;

/// A survey definition together with the per-user pending state.
/// A specific edition of a survey is identified by (id, version).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub schema_id: String,
    pub schema_version: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Epoch millis of the next scheduled reminder, if one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_timezone: Option<String>,
    #[serde(default)]
    pub survey_items: Vec<SurveyItem>,
}
