use anyhow::{Context, Result};

use ohmage_types::models::Survey;
use ohmage_types::prompts::SurveyItem;

/// A raw row of the surveys table. `survey_items` holds the item list as
/// JSON text; `items()` parses it into the typed model.
#[derive(Debug, Clone)]
pub struct SurveyRow {
    pub survey_id: String,
    pub survey_version: i64,
    pub survey_name: Option<String>,
    pub survey_description: Option<String>,
    pub survey_pending_time: Option<i64>,
    pub survey_pending_timezone: Option<String>,
    pub survey_items: Option<String>,
}

impl SurveyRow {
    pub fn items(&self) -> Result<Vec<SurveyItem>> {
        match self.survey_items.as_deref() {
            Some(json) => serde_json::from_str(json)
                .with_context(|| format!("bad survey_items for {}", self.survey_id)),
            None => Ok(Vec::new()),
        }
    }

    pub fn into_model(self) -> Result<Survey> {
        let survey_items = self.items()?;
        Ok(Survey {
            schema_id: self.survey_id,
            schema_version: self.survey_version,
            name: self.survey_name.unwrap_or_default(),
            description: self.survey_description,
            pending_time: self.survey_pending_time,
            pending_timezone: self.survey_pending_timezone,
            survey_items,
        })
    }
}
