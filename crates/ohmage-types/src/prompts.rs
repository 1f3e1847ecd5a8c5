use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields shared by every survey item regardless of its type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBase {
    pub survey_item_id: String,
    /// Condition expression deciding whether the item is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One selectable option of a choice prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub value: Value,
}

/// A single item of a survey definition. The wire format is a JSON object
/// discriminated by `survey_item_type`; unknown types are rejected at
/// deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "survey_item_type", rename_all = "snake_case")]
pub enum SurveyItem {
    Message {
        #[serde(flatten)]
        base: ItemBase,
    },
    TextPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    NumberPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    TimestampPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<chrono::DateTime<chrono::Utc>>,
    },
    NumberSingleChoicePrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default)]
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    StringSingleChoicePrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default)]
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    NumberMultiChoicePrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default)]
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        value: Vec<Value>,
    },
    StringMultiChoicePrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default)]
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        value: Vec<Value>,
    },
    AudioPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_duration: Option<u32>,
    },
    ImagePrompt {
        #[serde(flatten)]
        base: ItemBase,
    },
    VideoPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_duration: Option<u32>,
    },
    RemoteActivityPrompt {
        #[serde(flatten)]
        base: ItemBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl SurveyItem {
    pub fn base(&self) -> &ItemBase {
        match self {
            Self::Message { base }
            | Self::TextPrompt { base, .. }
            | Self::NumberPrompt { base, .. }
            | Self::TimestampPrompt { base, .. }
            | Self::NumberSingleChoicePrompt { base, .. }
            | Self::StringSingleChoicePrompt { base, .. }
            | Self::NumberMultiChoicePrompt { base, .. }
            | Self::StringMultiChoicePrompt { base, .. }
            | Self::AudioPrompt { base, .. }
            | Self::ImagePrompt { base }
            | Self::VideoPrompt { base, .. }
            | Self::RemoteActivityPrompt { base, .. } => base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().survey_item_id
    }

    pub fn text(&self) -> Option<&str> {
        self.base().text.as_deref()
    }

    /// Whether the item asks the participant for an answer. A plain message
    /// only displays text.
    pub fn is_answerable(&self) -> bool {
        !matches!(self, Self::Message { .. })
    }

    pub fn is_skippable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_by_item_type() {
        let json = r#"[
            {"survey_item_type": "message", "survey_item_id": "intro", "text": "Welcome"},
            {"survey_item_type": "number_prompt", "survey_item_id": "age", "text": "Age?", "min": 0, "max": 120},
            {"survey_item_type": "string_single_choice_prompt", "survey_item_id": "mood",
             "choices": [{"text": "good", "value": "good"}, {"text": "bad", "value": "bad"}]}
        ]"#;

        let items: Vec<SurveyItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id(), "intro");
        assert!(!items[0].is_answerable());
        assert!(matches!(items[1], SurveyItem::NumberPrompt { .. }));
        assert!(items[2].is_answerable());
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let json = r#"{"survey_item_type": "hologram_prompt", "survey_item_id": "x"}"#;
        assert!(serde_json::from_str::<SurveyItem>(json).is_err());
    }

    #[test]
    fn condition_defaults_to_none() {
        let json = r#"{"survey_item_type": "text_prompt", "survey_item_id": "notes"}"#;
        let item: SurveyItem = serde_json::from_str(json).unwrap();
        assert!(item.base().condition.is_none());
        assert!(item.is_skippable());
    }
}
