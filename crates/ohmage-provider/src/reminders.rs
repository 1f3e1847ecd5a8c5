//! Reminder↔survey alias translation. Reminders have no storage of their
//! own: every reminder column maps 1:1 onto a column of the surveys table,
//! and the three functions here rewrite projections, selections and write
//! payloads into survey vocabulary before they touch storage.

use rusqlite::types::Value;

use crate::contract::{reminders, surveys};
use ohmage_db::Values;

/// Reminder column → survey column, in substitution order.
const COLUMN_ALIASES: [(&str, &str); 4] = [
    (reminders::REMINDER_ID, surveys::SURVEY_ID),
    (reminders::REMINDER_NAME, surveys::SURVEY_NAME),
    (reminders::REMINDER_PENDING_TIME, surveys::SURVEY_PENDING_TIME),
    (
        reminders::REMINDER_PENDING_TIMEZONE,
        surveys::SURVEY_PENDING_TIMEZONE,
    ),
];

/// Rewrite a requested projection into survey column names. Length and
/// position are preserved; columns with no alias pass through unchanged.
pub fn translate_projection(projection: &[String]) -> Vec<String> {
    projection
        .iter()
        .map(|column| {
            COLUMN_ALIASES
                .iter()
                .find(|(reminder, _)| reminder == column)
                .map(|(_, survey)| (*survey).to_string())
                .unwrap_or_else(|| column.clone())
        })
        .collect()
}

/// Rewrite a selection fragment into survey vocabulary. This is a literal
/// textual substitution, not a tokenizing rewrite: a reminder column name
/// occurring inside a string literal would be rewritten too. The alias set
/// is small and fixed, and existing filters depend on this behavior.
pub fn translate_selection(selection: Option<&str>) -> Option<String> {
    selection.map(|fragment| {
        let mut translated = fragment.to_string();
        for (reminder, survey) in COLUMN_ALIASES {
            translated = translated.replace(reminder, survey);
        }
        translated
    })
}

/// Build the survey write payload for a reminder write. Only the pending
/// time and timezone carry over; an absent field writes NULL, and every
/// other column in the input is dropped without error.
pub fn translate_values(values: &Values) -> Values {
    let mut translated = Values::new();
    translated.put(
        surveys::SURVEY_PENDING_TIME,
        values
            .get(reminders::REMINDER_PENDING_TIME)
            .cloned()
            .unwrap_or(Value::Null),
    );
    translated.put(
        surveys::SURVEY_PENDING_TIMEZONE,
        values
            .get(reminders::REMINDER_PENDING_TIMEZONE)
            .cloned()
            .unwrap_or(Value::Null),
    );
    translated
}
