use std::sync::Arc;

use rusqlite::types::Value;

use ohmage_db::{Database, Values};
use ohmage_provider::{OhmageProvider, ProviderError};

fn provider() -> OhmageProvider {
    OhmageProvider::new(Arc::new(Database::open_in_memory().unwrap()))
}

fn survey_values(id: &str, version: i64, name: &str) -> Values {
    let mut values = Values::new();
    values.put("survey_id", id.to_string());
    values.put("survey_version", version);
    values.put("survey_name", name.to_string());
    values
}

fn ohmlet_values(id: &str) -> Values {
    let mut values = Values::new();
    values.put("ohmlet_id", id.to_string());
    values.put("ohmlet_name", format!("ohmlet {}", id));
    values
}

#[test]
fn ohmlet_insert_returns_item_path() {
    let provider = provider();
    let path = provider.insert("ohmlets", &ohmlet_values("o1")).unwrap();
    assert_eq!(path, "ohmlets/o1");
}

#[test]
fn survey_insert_returns_collection_path() {
    let provider = provider();
    let path = provider
        .insert("surveys", &survey_values("s1", 1, "Sleep"))
        .unwrap();
    assert_eq!(path, "surveys");
}

#[test]
fn insert_is_an_upsert() {
    let provider = provider();
    provider
        .insert("surveys", &survey_values("s1", 1, "Sleep"))
        .unwrap();
    provider
        .insert("surveys", &survey_values("s1", 1, "Sleep quality"))
        .unwrap();

    let result = provider.query("surveys", None, None, &[], None).unwrap();
    assert_eq!(result.rows.len(), 1);
}

#[test]
fn item_query_overrides_caller_selection() {
    let provider = provider();
    provider
        .insert("surveys", &survey_values("s1", 1, "Sleep v1"))
        .unwrap();
    provider
        .insert("surveys", &survey_values("s1", 2, "Sleep v2"))
        .unwrap();
    provider
        .insert("surveys", &survey_values("s2", 1, "Diet"))
        .unwrap();

    // The path identifies edition (s1, 2); the caller's filter would match
    // a different row and must be ignored.
    let projection = vec!["survey_name".to_string()];
    let result = provider
        .query(
            "surveys/s1/2",
            Some(&projection),
            Some("survey_name = 'Diet'"),
            &[],
            None,
        )
        .unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][0], Value::Text("Sleep v2".to_string()));
}

#[test]
fn item_query_without_version_matches_every_edition() {
    let provider = provider();
    provider
        .insert("surveys", &survey_values("s1", 1, "v1"))
        .unwrap();
    provider
        .insert("surveys", &survey_values("s1", 2, "v2"))
        .unwrap();

    let result = provider.query("surveys/s1", None, None, &[], None).unwrap();
    assert_eq!(result.rows.len(), 2);
}

#[test]
fn result_set_is_stamped_with_its_resource_path() {
    let provider = provider();
    let result = provider.query("surveys/s1/2", None, None, &[], None).unwrap();
    assert_eq!(result.path, "surveys/s1/2");
}

#[test]
fn reminders_query_reads_the_surveys_table() {
    let provider = provider();
    let mut values = survey_values("s1", 1, "Sleep");
    values.put("survey_pending_time", 100i64);
    values.put("survey_pending_timezone", "UTC".to_string());
    provider.insert("surveys", &values).unwrap();

    let projection = vec![
        "_id".to_string(),
        "reminder_name".to_string(),
        "reminder_pending_time".to_string(),
        "reminder_pending_timezone".to_string(),
    ];
    let result = provider
        .query(
            "reminders",
            Some(&projection),
            Some("reminder_pending_time = ?"),
            &[Value::Integer(100)],
            None,
        )
        .unwrap();

    assert_eq!(
        result.columns,
        vec![
            "survey_id",
            "survey_name",
            "survey_pending_time",
            "survey_pending_timezone"
        ]
    );
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][0], Value::Text("s1".to_string()));
    assert_eq!(result.rows[0][2], Value::Integer(100));
}

#[test]
fn reminder_update_mutates_the_owning_survey_row() {
    let provider = provider();
    provider
        .insert("surveys", &survey_values("s1", 1, "Sleep"))
        .unwrap();

    let mut values = Values::new();
    values.put("reminder_pending_time", 2000i64);
    values.put("reminder_pending_timezone", "America/Los_Angeles".to_string());
    values.put("unrelated", "dropped".to_string());

    let affected = provider
        .update(
            "reminders",
            &values,
            Some("_id = ?"),
            &[Value::Text("s1".to_string())],
        )
        .unwrap();
    assert_eq!(affected, 1);

    let projection = vec![
        "survey_pending_time".to_string(),
        "survey_pending_timezone".to_string(),
    ];
    let result = provider
        .query("surveys/s1", Some(&projection), None, &[], None)
        .unwrap();
    assert_eq!(result.rows[0][0], Value::Integer(2000));
    assert_eq!(
        result.rows[0][1],
        Value::Text("America/Los_Angeles".to_string())
    );
}

#[test]
fn delete_is_collection_level_only() {
    let provider = provider();
    provider.insert("ohmlets", &ohmlet_values("o1")).unwrap();

    let affected = provider.delete("ohmlets", None, &[]).unwrap();
    assert_eq!(affected, 1);

    assert!(matches!(
        provider.delete("reminders", None, &[]),
        Err(ProviderError::Unsupported { op: "delete", .. })
    ));
    assert!(matches!(
        provider.delete("ohmlets/o1", None, &[]),
        Err(ProviderError::Unsupported { .. })
    ));
}

#[test]
fn update_is_reminders_only() {
    let provider = provider();
    assert!(matches!(
        provider.update("surveys", &Values::new(), None, &[]),
        Err(ProviderError::Unsupported { op: "update", .. })
    ));
}

#[test]
fn unknown_paths_fail_every_operation() {
    let provider = provider();
    assert!(matches!(
        provider.query("bogus", None, None, &[], None),
        Err(ProviderError::Unsupported { .. })
    ));
    assert!(matches!(
        provider.insert("bogus", &ohmlet_values("o1")),
        Err(ProviderError::Unsupported { .. })
    ));
    assert!(matches!(
        provider.delete("streams/st1/1", None, &[]),
        Err(ProviderError::Unsupported { .. })
    ));
}

#[test]
fn mutations_notify_observers_once() {
    let provider = provider();
    let mut rx = provider.subscribe();

    provider.insert("ohmlets", &ohmlet_values("o1")).unwrap();
    let event = rx.try_recv().unwrap();
    assert_eq!(event.path, "ohmlets/o1");
    assert!(rx.try_recv().is_err());

    provider
        .insert("surveys", &survey_values("s1", 1, "Sleep"))
        .unwrap();
    assert_eq!(rx.try_recv().unwrap().path, "surveys");

    provider.delete("ohmlets", None, &[]).unwrap();
    assert_eq!(rx.try_recv().unwrap().path, "ohmlets");
}

#[test]
fn sync_agent_mutations_are_silent() {
    let provider = provider();
    let mut rx = provider.subscribe();

    provider
        .insert("ohmlets?is_syncadapter=true", &ohmlet_values("o1"))
        .unwrap();
    provider
        .delete("ohmlets?is_syncadapter=true", None, &[])
        .unwrap();

    let mut values = Values::new();
    values.put("reminder_pending_time", 1i64);
    provider
        .update("reminders?is_syncadapter=true", &values, None, &[])
        .unwrap();

    assert!(rx.try_recv().is_err());
}

#[test]
fn reminder_update_notifies_the_surveys_path() {
    let provider = provider();
    provider
        .insert("surveys?is_syncadapter=true", &survey_values("s1", 1, "Sleep"))
        .unwrap();

    let mut rx = provider.subscribe();
    let mut values = Values::new();
    values.put("reminder_pending_time", 1i64);
    provider.update("reminders", &values, None, &[]).unwrap();

    assert_eq!(rx.try_recv().unwrap().path, "surveys");
    assert!(rx.try_recv().is_err());
}

#[test]
fn failed_insert_does_not_notify() {
    let provider = provider();
    let mut rx = provider.subscribe();

    // surveys.survey_id is NOT NULL, so this write fails in storage
    let mut values = Values::new();
    values.put("survey_name", "orphan".to_string());
    assert!(matches!(
        provider.insert("surveys", &values),
        Err(ProviderError::Storage(_))
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn content_type_is_item_level_only() {
    let provider = provider();
    assert_eq!(
        provider.content_type("ohmlets/o1").unwrap(),
        "vnd.ohmage.cursor.item/ohmlet"
    );
    assert_eq!(
        provider.content_type("surveys/s1/2").unwrap(),
        "vnd.ohmage.cursor.item/survey"
    );
    assert_eq!(
        provider.content_type("streams/st1/1").unwrap(),
        "vnd.ohmage.cursor.item/stream"
    );
    assert!(matches!(
        provider.content_type("surveys"),
        Err(ProviderError::Unsupported { .. })
    ));
    assert!(matches!(
        provider.content_type("reminders"),
        Err(ProviderError::Unsupported { .. })
    ));
}
