use std::sync::Arc;

use rusqlite::types::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use ohmage_db::{Database, Values};
use ohmage_types::events::ChangeEvent;

use crate::contract::{ohmlets, streams, surveys, tables};
use crate::notify::ChangeNotifier;
use crate::reminders;
use crate::uri::{ResourceMatch, ResourceUri, UriMatcher};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The path matched no registered resource, or matched one the
    /// requested operation does not support.
    #[error("{op}: unsupported resource uri: {uri}")]
    Unsupported { op: &'static str, uri: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A query result set, stamped with the resource path it answers for so
/// observers of that path can be told about later writes.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub path: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// The resource boundary over the three tables and the virtual reminders
/// resource. Holds no mutable state of its own; the template table is
/// built once and storage owns all locking, so concurrent calls need no
/// extra synchronization.
pub struct OhmageProvider {
    db: Arc<Database>,
    matcher: UriMatcher,
    notifier: ChangeNotifier,
}

impl OhmageProvider {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: UriMatcher::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Observe change notifications for every resource path.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }

    pub fn query(
        &self,
        raw_uri: &str,
        projection: Option<&[String]>,
        selection: Option<&str>,
        args: &[Value],
        sort: Option<&str>,
    ) -> Result<RowSet, ProviderError> {
        let uri = ResourceUri::parse(raw_uri);
        debug!("query {}", uri.path());

        let (columns, rows) = match self.matcher.match_uri(&uri) {
            Some(ResourceMatch::Ohmlets) => {
                self.db
                    .query_table(tables::OHMLETS, projection, selection, args, sort)?
            }
            Some(ResourceMatch::OhmletId { id }) => {
                let selection = format!("{} = ?", ohmlets::OHMLET_ID);
                self.db.query_table(
                    tables::OHMLETS,
                    projection,
                    Some(&selection),
                    &[Value::Text(id)],
                    sort,
                )?
            }
            Some(ResourceMatch::Surveys) => {
                self.db
                    .query_table(tables::SURVEYS, projection, selection, args, sort)?
            }
            Some(ResourceMatch::SurveyId { id, version }) => {
                // The path is authoritative over any caller-supplied filter.
                let mut selection = format!("{} = ?", surveys::SURVEY_ID);
                if let Some(version) = version {
                    selection.push_str(&format!(" AND {} = {}", surveys::SURVEY_VERSION, version));
                }
                self.db.query_table(
                    tables::SURVEYS,
                    projection,
                    Some(&selection),
                    &[Value::Text(id)],
                    sort,
                )?
            }
            Some(ResourceMatch::Streams) => {
                self.db
                    .query_table(tables::STREAMS, projection, selection, args, sort)?
            }
            Some(ResourceMatch::StreamId { id, version }) => {
                let selection = format!(
                    "{} = ? AND {} = {}",
                    streams::STREAM_ID,
                    streams::STREAM_VERSION,
                    version
                );
                self.db.query_table(
                    tables::STREAMS,
                    projection,
                    Some(&selection),
                    &[Value::Text(id)],
                    sort,
                )?
            }
            Some(ResourceMatch::Reminders) => {
                let projection = projection.map(reminders::translate_projection);
                let selection = reminders::translate_selection(selection);
                self.db.query_table(
                    tables::SURVEYS,
                    projection.as_deref(),
                    selection.as_deref(),
                    args,
                    sort,
                )?
            }
            _ => return Err(unsupported("query", raw_uri)),
        };

        Ok(RowSet {
            path: uri.path().to_string(),
            columns,
            rows,
        })
    }

    /// Upsert into a collection. Returns the resulting resource path; only
    /// ohmlet inserts append the item id to it.
    pub fn insert(&self, raw_uri: &str, values: &Values) -> Result<String, ProviderError> {
        let uri = ResourceUri::parse(raw_uri);
        debug!("insert {}", uri.path());

        let (table, item_id) = match self.matcher.match_uri(&uri) {
            Some(ResourceMatch::Ohmlets) => (
                tables::OHMLETS,
                values.get_str(ohmlets::OHMLET_ID).map(str::to_string),
            ),
            Some(ResourceMatch::Surveys) => (tables::SURVEYS, None),
            Some(ResourceMatch::Streams) => (tables::STREAMS, None),
            _ => return Err(unsupported("insert", raw_uri)),
        };

        let written = self.db.replace_into(table, values)?;

        let result_path = match item_id {
            Some(id) => format!("{}/{}", uri.path(), id),
            None => uri.path().to_string(),
        };

        // A write that touched no row must not wake observers.
        if written > 0 && !uri.is_sync_adapter() {
            self.notifier.notify_change(&result_path);
        }

        Ok(result_path)
    }

    /// Only the virtual reminders resource is updatable; the write lands on
    /// the surveys table after translation.
    pub fn update(
        &self,
        raw_uri: &str,
        values: &Values,
        selection: Option<&str>,
        args: &[Value],
    ) -> Result<usize, ProviderError> {
        let uri = ResourceUri::parse(raw_uri);
        debug!("update {}", uri.path());

        match self.matcher.match_uri(&uri) {
            Some(ResourceMatch::Reminders) => {
                let translated = reminders::translate_values(values);
                let selection = reminders::translate_selection(selection);
                let affected =
                    self.db
                        .update_table(tables::SURVEYS, &translated, selection.as_deref(), args)?;

                // Observers of reminders watch the surveys path, since that
                // is the storage a reminder write actually touches.
                if !uri.is_sync_adapter() {
                    self.notifier.notify_change(tables::SURVEYS);
                }
                Ok(affected)
            }
            _ => Err(unsupported("update", raw_uri)),
        }
    }

    /// Delete is collection-level only.
    pub fn delete(
        &self,
        raw_uri: &str,
        selection: Option<&str>,
        args: &[Value],
    ) -> Result<usize, ProviderError> {
        let uri = ResourceUri::parse(raw_uri);
        debug!("delete {}", uri.path());

        let table = match self.matcher.match_uri(&uri) {
            Some(ResourceMatch::Ohmlets) => tables::OHMLETS,
            Some(ResourceMatch::Surveys) => tables::SURVEYS,
            Some(ResourceMatch::Streams) => tables::STREAMS,
            _ => return Err(unsupported("delete", raw_uri)),
        };

        let affected = self.db.delete_from(table, selection, args)?;

        if !uri.is_sync_adapter() {
            self.notifier.notify_change(uri.path());
        }

        Ok(affected)
    }

    /// Mime type of an item-level resource. Collection paths have none.
    pub fn content_type(&self, raw_uri: &str) -> Result<&'static str, ProviderError> {
        let uri = ResourceUri::parse(raw_uri);

        match self.matcher.match_uri(&uri) {
            Some(ResourceMatch::OhmletId { .. }) => Ok(ohmlets::CONTENT_ITEM_TYPE),
            Some(ResourceMatch::SurveyId { .. }) => Ok(surveys::CONTENT_ITEM_TYPE),
            Some(ResourceMatch::StreamId { .. }) => Ok(streams::CONTENT_ITEM_TYPE),
            _ => Err(unsupported("content_type", raw_uri)),
        }
    }
}

fn unsupported(op: &'static str, uri: &str) -> ProviderError {
    ProviderError::Unsupported {
        op,
        uri: uri.to_string(),
    }
}
