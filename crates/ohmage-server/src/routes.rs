use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use futures_util::{SinkExt, StreamExt};
use rusqlite::types::Value;
use tokio::sync::broadcast;
use tracing::warn;

use ohmage_db::{Database, Values};
use ohmage_provider::contract::IS_SYNCADAPTER;
use ohmage_provider::{OhmageProvider, ProviderError};
use ohmage_types::api::{AffectedResponse, ContentTypeResponse, InsertResponse, QueryResponse};
use ohmage_types::events::ChangeEvent;
use ohmage_types::models::Survey;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub provider: Arc<OhmageProvider>,
}

/// Caller-supplied request options, decoded from the query string.
/// `arg` repeats, one per selection placeholder.
#[derive(Default)]
struct RequestOptions {
    projection: Option<Vec<String>>,
    selection: Option<String>,
    args: Vec<Value>,
    sort: Option<String>,
    sync_adapter: bool,
}

impl RequestOptions {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "projection" => {
                    options.projection =
                        Some(value.split(',').map(|s| s.trim().to_string()).collect());
                }
                "selection" => options.selection = Some(value),
                "arg" => options.args.push(Value::Text(value)),
                "sort" => options.sort = Some(value),
                key if key == IS_SYNCADAPTER => options.sync_adapter = true,
                _ => {}
            }
        }
        options
    }

    /// Rebuild the provider uri, carrying the sync-agent marker through.
    fn uri(&self, path: &str) -> String {
        if self.sync_adapter {
            format!("{}?{}=true", path, IS_SYNCADAPTER)
        } else {
            path.to_string()
        }
    }
}

pub async fn query(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<QueryResponse>, StatusCode> {
    let options = RequestOptions::from_pairs(pairs);

    let result = state
        .provider
        .query(
            &options.uri(&path),
            options.projection.as_deref(),
            options.selection.as_deref(),
            &options.args,
            options.sort.as_deref(),
        )
        .map_err(error_status)?;

    Ok(Json(QueryResponse {
        path: result.path,
        columns: result.columns,
        rows: result
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(value_to_json).collect())
            .collect(),
    }))
}

pub async fn insert(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<InsertResponse>), StatusCode> {
    let options = RequestOptions::from_pairs(pairs);
    let object = body.as_object().ok_or(StatusCode::BAD_REQUEST)?;
    let values = Values::from_json(object);

    let path = state
        .provider
        .insert(&options.uri(&path), &values)
        .map_err(error_status)?;

    Ok((StatusCode::CREATED, Json(InsertResponse { path })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AffectedResponse>, StatusCode> {
    let options = RequestOptions::from_pairs(pairs);
    let object = body.as_object().ok_or(StatusCode::BAD_REQUEST)?;
    let values = Values::from_json(object);

    let affected = state
        .provider
        .update(
            &options.uri(&path),
            &values,
            options.selection.as_deref(),
            &options.args,
        )
        .map_err(error_status)?;

    Ok(Json(AffectedResponse { affected }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<AffectedResponse>, StatusCode> {
    let options = RequestOptions::from_pairs(pairs);

    let affected = state
        .provider
        .delete(
            &options.uri(&path),
            options.selection.as_deref(),
            &options.args,
        )
        .map_err(error_status)?;

    Ok(Json(AffectedResponse { affected }))
}

pub async fn content_type(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<ContentTypeResponse>, StatusCode> {
    let content_type = state.provider.content_type(&path).map_err(error_status)?;
    Ok(Json(ContentTypeResponse {
        content_type: content_type.to_string(),
    }))
}

/// Typed read of one survey edition, with the item list parsed out of the
/// stored JSON.
pub async fn survey_definition(
    State(state): State<AppState>,
    Path((id, version)): Path<(String, i64)>,
) -> Result<Json<Survey>, StatusCode> {
    let row = state
        .db
        .get_survey(&id, version)
        .map_err(|e| {
            warn!("storage failure: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let survey = row.into_model().map_err(|e| {
        warn!("bad survey definition: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(survey))
}

pub async fn ws_changes(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.provider.subscribe();
    ws.on_upgrade(move |socket| stream_changes(socket, rx))
}

/// Forward change notifications to the observer until either side closes.
async fn stream_changes(socket: WebSocket, mut rx: broadcast::Receiver<ChangeEvent>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("change stream lagged, skipped {} notifications", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                // Only close frames are expected from the observer
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },
        }
    }
}

fn error_status(err: ProviderError) -> StatusCode {
    match err {
        ProviderError::Unsupported { .. } => StatusCode::NOT_FOUND,
        ProviderError::Storage(e) => {
            warn!("storage failure: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => i.into(),
        Value::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s),
        Value::Blob(bytes) => serde_json::Value::String(BASE64_STANDARD.encode(bytes)),
    }
}
