use serde::{Deserialize, Serialize};

// -- Resource boundary --

/// A result set returned over HTTP. `path` is the resource path the rows
/// answer for, which is also the key change notifications are emitted on.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub path: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// The resulting path of an insert. For ohmlets this is the item path;
/// other collections return the collection path.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertResponse {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AffectedResponse {
    pub affected: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentTypeResponse {
    pub content_type: String,
}
