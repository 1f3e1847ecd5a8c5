use serde::{Deserialize, Serialize};

/// Emitted after a mutating operation so observers of a resource path can
/// refresh. Background sync writes are suppressed at the source and never
/// produce one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: String,
}
