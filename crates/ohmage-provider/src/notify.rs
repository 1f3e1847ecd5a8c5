use tokio::sync::broadcast;
use tracing::debug;

use ohmage_types::events::ChangeEvent;

/// Fans change notifications out to observers. Cloning shares the same
/// broadcast channel; sending with no subscribers is not an error.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn notify_change(&self, path: &str) {
        debug!("change notification: {}", path);
        let _ = self.tx.send(ChangeEvent {
            path: path.to_string(),
        });
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
