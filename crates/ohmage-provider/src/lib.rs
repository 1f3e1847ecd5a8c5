pub mod contract;
pub mod notify;
pub mod provider;
pub mod reminders;
pub mod uri;

pub use notify::ChangeNotifier;
pub use provider::{OhmageProvider, ProviderError, RowSet};
pub use uri::{ResourceMatch, ResourceUri, UriMatcher};
