//! Fixed identifiers of the resource contract. Table and column names are
//! shared with the storage schema and must stay verbatim; the reminder
//! names are the alias vocabulary of the virtual reminders resource.

/// Reserved query parameter marking the caller as the background sync
/// agent. Its presence suppresses change notifications the sync write
/// would otherwise fan out to foreground observers.
pub const IS_SYNCADAPTER: &str = "is_syncadapter";

pub mod tables {
    pub const OHMLETS: &str = "ohmlets";
    pub const SURVEYS: &str = "surveys";
    pub const STREAMS: &str = "streams";
}

pub mod ohmlets {
    pub const OHMLET_ID: &str = "ohmlet_id";
    pub const OHMLET_NAME: &str = "ohmlet_name";
    pub const DESCRIPTION: &str = "description";
    pub const PRIVACY_STATE: &str = "privacy_state";

    pub const CONTENT_ITEM_TYPE: &str = "vnd.ohmage.cursor.item/ohmlet";
}

pub mod surveys {
    pub const SURVEY_ID: &str = "survey_id";
    pub const SURVEY_VERSION: &str = "survey_version";
    pub const SURVEY_NAME: &str = "survey_name";
    pub const SURVEY_DESCRIPTION: &str = "survey_description";
    pub const SURVEY_PENDING_TIME: &str = "survey_pending_time";
    pub const SURVEY_PENDING_TIMEZONE: &str = "survey_pending_timezone";
    pub const SURVEY_ITEMS: &str = "survey_items";

    pub const CONTENT_ITEM_TYPE: &str = "vnd.ohmage.cursor.item/survey";
}

pub mod streams {
    pub const STREAM_ID: &str = "stream_id";
    pub const STREAM_VERSION: &str = "stream_version";
    pub const STREAM_NAME: &str = "stream_name";
    pub const STREAM_DESCRIPTION: &str = "stream_description";

    pub const CONTENT_ITEM_TYPE: &str = "vnd.ohmage.cursor.item/stream";
}

pub mod reminders {
    pub const REMINDER_ID: &str = "_id";
    pub const REMINDER_NAME: &str = "reminder_name";
    pub const REMINDER_PENDING_TIME: &str = "reminder_pending_time";
    pub const REMINDER_PENDING_TIMEZONE: &str = "reminder_pending_timezone";
}
