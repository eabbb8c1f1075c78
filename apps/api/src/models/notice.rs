use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCode {
    StorageUnavailable,
    FeedUnavailable,
}

/// Non-blocking, user-visible message attached to a catalog view when part
/// of the data could not be loaded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub code: NoticeCode,
    pub message: String,
}

impl Notice {
    pub fn storage_unavailable() -> Self {
        Self {
            code: NoticeCode::StorageUnavailable,
            message: "Saved prompts could not be read. Please refresh the page and try again."
                .to_string(),
        }
    }

    pub fn feed_unavailable(feed: &str) -> Self {
        Self {
            code: NoticeCode::FeedUnavailable,
            message: format!("The {feed} prompt feed is unavailable right now."),
        }
    }
}

/// Appends a notice unless an identical one is already queued.
pub fn push_notice(notices: &mut Vec<Notice>, notice: Notice) {
    if !notices.contains(&notice) {
        notices.push(notice);
    }
}
