/**
 * Save Event System
 *
 * This module defines the notifications an auto-save coordinator emits while
 * it works. Editors turn them into non-blocking toasts or status-bar text;
 * nothing in the coordinator waits on a listener.
 */
use crate::shared::document::SaveTarget;
use crate::shared::error::SaveError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of save event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaveEventKind {
    Started,
    Saved,
    Failed,
}

/// Notification emitted by the auto-save coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    /// A save request was sent
    Started {
        target: SaveTarget,
    },
    /// A save completed and its result was applied
    Saved {
        target: SaveTarget,
        at: DateTime<Utc>,
        version: Option<String>,
    },
    /// A save failed; the content stays pending
    Failed {
        target: SaveTarget,
        error: SaveError,
    },
}

impl SaveEvent {
    pub fn kind(&self) -> SaveEventKind {
        match self {
            Self::Started { .. } => SaveEventKind::Started,
            Self::Saved { .. } => SaveEventKind::Saved,
            Self::Failed { .. } => SaveEventKind::Failed,
        }
    }

    pub fn target(&self) -> SaveTarget {
        match self {
            Self::Started { target } | Self::Saved { target, .. } | Self::Failed { target, .. } => {
                *target
            }
        }
    }

    /// Short user-facing text for a toast
    pub fn toast_text(&self) -> String {
        match self {
            Self::Started { .. } => "Saving…".to_string(),
            Self::Saved { at, .. } => format!("Saved at {}", at.format("%H:%M:%S")),
            Self::Failed { error, .. } => format!("Couldn't save: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::document::DocumentId;
    use chrono::TimeZone;

    #[test]
    fn test_event_kind_and_target() {
        let target = SaveTarget::Existing(DocumentId::new());
        let event = SaveEvent::Failed {
            target,
            error: SaveError::network("offline"),
        };
        assert_eq!(event.kind(), SaveEventKind::Failed);
        assert_eq!(event.target(), target);
    }

    #[test]
    fn test_toast_text() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let event = SaveEvent::Saved {
            target: SaveTarget::Draft,
            at,
            version: None,
        };
        assert_eq!(event.toast_text(), "Saved at 09:30:05");

        let event = SaveEvent::Failed {
            target: SaveTarget::Draft,
            error: SaveError::Unauthorized,
        };
        assert!(event.toast_text().starts_with("Couldn't save"));
    }

    #[test]
    fn test_event_kind_serialization() {
        let json = serde_json::to_string(&SaveEventKind::Saved).unwrap();
        assert_eq!(json, "\"saved\"");
    }
}
