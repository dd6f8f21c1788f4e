//! # Save State
//!
//! Snapshot of one session's auto-save bookkeeping, published by the
//! coordinator after every transition. Editors read it to render the
//! "Saving…" / "Saved at" indicator.

use crate::shared::{SaveError, SaveTarget};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SaveState {
    /// Document the session is currently bound to
    pub target: SaveTarget,
    /// A save request is in flight
    pub is_saving: bool,
    /// Wall-clock time of the last applied successful save
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Latest content not yet handed to a save
    pub pending_content: Option<String>,
    /// Content changed after the in-flight save started; a follow-up is queued
    pub dirty_while_saving: bool,
    /// Error of the most recent failed save, cleared by the next success
    pub last_error: Option<SaveError>,
}

impl SaveState {
    pub fn new(target: SaveTarget) -> Self {
        Self {
            target,
            is_saving: false,
            last_saved_at: None,
            pending_content: None,
            dirty_while_saving: false,
            last_error: None,
        }
    }

    /// Nothing pending, nothing in flight
    pub fn is_clean(&self) -> bool {
        !self.is_saving && self.pending_content.is_none() && !self.dirty_while_saving
    }

    /// Status-bar text
    pub fn status_line(&self) -> String {
        if self.is_saving {
            return "Saving…".to_string();
        }
        if let Some(error) = &self.last_error {
            return format!("Unsaved changes ({})", error);
        }
        match (&self.pending_content, self.last_saved_at) {
            (Some(_), _) => "Unsaved changes".to_string(),
            (None, Some(at)) => format!("Saved {}", at.format("%H:%M:%S")),
            (None, None) => "No changes".to_string(),
        }
    }
}
