//! # Auto-Save
//!
//! Turns the keystroke-rate stream of content changes coming out of an editor
//! into a slow, strictly sequential stream of persist calls.
//!
//! ## Behavior
//!
//! - **Debounce**: every change restarts the quiet-period timer; only the
//!   latest content survives the window.
//! - **In-flight suppression**: at most one save runs at a time. A timer that
//!   fires during a save marks the session dirty instead of saving.
//! - **Follow-up**: when the in-flight save resolves and the session is dirty,
//!   another debounce cycle starts with the latest content.
//! - **No automatic retry**: a failed save keeps its content pending until the
//!   next edit or a manual save.
//! - **Generation guard**: results of saves started before a rebind or
//!   teardown are discarded.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xfdocs::editor::autosave::{AutoSaveCoordinator, AutoSaveSettings};
//! use xfdocs::shared::{SaveReceipt, SaveTarget, DocumentId};
//!
//! # async fn example() -> Result<(), xfdocs::shared::SaveError> {
//! let id = DocumentId::new();
//! let autosave = AutoSaveCoordinator::spawn(
//!     SaveTarget::Existing(id),
//!     |target: SaveTarget, content: String| async move {
//!         // PATCH the document here
//!         Ok(SaveReceipt::new(target.document_id().unwrap_or_default()))
//!     },
//!     AutoSaveSettings::default(),
//! );
//!
//! autosave.on_change("<p>Hello</p>")?;
//! autosave.flush().await?;
//! # Ok(())
//! # }
//! ```

use crate::shared::config::{AppConfig, DEFAULT_AUTOSAVE_DEBOUNCE_MS};
use std::time::Duration;

pub mod coordinator;
pub mod saver;
pub mod state;

pub use coordinator::{AutoSaveCoordinator, AutoSaveHandle, ManualSave};
pub use saver::DocumentSaver;
pub use state::SaveState;

/// Pacing of one coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveSettings {
    /// Quiet period after the last change before a save fires
    pub debounce: Duration,
    /// Upper bound on a single save; `None` waits for the saver
    pub timeout: Option<Duration>,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            timeout: None,
        }
    }
}

impl AutoSaveSettings {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&AppConfig> for AutoSaveSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            debounce: config.autosave_debounce(),
            timeout: config.autosave_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AutoSaveSettings::default();
        assert_eq!(settings.debounce, Duration::from_secs(2));
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn test_settings_from_app_config() {
        let config = AppConfig::builder()
            .autosave_debounce_ms(500)
            .autosave_timeout_ms(8000)
            .build()
            .unwrap();
        let settings = AutoSaveSettings::from(&config);
        assert_eq!(settings.debounce, Duration::from_millis(500));
        assert_eq!(settings.timeout, Some(Duration::from_secs(8)));
    }
}
