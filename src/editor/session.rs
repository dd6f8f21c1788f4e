//! # Editor Session
//!
//! One mounted editor bound to one document. The session owns the local copy
//! of the document and the auto-save coordinator that persists it; dropping
//! or unmounting the session tears the coordinator down.

use crate::editor::autosave::{
    AutoSaveCoordinator, AutoSaveHandle, AutoSaveSettings, DocumentSaver, ManualSave, SaveState,
};
use crate::shared::{EditableDocument, SaveError, SaveEvent, SaveTarget};
use tokio::sync::{broadcast, watch};
use tracing::debug;

#[derive(Debug)]
pub struct EditorSession {
    document: EditableDocument,
    autosave: AutoSaveHandle,
}

impl EditorSession {
    /// Mount an editor on `document`
    pub fn mount<S: DocumentSaver>(
        document: EditableDocument,
        saver: S,
        settings: AutoSaveSettings,
    ) -> Self {
        debug!(document = %document.target, title = %document.title, "editor mounted");
        let autosave = AutoSaveCoordinator::spawn(document.target, saver, settings);
        Self { document, autosave }
    }

    /// The local document, with its target updated once a draft was created
    pub fn document(&self) -> EditableDocument {
        let mut document = self.document.clone();
        if document.target.is_draft() {
            document.target = self.autosave.state().target;
        }
        document
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Local user input
    pub fn edit(&mut self, content: impl Into<String>) -> Result<(), SaveError> {
        self.document.content = content.into();
        self.autosave.on_change(self.document.content.clone())
    }

    /// Replace the local content with a version fetched from the server.
    ///
    /// Unsaved local edits are dropped and a save still in flight is
    /// ignored when it lands, so the restored content is what stays on screen.
    pub async fn restore(&mut self, content: impl Into<String>) -> Result<(), SaveError> {
        self.autosave.reset().await?;
        self.document.content = content.into();
        debug!(document = %self.target(), "restored remote content");
        Ok(())
    }

    /// Switch the editor to another document
    pub async fn switch_to(&mut self, document: EditableDocument) -> Result<(), SaveError> {
        self.autosave.rebind(document.target).await?;
        debug!(document = %document.target, "editor switched document");
        self.document = document;
        Ok(())
    }

    pub async fn save_now(&self) -> Result<ManualSave, SaveError> {
        self.autosave.save_now().await
    }

    pub async fn flush(&self) -> Result<(), SaveError> {
        self.autosave.flush().await
    }

    pub fn state(&self) -> SaveState {
        self.autosave.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SaveState> {
        self.autosave.subscribe_state()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SaveEvent> {
        self.autosave.subscribe_events()
    }

    /// Save whatever is pending, then unmount
    pub async fn close(self) -> Result<(), SaveError> {
        let result = self.autosave.flush().await;
        self.unmount();
        result
    }

    /// Unmount without saving; a pending debounce is cancelled
    pub fn unmount(self) {
        self.autosave.shutdown();
    }

    pub fn target(&self) -> SaveTarget {
        self.document().target
    }
}
