//! Editor-side code: everything a mounted document editor needs to keep its
//! content persisted.

/// Debounced, non-overlapping auto-save
pub mod autosave;

/// Editor configuration (file, environment, token)
pub mod config;

/// REST client for the documents backend
pub mod documents_api;

/// One editor bound to one document
pub mod session;

pub use autosave::{
    AutoSaveCoordinator, AutoSaveHandle, AutoSaveSettings, DocumentSaver, ManualSave, SaveState,
};
pub use config::Config;
pub use documents_api::DocumentsClient;
pub use session::EditorSession;
