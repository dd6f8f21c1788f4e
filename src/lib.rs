//! XFDocs - Main Library
//!
//! XFDocs is the client library of a collaborative document editor. Users
//! write rich-text documents; the library keeps them persisted to the
//! documents REST backend without saving on every keystroke.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data types used on both sides of the API
//!   - Document ids, save targets and receipts
//!   - Save error taxonomy and save events
//!   - Application configuration
//!
//! - **`editor`** - Editor-side runtime
//!   - Auto-save coordinator (debounce, one save in flight, follow-ups)
//!   - Editor sessions binding a document to a coordinator
//!   - reqwest client for the documents API
//!
//! # Auto-Save Model
//!
//! Every editor session owns one coordinator task. Edits restart a debounce
//! timer; when it expires the latest content is saved. Saves never overlap:
//! a change made while a save is in flight is saved right after it, with the
//! newest content. Switching documents or unmounting discards results of
//! saves that belong to the old session.
//!
//! ```rust,no_run
//! use xfdocs::editor::{Config, DocumentsClient, EditorSession};
//! use xfdocs::shared::EditableDocument;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let settings = config.autosave();
//! let client = DocumentsClient::new(config);
//!
//! let mut session = EditorSession::mount(EditableDocument::draft("Notes"), client, settings);
//! session.edit("<p>Hello</p>")?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SaveError` for everything a save can end with
//! - `shared::ConfigError` for configuration loading
//! - Save failures never stop a coordinator; they are reported through its
//!   state, its events and `tracing`

/// Shared types and data structures
pub mod shared;

/// Editor runtime: auto-save, sessions, API client
pub mod editor;
