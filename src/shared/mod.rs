//! Shared Module
//!
//! This module contains the types used on both sides of the documents API:
//! the document model, the save error taxonomy, save notifications and the
//! application configuration.
//!
//! # Overview
//!
//! Nothing here talks to the network or owns a task; these are plain data
//! types designed for serialization and for passing between the editor
//! session, its auto-save coordinator and the REST client.

/// Document identifiers, save targets and receipts
pub mod document;

/// Save notifications
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use document::{DocumentId, DocumentRecord, EditableDocument, SaveReceipt, SaveTarget};
pub use error::SaveError;
pub use event::{SaveEvent, SaveEventKind};
