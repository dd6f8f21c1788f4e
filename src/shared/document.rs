/**
 * Document Types
 *
 * This module defines the document model edited by a session: the opaque
 * document id, the save target (an existing document or a draft not yet
 * created on the server) and the receipt returned by a successful save.
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Where the next save goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SaveTarget {
    /// A document that already exists on the server
    Existing(DocumentId),
    /// A new document; the first save creates it
    Draft,
}

impl SaveTarget {
    /// The document id, if the server has assigned one
    pub fn document_id(&self) -> Option<DocumentId> {
        match self {
            Self::Existing(id) => Some(*id),
            Self::Draft => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing(id) => write!(f, "{}", id),
            Self::Draft => f.write_str("draft"),
        }
    }
}

/// Acknowledgement of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Id of the saved document (newly assigned for drafts)
    #[serde(rename = "id")]
    pub document_id: DocumentId,
    /// Server version after the save, when the backend reports one
    #[serde(default)]
    pub version: Option<String>,
}

impl SaveReceipt {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            version: None,
        }
    }

    /// Set the server version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A document as held by one editor session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableDocument {
    /// Save target of this document
    pub target: SaveTarget,
    /// Document title
    pub title: String,
    /// Serialized rich-text markup
    pub content: String,
}

impl EditableDocument {
    /// An empty draft that has not been created on the server yet
    pub fn draft(title: impl Into<String>) -> Self {
        Self {
            target: SaveTarget::Draft,
            title: title.into(),
            content: String::new(),
        }
    }

    /// A document loaded from the server
    pub fn existing(id: DocumentId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: SaveTarget::Existing(id),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Wire shape of a document returned by the documents API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl From<DocumentRecord> for EditableDocument {
    fn from(record: DocumentRecord) -> Self {
        Self::existing(record.id, record.title, record.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_parse_and_display() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_save_target_document_id() {
        let id = DocumentId::new();
        assert_eq!(SaveTarget::Existing(id).document_id(), Some(id));
        assert_eq!(SaveTarget::Draft.document_id(), None);
        assert!(SaveTarget::Draft.is_draft());
        assert_eq!(SaveTarget::Draft.to_string(), "draft");
    }

    #[test]
    fn test_receipt_deserializes_server_shape() {
        let id = DocumentId::new();
        let json = serde_json::json!({ "id": id.to_string(), "version": "v7" });
        let receipt: SaveReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(receipt, SaveReceipt::new(id).with_version("v7"));

        let json = serde_json::json!({ "id": id.to_string() });
        let receipt: SaveReceipt = serde_json::from_value(json).unwrap();
        assert!(receipt.version.is_none());
    }

    #[test]
    fn test_record_into_editable() {
        let id = DocumentId::new();
        let record = DocumentRecord {
            id,
            title: "Notes".to_string(),
            content: "<p>hi</p>".to_string(),
            version: None,
        };
        let doc = EditableDocument::from(record);
        assert_eq!(doc.target, SaveTarget::Existing(id));
        assert_eq!(doc.content, "<p>hi</p>");
    }
}
