//! The persist collaborator injected into an auto-save coordinator.

use crate::shared::{SaveError, SaveReceipt, SaveTarget};
use futures_util::future::BoxFuture;
use std::future::Future;

/// Persists document content on behalf of an auto-save coordinator.
///
/// Implementations must be idempotent for identical content: the coordinator
/// may send the same payload twice (for example after a failed attempt). A
/// save for [`SaveTarget::Draft`] creates the document and reports the
/// assigned id in the receipt.
///
/// Any `Fn(SaveTarget, String) -> impl Future<Output = Result<SaveReceipt, SaveError>>`
/// closure is a saver, which keeps tests and one-off callers free of
/// boilerplate types.
pub trait DocumentSaver: Send + Sync + 'static {
    fn save(
        &self,
        target: SaveTarget,
        content: String,
    ) -> BoxFuture<'static, Result<SaveReceipt, SaveError>>;
}

impl<F, Fut> DocumentSaver for F
where
    F: Fn(SaveTarget, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SaveReceipt, SaveError>> + Send + 'static,
{
    fn save(
        &self,
        target: SaveTarget,
        content: String,
    ) -> BoxFuture<'static, Result<SaveReceipt, SaveError>> {
        Box::pin(self(target, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DocumentId;

    #[tokio::test]
    async fn test_closure_is_a_saver() {
        let id = DocumentId::new();
        let saver = move |target: SaveTarget, content: String| async move {
            assert_eq!(content, "<p>hello</p>");
            Ok(SaveReceipt::new(target.document_id().unwrap_or(id)))
        };

        let receipt = saver
            .save(SaveTarget::Draft, "<p>hello</p>".to_string())
            .await
            .unwrap();
        assert_eq!(receipt.document_id, id);
    }
}
