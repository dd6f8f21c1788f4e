//! Common test utilities and helpers
//!
//! A saver that records every call, simulates latency on the tokio clock and
//! tracks how many saves overlap.

#![allow(dead_code)]

use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use xfdocs::editor::DocumentSaver;
use xfdocs::shared::{DocumentId, SaveError, SaveReceipt, SaveTarget};

/// One observed `save()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCall {
    /// Time since the saver was created
    pub at: Duration,
    pub target: SaveTarget,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct RecordingSaver {
    origin: Instant,
    latency: Arc<Mutex<Duration>>,
    calls: Arc<Mutex<Vec<SaveCall>>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    assigned: DocumentId,
}

impl RecordingSaver {
    /// Must be created inside the runtime whose clock the test drives
    pub fn new(latency: Duration) -> Self {
        Self {
            origin: Instant::now(),
            latency: Arc::new(Mutex::new(latency)),
            calls: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
            assigned: DocumentId::new(),
        }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Id handed out when a draft is created
    pub fn assigned_id(&self) -> DocumentId {
        self.assigned
    }

    pub fn calls(&self) -> Vec<SaveCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.content).collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl DocumentSaver for RecordingSaver {
    fn save(
        &self,
        target: SaveTarget,
        content: String,
    ) -> BoxFuture<'static, Result<SaveReceipt, SaveError>> {
        let this = self.clone();
        Box::pin(async move {
            this.calls.lock().unwrap().push(SaveCall {
                at: this.origin.elapsed(),
                target,
                content,
            });
            let now = this.active.fetch_add(1, Ordering::SeqCst) + 1;
            this.peak.fetch_max(now, Ordering::SeqCst);

            let latency = *this.latency.lock().unwrap();
            tokio::time::sleep(latency).await;

            this.active.fetch_sub(1, Ordering::SeqCst);
            this.completed.fetch_add(1, Ordering::SeqCst);
            if this.failing.load(Ordering::SeqCst) {
                Err(SaveError::network("connection refused"))
            } else {
                Ok(SaveReceipt::new(target.document_id().unwrap_or(this.assigned)))
            }
        })
    }
}

/// Assert `actual` is within a millisecond of `expected_ms`
pub fn assert_at(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    let slack = Duration::from_millis(1);
    assert!(
        actual >= expected && actual <= expected + slack,
        "expected a save at {:?}, got {:?}",
        expected,
        actual
    );
}

/// Existing-document target with a fresh id
pub fn existing() -> SaveTarget {
    SaveTarget::Existing(DocumentId::new())
}
