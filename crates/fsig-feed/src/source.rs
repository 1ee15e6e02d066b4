//! Signal source trait.
//!
//! The aggregator only sees this trait, so tests can drive it with
//! scripted batches instead of a live page.

use fsig_core::CandidateSignal;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Source of candidate signals.
pub trait SignalSource: Send + Sync {
    /// Fetch one batch of candidates in feed order.
    ///
    /// Never fails: a failed fetch is logged by the implementation and
    /// yields an empty batch, so callers can simply fetch again.
    fn fetch(&self) -> BoxFuture<'_, Vec<CandidateSignal>>;
}

/// Arc wrapper for SignalSource trait objects.
pub type DynSignalSource = Arc<dyn SignalSource>;

/// Scripted source for testing.
///
/// Returns the queued batches in order, then the fallback batch forever.
#[derive(Debug, Default)]
pub struct ScriptedSignalSource {
    batches: Mutex<VecDeque<Vec<CandidateSignal>>>,
    fallback: Vec<CandidateSignal>,
    calls: AtomicU32,
}

impl ScriptedSignalSource {
    /// Queue the given batches; empty batches after they run out.
    pub fn new(batches: Vec<Vec<CandidateSignal>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            fallback: Vec::new(),
            calls: AtomicU32::new(0),
        }
    }

    /// Return the same batch on every fetch.
    pub fn repeating(batch: Vec<CandidateSignal>) -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            fallback: batch,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SignalSource for ScriptedSignalSource {
    fn fetch(&self) -> BoxFuture<'_, Vec<CandidateSignal>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsig_core::Action;

    #[tokio::test]
    async fn test_scripted_batches_then_empty() {
        let source = ScriptedSignalSource::new(vec![vec![CandidateSignal::new(
            "BTC-OTC",
            "10:00",
            Action::Call,
            99.0,
        )]]);
        assert_eq!(source.fetch().await.len(), 1);
        assert!(source.fetch().await.is_empty());
        assert!(source.fetch().await.is_empty());
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn test_repeating_source() {
        let batch = vec![CandidateSignal::new("BTC-OTC", "10:00", Action::Put, 99.0)];
        let source = ScriptedSignalSource::repeating(batch.clone());
        assert_eq!(tokio_test::block_on(source.fetch()), batch);
        assert_eq!(tokio_test::block_on(source.fetch()), batch);
        assert_eq!(source.calls(), 2);
    }
}
