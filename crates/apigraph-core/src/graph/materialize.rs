//! Graph materializer
//!
//! Applies the writes planned by [`graph_writes`] to a [`GraphStore`], one
//! statement at a time. Each write is idempotent, so documents can be
//! materialized concurrently and replayed safely. Transient store failures
//! are retried with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::convert::{graph_writes, GraphWrite};
use super::model::EntityNode;
use super::store::{GraphStore, StoreError};

/// Backoff schedule for store writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per write, the first included
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, capped
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Writes applied for one node list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Writes resolved node lists into a store
pub struct Materializer<'a> {
    store: &'a dyn GraphStore,
    retry: RetryPolicy,
}

impl<'a> Materializer<'a> {
    #[must_use]
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Clear the whole store
    ///
    /// # Errors
    /// Returns the store error once retries are exhausted.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.with_retry_loop("clear", || self.store.clear()).await
    }

    /// Upsert every node of a resolved list with its edges
    ///
    /// # Errors
    /// Returns the first store error that persists after retries. Writes
    /// already applied stay in the store.
    pub async fn materialize(&self, nodes: &[EntityNode]) -> Result<MaterializeSummary, StoreError> {
        let mut summary = MaterializeSummary::default();

        for write in graph_writes(nodes) {
            match &write {
                GraphWrite::Node(node) => {
                    self.with_retry_loop(&node.unique_key, || self.store.upsert_node(node))
                        .await?;
                    summary.nodes += 1;
                }
                GraphWrite::Edge(edge) => {
                    self.with_retry_loop(&edge.source_key, || self.store.merge_edge(edge))
                        .await?;
                    summary.edges += 1;
                }
            }
        }

        debug!(nodes = summary.nodes, edges = summary.edges, "Materialized node list");
        Ok(summary)
    }

    async fn with_retry_loop<F, Fut>(&self, target: &str, write: F) -> Result<(), StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<(), StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match write().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let backoff = self.retry.delay_for(attempt);
                    warn!(
                        "Store write for {target} failed: {e}. Retrying in {backoff:?} (attempt {attempt}/{})",
                        self.retry.max_attempts
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Store write for {target} failed after {attempt} attempt(s): {e}");
                    return Err(e);
                }
            }
        }
    }
}
