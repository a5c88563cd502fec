//! In-memory catalog
//!
//! A fixture-backed [`CatalogClient`] used for offline mode and tests. Every
//! operation is counted so callers can assert how often the upstream was
//! actually hit, and an optional artificial latency makes concurrency
//! observable.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::traits::CatalogClient;
use crate::errors::{CatalogError, CatalogResult};
use crate::models::{CatalogEntryDetails, CatalogEntryRef, EntityId};

/// Catalog operations, for call accounting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogOperation {
    CategoryLabels,
    AllNames,
    EntriesByCategory,
    LiteByName,
    DetailsById,
    DetailsByName,
    TotalCount,
    Page,
}

impl CatalogOperation {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }
}

/// Fixture catalog keyed by id
pub struct InMemoryCatalog {
    entries: BTreeMap<EntityId, CatalogEntryDetails>,
    latency: Option<Duration>,
    calls: [AtomicUsize; CatalogOperation::COUNT],
    failing: Mutex<HashSet<CatalogOperation>>,
    details_gauge: ConcurrencyGauge,
    lite_gauge: ConcurrencyGauge,
}

/// Tracks how many calls of one kind run at once, and the highest seen
#[derive(Default)]
struct ConcurrencyGauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl InMemoryCatalog {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntryDetails>,
    {
        Self {
            entries: entries.into_iter().map(|e| (e.id, e)).collect(),
            latency: None,
            calls: Default::default(),
            failing: Mutex::new(HashSet::new()),
            details_gauge: ConcurrencyGauge::default(),
            lite_gauge: ConcurrencyGauge::default(),
        }
    }

    /// Small built-in catalog: the Kanto starters plus the Pikachu line
    pub fn sample() -> Self {
        const SAMPLE: &[(EntityId, &str, u32, u32, &[&str])] = &[
            (1, "bulbasaur", 7, 69, &["grass", "poison"]),
            (2, "ivysaur", 10, 130, &["grass", "poison"]),
            (3, "venusaur", 20, 1000, &["grass", "poison"]),
            (4, "charmander", 6, 85, &["fire"]),
            (5, "charmeleon", 11, 190, &["fire"]),
            (6, "charizard", 17, 905, &["fire", "flying"]),
            (7, "squirtle", 5, 90, &["water"]),
            (8, "wartortle", 10, 225, &["water"]),
            (9, "blastoise", 16, 855, &["water"]),
            (25, "pikachu", 4, 60, &["electric"]),
            (26, "raichu", 8, 300, &["electric"]),
            (172, "pichu", 3, 20, &["electric"]),
        ];

        Self::new(
            SAMPLE
                .iter()
                .map(|(id, name, height, weight, types)| CatalogEntryDetails {
                    id: *id,
                    name: name.to_string(),
                    height: *height,
                    weight: *weight,
                    base_experience: None,
                    types: types.iter().map(|t| t.to_string()).collect(),
                    sprite: None,
                }),
        )
    }

    /// Delay every operation by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make `operation` fail with a transport error until cleared
    pub fn fail(&self, operation: CatalogOperation) {
        self.failing_ops().insert(operation);
    }

    pub fn clear_failures(&self) {
        self.failing_ops().clear();
    }

    /// Number of times `operation` has been invoked
    pub fn calls(&self, operation: CatalogOperation) -> usize {
        self.calls[operation.index()].load(Ordering::SeqCst)
    }

    /// Invocations across all operations
    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Highest number of `details_by_id` calls observed running at once
    pub fn peak_concurrent_details(&self) -> usize {
        self.details_gauge.peak()
    }

    /// Highest number of `lite_by_name` calls observed running at once
    pub fn peak_concurrent_lite(&self) -> usize {
        self.lite_gauge.peak()
    }

    fn failing_ops(&self) -> std::sync::MutexGuard<'_, HashSet<CatalogOperation>> {
        // Poisoning only happens if a test panicked mid-update; the set is still usable.
        self.failing.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, operation: CatalogOperation) -> CatalogResult<()> {
        self.calls[operation.index()].fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_ops().contains(&operation) {
            return Err(CatalogError::Transport {
                url: format!("memory://{operation:?}"),
                message: "injected failure".to_string(),
            });
        }

        Ok(())
    }

    fn find_by_name(&self, name: &str) -> Option<&CatalogEntryDetails> {
        self.entries
            .values()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn all_category_labels(&self) -> CatalogResult<Vec<String>> {
        self.enter(CatalogOperation::CategoryLabels).await?;

        let labels: BTreeSet<&String> = self.entries.values().flat_map(|e| &e.types).collect();
        Ok(labels.into_iter().cloned().collect())
    }

    async fn all_names(&self) -> CatalogResult<Vec<String>> {
        self.enter(CatalogOperation::AllNames).await?;
        Ok(self.entries.values().map(|e| e.name.clone()).collect())
    }

    async fn entries_by_category(
        &self,
        label: &str,
        max: usize,
    ) -> CatalogResult<Vec<CatalogEntryRef>> {
        self.enter(CatalogOperation::EntriesByCategory).await?;

        Ok(self
            .entries
            .values()
            .rev()
            .filter(|e| e.types.iter().any(|t| t.eq_ignore_ascii_case(label)))
            .take(max)
            .map(CatalogEntryDetails::as_ref_entry)
            .collect())
    }

    async fn lite_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryRef>> {
        self.lite_gauge.enter();
        let result = self.enter(CatalogOperation::LiteByName).await;
        self.lite_gauge.exit();
        result?;

        Ok(self.find_by_name(name).map(CatalogEntryDetails::as_ref_entry))
    }

    async fn details_by_id(&self, id: EntityId) -> CatalogResult<Option<CatalogEntryDetails>> {
        self.details_gauge.enter();
        let result = self.enter(CatalogOperation::DetailsById).await;
        self.details_gauge.exit();
        result?;

        Ok(self.entries.get(&id).cloned())
    }

    async fn details_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryDetails>> {
        self.enter(CatalogOperation::DetailsByName).await?;
        Ok(self.find_by_name(name).cloned())
    }

    async fn total_count(&self) -> CatalogResult<u64> {
        self.enter(CatalogOperation::TotalCount).await?;
        Ok(self.entries.len() as u64)
    }

    async fn page(&self, page: u32, page_size: u32) -> CatalogResult<Vec<CatalogEntryDetails>> {
        self.enter(CatalogOperation::Page).await?;

        let offset = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
        Ok(self
            .entries
            .values()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}
