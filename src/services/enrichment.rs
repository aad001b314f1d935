use crate::metrics::Metrics;
use crate::models::{CharacterInfo, Item, ItemDetails};
use crate::services::item_source::{FetchError, ItemRequest, ItemSource};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that abort the enrichment stage
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Item lookup failed: {0}")]
    Transport(#[source] FetchError),

    #[error("Lookup task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Counts for one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Lookups issued
    pub requested: usize,
    /// Items that received details
    pub enriched: usize,
    /// Items left without details because the response was unusable
    pub decode_failures: usize,
}

type LookupOutcome = (usize, Duration, Result<ItemDetails, FetchError>);

/// Fills item details from an [`ItemSource`], one task per item.
///
/// All lookups are spawned together and the stage waits for every one of them
/// before touching the items. Each result is written back to the index it was
/// issued for, so tasks never share mutable state. A transport failure on any
/// lookup fails the whole stage; an undecodable response only leaves that one
/// item empty.
pub struct Enricher {
    source: Arc<dyn ItemSource>,
    locale: String,
    metrics: Arc<Metrics>,
}

impl Enricher {
    pub fn new(source: Arc<dyn ItemSource>, locale: impl Into<String>) -> Self {
        Self {
            source,
            locale: locale.into(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub async fn enrich_character(
        &self,
        character: &mut CharacterInfo,
    ) -> Result<EnrichSummary, EnrichError> {
        self.enrich(&mut character.items).await
    }

    /// Look up every item with a nonzero id that has not been looked up yet
    pub async fn enrich(&self, items: &mut [Item]) -> Result<EnrichSummary, EnrichError> {
        let mut tasks = Vec::new();

        for (index, item) in items.iter().enumerate() {
            if !item.needs_lookup() {
                continue;
            }

            let request = ItemRequest {
                item_id: item.id,
                bonus_ids: item.bonus_ids.clone(),
                locale: self.locale.clone(),
            };
            let source = self.source.clone();

            tasks.push(tokio::spawn(async move {
                let start = Instant::now();
                let result = source.fetch_item(&request).await;
                (index, start.elapsed(), result)
            }));
        }

        tracing::info!("Fetching details for {} items", tasks.len());

        let mut summary = EnrichSummary {
            requested: tasks.len(),
            ..EnrichSummary::default()
        };

        // Wait for every task before deciding the outcome
        let mut outcomes: Vec<LookupOutcome> = Vec::with_capacity(tasks.len());
        let mut first_error: Option<EnrichError> = None;
        for task in tasks {
            match task.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Lookup task join error: {}", e);
                    first_error.get_or_insert(EnrichError::TaskFailed(e));
                }
            }
        }

        for (_, _, result) in &outcomes {
            if let Err(e) = result {
                if e.is_fatal() {
                    tracing::error!("{}", e);
                    first_error.get_or_insert(EnrichError::Transport(e.clone()));
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        for (index, elapsed, result) in outcomes {
            self.metrics.record_fetch_time(elapsed);
            let item = &mut items[index];
            item.fetched = true;

            match result {
                Ok(details) => {
                    tracing::debug!(
                        "Item {} ({}) -> {} ilvl {}",
                        item.id,
                        item.slot,
                        details.name,
                        details.item_level
                    );
                    item.details = details;
                    summary.enriched += 1;
                    self.metrics.record_item_enriched();
                }
                Err(e) => {
                    tracing::warn!("{}; keeping empty details", e);
                    summary.decode_failures += 1;
                    self.metrics.record_item_decode_failed();
                }
            }
        }

        tracing::info!(
            "Enrichment complete - {} enriched, {} undecodable",
            summary.enriched,
            summary.decode_failures
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slot;
    use crate::services::item_source::MockItemSource;

    fn item(id: u32, slot: Slot) -> Item {
        let mut item = Item::new(slot, true);
        item.id = id;
        item
    }

    fn details(name: &str, item_level: u32) -> ItemDetails {
        ItemDetails {
            name: name.to_string(),
            item_level,
            ..ItemDetails::default()
        }
    }

    #[tokio::test]
    async fn test_enrich_merges_details_by_index() {
        let mut mock = MockItemSource::new();
        mock.expect_fetch_item()
            .times(2)
            .returning(|req| Ok(details(&format!("item-{}", req.item_id), req.item_id)));

        let enricher = Enricher::new(Arc::new(mock), "en_US");
        let mut items = vec![item(910, Slot::Head), item(915, Slot::Neck)];

        let summary = enricher.enrich(&mut items).await.unwrap();

        assert_eq!(summary.requested, 2);
        assert_eq!(summary.enriched, 2);
        assert_eq!(items[0].details.name, "item-910");
        assert_eq!(items[1].details.item_level, 915);
    }

    #[tokio::test]
    async fn test_zero_id_items_are_not_looked_up() {
        let mut mock = MockItemSource::new();
        mock.expect_fetch_item()
            .withf(|req| req.item_id == 5 && req.bonus_ids == vec![1, 2] && req.locale == "en_GB")
            .times(1)
            .returning(|_| Ok(details("Band", 900)));

        let enricher = Enricher::new(Arc::new(mock), "en_GB");
        let mut with_bonus = item(5, Slot::Finger1);
        with_bonus.bonus_ids = vec![1, 2];
        let mut items = vec![item(0, Slot::Back), with_bonus];

        let summary = enricher.enrich(&mut items).await.unwrap();

        assert_eq!(summary.requested, 1);
        assert!(items[0].details.is_empty());
        assert!(!items[0].fetched);
    }

    #[tokio::test]
    async fn test_items_are_fetched_at_most_once() {
        let mut mock = MockItemSource::new();
        mock.expect_fetch_item()
            .times(1)
            .returning(|_| Ok(details("Helm", 930)));

        let enricher = Enricher::new(Arc::new(mock), "en_US");
        let mut items = vec![item(1, Slot::Head)];

        enricher.enrich(&mut items).await.unwrap();
        let second = enricher.enrich(&mut items).await.unwrap();

        assert_eq!(second.requested, 0);
        assert_eq!(items[0].details.name, "Helm");
    }

    #[tokio::test]
    async fn test_decode_failure_isolated_to_one_item() {
        let mut mock = MockItemSource::new();
        mock.expect_fetch_item().returning(|req| {
            if req.item_id == 2 {
                Err(FetchError::Decode {
                    item_id: 2,
                    message: "expected value".to_string(),
                })
            } else {
                Ok(details("Fine", 940))
            }
        });

        let metrics = Arc::new(Metrics::new());
        let enricher = Enricher::new(Arc::new(mock), "en_US").with_metrics(metrics.clone());
        let mut items = vec![item(1, Slot::Head), item(2, Slot::Neck), item(3, Slot::Back)];

        let summary = enricher.enrich(&mut items).await.unwrap();

        assert_eq!(summary.enriched, 2);
        assert_eq!(summary.decode_failures, 1);
        assert!(items[1].details.is_empty());
        assert!(items[1].fetched);
        assert_eq!(items[0].details.name, "Fine");
        assert_eq!(items[2].details.name, "Fine");
        assert_eq!(metrics.items_decode_failed(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_stage() {
        let mut mock = MockItemSource::new();
        mock.expect_fetch_item().times(3).returning(|req| {
            if req.item_id == 3 {
                Err(FetchError::Transport {
                    item_id: 3,
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(details("Fine", 940))
            }
        });

        let enricher = Enricher::new(Arc::new(mock), "en_US");
        let mut items = vec![item(1, Slot::Head), item(2, Slot::Neck), item(3, Slot::Back)];

        let err = enricher.enrich(&mut items).await.unwrap_err();

        assert!(matches!(err, EnrichError::Transport(FetchError::Transport { item_id: 3, .. })));
        assert!(items.iter().all(|i| i.details.is_empty() && !i.fetched));
    }
}
