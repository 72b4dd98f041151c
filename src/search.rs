//! Debounced search-as-you-type
//!
//! Every query edit takes a ticket from a shared [`SearchSequence`]. A
//! search only reaches the network if no newer ticket was issued during the
//! quiet window, and its results are dropped if a newer ticket appeared
//! while the request was in flight. In-flight requests are not aborted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::config::SearchConfig;
use crate::models::Location;
use crate::weather::Geocoder;

/// Identifies one query edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket counter shared by the orchestrator and the debouncer
#[derive(Debug, Clone, Default)]
pub struct SearchSequence {
    latest: Arc<AtomicU64>,
}

impl SearchSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier one
    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersede all outstanding tickets without issuing a new one
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_latest(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Waits out the quiet window, then searches if the ticket is still current
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    sequence: SearchSequence,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(window: Duration, sequence: SearchSequence) -> Self {
        Self { window, sequence }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig, sequence: SearchSequence) -> Self {
        Self::new(config.debounce(), sequence)
    }

    /// `None` when the ticket was superseded, either before the request went
    /// out or while it was in flight.
    pub async fn search<G>(
        &self,
        geocoder: &G,
        ticket: SearchTicket,
        query: &str,
    ) -> Option<Result<Vec<Location>>>
    where
        G: Geocoder + ?Sized,
    {
        tokio::time::sleep(self.window).await;
        if !self.sequence.is_latest(ticket) {
            debug!("Search {} superseded before sending", ticket.id());
            return None;
        }

        let result = geocoder.search_locations(query).await;

        if !self.sequence.is_latest(ticket) {
            debug!("Discarding stale results for search {}", ticket.id());
            return None;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records queries; optionally sleeps to simulate a slow upstream
    #[derive(Default)]
    struct RecordingGeocoder {
        queries: Mutex<Vec<String>>,
        delay: Duration,
    }

    #[async_trait]
    impl Geocoder for RecordingGeocoder {
        async fn search_locations(&self, query: &str) -> Result<Vec<Location>> {
            self.queries.lock().unwrap().push(query.to_string());
            tokio::time::sleep(self.delay).await;
            Ok(vec![Location::new(query, 1.0, 2.0, "Testland", "UTC")])
        }
    }

    #[test]
    fn test_tickets_supersede_each_other() {
        let sequence = SearchSequence::new();
        let first = sequence.issue();
        assert!(sequence.is_latest(first));

        let second = sequence.issue();
        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));

        sequence.invalidate();
        assert!(!sequence.is_latest(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_window_coalesces_typing() {
        let sequence = SearchSequence::new();
        let debouncer = SearchDebouncer::new(Duration::from_millis(300), sequence.clone());
        let geocoder = RecordingGeocoder::default();

        let first = sequence.issue();
        let typing_on = async {
            tokio::time::sleep(Duration::from_millis(120)).await;
            let second = sequence.issue();
            debouncer.search(&geocoder, second, "Berl").await
        };

        let (stale, fresh) = tokio::join!(debouncer.search(&geocoder, first, "Be"), typing_on);

        assert!(stale.is_none());
        let locations = fresh.unwrap().unwrap();
        assert_eq!(locations[0].name, "Berl");
        assert_eq!(*geocoder.queries.lock().unwrap(), vec!["Berl".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_is_discarded() {
        let sequence = SearchSequence::new();
        let debouncer = SearchDebouncer::new(Duration::from_millis(300), sequence.clone());
        let slow = RecordingGeocoder {
            delay: Duration::from_secs(5),
            ..Default::default()
        };
        let fast = RecordingGeocoder::default();

        let first = sequence.issue();
        let later = async {
            // past the first window, so the first request is already in flight
            tokio::time::sleep(Duration::from_millis(400)).await;
            let second = sequence.issue();
            debouncer.search(&fast, second, "Rome").await
        };

        let (stale, fresh) = tokio::join!(debouncer.search(&slow, first, "Ro"), later);

        // the slow request was sent but its answer is dropped
        assert_eq!(slow.queries.lock().unwrap().len(), 1);
        assert!(stale.is_none());
        assert_eq!(fresh.unwrap().unwrap()[0].name, "Rome");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_window() {
        let sequence = SearchSequence::new();
        let debouncer = SearchDebouncer::new(Duration::from_millis(300), sequence.clone());
        let geocoder = RecordingGeocoder::default();

        let started = tokio::time::Instant::now();
        let ticket = sequence.issue();
        let result = debouncer.search(&geocoder, ticket, "Oslo").await;

        assert!(result.is_some());
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
