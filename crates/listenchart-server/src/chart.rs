//! Per-request series assembly: range -> store lookups -> extraction.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::{self, StreamExt};

use listenchart_core::error::{ListenChartError, Result};
use listenchart_core::extract::last_month_listeners;
use listenchart_core::range::{storage_key, DateRange};
use listenchart_core::series::MetricRecord;

use crate::obs::ServerMetrics;
use crate::store::ListenerStore;

/// Look up every day in `range` and extract its listener count.
///
/// Lookups run with at most `max_in_flight` outstanding; records come back in
/// range order regardless. Missing keys, unparsable blobs and per-key store
/// errors all yield a record with no value.
///
/// Once the store reports itself unreachable, lookups not yet started are
/// skipped and counted as unavailable, so an outage costs at most
/// `max_in_flight` attempts per request. If no day could be read because of
/// the outage, the error is returned instead of records.
pub async fn collect_records(
    store: &dyn ListenerStore,
    range: DateRange,
    max_in_flight: usize,
    metrics: &ServerMetrics,
) -> Result<Vec<MetricRecord>> {
    let store_down = AtomicBool::new(false);
    let store_down = &store_down;

    let lookups: Vec<_> = stream::iter(range.iter())
        .map(|date| async move {
            let key = storage_key(date);
            if store_down.load(Ordering::Relaxed) {
                return (date, key, None);
            }
            let res = store.get(&key).await;
            if matches!(&res, Err(e) if e.is_unavailable()) {
                store_down.store(true, Ordering::Relaxed);
            }
            (date, key, Some(res))
        })
        .buffered(max_in_flight.max(1))
        .collect()
        .await;

    let mut records = Vec::with_capacity(lookups.len());
    let mut unavailable = 0usize;
    let mut skipped = 0usize;
    let mut last_unavailable: Option<ListenChartError> = None;

    for (date, key, res) in lookups {
        let Some(res) = res else {
            metrics.store_lookups.inc(&[("outcome", "skipped")]);
            unavailable += 1;
            skipped += 1;
            records.push(MetricRecord::missing(date));
            continue;
        };

        let value = match res {
            Ok(Some(raw)) => {
                metrics.store_lookups.inc(&[("outcome", "hit")]);
                let value = last_month_listeners(&raw);
                if value.is_some() {
                    metrics.extractions.inc(&[("outcome", "found")]);
                } else {
                    metrics.extractions.inc(&[("outcome", "not_found")]);
                    tracing::debug!(%key, bytes = raw.len(), "listener field not found in blob");
                }
                value
            }
            Ok(None) => {
                metrics.store_lookups.inc(&[("outcome", "miss")]);
                tracing::debug!(%key, "no blob stored");
                None
            }
            Err(e) => {
                metrics.store_lookups.inc(&[("outcome", "error")]);
                tracing::warn!(%key, code = e.code().as_str(), error = %e, "store lookup failed");
                if e.is_unavailable() {
                    unavailable += 1;
                    last_unavailable = Some(e);
                }
                None
            }
        };
        records.push(MetricRecord::new(date, value));
    }

    if skipped > 0 {
        tracing::warn!(skipped, "store unreachable, remaining lookups skipped");
    }

    match last_unavailable {
        Some(e) if unavailable == records.len() => Err(e),
        _ => Ok(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Unreachable store that counts how often it was asked.
    #[derive(Default)]
    struct DownStore {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ListenerStore for DownStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(ListenChartError::StoreUnavailable("connection refused".into()))
        }
    }

    fn long_range() -> DateRange {
        let start = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or(NaiveDate::MAX);
        DateRange::new(start, end)
    }

    /// Answers later keys faster, so completion order is reversed.
    struct SlowEarlyStore;

    #[async_trait]
    impl ListenerStore for SlowEarlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let day: u64 = key[8..].parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(40u64.saturating_sub(day * 4))).await;
            Ok(Some(format!(r#""lastMonthListeners\":{day}"#)))
        }
    }

    #[tokio::test]
    async fn order_follows_range_not_completion() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap_or(NaiveDate::MAX);
        let metrics = ServerMetrics::default();

        let records = collect_records(&SlowEarlyStore, DateRange::new(start, end), 8, &metrics)
            .await
            .unwrap_or_default();

        let values: Vec<_> = records.iter().map(|r| r.value).collect();
        assert_eq!(values, (1..=8).map(Some).collect::<Vec<_>>());
        assert_eq!(records.first().map(|r| r.date), Some(start));
    }

    #[tokio::test]
    async fn outage_stops_after_first_failure() {
        let store = DownStore::default();
        let metrics = ServerMetrics::default();

        let res = collect_records(&store, long_range(), 1, &metrics).await;

        assert!(res.err().is_some_and(|e| e.is_unavailable()));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.store_lookups.get(&[("outcome", "error")]), 1);
        assert_eq!(
            metrics.store_lookups.get(&[("outcome", "skipped")]) as usize,
            long_range().len() - 1
        );
    }

    #[tokio::test]
    async fn outage_attempts_bounded_by_in_flight() {
        let store = DownStore::default();
        let metrics = ServerMetrics::default();

        let res = collect_records(&store, long_range(), 4, &metrics).await;

        assert!(res.is_err());
        let attempts = store.attempts.load(Ordering::SeqCst);
        assert!((1..=4).contains(&attempts), "attempts = {attempts}");
    }
}
