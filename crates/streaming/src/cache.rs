use std::sync::Arc;

use foundation::time::Millis;
use scene::FlightRecord;
use tracing::{debug, info};

use crate::decode::decode_feed;
use crate::errors::Result;
use crate::source::FeedSource;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Arc<[FlightRecord]>,
    fetched_at: Millis,
}

/// Records returned by [`DataCache::get`].
///
/// `records` is shared with the cache; callers treat it as read-only.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub records: Arc<[FlightRecord]>,
    pub fetched_at: Millis,
    /// True when served without any I/O.
    pub from_cache: bool,
}

/// Time-windowed cache of the most recent feed document.
///
/// Freshness: an entry fetched at `f` is served for any `now` with
/// `now - f < ttl`. Anything older triggers a fetch that replaces data and
/// timestamp together. A failed fetch or parse leaves the previous entry in
/// place (stale-if-error) and reports the error.
pub struct DataCache<S> {
    source: S,
    ttl_ms: u64,
    entry: Option<CacheEntry>,
    fetches: u64,
}

impl<S: FeedSource> DataCache<S> {
    pub fn new(source: S, ttl_ms: u64) -> Self {
        Self {
            source,
            ttl_ms,
            entry: None,
            fetches: 0,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of fetches attempted so far.
    pub fn fetches(&self) -> u64 {
        self.fetches
    }

    pub fn fetched_at(&self) -> Option<Millis> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    pub fn is_fresh(&self, now: Millis) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.since(e.fetched_at) < self.ttl_ms)
    }

    pub async fn get(&mut self, now: Millis) -> Result<FeedSnapshot> {
        if let Some(entry) = self.entry.as_ref().filter(|_| self.is_fresh(now)) {
            debug!(age_ms = now.since(entry.fetched_at), "serving cached feed");
            return Ok(FeedSnapshot {
                records: entry.data.clone(),
                fetched_at: entry.fetched_at,
                from_cache: true,
            });
        }

        self.fetches += 1;
        let body = self.source.fetch().await?;
        let decoded = decode_feed(&body)?;
        info!(
            source = %self.source.describe(),
            records = decoded.records.len(),
            rejected = decoded.rejected,
            "fetched feed"
        );

        let entry = CacheEntry {
            data: decoded.records.into(),
            fetched_at: now,
        };
        let snapshot = FeedSnapshot {
            records: entry.data.clone(),
            fetched_at: entry.fetched_at,
            from_cache: false,
        };
        self.entry = Some(entry);
        Ok(snapshot)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use foundation::time::Millis;

    use super::DataCache;
    use crate::errors::{FeedError, Result};
    use crate::source::FeedSource;

    pub(crate) const ONE_FLIGHT: &str =
        r#"{"states":[["A1","CS1","US",0,0,-117.4746,32.6831,10000,false,200,90]]}"#;

    /// In-memory source that counts fetches and can be switched to fail.
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedSource {
        pub(crate) body: Arc<Mutex<Option<String>>>,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        pub(crate) fn serving(body: &str) -> Self {
            let s = Self::default();
            s.set(Some(body));
            s
        }

        pub(crate) fn set(&self, body: Option<&str>) {
            *self.body.lock().unwrap() = body.map(str::to_string);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body.lock().unwrap().clone() {
                Some(body) => Ok(body.into_bytes()),
                None => Err(FeedError::Status(503)),
            }
        }

        fn describe(&self) -> String {
            "scripted".into()
        }
    }

    #[tokio::test]
    async fn serves_cached_data_within_ttl() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut cache = DataCache::new(src.clone(), 15_000);

        let first = cache.get(Millis(0)).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(src.calls(), 1);

        let cached = cache.get(Millis(14_999)).await.unwrap();
        assert!(cached.from_cache);
        assert!(Arc::ptr_eq(&first.records, &cached.records));
        assert_eq!(src.calls(), 1);

        let refetched = cache.get(Millis(15_001)).await.unwrap();
        assert!(!refetched.from_cache);
        assert!(!Arc::ptr_eq(&first.records, &refetched.records));
        assert_eq!(refetched.fetched_at, Millis(15_001));
        assert_eq!(src.calls(), 2);
    }

    #[tokio::test]
    async fn expires_exactly_at_ttl() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut cache = DataCache::new(src.clone(), 15_000);
        cache.get(Millis(0)).await.unwrap();
        assert!(!cache.get(Millis(15_000)).await.unwrap().from_cache);
        assert_eq!(src.calls(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_entry() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut cache = DataCache::new(src.clone(), 1_000);
        let first = cache.get(Millis(0)).await.unwrap();

        src.set(None);
        let err = cache.get(Millis(5_000)).await.unwrap_err();
        assert!(matches!(err, FeedError::Status(503)));
        assert_eq!(cache.fetched_at(), Some(Millis(0)));

        src.set(Some("not json"));
        let err = cache.get(Millis(6_000)).await.unwrap_err();
        assert!(err.is_parse());
        assert_eq!(cache.fetched_at(), Some(Millis(0)));

        // Still stale, so the next call retries; nothing was served from the failed attempts.
        src.set(Some(ONE_FLIGHT));
        let next = cache.get(Millis(7_000)).await.unwrap();
        assert!(!Arc::ptr_eq(&first.records, &next.records));
        assert_eq!(cache.fetches(), 4);
    }
}
