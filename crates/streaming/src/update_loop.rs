use std::sync::Arc;
use std::time::Duration;

use foundation::time::{Clock, Millis};
use scene::{EntityRegistry, MarkerSnapshot, RegistryOptions};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::DataCache;
use crate::errors::Result;
use crate::source::FeedSource;

/// Monotonic clock on tokio's timebase, so paused-time tests stay deterministic.
#[derive(Debug, Copy, Clone)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Millis {
        Millis(self.start.elapsed().as_millis() as u64)
    }
}

/// Result of one completed refresh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub generation: u32,
    pub markers: usize,
    pub records: usize,
    pub from_cache: bool,
}

/// Read side of the live marker set.
///
/// Each `current()` call yields a complete snapshot; a refresh swaps the whole
/// `Arc`, so readers never observe a partially rebuilt set.
#[derive(Debug, Clone)]
pub struct MarkerFeed {
    rx: watch::Receiver<Arc<MarkerSnapshot>>,
}

impl MarkerFeed {
    pub fn current(&self) -> Arc<MarkerSnapshot> {
        self.rx.borrow().clone()
    }

    /// Wait until a refresh publishes a new snapshot.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Periodic refresh: cache read, registry rebuild, snapshot swap.
///
/// Overlap policy is *skip*: refreshes run inline in a single task, so a
/// timer tick that comes due while a refresh is in flight is dropped
/// (`MissedTickBehavior::Skip`) rather than queued or run concurrently.
pub struct FeedUpdateLoop<S> {
    cache: DataCache<S>,
    registry: EntityRegistry,
    period: Duration,
    publisher: watch::Sender<Arc<MarkerSnapshot>>,
}

impl<S: FeedSource> FeedUpdateLoop<S> {
    pub fn new(cache: DataCache<S>, registry_opts: RegistryOptions, period: Duration) -> Self {
        let registry = EntityRegistry::new(registry_opts);
        let (publisher, _rx) = watch::channel(registry.current());
        Self {
            cache,
            registry,
            period,
            publisher,
        }
    }

    pub fn subscribe(&self) -> MarkerFeed {
        MarkerFeed {
            rx: self.publisher.subscribe(),
        }
    }

    pub fn cache(&self) -> &DataCache<S> {
        &self.cache
    }

    /// One refresh cycle.
    ///
    /// On error nothing is published and the previous snapshot stays live.
    pub async fn refresh(&mut self, now: Millis) -> Result<RefreshOutcome> {
        let feed = self.cache.get(now).await?;

        // Everything below runs without suspension: rebuild and swap are one step.
        let snapshot = self.registry.rebuild(&feed.records);
        let outcome = RefreshOutcome {
            generation: snapshot.generation(),
            markers: snapshot.len(),
            records: feed.records.len(),
            from_cache: feed.from_cache,
        };
        self.publisher.send_replace(snapshot);
        Ok(outcome)
    }

    /// Drive refreshes until `shutdown` is cancelled.
    ///
    /// A zero period refreshes once and returns. A refresh still in flight at
    /// cancellation is dropped, so its result is never published.
    pub async fn run(mut self, clock: impl Clock, shutdown: CancellationToken) {
        if self.period.is_zero() {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                res = self.refresh(clock.now()) => log_refresh(&res),
            }
            return;
        }

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }
            tokio::select! {
                _ = shutdown.cancelled() => break,
                res = self.refresh(clock.now()) => log_refresh(&res),
            }
        }
        info!("feed update loop stopped");
    }
}

fn log_refresh(res: &Result<RefreshOutcome>) {
    match res {
        Ok(o) => info!(
            generation = o.generation,
            markers = o.markers,
            records = o.records,
            from_cache = o.from_cache,
            "refreshed markers"
        ),
        Err(err) => warn!("feed refresh failed, keeping previous markers: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use foundation::time::Millis;
    use scene::RegistryOptions;
    use tokio_util::sync::CancellationToken;

    use super::{FeedUpdateLoop, TokioClock};
    use crate::cache::DataCache;
    use crate::cache::tests::{ONE_FLIGHT, ScriptedSource};
    use crate::errors::Result;
    use crate::source::FeedSource;

    const GROUNDED: &str =
        r#"{"states":[["A1","CS1","US",0,0,-117.4746,32.6831,10000,true,200,90]]}"#;

    fn update_loop(
        src: ScriptedSource,
        ttl: u64,
        period_ms: u64,
    ) -> FeedUpdateLoop<ScriptedSource> {
        FeedUpdateLoop::new(
            DataCache::new(src, ttl),
            RegistryOptions::default(),
            Duration::from_millis(period_ms),
        )
    }

    #[tokio::test]
    async fn refresh_publishes_a_complete_snapshot() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut lp = update_loop(src, 15_000, 30_000);
        let feed = lp.subscribe();
        assert!(feed.current().is_empty());

        let outcome = lp.refresh(Millis(0)).await.unwrap();
        assert_eq!(outcome.markers, 1);
        assert_eq!(outcome.records, 1);

        let snap = feed.current();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.generation(), outcome.generation);
        let id = snap.markers()[0].id;
        assert_eq!(snap.lookup(id).unwrap().callsign, "CS1");
    }

    #[tokio::test]
    async fn grounded_aircraft_produce_no_markers() {
        let mut lp = update_loop(ScriptedSource::serving(GROUNDED), 15_000, 0);
        let outcome = lp.refresh(Millis(0)).await.unwrap();
        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.markers, 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut lp = update_loop(src.clone(), 0, 30_000);
        let feed = lp.subscribe();
        lp.refresh(Millis(0)).await.unwrap();
        let before = feed.current();

        src.set(None);
        assert!(lp.refresh(Millis(1)).await.is_err());
        assert!(Arc::ptr_eq(&before, &feed.current()));
    }

    #[tokio::test]
    async fn cached_refresh_still_rebuilds_registry() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let mut lp = update_loop(src.clone(), 15_000, 30_000);
        let first = lp.refresh(Millis(0)).await.unwrap();
        let second = lp.refresh(Millis(10)).await.unwrap();
        assert!(second.from_cache);
        assert_ne!(first.generation, second.generation);
        assert_eq!(src.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_loop_refreshes_on_each_tick() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let lp = update_loop(src.clone(), 0, 1_000);
        let feed = lp.subscribe();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(lp.run(TokioClock::new(), shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(src.calls(), 3);
        assert_eq!(feed.current().len(), 1);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_refreshes_once() {
        let src = ScriptedSource::serving(ONE_FLIGHT);
        let lp = update_loop(src.clone(), 0, 0);
        lp.run(TokioClock::new(), CancellationToken::new()).await;
        assert_eq!(src.calls(), 1);
    }

    /// Source whose fetch takes longer than the refresh period.
    ///
    /// Calls are counted when a fetch starts.
    struct SlowSource {
        inner: ScriptedSource,
        delay: Duration,
    }

    #[async_trait]
    impl FeedSource for SlowSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            let body = self.inner.fetch().await;
            tokio::time::sleep(self.delay).await;
            body
        }

        fn describe(&self) -> String {
            "slow".into()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_never_overlap() {
        let inner = ScriptedSource::serving(ONE_FLIGHT);
        let src = SlowSource {
            inner: inner.clone(),
            delay: Duration::from_millis(2_500),
        };
        let lp = FeedUpdateLoop::new(
            DataCache::new(src, 0),
            RegistryOptions::default(),
            Duration::from_millis(1_000),
        );
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(lp.run(TokioClock::new(), shutdown.clone()));

        // Fetches start at 0 and again at 2500 when the first completes; the
        // ticks due at 1000 and 2000 are not run alongside it.
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        assert_eq!(inner.calls(), 2);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_in_flight_result() {
        let inner = ScriptedSource::serving(ONE_FLIGHT);
        let src = SlowSource {
            inner: inner.clone(),
            delay: Duration::from_secs(10),
        };
        let lp = FeedUpdateLoop::new(
            DataCache::new(src, 0),
            RegistryOptions::default(),
            Duration::from_secs(30),
        );
        let feed = lp.subscribe();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(lp.run(TokioClock::new(), shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(inner.calls(), 1);
        assert!(feed.current().is_empty());
        assert_eq!(feed.current().generation(), 0);
    }
}
