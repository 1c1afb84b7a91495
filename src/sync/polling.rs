use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_stream::{wrappers::IntervalStream, StreamExt};
use tracing::{debug, trace};

use crate::{config::settings::DEFAULT_POLL_INTERVAL_MS, error::ClientError};

type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;
type SameFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// When a successful fetch reaches the subscriber.
pub enum Delivery<T> {
    /// Only when the value differs from the last delivered one.
    OnChange(SameFn<T>),
    /// Every successful fetch, changed or not.
    EveryFetch,
}

/// Repeatedly fetches a resource and reports value-level changes, standing
/// in for a push subscription.
///
/// Each tick spawns its own fetch, so a slow response never holds back the
/// next tick. Responses carry the tick's sequence number and anything older
/// than the newest applied response is dropped, so values are applied in
/// issue order even when the network reorders them.
pub struct PollingChannel<T> {
    name: String,
    fetch: FetchFn<T>,
    interval: Duration,
    delivery: Delivery<T>,
}

impl<T> PollingChannel<T>
where
    T: Clone + Send + 'static,
{
    pub fn new<F, Fut>(name: impl Into<String>, fetch: F) -> Self
    where
        T: PartialEq,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            fetch: Arc::new(move || fetch().boxed()),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            delivery: Delivery::OnChange(Arc::new(|a: &T, b: &T| a == b)),
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn every_fetch(mut self) -> Self {
        self.delivery = Delivery::EveryFetch;
        self
    }

    /// Fetches immediately, then once per interval, until the returned
    /// [`Subscription`] is unsubscribed or dropped. Failed fetches are logged
    /// and retried on the next tick.
    pub fn subscribe<C>(self, mut on_change: C) -> Subscription
    where
        C: FnMut(T) + Send + 'static,
    {
        let subscribed = Arc::new(AtomicBool::new(true));
        let flag = subscribed.clone();

        let task = tokio::spawn(async move {
            let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Result<T, ClientError>)>();

            // the first tick completes immediately and delivers the initial value
            let mut interval = time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = IntervalStream::new(interval);

            let mut issued: u64 = 0;
            let mut applied: u64 = 0;
            let mut last: Option<T> = None;

            loop {
                tokio::select! {
                    Some(_) = ticks.next() => {
                        issued += 1;
                        let seq = issued;
                        let fetch = (self.fetch)();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send((seq, fetch.await));
                        });
                    }
                    Some((seq, result)) = rx.recv() => {
                        if !flag.load(Ordering::Acquire) {
                            break;
                        }
                        if seq <= applied {
                            trace!("{}: dropping stale response #{seq}", self.name);
                            continue;
                        }
                        let value = match result {
                            Ok(value) => value,
                            Err(e) => {
                                debug!("{}: fetch #{seq} failed: {e}", self.name);
                                continue;
                            }
                        };
                        applied = seq;

                        let changed = match (&self.delivery, &last) {
                            (Delivery::EveryFetch, _) | (_, None) => true,
                            (Delivery::OnChange(same), Some(previous)) => !same(previous, &value),
                        };
                        if changed && flag.load(Ordering::Acquire) {
                            last = Some(value.clone());
                            on_change(value);
                        }
                    }
                }
            }
        });

        Subscription {
            subscribed,
            task: Some(task),
        }
    }
}

impl<T> fmt::Debug for PollingChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingChannel")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Handle of a running [`PollingChannel`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    subscribed: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }

    fn cancel(&mut self) {
        self.subscribed.store(false, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
