use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::{debug, warn};

use crate::config::settings::DEFAULT_CAROUSEL_INTERVAL_SECS;

pub const CAROUSEL_INTERVAL: Duration = Duration::from_secs(DEFAULT_CAROUSEL_INTERVAL_SECS);

/// Timer bookkeeping of the carousel, free of any runtime.
#[derive(Debug, Clone)]
pub struct CarouselState {
    index: usize,
    len: usize,
    interval: Duration,
    deadline: Instant,
}

impl CarouselState {
    pub fn new(len: usize, interval: Duration, now: Instant) -> Self {
        Self {
            index: 0,
            len,
            interval,
            deadline: now + interval,
        }
    }

    /// Only events with two or more questions rotate.
    pub fn is_active(&self) -> bool {
        self.len > 1
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Automatic tick: next question, next deadline one interval later.
    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.deadline += self.interval;
        self.index
    }

    /// Manual selection restarts the interval from `now`.
    pub fn select(&mut self, index: usize, now: Instant) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.index = index;
        self.deadline = now + self.interval;
        Some(index)
    }
}

/// Cycles the display through an event's questions.
///
/// Every switch, automatic or manual, is published on the index channel; the
/// subscriber owns resetting the bars. Selecting the question already shown
/// only restarts the interval and publishes nothing.
pub struct Carousel {
    commands: mpsc::UnboundedSender<usize>,
    index: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl Carousel {
    pub fn start(len: usize, interval: Duration) -> Self {
        let (commands, mut requests) = mpsc::unbounded_channel::<usize>();
        let (index_tx, index) = watch::channel(0);
        let mut state = CarouselState::new(len, interval, Instant::now());

        if state.is_active() {
            debug!("Carousel rotating {len} questions every {interval:?}");
        }

        let task = tokio::spawn(async move {
            loop {
                let deadline = state.deadline();
                tokio::select! {
                    _ = time::sleep_until(deadline), if state.is_active() => {
                        let next = state.advance();
                        debug!("Carousel advanced to question #{next}");
                        index_tx.send_replace(next);
                    }
                    request = requests.recv() => {
                        let Some(requested) = request else {
                            break;
                        };
                        let before = state.index();
                        match state.select(requested, Instant::now()) {
                            Some(selected) if selected == before => {
                                debug!("Carousel interval restarted on question #{selected}");
                            }
                            Some(selected) => {
                                debug!("Carousel switched to question #{selected}");
                                index_tx.send_replace(selected);
                            }
                            None => warn!("Ignoring carousel index {requested} of {len}"),
                        }
                    }
                }
            }
        });

        Self {
            commands,
            index,
            task,
        }
    }

    pub fn select(&self, index: usize) {
        let _ = self.commands.send(index);
    }

    pub fn index(&self) -> usize {
        *self.index.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.task.abort();
    }
}
