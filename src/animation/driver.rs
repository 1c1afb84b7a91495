use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::trace;

use super::interpolator::{DisplayedStats, FrameState, Interpolator, ANIMATION_DURATION};
use crate::stats::VoteStats;

/// Roughly one frame at 60 Hz.
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Per-frame scheduler around an [`Interpolator`].
///
/// Holds at most one frame task; starting an animation aborts the previous
/// one first. Every committed frame is published on a watch channel.
#[derive(Clone)]
pub struct AnimationDriver {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    frames: watch::Sender<DisplayedStats>,
    frame_period: Duration,
}

struct State {
    interpolator: Interpolator,
    frame_task: Option<JoinHandle<()>>,
    /// Bumped by every reset
    epoch: u64,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(ANIMATION_DURATION, FRAME_PERIOD)
    }
}

impl AnimationDriver {
    pub fn new(duration: Duration, frame_period: Duration) -> Self {
        let (frames, _) = watch::channel(DisplayedStats::default());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    interpolator: Interpolator::new(duration),
                    frame_task: None,
                    epoch: 0,
                }),
                frames,
                frame_period,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayedStats> {
        self.shared.frames.subscribe()
    }

    pub fn displayed(&self) -> DisplayedStats {
        self.shared.lock().interpolator.displayed().clone()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.lock().interpolator.is_animating()
    }

    /// Must be called from within a tokio runtime.
    pub fn animate_to(&self, stats: VoteStats) -> bool {
        let mut state = self.shared.lock();
        self.start(&mut state, stats)
    }

    /// Like [`animate_to`](Self::animate_to), but a no-op once a reset has
    /// moved the driver past `epoch`. Feeds pass the epoch returned by the
    /// reset that started them, so a tally still in flight for a previous
    /// question never reaches the bars.
    pub fn animate_in(&self, epoch: u64, stats: VoteStats) -> bool {
        let mut state = self.shared.lock();
        if state.epoch != epoch {
            trace!("Dropping tally of stale epoch {epoch}");
            return false;
        }
        self.start(&mut state, stats)
    }

    fn start(&self, state: &mut State, stats: VoteStats) -> bool {
        if !state.interpolator.animate_to(stats, Instant::now()) {
            return false;
        }

        if let Some(previous) = state.frame_task.take() {
            previous.abort();
        }
        let shared = self.shared.clone();
        state.frame_task = Some(tokio::spawn(run_frames(shared)));
        true
    }

    /// Stops any animation, drops the bars back to zero and returns the new
    /// epoch.
    pub fn reset(&self) -> u64 {
        let mut state = self.shared.lock();
        if let Some(task) = state.frame_task.take() {
            task.abort();
        }
        state.interpolator.reset();
        state.epoch += 1;
        self.shared
            .frames
            .send_replace(state.interpolator.displayed().clone());
        state.epoch
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_frames(shared: Arc<Shared>) {
    let mut ticker = time::interval(shared.frame_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        // published under the lock so a concurrent reset always lands last
        let frame = {
            let mut state = shared.lock();
            let frame = state.interpolator.frame(Instant::now());
            shared
                .frames
                .send_replace(state.interpolator.displayed().clone());
            frame
        };

        if frame != FrameState::Running {
            trace!("Animation settled");
            break;
        }
    }
}
