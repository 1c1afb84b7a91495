use std::time::Duration;

use tokio::time::Instant;

use super::easing::{ease_out_cubic, lerp};
use crate::stats::VoteStats;

pub const ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// What the bars show right now, possibly between two tallies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayedStats {
    pub total_votes: f64,
    pub options: Vec<DisplayedOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedOption {
    pub option_id: String,
    pub label: String,
    pub count: f64,
    pub percentage: f64,
}

impl From<&VoteStats> for DisplayedStats {
    fn from(stats: &VoteStats) -> Self {
        Self {
            total_votes: stats.total_votes as f64,
            options: stats
                .options
                .iter()
                .map(|option| DisplayedOption {
                    option_id: option.option_id.clone(),
                    label: option.label.clone(),
                    count: option.count as f64,
                    percentage: option.percentage,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    Finished,
    Idle,
}

#[derive(Debug)]
struct Transition {
    from: DisplayedStats,
    started: Instant,
}

/// Eases the displayed state toward the latest tally.
///
/// A new target always starts from the last committed frame, never from the
/// previous target, so a retarget mid-animation continues from where the bars
/// actually are.
#[derive(Debug)]
pub struct Interpolator {
    duration: Duration,
    displayed: DisplayedStats,
    target: Option<VoteStats>,
    transition: Option<Transition>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(ANIMATION_DURATION)
    }
}

impl Interpolator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            displayed: DisplayedStats::default(),
            target: None,
            transition: None,
        }
    }

    pub fn displayed(&self) -> &DisplayedStats {
        &self.displayed
    }

    pub fn target(&self) -> Option<&VoteStats> {
        self.target.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Returns false, leaving any running transition alone, when `stats`
    /// carries the same tally as the current target.
    pub fn animate_to(&mut self, stats: VoteStats, now: Instant) -> bool {
        if self
            .target
            .as_ref()
            .is_some_and(|target| target.same_tally(&stats))
        {
            return false;
        }

        self.transition = Some(Transition {
            from: self.displayed.clone(),
            started: now,
        });
        self.target = Some(stats);
        true
    }

    /// Computes and commits the frame for `now`.
    pub fn frame(&mut self, now: Instant) -> FrameState {
        let (Some(transition), Some(target)) = (&self.transition, &self.target) else {
            return FrameState::Idle;
        };

        let elapsed = now.saturating_duration_since(transition.started);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            self.displayed = DisplayedStats::from(target);
            self.transition = None;
            return FrameState::Finished;
        }

        self.displayed = blend(&transition.from, target, ease_out_cubic(progress));
        FrameState::Running
    }

    /// Zero baseline: the next tally animates up from nothing.
    pub fn reset(&mut self) {
        self.displayed = DisplayedStats::default();
        self.target = None;
        self.transition = None;
    }
}

/// Options are matched by id; one missing from `from` starts at zero.
fn blend(from: &DisplayedStats, to: &VoteStats, t: f64) -> DisplayedStats {
    DisplayedStats {
        total_votes: lerp(from.total_votes, to.total_votes as f64, t),
        options: to
            .options
            .iter()
            .map(|option| {
                let start = from
                    .options
                    .iter()
                    .find(|previous| previous.option_id == option.option_id);
                let (count, percentage) = start.map_or((0.0, 0.0), |s| (s.count, s.percentage));
                DisplayedOption {
                    option_id: option.option_id.clone(),
                    label: option.label.clone(),
                    count: lerp(count, option.count as f64, t),
                    percentage: lerp(percentage, option.percentage, t),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::OptionStat;

    fn stats(rows: &[(&str, u64)]) -> VoteStats {
        let total: u64 = rows.iter().map(|(_, count)| count).sum();
        VoteStats {
            total_votes: total,
            options: rows
                .iter()
                .map(|(id, count)| OptionStat {
                    option_id: id.to_string(),
                    label: id.to_uppercase(),
                    count: *count,
                    percentage: if total > 0 {
                        *count as f64 / total as f64 * 100.0
                    } else {
                        0.0
                    },
                })
                .collect(),
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn first_animation_grows_from_zero() {
        let start = Instant::now();
        let mut interpolator = Interpolator::default();
        assert!(interpolator.animate_to(stats(&[("a", 3), ("b", 1)]), start));

        assert_eq!(interpolator.frame(start), FrameState::Running);
        assert_eq!(interpolator.displayed().total_votes, 0.0);
        assert_eq!(interpolator.displayed().options[0].percentage, 0.0);

        assert_eq!(interpolator.frame(start + ms(150)), FrameState::Running);
        let halfway = interpolator.displayed().clone();
        // ease-out: more than half of the way after half the time
        assert!((halfway.total_votes - 4.0 * 0.875).abs() < 1e-9);
        assert!((halfway.options[0].percentage - 75.0 * 0.875).abs() < 1e-9);
        assert!((halfway.options[1].count - 0.875).abs() < 1e-9);

        assert_eq!(interpolator.frame(start + ms(300)), FrameState::Finished);
        assert_eq!(
            *interpolator.displayed(),
            DisplayedStats::from(&stats(&[("a", 3), ("b", 1)]))
        );
        assert_eq!(interpolator.frame(start + ms(400)), FrameState::Idle);
    }

    #[test]
    fn equal_tally_does_not_restart() {
        let start = Instant::now();
        let mut interpolator = Interpolator::default();
        interpolator.animate_to(stats(&[("a", 1)]), start);
        interpolator.frame(start + ms(100));

        assert!(!interpolator.animate_to(stats(&[("a", 1)]), start + ms(100)));
        assert!(interpolator.is_animating());
        assert_eq!(interpolator.frame(start + ms(300)), FrameState::Finished);
    }

    #[test]
    fn retarget_continues_from_displayed_frame() {
        let start = Instant::now();
        let mut interpolator = Interpolator::default();
        interpolator.animate_to(stats(&[("a", 10)]), start);
        interpolator.frame(start + ms(100));
        let mid = interpolator.displayed().total_votes;
        assert!(mid > 0.0 && mid < 10.0);

        let retarget_at = start + ms(100);
        assert!(interpolator.animate_to(stats(&[("a", 20)]), retarget_at));
        interpolator.frame(retarget_at);
        assert!((interpolator.displayed().total_votes - mid).abs() < 1e-9);

        interpolator.frame(retarget_at + ms(50));
        assert!(interpolator.displayed().total_votes > mid);

        assert_eq!(
            interpolator.frame(retarget_at + ms(300)),
            FrameState::Finished
        );
        assert_eq!(interpolator.displayed().total_votes, 20.0);
    }

    #[test]
    fn new_option_interpolates_from_zero() {
        let start = Instant::now();
        let mut interpolator = Interpolator::default();
        interpolator.animate_to(stats(&[("a", 2)]), start);
        interpolator.frame(start + ms(300));

        let next = start + ms(300);
        interpolator.animate_to(stats(&[("a", 2), ("b", 2)]), next);
        interpolator.frame(next + ms(150));

        let shown = interpolator.displayed();
        assert_eq!(shown.options[1].option_id, "b");
        assert!((shown.options[1].count - 2.0 * 0.875).abs() < 1e-9);
        // a moves from 100% down toward 50%
        assert!((shown.options[0].percentage - (100.0 - 50.0 * 0.875)).abs() < 1e-9);
    }

    #[test]
    fn reset_returns_to_zero_baseline() {
        let start = Instant::now();
        let mut interpolator = Interpolator::default();
        interpolator.animate_to(stats(&[("a", 5)]), start);
        interpolator.frame(start + ms(300));

        interpolator.reset();
        assert_eq!(*interpolator.displayed(), DisplayedStats::default());
        assert!(interpolator.target().is_none());

        // the same tally animates again after a reset
        assert!(interpolator.animate_to(stats(&[("a", 5)]), start + ms(400)));
        interpolator.frame(start + ms(400));
        assert_eq!(interpolator.displayed().total_votes, 0.0);
    }
}
