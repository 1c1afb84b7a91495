use std::{fmt::Write as _, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{
    animation::{AnimationDriver, DisplayedStats},
    carousel::Carousel,
    client::ApiClient,
    config::settings::ClientSettings,
    error::ClientError,
    models::question::Question,
    stats::calculate_stats,
    sync::{
        channels::{current_question_channel, vote_list_channel},
        Subscription,
    },
};

/// The shared screen: follows the host's current question, rotates through
/// the event's questions and keeps the shown question's bars animated.
pub struct DisplaySession {
    animation: AnimationDriver,
    shown: watch::Receiver<Option<Question>>,
    task: JoinHandle<()>,
}

impl DisplaySession {
    pub async fn start(
        client: ApiClient,
        event_id: impl Into<String>,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        let event_id = event_id.into();
        let questions = client.list_questions(&event_id).await?;
        info!(
            "Displaying event {} with {} questions",
            event_id,
            questions.len()
        );

        let animation = AnimationDriver::default();
        let carousel = Carousel::start(questions.len(), settings.carousel_interval);
        let (shown_tx, shown) = watch::channel(None);

        let (host_tx, host_rx) = mpsc::unbounded_channel();
        let host = current_question_channel(client.clone(), event_id, settings.poll_interval)
            .subscribe(move |current| {
                let _ = host_tx.send(current);
            });

        let feed = Feed {
            client,
            questions,
            animation: animation.clone(),
            poll_interval: settings.poll_interval,
            shown: shown_tx,
        };
        let task = tokio::spawn(feed.run(carousel, host, host_rx));

        Ok(Self {
            animation,
            shown,
            task,
        })
    }

    pub fn frames(&self) -> watch::Receiver<DisplayedStats> {
        self.animation.subscribe()
    }

    pub fn shown(&self) -> watch::Receiver<Option<Question>> {
        self.shown.clone()
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Feed {
    client: ApiClient,
    questions: Vec<Question>,
    animation: AnimationDriver,
    poll_interval: Duration,
    shown: watch::Sender<Option<Question>>,
}

impl Feed {
    async fn run(
        self,
        carousel: Carousel,
        _host: Subscription,
        mut host_rx: mpsc::UnboundedReceiver<Option<String>>,
    ) {
        let mut index_rx = carousel.watch();
        let mut votes = self.show(carousel.index(), None);

        loop {
            tokio::select! {
                changed = index_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let index = *index_rx.borrow_and_update();
                    votes = self.show(index, votes.take());
                }
                Some(current) = host_rx.recv() => {
                    let Some(question_id) = current else {
                        continue;
                    };
                    // a pick of the shown question still restarts the interval
                    match self.questions.iter().position(|q| q.id == question_id) {
                        Some(index) => carousel.select(index),
                        None => debug!("Current question {question_id} is not in this event"),
                    }
                }
            }
        }
    }

    /// Swaps the vote subscription over to the question at `index`.
    ///
    /// The previous subscription is dropped before the bars are reset, and
    /// the new one animates only within the epoch of that reset.
    fn show(&self, index: usize, previous: Option<Subscription>) -> Option<Subscription> {
        drop(previous);
        let epoch = self.animation.reset();

        let question = self.questions.get(index).cloned();
        self.shown.send_replace(question.clone());
        let question = question?;
        info!("Showing question {}: {}", question.id, question.title);

        let animation = self.animation.clone();
        let channel = vote_list_channel(self.client.clone(), &question.id, self.poll_interval);
        Some(channel.subscribe(move |votes| {
            let stats = calculate_stats(&votes, Some(&question.options));
            animation.animate_in(epoch, stats);
        }))
    }
}

/// Renders the displayed state as proportional text bars `width` cells wide.
pub fn render_bars(question: Option<&Question>, stats: &DisplayedStats, width: usize) -> String {
    let mut out = String::new();
    let Some(question) = question else {
        out.push_str("Waiting for a question...\n");
        return out;
    };

    let _ = writeln!(out, "{}", question.title);
    let label_width = stats
        .options
        .iter()
        .map(|option| option.label.chars().count())
        .max()
        .unwrap_or(0);

    for option in &stats.options {
        let filled = ((option.percentage / 100.0) * width as f64)
            .round()
            .clamp(0.0, width as f64) as usize;
        let _ = writeln!(
            out,
            "{:<label_width$}  {}{}  {:>5.1}% ({})",
            option.label,
            "█".repeat(filled),
            "░".repeat(width - filled),
            option.percentage,
            option.count.round() as u64,
        );
    }
    let _ = writeln!(out, "{} votes", stats.total_votes.round() as u64);
    out
}
