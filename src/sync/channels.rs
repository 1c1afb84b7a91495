use std::time::Duration;

use tracing::{debug, info};

use super::polling::{PollingChannel, Subscription};
use crate::{client::ApiClient, models::vote::Vote};

/// Which question the event currently has open, `None` included.
pub fn current_question_channel(
    client: ApiClient,
    event_id: impl Into<String>,
    interval: Duration,
) -> PollingChannel<Option<String>> {
    let event_id = event_id.into();
    PollingChannel::new(format!("current-question:{event_id}"), move || {
        let client = client.clone();
        let event_id = event_id.clone();
        async move { client.current_question_id(&event_id).await }
    })
    .interval(interval)
}

/// Full vote list of one question, redelivered on every successful fetch;
/// consumers re-run the tally, which is cheaper than diffing the list.
pub fn vote_list_channel(
    client: ApiClient,
    question_id: impl Into<String>,
    interval: Duration,
) -> PollingChannel<Vec<Vote>> {
    let question_id = question_id.into();
    PollingChannel::new(format!("votes:{question_id}"), move || {
        let client = client.clone();
        let question_id = question_id.clone();
        async move { client.question_votes(&question_id).await }
    })
    .interval(interval)
    .every_fetch()
}

/// Watches the event's one-shot cleared flag.
///
/// `on_cleared` runs once per armed flag. Every fetch that still sees the
/// flag armed sends another fire-and-forget acknowledgement, so a lost or
/// failed one is retried on the next tick without notifying twice. Two
/// clears inside one polling interval collapse into the latest.
pub fn subscribe_clear_notifications<C>(
    client: ApiClient,
    event_id: impl Into<String>,
    interval: Duration,
    mut on_cleared: C,
) -> Subscription
where
    C: FnMut(String) + Send + 'static,
{
    let event_id = event_id.into();
    let fetch_client = client.clone();
    let fetch_event = event_id.clone();
    let mut last_seen: Option<String> = None;

    PollingChannel::new(format!("cleared:{event_id}"), move || {
        let client = fetch_client.clone();
        let event_id = fetch_event.clone();
        async move { client.cleared_question_id(&event_id).await }
    })
    .interval(interval)
    .every_fetch()
    .subscribe(move |cleared| {
        let Some(question_id) = cleared else {
            last_seen = None;
            return;
        };

        if last_seen.as_deref() == Some(question_id.as_str()) {
            debug!("Cleared flag for {question_id} still armed, acknowledging again");
        } else {
            info!("Votes of question {question_id} were cleared");
            last_seen = Some(question_id.clone());
            on_cleared(question_id);
        }

        let client = client.clone();
        let event_id = event_id.clone();
        tokio::spawn(async move {
            if let Err(e) = client.acknowledge_clear(&event_id).await {
                debug!("Clear acknowledgement for {event_id} failed: {e}");
            }
        });
    })
}
