use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use live_vote::{
    client::ApiClient,
    config::{logger::initialize_cli_logger, settings::ClientSettings},
    console::ControlConsole,
    display::{render_bars, DisplaySession},
    error::{ClientError, ErrorKind},
    local::store::{FileStore, KeyValueStore, MemoryStore},
    voting::VotingSession,
};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Parser)]
#[command(name = "audience")]
#[command(about = "Display, voting and host clients for live-vote", long_about = None)]
struct Cli {
    /// Base URL of the API, including the /api prefix [default: API_BASE_URL]
    #[arg(long)]
    api: Option<String>,

    /// Polling interval in milliseconds [default: POLL_INTERVAL_MS]
    #[arg(long)]
    poll_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shared screen with animated bars for an event
    Display {
        #[arg(long)]
        event: String,
        /// Seconds per question [default: CAROUSEL_INTERVAL_SECS]
        #[arg(long)]
        carousel_secs: Option<u64>,
        #[arg(long, default_value_t = 40)]
        width: usize,
    },
    /// Vote on the current (or a given) question
    Vote {
        #[arg(long)]
        event: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        option: String,
        /// Device storage file [default: DEVICE_STORE]
        #[arg(long)]
        device_store: Option<PathBuf>,
    },
    /// Follow the current question and clear notifications like a voting page
    Watch {
        #[arg(long)]
        event: String,
        /// Device storage file [default: DEVICE_STORE]
        #[arg(long)]
        device_store: Option<PathBuf>,
    },
    /// Control console
    Host {
        #[arg(long)]
        event: String,
        #[command(subcommand)]
        action: HostAction,
    },
}

#[derive(Subcommand)]
enum HostAction {
    /// List the event's questions
    Questions,
    /// Open a question for voting; omit the id to close voting
    SetCurrent { question: Option<String> },
    /// Open the question after the current one
    Next,
    /// Delete every vote of a question
    Clear { question: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    initialize_cli_logger();

    let cli = Cli::parse();

    // flags win over the environment
    let mut settings = ClientSettings::load();
    if let Some(api) = cli.api {
        settings.api_base_url = api;
    }
    if let Some(poll_ms) = cli.poll_ms {
        settings.poll_interval = Duration::from_millis(poll_ms);
    }
    let client = ApiClient::new(&settings.api_base_url);

    let result = match cli.command {
        Commands::Display {
            event,
            carousel_secs,
            width,
        } => {
            if let Some(secs) = carousel_secs {
                settings.carousel_interval = Duration::from_secs(secs);
            }
            run_display(client, event, settings, width).await
        }
        Commands::Vote {
            event,
            question,
            option,
            device_store,
        } => {
            let path = device_store.unwrap_or(settings.device_store);
            let session = VotingSession::new(client, event, open_store(&path));
            run_vote(session, question, option).await
        }
        Commands::Watch {
            event,
            device_store,
        } => {
            let path = device_store.unwrap_or(settings.device_store);
            let session = VotingSession::new(client, event, open_store(&path));
            run_watch(session, settings.poll_interval).await
        }
        Commands::Host { event, action } => {
            run_host(ControlConsole::new(client, event), action).await
        }
    };

    result.map_err(|e| {
        let kind = e.downcast_ref::<ClientError>().map(ClientError::kind);
        match kind {
            Some(ErrorKind::UserInput) => e.context("the request was rejected, check your input"),
            Some(ErrorKind::MissingEntity) => e.context("not found"),
            Some(ErrorKind::Connectivity) => e.context("could not reach the server"),
            None => e,
        }
    })
}

fn open_store(path: &Path) -> Arc<dyn KeyValueStore> {
    match FileStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Device storage at {} unusable ({e}), using memory", path.display());
            Arc::new(MemoryStore::new())
        }
    }
}

async fn run_display(
    client: ApiClient,
    event: String,
    settings: ClientSettings,
    width: usize,
) -> anyhow::Result<()> {
    let session = DisplaySession::start(client, event, &settings).await?;
    let mut frames = session.frames();
    let shown = session.shown();

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let stats = frames.borrow_and_update().clone();
                let question = shown.borrow().clone();
                print!("\x1b[2J\x1b[H{}", render_bars(question.as_ref(), &stats, width));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

async fn run_vote(
    session: VotingSession,
    question: Option<String>,
    option: String,
) -> anyhow::Result<()> {
    let question = match question {
        Some(question) => question,
        None => session
            .client()
            .current_question_id(session.event_id())
            .await?
            .context("no question is open for voting")?,
    };

    let previously = session.has_voted(&question);
    let cast = session.vote(&question, &option).await?;
    if cast.updated || previously {
        println!("Changed your vote on {question} to {}", cast.vote.option_id);
    } else {
        println!("Voted {} on {question}", cast.vote.option_id);
    }
    Ok(())
}

async fn run_watch(session: VotingSession, poll_interval: Duration) -> anyhow::Result<()> {
    if let Err(e) = session.hydrate().await {
        warn!("Could not restore earlier votes: {e}");
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let current_tx = tx.clone();
    let _current = session.follow_current_question(poll_interval, move |current| {
        let _ = current_tx.send(Update::Current(current));
    });
    let _clears = session.watch_clears(poll_interval, move |question| {
        let _ = tx.send(Update::Cleared(question));
    });

    println!("Device {}", session.device_id());
    loop {
        tokio::select! {
            Some(update) = rx.recv() => match update {
                Update::Current(None) => println!("Voting is closed"),
                Update::Current(Some(question)) => match session.choice(&question) {
                    Some(option) => println!("Question {question} is open, you voted {option}"),
                    None if session.has_voted(&question) => println!("Question {question} is open, you already voted"),
                    None => println!("Question {question} is open, cast your vote"),
                },
                Update::Cleared(question) => println!("Votes on {question} were reset, you can vote again"),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

enum Update {
    Current(Option<String>),
    Cleared(String),
}

async fn run_host(console: ControlConsole, action: HostAction) -> anyhow::Result<()> {
    match action {
        HostAction::Questions => {
            let questions = console.questions().await?;
            if questions.is_empty() {
                bail!("this event has no questions");
            }
            for question in questions {
                let options: Vec<_> = question.options.iter().map(|o| o.id.as_str()).collect();
                println!(
                    "{:>3}  {}  {}  [{}]",
                    question.order,
                    question.id,
                    question.title,
                    options.join(", ")
                );
            }
        }
        HostAction::SetCurrent { question } => {
            let event = console.set_current(question.as_deref()).await?;
            match event.current_question_id {
                Some(id) => println!("Current question: {id}"),
                None => println!("Voting closed"),
            }
        }
        HostAction::Next => {
            let event = console.next_question().await?;
            println!(
                "Current question: {}",
                event.current_question_id.unwrap_or_default()
            );
        }
        HostAction::Clear { question } => {
            let cleared = console.clear_votes(&question).await?;
            println!("Deleted {} votes of {}", cleared.deleted, cleared.question_id);
        }
    }
    Ok(())
}
