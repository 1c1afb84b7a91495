use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_FILTER: &str = "live_vote=info,audience=info,tower_http=info";

/// Server logger: pretty, with file and target, on stdout.
pub fn initialize_logger() {
    let subscriber = FmtSubscriber::builder()
        .with_level(true)
        .with_file(true)
        .with_target(true)
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .finish();
    install(subscriber);
    info!("Logger Initialized:: ✅");
}

/// Terminal clients draw on stdout, so their logs go to stderr.
pub fn initialize_cli_logger() {
    let subscriber = FmtSubscriber::builder()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "live_vote=warn".into()),
        )
        .finish();
    install(subscriber);
}

fn install<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    // reqwest and hyper internals still emit through `log`
    let _ = tracing_log::LogTracer::init();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set up logging");
}
