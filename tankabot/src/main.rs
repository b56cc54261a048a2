mod config;
mod scheduler;
mod stub_client;
mod tracing_init;

use std::time::Duration;

use clap::Parser;
use snafu::{OptionExt, ResultExt, Snafu};
use sqlx::postgres::PgPoolOptions;
use tanka_tokenise::AnalyzerPool;
use tankabot_social::{RetryPolicy, RetryingClient};
use tankabot_store::Store;
use tracing::info;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    ConfigLoadFailed { source: config::Error },
    #[snafu(display("{command} is not installed"))]
    AnalyzerMissingFromPath { command: &'static str },
    DatabaseConnectionFailed { source: sqlx::Error },
    MigrationFailed { source: sqlx::migrate::MigrateError },
    BotLookupFailed { source: tankabot_store::Error },
}

/// An autonomous tanka-hunting social bot.
#[derive(Debug, Parser)]
struct Args {
    /// Total run time in minutes; 0 means run until killed.
    #[arg(short = 'p', long, default_value_t = 0)]
    minutes: u64,
}

/// Fatal at startup, as in the original: a missing morphological
/// analyzer is not the engine's problem to recover from.
async fn check_analyzer_on_path() -> Result<()> {
    tokio::process::Command::new("mecab")
        .arg("-v")
        .output()
        .await
        .ok()
        .context(AnalyzerMissingFromPathError { command: "mecab" })?;
    Ok(())
}

async fn init_database(database_url: &str) -> Result<sqlx::PgPool> {
    info!("connecting to database");
    let pool = PgPoolOptions::default()
        .max_connections(8)
        .min_connections(1)
        .connect(database_url)
        .await
        .context(DatabaseConnectionFailedError)?;
    tankabot_store::MIGRATOR
        .run(&pool)
        .await
        .context(MigrationFailedError)?;
    Ok(pool)
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_init::init();
    let args = Args::parse();
    let cfg = config::load().context(ConfigLoadFailedError)?;

    check_analyzer_on_path().await?;

    let pool = init_database(&cfg.database_url).await?;
    let store = Store::new(pool);
    store
        .add_new_bot(&cfg.name)
        .await
        .context(BotLookupFailedError)?;
    let bot_id = store.bot_id(&cfg.name).await.context(BotLookupFailedError)?;

    let analyzer_pool = AnalyzerPool::new(cfg.num_concurrent_analyzer_jobs);
    let retry_policy =
        RetryPolicy::new(cfg.max_retry(), cfg.retry_interval(), Duration::from_secs(3));
    let run_for = (args.minutes > 0).then(|| Duration::from_secs(args.minutes * 60));

    // `LoggingStubClient` talks to no server; swap it for a real
    // Mastodon wire-protocol client (the actual HTTP/websocket handshake
    // and token storage) to go live — see `tankabot_social::SocialClient`
    // for the boundary `scheduler::run` is written against.
    let social = RetryingClient::new(stub_client::LoggingStubClient, retry_policy);

    info!(bot = %cfg.name, ?run_for, "startup complete, entering scheduler");
    scheduler::run(
        store,
        social,
        analyzer_pool,
        bot_id,
        cfg.name.clone(),
        cfg.random_post_frequency_per_day,
        cfg.candidate_keep_n,
        run_for,
    )
    .await;

    Ok(())
}
