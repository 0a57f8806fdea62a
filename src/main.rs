//! Command-line entrypoint: pooled topic signals, issue ranking, and ad-hoc
//! single-query lookups. Results go to stdout as pretty JSON, logs to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sector_news_signals::ingest::providers::build_providers;
use sector_news_signals::{
    rank_topics, topics_from_themes, NewsPool, NewsSettings, ProviderCredentials, QueryClient,
    SignalEngine, Topic, TopicCategory,
};

#[derive(Parser, Debug)]
#[command(name = "sector-news-signals", version, about = "Sector/theme news signals")]
struct Cli {
    /// Settings TOML; overrides NEWS_SETTINGS_PATH and config/news.toml.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score topics against the shared news pool.
    Signals(TopicArgs),
    /// Score topics and rank the qualified ones by issue score.
    Rank(TopicArgs),
    /// Single-query signal straight from the providers.
    Query {
        text: String,
    },
}

#[derive(Args, Debug)]
struct TopicArgs {
    /// JSON file with a list of topics; defaults to one topic per configured theme.
    #[arg(long)]
    topics: Option<PathBuf>,
    /// Market label for theme topics.
    #[arg(long, default_value = "KOSPI")]
    market: String,
    /// Category for theme topics.
    #[arg(long, value_enum, default_value_t = CategoryArg::Theme)]
    category: CategoryArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryArg {
    Sector,
    Theme,
}

impl From<CategoryArg> for TopicCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Sector => TopicCategory::Sector,
            CategoryArg::Theme => TopicCategory::Theme,
        }
    }
}

impl TopicArgs {
    fn resolve(&self, settings: &NewsSettings) -> Result<Vec<Topic>> {
        match &self.topics {
            Some(path) => load_topics(path),
            None => Ok(topics_from_themes(settings, &self.market, self.category.into())),
        }
    }
}

/// Compact logs by default, JSON lines with LOG_FORMAT=json.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sector_news_signals=info,warn"));
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn load_topics(path: &Path) -> Result<Vec<Topic>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading topics from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing topics at {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real env vars win.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => NewsSettings::from_path(path)?,
        None => NewsSettings::from_toml()?,
    };
    let creds = ProviderCredentials::from_env();
    let providers = build_providers(&creds, settings.pool.timeout());
    if providers.is_empty() {
        tracing::warn!("no news provider credentials configured; results will be empty");
    } else {
        tracing::info!(sources = ?creds.enabled_sources(), "news providers enabled");
    }

    match cli.command {
        Command::Signals(args) => {
            let topics = args.resolve(&settings)?;
            let pool = NewsPool::with_system_clock(providers, settings.pool.clone());
            let engine = SignalEngine::from_settings(&settings);
            let signals = engine.build_news_signals(&pool, &topics).await;
            print_json(&signals)?;
        }
        Command::Rank(args) => {
            let topics = args.resolve(&settings)?;
            let pool = NewsPool::with_system_clock(providers, settings.pool.clone());
            let engine = SignalEngine::from_settings(&settings);
            let signals = engine.build_news_signals(&pool, &topics).await;
            let ranking = rank_topics(
                &topics,
                &signals,
                &settings.scoring,
                &pool.enabled_sources(),
            );
            print_json(&ranking)?;
        }
        Command::Query { text } => {
            let client = QueryClient::new(providers, &settings);
            print_json(&client.fetch_news_signal(&text).await)?;
        }
    }
    Ok(())
}
