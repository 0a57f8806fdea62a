// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod query;
pub mod ranking;
pub mod sentiment;
pub mod signals;

// ---- Re-exports for stable public API ----
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{NewsSettings, ProviderCredentials};
pub use crate::error::NewsError;
pub use crate::ingest::pool::NewsPool;
pub use crate::ingest::types::{NewsItem, NewsProvider, NewsSource, RawArticle};
pub use crate::query::{build_news_query, QueryClient};
pub use crate::ranking::{rank_topics, RankedTopic, Ranking};
pub use crate::signals::{topics_from_themes, NewsSignal, SignalEngine, Topic, TopicCategory};
