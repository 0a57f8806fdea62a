// tests/pool_cache.rs
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{article, pool_params, providers, shared, StubProvider, HOUR, NOW};
use sector_news_signals::{ManualClock, NewsPool, NewsProvider, NewsSource, RawArticle};

fn pool_with(
    providers: Vec<Arc<dyn NewsProvider>>,
    keywords: &[&str],
    clock: Arc<ManualClock>,
) -> NewsPool {
    NewsPool::new(providers, pool_params(keywords), clock)
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let naver = shared(
        StubProvider::new(NewsSource::Naver, vec![article("증시 마감", HOUR)])
            .with_delay(Duration::from_millis(30)),
    );
    let clock = Arc::new(ManualClock::new(NOW));
    let pool = pool_with(providers(&[&naver]), &["증시", "코스피"], clock);

    let (a, b) = tokio::join!(pool.fetch_all(), pool.fetch_all());
    // one call per general keyword, not per caller
    assert_eq!(naver.calls(), 2);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 1);

    let c = pool.fetch_all().await;
    assert_eq!(naver.calls(), 2);
    assert!(Arc::ptr_eq(&a, &c));
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let naver = shared(StubProvider::new(
        NewsSource::Naver,
        vec![article("코스피 상승", HOUR)],
    ));
    let clock = Arc::new(ManualClock::new(NOW));
    let pool = pool_with(providers(&[&naver]), &["증시"], clock.clone());

    pool.fetch_all().await;
    assert_eq!(naver.calls(), 1);

    clock.advance(59_999);
    pool.fetch_all().await;
    assert_eq!(naver.calls(), 1);

    clock.advance(1);
    let items = pool.fetch_all().await;
    assert_eq!(naver.calls(), 2);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let naver = shared(StubProvider::new(
        NewsSource::Naver,
        vec![article("코스피 상승", HOUR)],
    ));
    let pool = pool_with(providers(&[&naver]), &["증시"], Arc::new(ManualClock::new(NOW)));

    pool.fetch_all().await;
    pool.invalidate();
    pool.fetch_all().await;
    assert_eq!(naver.calls(), 2);
}

#[tokio::test]
async fn duplicate_titles_keep_first_provider() {
    let naver = shared(StubProvider::new(
        NewsSource::Naver,
        vec![article("반도체 수출 급증", HOUR)],
    ));
    let daum = shared(StubProvider::new(
        NewsSource::Daum,
        vec![
            article("<b>반도체</b>  수출 급증", 2 * HOUR),
            article("조선 수주 확대", HOUR),
        ],
    ));
    let pool = pool_with(
        providers(&[&naver, &daum]),
        &["증시", "코스피"],
        Arc::new(ManualClock::new(NOW)),
    );

    let items = pool.fetch_all().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "반도체 수출 급증");
    assert_eq!(items[0].source, NewsSource::Naver);
    assert_eq!(items[1].source, NewsSource::Daum);
}

#[tokio::test]
async fn stale_and_undated_items_are_dropped() {
    let naver = shared(StubProvider::new(
        NewsSource::Naver,
        vec![
            article("방금 나온 뉴스", 0),
            article("딱 하루 전 뉴스", 24 * HOUR),
            article("어제 뉴스", 25 * HOUR),
            RawArticle {
                title: "날짜 없는 뉴스".into(),
                description: String::new(),
                published_at_raw: Some("not a date".into()),
            },
        ],
    ));
    let pool = pool_with(providers(&[&naver]), &["증시"], Arc::new(ManualClock::new(NOW)));

    let titles: Vec<String> = pool.fetch_all().await.iter().map(|i| i.title.clone()).collect();
    assert_eq!(titles, vec!["방금 나온 뉴스", "딱 하루 전 뉴스"]);
}

#[tokio::test]
async fn failing_provider_does_not_poison_pool() {
    let naver = shared(StubProvider::new(
        NewsSource::Naver,
        vec![article("코스피 강세", HOUR)],
    ));
    let daum = shared(StubProvider::failing(NewsSource::Daum));
    let pool = pool_with(
        providers(&[&naver, &daum]),
        &["증시"],
        Arc::new(ManualClock::new(NOW)),
    );

    let items = pool.fetch_all().await;
    assert_eq!(items.len(), 1);
    assert_eq!(daum.calls(), 1);
    assert_eq!(pool.enabled_sources(), vec![NewsSource::Naver, NewsSource::Daum]);
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_as_empty() {
    let slow = shared(
        StubProvider::new(NewsSource::NewsApi, vec![article("늦은 뉴스", HOUR)])
            .with_delay(Duration::from_secs(10)),
    );
    let fast = shared(StubProvider::new(
        NewsSource::Naver,
        vec![article("빠른 뉴스", HOUR)],
    ));
    let pool = pool_with(
        providers(&[&fast, &slow]),
        &["증시"],
        Arc::new(ManualClock::new(NOW)),
    );

    let items = pool.fetch_all().await;
    assert_eq!(slow.calls(), 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "빠른 뉴스");
}

#[tokio::test]
async fn no_providers_means_no_fetch() {
    let pool = NewsPool::new(
        Vec::new(),
        pool_params(&["증시"]),
        Arc::new(ManualClock::new(NOW)),
    );
    assert!(!pool.has_providers());
    assert!(pool.fetch_all().await.is_empty());
}

#[tokio::test]
async fn cache_key_sorts_sources_and_trims_keywords() {
    let newsapi = shared(StubProvider::new(NewsSource::NewsApi, Vec::new()));
    let naver = shared(StubProvider::new(NewsSource::Naver, Vec::new()));
    let pool = pool_with(
        providers(&[&newsapi, &naver]),
        &[" 증시 ", "", "코스피"],
        Arc::new(ManualClock::new(NOW)),
    );
    let key = pool.cache_key();
    assert_eq!(key.sources, vec![NewsSource::Naver, NewsSource::NewsApi]);
    assert_eq!(key.keywords, vec!["증시".to_string(), "코스피".to_string()]);
    assert_eq!(key.lookback_hours, 24);
    assert_eq!(key.items_per_source, 50);
}
