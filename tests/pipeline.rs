//! Full pipeline run against a canned page source and an in-memory store.

use std::time::Duration;

use bookscrap::config::Config;
use bookscrap::fetch::{PageResponse, StaticFetcher};
use bookscrap::pipeline;
use bookscrap::store::MemoryBookStore;

fn listing(title: &str, author: &str) -> String {
    format!(
        r#"<div class="s-result-item">
             <span class="a-text-normal">{title}</span>
             <a class="a-size-base">{author}</a>
             <span class="a-price-whole">25</span>
             <span class="a-icon-alt">4.5 out of 5 stars</span>
           </div>"#
    )
}

fn test_config(target_count: usize) -> Config {
    Config {
        base_url: "https://example.com/s?k=books".into(),
        headers: vec![],
        target_count,
        max_pages: 10,
        database_url: "postgres://unused".into(),
        retry_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn run_collects_dedups_and_loads() {
    let fetcher = StaticFetcher::from_bodies([
        format!("{}{}", listing("Designing Data Apps", "Ann"), listing("Streaming Systems", "Bob")),
        format!("{}{}", listing("Streaming Systems", "Bob"), listing("The Data Warehouse", "Cal")),
    ]);
    let store = MemoryBookStore::new();

    pipeline::run(&fetcher, &store, &test_config(3)).await.unwrap();

    assert_eq!(store.ensure_table_calls(), 1);
    let titles: Vec<_> = store.books().into_iter().map(|b| b.title).collect();
    assert_eq!(
        titles,
        ["Designing Data Apps", "Streaming Systems", "The Data Warehouse"]
    );
}

#[tokio::test]
async fn run_with_failing_source_loads_partial_batch() {
    // Page 2 errors out, so only page 1 records reach the store.
    let fetcher = StaticFetcher::new(vec![
        PageResponse {
            status: 200,
            body: listing("Only Book", "Ann"),
        },
        PageResponse {
            status: 500,
            body: String::new(),
        },
    ]);
    let store = MemoryBookStore::new();

    pipeline::run(&fetcher, &store, &test_config(5)).await.unwrap();

    assert_eq!(store.insert_count(), 1);
    assert_eq!(store.books()[0].title, "Only Book");
    assert_eq!(store.books()[0].author, "Ann");
}

#[tokio::test]
async fn run_with_no_listings_inserts_nothing() {
    let fetcher = StaticFetcher::from_bodies(["<html><body>empty</body></html>".to_string()]);
    let store = MemoryBookStore::new();

    pipeline::run(&fetcher, &store, &test_config(5)).await.unwrap();

    assert_eq!(store.insert_count(), 0);
    assert_eq!(store.ensure_table_calls(), 1);
}
