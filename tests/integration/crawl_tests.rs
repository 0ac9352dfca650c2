//! Crawl phase tests against a mock listing server

use crate::common::{create_test_config, mount_page};
use pagesweep::crawler::{CrawlDriver, PageFetcher};
use pagesweep::ledger::{FileLedger, ItemStatus, Ledger, MemoryLedger};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_single_page_records_links_and_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 5, &["https://example.com/v/A/", "https://example.com/v/B/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 5, 5);
    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.new_links, 2);
    assert_eq!(report.pages_fetched, 1);
    assert!(visited.contains(&5));
    assert_eq!(
        std::fs::read_to_string(&config.ledger.pages_file).unwrap(),
        "5\n"
    );
    assert_eq!(
        std::fs::read_to_string(&config.ledger.items_file).unwrap(),
        "video_url,status\nhttps://example.com/v/A/,pending\nhttps://example.com/v/B/,pending\n"
    );
    assert_eq!(items.get("https://example.com/v/A/"), Some(ItemStatus::Pending));
}

#[tokio::test]
async fn test_visited_page_is_never_requested() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 5, 5);
    std::fs::write(&config.ledger.pages_file, "5\n").unwrap();

    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.new_links, 0);
    assert_eq!(report.pages_skipped, 1);
    assert_eq!(
        std::fs::read_to_string(&config.ledger.pages_file).unwrap(),
        "5\n"
    );
}

#[tokio::test]
async fn test_only_unvisited_pages_are_requested_in_descending_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 4, &["https://example.com/v/4/"], 0).await;
    mount_page(&mock_server, 3, &["https://example.com/v/3/"], 1).await;
    mount_page(&mock_server, 2, &["https://example.com/v/2/"], 0).await;
    mount_page(&mock_server, 1, &["https://example.com/v/1/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 4, 1);
    let mut ledger = MemoryLedger::new().with_pages([4, 2]);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.pages_skipped, 2);
    assert_eq!(ledger.pages(), &[4, 2, 3, 1]);

    let urls: Vec<&str> = items.iter().map(|(url, _)| url).collect();
    assert_eq!(urls, vec!["https://example.com/v/3/", "https://example.com/v/1/"]);
}

#[tokio::test]
async fn test_link_on_two_pages_is_recorded_once() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 2, &["https://example.com/v/shared/", "https://example.com/v/x/"], 1).await;
    mount_page(&mock_server, 1, &["https://example.com/v/y/", "https://example.com/v/shared/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 2, 1);
    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.new_links, 3);
    let content = std::fs::read_to_string(&config.ledger.items_file).unwrap();
    assert_eq!(content.matches("https://example.com/v/shared/").count(), 1);
    assert_eq!(content.lines().count(), 4);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 3, &["https://example.com/v/a/"], 1).await;
    mount_page(&mock_server, 2, &["https://example.com/v/b/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 3, 2);

    {
        let mut ledger = FileLedger::from_config(&config.ledger);
        let mut visited = ledger.load_visited_pages();
        let mut items = ledger.load_item_statuses();
        let fetcher = PageFetcher::new(&config.crawl).unwrap();
        let report = CrawlDriver::new(&config, fetcher, &mut ledger)
            .run(&mut visited, &mut items)
            .await;
        assert_eq!(report.new_links, 2);
    }

    let items_after_first = std::fs::read_to_string(&config.ledger.items_file).unwrap();
    let pages_after_first = std::fs::read_to_string(&config.ledger.pages_file).unwrap();

    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();
    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.new_links, 0);
    assert_eq!(report.pages_skipped, 2);
    assert_eq!(
        std::fs::read_to_string(&config.ledger.items_file).unwrap(),
        items_after_first
    );
    assert_eq!(
        std::fs::read_to_string(&config.ledger.pages_file).unwrap(),
        pages_after_first
    );
}

#[tokio::test]
async fn test_failed_page_is_left_unvisited_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::path("/list/3/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 2, &["https://example.com/v/b/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 3, 2);
    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_fetched, 1);
    assert!(!visited.contains(&3));
    assert_eq!(
        std::fs::read_to_string(&config.ledger.pages_file).unwrap(),
        "2\n"
    );
}

#[tokio::test]
async fn test_unrecorded_links_leave_page_unvisited() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 7, &["https://example.com/v/a/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 7, 7);
    let mut ledger = MemoryLedger::new().reject_item_writes();
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.pages_failed, 1);
    assert!(visited.is_empty());
    assert!(ledger.pages().is_empty());
}

#[tokio::test]
async fn test_page_without_links_is_still_visited() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 9, &[], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 9, 9);
    let mut ledger = MemoryLedger::new();
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let report = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;

    assert_eq!(report.new_links, 0);
    assert_eq!(ledger.pages(), &[9]);
}

#[tokio::test]
async fn test_delay_follows_attempted_pages_only() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), dir.path(), 13, 10);
    config.crawl.request_delay_ms = 200;

    let mut ledger = MemoryLedger::new().with_pages([13, 12, 11]);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let mut driver = CrawlDriver::new(&config, fetcher, &mut ledger);

    let started = Instant::now();
    let skipped_only = driver.scrape_range(13, 11, &mut visited, &mut items).await;
    assert_eq!(skipped_only.pages_skipped, 3);
    assert!(started.elapsed() < Duration::from_millis(200));

    let started = Instant::now();
    let failed = driver.scrape_range(10, 10, &mut visited, &mut items).await;
    assert_eq!(failed.pages_failed, 1);
    assert!(started.elapsed() >= Duration::from_millis(200));
}
