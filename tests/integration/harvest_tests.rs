//! Crawl-then-download tests sharing one file ledger

use crate::common::{create_test_config, mount_page, FakeDownloader};
use pagesweep::crawler::{CrawlDriver, PageFetcher};
use pagesweep::download::DownloadDriver;
use pagesweep::ledger::{FileLedger, ItemStatus, Ledger};
use pagesweep::output::load_statistics;
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_full_harvest_updates_item_ledger() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        2,
        &["https://example.com/v/one/", "https://example.com/v/broken/"],
        1,
    )
    .await;
    mount_page(&mock_server, 1, &["https://example.com/v/two/"], 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 2, 1);
    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let crawl = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;
    assert_eq!(crawl.new_links, 3);

    let downloader = FakeDownloader::default();
    let report = DownloadDriver::new(&config, &downloader, &mut ledger)
        .download_pending(&mut items)
        .await;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.completed, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].url, "https://example.com/v/broken/");
    assert!(report.failures[0].message.contains("HTTP Error 404"));

    assert_eq!(
        std::fs::read_to_string(&config.ledger.items_file).unwrap(),
        "video_url,status\n\
         https://example.com/v/one/,completed\n\
         https://example.com/v/broken/,failed\n\
         https://example.com/v/two/,completed\n"
    );
    assert_eq!(
        *downloader.calls.lock().unwrap(),
        vec![
            "https://example.com/v/one/".to_string(),
            "https://example.com/v/broken/".to_string(),
            "https://example.com/v/two/".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_rerun_does_not_retry_failed_items() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 1, 1);
    std::fs::write(
        &config.ledger.items_file,
        "video_url,status\nhttps://example.com/v/broken/,failed\nhttps://example.com/v/new/,pending\n",
    )
    .unwrap();

    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut items = ledger.load_item_statuses();

    let downloader = FakeDownloader::default();
    let report = DownloadDriver::new(&config, &downloader, &mut ledger)
        .download_pending(&mut items)
        .await;

    assert_eq!(report.attempted, 1);
    assert_eq!(
        *downloader.calls.lock().unwrap(),
        vec!["https://example.com/v/new/".to_string()]
    );
    assert_eq!(
        FileLedger::from_config(&config.ledger)
            .load_item_statuses()
            .get("https://example.com/v/broken/"),
        Some(ItemStatus::Failed)
    );
}

#[tokio::test]
async fn test_requeued_items_are_downloaded_again() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 1, 1);
    std::fs::write(
        &config.ledger.items_file,
        "video_url,status\nhttps://example.com/v/flaky/,failed\n",
    )
    .unwrap();

    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut items = ledger.load_item_statuses();

    let downloader = FakeDownloader::default();
    let mut driver = DownloadDriver::new(&config, &downloader, &mut ledger);
    assert_eq!(driver.requeue_failed(&mut items), 1);
    let report = driver.download_pending(&mut items).await;

    assert_eq!(report.completed, 1);
    let stats = load_statistics(&mut FileLedger::from_config(&config.ledger));
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_links_with_newline_and_comma_survive_a_harvest() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        &[
            "https://example.com/v/\n2/",
            "https://example.com/v/one/",
            "https://example.com/v/?tags=a,b",
        ],
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 1, 1);
    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    let fetcher = PageFetcher::new(&config.crawl).unwrap();
    let crawl = CrawlDriver::new(&config, fetcher, &mut ledger)
        .run(&mut visited, &mut items)
        .await;
    assert_eq!(crawl.new_links, 3);
    assert_eq!(
        FileLedger::from_config(&config.ledger)
            .load_item_statuses()
            .len(),
        3
    );

    let downloader = FakeDownloader::default();
    let report = DownloadDriver::new(&config, &downloader, &mut ledger)
        .download_pending(&mut items)
        .await;
    assert_eq!(report.completed, 3);

    let stats = load_statistics(&mut FileLedger::from_config(&config.ledger));
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.completed, 3);
}

#[test]
fn test_statistics_do_not_create_ledger_files() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 1, 1);

    let stats = load_statistics(&mut FileLedger::from_config(&config.ledger).read_only());

    assert_eq!(stats.total_items, 0);
    assert!(!config.ledger.items_file.exists());
    assert!(!config.ledger.pages_file.exists());
}
