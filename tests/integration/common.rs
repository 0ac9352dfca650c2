use pagesweep::config::Config;
use pagesweep::download::{DownloadCommand, DownloadError, ExitInfo};
use std::path::Path;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `server_uri` with ledgers in `dir`
pub fn create_test_config(server_uri: &str, dir: &Path, start_page: u64, end_page: u64) -> Config {
    let mut config = Config::default();
    config.crawl.start_page = start_page;
    config.crawl.end_page = end_page;
    config.crawl.base_url = format!("{}/list/{{}}/", server_uri);
    config.crawl.request_delay_ms = 0;
    config.download.directory = dir.join("downloads");
    config.ledger.pages_file = dir.join("scraped_pages.txt");
    config.ledger.items_file = dir.join("download_status.csv");
    config
}

/// Renders a listing page containing the given item links
pub fn listing_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a class="tumbpu" href="{}"><img src="thumb.jpg"></a>"#, link))
        .collect();
    format!(
        r#"<html><head><title>Newest</title></head><body>
        <a class="logo" href="/">home</a>
        <div class="thumbs">{}</div>
        </body></html>"#,
        anchors
    )
}

/// Mounts a listing page expected to be requested exactly `times` times
pub async fn mount_page(server: &MockServer, page: u64, links: &[&str], times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/list/{}/", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(links))
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Downloader double that fails any url containing "broken"
#[derive(Default)]
pub struct FakeDownloader {
    pub calls: Mutex<Vec<String>>,
}

impl DownloadCommand for &FakeDownloader {
    async fn execute(&self, url: &str, _output_template: &str) -> Result<ExitInfo, DownloadError> {
        self.calls.lock().unwrap().push(url.to_string());

        if url.contains("broken") {
            Ok(ExitInfo {
                code: Some(1),
                stdout: String::new(),
                stderr: "ERROR: [generic] Unable to download webpage: HTTP Error 404\n".to_string(),
            })
        } else {
            Ok(ExitInfo {
                code: Some(0),
                stdout: "[download] 100%\n".to_string(),
                stderr: String::new(),
            })
        }
    }
}
