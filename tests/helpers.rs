// Shared test helpers: fake target pages, run configuration, output readers.
//
// Included from other test files with `#[path = "helpers.rs"] mod helpers;`.

use std::path::Path;

use linkscrape::{Config, LogFormat, LogLevel, ScrapedRecord};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a page whose anchors match the default `a.storylink` selector.
#[allow(dead_code)]
pub fn story_page(links: &[(&str, &str)]) -> String {
    let mut body = String::from("<html><body><table>");
    for (title, href) in links {
        body.push_str(&format!(
            r#"<tr><td><a class="storylink" href="{href}">{title}</a></td></tr>"#
        ));
    }
    body.push_str(r#"<tr><td><a class="morelink" href="news?p=2">More</a></td></tr>"#);
    body.push_str("</table></body></html>");
    body
}

/// Serves `body` as HTML at `route`.
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

/// Config for a fast, quiet run writing into `dir` with the endpoint disabled.
#[allow(dead_code)]
pub fn test_config(targets: Vec<String>, dir: &Path) -> Config {
    Config {
        targets,
        delay_ms: 0,
        timeout_seconds: 5,
        user_agent: "linkscrape_test/1.0".to_string(),
        json_output: dir.join("output.json"),
        csv_output: dir.join("output.csv"),
        http_addr: None,
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        ..Default::default()
    }
}

/// Parses a JSON export.
#[allow(dead_code)]
pub fn read_json(path: &Path) -> Vec<ScrapedRecord> {
    let content = std::fs::read_to_string(path).expect("Failed to read JSON output");
    serde_json::from_str(&content).expect("JSON output should parse")
}

/// Parses a CSV export, checking the header and returning the data rows.
#[allow(dead_code)]
pub fn read_csv(path: &Path) -> Vec<ScrapedRecord> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV output");
    let headers = reader.headers().expect("CSV header").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Title", "Link"]);
    reader
        .records()
        .map(|row| {
            let row = row.expect("CSV row");
            ScrapedRecord::new(&row[0], &row[1])
        })
        .collect()
}
