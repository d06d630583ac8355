//! Configuration constants.
//!
//! Defaults for the scraper, the fetch engine, and the output files.

/// Page scraped when no target is given
pub const DEFAULT_TARGET_URL: &str = "https://news.ycombinator.com/";

/// CSS selector matched against every fetched page
pub const DEFAULT_SELECTOR: &str = "a.storylink";

/// Attribute read from each matched element to build the record link
pub const DEFAULT_LINK_ATTRIBUTE: &str = "href";

/// Maximum in-flight requests per collector
pub const DEFAULT_PARALLELISM: usize = 5;

/// Politeness delay between request starts, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_JSON_OUTPUT: &str = "output.json";
pub const DEFAULT_CSV_OUTPUT: &str = "output.csv";

/// Address the results endpoint listens on
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Route serving the in-memory results
pub const RESULTS_ROUTE: &str = "/results";

/// Header row written at the top of the CSV export
pub const CSV_HEADER: [&str; 2] = ["Title", "Link"];

/// Upper bound for `--delay-ms` (one hour)
pub const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Upper bound for `--checkpoint-secs` (one day)
pub const MAX_CHECKPOINT_SECS: u64 = 24 * 60 * 60;

/// Progress logging interval in seconds while workers are running
pub const LOGGING_INTERVAL: u64 = 5;

/// Maximum response body size in bytes (5MB)
/// Larger pages are reported as fetch errors instead of being parsed
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Environment variable holding the SQLite database path (may be set in `.env`)
pub const DB_PATH_ENV: &str = "LINKSCRAPE_DB_PATH";
