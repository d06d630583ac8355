//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;
use crate::error_handling::ConfigError;
use crate::utils::parse_selector;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use linkscrape::Config;
///
/// let config = Config {
///     targets: vec!["https://news.ycombinator.com/".to_string()],
///     selector: ".titleline > a".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Pages to scrape; one worker is started per entry
    pub targets: Vec<String>,

    /// CSS selector for the elements turned into records
    pub selector: String,

    /// Attribute read from each matched element for the record link
    pub attribute: String,

    /// Maximum concurrent requests per worker
    pub parallelism: usize,

    /// Politeness delay between requests in milliseconds (0 disables pacing)
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// JSON output file
    pub json_output: PathBuf,

    /// CSV output file
    pub csv_output: PathBuf,

    /// Listen address for `GET /results` (None disables the endpoint)
    pub http_addr: Option<SocketAddr>,

    /// Optional SQLite database receiving every flush
    pub db_path: Option<PathBuf>,

    /// Write intermediate checkpoints every N seconds while scraping
    pub checkpoint_secs: Option<u64>,

    /// Keep serving results after the scrape finishes, until SIGINT/SIGTERM
    pub serve_after_scrape: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Politeness delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Checks everything that must hold before any task is started.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when there are no targets, a target is not an
    /// absolute http(s) URL, the selector does not parse, parallelism is zero,
    /// or the delay or checkpoint interval is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for target in &self.targets {
            let parsed = url::Url::parse(target)
                .map_err(|e| ConfigError::InvalidTarget(target.clone(), e.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidTarget(
                    target.clone(),
                    format!("unsupported scheme '{}'", parsed.scheme()),
                ));
            }
        }
        parse_selector(&self.selector)?;
        if self.parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::OutOfRange("delay_ms", MAX_DELAY_MS));
        }
        if self.checkpoint_secs.is_some_and(|secs| secs > MAX_CHECKPOINT_SECS) {
            return Err(ConfigError::OutOfRange(
                "checkpoint_secs",
                MAX_CHECKPOINT_SECS,
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![DEFAULT_TARGET_URL.to_string()],
            selector: DEFAULT_SELECTOR.to_string(),
            attribute: DEFAULT_LINK_ATTRIBUTE.to_string(),
            parallelism: DEFAULT_PARALLELISM,
            delay_ms: DEFAULT_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            json_output: PathBuf::from(DEFAULT_JSON_OUTPUT),
            csv_output: PathBuf::from(DEFAULT_CSV_OUTPUT),
            http_addr: DEFAULT_HTTP_ADDR.parse().ok(),
            db_path: None,
            checkpoint_secs: None,
            serve_after_scrape: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Scrape the default target
/// linkscrape
///
/// # Two targets, a different selector, and a database
/// linkscrape https://a.example/ https://b.example/ --selector "h2 > a" --db-path ./links.db
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "linkscrape",
    about = "Scrapes anchor text and links from target pages concurrently."
)]
pub struct Opt {
    /// Pages to scrape (one worker per URL)
    #[arg(value_parser, default_value = DEFAULT_TARGET_URL)]
    pub targets: Vec<String>,

    /// CSS selector for the elements to extract
    #[arg(long, default_value = DEFAULT_SELECTOR)]
    pub selector: String,

    /// Attribute holding the link of each matched element
    #[arg(long, default_value = DEFAULT_LINK_ATTRIBUTE)]
    pub attribute: String,

    /// Maximum concurrent requests per worker
    #[arg(long, default_value_t = DEFAULT_PARALLELISM)]
    pub parallelism: usize,

    /// Delay between requests in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// JSON output file
    #[arg(long, value_parser, default_value = DEFAULT_JSON_OUTPUT)]
    pub json_output: PathBuf,

    /// CSV output file
    #[arg(long, value_parser, default_value = DEFAULT_CSV_OUTPUT)]
    pub csv_output: PathBuf,

    /// Listen address for the results endpoint
    #[arg(long, default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: SocketAddr,

    /// Disable the results endpoint
    #[arg(long)]
    pub no_http: bool,

    /// SQLite database receiving every flush (also read from LINKSCRAPE_DB_PATH)
    #[arg(long, value_parser, env = DB_PATH_ENV)]
    pub db_path: Option<PathBuf>,

    /// Write intermediate checkpoints every N seconds while scraping
    #[arg(long)]
    pub checkpoint_secs: Option<u64>,

    /// Keep serving results after scraping finishes, until interrupted
    #[arg(long)]
    pub serve_after_scrape: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            targets: opt.targets,
            selector: opt.selector,
            attribute: opt.attribute,
            parallelism: opt.parallelism,
            delay_ms: opt.delay_ms,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            json_output: opt.json_output,
            csv_output: opt.csv_output,
            http_addr: if opt.no_http {
                None
            } else {
                Some(opt.http_addr)
            },
            db_path: opt.db_path,
            checkpoint_secs: opt.checkpoint_secs.filter(|secs| *secs > 0),
            serve_after_scrape: opt.serve_after_scrape,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
