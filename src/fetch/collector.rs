//! Asynchronous page collector.
//!
//! A `Collector` fetches pages in the background and dispatches matched
//! elements to registered callbacks. `visit` queues a page and returns
//! immediately; `wait` resolves once every queued page has been handled.

use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{ConfigError, FetchError};
use crate::fetch::element::HtmlElement;
use crate::initialization::{init_request_pacer, init_semaphore, RequestPacer};
use crate::utils::parse_selector;

type HtmlCallback = Arc<dyn Fn(&HtmlElement<'_>) + Send + Sync>;
type RequestCallback = Arc<dyn Fn(&Url) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&Url, &FetchError) + Send + Sync>;

/// Limits applied to one collector.
#[derive(Debug, Clone, Copy)]
pub struct CollectorLimits {
    /// Maximum requests in flight at once
    pub parallelism: usize,
    /// Minimum spacing between request starts
    pub delay: Duration,
}

#[derive(Clone, Default)]
struct Handlers {
    html: Vec<(Selector, HtmlCallback)>,
    request: Vec<RequestCallback>,
    error: Vec<ErrorCallback>,
}

/// Outcome of one page visit, as seen by `wait`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectorStats {
    /// Pages fetched and parsed
    pub pages: usize,
    /// Elements dispatched to HTML callbacks
    pub matches: usize,
    /// Requests that ended in an error
    pub errors: usize,
}

enum VisitOutcome {
    Parsed { matches: usize },
    Failed,
}

/// Fetches pages and runs selector callbacks over them.
pub struct Collector {
    client: Arc<reqwest::Client>,
    semaphore: Arc<Semaphore>,
    pacer: Option<Arc<RequestPacer>>,
    handlers: Arc<Handlers>,
    pending: JoinSet<VisitOutcome>,
}

impl Collector {
    pub fn new(client: Arc<reqwest::Client>, limits: CollectorLimits) -> Self {
        let pacer = init_request_pacer(limits.delay, 1).map(|(pacer, _shutdown)| pacer);
        Self {
            client,
            semaphore: init_semaphore(limits.parallelism.max(1)),
            pacer,
            handlers: Arc::new(Handlers::default()),
            pending: JoinSet::new(),
        }
    }

    /// Registers a callback invoked once per element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` if `selector` does not parse.
    pub fn on_html<F>(&mut self, selector: &str, callback: F) -> Result<(), ConfigError>
    where
        F: Fn(&HtmlElement<'_>) + Send + Sync + 'static,
    {
        let selector = parse_selector(selector)?;
        Arc::make_mut(&mut self.handlers)
            .html
            .push((selector, Arc::new(callback)));
        Ok(())
    }

    /// Registers a callback invoked right before each request is sent.
    pub fn on_request<F>(&mut self, callback: F)
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.handlers)
            .request
            .push(Arc::new(callback));
    }

    /// Registers a callback invoked for each failed request.
    pub fn on_error<F>(&mut self, callback: F)
    where
        F: Fn(&Url, &FetchError) + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.handlers)
            .error
            .push(Arc::new(callback));
    }

    /// Queues `url` for fetching. Returns immediately.
    pub fn visit(&mut self, url: Url) {
        let client = Arc::clone(&self.client);
        let semaphore = Arc::clone(&self.semaphore);
        let pacer = self.pacer.clone();
        let handlers = Arc::clone(&self.handlers);

        self.pending.spawn(async move {
            // The semaphore is never closed while the collector is alive.
            let _permit = semaphore.acquire_owned().await.ok();
            if let Some(pacer) = pacer {
                pacer.acquire().await;
            }
            for callback in &handlers.request {
                callback(&url);
            }

            match fetch_page(&client, &url).await {
                Ok(Some(body)) => VisitOutcome::Parsed {
                    matches: dispatch_html(&body, &url, &handlers),
                },
                Ok(None) => VisitOutcome::Parsed { matches: 0 },
                Err(e) => {
                    for callback in &handlers.error {
                        callback(&url, &e);
                    }
                    VisitOutcome::Failed
                }
            }
        });
    }

    /// Waits until every queued visit has finished.
    pub async fn wait(&mut self) -> CollectorStats {
        let mut stats = CollectorStats::default();
        while let Some(joined) = self.pending.join_next().await {
            match joined {
                Ok(VisitOutcome::Parsed { matches }) => {
                    stats.pages += 1;
                    stats.matches += matches;
                }
                Ok(VisitOutcome::Failed) => stats.errors += 1,
                Err(join_error) => {
                    stats.errors += 1;
                    log::warn!("Visit task panicked: {:?}", join_error);
                }
            }
        }
        stats
    }
}

/// Fetches `url`, returning the body when the response is HTML.
///
/// `Ok(None)` means the request succeeded but the content type is not HTML,
/// so there is nothing to match selectors against.
async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<Option<String>, FetchError> {
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Status(status));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("html"))
        .unwrap_or(true);

    if let Some(len) = response.content_length() {
        if len as usize > MAX_RESPONSE_BODY_SIZE {
            return Err(FetchError::Body(format!(
                "response of {len} bytes exceeds limit of {MAX_RESPONSE_BODY_SIZE}"
            )));
        }
    }

    if !is_html {
        log::debug!("Skipping non-HTML response from {url}");
        return Ok(None);
    }

    // Decoded with the charset declared in Content-Type (UTF-8 if absent).
    let text = response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))?;
    if text.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(FetchError::Body(format!(
            "response of {} bytes exceeds limit of {MAX_RESPONSE_BODY_SIZE}",
            text.len()
        )));
    }
    Ok(Some(text))
}

// `Html` is not `Send`, so parsing and dispatch stay in one synchronous call.
fn dispatch_html(body: &str, url: &Url, handlers: &Handlers) -> usize {
    if handlers.html.is_empty() {
        return 0;
    }
    let document = Html::parse_document(body);
    let mut matches = 0;
    for (selector, callback) in &handlers.html {
        for element in document.select(selector) {
            callback(&HtmlElement::new(element, url));
            matches += 1;
        }
    }
    matches
}
