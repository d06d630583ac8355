//! HTTP endpoint exposing the in-memory results.
//!
//! `GET /results` returns the store as a JSON array. The server runs in the
//! background and is shut down gracefully through its handle at the end of a
//! run.

mod handlers;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::RESULTS_ROUTE;
use crate::store::ResultStore;
use handlers::results_handler;

/// Handle to a running results server.
pub struct ResultsServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ResultsServer {
    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections, lets in-flight requests finish, and waits
    /// for the server task to exit.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            log::warn!("Results server task failed: {:?}", e);
        }
        log::debug!("Results server on {} stopped", self.local_addr);
    }
}

/// Builds the router serving `GET /results` from `store`.
pub fn results_router(store: ResultStore) -> Router {
    Router::new()
        .route(RESULTS_ROUTE, get(results_handler))
        .with_state(store)
}

/// Binds `addr` and starts serving in the background.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_results_server(
    addr: SocketAddr,
    store: ResultStore,
) -> Result<ResultsServer, anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind results server to {}: {}", addr, e))?;
    let local_addr = listener.local_addr()?;

    log::info!(
        "Web server running at http://{}{}",
        local_addr,
        RESULTS_ROUTE
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    let app = results_router(store);
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.cancelled().await })
            .await
        {
            log::warn!("Results server error: {}", e);
        }
    });

    Ok(ResultsServer {
        local_addr,
        shutdown,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScrapedRecord;

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_array() {
        let server = start_results_server(loopback(), ResultStore::new())
            .await
            .expect("bind");
        let url = format!("http://{}/results", server.local_addr());

        let response = reqwest::get(&url).await.expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(response.text().await.expect("body"), "[]");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_reflects_appends_between_requests() {
        let store = ResultStore::new();
        let server = start_results_server(loopback(), store.clone())
            .await
            .expect("bind");
        let url = format!("http://{}/results", server.local_addr());

        store.append(ScrapedRecord::new("One", "/1"));
        let first: Vec<ScrapedRecord> = serde_json::from_str(
            &reqwest::get(&url).await.unwrap().text().await.unwrap(),
        )
        .unwrap();
        assert_eq!(first, vec![ScrapedRecord::new("One", "/1")]);

        store.append(ScrapedRecord::new("Two", "/2"));
        let second: Vec<ScrapedRecord> = serde_json::from_str(
            &reqwest::get(&url).await.unwrap().text().await.unwrap(),
        )
        .unwrap();
        assert_eq!(second.len(), 2);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let server = start_results_server(loopback(), ResultStore::new())
            .await
            .expect("bind");
        let base = format!("http://{}", server.local_addr());
        let client = reqwest::Client::new();

        let missing = client.get(format!("{base}/nope")).send().await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let post = client.post(format!("{base}/results")).send().await.unwrap();
        assert_eq!(post.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_releases_port() {
        let server = start_results_server(loopback(), ResultStore::new())
            .await
            .expect("bind");
        let addr = server.local_addr();
        server.shutdown().await;

        let connect = tokio::net::TcpStream::connect(addr).await;
        assert!(connect.is_err(), "listener should be closed after shutdown");
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let first = start_results_server(loopback(), ResultStore::new())
            .await
            .expect("bind");
        let err = start_results_server(first.local_addr(), ResultStore::new())
            .await
            .err()
            .expect("second bind on the same port must fail");
        assert!(err.to_string().contains("Failed to bind results server"));
        first.shutdown().await;
    }
}
