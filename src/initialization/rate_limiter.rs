//! Request pacing.
//!
//! A token bucket refilled once per politeness delay. Each request start
//! consumes one token, so consecutive requests from one collector are spaced
//! by at least the configured delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore as TokioSemaphore;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Token-bucket pacer for a single collector.
///
/// # Behavior
///
/// - Starts with one token so the first request goes out immediately
/// - Adds one token per `delay`, never holding more than `capacity`
/// - Uses a background task for replenishment, stopped on drop or via the
///   returned `CancellationToken`
pub struct RequestPacer {
    permits: Arc<TokioSemaphore>,
    delay: Duration,
    shutdown: CancellationToken,
}

impl RequestPacer {
    /// Waits for and consumes one token.
    pub async fn acquire(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }

    /// Delay between tokens.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for RequestPacer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Initializes a request pacer.
///
/// If `delay` is zero, pacing is disabled and `None` is returned.
///
/// # Arguments
///
/// * `delay` - Minimum spacing between request starts
/// * `capacity` - Maximum tokens that can accumulate while idle
///
/// # Returns
///
/// A tuple of `(RequestPacer, CancellationToken)` if pacing is enabled. The
/// token stops the background replenishment task early.
pub fn init_request_pacer(
    delay: Duration,
    capacity: usize,
) -> Option<(Arc<RequestPacer>, CancellationToken)> {
    if delay.is_zero() {
        return None;
    }
    let Some(first_refill) = Instant::now().checked_add(delay) else {
        log::warn!("Politeness delay {delay:?} is out of range, pacing disabled");
        return None;
    };
    let capacity = capacity.max(1);
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    let pacer = Arc::new(RequestPacer {
        permits: Arc::new(TokioSemaphore::new(1)),
        delay,
        shutdown: shutdown.clone(),
    });

    let permits = Arc::clone(&pacer.permits);
    // First refill happens one delay after creation; the initial token covers
    // the first request.
    let mut ticker = interval_at(first_refill, delay);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if permits.available_permits() < capacity {
                        permits.add_permits(1);
                    }
                }
                _ = shutdown_clone.cancelled() => {
                    log::debug!("Request pacer background task shutting down");
                    break;
                }
            }
        }
    });

    Some((pacer, shutdown))
}
