//! Page fetching and element extraction.
//!
//! The collector owns the HTTP side of a worker: bounded parallelism, request
//! pacing, error reporting, and HTML parsing. Callers only see matched
//! elements and errors through callbacks.

mod collector;
mod element;

pub use collector::{Collector, CollectorLimits, CollectorStats};
pub use element::HtmlElement;
