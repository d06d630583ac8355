//! CSS selector parsing utilities.

use scraper::Selector;

use crate::error_handling::ConfigError;

/// Parses a user-supplied CSS selector.
///
/// # Errors
///
/// Returns `ConfigError::InvalidSelector` carrying the selector text and the
/// parser's message.
pub fn parse_selector(selector_str: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector_str)
        .map_err(|e| ConfigError::InvalidSelector(selector_str.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("a.storylink").is_ok());
        assert!(parse_selector(".titleline > a").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid_keeps_input() {
        match parse_selector("a[[") {
            Err(ConfigError::InvalidSelector(sel, _)) => assert_eq!(sel, "a[["),
            other => panic!("expected InvalidSelector, got {other:?}"),
        }
    }
}
