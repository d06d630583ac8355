//! Scraped data model.

use serde::{Deserialize, Serialize};

/// One extracted element: its text and the value of its link attribute.
///
/// `link` is stored exactly as found in the page, so it may be relative.
/// A missing attribute yields an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub title: String,
    pub link: String,
}

impl ScrapedRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_lowercase_field_names() {
        let record = ScrapedRecord::new("Show HN: a thing", "item?id=1");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"title":"Show HN: a thing","link":"item?id=1"}"#);
    }
}
