//! Matched element handed to HTML callbacks.

use scraper::ElementRef;
use url::Url;

/// A single element matched by a registered selector.
///
/// Only valid for the duration of the callback; copy out what you need.
pub struct HtmlElement<'a> {
    element: ElementRef<'a>,
    request_url: &'a Url,
}

impl<'a> HtmlElement<'a> {
    pub(crate) fn new(element: ElementRef<'a>, request_url: &'a Url) -> Self {
        Self {
            element,
            request_url,
        }
    }

    /// Concatenated text of the element and its descendants, as it appears
    /// in the document.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Value of `name`, or an empty string when the attribute is absent.
    pub fn attr(&self, name: &str) -> String {
        self.element
            .value()
            .attr(name)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// URL of the page the element was found on.
    pub fn request_url(&self) -> &Url {
        self.request_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_text_and_attributes() {
        let doc = Html::parse_fragment(
            r#"<a class="storylink" href="item?id=7">Hello <b>world</b></a><a class="storylink">no link</a>"#,
        );
        let selector = Selector::parse("a.storylink").unwrap();
        let url = Url::parse("https://news.example/").unwrap();

        let elements: Vec<_> = doc
            .select(&selector)
            .map(|el| HtmlElement::new(el, &url))
            .collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Hello world");
        assert_eq!(elements[0].attr("href"), "item?id=7");
        assert_eq!(elements[1].attr("href"), "");
        assert_eq!(elements[1].request_url().as_str(), "https://news.example/");
    }
}
