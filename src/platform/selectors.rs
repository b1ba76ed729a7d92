//! Ordered fallback selector chains
//!
//! Platform templates drift between skin versions, so every field is located by
//! a list of CSS selectors tried in order. The first selector yielding a
//! non-empty match wins. Selectors may contain `{id}`, replaced by the post
//! identifier before parsing.

use scraper::{ElementRef, Html, Selector};

use super::PostId;

/// Placeholder substituted with the post identifier
const ID_PLACEHOLDER: &str = "{id}";

/// An ordered list of selector strategies for one field
#[derive(Debug, Clone, Default)]
pub struct SelectorChain {
    patterns: Vec<String>,
}

impl SelectorChain {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the first element matched by any strategy, in chain order
    pub fn first_element<'a>(&self, document: &'a Html, id: &PostId) -> Option<ElementRef<'a>> {
        self.selectors(id)
            .find_map(|selector| document.select(&selector).next())
    }

    /// Returns the whitespace-collapsed text of the first strategy whose match
    /// has non-empty text
    pub fn first_text(&self, document: &Html, id: &PostId) -> Option<String> {
        self.selectors(id).find_map(|selector| {
            document
                .select(&selector)
                .map(|element| element_text(&element))
                .find(|text| !text.is_empty())
        })
    }

    fn selectors<'s>(&'s self, id: &'s PostId) -> impl Iterator<Item = Selector> + 's {
        self.patterns.iter().filter_map(move |pattern| {
            let css = pattern.replace(ID_PLACEHOLDER, id.as_str());
            let parsed = match Selector::parse(&css) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::debug!("Skipping invalid selector '{}': {:?}", css, e);
                    None
                }
            };
            parsed
        })
    }
}

/// Collects an element's text with runs of whitespace collapsed to one space
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
