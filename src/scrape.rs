//! Selector-driven extraction of results from an engine's HTML page.
//!
//! Each adapter owns a [`SelectorTable`] describing where its result
//! entries live. The selectors track the engines' live markup and will
//! need updating whenever an engine redesigns its results page.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::result::is_absolute_link;
use crate::{Result, SearchError, SearchResult};

/// CSS selectors locating the parts of one result entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorTable {
    /// Matches each result entry on the page.
    pub container: &'static str,
    /// Matches the anchor carrying the result link, inside a container.
    pub link: &'static str,
    /// Matches the title element inside a container. `None` uses the link text.
    pub title: Option<&'static str>,
    /// Title used when `title` is set but matches nothing.
    pub title_fallback: &'static str,
    /// Matches the snippet element inside a container.
    pub snippet: &'static str,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector '{}': {:?}", css, e)))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts results from `html` using `table`.
///
/// `resolve` maps the raw `href` to the final destination (unwrapping
/// redirect URLs); entries whose resolved link is not absolute are
/// dropped, as are entries without a link element.
pub fn extract<F>(
    html: &str,
    table: &SelectorTable,
    source: &str,
    resolve: F,
) -> Result<Vec<SearchResult>>
where
    F: Fn(&str) -> String,
{
    let document = Html::parse_document(html);
    let container_selector = selector(table.container)?;
    let link_selector = selector(table.link)?;
    let title_selector = table.title.map(selector).transpose()?;
    let snippet_selector = selector(table.snippet)?;

    let mut results = Vec::new();

    for element in document.select(&container_selector) {
        let Some(link_elem) = element.select(&link_selector).next() else {
            debug!("{}: skipping entry without a link element", source);
            continue;
        };

        let href = link_elem.value().attr("href").unwrap_or_default();
        let link = resolve(href);
        if !is_absolute_link(&link) {
            debug!("{}: skipping non-absolute link '{}'", source, link);
            continue;
        }

        let title = match &title_selector {
            Some(title_selector) => element
                .select(title_selector)
                .next()
                .map(text_of)
                .unwrap_or_else(|| table.title_fallback.to_string()),
            None => text_of(link_elem),
        };

        let snippet = element
            .select(&snippet_selector)
            .next()
            .map(text_of)
            .unwrap_or_default();

        results.push(SearchResult::new(link, title, snippet).with_source(source));
    }

    debug!("{}: parsed {} results", source, results.len());
    Ok(results)
}

/// Returns the value of query parameter `name` in `href`, percent-decoded.
///
/// Protocol-relative (`//host/...`) and path-only (`/path?...`) hrefs are
/// resolved against `base` first. A literal `+` in the value is kept as is.
pub fn query_param(href: &str, base: &str, name: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    let url = base.join(href).ok()?;
    let raw = url
        .query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)?;
    urlencoding::decode(raw).ok().map(|value| value.into_owned())
}
