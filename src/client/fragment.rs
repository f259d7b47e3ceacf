//! Bookkeeping data extracted from result fragments
//!
//! Result pages arrive as rendered HTML. Rendering them is not this crate's
//! job, but a few values are needed to drive pagination and selection:
//!
//! - `<input id="searchResultCount" value="...">`: total matching results
//! - `<input id="NumPages" value="...">`: number of pages
//! - `<a class="pubDetail" data-pubid="...">Title</a>`: one per result

use super::error::ClientError;
use crate::selection::ItemId;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("input pattern compiles"));

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("anchor pattern compiles")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern compiles")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"));

/// One result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub id: ItemId,
    pub title: String,
}

/// A result fragment and the values extracted from it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultFragment {
    /// Raw fragment, for whoever renders it
    pub html: String,
    /// Total results reported by the server
    pub total_results: Option<u64>,
    /// Total pages reported by the server
    pub total_pages: Option<u32>,
    /// Results on this page, in display order
    pub records: Vec<ResultRecord>,
}

impl ResultFragment {
    /// Extract bookkeeping values from a fragment
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let mut total_results = None;
        let mut total_pages = None;

        for tag in INPUT_TAG.find_iter(html) {
            let attrs = attributes(tag.as_str());
            let Some(value) = lookup(&attrs, "value") else {
                continue;
            };
            match lookup(&attrs, "id") {
                Some("searchResultCount") => total_results = value.trim().parse().ok(),
                Some("NumPages") => total_pages = value.trim().parse().ok(),
                _ => {}
            }
        }

        let records = ANCHOR
            .captures_iter(html)
            .filter_map(|caps| {
                let attrs = attributes(caps.get(1)?.as_str());
                let is_detail = lookup(&attrs, "class")
                    .is_some_and(|class| class.split_whitespace().any(|c| c == "pubDetail"));
                if !is_detail {
                    return None;
                }
                let id = lookup(&attrs, "data-pubid")?.trim();
                let title = text_content(caps.get(2)?.as_str());
                if id.is_empty() || title.is_empty() {
                    return None;
                }
                Some(ResultRecord {
                    id: ItemId::new(id),
                    title,
                })
            })
            .collect();

        Self {
            html: html.to_string(),
            total_results,
            total_pages,
            records,
        }
    }

    /// Extract a result page, which must report its totals
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnexpectedResponse` when `#searchResultCount` or
    /// `#NumPages` is missing, as on a server error page.
    pub fn parse_page(endpoint: &str, html: &str) -> Result<Self, ClientError> {
        let fragment = Self::parse(html);
        if fragment.total_results.is_none() || fragment.total_pages.is_none() {
            return Err(ClientError::unexpected(
                endpoint,
                "result page has no #searchResultCount or #NumPages",
            ));
        }
        Ok(fragment)
    }

    /// Ids of the results on this page
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

fn attributes(tag: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, decode_entities(value)))
        })
        .collect()
}

fn lookup<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Visible text of an HTML snippet, whitespace collapsed
pub(crate) fn text_content(html: &str) -> String {
    let stripped = TAG.replace_all(html, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Find the value of a hidden input by `name`
pub(crate) fn input_value(html: &str, name: &str) -> Option<String> {
    INPUT_TAG.find_iter(html).find_map(|tag| {
        let attrs = attributes(tag.as_str());
        (lookup(&attrs, "name") == Some(name))
            .then(|| lookup(&attrs, "value").map(str::to_string))
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RESULT_PAGE;

    #[test]
    fn test_parse_counts_and_records() {
        let fragment = ResultFragment::parse(RESULT_PAGE);

        assert_eq!(fragment.total_results, Some(3));
        assert_eq!(fragment.total_pages, Some(2));
        assert_eq!(
            fragment.item_ids(),
            vec![ItemId::from("101"), ItemId::from("102")]
        );
        assert_eq!(fragment.records[0].title, "Bone loss in microgravity");
        assert_eq!(fragment.records[1].title, "Muscle & tendon <adaptation>");
    }

    #[test]
    fn test_parse_ignores_other_anchors() {
        let html = r#"<a href="/help">Help</a><a class="pubDetail extra" data-pubid='7'>Seven</a>
            <a class="pubDetail" data-pubid="">No id</a>"#;
        let fragment = ResultFragment::parse(html);
        assert_eq!(fragment.records.len(), 1);
        assert_eq!(fragment.records[0].id, ItemId::from("7"));
        assert_eq!(fragment.total_results, None);
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let html = r#"<input value="42" type="hidden" id="searchResultCount" />"#;
        assert_eq!(ResultFragment::parse(html).total_results, Some(42));
    }

    #[test]
    fn test_input_value() {
        let html = r#"<form id="__AjaxAntiForgeryForm"><input name="__RequestVerificationToken" type="hidden" value="tok&amp;en"></form>"#;
        assert_eq!(
            input_value(html, "__RequestVerificationToken").as_deref(),
            Some("tok&en")
        );
        assert_eq!(input_value(html, "missing"), None);
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("<b>Bone</b>\n  <i>loss</i>"), "Bone loss");
    }

    #[test]
    fn test_numeric_and_named_entities() {
        let html = r#"<a class="pubDetail" data-pubid="1">Caf&#233; &eacute;tude &#x2013; r&#233;sum&#233;</a>"#;
        let fragment = ResultFragment::parse(html);
        assert_eq!(fragment.records[0].title, "Café étude – résumé");
        assert_eq!(text_content("a&nbsp;b &amp;lt;"), "a b &lt;");
    }

    #[test]
    fn test_parse_page_requires_totals() {
        let page = ResultFragment::parse_page("FetchPageAjax", RESULT_PAGE).unwrap();
        assert_eq!(page.total_pages, Some(2));

        let err = ResultFragment::parse_page(
            "FetchPageAjax",
            "<html><title>Runtime Error</title></html>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedResponse { ref endpoint, .. } if endpoint == "FetchPageAjax"
        ));
    }
}
