///! Minimal RSS item reader shared by the news and ISS sources
///!
///! Items are cut out of the document with regexes rather than a full XML
///! parser; feeds in the wild are often not well-formed.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::Html;

/// Raw fields of one `<item>`, CDATA unwrapped and entities decoded once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssItem {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct RssReader {
    item: Regex,
    title: Regex,
    description: Regex,
    cdata: Regex,
}

impl RssReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>")
                .context("Failed to compile item regex")?,
            title: Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>")
                .context("Failed to compile title regex")?,
            description: Regex::new(r"(?s)<description\b[^>]*>(.*?)</description>")
                .context("Failed to compile description regex")?,
            cdata: Regex::new(r"(?s)^\s*<!\[CDATA\[(.*?)\]\]>\s*$")
                .context("Failed to compile CDATA regex")?,
        })
    }

    pub fn items(&self, xml: &str) -> Vec<RssItem> {
        self.item
            .captures_iter(xml)
            .filter_map(|caps| caps.get(1))
            .map(|body| RssItem {
                title: self.field(&self.title, body.as_str()),
                description: self.field(&self.description, body.as_str()),
            })
            .collect()
    }

    fn field(&self, re: &Regex, item: &str) -> Option<String> {
        let raw = re.captures(item)?.get(1)?.as_str();
        Some(match self.cdata.captures(raw).and_then(|c| c.get(1)) {
            Some(inner) => inner.as_str().to_string(),
            None => html_to_text(raw),
        })
    }
}

/// Whether `xml` is at least shaped like an RSS document
pub fn looks_like_rss(xml: &str) -> bool {
    xml.contains("<rss") || xml.contains("<channel")
}

/// Decode entities and drop tags
pub fn html_to_text(s: &str) -> String {
    Html::parse_fragment(s).root_element().text().collect()
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
