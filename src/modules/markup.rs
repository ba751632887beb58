//! Markup helpers shared by service modules
//!
//! Titles and meta content go through `scraper` so entities are decoded.
//! Inline fragments that are not addressable as elements are matched with
//! regular expressions.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// Human-readable size such as `1.5 GB` or `300 MB`
pub static SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([KMGTP]?B)").unwrap());

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,.]*").unwrap());

/// Extracts the trimmed text of the first `<title>` element
pub fn title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the `content` of the first `<meta>` whose `name` or `property` is `key`
pub fn meta(html: &str, key: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("meta").ok()?;
    document
        .select(&selector)
        .find(|element| {
            let attrs = element.value();
            attrs.attr("name") == Some(key) || attrs.attr("property") == Some(key)
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns every match of `pattern` in `text`, first occurrence order, without repeats
pub fn unique_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for found in pattern.find_iter(text) {
        let link = found.as_str();
        if !links.iter().any(|seen| seen == link) {
            links.push(link.to_string());
        }
    }
    links
}

/// First match of `pattern` in `text`
pub fn first(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().to_string())
}

/// First capture group of `pattern` in `text`
pub fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First size expression in `text`
pub fn size(text: &str) -> Option<String> {
    first(&SIZE, text)
}

/// Parses the first number in `text`, ignoring thousands separators
///
/// `"1,234 files"` and `"1.234 files"` both yield 1234.
pub fn count(text: &str) -> Option<u64> {
    let digits: String = DIGITS
        .find(text)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Decodes the `&amp;` entity left in URLs matched from raw markup
pub fn unescape_url(url: &str) -> String {
    url.replace("&amp;", "&")
}
