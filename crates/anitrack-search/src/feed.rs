// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RSS item parsing and release-group extraction.
//!
//! Feeds are scanned for `<item>` elements and only `title`, `link` and
//! `pubDate` are read. Anything else in the document is ignored.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use anitrack_core::types::ReleaseItem;
use regex::Regex;

static ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>").unwrap());

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(title|link|pubDate)\b[^>]*>(.*?)</(?:title|link|pubDate)>").unwrap()
});

static CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Bracket contents that describe the encode rather than the group.
const NOT_GROUPS: &[&str] = &[
    "720", "1080", "480", "x264", "AAC", "8bit", "8 bit", "10bit", "10 bit",
];

/// Every item of an RSS document, in feed order. Items without a title are skipped.
pub fn parse_items(xml: &str) -> Vec<ReleaseItem> {
    ITEM.captures_iter(xml)
        .filter_map(|item| {
            let body = item.get(1)?.as_str();
            let mut title = None;
            let mut link = None;
            let mut published = None;
            for field in FIELD.captures_iter(body) {
                let value = text(&field[2]);
                match &field[1] {
                    "title" => title = Some(value),
                    "link" => link = Some(value),
                    _ => published = Some(value),
                }
            }
            Some(ReleaseItem {
                title: title.filter(|t| !t.is_empty())?,
                link: link.filter(|l| !l.is_empty()),
                published,
            })
        })
        .collect()
}

fn text(raw: &str) -> String {
    let raw = raw.trim();
    match CDATA.captures(raw) {
        Some(c) => c[1].trim().to_string(),
        None => decode_entities(raw),
    }
}

/// Decode the XML predefined entities and numeric character references.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let Some(end) = rest.find(';') else {
            break;
        };
        let decoded = match &rest[1..end] {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            entity => entity.strip_prefix('#').and_then(|num| {
                let code = match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse().ok(),
                };
                code.and_then(char::from_u32)
            }),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Release group named in a title: the text of its first `[...]`, unless
/// that bracket only describes resolution or codec.
pub fn extract_group(title: &str) -> Option<&str> {
    let (_, after) = title.split_once('[')?;
    let (group, _) = after.split_once(']')?;
    if group.is_empty() || NOT_GROUPS.iter().any(|tag| group.contains(tag)) {
        return None;
    }
    Some(group)
}

/// Distinct groups across `items`, sorted.
pub fn extract_groups(items: &[ReleaseItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| extract_group(&item.title))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
