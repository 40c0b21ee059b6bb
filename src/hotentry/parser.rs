//! Payload decoding for the two upstream endpoints.
//!
//! The primary endpoint returns a JSON array of entry objects; the fallback
//! is an RDF/RSS 1.0 document whose bookmark counts live in a vendor
//! namespace.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{HotentryError, Result};
use crate::hotentry::types::{Entry, NO_DESCRIPTION, UNTITLED};

/// RSS 1.0 namespace.
pub const RSS_NS: &[u8] = b"http://purl.org/rss/1.0/";

/// Dublin Core namespace.
pub const DC_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";

/// Hatena vendor namespace (bookmark counts).
pub const HATENA_NS: &[u8] = b"http://www.hatena.ne.jp/info/xmlns#";

/// One object of the JSON payload.
#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, alias = "link", deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    count: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
}

impl From<ApiEntry> for Entry {
    fn from(api: ApiEntry) -> Self {
        Entry {
            title: api.title.unwrap_or_else(|| UNTITLED.to_string()),
            url: api.url.unwrap_or_default(),
            description: api.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            count: api.count,
            date: api.date.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Strings, and numbers rendered as strings. Anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Bookmark counts arrive as numbers or numeric strings; anything else is 0.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_from_value(&Value::deserialize(deserializer)?))
}

fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => parse_count(s),
        _ => 0,
    }
}

/// Parse a bookmark count, treating anything unparseable as 0.
pub fn parse_count(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

/// Decode the primary endpoint's JSON payload.
pub fn parse_api_json(bytes: &[u8]) -> Result<Vec<Entry>> {
    let entries: Vec<ApiEntry> = serde_json::from_slice(bytes)?;
    Ok(entries.into_iter().map(Entry::from).collect())
}

/// Elements of interest in the RDF feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Item,
    Title,
    Link,
    Description,
    Date,
    BookmarkCount,
    Other,
}

fn classify(ns: &ResolveResult, local: &[u8]) -> Field {
    let uri = match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri,
        _ => return Field::Other,
    };

    if uri == RSS_NS {
        match local {
            b"item" => Field::Item,
            b"title" => Field::Title,
            b"link" => Field::Link,
            b"description" => Field::Description,
            _ => Field::Other,
        }
    } else if uri == DC_NS && local == b"date" {
        Field::Date
    } else if uri == HATENA_NS && local == b"bookmarkcount" {
        Field::BookmarkCount
    } else {
        Field::Other
    }
}

/// Fields collected for the `<item>` being read.
#[derive(Debug, Default)]
struct ItemBuilder {
    depth: usize,
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    date: Option<String>,
    bookmark_count: Option<String>,
}

impl ItemBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Whether `field` at element depth `depth` is one we capture.
    fn accepts(&self, field: Field, depth: usize) -> bool {
        match field {
            Field::Title | Field::Link | Field::Description | Field::Date => {
                depth == self.depth + 1
            }
            Field::BookmarkCount => depth > self.depth,
            Field::Item | Field::Other => false,
        }
    }

    /// Record a field value; the first occurrence wins.
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::Date => &mut self.date,
            Field::BookmarkCount => &mut self.bookmark_count,
            Field::Item | Field::Other => return,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    fn build(self, index: usize) -> Result<Entry> {
        let missing =
            |name: &str| HotentryError::Parse(format!("item {index} is missing <{name}>"));

        Ok(Entry {
            title: self.title.ok_or_else(|| missing("title"))?,
            url: self.link.ok_or_else(|| missing("link"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            count: self.bookmark_count.as_deref().map_or(0, parse_count),
            date: self.date.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Decode the fallback RDF/RSS 1.0 feed.
///
/// Every `<item>` must carry `title`, `link` and `description`; a missing
/// one fails the whole document. `dc:date` and `hatena:bookmarkcount` are
/// optional.
pub fn parse_rdf_feed(xml: &[u8]) -> Result<Vec<Entry>> {
    // Text is kept untrimmed; only text inside captured fields is collected
    let mut reader = NsReader::from_reader(xml);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut item: Option<ItemBuilder> = None;
    // Field being captured, the depth it opened at, and its text so far.
    let mut capture: Option<(Field, usize, String)> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| HotentryError::Parse(format!("invalid XML: {e}")))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let field = classify(&ns, e.local_name().as_ref());

                match item.as_ref() {
                    None if field == Field::Item => item = Some(ItemBuilder::new(depth)),
                    Some(builder) if capture.is_none() && builder.accepts(field, depth) => {
                        capture = Some((field, depth, String::new()));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let field = classify(&ns, e.local_name().as_ref());
                // `<item/>` has no children, so its first required field is missing
                if item.is_none() && field == Field::Item {
                    ItemBuilder::new(depth + 1).build(entries.len())?;
                }
                if let Some(builder) = item.as_mut() {
                    if capture.is_none() && builder.accepts(field, depth + 1) {
                        builder.set(field, String::new());
                    }
                }
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| HotentryError::Parse(format!("invalid XML text: {e}")))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|(_, d, _)| *d == depth) {
                    if let (Some((field, _, text)), Some(builder)) = (capture.take(), item.as_mut())
                    {
                        builder.set(field, text);
                    }
                } else if item.as_ref().is_some_and(|b| b.depth == depth) {
                    if let Some(builder) = item.take() {
                        entries.push(builder.build(entries.len())?);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF
  xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:content="http://purl.org/rss/1.0/modules/content/"
  xmlns:dc="http://purl.org/dc/elements/1.1/"
  xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <channel rdf:about="https://b.hatena.ne.jp/hotentry">
    <title>はてなブックマーク - 人気エントリー</title>
    <link>https://b.hatena.ne.jp/hotentry</link>
    <description>人気エントリー</description>
  </channel>
  <item rdf:about="https://example.com/a">
    <title>A &amp; B</title>
    <link>https://example.com/a</link>
    <description>first &lt;entry&gt;</description>
    <content:encoded><![CDATA[<p>ignored</p>]]></content:encoded>
    <dc:date>2024-01-15T19:30:00+09:00</dc:date>
    <hatena:bookmarkcount>321</hatena:bookmarkcount>
  </item>
  <item rdf:about="https://example.com/b">
    <title>Second</title>
    <link>https://example.com/b</link>
    <description><![CDATA[raw <b>markup</b>]]></description>
  </item>
</rdf:RDF>"#;

    #[test]
    fn test_parse_rdf_feed() {
        let entries = parse_rdf_feed(SAMPLE_RDF.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "A & B");
        assert_eq!(entries[0].url, "https://example.com/a");
        assert_eq!(entries[0].description, "first <entry>");
        assert_eq!(entries[0].date.as_deref(), Some("2024-01-15T19:30:00+09:00"));
        assert_eq!(entries[0].count, 321);

        assert_eq!(entries[1].title, "Second");
        assert_eq!(entries[1].description, "raw <b>markup</b>");
        assert_eq!(entries[1].count, 0);
        assert!(entries[1].date.is_none());
    }

    #[test]
    fn test_parse_rdf_channel_fields_not_mistaken_for_items() {
        let entries = parse_rdf_feed(SAMPLE_RDF.as_bytes()).unwrap();
        assert!(entries.iter().all(|e| e.url != "https://b.hatena.ne.jp/hotentry"));
    }

    #[test]
    fn test_parse_rdf_missing_required_field() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <item rdf:about="x">
    <title>No link</title>
    <description>d</description>
  </item>
</rdf:RDF>"#;

        let err = parse_rdf_feed(rdf.as_bytes()).unwrap_err();
        assert!(matches!(err, HotentryError::Parse(_)));
        assert!(err.to_string().contains("<link>"));
    }

    #[test]
    fn test_parse_rdf_self_closing_item_fails() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <item rdf:about="a">
    <title>t</title>
    <link>l</link>
    <description>d</description>
  </item>
  <item rdf:about="b"/>
</rdf:RDF>"#;

        let err = parse_rdf_feed(rdf.as_bytes()).unwrap_err();
        assert!(matches!(err, HotentryError::Parse(_)));
        assert!(err.to_string().contains("item 1 is missing <title>"));
    }

    #[test]
    fn test_parse_rdf_keeps_surrounding_whitespace() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <item rdf:about="a">
    <title>  padded title </title>
    <link>l</link>
    <description>
d
</description>
  </item>
</rdf:RDF>"#;

        let entries = parse_rdf_feed(rdf.as_bytes()).unwrap();
        assert_eq!(entries[0].title, "  padded title ");
        assert_eq!(entries[0].description, "\nd\n");
    }

    #[test]
    fn test_parse_rdf_wrong_namespace_is_ignored() {
        let rdf = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item><title>t</title><link>l</link><description>d</description></item>
  </channel>
</rss>"#;

        assert!(parse_rdf_feed(rdf.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rdf_unparseable_count() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
  xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
  xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <item rdf:about="x">
    <title>t</title><link>l</link><description/>
    <hatena:bookmarkcount>lots</hatena:bookmarkcount>
  </item>
</rdf:RDF>"#;

        let entries = parse_rdf_feed(rdf.as_bytes()).unwrap();
        assert_eq!(entries[0].count, 0);
        assert_eq!(entries[0].description, "");
    }

    #[test]
    fn test_parse_rdf_malformed() {
        let err = parse_rdf_feed(b"<rdf:RDF><item></rdf:RDF>").unwrap_err();
        assert!(matches!(err, HotentryError::Parse(_)));
    }

    #[test]
    fn test_parse_api_json() {
        let json = r#"[
            {"title": "X", "url": "http://x", "count": 150, "description": "d", "date": "2024-01-15 10:30:00"},
            {"title": "Y", "link": "http://y", "count": "50"},
            {"count": null}
        ]"#;

        let entries = parse_api_json(json.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].title, "X");
        assert_eq!(entries[0].url, "http://x");
        assert_eq!(entries[0].count, 150);
        assert_eq!(entries[0].date.as_deref(), Some("2024-01-15 10:30:00"));

        assert_eq!(entries[1].url, "http://y");
        assert_eq!(entries[1].count, 50);
        assert_eq!(entries[1].description, NO_DESCRIPTION);

        assert_eq!(entries[2].title, UNTITLED);
        assert_eq!(entries[2].url, "");
        assert_eq!(entries[2].count, 0);
    }

    #[test]
    fn test_parse_api_json_not_an_array() {
        let err = parse_api_json(br#"{"entries": []}"#).unwrap_err();
        assert!(matches!(err, HotentryError::Parse(_)));
    }

    #[test]
    fn test_count_from_value() {
        assert_eq!(count_from_value(&serde_json::json!(12)), 12);
        assert_eq!(count_from_value(&serde_json::json!(-3)), 0);
        assert_eq!(count_from_value(&serde_json::json!(7.9)), 7);
        assert_eq!(count_from_value(&serde_json::json!(" 40 ")), 40);
        assert_eq!(count_from_value(&serde_json::json!("many")), 0);
        assert_eq!(count_from_value(&serde_json::json!([1])), 0);
    }
}
