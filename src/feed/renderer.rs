//! RSS 2.0 feed renderer.
//!
//! Builds the document with `quick_xml::Writer` so element text and
//! attributes are always escaped. Item bodies are HTML-escaped and then
//! wrapped in CDATA, which keeps `]]>` out of every CDATA section.

use std::borrow::Cow;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::datetime::{format_rfc822, rfc822_or};
use crate::error::{HotentryError, Result};
use crate::hotentry::Entry;

/// Default channel `<ttl>` in minutes.
pub const DEFAULT_TTL_MINUTES: u32 = 5;

const GENERATOR: &str = "Hatena Bookmark RSS Generator";
const LANGUAGE: &str = "ja";

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Served when even the error feed cannot be written.
pub const STATIC_ERROR_FEED: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<rss version=\"2.0\"><channel><title>Error</title>\
<description>フィードの生成中にエラーが発生しました</description></channel></rss>";

/// Channel-level inputs for one rendered feed.
#[derive(Debug, Clone)]
pub struct FeedChannel {
    /// Minimum bookmark count shown in the feed.
    pub threshold: i64,
    /// URL of this feed (the atom `self` link).
    pub self_url: String,
    /// Site root (the channel `<link>`).
    pub site_url: String,
    /// Channel `<ttl>` in minutes.
    pub ttl_minutes: u32,
}

impl FeedChannel {
    /// Create channel metadata with the default TTL.
    pub fn new(threshold: i64, self_url: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            threshold,
            self_url: self_url.into(),
            site_url: site_url.into(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }

    /// Set the TTL.
    pub fn with_ttl(mut self, ttl_minutes: u32) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    fn title(&self) -> String {
        format!("Hatena Hotentry (Threshold: {})", self.threshold)
    }

    fn description(&self) -> String {
        format!(
            "はてなブックマークの人気エントリー（{}ブックマーク以上）",
            self.threshold
        )
    }
}

/// Render `entries` as an RSS 2.0 document stamped with the current time.
///
/// Entries are written as given; filtering by threshold is the caller's job.
pub fn render_feed(entries: &[Entry], channel: &FeedChannel) -> Result<String> {
    render_feed_at(entries, channel, &Utc::now())
}

/// Render `entries` with an explicit build time.
///
/// `now` is used for `lastBuildDate` and for items without a usable date.
pub fn render_feed_at(entries: &[Entry], channel: &FeedChannel, now: &DateTime<Utc>) -> Result<String> {
    let mut w = RssWriter::new();
    w.declaration()?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:content", CONTENT_NS));
    rss.push_attribute(("xmlns:dc", DC_NS));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    w.start(rss)?;
    w.start(BytesStart::new("channel"))?;

    w.text_element("title", &channel.title())?;
    w.text_element("link", &channel.site_url)?;
    w.text_element("description", &channel.description())?;
    w.text_element("language", LANGUAGE)?;
    w.text_element("lastBuildDate", &format_rfc822(now))?;

    let self_url = xml_safe(&channel.self_url);
    let mut atom_link = BytesStart::new("atom:link");
    atom_link.push_attribute(("href", &*self_url));
    atom_link.push_attribute(("rel", "self"));
    atom_link.push_attribute(("type", "application/rss+xml"));
    w.empty(atom_link)?;

    w.text_element("generator", GENERATOR)?;
    w.text_element("ttl", &channel.ttl_minutes.to_string())?;

    for entry in entries {
        write_item(&mut w, entry, now)?;
    }

    w.end("channel")?;
    w.end("rss")?;
    w.finish()
}

fn write_item(w: &mut RssWriter, entry: &Entry, now: &DateTime<Utc>) -> Result<()> {
    let body = item_body(entry);

    w.start(BytesStart::new("item"))?;
    w.text_element("title", &entry.title)?;
    w.text_element("link", &entry.url)?;

    let mut guid_start = BytesStart::new("guid");
    guid_start.push_attribute(("isPermaLink", "false"));
    w.start(guid_start)?;
    w.text(&entry.guid())?;
    w.end("guid")?;

    w.cdata_element("description", &body)?;
    w.text_element("pubDate", &rfc822_or(entry.date.as_deref(), now))?;
    w.cdata_element("content:encoded", &body)?;
    w.end("item")
}

/// Escaped description followed by the bookmark count line.
fn item_body(entry: &Entry) -> String {
    let description = xml_safe(&entry.description);
    format!(
        "{}<br/><br/>ブックマーク数: {}",
        escape(&*description),
        entry.count
    )
}

/// Render the feed served when fetching or rendering fails.
pub fn render_error_feed(message: &str) -> Result<String> {
    let mut w = RssWriter::new();
    w.declaration()?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    w.start(rss)?;
    w.start(BytesStart::new("channel"))?;
    w.text_element("title", "Error")?;
    w.text_element("description", "フィードの生成中にエラーが発生しました")?;

    w.start(BytesStart::new("item"))?;
    w.text_element("title", "エラーが発生しました")?;
    w.text_element("description", message)?;
    w.end("item")?;

    w.end("channel")?;
    w.end("rss")?;
    w.finish()
}

/// Drop characters that XML 1.0 does not allow anywhere in a document.
fn xml_safe(s: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c,
            '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}')
    }

    if s.chars().all(allowed) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().filter(|c| allowed(*c)).collect())
    }
}

/// Thin wrapper over `quick_xml::Writer` mapping write errors.
struct RssWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl RssWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| HotentryError::Render(e.to_string()))
    }

    fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.write(Event::Start(start))
    }

    fn empty(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.write(Event::Empty(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.write(Event::Text(BytesText::new(&xml_safe(text))))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.text(text)?;
        self.end(name)
    }

    fn cdata_element(&mut self, name: &str, body: &str) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.write(Event::CData(BytesCData::new(body)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        let bytes = self.inner.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| HotentryError::Render(e.to_string()))
    }
}
