use feed_rs::model::Entry;
use feed_rs::parser;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// A single feed entry, reduced to the fields the search works on.
///
/// Missing fields are empty strings, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Outcome of a best-effort parse.
///
/// `well_formed` is diagnostic only: a malformed document still yields every
/// entry that could be recovered before the first unrecoverable error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    pub entries: Vec<FeedEntry>,
    pub well_formed: bool,
}

/// Parses RSS/Atom bytes into entries, in document order.
///
/// The strict `feed-rs` parser is tried first. If it rejects the document, a
/// lenient XML scan recovers whatever `<item>`/`<entry>` elements precede
/// the damage and the result is flagged as not well-formed. This function
/// never fails; a document with nothing recoverable yields no entries.
pub fn parse_feed(bytes: &[u8]) -> ParsedFeed {
    match parser::parse(bytes) {
        Ok(feed) => ParsedFeed {
            entries: feed.entries.into_iter().map(entry_from_model).collect(),
            well_formed: true,
        },
        Err(e) => {
            tracing::debug!(error = %e, "Strict feed parse failed, recovering entries leniently");
            ParsedFeed {
                entries: recover_entries(bytes),
                well_formed: false,
            }
        }
    }
}

fn entry_from_model(entry: Entry) -> FeedEntry {
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default();

    // YouTube puts the video description under media:group
    let media_description = entry
        .media
        .iter()
        .find_map(|m| m.description.as_ref().map(|d| d.content.clone()));

    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .or(media_description)
        .unwrap_or_default();

    FeedEntry {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        link,
        description,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Summary,
    Content,
    MediaDescription,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" | b"atom:link" => Some(Self::Link),
            b"description" | b"summary" => Some(Self::Summary),
            b"content" | b"content:encoded" => Some(Self::Content),
            b"media:description" => Some(Self::MediaDescription),
            _ => None,
        }
    }
}

/// Fields collected for one entry during the lenient scan.
/// The first occurrence of each field wins.
#[derive(Debug, Default)]
struct EntryBuilder {
    title: Option<String>,
    link_text: Option<String>,
    alternate_href: Option<String>,
    other_href: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    media_description: Option<String>,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link_text,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
            Field::MediaDescription => &mut self.media_description,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value);
        }
    }

    /// Records the `href` of an Atom-style `<link>` element.
    fn add_href(&mut self, start: &BytesStart<'_>) {
        let mut href = None;
        let mut rel = None;
        for attr in start.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            match attr.key.local_name().as_ref() {
                b"href" => href = Some(value),
                b"rel" => rel = Some(value),
                _ => {}
            }
        }

        let Some(href) = href else { return };
        let slot = match rel.as_deref() {
            None | Some("alternate") => &mut self.alternate_href,
            Some(_) => &mut self.other_href,
        };
        if slot.is_none() {
            *slot = Some(href);
        }
    }

    fn has_content(&self) -> bool {
        self.title.is_some()
            || self.link_text.is_some()
            || self.alternate_href.is_some()
            || self.other_href.is_some()
            || self.summary.is_some()
            || self.content.is_some()
            || self.media_description.is_some()
    }

    /// Stores a still-open field, then finishes the entry.
    fn finish_with(mut self, capture: Option<(Field, String)>) -> FeedEntry {
        if let Some((field, acc)) = capture {
            self.set(field, acc.trim().to_string());
        }
        self.finish()
    }

    fn finish(self) -> FeedEntry {
        FeedEntry {
            title: self.title.unwrap_or_default(),
            link: self
                .link_text
                .or(self.alternate_href)
                .or(self.other_href)
                .unwrap_or_default(),
            description: self
                .summary
                .or(self.content)
                .or(self.media_description)
                .unwrap_or_default(),
        }
    }
}

/// Lenient event scan used when the strict parser gives up.
///
/// Fields and entries are closed by element name rather than nesting depth,
/// so stray unclosed tags (`<br>` in a description) cannot merge entries. A
/// new `<item>`/`<entry>` also closes one still open. Stops at the first XML
/// error or EOF; a trailing entry cut off mid-way is kept if any of its
/// fields were read.
fn recover_entries(bytes: &[u8]) -> Vec<FeedEntry> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().check_end_names = false;

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    // (field being read, accumulated text)
    let mut capture: Option<(Field, String)> = None;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    position = reader.error_position(),
                    error = %e,
                    recovered = entries.len(),
                    "Lenient feed scan stopped at XML error"
                );
                break;
            }
        };

        match event {
            Event::Start(start) => {
                if is_entry_element(start.local_name().as_ref()) {
                    if let Some(builder) = current.take() {
                        entries.push(builder.finish_with(capture.take()));
                    }
                    capture = None;
                    current = Some(EntryBuilder::default());
                } else if let Some(builder) = current.as_mut() {
                    if capture.is_none() {
                        if let Some(field) = Field::from_name(start.name().as_ref()) {
                            if field == Field::Link {
                                builder.add_href(&start);
                            }
                            capture = Some((field, String::new()));
                        }
                    }
                }
            }
            Event::Empty(start) => {
                if let Some(builder) = current.as_mut() {
                    if Field::from_name(start.name().as_ref()) == Some(Field::Link) {
                        builder.add_href(&start);
                    }
                }
            }
            Event::Text(text) => {
                if let Some((_, acc)) = capture.as_mut() {
                    match text.unescape() {
                        Ok(s) => acc.push_str(&s),
                        Err(_) => acc.push_str(&String::from_utf8_lossy(&text)),
                    }
                }
            }
            Event::CData(data) => {
                if let Some((_, acc)) = capture.as_mut() {
                    acc.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(end) => {
                if is_entry_element(end.local_name().as_ref()) {
                    if let Some(builder) = current.take() {
                        entries.push(builder.finish_with(capture.take()));
                    }
                    capture = None;
                } else if let Some(builder) = current.as_mut() {
                    let closing = Field::from_name(end.name().as_ref());
                    if closing.is_some() && capture.as_ref().map(|(field, _)| *field) == closing {
                        if let Some((field, acc)) = capture.take() {
                            builder.set(field, acc.trim().to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(mut builder) = current {
        if let Some((field, acc)) = capture {
            builder.set(field, acc.trim().to_string());
        }
        if builder.has_content() {
            entries.push(builder.finish());
        }
    }

    entries
}

fn is_entry_element(local_name: &[u8]) -> bool {
    matches!(local_name, b"item" | b"entry")
}
