//! Archive search XML parser
//!
//! Walks the response with a pull parser, collects the four named `field`
//! values of every `doc` element and keeps the exact source slice of the
//! element for export. Malformed input degrades to an empty page.

use chrono::Utc;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};
use yeonhaeng_common::SearchRecord;

use super::error::SearchError;
use super::types::SearchPage;

const DOC_TAG: &[u8] = b"doc";
const FIELD_TAG: &[u8] = b"field";
const NAME_ATTR: &[u8] = b"name";

/// `field` names read from each `doc`, in `SearchRecord` field order
pub const FIELD_NAMES: [&str; 4] = ["간행년", "기사명", "문체명", "DCI_s"];

/// Text being collected for one `field` element
struct ActiveField {
    slot: usize,
    /// Depth inside the doc at which the field was opened
    depth: usize,
    text: String,
}

/// Parse state for the `doc` element currently open
struct DocCapture {
    start: usize,
    depth: usize,
    values: [Option<String>; 4],
    active: Option<ActiveField>,
}

impl DocCapture {
    fn new(start: usize) -> Self {
        Self {
            start,
            depth: 0,
            values: Default::default(),
            active: None,
        }
    }

    /// Slot for a `field` element whose value has not been seen yet
    fn field_slot(&self, e: &BytesStart<'_>) -> Result<Option<usize>, SearchError> {
        if e.name().as_ref() != FIELD_TAG || self.active.is_some() {
            return Ok(None);
        }
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.as_ref() != NAME_ATTR {
                continue;
            }
            let name = attr.unescape_value()?;
            let slot = FIELD_NAMES.iter().position(|n| *n == name);
            return Ok(slot.filter(|&i| self.values[i].is_none()));
        }
        Ok(None)
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), SearchError> {
        self.depth += 1;
        if let Some(slot) = self.field_slot(e)? {
            self.active = Some(ActiveField { slot, depth: self.depth, text: String::new() });
        }
        Ok(())
    }

    fn empty(&mut self, e: &BytesStart<'_>) -> Result<(), SearchError> {
        if let Some(slot) = self.field_slot(e)? {
            self.values[slot] = Some(String::new());
        }
        Ok(())
    }

    fn close(&mut self) {
        let depth = self.depth;
        if let Some(active) = self.active.take_if(|a| a.depth == depth) {
            self.values[active.slot] = Some(active.text);
        }
        self.depth -= 1;
    }

    fn text(&mut self, text: &str) {
        if let Some(active) = &mut self.active {
            active.text.push_str(text);
        }
    }

    fn finish(self, raw_xml: &str) -> Option<SearchRecord> {
        let [year, title, genre, id] = &self.values;
        SearchRecord::from_fields(
            year.as_deref(),
            title.as_deref(),
            genre.as_deref(),
            id.as_deref(),
            raw_xml.to_string(),
        )
    }
}

/// Parse one search response page.
///
/// Every `doc` is visited in document order; a `doc` missing any of the four
/// fields is dropped. A response that is not well-formed XML yields a page
/// with no records rather than an error, so only transport failures reach the
/// error banner.
pub fn parse_search_response(xml: &str) -> SearchPage {
    let (docs_seen, records) = match collect_records(xml) {
        Ok(found) => found,
        Err(e) => {
            warn!("Search response is not well-formed, no records kept: {}", e);
            (0, Vec::new())
        }
    };

    SearchPage {
        fetched_at: Utc::now(),
        docs_seen,
        records,
    }
}

fn collect_records(xml: &str) -> Result<(usize, Vec<SearchRecord>), SearchError> {
    let mut reader = Reader::from_str(xml);
    let mut current: Option<DocCapture> = None;
    let mut docs_seen = 0usize;
    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(doc) = current.as_mut() {
                    doc.open(&e)?;
                } else if e.name().as_ref() == DOC_TAG {
                    // '<' cannot appear unescaped inside a tag, so the last one
                    // before the tag end opens this element
                    let tag_end = reader.buffer_position() as usize;
                    let start = xml[..tag_end].rfind('<').unwrap_or(0);
                    current = Some(DocCapture::new(start));
                }
            }
            Event::Empty(e) => {
                if let Some(doc) = current.as_mut() {
                    doc.empty(&e)?;
                } else if e.name().as_ref() == DOC_TAG {
                    // A self-closing doc has no fields
                    docs_seen += 1;
                    debug!("Dropping empty <doc/> before byte {}", reader.buffer_position());
                }
            }
            Event::End(_) => match current.take() {
                Some(mut doc) if doc.depth > 0 => {
                    doc.close();
                    current = Some(doc);
                }
                Some(doc) => {
                    let end = reader.buffer_position() as usize;
                    let doc_start = doc.start;
                    docs_seen += 1;
                    match doc.finish(&xml[doc_start..end]) {
                        Some(record) => records.push(record),
                        None => debug!("Dropping incomplete <doc> at byte {}", doc_start),
                    }
                }
                None => {}
            },
            Event::Text(t) => {
                if let Some(doc) = current.as_mut().filter(|d| d.active.is_some()) {
                    doc.text(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(doc) = current.as_mut() {
                    doc.text(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(SearchError::UnterminatedDoc);
    }
    Ok((docs_seen, records))
}
