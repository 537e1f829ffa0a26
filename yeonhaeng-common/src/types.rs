//! Archive record types shared between the search engine and the frontend

use serde::{Deserialize, Serialize};

/// One archive search hit taken from a `doc` element of the search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Publication year (`간행년`), e.g. "1791"
    pub publication_year: String,
    /// Article title (`기사명`)
    pub article_title: String,
    /// Literary genre (`문체명`), used as the grouping key
    pub genre_name: String,
    /// Opaque archive identifier (`DCI_s`), e.g. "ITKC_GO_1422A_2004_006_XML"
    pub record_id: String,
    /// Source text of the originating `doc` element, exported verbatim
    pub raw_xml: String,
}

impl SearchRecord {
    /// Build a record from trimmed field values.
    ///
    /// Returns `None` unless every field is present and non-empty after
    /// trimming, so a partial `doc` never becomes a record.
    pub fn from_fields(
        publication_year: Option<&str>,
        article_title: Option<&str>,
        genre_name: Option<&str>,
        record_id: Option<&str>,
        raw_xml: String,
    ) -> Option<Self> {
        let required = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        Some(Self {
            publication_year: required(publication_year)?,
            article_title: required(article_title)?,
            genre_name: required(genre_name)?,
            record_id: required(record_id)?,
            raw_xml,
        })
    }
}
