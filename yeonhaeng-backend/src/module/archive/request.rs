//! Search request construction
//!
//! The archive API cannot be read cross-origin, so every request goes through
//! a relay that takes the full upstream URL as one percent-encoded parameter.

use crate::config::ArchiveConfig;

/// Marker the search API uses between a directive name and its value
const DIRECTIVE_SEP: char = '†';

/// One (keyword, page) pair to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    /// 1-based
    pub page: u32,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, page: u32) -> Self {
        Self {
            keyword: keyword.into(),
            page: page.max(1),
        }
    }

    /// Query string understood by the archive search endpoint.
    ///
    /// The keyword is embedded as-is; encoding happens once, when the whole
    /// upstream URL is wrapped for the relay.
    pub fn query_string(&self, corpus_scope: &str) -> String {
        format!(
            "q=query{sep}{}$opDir{sep}{}&page={}",
            self.keyword,
            corpus_scope,
            self.page,
            sep = DIRECTIVE_SEP
        )
    }

    pub fn upstream_url(&self, config: &ArchiveConfig) -> String {
        format!("{}?{}", config.search_url, self.query_string(&config.corpus_scope))
    }

    /// Relay URL carrying the encoded upstream URL.
    pub fn relay_url(&self, config: &ArchiveConfig) -> String {
        format!(
            "{}{}",
            config.relay_url,
            urlencoding::encode(&self.upstream_url(config))
        )
    }
}
