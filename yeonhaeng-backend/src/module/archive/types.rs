//! Archive search state types

use chrono::{DateTime, Utc};
use yeonhaeng_common::{group_by_genre, nth_in_display_order, GenreGroup, SearchRecord};

use crate::config::StalePolicy;
use super::error::{SearchError, FAILURE_MESSAGE};
use super::request::SearchQuery;

/// Records parsed from one response page
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// When this page was parsed
    pub fetched_at: DateTime<Utc>,
    /// Number of `doc` elements in the response, complete or not
    pub docs_seen: usize,
    /// Complete records in document order
    pub records: Vec<SearchRecord>,
}

/// Identity of one issued request, handed back on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub query: SearchQuery,
}

/// What a completion did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Records were committed (replacing on page 1, appended otherwise)
    Applied { records: usize },
    /// The failure message was committed
    Failed,
    /// The completion belonged to a superseded or abandoned request
    Stale,
}

/// Query state shared by the pipeline and the screen.
///
/// Every mutation goes through the methods below; rendering only reads.
#[derive(Debug, Clone)]
pub struct QueryState {
    pub keyword: String,
    /// 1-based
    pub page: u32,
    /// Arrival order, document order within a page
    pub results: Vec<SearchRecord>,
    /// 1 until the first success, then the configured constant
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,

    next_request: u64,
    latest_request: Option<u64>,
    in_flight: Vec<u64>,
}

impl QueryState {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            loading: false,
            error: None,
            updated_at: None,
            next_request: 1,
            latest_request: None,
            in_flight: Vec::new(),
        }
    }

    /// Keyword edit: results are cleared and paging restarts.
    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
        self.reset_results();
    }

    /// Fresh search on the current keyword.
    pub fn reset_results(&mut self) {
        self.results.clear();
        self.page = 1;
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Move to `page`, clamped to `[1, total_pages]`. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let target = page.clamp(1, self.total_pages.max(1));
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn go_prev(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn go_next(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    /// Pagination controls are only shown once more than one page is known
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Issue a request for the current (keyword, page).
    pub fn begin(&mut self) -> RequestTicket {
        let id = self.next_request;
        self.next_request += 1;
        self.latest_request = Some(id);
        self.in_flight.push(id);
        self.loading = true;
        self.error = None;

        RequestTicket {
            id,
            query: SearchQuery::new(self.keyword.clone(), self.page),
        }
    }

    pub fn latest_request(&self) -> Option<u64> {
        self.latest_request
    }

    pub fn in_flight(&self) -> &[u64] {
        &self.in_flight
    }

    /// Commit the outcome of a request.
    ///
    /// The ticket's own page decides replace-or-append, not the current page.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<SearchPage, &SearchError>,
        policy: StalePolicy,
        total_pages: u32,
    ) -> Commit {
        if !self.release(ticket.id) {
            return Commit::Stale;
        }
        if policy == StalePolicy::LatestOnly && self.latest_request != Some(ticket.id) {
            return Commit::Stale;
        }

        match outcome {
            Ok(page) => {
                let added = page.records.len();
                if ticket.query.page == 1 {
                    self.results = page.records;
                } else {
                    self.results.extend(page.records);
                }
                self.total_pages = total_pages.max(1);
                self.updated_at = Some(page.fetched_at);
                Commit::Applied { records: added }
            }
            Err(_) => {
                self.error = Some(FAILURE_MESSAGE.to_string());
                Commit::Failed
            }
        }
    }

    /// Forget a request that will never complete. Results and error are untouched.
    pub fn abandon(&mut self, id: u64) -> bool {
        self.release(id)
    }

    fn release(&mut self, id: u64) -> bool {
        let Some(pos) = self.in_flight.iter().position(|&r| r == id) else {
            return false;
        };
        self.in_flight.remove(pos);
        self.loading = !self.in_flight.is_empty();
        true
    }

    pub fn grouped(&self) -> Vec<GenreGroup<'_>> {
        group_by_genre(&self.results)
    }

    /// Record shown as number `n` (1-based) on screen
    pub fn record(&self, n: usize) -> Option<&SearchRecord> {
        nth_in_display_order(&self.results, n)
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, genre: &str) -> SearchRecord {
        SearchRecord {
            publication_year: "1791".into(),
            article_title: format!("title {}", id),
            genre_name: genre.into(),
            record_id: id.into(),
            raw_xml: format!("<doc>{}</doc>", id),
        }
    }

    fn page(ids: &[&str]) -> SearchPage {
        SearchPage {
            fetched_at: Utc::now(),
            docs_seen: ids.len(),
            records: ids.iter().map(|id| rec(id, "日記")).collect(),
        }
    }

    fn ids(state: &QueryState) -> Vec<&str> {
        state.results.iter().map(|r| r.record_id.as_str()).collect()
    }

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let mut state = QueryState::new("馬");
        state.error = Some("old".into());
        let ticket = state.begin();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert_eq!(ticket.query, SearchQuery::new("馬", 1));
        assert_eq!(state.latest_request(), Some(ticket.id));
    }

    #[test]
    fn test_page_one_replaces_later_pages_append() {
        let mut state = QueryState::new("馬");
        let t1 = state.begin();
        state.complete(&t1, Ok(page(&["a", "b"])), StalePolicy::LastWriteWins, 5);
        assert_eq!(ids(&state), vec!["a", "b"]);
        assert_eq!(state.total_pages, 5);

        assert!(state.go_next());
        let t2 = state.begin();
        let commit = state.complete(&t2, Ok(page(&["c"])), StalePolicy::LastWriteWins, 5);
        assert_eq!(commit, Commit::Applied { records: 1 });
        assert_eq!(ids(&state), vec!["a", "b", "c"]);

        assert!(state.go_to_page(1));
        let t3 = state.begin();
        state.complete(&t3, Ok(page(&["x"])), StalePolicy::LastWriteWins, 5);
        assert_eq!(ids(&state), vec!["x"]);
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_keeps_results() {
        let mut state = QueryState::new("馬");
        let t1 = state.begin();
        state.complete(&t1, Ok(page(&["a"])), StalePolicy::LastWriteWins, 5);

        let t2 = state.begin();
        let err = SearchError::Status { status: 503, url: "relay".into() };
        let commit = state.complete(&t2, Err(&err), StalePolicy::LastWriteWins, 5);
        assert_eq!(commit, Commit::Failed);
        assert_eq!(state.error.as_deref(), Some(FAILURE_MESSAGE));
        assert_eq!(ids(&state), vec!["a"]);
        assert!(!state.loading);
    }

    #[test]
    fn test_last_write_wins_commits_out_of_order() {
        let mut state = QueryState::new("馬");
        let first = state.begin();
        state.set_keyword("山");
        let second = state.begin();

        state.complete(&second, Ok(page(&["new"])), StalePolicy::LastWriteWins, 5);
        assert!(state.loading);
        state.complete(&first, Ok(page(&["old"])), StalePolicy::LastWriteWins, 5);
        assert_eq!(ids(&state), vec!["old"]);
        assert!(!state.loading);
    }

    #[test]
    fn test_latest_only_ignores_superseded() {
        let mut state = QueryState::new("馬");
        let first = state.begin();
        state.set_keyword("山");
        let second = state.begin();

        state.complete(&second, Ok(page(&["new"])), StalePolicy::LatestOnly, 5);
        let commit = state.complete(&first, Ok(page(&["old"])), StalePolicy::LatestOnly, 5);
        assert_eq!(commit, Commit::Stale);
        assert_eq!(ids(&state), vec!["new"]);
        assert!(!state.loading);
    }

    #[test]
    fn test_abandon_releases_request() {
        let mut state = QueryState::new("馬");
        let ticket = state.begin();
        assert!(state.abandon(ticket.id));
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.abandon(ticket.id));

        // A late completion of an abandoned request changes nothing
        let commit = state.complete(&ticket, Ok(page(&["late"])), StalePolicy::LastWriteWins, 5);
        assert_eq!(commit, Commit::Stale);
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_paging_bounds() {
        let mut state = QueryState::new("馬");
        assert!(!state.show_pagination());
        assert!(!state.go_next());
        assert!(!state.go_prev());

        state.total_pages = 5;
        assert!(state.show_pagination());
        assert!(!state.can_go_prev());
        assert!(state.go_to_page(9));
        assert_eq!(state.page, 5);
        assert!(!state.can_go_next());
        assert!(!state.go_next());
        assert!(state.go_prev());
        assert_eq!(state.page, 4);
    }

    #[test]
    fn test_set_keyword_clears_and_resets_page() {
        let mut state = QueryState::new("馬");
        state.results = vec![rec("a", "日記")];
        state.total_pages = 5;
        state.page = 3;
        state.set_keyword("山");
        assert_eq!(state.keyword, "山");
        assert_eq!(state.page, 1);
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_record_numbering_follows_groups() {
        let mut state = QueryState::new("馬");
        state.results = vec![rec("a", "日記"), rec("b", "詩"), rec("c", "日記")];
        assert_eq!(state.record(2).unwrap().record_id, "c");
        assert_eq!(state.record(3).unwrap().record_id, "b");
        assert_eq!(state.grouped().len(), 2);
    }
}
