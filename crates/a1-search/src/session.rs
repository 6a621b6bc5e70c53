//! Search session: the state machine that drives the pipeline.
//!
//! A [`SearchSession`] moves between [`SessionState`]s:
//!
//! ```text
//! Idle ──begin──▶ Searching ──complete(ok)──▶ Ready
//!   ▲                 │  ▲                      │
//!   │                 │  └──────begin───────────┘
//!   │           complete(err)
//!   │                 ▼
//!   └──acknowledge── Failed
//! ```
//!
//! Every [`begin`](SearchSession::begin) issues a fresh [`Ticket`]. Only the
//! latest ticket may complete; results for older tickets are dropped, so the
//! last query always wins.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::page::{Page, PageRequest};
use crate::query::Query;
use crate::record::Record;
use crate::traits::Searchable;

/// Identifies one search request within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Sequence number of this ticket; later tickets compare greater.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Where a session is in its search lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<T> {
    /// No search has run, or a failure was acknowledged.
    Idle,
    /// A search is in flight.
    Searching {
        /// The only ticket allowed to complete.
        ticket: Ticket,
    },
    /// The latest search produced a page.
    Ready {
        /// The page of results.
        page: Page<T>,
    },
    /// The latest search failed.
    Failed {
        /// What went wrong, for display.
        error: String,
    },
}

/// Supplies the records a session searches.
pub trait RecordSource<T = Record> {
    /// Fetches the full record set.
    fn fetch(&self) -> Result<Vec<T>>;
}

impl<T: Clone> RecordSource<T> for Vec<T> {
    fn fetch(&self) -> Result<Vec<T>> {
        Ok(self.clone())
    }
}

impl<T: Clone> RecordSource<T> for [T] {
    fn fetch(&self) -> Result<Vec<T>> {
        Ok(self.to_vec())
    }
}

/// Holds the state, selection set and highlight cursor of one search view.
#[derive(Debug, Clone)]
pub struct SearchSession<T> {
    state: SessionState<T>,
    issued: u64,
    selection: HashSet<String>,
    highlight: Option<usize>,
}

impl<T> Default for SearchSession<T> {
    fn default() -> Self {
        SearchSession {
            state: SessionState::Idle,
            issued: 0,
            selection: HashSet::new(),
            highlight: None,
        }
    }
}

impl<T> SearchSession<T> {
    /// Creates an idle session with nothing selected.
    pub fn new() -> Self {
        SearchSession::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SessionState<T> {
        &self.state
    }

    /// The current page, when the session is ready.
    pub fn page(&self) -> Option<&Page<T>> {
        match &self.state {
            SessionState::Ready { page } => Some(page),
            _ => None,
        }
    }

    /// Returns `true` while a search is in flight.
    pub fn is_searching(&self) -> bool {
        matches!(self.state, SessionState::Searching { .. })
    }

    /// Starts a new search, superseding any in flight.
    ///
    /// Clears the selection set.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let SessionState::Searching { ticket: previous } = self.state {
            tracing::debug!(
                superseded = previous.0,
                ticket = ticket.0,
                "search superseded"
            );
        }
        self.state = SessionState::Searching { ticket };
        self.selection.clear();
        ticket
    }

    /// Applies the outcome of a search.
    ///
    /// Returns `false` and leaves the session untouched when `ticket` is not
    /// the one currently in flight.
    pub fn complete(&mut self, ticket: Ticket, outcome: std::result::Result<Page<T>, String>) -> bool {
        match self.state {
            SessionState::Searching { ticket: current } if current == ticket => {}
            _ => {
                tracing::debug!(ticket = ticket.0, latest = self.issued, "dropping stale search result");
                return false;
            }
        }

        self.state = match outcome {
            Ok(page) => {
                tracing::debug!(
                    ticket = ticket.0,
                    total_items = page.total_items,
                    page_number = page.page_number,
                    "search ready"
                );
                self.highlight = (!page.items.is_empty()).then_some(0);
                SessionState::Ready { page }
            }
            Err(error) => {
                tracing::warn!(ticket = ticket.0, %error, "search failed");
                self.highlight = None;
                SessionState::Failed { error }
            }
        };
        true
    }

    /// Returns a failed session to idle. No-op in any other state.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, SessionState::Failed { .. }) {
            self.state = SessionState::Idle;
        }
    }

    /// Clears the selection set for a move to page `page_number`.
    ///
    /// Returns the request to run for that page.
    pub fn change_page(&mut self, request: PageRequest, page_number: usize) -> PageRequest {
        self.selection.clear();
        request.with_page(page_number)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Adds `id` to the selection set.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selection.insert(id.into());
    }

    /// Removes `id` from the selection set, if present.
    pub fn deselect(&mut self, id: &str) {
        self.selection.remove(id);
    }

    /// Flips membership of `id`, returning whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(id.to_string());
            true
        }
    }

    /// Empties the selection set.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// The selected record ids.
    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    // ========================================================================
    // Highlight cursor
    // ========================================================================

    /// Index of the highlighted item on the current page.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// The highlighted item on the current page.
    pub fn highlighted(&self) -> Option<&T> {
        let index = self.highlight?;
        self.page().and_then(|page| page.items.get(index))
    }

    /// Moves the highlight down, wrapping to the top.
    pub fn highlight_next(&mut self) -> Option<usize> {
        let len = self.page().map_or(0, |page| page.items.len());
        self.highlight = match self.highlight {
            _ if len == 0 => None,
            Some(index) => Some((index + 1) % len),
            None => Some(0),
        };
        self.highlight
    }

    /// Moves the highlight up, wrapping to the bottom.
    pub fn highlight_previous(&mut self) -> Option<usize> {
        let len = self.page().map_or(0, |page| page.items.len());
        self.highlight = match self.highlight {
            _ if len == 0 => None,
            Some(0) | None => Some(len - 1),
            Some(index) => Some(index - 1),
        };
        self.highlight
    }
}

impl<T: Searchable + Clone> SearchSession<T> {
    /// Fetches records, runs `query` and completes a fresh ticket in one step.
    ///
    /// A source failure moves the session to [`SessionState::Failed`].
    pub fn run<S>(&mut self, query: &Query, source: &S, request: PageRequest) -> &SessionState<T>
    where
        S: RecordSource<T> + ?Sized,
    {
        self.run_inspecting(query, source, request, |_| ()).0
    }

    /// Like [`run`](SearchSession::run), also handing the fetched records to
    /// `inspect` before they are dropped.
    ///
    /// `inspect` runs only when the fetch succeeds.
    pub fn run_inspecting<S, R, F>(
        &mut self,
        query: &Query,
        source: &S,
        request: PageRequest,
        inspect: F,
    ) -> (&SessionState<T>, Option<R>)
    where
        S: RecordSource<T> + ?Sized,
        F: FnOnce(&[T]) -> R,
    {
        let ticket = self.begin();
        let (outcome, inspected) = match source.fetch() {
            Ok(records) => {
                let page = query.page(&records, T::accessor, request).map(T::clone);
                (Ok(page), Some(inspect(&records)))
            }
            Err(err) => (Err(err.to_string()), None),
        };
        self.complete(ticket, outcome);
        (&self.state, inspected)
    }
}

/// Decides when a changed query should fire.
///
/// Each keystroke is [`touch`](Debounce::touch)ed; the query fires once the
/// input has been quiet for the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    interval: Duration,
    pending: Option<Instant>,
}

impl Debounce {
    /// Quiet period used by the search box.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);

    /// Creates a debouncer with nothing pending.
    pub fn new(interval: Duration) -> Self {
        Debounce {
            interval,
            pending: None,
        }
    }

    /// The quiet period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Records a query change at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.pending = Some(now);
    }

    /// Returns `true` once per change, after the quiet period has elapsed.
    pub fn should_fire(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(changed) if now.saturating_duration_since(changed) >= self.interval => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Debounce::new(Debounce::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::page::paginate;
    use serde_json::json;

    fn records() -> Vec<Record> {
        serde_json::from_value(json!([
            {"id": "p1", "name": "LeBron James", "hotness": 94},
            {"id": "p2", "name": "Stephen Curry", "hotness": 88},
            {"id": "p3", "name": "Jayson Tatum", "hotness": 91}
        ]))
        .unwrap()
    }

    fn page_of(items: Vec<&str>) -> Page<String> {
        let items: Vec<String> = items.into_iter().map(String::from).collect();
        paginate(items, PageRequest::default())
    }

    struct Offline;

    impl RecordSource for Offline {
        fn fetch(&self) -> Result<Vec<Record>> {
            Err(SearchError::Source("feed offline".into()))
        }
    }

    #[test]
    fn starts_idle() {
        let session: SearchSession<String> = SearchSession::new();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.page().is_none());
    }

    #[test]
    fn tickets_increase() {
        let mut session: SearchSession<String> = SearchSession::new();
        let first = session.begin();
        let second = session.begin();
        assert!(second > first);
        assert_eq!(second.sequence(), 2);
        assert!(session.is_searching());
    }

    #[test]
    fn last_query_wins() {
        let mut session = SearchSession::new();
        let stale = session.begin();
        let latest = session.begin();

        assert!(session.complete(latest, Ok(page_of(vec!["latest"]))));
        assert!(!session.complete(stale, Ok(page_of(vec!["stale"]))));
        assert_eq!(session.page().unwrap().items, vec!["latest"]);
    }

    #[test]
    fn stale_result_while_searching_is_ignored() {
        let mut session = SearchSession::new();
        let stale = session.begin();
        let latest = session.begin();
        assert!(!session.complete(stale, Ok(page_of(vec!["stale"]))));
        assert_eq!(session.state(), &SessionState::Searching { ticket: latest });
    }

    #[test]
    fn failure_then_acknowledge() {
        let mut session: SearchSession<String> = SearchSession::new();
        let ticket = session.begin();
        assert!(session.complete(ticket, Err("timeout".into())));
        assert_eq!(
            session.state(),
            &SessionState::Failed {
                error: "timeout".into()
            }
        );
        session.acknowledge();
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn acknowledge_outside_failure_is_noop() {
        let mut session = SearchSession::new();
        let ticket = session.begin();
        session.complete(ticket, Ok(page_of(vec!["a"])));
        session.acknowledge();
        assert!(session.page().is_some());
    }

    #[test]
    fn new_query_and_page_change_clear_selection() {
        let mut session: SearchSession<String> = SearchSession::new();
        session.select("p1");
        session.select("p2");
        assert!(session.is_selected("p1"));
        session.begin();
        assert!(session.selection().is_empty());

        session.select("p3");
        let request = session.change_page(PageRequest::default(), 2);
        assert_eq!(request.page_number(), 2);
        assert!(!session.is_selected("p3"));
    }

    #[test]
    fn toggle_and_deselect() {
        let mut session: SearchSession<String> = SearchSession::new();
        assert!(session.toggle("p1"));
        assert!(session.is_selected("p1"));
        assert!(!session.toggle("p1"));
        assert!(!session.is_selected("p1"));

        session.select("p2");
        session.deselect("p2");
        session.deselect("missing");
        session.select("p4");
        session.clear_selection();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn highlight_wraps_and_resets() {
        let mut session = SearchSession::new();
        let ticket = session.begin();
        session.complete(ticket, Ok(page_of(vec!["a", "b", "c"])));
        assert_eq!(session.highlight(), Some(0));
        assert_eq!(session.highlight_previous(), Some(2));
        assert_eq!(session.highlight_next(), Some(0));
        assert_eq!(session.highlight_next(), Some(1));
        assert_eq!(session.highlighted().map(String::as_str), Some("b"));

        let ticket = session.begin();
        session.complete(ticket, Ok(page_of(vec!["x", "y"])));
        assert_eq!(session.highlight(), Some(0));

        let ticket = session.begin();
        session.complete(ticket, Ok(page_of(vec![])));
        assert_eq!(session.highlight(), None);
        assert_eq!(session.highlight_next(), None);
    }

    #[test]
    fn run_pages_query_results() {
        let mut session = SearchSession::new();
        let query = Query::new().order_desc("hotness").build();
        let request = PageRequest::new(2, 1).unwrap();
        session.run(&query, &records(), request);

        let page = session.page().unwrap();
        let ids: Vec<String> = page.items.iter().filter_map(Record::id).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn run_with_failing_source() {
        let mut session = SearchSession::new();
        let state = session.run(&Query::new(), &Offline, PageRequest::default());
        assert_eq!(
            state,
            &SessionState::Failed {
                error: "record source failed: feed offline".into()
            }
        );
    }

    #[test]
    fn run_inspecting_sees_fetched_records_only_on_success() {
        let mut session = SearchSession::new();
        let query = Query::new().and_gte("hotness", 90).build();
        let (state, matched) = session.run_inspecting(
            &query,
            &records(),
            PageRequest::new(1, 1).unwrap(),
            |all| query.count(all, Record::accessor),
        );
        assert!(matches!(state, SessionState::Ready { page } if page.total_items == 2));
        assert_eq!(matched, Some(2));

        let (state, seen) =
            session.run_inspecting(&query, &Offline, PageRequest::default(), |all| all.len());
        assert!(matches!(state, SessionState::Failed { .. }));
        assert_eq!(seen, None);
    }

    #[test]
    fn debounce_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        assert_eq!(debounce.interval(), Duration::from_millis(300));
        assert!(!debounce.should_fire(start));

        debounce.touch(start);
        assert!(!debounce.should_fire(start + Duration::from_millis(100)));
        debounce.touch(start + Duration::from_millis(200));
        assert!(!debounce.should_fire(start + Duration::from_millis(400)));
        assert!(debounce.should_fire(start + Duration::from_millis(500)));
        assert!(!debounce.should_fire(start + Duration::from_millis(900)));
    }
}
