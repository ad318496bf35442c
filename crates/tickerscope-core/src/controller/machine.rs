//! Search/pagination state machine.
//!
//! [`FetchController`] owns the search term, page counter, accumulated
//! results and [`FetchState`]. It performs no I/O: every input event returns
//! the [`Effect`]s the caller must carry out (arm or cancel the debounce
//! timer, issue a page fetch). Completed fetches are fed back through
//! [`FetchController::on_page_loaded`] together with the [`FetchTicket`] they
//! were issued under; tickets from an older generation or page are dropped.

use crate::controller::state::{FetchState, SearchSnapshot};
use crate::data_source::SourceError;
use crate::{PageNumber, StockTicker};

/// Identity of one issued page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: PageNumber,
}

/// Side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm (or re-arm) the debounce timer; it must report back `token`.
    ScheduleDebounce { token: u64 },
    CancelDebounce,
    Fetch(FetchTicket),
}

/// Outcome of feeding a completed fetch back into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Applied { added: usize, has_more: bool },
    Failed,
    /// Ticket no longer matches the current generation/page.
    Stale,
}

#[derive(Debug, Default)]
pub struct FetchController {
    input: String,
    active_query: String,
    page: PageNumber,
    results: Vec<StockTicker>,
    state: FetchState,
    generation: u64,
    pending_debounce: Option<u64>,
    scroll_requested: bool,
}

impl FetchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn results(&self) -> &[StockTicker] {
        &self.results
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn has_more(&self) -> bool {
        !matches!(self.state, FetchState::Exhausted | FetchState::Error(_))
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.input.clone(),
            active_query: self.active_query.clone(),
            page: self.page.get(),
            results: self.results.clone(),
            state: self.state.clone(),
            debouncing: self.pending_debounce.is_some(),
        }
    }

    /// Records new search text.
    ///
    /// Identical text is ignored. Empty text clears everything at once and
    /// cancels the debounce; anything else arms the debounce. Either way the
    /// generation advances so responses for the previous text are dropped.
    pub fn on_search_term_changed(&mut self, term: impl Into<String>) -> Vec<Effect> {
        let term = term.into();
        if term == self.input {
            return Vec::new();
        }

        self.input = term;
        self.generation = self.generation.wrapping_add(1);
        self.scroll_requested = false;

        if self.input.is_empty() {
            self.pending_debounce = None;
            self.active_query.clear();
            self.results.clear();
            self.page = PageNumber::FIRST;
            self.state = FetchState::Idle;
            return vec![Effect::CancelDebounce];
        }

        self.pending_debounce = Some(self.generation);
        vec![Effect::ScheduleDebounce {
            token: self.generation,
        }]
    }

    /// Debounce timer elapsed for `token`; starts the first-page fetch if
    /// the token is still the armed one.
    pub fn on_debounce_fired(&mut self, token: u64) -> Vec<Effect> {
        if self.pending_debounce != Some(token) {
            return Vec::new();
        }
        self.pending_debounce = None;

        self.active_query = self.input.clone();
        self.page = PageNumber::FIRST;
        self.state = FetchState::LoadingFirstPage;
        vec![Effect::Fetch(self.ticket())]
    }

    /// Viewport reached the bottom of the result list.
    ///
    /// Fetches the next page only when idle with more pages available.
    /// While a fetch is in flight, any number of calls collapse into a single
    /// follow-up fetch issued once the in-flight page lands.
    pub fn on_scroll_near_bottom(&mut self) -> Vec<Effect> {
        if self.pending_debounce.is_some() || self.active_query.is_empty() {
            return Vec::new();
        }

        match self.state {
            FetchState::Idle => {
                self.page = self.page.next();
                self.state = FetchState::LoadingMore;
                vec![Effect::Fetch(self.ticket())]
            }
            FetchState::LoadingFirstPage | FetchState::LoadingMore => {
                self.scroll_requested = true;
                Vec::new()
            }
            FetchState::Error(_) | FetchState::Exhausted => Vec::new(),
        }
    }

    /// Applies a completed fetch. Page one replaces the results, later pages
    /// append; a failure leaves the results untouched.
    pub fn on_page_loaded(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<StockTicker>, SourceError>,
    ) -> (PageOutcome, Vec<Effect>) {
        if ticket.generation != self.generation
            || ticket.page != self.page
            || !self.state.is_loading()
        {
            return (PageOutcome::Stale, Vec::new());
        }

        let follow_up = std::mem::take(&mut self.scroll_requested);

        match outcome {
            Ok(tickers) => {
                let added = tickers.len();
                let has_more = added > 0;
                if ticket.page.is_first() {
                    self.results = tickers;
                } else {
                    self.results.extend(tickers);
                }
                self.state = if has_more {
                    FetchState::Idle
                } else {
                    FetchState::Exhausted
                };

                let effects = if follow_up && has_more {
                    self.on_scroll_near_bottom()
                } else {
                    Vec::new()
                };
                (PageOutcome::Applied { added, has_more }, effects)
            }
            Err(error) => {
                self.state = FetchState::Error(error.message().to_owned());
                (PageOutcome::Failed, Vec::new())
            }
        }
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.active_query.clone(),
            page: self.page,
        }
    }
}
