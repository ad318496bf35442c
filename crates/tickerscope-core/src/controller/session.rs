//! Runtime driver for the search controller.
//!
//! A [`SearchSession`] owns one event-loop task. The [`FetchController`] lives
//! inside that task and is only touched there, so no lock guards it. Input
//! events, debounce expiries and completed page fetches all arrive on the
//! same channel and are applied strictly in order; every change is published
//! as a [`SearchSnapshot`] on a watch channel for rendering.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::adapters::{MockLogoSource, MockReferenceSource, PolygonReferenceAdapter, ProfileLogoAdapter};
use crate::config::SearchConfig;
use crate::controller::debounce::Debouncer;
use crate::controller::machine::{Effect, FetchController, FetchTicket, PageOutcome};
use crate::controller::scroll::ScrollListener;
use crate::controller::state::SearchSnapshot;
use crate::data_source::{LogoSource, ReferenceSource, SourceError, TickerSearchRequest};
use crate::enrichment::enrich_page;
use crate::http_client::HttpClient;
use crate::{CoreError, PageNumber, StockTicker};

#[derive(Debug)]
pub(crate) enum SessionEvent {
    TermChanged(String),
    ScrollNearBottom,
    DebounceFired(u64),
    PageLoaded {
        ticket: FetchTicket,
        outcome: Result<Vec<StockTicker>, SourceError>,
    },
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to a running search session.
///
/// Dropping the handle tears the session down: the armed debounce timer and
/// any in-flight fetches are cancelled.
pub struct SearchSession {
    events: mpsc::UnboundedSender<SessionEvent>,
    snapshots: watch::Receiver<SearchSnapshot>,
    scroll_threshold_px: f64,
    task: Option<JoinHandle<()>>,
}

impl SearchSession {
    /// Starts a session on the current tokio runtime.
    pub fn spawn(
        config: &SearchConfig,
        reference: Arc<dyn ReferenceSource>,
        logos: Arc<dyn LogoSource>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = FetchController::new();
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let event_loop = SessionLoop {
            controller,
            debouncer: Debouncer::new(config.debounce),
            reference,
            logos,
            events: events_tx.downgrade(),
            snapshots: snapshot_tx,
            fetches: JoinSet::new(),
        };
        let task = tokio::spawn(event_loop.run(events_rx));

        Self {
            events: events_tx,
            snapshots: snapshot_rx,
            scroll_threshold_px: config.scroll_threshold_px,
            task: Some(task),
        }
    }

    /// Session backed by the Polygon reference search and the company-profile
    /// logo lookup, sharing one HTTP transport.
    pub fn with_http_client(config: &SearchConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let reference = PolygonReferenceAdapter::with_http_client(Arc::clone(&http_client), config);
        let logos = ProfileLogoAdapter::with_http_client(http_client, config);
        Self::spawn(config, Arc::new(reference), Arc::new(logos))
    }

    /// Session over the deterministic in-memory catalog.
    pub fn mock(config: &SearchConfig) -> Self {
        Self::spawn(
            config,
            Arc::new(MockReferenceSource::default()),
            Arc::new(MockLogoSource::default()),
        )
    }

    pub fn set_search_term(&self, term: impl Into<String>) -> Result<(), CoreError> {
        self.send(SessionEvent::TermChanged(term.into()))
    }

    pub fn scroll_near_bottom(&self) -> Result<(), CoreError> {
        self.send(SessionEvent::ScrollNearBottom)
    }

    /// Subscription that turns raw scroll positions into near-bottom events.
    pub fn scroll_listener(&self) -> ScrollListener {
        ScrollListener::new(self.events.downgrade(), self.scroll_threshold_px)
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Resolves once every event sent before this call has been applied.
    pub async fn flush(&self) -> Result<(), CoreError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(SessionEvent::Flush(ack_tx))?;
        ack_rx.await.map_err(|_| CoreError::SessionClosed)
    }

    /// Waits for the first snapshot satisfying `predicate`.
    pub async fn wait_for<F>(&self, predicate: F) -> Result<SearchSnapshot, CoreError>
    where
        F: FnMut(&SearchSnapshot) -> bool,
    {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| CoreError::SessionClosed)?
            .clone();
        Ok(snapshot)
    }

    /// Applies pending events, then waits until no debounce is armed and no
    /// fetch is in flight.
    pub async fn settle(&self) -> Result<SearchSnapshot, CoreError> {
        self.flush().await?;
        self.wait_for(SearchSnapshot::is_settled).await
    }

    /// Stops the event loop and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn send(&self, event: SessionEvent) -> Result<(), CoreError> {
        self.events.send(event).map_err(|_| CoreError::SessionClosed)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Fetches one reference page and enriches it with logos.
///
/// A reference failure fails the page; logo failures never do.
pub async fn fetch_page(
    reference: &dyn ReferenceSource,
    logos: &dyn LogoSource,
    query: &str,
    page: PageNumber,
) -> Result<Vec<StockTicker>, SourceError> {
    let request = TickerSearchRequest::new(query, page)?;
    let tickers = reference.search(request).await?.results;
    Ok(enrich_page(logos, tickers).await)
}

struct SessionLoop {
    controller: FetchController,
    debouncer: Debouncer,
    reference: Arc<dyn ReferenceSource>,
    logos: Arc<dyn LogoSource>,
    // Weak so the loop ends once every handle is gone.
    events: mpsc::WeakUnboundedSender<SessionEvent>,
    snapshots: watch::Sender<SearchSnapshot>,
    fetches: JoinSet<()>,
}

impl SessionLoop {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(SessionEvent::Shutdown) => break,
                    Some(SessionEvent::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    Some(event) => self.handle(event),
                },
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    if let Err(error) = joined {
                        if error.is_panic() {
                            tracing::error!(%error, "page fetch task panicked");
                        }
                    }
                }
            }
        }

        self.debouncer.cancel();
        self.fetches.abort_all();
        tracing::debug!("search session stopped");
    }

    fn handle(&mut self, event: SessionEvent) {
        let effects = match event {
            SessionEvent::TermChanged(term) => {
                tracing::debug!(term = %term, "search term changed");
                self.controller.on_search_term_changed(term)
            }
            SessionEvent::ScrollNearBottom => self.controller.on_scroll_near_bottom(),
            SessionEvent::DebounceFired(token) => self.controller.on_debounce_fired(token),
            SessionEvent::PageLoaded { ticket, outcome } => {
                let error = outcome.as_ref().err().cloned();
                let (result, effects) = self.controller.on_page_loaded(&ticket, outcome);
                log_page_outcome(&ticket, &result, error.as_ref());
                effects
            }
            SessionEvent::Flush(_) | SessionEvent::Shutdown => Vec::new(),
        };

        for effect in effects {
            self.apply(effect);
        }
        self.publish();
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDebounce { token } => {
                let Some(events) = self.events.upgrade() else {
                    return;
                };
                self.debouncer.schedule(async move {
                    let _ = events.send(SessionEvent::DebounceFired(token));
                });
            }
            Effect::CancelDebounce => self.debouncer.cancel(),
            Effect::Fetch(ticket) => {
                let Some(events) = self.events.upgrade() else {
                    return;
                };
                tracing::debug!(
                    query = %ticket.query,
                    page = %ticket.page,
                    generation = ticket.generation,
                    "issuing page fetch"
                );
                let reference = Arc::clone(&self.reference);
                let logos = Arc::clone(&self.logos);
                self.fetches.spawn(async move {
                    let outcome =
                        fetch_page(reference.as_ref(), logos.as_ref(), &ticket.query, ticket.page)
                            .await;
                    let _ = events.send(SessionEvent::PageLoaded { ticket, outcome });
                });
            }
        }
    }

    fn publish(&self) {
        let next = self.controller.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

fn log_page_outcome(ticket: &FetchTicket, outcome: &PageOutcome, error: Option<&SourceError>) {
    match outcome {
        PageOutcome::Applied { added, has_more } => tracing::info!(
            query = %ticket.query,
            page = %ticket.page,
            added,
            has_more,
            "page loaded"
        ),
        PageOutcome::Failed => tracing::warn!(
            query = %ticket.query,
            page = %ticket.page,
            code = error.map(SourceError::code).unwrap_or("source.internal"),
            error = error.map(SourceError::message).unwrap_or_default(),
            "reference search failed"
        ),
        PageOutcome::Stale => tracing::debug!(
            query = %ticket.query,
            page = %ticket.page,
            generation = ticket.generation,
            "discarding stale page"
        ),
    }
}
