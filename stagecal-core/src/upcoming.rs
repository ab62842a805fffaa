//! The stateful upcoming-stages view.

use std::sync::Arc;

use parking_lot::Mutex;
use time::Date;

use crate::{
    entities::*,
    repositories::{AlbumRepo, ArtistRepo, StageRepo, VenueRepo},
    usecases::{
        group_rows_by_local_date, load_upcoming_stages, UpcomingQuery, UpcomingStageRow,
    },
    util::sequence::{LoadGuard, LoadOutcome, LoadTicket},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpcomingState {
    query: Option<UpcomingQuery>,
    // The query of the latest request, possibly still in flight
    requested: Option<UpcomingQuery>,
    rows: Vec<UpcomingStageRow>,
    has_more: bool,
    error: Option<String>,
}

impl UpcomingState {
    /// The query of the last applied page.
    pub fn query(&self) -> Option<&UpcomingQuery> {
        self.query.as_ref()
    }

    pub fn rows(&self) -> &[UpcomingStageRow] {
        &self.rows
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn grouped(&self, zone: DisplayZone) -> Vec<(Date, Vec<UpcomingStageRow>)> {
        group_rows_by_local_date(&self.rows, zone)
    }
}

/// Owns the rows of an upcoming window, including all pages loaded so far.
///
/// Re-querying (e.g. after the artist scope or the window changed)
/// discards responses of previous queries that are still in flight.
#[derive(Debug)]
pub struct UpcomingAggregator<R: ?Sized> {
    state: Mutex<UpcomingState>,
    guard: LoadGuard,
    repo: Arc<R>,
}

impl<R> UpcomingAggregator<R>
where
    R: StageRepo + AlbumRepo + ArtistRepo + VenueRepo + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            state: Default::default(),
            guard: LoadGuard::new(),
            repo,
        }
    }

    pub fn snapshot(&self) -> UpcomingState {
        self.state.lock().clone()
    }

    /// Replaces all rows with the result of `query`.
    pub async fn load(&self, query: UpcomingQuery) -> LoadOutcome {
        let ticket = {
            let mut state = self.state.lock();
            state.requested = Some(query);
            self.guard.issue()
        };
        self.fetch(ticket, query, false).await
    }

    /// Appends the next page, `None` if there is nothing more to load.
    ///
    /// Pages are only loaded for the latest requested query. While a
    /// different query is still pending (or has failed) there is nothing
    /// to append to.
    pub async fn load_more(&self) -> Option<LoadOutcome> {
        let (ticket, next) = {
            let state = self.state.lock();
            if !state.has_more || state.requested != state.query {
                return None;
            }
            let next = state.query.as_ref().and_then(UpcomingQuery::next_page)?;
            (self.guard.issue(), next)
        };
        Some(self.fetch(ticket, next, true).await)
    }

    async fn fetch(&self, ticket: LoadTicket, query: UpcomingQuery, append: bool) -> LoadOutcome {
        let result = load_upcoming_stages(&*self.repo, &query).await;
        let mut state = self.state.lock();
        if !self.guard.is_current(ticket) {
            log::debug!("Discarding stale upcoming stages {ticket:?}");
            return LoadOutcome::Discarded;
        }
        match result {
            Ok(page) => {
                if append {
                    state.rows.extend(page.rows);
                    // Only the latest ticket gets here, nothing else is pending
                    state.requested = Some(query);
                } else {
                    state.rows = page.rows;
                }
                state.query = Some(query);
                state.has_more = page.has_more;
                state.error = None;
                LoadOutcome::Applied
            }
            Err(err) => {
                log::warn!("Failed to load upcoming stages: {err}");
                state.error = Some(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    pub fn detach(&self) {
        self.guard.detach();
    }
}
