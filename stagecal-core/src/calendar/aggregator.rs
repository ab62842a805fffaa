use std::sync::Arc;

use parking_lot::Mutex;
use time::Date;

use super::{CalendarState, CellView, JumpOutcome, MonthGrid, YearMonth};
use crate::{
    entities::*,
    repositories::StageRepo,
    usecases::{self, load_month_grid},
    util::sequence::{LoadGuard, LoadOutcome, LoadTicket},
};

/// A calendar instance that owns its navigable state.
///
/// Multiple instances never share state. Responses of month loads are
/// only applied if no other load has been issued since.
#[derive(Debug)]
pub struct CalendarAggregator<R: ?Sized> {
    zone: DisplayZone,
    state: Mutex<CalendarState>,
    guard: LoadGuard,
    repo: Arc<R>,
}

impl<R> CalendarAggregator<R>
where
    R: StageRepo + ?Sized,
{
    pub fn new(repo: Arc<R>, zone: DisplayZone) -> Self {
        Self::with_today(repo, zone, zone.today())
    }

    pub fn with_today(repo: Arc<R>, zone: DisplayZone, today: Date) -> Self {
        Self {
            zone,
            state: Mutex::new(CalendarState::new(today)),
            guard: LoadGuard::new(),
            repo,
        }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn snapshot(&self) -> CalendarState {
        self.state.lock().clone()
    }

    pub fn set_month(&self, delta: i32) -> YearMonth {
        self.state.lock().set_month(delta)
    }

    pub fn select_day(&self, date: Date) {
        self.state.lock().select_day(date);
    }

    pub fn jump_to_stage(&self, stage_id: &str) -> JumpOutcome {
        self.state.lock().jump_to_stage(stage_id)
    }

    pub fn cell_views(&self, highlighted_stage: Option<&str>) -> Vec<CellView> {
        self.state
            .lock()
            .cell_views(self.zone.today(), highlighted_stage)
    }

    pub fn begin_load(&self) -> LoadTicket {
        self.guard.issue()
    }

    pub fn finish_load(
        &self,
        ticket: LoadTicket,
        result: Result<MonthGrid, usecases::Error>,
    ) -> LoadOutcome {
        // Checking and applying must not interleave with another response
        let mut state = self.state.lock();
        if !self.guard.is_current(ticket) {
            log::debug!("Discarding stale calendar response {ticket:?}");
            return LoadOutcome::Discarded;
        }
        match result {
            Ok(grid) => {
                state.apply_grid(grid);
                LoadOutcome::Applied
            }
            Err(err) => {
                log::warn!("Failed to load calendar month: {err}");
                state.apply_error(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    pub async fn load_month(&self, scope_artist_ids: &[Id], month: YearMonth) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = load_month_grid(&*self.repo, self.zone, scope_artist_ids, month).await;
        self.finish_load(ticket, result)
    }

    pub async fn load_visible_month(&self, scope_artist_ids: &[Id]) -> LoadOutcome {
        let month = self.state.lock().visible_month();
        self.load_month(scope_artist_ids, month).await
    }

    /// No response is applied anymore afterwards.
    pub fn detach(&self) {
        self.guard.detach();
    }

    pub fn is_detached(&self) -> bool {
        self.guard.is_detached()
    }
}

#[cfg(test)]
mod tests {
    use stagecal_entities::builders::*;
    use time::macros::date;
    use tokio::sync::oneshot;

    use super::*;
    use crate::usecases::tests::MockDb;

    fn kst() -> DisplayZone {
        "+09:00".parse().unwrap()
    }

    fn month(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn scope() -> Vec<Id> {
        vec!["artist-1".into()]
    }

    fn seeded_db() -> MockDb {
        let db = MockDb::default();
        db.albums
            .lock()
            .push(AlbumSummary::build().id("a1").artist("artist-1").finish());
        db.stages.lock().extend([
            Stage::build()
                .id("july")
                .album("a1")
                .start("2025-07-11T15:00:00Z")
                .duration_hours(1.5)
                .finish(),
            Stage::build()
                .id("august")
                .album("a1")
                .start("2025-08-20T10:00:00Z")
                .finish(),
        ]);
        db
    }

    fn aggregator(db: MockDb) -> CalendarAggregator<MockDb> {
        CalendarAggregator::with_today(Arc::new(db), kst(), date!(2025 - 07 - 01))
    }

    #[tokio::test]
    async fn load_visible_month() {
        let calendar = aggregator(seeded_db());
        assert_eq!(calendar.load_visible_month(&scope()).await, LoadOutcome::Applied);
        let state = calendar.snapshot();
        assert_eq!(state.grid().month(), month("2025-07"));
        let cell = state.grid().cell(date!(2025 - 07 - 12)).unwrap();
        assert_eq!(cell.stage_count(), 1);
        assert_eq!(calendar.jump_to_stage("july"), JumpOutcome::SameMonth);
        assert_eq!(calendar.snapshot().selected_day(), date!(2025 - 07 - 12));
        assert_eq!(calendar.jump_to_stage("august"), JumpOutcome::NotLoaded);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let db = seeded_db();
        let (release_first, first_gate) = oneshot::channel();
        let (release_second, second_gate) = oneshot::channel();
        db.query_gates.lock().extend([first_gate, second_gate]);
        let calendar = aggregator(db);
        let scope = scope();

        let mut first = Box::pin(calendar.load_month(&scope, month("2025-07")));
        assert!(futures::poll!(first.as_mut()).is_pending());

        // The second request resolves before the first one
        release_second.send(()).unwrap();
        let second = calendar.load_month(&scope, month("2025-08")).await;
        assert_eq!(second, LoadOutcome::Applied);

        release_first.send(()).unwrap();
        assert_eq!(first.await, LoadOutcome::Discarded);
        assert_eq!(calendar.snapshot().grid().month(), month("2025-08"));
    }

    #[tokio::test]
    async fn failure_keeps_the_previous_grid() {
        let calendar = aggregator(seeded_db());
        calendar.load_month(&scope(), month("2025-07")).await;
        let loaded = calendar.snapshot().grid().clone();

        calendar.repo.fail_reads();
        calendar.set_month(1);
        assert_eq!(calendar.load_visible_month(&scope()).await, LoadOutcome::Failed);
        let state = calendar.snapshot();
        assert_eq!(state.grid(), &loaded);
        assert!(state.error().is_some());
        assert_eq!(state.visible_month(), month("2025-08"));

        calendar.repo.recover();
        assert_eq!(calendar.load_visible_month(&scope()).await, LoadOutcome::Applied);
        let state = calendar.snapshot();
        assert!(state.error().is_none());
        assert_eq!(state.grid().month(), month("2025-08"));
    }

    #[tokio::test]
    async fn nothing_is_applied_after_detaching() {
        let calendar = aggregator(seeded_db());
        let ticket = calendar.begin_load();
        calendar.detach();
        let grid = MonthGrid::empty(month("2025-09"));
        assert_eq!(calendar.finish_load(ticket, Ok(grid)), LoadOutcome::Discarded);
        assert_eq!(
            calendar.load_month(&scope(), month("2025-07")).await,
            LoadOutcome::Discarded
        );
        assert_eq!(calendar.snapshot().grid().month(), month("2025-07"));
        assert!(calendar.snapshot().grid().stages().next().is_none());
    }

    #[tokio::test]
    async fn instances_do_not_share_state() {
        let db = Arc::new(seeded_db());
        let viewer = CalendarAggregator::with_today(Arc::clone(&db), kst(), date!(2025 - 07 - 01));
        let owner = CalendarAggregator::with_today(db, kst(), date!(2025 - 07 - 01));
        viewer.set_month(3);
        assert_eq!(viewer.snapshot().visible_month(), month("2025-10"));
        assert_eq!(owner.snapshot().visible_month(), month("2025-07"));
    }
}
