use std::{collections::HashMap, iter};

use time::Date;

use super::YearMonth;
use crate::entities::*;

pub const DAYS_PER_WEEK: usize = 7;

/// 6 rows of 7 days, enough for every month.
pub const GRID_CELLS: usize = 6 * DAYS_PER_WEEK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day { date: Date, stages: Vec<Stage> },
}

impl CalendarCell {
    pub fn date(&self) -> Option<Date> {
        match self {
            Self::Blank => None,
            Self::Day { date, .. } => Some(*date),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        match self {
            Self::Blank => &[],
            Self::Day { stages, .. } => stages,
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages().len()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// The Sunday-first matrix of a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Places every stage into the cell of its local start date.
    ///
    /// Stages starting outside of `month` (in local time) are ignored.
    /// Within a cell stages are ordered by their start.
    pub fn build(
        month: YearMonth,
        zone: DisplayZone,
        stages: impl IntoIterator<Item = Stage>,
    ) -> Self {
        let mut days: HashMap<Date, Vec<Stage>> = HashMap::new();
        for stage in stages {
            let date = zone.local_date(stage.start);
            if !month.contains(date) {
                log::debug!("Stage {} starts on {date} outside of {month}", stage.id);
                continue;
            }
            days.entry(date).or_default().push(stage);
        }
        let leading = usize::from(month.first_day().weekday().number_days_from_sunday());
        let mut cells = Vec::with_capacity(GRID_CELLS);
        cells.extend(iter::repeat(CalendarCell::Blank).take(leading));
        let dates = iter::successors(Some(month.first_day()), |d| d.next_day())
            .take(usize::from(month.days_in_month()));
        for date in dates {
            let mut stages = days.remove(&date).unwrap_or_default();
            stages.sort_by_key(|s| s.start);
            cells.push(CalendarCell::Day { date, stages });
        }
        debug_assert!(cells.len() <= GRID_CELLS);
        cells.resize(GRID_CELLS, CalendarCell::Blank);
        Self { month, cells }
    }

    pub fn empty(month: YearMonth) -> Self {
        Self::build(month, DisplayZone::UTC, iter::empty())
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn cell(&self, date: Date) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.date() == Some(date))
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.cells.iter().flat_map(CalendarCell::stages)
    }

    /// The local date of a loaded stage.
    pub fn find_stage(&self, stage_id: &str) -> Option<Date> {
        self.cells.iter().find_map(|cell| {
            cell.stages()
                .iter()
                .any(|s| s.id.as_str() == stage_id)
                .then(|| cell.date())
                .flatten()
        })
    }
}
