use time::Date;

use super::{MonthGrid, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The stage is not part of the loaded grid, nothing changed.
    NotLoaded,
    SameMonth,
    MonthChanged,
}

/// Presentation flags of a single grid cell.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub date                  : Option<Date>,
    pub stage_count           : usize,
    pub is_today              : bool,
    pub is_selected           : bool,
    pub has_highlighted_stage : bool,
}

/// The navigable state of one calendar instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    visible_month: YearMonth,
    selected_day: Date,
    grid: MonthGrid,
    error: Option<String>,
}

impl CalendarState {
    pub fn new(today: Date) -> Self {
        let visible_month = YearMonth::of(today);
        Self {
            visible_month,
            selected_day: today,
            grid: MonthGrid::empty(visible_month),
            error: None,
        }
    }

    pub fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    pub fn selected_day(&self) -> Date {
        self.selected_day
    }

    /// The last successfully loaded grid, possibly of another month.
    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Moves the visible month, the selected day is kept.
    pub fn set_month(&mut self, delta: i32) -> YearMonth {
        if let Some(month) = self.visible_month.add_months(delta) {
            self.visible_month = month;
        }
        self.visible_month
    }

    pub fn select_day(&mut self, date: Date) {
        self.selected_day = date;
    }

    /// Selects the local day of a loaded stage and shows its month.
    pub fn jump_to_stage(&mut self, stage_id: &str) -> JumpOutcome {
        let Some(date) = self.grid.find_stage(stage_id) else {
            return JumpOutcome::NotLoaded;
        };
        self.selected_day = date;
        let month = YearMonth::of(date);
        if month == self.visible_month {
            return JumpOutcome::SameMonth;
        }
        self.visible_month = month;
        JumpOutcome::MonthChanged
    }

    pub(crate) fn apply_grid(&mut self, grid: MonthGrid) {
        self.grid = grid;
        self.error = None;
    }

    // The previous grid stays visible
    pub(crate) fn apply_error(&mut self, error: String) {
        self.error = Some(error);
    }

    pub fn cell_views(&self, today: Date, highlighted_stage: Option<&str>) -> Vec<CellView> {
        self.grid
            .cells()
            .iter()
            .map(|cell| {
                let date = cell.date();
                CellView {
                    date,
                    stage_count: cell.stage_count(),
                    is_today: date == Some(today),
                    is_selected: date == Some(self.selected_day),
                    has_highlighted_stage: highlighted_stage
                        .map(|id| cell.stages().iter().any(|s| s.id.as_str() == id))
                        .unwrap_or(false),
                }
            })
            .collect()
    }
}
