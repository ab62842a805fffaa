//! Calendar month matrices and the navigable calendar state.
//!
//! All placement happens by the calendar date of a stage's start
//! converted into the [`DisplayZone`](crate::entities::DisplayZone).

mod aggregator;
mod grid;
mod month;
mod state;

pub use self::{aggregator::*, grid::*, month::*, state::*};
