//! # stagecal-core
//!
//! Scheduling and aggregation of performance events ("stages"):
//! venue resolution, validated stage writes, calendar month matrices
//! and the denormalized upcoming-stages view.

pub mod calendar;
pub mod repositories;
pub mod upcoming;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use stagecal_entities::{
        album::*, comment::*, geo::*, id::*, stage::*, time::*, url::*, venue::*,
    };
}
