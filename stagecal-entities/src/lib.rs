#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # stagecal-entities
//!
//! Reusable, agnostic domain entities for scheduling performance events ("stages").
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod album;
pub mod comment;
pub mod geo;
pub mod id;
pub mod stage;
pub mod time;
pub mod venue;
pub mod url {
    pub use url::{ParseError, Url};
}

#[cfg(any(test, feature = "builders"))]
pub mod builders;
