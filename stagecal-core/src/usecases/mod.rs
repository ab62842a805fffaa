mod create_stage;
mod delete_stage;
mod error;
mod group_stage_media;
mod load_month_grid;
mod load_upcoming_stages;
mod query_stages;
mod resolve_venue;
mod update_stage;

#[cfg(test)]
pub mod tests;

pub use self::{
    create_stage::*, delete_stage::*, error::Error, group_stage_media::*, load_month_grid::*,
    load_upcoming_stages::*, query_stages::*, resolve_venue::*, update_stage::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
