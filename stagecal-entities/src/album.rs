use crate::{id::*, url::*};

/// The parts of an album that are needed to present its stages.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSummary {
    pub id        : Id,
    pub artist_id : Id,
    pub title     : String,
    pub cover_url : Option<Url>,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id         : Id,
    pub name       : String,
    pub avatar_url : Option<Url>,
}
