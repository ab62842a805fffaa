// Low-level storage access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified or loaded by another
// repository. The storage does not join, callers do.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::*;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Selects stages ordered by their start (ascending).
#[derive(Clone, Debug, Default)]
pub struct StageQuery {
    pub start_min: Option<Timestamp>, // lower bound (inclusive)
    pub start_max: Option<Timestamp>, // upper bound (inclusive)
    // None: no filter, Some(empty vector): no stage matches
    pub album_ids: Option<Vec<Id>>,
    // Matches the artist of the owning album
    pub artist_ids: Option<Vec<Id>>,
    pub pagination: Pagination,
}

/// Partial update of a stage: `None` leaves a field untouched.
#[rustfmt::skip]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageChangeset {
    pub album_id       : Option<Id>,
    pub venue_id       : Option<Option<Id>>,
    pub start          : Option<Timestamp>,
    pub duration       : Option<StageDuration>,
    pub title          : Option<Option<String>>,
    pub promotion_url  : Option<Option<Url>>,
    pub address_detail : Option<Option<String>>,
}

impl StageChangeset {
    pub fn is_empty(&self) -> bool {
        let Self {
            album_id,
            venue_id,
            start,
            duration,
            title,
            promotion_url,
            address_detail,
        } = self;
        album_id.is_none()
            && venue_id.is_none()
            && start.is_none()
            && duration.is_none()
            && title.is_none()
            && promotion_url.is_none()
            && address_detail.is_none()
    }
}

#[async_trait]
pub trait VenueRepo: Send + Sync {
    /// Inserts or overwrites the venue with the same `(provider, provider_place_id)`.
    ///
    /// Must be safe under concurrent invocation for the same key and
    /// returns the id of the stored venue.
    async fn upsert_venue(&self, venue: NewVenue) -> Result<Id>;

    async fn get_venue(&self, id: &str) -> Result<Venue>;
    async fn get_venues(&self, ids: &[Id]) -> Result<Vec<Venue>>;
}

#[async_trait]
pub trait StageRepo: Send + Sync {
    async fn create_stage(&self, stage: NewStage) -> Result<()>;
    async fn update_stage(&self, id: &str, changes: StageChangeset) -> Result<()>;
    // Dependent comments are removed by the storage
    async fn delete_stage(&self, id: &str) -> Result<()>;

    async fn get_stage(&self, id: &str) -> Result<Stage>;
    async fn get_stages(&self, ids: &[Id]) -> Result<Vec<Stage>>;
    async fn query_stages(&self, query: &StageQuery) -> Result<Vec<Stage>>;
}

#[async_trait]
pub trait AlbumRepo: Send + Sync {
    async fn create_album(&self, album: AlbumSummary) -> Result<()>;
    async fn get_albums(&self, ids: &[Id]) -> Result<Vec<AlbumSummary>>;
}

#[async_trait]
pub trait ArtistRepo: Send + Sync {
    async fn create_artist(&self, artist: ArtistSummary) -> Result<()>;
    async fn get_artists(&self, ids: &[Id]) -> Result<Vec<ArtistSummary>>;
}

#[async_trait]
pub trait StageCommentRepo: Send + Sync {
    async fn create_stage_comment(&self, comment: StageComment) -> Result<()>;

    // Ordered by creation time (ascending)
    async fn load_comments_of_stages(&self, stage_ids: &[Id]) -> Result<Vec<StageComment>>;
}
