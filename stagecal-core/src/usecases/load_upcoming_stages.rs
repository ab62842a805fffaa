use std::collections::HashMap;

use itertools::Itertools as _;
use time::{Date, Duration};

use super::prelude::*;
use crate::repositories::Error as RepoError;

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpcomingMode {
    /// The first `limit` stages of the window.
    Preview { limit: u64 },
    /// Offset pagination, `page` is 0-based.
    Page { page: u64, page_size: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingQuery {
    pub from: Timestamp,
    pub to: Timestamp,
    pub mode: UpcomingMode,
}

impl UpcomingQuery {
    /// The window `[from, from + length]`.
    pub fn window(from: Timestamp, length: Duration, mode: UpcomingMode) -> Option<Self> {
        let to = from.checked_add(length)?;
        Some(Self { from, to, mode })
    }

    pub fn next_page(&self) -> Option<Self> {
        match self.mode {
            UpcomingMode::Preview { .. } => None,
            UpcomingMode::Page { page, page_size } => Some(Self {
                mode: UpcomingMode::Page {
                    page: page + 1,
                    page_size,
                },
                ..*self
            }),
        }
    }

    fn pagination(&self) -> Result<Pagination> {
        match self.mode {
            UpcomingMode::Preview { limit } => {
                if limit == 0 {
                    return Err(Error::InvalidLimit);
                }
                Ok(Pagination {
                    offset: None,
                    limit: Some(limit),
                })
            }
            UpcomingMode::Page { page, page_size } => {
                if page_size == 0 {
                    return Err(Error::InvalidLimit);
                }
                let offset = page.checked_mul(page_size).ok_or(Error::InvalidLimit)?;
                Ok(Pagination {
                    offset: Some(offset),
                    limit: Some(page_size),
                })
            }
        }
    }
}

/// A stage joined with everything needed to present it.
///
/// Dangling references resolve to `None`.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingStageRow {
    pub stage  : Stage,
    pub album  : Option<AlbumSummary>,
    pub artist : Option<ArtistSummary>,
    pub venue  : Option<Venue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpcomingPage {
    pub rows: Vec<UpcomingStageRow>,
    // Only meaningful in paginated mode
    pub has_more: bool,
}

async fn load_albums<R>(repo: &R, ids: &[Id]) -> RepoResult<HashMap<Id, AlbumSummary>>
where
    R: AlbumRepo + ?Sized,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(repo
        .get_albums(ids)
        .await?
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect())
}

async fn load_venues<R>(repo: &R, ids: &[Id]) -> RepoResult<HashMap<Id, Venue>>
where
    R: VenueRepo + ?Sized,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(repo
        .get_venues(ids)
        .await?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect())
}

async fn load_artists<R>(repo: &R, ids: &[Id]) -> RepoResult<HashMap<Id, ArtistSummary>>
where
    R: ArtistRepo + ?Sized,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(repo
        .get_artists(ids)
        .await?
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect())
}

/// Loads the stages of a time window and joins them with their
/// album, artist and venue.
///
/// Albums and venues are fetched concurrently, artists afterwards
/// because their ids are only known from the albums.
pub async fn load_upcoming_stages<R>(repo: &R, query: &UpcomingQuery) -> Result<UpcomingPage>
where
    R: StageRepo + AlbumRepo + ArtistRepo + VenueRepo + ?Sized,
{
    let pagination = query.pagination()?;
    let stage_query = StageQuery {
        start_min: Some(query.from),
        start_max: Some(query.to),
        pagination,
        ..Default::default()
    };
    let stages = repo.query_stages(&stage_query).await?;
    let has_more = match query.mode {
        UpcomingMode::Preview { .. } => false,
        UpcomingMode::Page { page_size, .. } => stages.len() as u64 == page_size,
    };
    if stages.is_empty() {
        return Ok(UpcomingPage::default());
    }

    let album_ids: Vec<Id> = stages.iter().map(|s| s.album_id.clone()).unique().collect();
    let venue_ids: Vec<Id> = stages
        .iter()
        .filter_map(|s| s.venue_id.clone())
        .unique()
        .collect();
    let (albums, venues) = futures::try_join!(
        load_albums(repo, &album_ids),
        load_venues(repo, &venue_ids)
    )?;

    let artist_ids: Vec<Id> = albums
        .values()
        .map(|a| a.artist_id.clone())
        .unique()
        .collect();
    let artists = load_artists(repo, &artist_ids).await?;

    let rows = stages
        .into_iter()
        .map(|stage| {
            let album = albums.get(&stage.album_id).cloned();
            if album.is_none() {
                log::debug!("Stage {} refers to unknown album {}", stage.id, stage.album_id);
            }
            let artist = album
                .as_ref()
                .and_then(|a| artists.get(&a.artist_id))
                .cloned();
            let venue = stage
                .venue_id
                .as_ref()
                .and_then(|id| venues.get(id))
                .cloned();
            UpcomingStageRow {
                stage,
                album,
                artist,
                venue,
            }
        })
        .collect();
    Ok(UpcomingPage { rows, has_more })
}

/// Groups rows by the local date of their start, in order of appearance.
pub fn group_rows_by_local_date(
    rows: &[UpcomingStageRow],
    zone: DisplayZone,
) -> Vec<(Date, Vec<UpcomingStageRow>)> {
    let mut groups: Vec<(Date, Vec<UpcomingStageRow>)> = Vec::new();
    for row in rows {
        let date = zone.local_date(row.stage.start);
        match groups.last_mut() {
            Some((last_date, group)) if *last_date == date => group.push(row.clone()),
            _ => groups.push((date, vec![row.clone()])),
        }
    }
    groups
}
