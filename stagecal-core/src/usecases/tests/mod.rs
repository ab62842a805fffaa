use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{oneshot, Barrier};

use crate::{
    entities::*,
    repositories::{Error as RepoError, *},
};

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Default, Clone, Copy)]
pub struct CallCounts {
    pub upsert_venue: usize,
    pub get_venues: usize,
    pub create_stage: usize,
    pub update_stage: usize,
    pub query_stages: usize,
    pub get_stages: usize,
    pub get_albums: usize,
    pub get_artists: usize,
    pub load_comments: usize,
}

/// In-memory storage with call counters.
#[derive(Default)]
pub struct MockDb {
    pub venues: Mutex<Vec<Venue>>,
    pub stages: Mutex<Vec<Stage>>,
    pub albums: Mutex<Vec<AlbumSummary>>,
    pub artists: Mutex<Vec<ArtistSummary>>,
    pub comments: Mutex<Vec<StageComment>>,
    pub calls: Mutex<CallCounts>,
    // Awaited by the secondary lookups, e.g. to prove that they run concurrently
    pub lookup_barrier: Option<Arc<Barrier>>,
    // Each stage query waits for the next gate (if any) before answering
    pub query_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockDb {
    pub fn with_lookup_barrier(parties: usize) -> Self {
        Self {
            lookup_barrier: Some(Arc::new(Barrier::new(parties))),
            ..Default::default()
        }
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.fail_reads.store(false, Ordering::SeqCst);
        self.fail_writes.store(false, Ordering::SeqCst);
    }

    fn check_read(&self) -> RepoResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("storage unavailable").into());
        }
        Ok(())
    }

    fn check_write(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("storage is read-only").into());
        }
        Ok(())
    }

    async fn wait_for_lookup_barrier(&self) {
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }
    }

    fn artist_of_album(&self, album_id: &Id) -> Option<Id> {
        self.albums
            .lock()
            .iter()
            .find(|a| &a.id == album_id)
            .map(|a| a.artist_id.clone())
    }
}

fn derive_end(start: Timestamp, duration: StageDuration) -> RepoResult<Timestamp> {
    Stage::preview_end(start, duration).ok_or_else(|| anyhow!("end out of range").into())
}

#[async_trait]
impl VenueRepo for MockDb {
    async fn upsert_venue(&self, venue: NewVenue) -> RepoResult<Id> {
        self.calls.lock().upsert_venue += 1;
        self.check_write()?;
        let mut venues = self.venues.lock();
        if let Some(existing) = venues.iter_mut().find(|v| {
            v.provider == venue.provider && v.provider_place_id == venue.provider_place_id
        }) {
            *existing = Venue::from_new_venue(existing.id.clone(), venue);
            return Ok(existing.id.clone());
        }
        let id = Id::new();
        venues.push(Venue::from_new_venue(id.clone(), venue));
        Ok(id)
    }

    async fn get_venue(&self, id: &str) -> RepoResult<Venue> {
        self.check_read()?;
        self.venues
            .lock()
            .iter()
            .find(|v| v.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_venues(&self, ids: &[Id]) -> RepoResult<Vec<Venue>> {
        self.calls.lock().get_venues += 1;
        self.wait_for_lookup_barrier().await;
        self.check_read()?;
        Ok(self
            .venues
            .lock()
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StageRepo for MockDb {
    async fn create_stage(&self, stage: NewStage) -> RepoResult<()> {
        self.calls.lock().create_stage += 1;
        self.check_write()?;
        let NewStage {
            id,
            album_id,
            venue_id,
            start,
            duration,
            title,
            promotion_url,
            address_detail,
        } = stage;
        let mut stages = self.stages.lock();
        if stages.iter().any(|s| s.id == id) {
            return Err(RepoError::AlreadyExists);
        }
        stages.push(Stage {
            id,
            album_id,
            venue_id,
            start,
            duration,
            end: derive_end(start, duration)?,
            title,
            promotion_url,
            address_detail,
        });
        Ok(())
    }

    async fn update_stage(&self, id: &str, changes: StageChangeset) -> RepoResult<()> {
        self.calls.lock().update_stage += 1;
        self.check_write()?;
        let mut stages = self.stages.lock();
        let stage = stages
            .iter_mut()
            .find(|s| s.id.as_str() == id)
            .ok_or(RepoError::NotFound)?;
        let StageChangeset {
            album_id,
            venue_id,
            start,
            duration,
            title,
            promotion_url,
            address_detail,
        } = changes;
        if let Some(album_id) = album_id {
            stage.album_id = album_id;
        }
        if let Some(venue_id) = venue_id {
            stage.venue_id = venue_id;
        }
        if let Some(start) = start {
            stage.start = start;
        }
        if let Some(duration) = duration {
            stage.duration = duration;
        }
        if let Some(title) = title {
            stage.title = title;
        }
        if let Some(promotion_url) = promotion_url {
            stage.promotion_url = promotion_url;
        }
        if let Some(address_detail) = address_detail {
            stage.address_detail = address_detail;
        }
        stage.end = derive_end(stage.start, stage.duration)?;
        Ok(())
    }

    async fn delete_stage(&self, id: &str) -> RepoResult<()> {
        self.check_write()?;
        let mut stages = self.stages.lock();
        let pos = stages
            .iter()
            .position(|s| s.id.as_str() == id)
            .ok_or(RepoError::NotFound)?;
        stages.remove(pos);
        self.comments.lock().retain(|c| c.stage_id.as_str() != id);
        Ok(())
    }

    async fn get_stage(&self, id: &str) -> RepoResult<Stage> {
        self.check_read()?;
        self.stages
            .lock()
            .iter()
            .find(|s| s.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_stages(&self, ids: &[Id]) -> RepoResult<Vec<Stage>> {
        self.calls.lock().get_stages += 1;
        self.check_read()?;
        Ok(self
            .stages
            .lock()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn query_stages(&self, query: &StageQuery) -> RepoResult<Vec<Stage>> {
        self.calls.lock().query_stages += 1;
        let gate = self.query_gates.lock().pop_front();
        if let Some(gate) = gate {
            gate.await.ok();
        }
        self.check_read()?;
        let StageQuery {
            start_min,
            start_max,
            album_ids,
            artist_ids,
            pagination,
        } = query;
        let mut stages: Vec<_> = self
            .stages
            .lock()
            .iter()
            .filter(|s| start_min.map(|min| s.start >= min).unwrap_or(true))
            .filter(|s| start_max.map(|max| s.start <= max).unwrap_or(true))
            .filter(|s| {
                album_ids
                    .as_ref()
                    .map(|ids| ids.contains(&s.album_id))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        if let Some(artist_ids) = artist_ids {
            stages.retain(|s| {
                self.artist_of_album(&s.album_id)
                    .map(|artist_id| artist_ids.contains(&artist_id))
                    .unwrap_or(false)
            });
        }
        stages.sort_by_key(|s| s.start);
        let offset = pagination.offset.unwrap_or(0) as usize;
        let limit = pagination.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(stages.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl AlbumRepo for MockDb {
    async fn create_album(&self, album: AlbumSummary) -> RepoResult<()> {
        self.check_write()?;
        self.albums.lock().push(album);
        Ok(())
    }

    async fn get_albums(&self, ids: &[Id]) -> RepoResult<Vec<AlbumSummary>> {
        self.calls.lock().get_albums += 1;
        self.wait_for_lookup_barrier().await;
        self.check_read()?;
        Ok(self
            .albums
            .lock()
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ArtistRepo for MockDb {
    async fn create_artist(&self, artist: ArtistSummary) -> RepoResult<()> {
        self.check_write()?;
        self.artists.lock().push(artist);
        Ok(())
    }

    async fn get_artists(&self, ids: &[Id]) -> RepoResult<Vec<ArtistSummary>> {
        self.calls.lock().get_artists += 1;
        self.check_read()?;
        Ok(self
            .artists
            .lock()
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StageCommentRepo for MockDb {
    async fn create_stage_comment(&self, comment: StageComment) -> RepoResult<()> {
        self.check_write()?;
        self.comments.lock().push(comment);
        Ok(())
    }

    async fn load_comments_of_stages(&self, stage_ids: &[Id]) -> RepoResult<Vec<StageComment>> {
        self.calls.lock().load_comments += 1;
        self.check_read()?;
        let mut comments: Vec<_> = self
            .comments
            .lock()
            .iter()
            .filter(|c| stage_ids.contains(&c.stage_id))
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}
