use super::{prelude::*, resolve_venue};
use crate::util::validate::{self, AutoCorrect};

#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct StageDraft {
    pub album_id       : String,
    pub place          : Option<ExternalPlace>,
    pub start          : String,
    pub duration_hours : f64,
    pub title          : Option<String>,
    pub promotion_url  : Option<String>,
    pub address_detail : Option<String>,
}

/// A stage draft that passed validation, ready to be stored.
#[derive(Debug, Clone)]
pub struct Storable {
    stage: NewStage,
    place: Option<ExternalPlace>,
}

pub fn validate_stage_draft(draft: StageDraft) -> Result<Storable> {
    let StageDraft {
        album_id,
        place,
        start,
        duration_hours,
        title,
        promotion_url,
        address_detail,
    } = draft;
    let album_id = validate::album_id(&album_id)?;
    let start = validate::stage_start(&start)?;
    let duration = validate::stage_duration(duration_hours)?;
    let promotion_url = promotion_url
        .as_deref()
        .map(validate::promotion_url)
        .transpose()?
        .flatten();
    if let Some(place) = &place {
        // Fail before anything has been written
        resolve_venue::new_venue_from_place(place.clone())?;
    }
    let stage = NewStage {
        id: Id::new(),
        album_id,
        venue_id: None,
        start,
        duration,
        title,
        promotion_url,
        address_detail,
    }
    .auto_correct();
    Ok(Storable { stage, place })
}

pub async fn store_new_stage<R>(repo: &R, storable: Storable) -> Result<Id>
where
    R: StageRepo + VenueRepo + ?Sized,
{
    let Storable { mut stage, place } = storable;
    if let Some(place) = place {
        stage.venue_id = Some(resolve_venue(repo, place).await?);
    }
    let id = stage.id.clone();
    repo.create_stage(stage).await.map_err(|err| {
        log::warn!("Failed to store new stage {id}: {err}");
        err
    })?;
    log::info!("Created stage {id}");
    Ok(id)
}

/// Validates and stores a new stage.
///
/// The end of the stage is derived by the storage. Use [`get_stage`]
/// to read it back.
pub async fn create_stage<R>(repo: &R, draft: StageDraft) -> Result<Id>
where
    R: StageRepo + VenueRepo + ?Sized,
{
    let storable = validate_stage_draft(draft)?;
    store_new_stage(repo, storable).await
}

pub async fn get_stage<R>(repo: &R, id: &str) -> Result<Stage>
where
    R: StageRepo + ?Sized,
{
    Ok(repo.get_stage(id).await?)
}

#[cfg(test)]
mod tests {
    use stagecal_entities::builders::*;

    use super::*;
    use crate::{usecases::tests::MockDb, util::validate::StageInvalidation};

    fn draft() -> StageDraft {
        StageDraft {
            album_id: "album-1".into(),
            start: "2025-07-11T15:00:00.000Z".into(),
            duration_hours: 1.5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_read_back_stage() {
        let db = MockDb::default();
        let id = create_stage(
            &db,
            StageDraft {
                title: Some(" Release show ".into()),
                promotion_url: Some("https://tickets.example.com/1".into()),
                address_detail: Some("".into()),
                ..draft()
            },
        )
        .await
        .unwrap();
        let stage = get_stage(&db, id.as_str()).await.unwrap();
        assert_eq!(stage.album_id.as_str(), "album-1");
        assert_eq!(stage.start.to_string(), "2025-07-11T15:00:00.000Z");
        assert_eq!(stage.duration.hours(), 1.5);
        assert_eq!(stage.end.to_string(), "2025-07-11T16:30:00.000Z");
        assert_eq!(stage.title.as_deref(), Some("Release show"));
        assert_eq!(stage.address_detail, None);
        assert!(stage.venue_id.is_none());
        assert!(stage.promotion_url.is_some());
    }

    #[tokio::test]
    async fn create_stage_with_place() {
        let db = MockDb::default();
        let id = create_stage(
            &db,
            StageDraft {
                place: Some(ExternalPlace::build().place_id("99").name("Club FF").finish()),
                ..draft()
            },
        )
        .await
        .unwrap();
        let stage = get_stage(&db, id.as_str()).await.unwrap();
        let venue_id = stage.venue_id.unwrap();
        assert_eq!(db.venues.lock()[0].id, venue_id);
        assert_eq!(db.calls.lock().upsert_venue, 1);
    }

    #[tokio::test]
    async fn invalid_drafts_have_no_side_effects() {
        let db = MockDb::default();
        let place = ExternalPlace::build().place_id("99").name("Club FF").finish();
        let invalid = [
            (
                StageDraft {
                    duration_hours: 1.2,
                    place: Some(place.clone()),
                    ..draft()
                },
                StageInvalidation::Duration,
            ),
            (
                StageDraft {
                    duration_hours: 0.0,
                    ..draft()
                },
                StageInvalidation::Duration,
            ),
            (
                StageDraft {
                    start: "2025-07-12T00:00:00+09:00".into(),
                    place: Some(place.clone()),
                    ..draft()
                },
                StageInvalidation::StartInstant,
            ),
            (
                StageDraft {
                    promotion_url: Some("tickets".into()),
                    ..draft()
                },
                StageInvalidation::PromotionUrl,
            ),
            (
                StageDraft {
                    album_id: "".into(),
                    ..draft()
                },
                StageInvalidation::AlbumId,
            ),
        ];
        for (draft, expected) in invalid {
            let err = create_stage(&db, draft).await.unwrap_err();
            assert!(err.is_validation());
            match err {
                Error::Invalid(invalidation) => assert_eq!(invalidation, expected),
                _ => panic!("unexpected error: {err}"),
            }
        }
        assert!(db.venues.lock().is_empty());
        assert!(db.stages.lock().is_empty());
        assert_eq!(db.calls.lock().upsert_venue, 0);
    }

    #[tokio::test]
    async fn failed_venue_resolution_aborts_the_write() {
        let db = MockDb::default();
        db.fail_writes();
        let err = create_stage(
            &db,
            StageDraft {
                place: Some(ExternalPlace::build().place_id("99").name("Club FF").finish()),
                ..draft()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::VenueResolutionFailed(_)));
        assert_eq!(db.calls.lock().create_stage, 0);
    }

    #[tokio::test]
    async fn persistence_errors_are_propagated() {
        let db = MockDb::default();
        db.fail_writes();
        let err = create_stage(&db, draft()).await.unwrap_err();
        assert!(matches!(err, Error::Repo(_)));
        assert!(!err.is_validation());
    }
}
