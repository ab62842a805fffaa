use super::{prelude::*, resolve_venue};
use crate::util::validate;

/// Partial update of a stage.
///
/// `None` leaves the field untouched, `Some(None)` clears an optional field.
#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct StagePatch {
    pub album_id       : Option<String>,
    pub place          : Option<Option<ExternalPlace>>,
    pub start          : Option<String>,
    pub duration_hours : Option<f64>,
    pub title          : Option<Option<String>>,
    pub promotion_url  : Option<Option<String>>,
    pub address_detail : Option<Option<String>>,
}

impl StagePatch {
    pub fn is_empty(&self) -> bool {
        let Self {
            album_id,
            place,
            start,
            duration_hours,
            title,
            promotion_url,
            address_detail,
        } = self;
        album_id.is_none()
            && place.is_none()
            && start.is_none()
            && duration_hours.is_none()
            && title.is_none()
            && promotion_url.is_none()
            && address_detail.is_none()
    }
}

fn trimmed(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

pub async fn update_stage<R>(repo: &R, id: &str, patch: StagePatch) -> Result<()>
where
    R: StageRepo + VenueRepo + ?Sized,
{
    if patch.is_empty() {
        log::debug!("Nothing to update for stage {id}");
        return Ok(());
    }
    let StagePatch {
        album_id,
        place,
        start,
        duration_hours,
        title,
        promotion_url,
        address_detail,
    } = patch;

    // Only the supplied fields are validated, each one on its own
    let album_id = album_id.as_deref().map(validate::album_id).transpose()?;
    let start = start.as_deref().map(validate::stage_start).transpose()?;
    let duration = duration_hours.map(validate::stage_duration).transpose()?;
    let promotion_url = promotion_url
        .map(|url| {
            url.as_deref()
                .map(validate::promotion_url)
                .transpose()
                .map(Option::flatten)
        })
        .transpose()?;
    if let Some(Some(place)) = &place {
        resolve_venue::new_venue_from_place(place.clone())?;
    }

    let venue_id = match place {
        Some(Some(place)) => Some(Some(resolve_venue(repo, place).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let changes = StageChangeset {
        album_id,
        venue_id,
        start,
        duration,
        title: title.map(trimmed),
        promotion_url,
        address_detail: address_detail.map(trimmed),
    };
    repo.update_stage(id, changes).await.map_err(|err| {
        log::warn!("Failed to update stage {id}: {err}");
        err
    })?;
    log::info!("Updated stage {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use stagecal_entities::builders::*;

    use super::*;
    use crate::{
        repositories::Error as RepoError,
        usecases::{create_stage, get_stage, tests::MockDb, StageDraft},
        util::validate::StageInvalidation,
    };

    async fn db_with_stage() -> (MockDb, Id) {
        let db = MockDb::default();
        let id = create_stage(
            &db,
            StageDraft {
                album_id: "album-1".into(),
                start: "2025-07-11T15:00:00.000Z".into(),
                duration_hours: 2.0,
                title: Some("Release show".into()),
                place: Some(ExternalPlace::build().place_id("1").name("Club FF").finish()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (db, id)
    }

    #[tokio::test]
    async fn empty_patch_is_a_noop() {
        let (db, id) = db_with_stage().await;
        let before = get_stage(&db, id.as_str()).await.unwrap();
        update_stage(&db, id.as_str(), StagePatch::default())
            .await
            .unwrap();
        assert_eq!(db.calls.lock().update_stage, 0);
        assert_eq!(get_stage(&db, id.as_str()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_only_supplied_fields() {
        let (db, id) = db_with_stage().await;
        let before = get_stage(&db, id.as_str()).await.unwrap();
        update_stage(
            &db,
            id.as_str(),
            StagePatch {
                duration_hours: Some(3.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let after = get_stage(&db, id.as_str()).await.unwrap();
        assert_eq!(after.duration.hours(), 3.5);
        assert_eq!(after.end.to_string(), "2025-07-11T18:30:00.000Z");
        assert_eq!(after.title, before.title);
        assert_eq!(after.venue_id, before.venue_id);
        assert_eq!(after.start, before.start);
    }

    #[tokio::test]
    async fn clear_optional_fields() {
        let (db, id) = db_with_stage().await;
        update_stage(
            &db,
            id.as_str(),
            StagePatch {
                place: Some(None),
                title: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stage = get_stage(&db, id.as_str()).await.unwrap();
        assert!(stage.venue_id.is_none());
        assert!(stage.title.is_none());
        assert_eq!(db.calls.lock().upsert_venue, 1);
    }

    #[tokio::test]
    async fn switch_venue() {
        let (db, id) = db_with_stage().await;
        update_stage(
            &db,
            id.as_str(),
            StagePatch {
                place: Some(Some(
                    ExternalPlace::build().place_id("2").name("Rolling Hall").finish(),
                )),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stage = get_stage(&db, id.as_str()).await.unwrap();
        let venue = db
            .venues
            .lock()
            .iter()
            .find(|v| Some(&v.id) == stage.venue_id.as_ref())
            .cloned()
            .unwrap();
        assert_eq!(venue.name, "Rolling Hall");
    }

    #[tokio::test]
    async fn reject_invalid_fields_without_writing() {
        let (db, id) = db_with_stage().await;
        let err = update_stage(
            &db,
            id.as_str(),
            StagePatch {
                start: Some("2025-07-11 15:00".into()),
                place: Some(Some(ExternalPlace::build().place_id("3").name("X").finish())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Invalid(StageInvalidation::StartInstant)));
        assert_eq!(db.calls.lock().update_stage, 0);
        assert_eq!(db.calls.lock().upsert_venue, 1);
    }

    #[tokio::test]
    async fn update_missing_stage() {
        let db = MockDb::default();
        let err = update_stage(
            &db,
            "missing",
            StagePatch {
                title: Some(Some("x".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Repo(RepoError::NotFound)));
    }
}
