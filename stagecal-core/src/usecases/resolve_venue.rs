use super::prelude::*;
use crate::util::validate::{AutoCorrect, Validate};

/// Normalizes an external place into the venue attributes for the upsert.
///
/// Coordinates and URLs that cannot be parsed are treated as absent.
pub fn new_venue_from_place(place: ExternalPlace) -> Result<NewVenue> {
    let place = place.auto_correct();
    place.validate()?;
    let ExternalPlace {
        provider,
        provider_place_id,
        place_name,
        formatted_address,
        road_address,
        phone,
        place_url,
        lat,
        lng,
        raw_payload,
    } = place;
    let pos = match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let pos = GeoPoint::parse_lat_lng(&lat, &lng);
            if pos.is_none() {
                log::debug!("Ignoring invalid coordinates of place {provider_place_id}: {lat}/{lng}");
            }
            pos
        }
        _ => None,
    };
    let place_url = place_url.and_then(|url| {
        url.parse()
            .map_err(|err| {
                log::debug!("Ignoring invalid URL of place {provider_place_id}: {err}");
            })
            .ok()
    });
    Ok(NewVenue {
        provider,
        provider_place_id,
        name: place_name,
        road_address,
        formatted_address,
        phone,
        place_url,
        pos,
        raw_payload,
    })
}

/// Maps an external place onto a stable venue id.
///
/// The latest search result always overwrites the stored attributes
/// of a venue with the same `(provider, provider_place_id)`.
pub async fn resolve_venue<R>(repo: &R, place: ExternalPlace) -> Result<Id>
where
    R: VenueRepo + ?Sized,
{
    let new_venue = new_venue_from_place(place)?;
    let provider = new_venue.provider;
    let provider_place_id = new_venue.provider_place_id.clone();
    let id = repo.upsert_venue(new_venue).await.map_err(|err| {
        log::warn!("Failed to resolve venue {provider}:{provider_place_id}: {err}");
        Error::VenueResolutionFailed(err)
    })?;
    log::debug!("Resolved venue {provider}:{provider_place_id} as {id}");
    Ok(id)
}

pub async fn get_venue<R>(repo: &R, id: &str) -> Result<Venue>
where
    R: VenueRepo + ?Sized,
{
    Ok(repo.get_venue(id).await?)
}

#[cfg(test)]
mod tests {
    use stagecal_entities::builders::*;

    use super::*;
    use crate::{usecases::tests::MockDb, util::validate::StageInvalidation};

    #[tokio::test]
    async fn resolve_same_place_twice() {
        let db = MockDb::default();
        let first = resolve_venue(
            &db,
            ExternalPlace::build()
                .place_id("8156203")
                .name("Club FF")
                .finish(),
        )
        .await
        .unwrap();
        let second = resolve_venue(
            &db,
            ExternalPlace::build()
                .place_id("8156203")
                .name("Club FF Hongdae")
                .finish(),
        )
        .await
        .unwrap();
        assert_eq!(first, second);
        let venues = db.venues.lock();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].name, "Club FF Hongdae");
    }

    #[tokio::test]
    async fn same_place_id_of_different_providers() {
        let db = MockDb::default();
        let kakao = resolve_venue(
            &db,
            ExternalPlace::build().place_id("1").name("A").finish(),
        )
        .await
        .unwrap();
        let naver = resolve_venue(
            &db,
            ExternalPlace::build()
                .provider(PlaceProvider::Naver)
                .place_id("1")
                .name("A")
                .finish(),
        )
        .await
        .unwrap();
        assert_ne!(kakao, naver);
    }

    #[tokio::test]
    async fn concurrent_resolution_converges() {
        let db = MockDb::default();
        let place = ExternalPlace::build().place_id("42").name("Rolling Hall").finish();
        let (a, b) = tokio::join!(
            resolve_venue(&db, place.clone()),
            resolve_venue(&db, place)
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(db.venues.lock().len(), 1);
    }

    #[tokio::test]
    async fn unparsable_geo_fields_are_absent() {
        let db = MockDb::default();
        let id = resolve_venue(
            &db,
            ExternalPlace::build()
                .place_id("7")
                .name("Yes24 Live Hall")
                .lat_lng("n/a", "127.1")
                .place_url("not a url")
                .finish(),
        )
        .await
        .unwrap();
        let venue = get_venue(&db, id.as_str()).await.unwrap();
        assert!(venue.pos.is_none());
        assert!(venue.place_url.is_none());
    }

    #[tokio::test]
    async fn reject_place_without_id() {
        let db = MockDb::default();
        let err = resolve_venue(&db, ExternalPlace::build().name("Club FF").finish())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(StageInvalidation::Place(_))
        ));
        assert!(db.venues.lock().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_venue_resolution_failure() {
        let db = MockDb::default();
        db.fail_writes();
        let err = resolve_venue(
            &db,
            ExternalPlace::build().place_id("1").name("A").finish(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::VenueResolutionFailed(_)));
    }
}
