use super::*;

#[async_trait]
impl VenueRepo for Connections {
    async fn upsert_venue(&self, venue: NewVenue) -> Result<Id> {
        self.write(move |conn| upsert_venue(conn, &venue)).await
    }
    async fn get_venue(&self, id: &str) -> Result<Venue> {
        let id = id.to_owned();
        self.read(move |conn| get_venue(conn, &id)).await
    }
    async fn get_venues(&self, ids: &[Id]) -> Result<Vec<Venue>> {
        let ids = ids.to_vec();
        self.read(move |conn| get_venues(conn, &ids)).await
    }
}

fn upsert_venue(conn: &mut SqliteConnection, venue: &NewVenue) -> Result<Id> {
    let NewVenue {
        provider,
        provider_place_id,
        name,
        road_address,
        formatted_address,
        phone,
        place_url,
        pos,
        raw_payload,
    } = venue;
    let id = Id::new();
    let provider: &str = provider.as_ref();
    let changeset = models::VenueChangeset {
        name,
        road_address: road_address.as_deref(),
        formatted_address: formatted_address.as_deref(),
        phone: phone.as_deref(),
        place_url: place_url.as_ref().map(Url::as_str),
        lat: pos.map(|pos| pos.lat()),
        lng: pos.map(|pos| pos.lng()),
        raw_payload: raw_payload.as_deref(),
    };
    let new_venue = models::NewVenue {
        id: id.as_str(),
        provider,
        provider_place_id,
        name: changeset.name,
        road_address: changeset.road_address,
        formatted_address: changeset.formatted_address,
        phone: changeset.phone,
        place_url: changeset.place_url,
        lat: changeset.lat,
        lng: changeset.lng,
        raw_payload: changeset.raw_payload,
    };
    let stored_id = conn
        .transaction::<_, DieselError, _>(|conn| {
            use schema::venues::dsl;
            // Last write wins, the id of an existing venue is kept
            diesel::insert_into(dsl::venues)
                .values(&new_venue)
                .on_conflict((dsl::provider, dsl::provider_place_id))
                .do_update()
                .set(&changeset)
                .execute(conn)?;
            dsl::venues
                .select(dsl::id)
                .filter(dsl::provider.eq(provider))
                .filter(dsl::provider_place_id.eq(provider_place_id.as_str()))
                .first::<String>(conn)
        })
        .map_err(from_diesel_err)?;
    if stored_id != id.as_str() {
        log::debug!("Updated existing venue {stored_id} from {provider} place {provider_place_id}");
    }
    Ok(stored_id.into())
}

fn load_venue(venue: models::Venue) -> Result<Venue> {
    let models::Venue {
        id,
        provider,
        provider_place_id,
        name,
        road_address,
        formatted_address,
        phone,
        place_url,
        lat,
        lng,
        raw_payload,
    } = venue;
    let provider = provider
        .parse::<PlaceProvider>()
        .map_err(|_| anyhow!("Invalid place provider: {provider}"))?;
    let pos = match (lat, lng) {
        (Some(lat), Some(lng)) => GeoPoint::try_from_lat_lng_deg(lat, lng),
        _ => None,
    };
    Ok(Venue {
        id: id.into(),
        provider,
        provider_place_id,
        name,
        road_address,
        formatted_address,
        phone,
        place_url: place_url.and_then(load_url),
        pos,
        raw_payload,
    })
}

fn get_venue(conn: &mut SqliteConnection, id: &str) -> Result<Venue> {
    use schema::venues::dsl;
    let venue = dsl::venues
        .filter(dsl::id.eq(id))
        .first::<models::Venue>(conn)
        .map_err(from_diesel_err)?;
    load_venue(venue)
}

fn get_venues(conn: &mut SqliteConnection, ids: &[Id]) -> Result<Vec<Venue>> {
    use schema::venues::dsl;
    dsl::venues
        .filter(dsl::id.eq_any(ids_as_str(ids)))
        .load::<models::Venue>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_venue)
        .collect()
}
