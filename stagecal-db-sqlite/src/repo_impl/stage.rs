use super::*;

#[async_trait]
impl StageRepo for Connections {
    async fn create_stage(&self, stage: NewStage) -> Result<()> {
        self.write(move |conn| create_stage(conn, &stage)).await
    }
    async fn update_stage(&self, id: &str, changes: StageChangeset) -> Result<()> {
        let id = id.to_owned();
        self.write(move |conn| update_stage(conn, &id, &changes))
            .await
    }
    async fn delete_stage(&self, id: &str) -> Result<()> {
        let id = id.to_owned();
        self.write(move |conn| delete_stage(conn, &id)).await
    }
    async fn get_stage(&self, id: &str) -> Result<Stage> {
        let id = id.to_owned();
        self.read(move |conn| get_stage(conn, &id)).await
    }
    async fn get_stages(&self, ids: &[Id]) -> Result<Vec<Stage>> {
        let ids = ids.to_vec();
        self.read(move |conn| get_stages(conn, &ids)).await
    }
    async fn query_stages(&self, query: &StageQuery) -> Result<Vec<Stage>> {
        let query = query.clone();
        self.read(move |conn| query_stages(conn, &query)).await
    }
}

fn create_stage(conn: &mut SqliteConnection, stage: &NewStage) -> Result<()> {
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
    let new_stage = models::NewStage {
        id: id.as_str(),
        album_id: album_id.as_str(),
        venue_id: venue_id.as_ref().map(Id::as_str),
        start_at: start.as_millis(),
        duration_half_hours: i32::from(duration.half_hours()),
        title: title.as_deref(),
        promotion_url: promotion_url.as_ref().map(Url::as_str),
        address_detail: address_detail.as_deref(),
    };
    diesel::insert_into(schema::stages::table)
        .values(&new_stage)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn update_stage(conn: &mut SqliteConnection, id: &str, changes: &StageChangeset) -> Result<()> {
    use schema::stages::dsl;
    if changes.is_empty() {
        // Diesel refuses empty changesets
        return get_stage(conn, id).map(|_| ());
    }
    let StageChangeset {
        album_id,
        venue_id,
        start,
        duration,
        title,
        promotion_url,
        address_detail,
    } = changes;
    let changeset = models::StageChangeset {
        album_id: album_id.as_ref().map(Id::as_str),
        venue_id: venue_id.as_ref().map(|id| id.as_ref().map(Id::as_str)),
        start_at: start.map(|start| start.as_millis()),
        duration_half_hours: duration.map(|d| i32::from(d.half_hours())),
        title: title.as_ref().map(Option::as_deref),
        promotion_url: promotion_url
            .as_ref()
            .map(|url| url.as_ref().map(Url::as_str)),
        address_detail: address_detail.as_ref().map(Option::as_deref),
    };
    let count = diesel::update(dsl::stages.filter(dsl::id.eq(id)))
        .set(&changeset)
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

fn delete_stage(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    use schema::stages::dsl;
    // Comments are deleted by the ON DELETE CASCADE constraint
    let count = diesel::delete(dsl::stages.filter(dsl::id.eq(id)))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

fn load_stage(stage: models::Stage) -> Result<Stage> {
    let models::Stage {
        id,
        album_id,
        venue_id,
        start_at,
        duration_half_hours,
        end_at,
        title,
        promotion_url,
        address_detail,
    } = stage;
    let duration = u8::try_from(duration_half_hours)
        .ok()
        .and_then(|half_hours| StageDuration::try_from_half_hours(half_hours).ok())
        .ok_or_else(|| anyhow!("Invalid stage duration: {duration_half_hours} half hours"))?;
    Ok(Stage {
        id: id.into(),
        album_id: album_id.into(),
        venue_id: venue_id.map(Id::from),
        start: load_timestamp(start_at)?,
        duration,
        end: load_timestamp(end_at)?,
        title,
        promotion_url: promotion_url.and_then(load_url),
        address_detail,
    })
}

fn get_stage(conn: &mut SqliteConnection, id: &str) -> Result<Stage> {
    use schema::stages::dsl;
    let stage = dsl::stages
        .filter(dsl::id.eq(id))
        .first::<models::Stage>(conn)
        .map_err(from_diesel_err)?;
    load_stage(stage)
}

fn get_stages(conn: &mut SqliteConnection, ids: &[Id]) -> Result<Vec<Stage>> {
    use schema::stages::dsl;
    dsl::stages
        .filter(dsl::id.eq_any(ids_as_str(ids)))
        .order_by(dsl::start_at)
        .load::<models::Stage>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_stage)
        .collect()
}

fn query_stages(conn: &mut SqliteConnection, query: &StageQuery) -> Result<Vec<Stage>> {
    use schema::{albums::dsl as a_dsl, stages::dsl as s_dsl};

    let StageQuery {
        start_min,
        start_max,
        album_ids,
        artist_ids,
        pagination,
    } = query;

    let mut db_query = s_dsl::stages.into_boxed();
    if let Some(start_min) = start_min {
        db_query = db_query.filter(s_dsl::start_at.ge(start_min.as_millis()));
    }
    if let Some(start_max) = start_max {
        db_query = db_query.filter(s_dsl::start_at.le(start_max.as_millis()));
    }
    if let Some(album_ids) = album_ids {
        db_query = db_query.filter(s_dsl::album_id.eq_any(ids_as_str(album_ids)));
    }
    if let Some(artist_ids) = artist_ids {
        let album_ids_of_artists = a_dsl::albums
            .select(a_dsl::id)
            .filter(a_dsl::artist_id.eq_any(ids_as_str(artist_ids)));
        db_query = db_query.filter(s_dsl::album_id.eq_any(album_ids_of_artists));
    }
    db_query = db_query.order_by((s_dsl::start_at, s_dsl::id));

    let Pagination { offset, limit } = pagination;
    if let Some(offset) = offset {
        db_query = db_query.offset(to_i64(*offset));
        // SQLite does not support an OFFSET without a LIMIT
        if limit.is_none() {
            db_query = db_query.limit(i64::MAX);
        }
    }
    if let Some(limit) = limit {
        db_query = db_query.limit(to_i64(*limit));
    }

    db_query
        .load::<models::Stage>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_stage)
        .collect()
}
