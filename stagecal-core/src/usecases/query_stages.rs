use super::prelude::*;

/// All stages of the given artists that start within `[start_min, start_max]`.
pub async fn query_stages_of_artists<R>(
    repo: &R,
    artist_ids: &[Id],
    start_min: Timestamp,
    start_max: Timestamp,
) -> Result<Vec<Stage>>
where
    R: StageRepo + ?Sized,
{
    if artist_ids.is_empty() {
        return Ok(vec![]);
    }
    let query = StageQuery {
        start_min: Some(start_min),
        start_max: Some(start_max),
        artist_ids: Some(artist_ids.to_vec()),
        ..Default::default()
    };
    Ok(repo.query_stages(&query).await?)
}

/// All stages of an album in chronological order.
pub async fn load_album_stages<R>(repo: &R, album_id: &str) -> Result<Vec<Stage>>
where
    R: StageRepo + ?Sized,
{
    let query = StageQuery {
        album_ids: Some(vec![album_id.into()]),
        ..Default::default()
    };
    Ok(repo.query_stages(&query).await?)
}
