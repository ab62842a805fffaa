use super::*;

#[async_trait]
impl AlbumRepo for Connections {
    async fn create_album(&self, album: AlbumSummary) -> Result<()> {
        self.write(move |conn| create_album(conn, &album)).await
    }
    async fn get_albums(&self, ids: &[Id]) -> Result<Vec<AlbumSummary>> {
        let ids = ids.to_vec();
        self.read(move |conn| get_albums(conn, &ids)).await
    }
}

fn create_album(conn: &mut SqliteConnection, album: &AlbumSummary) -> Result<()> {
    let AlbumSummary {
        id,
        artist_id,
        title,
        cover_url,
    } = album;
    let new_album = models::NewAlbum {
        id: id.as_str(),
        artist_id: artist_id.as_str(),
        title,
        cover_url: cover_url.as_ref().map(Url::as_str),
    };
    diesel::insert_into(schema::albums::table)
        .values(&new_album)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn get_albums(conn: &mut SqliteConnection, ids: &[Id]) -> Result<Vec<AlbumSummary>> {
    use schema::albums::dsl;
    Ok(dsl::albums
        .filter(dsl::id.eq_any(ids_as_str(ids)))
        .load::<models::Album>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(
            |models::Album {
                 id,
                 artist_id,
                 title,
                 cover_url,
             }| AlbumSummary {
                id: id.into(),
                artist_id: artist_id.into(),
                title,
                cover_url: cover_url.and_then(load_url),
            },
        )
        .collect())
}
