use super::*;

#[async_trait]
impl ArtistRepo for Connections {
    async fn create_artist(&self, artist: ArtistSummary) -> Result<()> {
        self.write(move |conn| create_artist(conn, &artist)).await
    }
    async fn get_artists(&self, ids: &[Id]) -> Result<Vec<ArtistSummary>> {
        let ids = ids.to_vec();
        self.read(move |conn| get_artists(conn, &ids)).await
    }
}

fn create_artist(conn: &mut SqliteConnection, artist: &ArtistSummary) -> Result<()> {
    let ArtistSummary {
        id,
        name,
        avatar_url,
    } = artist;
    let new_artist = models::NewArtist {
        id: id.as_str(),
        name,
        avatar_url: avatar_url.as_ref().map(Url::as_str),
    };
    diesel::insert_into(schema::artists::table)
        .values(&new_artist)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn get_artists(conn: &mut SqliteConnection, ids: &[Id]) -> Result<Vec<ArtistSummary>> {
    use schema::artists::dsl;
    Ok(dsl::artists
        .filter(dsl::id.eq_any(ids_as_str(ids)))
        .load::<models::Artist>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(
            |models::Artist {
                 id,
                 name,
                 avatar_url,
             }| ArtistSummary {
                id: id.into(),
                name,
                avatar_url: avatar_url.and_then(load_url),
            },
        )
        .collect())
}
