use super::*;

#[async_trait]
impl StageCommentRepo for Connections {
    async fn create_stage_comment(&self, comment: StageComment) -> Result<()> {
        self.write(move |conn| create_stage_comment(conn, &comment))
            .await
    }
    async fn load_comments_of_stages(&self, stage_ids: &[Id]) -> Result<Vec<StageComment>> {
        let stage_ids = stage_ids.to_vec();
        self.read(move |conn| load_comments_of_stages(conn, &stage_ids))
            .await
    }
}

fn create_stage_comment(conn: &mut SqliteConnection, comment: &StageComment) -> Result<()> {
    let StageComment {
        id,
        stage_id,
        author_id,
        created_at,
        text,
        photo,
    } = comment;
    let dimension = |value: Option<u32>| -> Result<Option<i32>> {
        value
            .map(i32::try_from)
            .transpose()
            .map_err(|_| anyhow!("Photo dimension out of range").into())
    };
    let new_comment = models::NewStageComment {
        id: id.as_str(),
        stage_id: stage_id.as_str(),
        author_id: author_id.as_str(),
        created_at: created_at.as_millis(),
        body: text,
        photo_url: photo.as_ref().map(|p| p.url.as_str()),
        photo_width: dimension(photo.as_ref().and_then(|p| p.width))?,
        photo_height: dimension(photo.as_ref().and_then(|p| p.height))?,
    };
    diesel::insert_into(schema::stage_comments::table)
        .values(&new_comment)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn load_comment(comment: models::StageComment) -> Result<StageComment> {
    let models::StageComment {
        id,
        stage_id,
        author_id,
        created_at,
        body,
        photo_url,
        photo_width,
        photo_height,
    } = comment;
    let photo = photo_url.and_then(load_url).map(|url| Photo {
        url,
        width: photo_width.and_then(|w| u32::try_from(w).ok()),
        height: photo_height.and_then(|h| u32::try_from(h).ok()),
    });
    Ok(StageComment {
        id: id.into(),
        stage_id: stage_id.into(),
        author_id: author_id.into(),
        created_at: load_timestamp(created_at)?,
        text: body,
        photo,
    })
}

fn load_comments_of_stages(
    conn: &mut SqliteConnection,
    stage_ids: &[Id],
) -> Result<Vec<StageComment>> {
    use schema::stage_comments::dsl;
    dsl::stage_comments
        .filter(dsl::stage_id.eq_any(ids_as_str(stage_ids)))
        .order_by((dsl::created_at, dsl::id))
        .load::<models::StageComment>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_comment)
        .collect()
}
