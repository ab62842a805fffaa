use super::prelude::*;

/// Removes a stage.
///
/// Dependent comments and photos are removed by the storage,
/// this usecase does not check for orphans.
pub async fn delete_stage<R>(repo: &R, id: &str) -> Result<()>
where
    R: StageRepo + ?Sized,
{
    repo.delete_stage(id).await.map_err(|err| {
        log::warn!("Failed to delete stage {id}: {err}");
        err
    })?;
    log::info!("Deleted stage {id}");
    Ok(())
}
