use super::{prelude::*, query_stages_of_artists};
use crate::calendar::{MonthGrid, YearMonth};

/// Loads the stages of the given artists starting within the local
/// `month` and arranges them in a month grid.
pub async fn load_month_grid<R>(
    repo: &R,
    zone: DisplayZone,
    scope_artist_ids: &[Id],
    month: YearMonth,
) -> Result<MonthGrid>
where
    R: StageRepo + ?Sized,
{
    let (start_min, start_max) = month.utc_range(zone);
    let stages = query_stages_of_artists(repo, scope_artist_ids, start_min, start_max).await?;
    log::debug!("Loaded {} stage(s) for {month}", stages.len());
    Ok(MonthGrid::build(month, zone, stages))
}
