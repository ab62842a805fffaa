use std::{cmp::Ordering, collections::HashMap};

use super::prelude::*;

/// What is known about a stage when presenting its media.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageMeta {
    pub title: Option<String>,
    pub start: Option<Timestamp>,
}

impl From<&Stage> for StageMeta {
    fn from(from: &Stage) -> Self {
        Self {
            title: from.title.clone(),
            start: Some(from.start),
        }
    }
}

/// All photo comments of a single stage.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMediaGroup {
    pub stage_id : Id,
    // Blank if the stage has no title or is unknown
    pub title    : String,
    pub start    : Option<Timestamp>,
    pub items    : Vec<StageComment>,
}

// Latest start first, unknown starts last
fn cmp_start_desc(lhs: &Option<Timestamp>, rhs: &Option<Timestamp>) -> Ordering {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => rhs.cmp(lhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Buckets the photo comments by their stage.
///
/// Comments without a photo are dropped. Within a group the input
/// order is preserved, groups are ordered by the start of their
/// stage (latest first) and groups of unknown stages come last.
pub fn group_stage_media(
    comments: Vec<StageComment>,
    stages: &HashMap<Id, StageMeta>,
) -> Vec<StageMediaGroup> {
    let mut groups: Vec<StageMediaGroup> = Vec::new();
    let mut index: HashMap<Id, usize> = HashMap::new();
    for comment in comments.into_iter().filter(|c| c.photo.is_some()) {
        if let Some(&i) = index.get(&comment.stage_id) {
            groups[i].items.push(comment);
            continue;
        }
        let meta = stages.get(&comment.stage_id);
        let title = meta
            .and_then(|m| m.title.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();
        index.insert(comment.stage_id.clone(), groups.len());
        groups.push(StageMediaGroup {
            stage_id: comment.stage_id.clone(),
            title,
            start: meta.and_then(|m| m.start),
            items: vec![comment],
        });
    }
    // Stable: groups with equal starts keep their order of appearance
    groups.sort_by(|lhs, rhs| cmp_start_desc(&lhs.start, &rhs.start));
    groups
}

/// Loads the comments of the given stages and groups their photos.
pub async fn load_stage_media<R>(repo: &R, stage_ids: &[Id]) -> Result<Vec<StageMediaGroup>>
where
    R: StageRepo + StageCommentRepo + ?Sized,
{
    if stage_ids.is_empty() {
        return Ok(vec![]);
    }
    let (comments, stages) = futures::try_join!(
        repo.load_comments_of_stages(stage_ids),
        repo.get_stages(stage_ids)
    )?;
    let metas: HashMap<_, _> = stages
        .iter()
        .map(|s| (s.id.clone(), StageMeta::from(s)))
        .collect();
    let groups = group_stage_media(comments, &metas);
    log::debug!(
        "Grouped the media of {} stage(s) into {} group(s)",
        stage_ids.len(),
        groups.len()
    );
    Ok(groups)
}
