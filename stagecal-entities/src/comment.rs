use crate::{id::*, time::*, url::*};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url    : Url,
    pub width  : Option<u32>,
    pub height : Option<u32>,
}

/// A comment on a stage, optionally with a photo attached.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageComment {
    pub id         : Id,
    pub stage_id   : Id,
    pub author_id  : Id,
    pub created_at : Timestamp,
    pub text       : String,
    pub photo      : Option<Photo>,
}
