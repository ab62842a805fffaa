use thiserror::Error;

use crate::{entities::*, util::parse_url_param};

pub trait Validate {
    type Error;
    fn validate(&self) -> Result<(), Self::Error>;
}

pub trait AutoCorrect {
    fn auto_correct(self) -> Self;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceInvalidation {
    #[error("Missing place id of the provider")]
    ProviderPlaceId,
    #[error("Missing place name")]
    PlaceName,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageInvalidation {
    #[error("Missing album")]
    AlbumId,
    #[error("The start must be an UTC instant")]
    StartInstant,
    #[error("The duration must be a multiple of 0.5 hours within (0, 8]")]
    Duration,
    #[error("Invalid promotion URL")]
    PromotionUrl,
    #[error(transparent)]
    Place(PlaceInvalidation),
}

impl From<PlaceInvalidation> for StageInvalidation {
    fn from(err: PlaceInvalidation) -> Self {
        Self::Place(err)
    }
}

/// Only strict UTC instants like `2025-07-11T15:00:00.000Z` are accepted.
pub fn is_valid_instant(s: &str) -> bool {
    Timestamp::parse_utc(s).is_ok()
}

pub fn is_valid_duration(hours: f64) -> bool {
    StageDuration::try_from_hours(hours).is_ok()
}

pub fn stage_start(s: &str) -> Result<Timestamp, StageInvalidation> {
    Timestamp::parse_utc(s).map_err(|_| StageInvalidation::StartInstant)
}

pub fn stage_duration(hours: f64) -> Result<StageDuration, StageInvalidation> {
    StageDuration::try_from_hours(hours).map_err(|_| StageInvalidation::Duration)
}

pub fn promotion_url(url: &str) -> Result<Option<Url>, StageInvalidation> {
    parse_url_param(url).map_err(|_| StageInvalidation::PromotionUrl)
}

pub fn album_id(id: &str) -> Result<Id, StageInvalidation> {
    let id = Id::from(id.trim());
    if !id.is_valid() {
        return Err(StageInvalidation::AlbumId);
    }
    Ok(id)
}

impl Validate for ExternalPlace {
    type Error = PlaceInvalidation;
    fn validate(&self) -> Result<(), Self::Error> {
        if self.provider_place_id.trim().is_empty() {
            return Err(Self::Error::ProviderPlaceId);
        }
        if self.place_name.trim().is_empty() {
            return Err(Self::Error::PlaceName);
        }
        Ok(())
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl AutoCorrect for ExternalPlace {
    fn auto_correct(mut self) -> Self {
        self.provider_place_id = self.provider_place_id.trim().to_owned();
        self.place_name = self.place_name.trim().to_owned();
        self.formatted_address = non_empty(self.formatted_address);
        self.road_address = non_empty(self.road_address);
        self.phone = non_empty(self.phone);
        self.place_url = non_empty(self.place_url);
        self.lat = non_empty(self.lat);
        self.lng = non_empty(self.lng);
        self.raw_payload = self.raw_payload.filter(|x| !x.is_empty());
        self
    }
}

impl AutoCorrect for NewStage {
    fn auto_correct(mut self) -> Self {
        self.title = non_empty(self.title);
        self.address_detail = non_empty(self.address_detail);
        self
    }
}
