use crate::{geo::*, id::*, url::*};

/// The place search service a venue was taken from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlaceProvider {
    Kakao,
    Naver,
    Google,
}

/// A candidate place record as returned by an external place search.
///
/// The record is opaque input. All fields besides the ids are optional
/// and numeric fields are kept as the raw strings of the provider.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPlace {
    pub provider          : PlaceProvider,
    pub provider_place_id : String,
    pub place_name        : String,
    pub formatted_address : Option<String>,
    pub road_address      : Option<String>,
    pub phone             : Option<String>,
    pub place_url         : Option<String>,
    pub lat               : Option<String>,
    pub lng               : Option<String>,
    pub raw_payload       : Option<String>,
}

/// Normalized venue attributes used for the upsert.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct NewVenue {
    pub provider          : PlaceProvider,
    pub provider_place_id : String,
    pub name              : String,
    pub road_address      : Option<String>,
    pub formatted_address : Option<String>,
    pub phone             : Option<String>,
    pub place_url         : Option<Url>,
    pub pos               : Option<GeoPoint>,
    pub raw_payload       : Option<String>,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id                : Id,
    pub provider          : PlaceProvider,
    pub provider_place_id : String,
    pub name              : String,
    pub road_address      : Option<String>,
    pub formatted_address : Option<String>,
    pub phone             : Option<String>,
    pub place_url         : Option<Url>,
    pub pos               : Option<GeoPoint>,
    pub raw_payload       : Option<String>,
}

impl Venue {
    pub fn from_new_venue(id: Id, new_venue: NewVenue) -> Self {
        let NewVenue {
            provider,
            provider_place_id,
            name,
            road_address,
            formatted_address,
            phone,
            place_url,
            pos,
            raw_payload,
        } = new_venue;
        Self {
            id,
            provider,
            provider_place_id,
            name,
            road_address,
            formatted_address,
            phone,
            place_url,
            pos,
            raw_payload,
        }
    }

    /// The address that should be displayed, preferring the road address.
    pub fn display_address(&self) -> Option<&str> {
        self.road_address
            .as_deref()
            .or(self.formatted_address.as_deref())
    }
}
