#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable)]
#[diesel(table_name = artists)]
pub struct NewArtist<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub avatar_url: Option<&'a str>,
}

#[derive(Queryable)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = albums)]
pub struct NewAlbum<'a> {
    pub id: &'a str,
    pub artist_id: &'a str,
    pub title: &'a str,
    pub cover_url: Option<&'a str>,
}

#[derive(Queryable)]
pub struct Album {
    pub id: String,
    pub artist_id: String,
    pub title: String,
    pub cover_url: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = venues)]
pub struct NewVenue<'a> {
    pub id: &'a str,
    pub provider: &'a str,
    pub provider_place_id: &'a str,
    pub name: &'a str,
    pub road_address: Option<&'a str>,
    pub formatted_address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub place_url: Option<&'a str>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub raw_payload: Option<&'a str>,
}

// Overwrites all attributes of an existing venue
#[derive(AsChangeset)]
#[diesel(table_name = venues, treat_none_as_null = true)]
pub struct VenueChangeset<'a> {
    pub name: &'a str,
    pub road_address: Option<&'a str>,
    pub formatted_address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub place_url: Option<&'a str>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub raw_payload: Option<&'a str>,
}

#[derive(Queryable)]
pub struct Venue {
    pub id: String,
    pub provider: String,
    pub provider_place_id: String,
    pub name: String,
    pub road_address: Option<String>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub place_url: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub raw_payload: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = stages)]
pub struct NewStage<'a> {
    pub id: &'a str,
    pub album_id: &'a str,
    pub venue_id: Option<&'a str>,
    pub start_at: i64,
    pub duration_half_hours: i32,
    pub title: Option<&'a str>,
    pub promotion_url: Option<&'a str>,
    pub address_detail: Option<&'a str>,
}

// `None` leaves a column untouched, `Some(None)` sets it to NULL
#[derive(AsChangeset)]
#[diesel(table_name = stages)]
pub struct StageChangeset<'a> {
    pub album_id: Option<&'a str>,
    pub venue_id: Option<Option<&'a str>>,
    pub start_at: Option<i64>,
    pub duration_half_hours: Option<i32>,
    pub title: Option<Option<&'a str>>,
    pub promotion_url: Option<Option<&'a str>>,
    pub address_detail: Option<Option<&'a str>>,
}

#[derive(Queryable)]
pub struct Stage {
    pub id: String,
    pub album_id: String,
    pub venue_id: Option<String>,
    pub start_at: i64,
    pub duration_half_hours: i32,
    pub end_at: i64,
    pub title: Option<String>,
    pub promotion_url: Option<String>,
    pub address_detail: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = stage_comments)]
pub struct NewStageComment<'a> {
    pub id: &'a str,
    pub stage_id: &'a str,
    pub author_id: &'a str,
    pub created_at: i64,
    pub body: &'a str,
    pub photo_url: Option<&'a str>,
    pub photo_width: Option<i32>,
    pub photo_height: Option<i32>,
}

#[derive(Queryable)]
pub struct StageComment {
    pub id: String,
    pub stage_id: String,
    pub author_id: String,
    pub created_at: i64,
    pub body: String,
    pub photo_url: Option<String>,
    pub photo_width: Option<i32>,
    pub photo_height: Option<i32>,
}
