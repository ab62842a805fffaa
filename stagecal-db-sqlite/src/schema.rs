///////////////////////////////////////////////////////////////////////
// Artists & albums
///////////////////////////////////////////////////////////////////////

table! {
    artists (id) {
        id -> Text,
        name -> Text,
        avatar_url -> Nullable<Text>,
    }
}

table! {
    albums (id) {
        id -> Text,
        artist_id -> Text,
        title -> Text,
        cover_url -> Nullable<Text>,
    }
}

///////////////////////////////////////////////////////////////////////
// Venues
///////////////////////////////////////////////////////////////////////

table! {
    venues (id) {
        id -> Text,
        provider -> Text,
        provider_place_id -> Text,
        name -> Text,
        road_address -> Nullable<Text>,
        formatted_address -> Nullable<Text>,
        phone -> Nullable<Text>,
        place_url -> Nullable<Text>,
        lat -> Nullable<Double>,
        lng -> Nullable<Double>,
        raw_payload -> Nullable<Text>,
    }
}

///////////////////////////////////////////////////////////////////////
// Stages
///////////////////////////////////////////////////////////////////////

table! {
    stages (id) {
        id -> Text,
        album_id -> Text,
        venue_id -> Nullable<Text>,
        start_at -> BigInt,
        duration_half_hours -> Integer,
        // generated column, read-only
        end_at -> BigInt,
        title -> Nullable<Text>,
        promotion_url -> Nullable<Text>,
        address_detail -> Nullable<Text>,
    }
}

table! {
    stage_comments (id) {
        id -> Text,
        stage_id -> Text,
        author_id -> Text,
        created_at -> BigInt,
        body -> Text,
        photo_url -> Nullable<Text>,
        photo_width -> Nullable<Integer>,
        photo_height -> Nullable<Integer>,
    }
}

joinable!(stage_comments -> stages (stage_id));

allow_tables_to_appear_in_same_query!(artists, albums, venues, stages, stage_comments);
