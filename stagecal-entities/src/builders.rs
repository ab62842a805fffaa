pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{
    album_builder::*, comment_builder::*, external_place_builder::*, stage_builder::*,
};

pub mod stage_builder {

    use super::*;
    use crate::{id::*, stage::*, time::*};

    #[derive(Debug)]
    pub struct StageBuild {
        stage: Stage,
    }

    impl StageBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.stage.id = id.into();
            self
        }
        pub fn album(mut self, album_id: &str) -> Self {
            self.stage.album_id = album_id.into();
            self
        }
        pub fn venue(mut self, venue_id: Option<&str>) -> Self {
            self.stage.venue_id = venue_id.map(Id::from);
            self
        }
        /// Sets the start and derives the end like the storage does.
        pub fn start(mut self, start: &str) -> Self {
            self.stage.start = start.parse().unwrap();
            self.stage.end = Stage::preview_end(self.stage.start, self.stage.duration).unwrap();
            self
        }
        pub fn duration_hours(mut self, hours: f64) -> Self {
            self.stage.duration = StageDuration::try_from_hours(hours).unwrap();
            self.stage.end = Stage::preview_end(self.stage.start, self.stage.duration).unwrap();
            self
        }
        pub fn title(mut self, title: &str) -> Self {
            self.stage.title = Some(title.into());
            self
        }
        pub fn finish(self) -> Stage {
            self.stage
        }
    }

    impl Builder for Stage {
        type Build = StageBuild;
        fn build() -> StageBuild {
            let start = Timestamp::try_from_millis(0).unwrap();
            let duration = StageDuration::try_from_half_hours(2).unwrap();
            StageBuild {
                stage: Stage {
                    id: Id::new(),
                    album_id: Id::new(),
                    venue_id: None,
                    start,
                    duration,
                    end: Stage::preview_end(start, duration).unwrap(),
                    title: None,
                    promotion_url: None,
                    address_detail: None,
                },
            }
        }
    }
}

pub mod external_place_builder {

    use super::*;
    use crate::venue::*;

    #[derive(Debug)]
    pub struct ExternalPlaceBuild {
        place: ExternalPlace,
    }

    impl ExternalPlaceBuild {
        pub fn provider(mut self, provider: PlaceProvider) -> Self {
            self.place.provider = provider;
            self
        }
        pub fn place_id(mut self, id: &str) -> Self {
            self.place.provider_place_id = id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.place.place_name = name.into();
            self
        }
        pub fn road_address(mut self, address: &str) -> Self {
            self.place.road_address = Some(address.into());
            self
        }
        pub fn lat_lng(mut self, lat: &str, lng: &str) -> Self {
            self.place.lat = Some(lat.into());
            self.place.lng = Some(lng.into());
            self
        }
        pub fn place_url(mut self, url: &str) -> Self {
            self.place.place_url = Some(url.into());
            self
        }
        pub fn finish(self) -> ExternalPlace {
            self.place
        }
    }

    impl Builder for ExternalPlace {
        type Build = ExternalPlaceBuild;
        fn build() -> ExternalPlaceBuild {
            ExternalPlaceBuild {
                place: ExternalPlace {
                    provider: PlaceProvider::Kakao,
                    provider_place_id: "".into(),
                    place_name: "".into(),
                    formatted_address: None,
                    road_address: None,
                    phone: None,
                    place_url: None,
                    lat: None,
                    lng: None,
                    raw_payload: None,
                },
            }
        }
    }
}

pub mod album_builder {

    use super::*;
    use crate::{album::*, id::*};

    #[derive(Debug)]
    pub struct AlbumBuild {
        album: AlbumSummary,
    }

    impl AlbumBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.album.id = id.into();
            self
        }
        pub fn artist(mut self, artist_id: &str) -> Self {
            self.album.artist_id = artist_id.into();
            self
        }
        pub fn title(mut self, title: &str) -> Self {
            self.album.title = title.into();
            self
        }
        pub fn finish(self) -> AlbumSummary {
            self.album
        }
    }

    impl Builder for AlbumSummary {
        type Build = AlbumBuild;
        fn build() -> AlbumBuild {
            AlbumBuild {
                album: AlbumSummary {
                    id: Id::new(),
                    artist_id: Id::new(),
                    title: "".into(),
                    cover_url: None,
                },
            }
        }
    }
}

pub mod comment_builder {

    use super::*;
    use crate::{comment::*, id::*, time::*};

    #[derive(Debug)]
    pub struct StageCommentBuild {
        comment: StageComment,
    }

    impl StageCommentBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.comment.id = id.into();
            self
        }
        pub fn stage(mut self, stage_id: &str) -> Self {
            self.comment.stage_id = stage_id.into();
            self
        }
        pub fn text(mut self, text: &str) -> Self {
            self.comment.text = text.into();
            self
        }
        pub fn created_at(mut self, created_at: &str) -> Self {
            self.comment.created_at = created_at.parse().unwrap();
            self
        }
        pub fn photo(mut self, url: &str) -> Self {
            self.comment.photo = Some(Photo {
                url: url.parse().unwrap(),
                width: Some(1080),
                height: Some(1350),
            });
            self
        }
        pub fn finish(self) -> StageComment {
            self.comment
        }
    }

    impl Builder for StageComment {
        type Build = StageCommentBuild;
        fn build() -> StageCommentBuild {
            StageCommentBuild {
                comment: StageComment {
                    id: Id::new(),
                    stage_id: Id::new(),
                    author_id: Id::new(),
                    created_at: Timestamp::try_from_millis(0).unwrap(),
                    text: "".into(),
                    photo: None,
                },
            }
        }
    }
}
