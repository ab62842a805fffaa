// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use anyhow::anyhow;
use async_trait::async_trait;
use diesel::{
    self,
    prelude::{Connection as DieselConnection, *},
    result::{DatabaseErrorKind, Error as DieselError},
};

use stagecal_core::{
    entities::*,
    repositories::{self as repo, *},
};

use super::{models, schema, util::load_url, Connections};

mod album;
mod artist;
mod comment;
mod stage;
mod venue;


type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn load_timestamp(millis: i64) -> Result<Timestamp> {
    Timestamp::try_from_millis(millis)
        .map_err(|_| anyhow!("Invalid timestamp: {millis} ms").into())
}

fn ids_as_str(ids: &[Id]) -> Vec<&str> {
    ids.iter().map(Id::as_str).collect()
}

// Limits and offsets beyond i64::MAX are meaningless for SQLite
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
