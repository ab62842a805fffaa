use anyhow::{anyhow, Result};
use stagecal_entities::time::DisplayZone;
use std::{env, fs, io::ErrorKind, path::Path};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "stagecal.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";

pub struct Config {
    pub db: Db,
    pub calendar: Calendar,
    pub upcoming: Upcoming,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u8,
}

pub struct Calendar {
    pub display_zone: DisplayZone,
}

pub struct Upcoming {
    pub preview_limit: u64,
    pub page_size: u64,
    pub window: time::Duration,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            calendar,
            upcoming,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db.unwrap_or_default();
        if connection_pool_size == 0 {
            return Err(anyhow!("The connection pool size must not be 0"));
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::Calendar { display_utc_offset } = calendar.unwrap_or_default();
        let display_zone = display_utc_offset
            .parse()
            .map_err(|_| anyhow!("Invalid display UTC offset '{display_utc_offset}'"))?;
        let calendar = Calendar { display_zone };

        let raw::Upcoming {
            preview_limit,
            page_size,
            window,
        } = upcoming.unwrap_or_default();
        if preview_limit == 0 || page_size == 0 {
            return Err(anyhow!("Upcoming preview limit and page size must not be 0"));
        }
        let window = time::Duration::try_from(window)?;
        let upcoming = Upcoming {
            preview_limit,
            page_size,
            window,
        };

        Ok(Self {
            db,
            calendar,
            upcoming,
        })
    }
}
