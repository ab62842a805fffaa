use duration_str::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("stagecal.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub calendar: Option<Calendar>,
    pub upcoming: Option<Upcoming>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub connection_sqlite: String,
    pub connection_pool_size: u8,
}

impl Default for Db {
    fn default() -> Self {
        Config::default().db.expect("DB configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Calendar {
    pub display_utc_offset: String,
}

impl Default for Calendar {
    fn default() -> Self {
        Config::default().calendar.expect("Calendar configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Upcoming {
    pub preview_limit: u64,
    pub page_size: u64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub window: Duration,
}

impl Default for Upcoming {
    fn default() -> Self {
        Config::default().upcoming.expect("Upcoming configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.db.is_some());
        assert!(cfg.calendar.is_some());
        assert!(cfg.upcoming.is_some());
    }

    #[test]
    fn default_upcoming_config() {
        let cfg = Upcoming::default();
        assert_eq!(cfg.preview_limit, 5);
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.window, Duration::from_secs(30 * 24 * 60 * 60));
    }

    #[test]
    fn sections_are_optional() {
        let cfg: Config = toml::from_str("[db]\nconnection-sqlite = \"x.db\"\nconnection-pool-size = 1\n").unwrap();
        assert!(cfg.calendar.is_none());
        assert!(cfg.upcoming.is_none());
    }
}
