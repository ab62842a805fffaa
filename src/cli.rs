use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use stagecal_core::{
    calendar::{CalendarAggregator, CalendarCell, MonthGrid, YearMonth},
    entities::*,
    upcoming::UpcomingAggregator,
    usecases::{self, StageDraft, UpcomingMode, UpcomingQuery},
    util::sequence::LoadOutcome,
};
use stagecal_db_sqlite::{run_embedded_database_migrations, Connections};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "stagecal", version, about = "Scheduling and calendar aggregation of stages")]
pub struct Cli {
    /// Configuration file (default: stagecal.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the calendar of a month for the given artists
    Calendar {
        #[arg(long = "artist", value_name = "ID", required = true)]
        artist_ids: Vec<String>,
        /// YYYY-MM (default: the current month)
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Print upcoming stages grouped by their local date
    Upcoming {
        /// Length of the window in days (default: from the configuration)
        #[arg(long)]
        days: Option<u32>,
        /// Page number, starting at 0
        #[arg(long, default_value_t = 0)]
        page: u64,
        /// Only print the first few stages
        #[arg(long, default_value_t = false)]
        preview: bool,
    },
    /// Print the photos of stages grouped by stage
    Media {
        #[arg(long = "stage", value_name = "ID", required = true)]
        stage_ids: Vec<String>,
    },
    /// Create a new stage and print its id and end
    CreateStage(CreateStageArgs),
    /// Delete a stage including its comments
    DeleteStage { id: String },
}

#[derive(Debug, Args)]
pub struct CreateStageArgs {
    #[arg(long)]
    album: String,
    /// UTC instant, e.g. 2025-07-11T15:00:00.000Z
    #[arg(long)]
    start: String,
    /// Hours in half-hour steps between 0.5 and 8
    #[arg(long)]
    duration: f64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    promotion_url: Option<String>,
    #[arg(long)]
    address_detail: Option<String>,
    #[command(flatten)]
    place: PlaceArgs,
}

/// A place as selected from an external place search.
#[derive(Debug, Args)]
pub struct PlaceArgs {
    #[arg(long, default_value = "kakao")]
    place_provider: PlaceProvider,
    #[arg(long)]
    place_id: Option<String>,
    #[arg(long, requires = "place_id")]
    place_name: Option<String>,
    #[arg(long, requires = "place_id")]
    place_address: Option<String>,
    #[arg(long, requires = "place_id")]
    place_lat: Option<String>,
    #[arg(long, requires = "place_id")]
    place_lng: Option<String>,
    #[arg(long, requires = "place_id")]
    place_url: Option<String>,
}

impl PlaceArgs {
    fn into_external_place(self) -> Option<ExternalPlace> {
        let Self {
            place_provider,
            place_id,
            place_name,
            place_address,
            place_lat,
            place_lng,
            place_url,
        } = self;
        place_id.map(|provider_place_id| ExternalPlace {
            provider: place_provider,
            provider_place_id,
            place_name: place_name.unwrap_or_default(),
            formatted_address: None,
            road_address: place_address,
            phone: None,
            place_url,
            lat: place_lat,
            lng: place_lng,
            raw_payload: None,
        })
    }
}

pub async fn run(cli: Cli, cfg: Config) -> Result<()> {
    log::info!(
        "Connecting to SQLite database '{}' (pool size = {})",
        cfg.db.conn_sqlite,
        cfg.db.conn_pool_size
    );
    let connections = Connections::init(&cfg.db.conn_sqlite, cfg.db.conn_pool_size.into())?;
    run_embedded_database_migrations(&connections)?;
    let db = Arc::new(connections);

    match cli.command {
        Command::Calendar { artist_ids, month } => {
            let artist_ids: Vec<Id> = artist_ids.into_iter().map(Id::from).collect();
            let calendar = CalendarAggregator::new(db, cfg.calendar.display_zone);
            if let Some(month) = month {
                let visible = calendar.snapshot().visible_month();
                let delta = months_between(visible, month);
                calendar.set_month(delta);
            }
            expect_applied(calendar.load_visible_month(&artist_ids).await, || {
                calendar.snapshot().error().map(ToOwned::to_owned)
            })?;
            print_month_grid(calendar.snapshot().grid());
        }
        Command::Upcoming {
            days,
            page,
            preview,
        } => {
            let window = days
                .map(|days| time::Duration::days(i64::from(days)))
                .unwrap_or(cfg.upcoming.window);
            let mode = if preview {
                UpcomingMode::Preview {
                    limit: cfg.upcoming.preview_limit,
                }
            } else {
                UpcomingMode::Page {
                    page,
                    page_size: cfg.upcoming.page_size,
                }
            };
            let query = UpcomingQuery::window(Timestamp::now(), window, mode)
                .ok_or_else(|| anyhow!("The upcoming window is out of range"))?;
            let upcoming = UpcomingAggregator::new(db);
            expect_applied(upcoming.load(query).await, || {
                upcoming.snapshot().error().map(ToOwned::to_owned)
            })?;
            let state = upcoming.snapshot();
            for (date, rows) in state.grouped(cfg.calendar.display_zone) {
                println!("{date}");
                for row in rows {
                    let local = cfg.calendar.display_zone.to_local(row.stage.start);
                    println!(
                        "  {:02}:{:02}  {}  {}  @ {}",
                        local.hour(),
                        local.minute(),
                        row.artist.as_ref().map(|a| a.name.as_str()).unwrap_or("?"),
                        row.album.as_ref().map(|a| a.title.as_str()).unwrap_or("?"),
                        row.venue.as_ref().map(|v| v.name.as_str()).unwrap_or("-"),
                    );
                }
            }
            if matches!(mode, UpcomingMode::Page { .. }) && state.has_more() {
                println!("(has more, try --page {})", page + 1);
            }
        }
        Command::Media { stage_ids } => {
            let stage_ids: Vec<Id> = stage_ids.into_iter().map(Id::from).collect();
            let groups = usecases::load_stage_media(&*db, &stage_ids).await?;
            for group in groups {
                let start = group
                    .start
                    .map(|start| start.to_string())
                    .unwrap_or_else(|| "unknown".to_owned());
                let title = if group.title.is_empty() {
                    "(untitled)"
                } else {
                    group.title.as_str()
                };
                println!("{title} ({start}) [{}]", group.stage_id);
                for comment in group.items {
                    if let Some(photo) = comment.photo {
                        println!("  {}", photo.url);
                    }
                }
            }
        }
        Command::CreateStage(args) => {
            let CreateStageArgs {
                album,
                start,
                duration,
                title,
                promotion_url,
                address_detail,
                place,
            } = args;
            let draft = StageDraft {
                album_id: album,
                place: place.into_external_place(),
                start,
                duration_hours: duration,
                title,
                promotion_url,
                address_detail,
            };
            let id = usecases::create_stage(&*db, draft).await?;
            let stage = usecases::get_stage(&*db, id.as_str()).await?;
            println!("{id}");
            println!("ends at {}", stage.end);
        }
        Command::DeleteStage { id } => {
            usecases::delete_stage(&*db, &id).await?;
            println!("Deleted stage {id}");
        }
    }
    Ok(())
}

fn months_between(from: YearMonth, to: YearMonth) -> i32 {
    (to.year() - from.year()) * 12 + i32::from(u8::from(to.month()))
        - i32::from(u8::from(from.month()))
}

fn expect_applied(outcome: LoadOutcome, error: impl FnOnce() -> Option<String>) -> Result<()> {
    match outcome {
        LoadOutcome::Applied => Ok(()),
        LoadOutcome::Failed => Err(anyhow!(error().unwrap_or_else(|| "Loading failed".into()))),
        LoadOutcome::Discarded => Err(anyhow!("The response has been discarded")),
    }
}

fn print_month_grid(grid: &MonthGrid) {
    println!("{}", grid.month());
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in grid.weeks() {
        let line: Vec<_> = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Blank => "    ".to_owned(),
                CalendarCell::Day { date, stages } if stages.is_empty() => {
                    format!("  {:02}", date.day())
                }
                CalendarCell::Day { date, stages } => format!("{:02}*{}", date.day(), stages.len()),
            })
            .collect();
        println!(" {}", line.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create_stage_with_place() {
        let cli = Cli::try_parse_from([
            "stagecal",
            "create-stage",
            "--album",
            "a1",
            "--start",
            "2025-07-11T15:00:00.000Z",
            "--duration",
            "1.5",
            "--place-id",
            "8315417",
            "--place-name",
            "Club FF",
        ])
        .unwrap();
        let Command::CreateStage(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.duration, 1.5);
        let place = args.place.into_external_place().unwrap();
        assert_eq!(place.provider, PlaceProvider::Kakao);
        assert_eq!(place.place_name, "Club FF");
    }

    #[test]
    fn place_attributes_require_a_place_id() {
        assert!(Cli::try_parse_from([
            "stagecal",
            "create-stage",
            "--album",
            "a1",
            "--start",
            "2025-07-11T15:00:00Z",
            "--duration",
            "2",
            "--place-name",
            "Club FF",
        ])
        .is_err());
    }

    #[test]
    fn parse_calendar_month() {
        let cli = Cli::try_parse_from([
            "stagecal", "calendar", "--artist", "x", "--artist", "y", "--month", "2025-07",
        ])
        .unwrap();
        let Command::Calendar { artist_ids, month } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(artist_ids, vec!["x", "y"]);
        assert_eq!(month.unwrap().to_string(), "2025-07");
    }

    #[test]
    fn count_months() {
        let m = |s: &str| s.parse::<YearMonth>().unwrap();
        assert_eq!(months_between(m("2025-07"), m("2025-07")), 0);
        assert_eq!(months_between(m("2025-07"), m("2026-01")), 6);
        assert_eq!(months_between(m("2025-07"), m("2024-12")), -7);
    }
}
