//! Argument parsing tests for the gigbook CLI.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use clap::Parser;
use gigbook::cli::{Cli, Commands, DirectionArg, FestivalCommands, GigCommands, SortByArg, ViewModeArg};

#[test]
fn test_gigs_list_with_filters() -> Result<(), clap::Error> {
    let cli = Cli::try_parse_from([
        "gigbook",
        "gigs",
        "list",
        "--search",
        "radiohead",
        "--city",
        "Bristol",
        "--from-date",
        "2019-01-01",
        "--sort-by",
        "ticket-cost",
        "--direction",
        "asc",
        "--page",
        "3",
        "--view",
        "table",
    ])?;

    let Commands::Gigs {
        command:
            GigCommands::List {
                filters,
                page,
                all,
                view,
            },
    } = cli.command
    else {
        return Err(clap::Error::new(clap::error::ErrorKind::InvalidSubcommand));
    };

    assert_eq!(filters.search.as_deref(), Some("radiohead"));
    assert_eq!(filters.city.as_deref(), Some("Bristol"));
    assert_eq!(filters.from_date.map(|d| d.to_string()).as_deref(), Some("2019-01-01"));
    assert_eq!(filters.sort_by, Some(SortByArg::TicketCost));
    assert_eq!(filters.direction, Some(DirectionArg::Asc));
    assert_eq!(page, 3);
    assert!(!all);
    assert_eq!(view, Some(ViewModeArg::Table));
    Ok(())
}

#[test]
fn test_page_conflicts_with_all() {
    let result = Cli::try_parse_from(["gigbook", "gigs", "list", "--all", "--page", "2"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_date_rejected() {
    let result = Cli::try_parse_from(["gigbook", "gigs", "list", "--from-date", "yesterday"]);
    assert!(result.is_err());
}

#[test]
fn test_lineup_keeps_gig_order() -> Result<(), clap::Error> {
    let cli = Cli::try_parse_from([
        "gigbook",
        "festivals",
        "lineup",
        "glasto-2024",
        "gig-3",
        "gig-1",
        "gig-2",
        "--dry-run",
    ])?;

    let Commands::Festivals {
        command:
            FestivalCommands::Lineup {
                festival_id,
                gig_ids,
                dry_run,
            },
    } = cli.command
    else {
        return Err(clap::Error::new(clap::error::ErrorKind::InvalidSubcommand));
    };

    assert_eq!(festival_id, "glasto-2024");
    assert_eq!(gig_ids, ["gig-3", "gig-1", "gig-2"]);
    assert!(dry_run);
    Ok(())
}

#[test]
fn test_global_options_after_subcommand() -> Result<(), clap::Error> {
    let cli = Cli::try_parse_from([
        "gigbook",
        "dashboard",
        "--limit",
        "5",
        "--api-url",
        "http://localhost:5000/api",
        "--page-size",
        "20",
    ])?;

    assert!(matches!(cli.command, Commands::Dashboard { limit: Some(5) }));
    assert_eq!(
        cli.api_url.as_ref().map(url::Url::as_str),
        Some("http://localhost:5000/api")
    );
    assert_eq!(cli.page_size, Some(20));
    Ok(())
}

#[test]
fn test_view_mode_value_is_validated() {
    assert!(Cli::try_parse_from(["gigbook", "view-mode", "list"]).is_ok());
    assert!(Cli::try_parse_from(["gigbook", "view-mode", "mosaic"]).is_err());
}

#[test]
fn test_view_mode_for_projects_and_optimise_images() -> Result<(), clap::Error> {
    let cli = Cli::try_parse_from(["gigbook", "view-mode", "table", "--projects"])?;
    assert!(matches!(
        cli.command,
        Commands::ViewMode {
            mode: Some(ViewModeArg::Table),
            projects: true,
        }
    ));

    let cli = Cli::try_parse_from(["gigbook", "optimise-images"])?;
    assert!(matches!(cli.command, Commands::OptimiseImages));
    Ok(())
}
