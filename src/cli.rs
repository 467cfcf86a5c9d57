//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gigbook_api::{GigSortBy, SortDirection};
use gigbook_store::ViewMode;
use url::Url;

/// gigbook - track the gigs, festivals and artists you have seen
#[derive(Parser, Debug)]
#[command(name = "gigbook")]
#[command(version)]
#[command(about = "Client for the gigbook API: gigs, festivals, artists and your dashboard")]
pub struct Cli {
    /// Config file (TOML, or JSON by extension)
    #[arg(long, global = true, env = "GIGBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file and GIGBOOK_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<Url>,

    /// Gigs requested per page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Preferences file
    #[arg(
        long,
        global = true,
        env = "GIGBOOK_PREFERENCES",
        default_value = ".gigbook/preferences.toml"
    )]
    pub preferences: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List, inspect and edit gigs
    Gigs {
        #[command(subcommand)]
        command: GigCommands,
    },

    /// List, inspect and edit festivals
    Festivals {
        #[command(subcommand)]
        command: FestivalCommands,
    },

    /// List artists
    Artists,

    /// List venues
    Venues,

    /// List attendees
    Attendees,

    /// Show dashboard statistics
    Dashboard {
        /// Entries in the top-N lists
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show or set how gig or project lists are laid out
    ViewMode {
        /// New view mode
        mode: Option<ViewModeArg>,

        /// Apply to project lists instead of gig lists
        #[arg(long)]
        projects: bool,
    },

    /// Optimise stored project images on the server
    OptimiseImages,
}

#[derive(Subcommand, Debug)]
pub enum GigCommands {
    /// List gigs
    List {
        #[command(flatten)]
        filters: GigFilterArgs,

        /// Page to fetch
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        page: u32,

        /// Fetch every page
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Layout, overrides the saved preference
        #[arg(long)]
        view: Option<ViewModeArg>,
    },

    /// Show one gig
    Show {
        /// Gig id
        id: String,
    },

    /// Create a gig from a JSON payload
    Create {
        /// JSON file with the gig payload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace a gig with a JSON payload
    Update {
        /// Gig id
        id: String,

        /// JSON file with the gig payload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a gig
    Delete {
        /// Gig id
        id: String,
    },

    /// Fill in missing details from external sources
    Enrich {
        /// Gig id
        id: String,
    },

    /// Import gigs from a CSV export
    Import {
        /// CSV file
        csv: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum FestivalCommands {
    /// List festivals
    List,

    /// Show one festival and its lineup
    Show {
        /// Festival id
        id: String,
    },

    /// Create a festival from a JSON payload
    Create {
        /// JSON file with the festival payload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace a festival with a JSON payload
    Update {
        /// Festival id
        id: String,

        /// JSON file with the festival payload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a festival
    Delete {
        /// Festival id
        id: String,
    },

    /// Fill in missing details from external sources
    Enrich {
        /// Festival id
        id: String,
    },

    /// Set the festival's lineup to the given gigs, in order
    Lineup {
        /// Festival id
        festival_id: String,

        /// Gig ids in lineup order
        gig_ids: Vec<String>,

        /// Show the planned changes without applying them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

/// Filters of `gigs list`.
#[derive(Args, Debug, Clone, Default)]
pub struct GigFilterArgs {
    /// Only gigs at this venue
    #[arg(long)]
    pub venue: Option<String>,

    /// Only gigs featuring this artist
    #[arg(long)]
    pub artist: Option<String>,

    /// Only gigs this person attended
    #[arg(long)]
    pub attendee: Option<String>,

    /// Only gigs in this city
    #[arg(long)]
    pub city: Option<String>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from_date: Option<NaiveDate>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to_date: Option<NaiveDate>,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort key
    #[arg(long)]
    pub sort_by: Option<SortByArg>,

    /// Sort direction
    #[arg(long)]
    pub direction: Option<DirectionArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortByArg {
    Date,
    Venue,
    Artist,
    TicketCost,
}

impl From<SortByArg> for GigSortBy {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Date => Self::Date,
            SortByArg::Venue => Self::Venue,
            SortByArg::Artist => Self::Artist,
            SortByArg::TicketCost => Self::TicketCost,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => Self::Asc,
            DirectionArg::Desc => Self::Desc,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewModeArg {
    Card,
    List,
    Table,
}

impl From<ViewModeArg> for ViewMode {
    fn from(arg: ViewModeArg) -> Self {
        match arg {
            ViewModeArg::Card => Self::Card,
            ViewModeArg::List => Self::List,
            ViewModeArg::Table => Self::Table,
        }
    }
}
