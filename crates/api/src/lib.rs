#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # gigbook-api
//!
//! Typed client for the gigbook REST API.
//!
//! The API surface is split into one transport trait per entity
//! ([`GigApi`], [`FestivalApi`], ...), joined by the blanket [`Api`] trait.
//! [`GigbookClient`] implements them over HTTP; [`InMemoryApi`] implements
//! them in memory for tests and offline use.
//!
//! ## Example
//!
//! ```ignore
//! use gigbook_api::{ApiConfig, GigApi, GigQuery, GigbookClient};
//!
//! let config = ApiConfig::from_env();
//! let client = GigbookClient::with_config(config)?;
//!
//! let page = client.list_gigs(&GigQuery::default()).await?;
//! println!("{} gigs", page.items.len());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod transport;
pub mod types;

pub use client::GigbookClient;
pub use config::{ApiConfig, DEFAULT_PAGE_SIZE};
pub use error::{ApiError, ErrorCategory, Result};
pub use memory::{ApiCall, DashboardData, InMemoryApi};
pub use transport::{
    Api, ArtistApi, AttendeeApi, DashboardApi, FestivalApi, GigApi, ProjectImageApi, VenueApi,
};
pub use types::{
    Artist, ArtistId, ArtistInsights, Attendee, AttendeeId, AverageTicketPriceByYear,
    DashboardStats, Festival, FestivalGig, FestivalGigOrder, FestivalId, Gig, GigAct, GigId,
    GigQuery, GigSortBy, GigsPerMonth, GigsPerYear, ImportResult, InterestingInsights,
    MostHeardSong, Paginated, SetlistEntry, SortDirection, TemporalStats, TicketType, TopArtist,
    TopCity, TopVenue, UpsertActRequest, UpsertArtistRequest, UpsertAttendeeRequest,
    UpsertFestivalRequest, UpsertGigRequest, UpsertVenueRequest, Venue, VenueId, VenueInsights,
};
