//! Transport traits of the gigbook API.
//!
//! One trait per entity. Stores depend on these traits, never on the HTTP
//! client directly, so they run unchanged against [`InMemoryApi`].
//!
//! [`InMemoryApi`]: crate::memory::InMemoryApi

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Artist, ArtistId, ArtistInsights, Attendee, AttendeeId, AverageTicketPriceByYear,
    DashboardStats, Festival, FestivalId, Gig, GigId, GigQuery, GigsPerMonth, GigsPerYear,
    ImportResult, InterestingInsights, MostHeardSong, Paginated, TemporalStats, TopArtist,
    TopCity, TopVenue, UpsertArtistRequest, UpsertAttendeeRequest, UpsertFestivalRequest,
    UpsertGigRequest, UpsertVenueRequest, Venue, VenueId, VenueInsights,
};

/// Gig endpoints.
#[async_trait]
pub trait GigApi: Send + Sync {
    /// List gigs matching `query`, one page at a time.
    async fn list_gigs(&self, query: &GigQuery) -> Result<Paginated<Gig>>;

    async fn get_gig(&self, id: &GigId) -> Result<Gig>;

    async fn create_gig(&self, request: &UpsertGigRequest) -> Result<Gig>;

    /// Full-replace update of a gig.
    async fn update_gig(&self, id: &GigId, request: &UpsertGigRequest) -> Result<Gig>;

    async fn delete_gig(&self, id: &GigId) -> Result<()>;

    /// Ask the server to fill in artist images and setlists.
    async fn enrich_gig(&self, id: &GigId) -> Result<Gig>;

    /// Upload a CSV export as a multipart form with a single `file` field.
    async fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportResult>;
}

/// Festival endpoints.
#[async_trait]
pub trait FestivalApi: Send + Sync {
    async fn list_festivals(&self) -> Result<Vec<Festival>>;

    async fn get_festival(&self, id: &FestivalId) -> Result<Festival>;

    async fn create_festival(&self, request: &UpsertFestivalRequest) -> Result<Festival>;

    async fn update_festival(
        &self,
        id: &FestivalId,
        request: &UpsertFestivalRequest,
    ) -> Result<Festival>;

    async fn delete_festival(&self, id: &FestivalId) -> Result<()>;

    async fn enrich_festival(&self, id: &FestivalId) -> Result<Festival>;
}

/// Artist endpoints.
#[async_trait]
pub trait ArtistApi: Send + Sync {
    async fn list_artists(&self) -> Result<Vec<Artist>>;

    async fn get_artist(&self, id: &ArtistId) -> Result<Artist>;

    async fn create_artist(&self, request: &UpsertArtistRequest) -> Result<Artist>;

    async fn update_artist(&self, id: &ArtistId, request: &UpsertArtistRequest) -> Result<Artist>;

    async fn delete_artist(&self, id: &ArtistId) -> Result<()>;
}

/// Venue endpoints.
#[async_trait]
pub trait VenueApi: Send + Sync {
    async fn list_venues(&self) -> Result<Vec<Venue>>;

    async fn get_venue(&self, id: &VenueId) -> Result<Venue>;

    async fn create_venue(&self, request: &UpsertVenueRequest) -> Result<Venue>;

    async fn update_venue(&self, id: &VenueId, request: &UpsertVenueRequest) -> Result<Venue>;

    async fn delete_venue(&self, id: &VenueId) -> Result<()>;
}

/// Attendee endpoints.
#[async_trait]
pub trait AttendeeApi: Send + Sync {
    async fn list_attendees(&self) -> Result<Vec<Attendee>>;

    async fn get_attendee(&self, id: &AttendeeId) -> Result<Attendee>;

    async fn create_attendee(&self, request: &UpsertAttendeeRequest) -> Result<Attendee>;

    async fn update_attendee(
        &self,
        id: &AttendeeId,
        request: &UpsertAttendeeRequest,
    ) -> Result<Attendee>;

    async fn delete_attendee(&self, id: &AttendeeId) -> Result<()>;
}

/// Read-only dashboard statistics. Top-N endpoints take a `limit`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    async fn average_ticket_price_by_year(&self) -> Result<Vec<AverageTicketPriceByYear>>;

    async fn gigs_per_year(&self) -> Result<Vec<GigsPerYear>>;

    async fn gigs_per_month(&self) -> Result<Vec<GigsPerMonth>>;

    async fn temporal_stats(&self) -> Result<TemporalStats>;

    async fn artist_insights(&self) -> Result<ArtistInsights>;

    async fn venue_insights(&self) -> Result<VenueInsights>;

    async fn top_artists(&self, limit: u32) -> Result<Vec<TopArtist>>;

    async fn top_venues(&self, limit: u32) -> Result<Vec<TopVenue>>;

    async fn top_cities(&self, limit: u32) -> Result<Vec<TopCity>>;

    async fn interesting_insights(&self) -> Result<InterestingInsights>;

    async fn most_heard_songs(&self, limit: u32) -> Result<Vec<MostHeardSong>>;
}

/// Project image maintenance.
#[async_trait]
pub trait ProjectImageApi: Send + Sync {
    /// Ask the server to re-encode stored images. The response body is
    /// passed through untouched; an empty body becomes `null`.
    async fn optimise_project_images(&self) -> Result<serde_json::Value>;
}

/// The whole API surface.
pub trait Api:
    GigApi + FestivalApi + ArtistApi + VenueApi + AttendeeApi + DashboardApi + ProjectImageApi
{
}

impl<T> Api for T where
    T: GigApi + FestivalApi + ArtistApi + VenueApi + AttendeeApi + DashboardApi + ProjectImageApi
{
}
