//! Request and response records of the gigbook REST API.
//!
//! All records use camelCase on the wire. Request records reject unknown
//! fields so that payloads read from files fail at construction instead of
//! at the remote call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-issued identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a gig.
    GigId
);
opaque_id!(
    /// Identifier of a festival.
    FestivalId
);
opaque_id!(
    /// Identifier of a venue.
    VenueId
);
opaque_id!(
    /// Identifier of an artist.
    ArtistId
);
opaque_id!(
    /// Identifier of an attendee.
    AttendeeId
);

/// Ticket descriptor as issued by the server (e.g. `Standing`, `Seated`).
///
/// Kept opaque so that values round-trip through full-replace updates verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketType(String);

impl TicketType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TicketType {
    fn default() -> Self {
        Self::new("Standing")
    }
}

// ==============================================================================
// Gigs
// ==============================================================================

/// One entry of an act's setlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistEntry {
    #[serde(default)]
    pub title: Option<String>,
}

/// An artist's performance within a gig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigAct {
    pub artist_id: ArtistId,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub is_headliner: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub setlist: Vec<SetlistEntry>,
}

/// A gig as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: GigId,
    pub venue_id: VenueId,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub venue_city: Option<String>,
    #[serde(default)]
    pub festival_id: Option<FestivalId>,
    #[serde(default)]
    pub festival_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub ticket_cost: Option<f64>,
    #[serde(default)]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub acts: Vec<GigAct>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// Act entry of a gig upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertActRequest {
    pub artist_id: ArtistId,
    #[serde(default)]
    pub is_headliner: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub setlist: Vec<String>,
}

/// Full-replace payload for creating or updating a gig.
///
/// Optional fields serialize as explicit `null`: the update endpoint
/// overwrites the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertGigRequest {
    pub venue_id: VenueId,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub venue_city: Option<String>,
    #[serde(default)]
    pub festival_id: Option<FestivalId>,
    #[serde(default)]
    pub festival_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub ticket_cost: Option<f64>,
    pub ticket_type: TicketType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub acts: Vec<UpsertActRequest>,
}

/// Sort key of the gig list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GigSortBy {
    Date,
    Venue,
    Artist,
    TicketCost,
}

/// Sort direction of the gig list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Filters and paging of the gig list endpoint (PascalCase query keys).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GigQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<ArtistId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<AttendeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<GigSortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
}

/// Paginated envelope. Missing metadata is defaulted by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportResult {
    pub imported: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

// ==============================================================================
// Festivals
// ==============================================================================

/// Member gig of a festival, as listed on the festival record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalGig {
    pub id: GigId,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_name: Option<String>,
}

/// A festival. Its gig list is derived from each gig's festival reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Festival {
    pub id: FestivalId,
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub gigs: Vec<FestivalGig>,
}

/// Payload for creating or updating a festival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertFestivalRequest {
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Desired position of a gig in a festival lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FestivalGigOrder {
    pub gig_id: GigId,
    #[serde(default)]
    pub order: u32,
}

impl FestivalGigOrder {
    pub fn new(gig_id: impl Into<GigId>, order: u32) -> Self {
        Self {
            gig_id: gig_id.into(),
            order,
        }
    }
}

// ==============================================================================
// Artists, venues, attendees
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertArtistRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertVenueRequest {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: AttendeeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertAttendeeRequest {
    pub name: String,
}

// ==============================================================================
// Dashboard
// ==============================================================================

/// Headline counters of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_gigs: u32,
    pub total_artists: u32,
    pub total_venues: u32,
    pub total_festivals: u32,
    pub total_spent: Option<f64>,
    pub average_ticket_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AverageTicketPriceByYear {
    pub year: i32,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GigsPerYear {
    pub year: i32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GigsPerMonth {
    pub year: Option<i32>,
    pub month: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemporalStats {
    pub busiest_year: Option<i32>,
    pub busiest_month: Option<u32>,
    pub gigs_this_year: u32,
    pub longest_gap_days: Option<i64>,
    pub average_days_between_gigs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistInsights {
    pub unique_artists: u32,
    pub headliners_seen: u32,
    pub artists_seen_once: u32,
    pub most_seen_artist_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VenueInsights {
    pub unique_venues: u32,
    pub unique_cities: u32,
    pub most_visited_venue_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopArtist {
    pub artist_id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub gig_count: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVenue {
    pub venue_id: VenueId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub gig_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopCity {
    pub city: String,
    pub gig_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterestingInsights {
    pub first_gig_date: Option<NaiveDate>,
    pub latest_gig_date: Option<NaiveDate>,
    pub most_expensive_ticket: Option<f64>,
    pub most_gigs_in_a_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MostHeardSong {
    pub title: String,
    pub artist_name: Option<String>,
    pub times_heard: u32,
}
