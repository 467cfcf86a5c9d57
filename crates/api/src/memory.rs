//! In-memory implementation of the transport traits.
//!
//! Behaves like the server closely enough for store and reconciler tests:
//! updates fully replace a gig, a festival's gig list is derived from the
//! gigs that reference it, and every call is recorded in order. Failures
//! can be injected per call.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{ApiError, Result};
use crate::transport::{
    ArtistApi, AttendeeApi, DashboardApi, FestivalApi, GigApi, ProjectImageApi, VenueApi,
};
use crate::types::{
    Artist, ArtistId, ArtistInsights, Attendee, AttendeeId, AverageTicketPriceByYear,
    DashboardStats, Festival, FestivalGig, FestivalId, Gig, GigAct, GigId, GigQuery, GigSortBy,
    GigsPerMonth, GigsPerYear, ImportResult, InterestingInsights, MostHeardSong, Paginated,
    SetlistEntry, SortDirection, TemporalStats, TopArtist, TopCity, TopVenue, UpsertArtistRequest,
    UpsertAttendeeRequest, UpsertFestivalRequest, UpsertGigRequest, UpsertVenueRequest, Venue,
    VenueId, VenueInsights,
};

/// One recorded call against [`InMemoryApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListGigs(GigQuery),
    GetGig(GigId),
    CreateGig(UpsertGigRequest),
    UpdateGig(GigId, UpsertGigRequest),
    DeleteGig(GigId),
    EnrichGig(GigId),
    ImportCsv { file_name: String, size: usize },
    ListFestivals,
    GetFestival(FestivalId),
    CreateFestival(UpsertFestivalRequest),
    UpdateFestival(FestivalId, UpsertFestivalRequest),
    DeleteFestival(FestivalId),
    EnrichFestival(FestivalId),
    /// Artist, venue and attendee endpoints.
    Catalog {
        endpoint: &'static str,
        id: Option<String>,
    },
    Dashboard {
        endpoint: &'static str,
        limit: Option<u32>,
    },
    OptimiseImages,
}

/// Canned dashboard responses.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub price_by_year: Vec<AverageTicketPriceByYear>,
    pub gigs_per_year: Vec<GigsPerYear>,
    pub gigs_per_month: Vec<GigsPerMonth>,
    pub temporal_stats: TemporalStats,
    pub artist_insights: ArtistInsights,
    pub venue_insights: VenueInsights,
    pub top_artists: Vec<TopArtist>,
    pub top_venues: Vec<TopVenue>,
    pub top_cities: Vec<TopCity>,
    pub interesting_insights: InterestingInsights,
    pub most_heard_songs: Vec<MostHeardSong>,
}

type CallMatcher = Box<dyn Fn(&ApiCall) -> bool + Send + Sync>;

#[derive(Default)]
struct State {
    gigs: Vec<Gig>,
    festivals: Vec<Festival>,
    artists: Vec<Artist>,
    venues: Vec<Venue>,
    attendees: Vec<Attendee>,
    dashboard: DashboardData,
    calls: Vec<ApiCall>,
    failures: Vec<(CallMatcher, ApiError)>,
    next_id: u64,
    omit_page_numbers: bool,
    optimised_images: u32,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn gig(&self, id: &GigId) -> Result<&Gig> {
        self.gigs
            .iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| ApiError::not_found(format!("Gig {id}")))
    }

    fn festival(&self, id: &FestivalId) -> Result<Festival> {
        self.festivals
            .iter()
            .find(|f| &f.id == id)
            .map(|f| self.with_member_gigs(f))
            .ok_or_else(|| ApiError::not_found(format!("Festival {id}")))
    }

    /// The festival with its gig list derived from gig-side membership.
    fn with_member_gigs(&self, festival: &Festival) -> Festival {
        let mut gigs: Vec<FestivalGig> = self
            .gigs
            .iter()
            .filter(|g| g.festival_id.as_ref() == Some(&festival.id))
            .map(|g| FestivalGig {
                id: g.id.clone(),
                order: g.order,
                date: Some(g.date),
                venue_name: g.venue_name.clone(),
            })
            .collect();
        gigs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        Festival {
            gigs,
            ..festival.clone()
        }
    }

    /// Build a gig from a full-replace payload. Artist names and attendees
    /// are carried over from `previous` or looked up in the catalog.
    fn gig_from_request(&self, id: GigId, request: &UpsertGigRequest, previous: Option<&Gig>) -> Gig {
        let acts = request
            .acts
            .iter()
            .map(|act| {
                let artist_name = previous
                    .and_then(|p| p.acts.iter().find(|a| a.artist_id == act.artist_id))
                    .and_then(|a| a.artist_name.clone())
                    .or_else(|| {
                        self.artists
                            .iter()
                            .find(|a| a.id == act.artist_id)
                            .map(|a| a.name.clone())
                    });
                GigAct {
                    artist_id: act.artist_id.clone(),
                    artist_name,
                    is_headliner: act.is_headliner,
                    order: act.order,
                    setlist: act
                        .setlist
                        .iter()
                        .map(|title| SetlistEntry {
                            title: (!title.is_empty()).then(|| title.clone()),
                        })
                        .collect(),
                }
            })
            .collect();

        Gig {
            id,
            venue_id: request.venue_id.clone(),
            venue_name: request.venue_name.clone(),
            venue_city: request.venue_city.clone(),
            festival_id: request.festival_id.clone(),
            festival_name: request.festival_name.clone(),
            date: request.date,
            order: request.order,
            ticket_cost: request.ticket_cost,
            ticket_type: request.ticket_type.clone(),
            image_url: request.image_url.clone(),
            acts,
            attendees: previous.map(|p| p.attendees.clone()).unwrap_or_default(),
        }
    }
}

fn matches_query(gig: &Gig, query: &GigQuery) -> bool {
    let contains = |haystack: Option<&str>, needle: &str| {
        haystack.is_some_and(|h| h.to_lowercase().contains(needle))
    };

    query.venue_id.as_ref().is_none_or(|v| &gig.venue_id == v)
        && query
            .artist_id
            .as_ref()
            .is_none_or(|a| gig.acts.iter().any(|act| &act.artist_id == a))
        && query
            .attendee_id
            .as_ref()
            .is_none_or(|a| gig.attendees.iter().any(|att| &att.id == a))
        && query.city.as_ref().is_none_or(|city| {
            gig.venue_city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(city))
        })
        && query.from_date.is_none_or(|from| gig.date >= from)
        && query.to_date.is_none_or(|to| gig.date <= to)
        && query.search.as_ref().is_none_or(|search| {
            let needle = search.to_lowercase();
            contains(gig.venue_name.as_deref(), &needle)
                || contains(gig.festival_name.as_deref(), &needle)
                || gig
                    .acts
                    .iter()
                    .any(|act| contains(act.artist_name.as_deref(), &needle))
        })
}

fn compare_gigs(a: &Gig, b: &Gig, sort_by: GigSortBy) -> Ordering {
    let headliner = |g: &Gig| {
        g.acts
            .iter()
            .find(|act| act.is_headliner)
            .or_else(|| g.acts.first())
            .and_then(|act| act.artist_name.clone())
    };

    match sort_by {
        GigSortBy::Date => a.date.cmp(&b.date),
        GigSortBy::Venue => a.venue_name.cmp(&b.venue_name),
        GigSortBy::Artist => headliner(a).cmp(&headliner(b)),
        GigSortBy::TicketCost => a
            .ticket_cost
            .partial_cmp(&b.ticket_cost)
            .unwrap_or(Ordering::Equal),
    }
}

/// In-memory stand-in for the gigbook server.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for InMemoryApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("InMemoryApi")
            .field("gigs", &state.gigs.len())
            .field("festivals", &state.festivals.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_gig(self, gig: Gig) -> Self {
        self.state.lock().gigs.push(gig);
        self
    }

    /// Add a festival. Its `gigs` field is ignored; membership comes from
    /// the gigs that reference it.
    #[must_use]
    pub fn with_festival(self, festival: Festival) -> Self {
        self.state.lock().festivals.push(Festival {
            gigs: Vec::new(),
            ..festival
        });
        self
    }

    #[must_use]
    pub fn with_artist(self, artist: Artist) -> Self {
        self.state.lock().artists.push(artist);
        self
    }

    #[must_use]
    pub fn with_venue(self, venue: Venue) -> Self {
        self.state.lock().venues.push(venue);
        self
    }

    #[must_use]
    pub fn with_attendee(self, attendee: Attendee) -> Self {
        self.state.lock().attendees.push(attendee);
        self
    }

    #[must_use]
    pub fn with_dashboard(self, dashboard: DashboardData) -> Self {
        self.state.lock().dashboard = dashboard;
        self
    }

    /// Leave the page number out of gig list responses.
    #[must_use]
    pub fn without_page_numbers(self) -> Self {
        self.state.lock().omit_page_numbers = true;
        self
    }

    /// Fail every call accepted by `matcher` with `error`.
    pub fn fail_when(
        &self,
        matcher: impl Fn(&ApiCall) -> bool + Send + Sync + 'static,
        error: ApiError,
    ) {
        self.state.lock().failures.push((Box::new(matcher), error));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Gig updates made so far, in order.
    #[must_use]
    pub fn gig_updates(&self) -> Vec<(GigId, UpsertGigRequest)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::UpdateGig(id, request) => Some((id.clone(), request.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Current server-side copy of a gig.
    #[must_use]
    pub fn stored_gig(&self, id: &GigId) -> Option<Gig> {
        self.state.lock().gig(id).ok().cloned()
    }

    /// Current server-side copy of a festival, with derived gig list.
    #[must_use]
    pub fn stored_festival(&self, id: &FestivalId) -> Option<Festival> {
        self.state.lock().festival(id).ok()
    }

    /// Record `call`, fail it if an injected failure matches, otherwise
    /// run `op` on the state.
    fn call<T>(&self, call: ApiCall, op: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        let failure = state
            .failures
            .iter()
            .find(|(matcher, _)| matcher(&call))
            .map(|(_, error)| error.clone());
        state.calls.push(call);

        match failure {
            Some(error) => Err(error),
            None => op(&mut state),
        }
    }
}

#[async_trait]
impl GigApi for InMemoryApi {
    async fn list_gigs(&self, query: &GigQuery) -> Result<Paginated<Gig>> {
        self.call(ApiCall::ListGigs(query.clone()), |state| {
            let mut gigs: Vec<Gig> = state
                .gigs
                .iter()
                .filter(|g| matches_query(g, query))
                .cloned()
                .collect();

            let sort_by = query.sort_by.unwrap_or(GigSortBy::Date);
            gigs.sort_by(|a, b| {
                let ordering = compare_gigs(a, b, sort_by);
                match query.sort_direction.unwrap_or_default() {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });

            let page = query.page.unwrap_or(1).max(1);
            let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
            let total_count = gigs.len();
            let total_pages = total_count.div_ceil(page_size as usize).max(1);
            let items = gigs
                .into_iter()
                .skip((page as usize - 1) * page_size as usize)
                .take(page_size as usize)
                .collect();

            Ok(Paginated {
                page: (!state.omit_page_numbers).then_some(page),
                page_size: Some(page_size),
                total_count: Some(total_count as u64),
                total_pages: u32::try_from(total_pages).ok(),
                items,
            })
        })
    }

    async fn get_gig(&self, id: &GigId) -> Result<Gig> {
        self.call(ApiCall::GetGig(id.clone()), |state| state.gig(id).cloned())
    }

    async fn create_gig(&self, request: &UpsertGigRequest) -> Result<Gig> {
        self.call(ApiCall::CreateGig(request.clone()), |state| {
            let id = GigId::new(state.next_id("gig"));
            let gig = state.gig_from_request(id, request, None);
            state.gigs.push(gig.clone());
            Ok(gig)
        })
    }

    async fn update_gig(&self, id: &GigId, request: &UpsertGigRequest) -> Result<Gig> {
        self.call(ApiCall::UpdateGig(id.clone(), request.clone()), |state| {
            let previous = state.gig(id)?;
            let gig = state.gig_from_request(id.clone(), request, Some(previous));
            if let Some(slot) = state.gigs.iter_mut().find(|g| &g.id == id) {
                *slot = gig.clone();
            }
            Ok(gig)
        })
    }

    async fn delete_gig(&self, id: &GigId) -> Result<()> {
        self.call(ApiCall::DeleteGig(id.clone()), |state| {
            state.gig(id)?;
            state.gigs.retain(|g| &g.id != id);
            Ok(())
        })
    }

    async fn enrich_gig(&self, id: &GigId) -> Result<Gig> {
        self.call(ApiCall::EnrichGig(id.clone()), |state| state.gig(id).cloned())
    }

    async fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportResult> {
        let call = ApiCall::ImportCsv {
            file_name: file_name.to_string(),
            size: contents.len(),
        };
        self.call(call, |_| {
            let text = String::from_utf8_lossy(&contents);
            let rows = text.lines().skip(1).filter(|l| !l.trim().is_empty()).count();
            Ok(ImportResult {
                imported: u32::try_from(rows).unwrap_or(u32::MAX),
                skipped: 0,
                errors: Vec::new(),
            })
        })
    }
}

#[async_trait]
impl FestivalApi for InMemoryApi {
    async fn list_festivals(&self) -> Result<Vec<Festival>> {
        self.call(ApiCall::ListFestivals, |state| {
            Ok(state
                .festivals
                .iter()
                .map(|f| state.with_member_gigs(f))
                .collect())
        })
    }

    async fn get_festival(&self, id: &FestivalId) -> Result<Festival> {
        self.call(ApiCall::GetFestival(id.clone()), |state| state.festival(id))
    }

    async fn create_festival(&self, request: &UpsertFestivalRequest) -> Result<Festival> {
        self.call(ApiCall::CreateFestival(request.clone()), |state| {
            let festival = Festival {
                id: FestivalId::new(state.next_id("festival")),
                name: request.name.clone(),
                year: request.year,
                image_url: request.image_url.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
                gigs: Vec::new(),
            };
            state.festivals.push(festival.clone());
            Ok(festival)
        })
    }

    async fn update_festival(
        &self,
        id: &FestivalId,
        request: &UpsertFestivalRequest,
    ) -> Result<Festival> {
        self.call(ApiCall::UpdateFestival(id.clone(), request.clone()), |state| {
            let slot = state
                .festivals
                .iter_mut()
                .find(|f| &f.id == id)
                .ok_or_else(|| ApiError::not_found(format!("Festival {id}")))?;
            slot.name = request.name.clone();
            slot.year = request.year;
            slot.image_url = request.image_url.clone();
            slot.start_date = request.start_date;
            slot.end_date = request.end_date;
            state.festival(id)
        })
    }

    async fn delete_festival(&self, id: &FestivalId) -> Result<()> {
        self.call(ApiCall::DeleteFestival(id.clone()), |state| {
            state.festival(id)?;
            state.festivals.retain(|f| &f.id != id);
            for gig in state.gigs.iter_mut().filter(|g| g.festival_id.as_ref() == Some(id)) {
                gig.festival_id = None;
                gig.festival_name = None;
                gig.order = 0;
            }
            Ok(())
        })
    }

    async fn enrich_festival(&self, id: &FestivalId) -> Result<Festival> {
        self.call(ApiCall::EnrichFestival(id.clone()), |state| state.festival(id))
    }
}

fn catalog(endpoint: &'static str, id: Option<&str>) -> ApiCall {
    ApiCall::Catalog {
        endpoint,
        id: id.map(str::to_string),
    }
}

#[async_trait]
impl ArtistApi for InMemoryApi {
    async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.call(catalog("artists", None), |state| Ok(state.artists.clone()))
    }

    async fn get_artist(&self, id: &ArtistId) -> Result<Artist> {
        self.call(catalog("artists", Some(id.as_str())), |state| {
            state
                .artists
                .iter()
                .find(|a| &a.id == id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("Artist {id}")))
        })
    }

    async fn create_artist(&self, request: &UpsertArtistRequest) -> Result<Artist> {
        self.call(catalog("artists", None), |state| {
            let artist = Artist {
                id: ArtistId::new(state.next_id("artist")),
                name: request.name.clone(),
                image_url: request.image_url.clone(),
            };
            state.artists.push(artist.clone());
            Ok(artist)
        })
    }

    async fn update_artist(&self, id: &ArtistId, request: &UpsertArtistRequest) -> Result<Artist> {
        self.call(catalog("artists", Some(id.as_str())), |state| {
            let slot = state
                .artists
                .iter_mut()
                .find(|a| &a.id == id)
                .ok_or_else(|| ApiError::not_found(format!("Artist {id}")))?;
            slot.name = request.name.clone();
            slot.image_url = request.image_url.clone();
            Ok(slot.clone())
        })
    }

    async fn delete_artist(&self, id: &ArtistId) -> Result<()> {
        self.call(catalog("artists", Some(id.as_str())), |state| {
            state.artists.retain(|a| &a.id != id);
            Ok(())
        })
    }
}

#[async_trait]
impl VenueApi for InMemoryApi {
    async fn list_venues(&self) -> Result<Vec<Venue>> {
        self.call(catalog("venues", None), |state| Ok(state.venues.clone()))
    }

    async fn get_venue(&self, id: &VenueId) -> Result<Venue> {
        self.call(catalog("venues", Some(id.as_str())), |state| {
            state
                .venues
                .iter()
                .find(|v| &v.id == id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("Venue {id}")))
        })
    }

    async fn create_venue(&self, request: &UpsertVenueRequest) -> Result<Venue> {
        self.call(catalog("venues", None), |state| {
            let venue = Venue {
                id: VenueId::new(state.next_id("venue")),
                name: request.name.clone(),
                city: request.city.clone(),
            };
            state.venues.push(venue.clone());
            Ok(venue)
        })
    }

    async fn update_venue(&self, id: &VenueId, request: &UpsertVenueRequest) -> Result<Venue> {
        self.call(catalog("venues", Some(id.as_str())), |state| {
            let slot = state
                .venues
                .iter_mut()
                .find(|v| &v.id == id)
                .ok_or_else(|| ApiError::not_found(format!("Venue {id}")))?;
            slot.name = request.name.clone();
            slot.city = request.city.clone();
            Ok(slot.clone())
        })
    }

    async fn delete_venue(&self, id: &VenueId) -> Result<()> {
        self.call(catalog("venues", Some(id.as_str())), |state| {
            state.venues.retain(|v| &v.id != id);
            Ok(())
        })
    }
}

#[async_trait]
impl AttendeeApi for InMemoryApi {
    async fn list_attendees(&self) -> Result<Vec<Attendee>> {
        self.call(catalog("attendees", None), |state| {
            Ok(state.attendees.clone())
        })
    }

    async fn get_attendee(&self, id: &AttendeeId) -> Result<Attendee> {
        self.call(catalog("attendees", Some(id.as_str())), |state| {
            state
                .attendees
                .iter()
                .find(|a| &a.id == id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("Attendee {id}")))
        })
    }

    async fn create_attendee(&self, request: &UpsertAttendeeRequest) -> Result<Attendee> {
        self.call(catalog("attendees", None), |state| {
            let attendee = Attendee {
                id: AttendeeId::new(state.next_id("attendee")),
                name: request.name.clone(),
            };
            state.attendees.push(attendee.clone());
            Ok(attendee)
        })
    }

    async fn update_attendee(
        &self,
        id: &AttendeeId,
        request: &UpsertAttendeeRequest,
    ) -> Result<Attendee> {
        self.call(catalog("attendees", Some(id.as_str())), |state| {
            let slot = state
                .attendees
                .iter_mut()
                .find(|a| &a.id == id)
                .ok_or_else(|| ApiError::not_found(format!("Attendee {id}")))?;
            slot.name = request.name.clone();
            Ok(slot.clone())
        })
    }

    async fn delete_attendee(&self, id: &AttendeeId) -> Result<()> {
        self.call(catalog("attendees", Some(id.as_str())), |state| {
            state.attendees.retain(|a| &a.id != id);
            Ok(())
        })
    }
}

fn dashboard(endpoint: &'static str, limit: Option<u32>) -> ApiCall {
    ApiCall::Dashboard { endpoint, limit }
}

fn top<T: Clone>(items: &[T], limit: u32) -> Vec<T> {
    items.iter().take(limit as usize).cloned().collect()
}

#[async_trait]
impl DashboardApi for InMemoryApi {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.call(dashboard("stats", None), |state| {
            Ok(state.dashboard.stats.clone())
        })
    }

    async fn average_ticket_price_by_year(&self) -> Result<Vec<AverageTicketPriceByYear>> {
        self.call(dashboard("average-ticket-price-by-year", None), |state| {
            Ok(state.dashboard.price_by_year.clone())
        })
    }

    async fn gigs_per_year(&self) -> Result<Vec<GigsPerYear>> {
        self.call(dashboard("gigs-per-year", None), |state| {
            Ok(state.dashboard.gigs_per_year.clone())
        })
    }

    async fn gigs_per_month(&self) -> Result<Vec<GigsPerMonth>> {
        self.call(dashboard("gigs-per-month", None), |state| {
            Ok(state.dashboard.gigs_per_month.clone())
        })
    }

    async fn temporal_stats(&self) -> Result<TemporalStats> {
        self.call(dashboard("temporal-stats", None), |state| {
            Ok(state.dashboard.temporal_stats.clone())
        })
    }

    async fn artist_insights(&self) -> Result<ArtistInsights> {
        self.call(dashboard("artist-insights", None), |state| {
            Ok(state.dashboard.artist_insights.clone())
        })
    }

    async fn venue_insights(&self) -> Result<VenueInsights> {
        self.call(dashboard("venue-insights", None), |state| {
            Ok(state.dashboard.venue_insights.clone())
        })
    }

    async fn top_artists(&self, limit: u32) -> Result<Vec<TopArtist>> {
        self.call(dashboard("top-artists", Some(limit)), |state| {
            Ok(top(&state.dashboard.top_artists, limit))
        })
    }

    async fn top_venues(&self, limit: u32) -> Result<Vec<TopVenue>> {
        self.call(dashboard("top-venues", Some(limit)), |state| {
            Ok(top(&state.dashboard.top_venues, limit))
        })
    }

    async fn top_cities(&self, limit: u32) -> Result<Vec<TopCity>> {
        self.call(dashboard("top-cities", Some(limit)), |state| {
            Ok(top(&state.dashboard.top_cities, limit))
        })
    }

    async fn interesting_insights(&self) -> Result<InterestingInsights> {
        self.call(dashboard("interesting-insights", None), |state| {
            Ok(state.dashboard.interesting_insights.clone())
        })
    }

    async fn most_heard_songs(&self, limit: u32) -> Result<Vec<MostHeardSong>> {
        self.call(dashboard("most-heard-songs", Some(limit)), |state| {
            Ok(top(&state.dashboard.most_heard_songs, limit))
        })
    }
}

#[async_trait]
impl ProjectImageApi for InMemoryApi {
    async fn optimise_project_images(&self) -> Result<serde_json::Value> {
        self.call(ApiCall::OptimiseImages, |state| {
            state.optimised_images += 1;
            Ok(serde_json::json!({ "runs": state.optimised_images }))
        })
    }
}
