//! Gig store
//!
//! Owns one [`AsyncResource`] per remote value the gig pages read: the
//! paginated gig list, the catalog lists, festivals, and the channels
//! for saves, enrichment and CSV import. Writes refresh the list they
//! affect.

use async_trait::async_trait;
use chrono::NaiveDate;
use gigbook_api::{
    Api, ApiError, Artist, ArtistId, Attendee, AttendeeId, DEFAULT_PAGE_SIZE, Festival,
    FestivalGigOrder, FestivalId, Gig, GigId, GigQuery, GigSortBy, ImportResult, Paginated,
    SortDirection, UpsertFestivalRequest, UpsertGigRequest, Venue, VenueId,
};
use gigbook_core::AsyncResource;
use gigbook_reconciler::{DesiredLineup, LineupReconciler, LineupStore, ReconcileResult};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::Result;

/// Filters applied to the gig list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GigFilters {
    pub venue_id: Option<VenueId>,
    pub artist_id: Option<ArtistId>,
    pub attendee_id: Option<AttendeeId>,
    pub city: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_by: Option<GigSortBy>,
    pub sort_direction: Option<SortDirection>,
}

impl GigFilters {
    /// Build the list query for one page.
    pub fn to_query(&self, page: Option<u32>, page_size: Option<u32>) -> GigQuery {
        GigQuery {
            page,
            page_size,
            venue_id: self.venue_id.clone(),
            artist_id: self.artist_id.clone(),
            attendee_id: self.attendee_id.clone(),
            city: self.city.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
            search: self.search.clone(),
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
        }
    }
}

/// Options of one gig list fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchGigsOptions {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: GigFilters,
    /// Merge the page onto the accumulated list instead of replacing it.
    pub append: bool,
}

/// Paging state of the gig list, as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
            total_pages: 1,
        }
    }
}

impl Pagination {
    /// Read paging metadata, falling back to defaults for missing or zero
    /// values.
    pub fn from_response<T>(response: &Paginated<T>) -> Self {
        Self::from_response_or(response, Self::default())
    }

    /// Read paging metadata, falling back to `defaults` for missing or zero
    /// values.
    pub fn from_response_or<T>(response: &Paginated<T>, defaults: Self) -> Self {
        Self {
            page: response.page.filter(|p| *p > 0).unwrap_or(defaults.page),
            page_size: response
                .page_size
                .filter(|s| *s > 0)
                .unwrap_or(defaults.page_size),
            total_items: response.total_count.unwrap_or(defaults.total_items),
            total_pages: response
                .total_pages
                .filter(|p| *p > 0)
                .unwrap_or(defaults.total_pages),
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Store for gigs, festivals and the catalog lists around them.
pub struct GigStore<A> {
    api: A,
    gigs: AsyncResource<Vec<Gig>>,
    gig_detail: AsyncResource<Gig>,
    import: AsyncResource<ImportResult>,
    upsert: AsyncResource<Gig>,
    enrich: AsyncResource<Gig>,
    artists: AsyncResource<Vec<Artist>>,
    venues: AsyncResource<Vec<Venue>>,
    festivals: AsyncResource<Vec<Festival>>,
    festival_detail: AsyncResource<Festival>,
    upsert_festival: AsyncResource<Festival>,
    enrich_festival: AsyncResource<Festival>,
    attendees: AsyncResource<Vec<Attendee>>,
    pagination: RwLock<Pagination>,
    filters: RwLock<GigFilters>,
}

impl<A> std::fmt::Debug for GigStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GigStore")
            .field("gigs", &self.gigs.with_data(|g| g.map_or(0, Vec::len)))
            .field("pagination", &*self.pagination.read())
            .field("filters", &*self.filters.read())
            .finish_non_exhaustive()
    }
}

impl<A: Api> GigStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            gigs: AsyncResource::new(),
            gig_detail: AsyncResource::new(),
            import: AsyncResource::new(),
            upsert: AsyncResource::new(),
            enrich: AsyncResource::new(),
            artists: AsyncResource::new(),
            venues: AsyncResource::new(),
            festivals: AsyncResource::new(),
            festival_detail: AsyncResource::new(),
            upsert_festival: AsyncResource::new(),
            enrich_festival: AsyncResource::new(),
            attendees: AsyncResource::new(),
            pagination: RwLock::new(Pagination::default()),
            filters: RwLock::new(GigFilters::default()),
        }
    }

    /// Start with a page size other than the default.
    #[must_use]
    pub fn with_page_size(self, page_size: u32) -> Self {
        if page_size > 0 {
            self.pagination.write().page_size = page_size;
        }
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ------------------------------------------------------------------
    // Gig list
    // ------------------------------------------------------------------

    /// Fetch one page of gigs.
    ///
    /// Pagination is replaced by the response's metadata. With
    /// `append` the page is merged onto the gigs already loaded.
    pub async fn fetch_gigs(&self, options: FetchGigsOptions) -> Option<Vec<Gig>> {
        let query = options.filters.to_query(options.page, options.page_size);
        let append = options.append;
        debug!(page = ?query.page, page_size = ?query.page_size, append, "Fetching gigs");

        self.gigs.run(|| self.load_gig_page(query, append)).await
    }

    async fn load_gig_page(
        &self,
        query: GigQuery,
        append: bool,
    ) -> std::result::Result<Vec<Gig>, ApiError> {
        let requested = Pagination {
            page: query.page.filter(|p| *p > 0).unwrap_or(1),
            page_size: query
                .page_size
                .filter(|s| *s > 0)
                .unwrap_or_else(|| self.pagination().page_size),
            ..Pagination::default()
        };
        let response = self.api.list_gigs(&query).await?;
        *self.pagination.write() = Pagination::from_response_or(&response, requested);

        if append {
            let mut gigs = self.gigs.data().unwrap_or_default();
            gigs.extend(response.items);
            Ok(gigs)
        } else {
            Ok(response.items)
        }
    }

    /// Fetch the next page in append mode. Returns whether the list moved
    /// on to a later page.
    pub async fn load_more_gigs(&self) -> bool {
        let pagination = self.pagination();
        if !pagination.has_more() {
            debug!(page = pagination.page, total_pages = pagination.total_pages, "No more gigs");
            return false;
        }

        self.fetch_gigs(FetchGigsOptions {
            page: Some(pagination.page + 1),
            page_size: Some(pagination.page_size),
            filters: self.filters(),
            append: true,
        })
        .await;
        self.pagination().page > pagination.page
    }

    /// Replace the filters and fetch their first page.
    pub async fn set_filters(&self, filters: GigFilters) -> Option<Vec<Gig>> {
        self.set_filters_at_page(filters, 1).await
    }

    /// Replace the filters and fetch `page` of the result.
    pub async fn set_filters_at_page(&self, filters: GigFilters, page: u32) -> Option<Vec<Gig>> {
        *self.filters.write() = filters.clone();
        self.fetch_gigs(FetchGigsOptions {
            page: Some(page.max(1)),
            page_size: Some(self.pagination().page_size),
            filters,
            append: false,
        })
        .await
    }

    /// Fetch `page` with the current filters.
    pub async fn set_pagination(&self, page: u32, page_size: u32) -> Option<Vec<Gig>> {
        self.fetch_gigs(FetchGigsOptions {
            page: Some(page),
            page_size: Some(page_size),
            filters: self.filters(),
            append: false,
        })
        .await
    }

    /// First page with the current filters and page size.
    async fn refresh_gigs(&self) {
        self.set_pagination(1, self.pagination().page_size).await;
    }

    /// Gig by id, from the loaded list when present.
    pub async fn fetch_gig(&self, id: &GigId) -> std::result::Result<Gig, ApiError> {
        let cached = self
            .gigs
            .with_data(|gigs| gigs.and_then(|gigs| gigs.iter().find(|g| &g.id == id).cloned()));

        match cached {
            Some(gig) => {
                debug!(gig = %id, "Gig served from cache");
                Ok(gig)
            }
            None => self.api.get_gig(id).await,
        }
    }

    /// Load a single gig into the detail channel.
    pub async fn load_gig(&self, id: &GigId) -> Option<Gig> {
        self.gig_detail.run(|| self.fetch_gig(id)).await
    }

    // ------------------------------------------------------------------
    // Gig writes
    // ------------------------------------------------------------------

    async fn submit_gig(
        &self,
        id: Option<&GigId>,
        request: &UpsertGigRequest,
    ) -> std::result::Result<Gig, ApiError> {
        let gig = match id {
            Some(id) => self.api.update_gig(id, request).await?,
            None => self.api.create_gig(request).await?,
        };
        self.refresh_gigs().await;
        Ok(gig)
    }

    pub async fn create_gig(&self, request: &UpsertGigRequest) -> Option<Gig> {
        self.upsert.run(|| self.submit_gig(None, request)).await
    }

    /// Full-replace update of a gig.
    pub async fn update_gig(&self, id: &GigId, request: &UpsertGigRequest) -> Option<Gig> {
        self.upsert.run(|| self.submit_gig(Some(id), request)).await
    }

    pub async fn delete_gig(&self, id: &GigId) {
        self.upsert
            .run_optional(|| async {
                self.api.delete_gig(id).await?;
                self.refresh_gigs().await;
                Ok::<_, ApiError>(None)
            })
            .await;
    }

    pub async fn enrich_gig(&self, id: &GigId) -> Option<Gig> {
        self.enrich
            .run(|| async {
                let gig = self.api.enrich_gig(id).await?;
                self.refresh_gigs().await;
                Ok::<_, ApiError>(gig)
            })
            .await
    }

    /// Upload a CSV export and refresh the list.
    pub async fn import_gigs(&self, file_name: &str, contents: Vec<u8>) -> Option<ImportResult> {
        info!(file = file_name, bytes = contents.len(), "Importing gigs");
        self.import
            .run(|| async {
                let result = self.api.import_csv(file_name, contents).await?;
                self.refresh_gigs().await;
                Ok::<_, ApiError>(result)
            })
            .await
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub async fn fetch_artists(&self) -> Option<Vec<Artist>> {
        self.artists.run(|| self.api.list_artists()).await
    }

    pub async fn fetch_venues(&self) -> Option<Vec<Venue>> {
        self.venues.run(|| self.api.list_venues()).await
    }

    pub async fn fetch_attendees(&self) -> Option<Vec<Attendee>> {
        self.attendees.run(|| self.api.list_attendees()).await
    }

    // ------------------------------------------------------------------
    // Festivals
    // ------------------------------------------------------------------

    pub async fn fetch_festivals(&self) -> Option<Vec<Festival>> {
        self.festivals.run(|| self.api.list_festivals()).await
    }

    /// Festival by id, cache-first unless `force`. A remote result is
    /// upserted into the festival list.
    pub async fn fetch_festival(
        &self,
        id: &FestivalId,
        force: bool,
    ) -> std::result::Result<Festival, ApiError> {
        if !force {
            let cached = self.festivals.with_data(|festivals| {
                festivals.and_then(|festivals| festivals.iter().find(|f| &f.id == id).cloned())
            });
            if let Some(festival) = cached {
                debug!(festival = %id, "Festival served from cache");
                return Ok(festival);
            }
        }

        let festival = self.api.get_festival(id).await?;
        self.cache_festival(&festival);
        Ok(festival)
    }

    fn cache_festival(&self, festival: &Festival) {
        self.festivals.update_data(|data| {
            let festivals = data.get_or_insert_with(Vec::new);
            match festivals.iter_mut().find(|f| f.id == festival.id) {
                Some(existing) => *existing = festival.clone(),
                None => festivals.push(festival.clone()),
            }
        });
    }

    /// Load a single festival into the detail channel.
    pub async fn load_festival(&self, id: &FestivalId) -> Option<Festival> {
        self.festival_detail
            .run(|| self.fetch_festival(id, false))
            .await
    }

    pub async fn create_festival(&self, request: &UpsertFestivalRequest) -> Option<Festival> {
        self.upsert_festival
            .run(|| async {
                let festival = self.api.create_festival(request).await?;
                self.fetch_festivals().await;
                Ok::<_, ApiError>(festival)
            })
            .await
    }

    pub async fn update_festival(
        &self,
        id: &FestivalId,
        request: &UpsertFestivalRequest,
    ) -> Option<Festival> {
        self.upsert_festival
            .run(|| async {
                let festival = self.api.update_festival(id, request).await?;
                self.fetch_festivals().await;
                Ok::<_, ApiError>(festival)
            })
            .await
    }

    pub async fn delete_festival(&self, id: &FestivalId) {
        self.upsert_festival
            .run_optional(|| async {
                self.api.delete_festival(id).await?;
                self.fetch_festivals().await;
                Ok::<_, ApiError>(None)
            })
            .await;
    }

    pub async fn enrich_festival(&self, id: &FestivalId) -> Option<Festival> {
        self.enrich_festival
            .run(|| async {
                let festival = self.api.enrich_festival(id).await?;
                self.cache_festival(&festival);
                Ok::<_, ApiError>(festival)
            })
            .await
    }

    /// Converge the festival's lineup onto `desired`.
    ///
    /// Each gig update goes through the save channel, so a rejected
    /// update also shows up in [`save_error`](Self::save_error).
    pub async fn update_festival_gigs(
        &self,
        festival_id: &FestivalId,
        desired: impl IntoIterator<Item = FestivalGigOrder>,
    ) -> Result<ReconcileResult> {
        let desired = DesiredLineup::new(desired);
        let result = LineupReconciler::new(self)
            .reconcile(festival_id, &desired)
            .await?;
        Ok(result)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn gigs(&self) -> Vec<Gig> {
        self.gigs.data().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.gigs.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.gigs.error()
    }

    pub fn pagination(&self) -> Pagination {
        *self.pagination.read()
    }

    pub fn filters(&self) -> GigFilters {
        self.filters.read().clone()
    }

    pub fn importing(&self) -> bool {
        self.import.is_loading()
    }

    pub fn import_result(&self) -> Option<ImportResult> {
        self.import.data()
    }

    pub fn import_error(&self) -> Option<String> {
        self.import.error()
    }

    pub fn saving(&self) -> bool {
        self.upsert.is_loading()
    }

    pub fn save_error(&self) -> Option<String> {
        self.upsert.error()
    }

    pub fn enriching(&self) -> bool {
        self.enrich.is_loading()
    }

    pub fn enrich_error(&self) -> Option<String> {
        self.enrich.error()
    }

    pub fn gig_detail(&self) -> &AsyncResource<Gig> {
        &self.gig_detail
    }

    pub fn artists(&self) -> Vec<Artist> {
        self.artists.data().unwrap_or_default()
    }

    pub fn loading_artists(&self) -> bool {
        self.artists.is_loading()
    }

    pub fn venues(&self) -> Vec<Venue> {
        self.venues.data().unwrap_or_default()
    }

    pub fn loading_venues(&self) -> bool {
        self.venues.is_loading()
    }

    pub fn attendees(&self) -> Vec<Attendee> {
        self.attendees.data().unwrap_or_default()
    }

    pub fn loading_attendees(&self) -> bool {
        self.attendees.is_loading()
    }

    pub fn festivals(&self) -> Vec<Festival> {
        self.festivals.data().unwrap_or_default()
    }

    pub fn loading_festivals(&self) -> bool {
        self.festivals.is_loading()
    }

    pub fn festivals_error(&self) -> Option<String> {
        self.festivals.error()
    }

    pub fn festival_detail(&self) -> &AsyncResource<Festival> {
        &self.festival_detail
    }

    pub fn saving_festival(&self) -> bool {
        self.upsert_festival.is_loading()
    }

    pub fn festival_save_error(&self) -> Option<String> {
        self.upsert_festival.error()
    }

    pub fn enriching_festival(&self) -> bool {
        self.enrich_festival.is_loading()
    }

    pub fn enrich_festival_error(&self) -> Option<String> {
        self.enrich_festival.error()
    }
}

#[async_trait]
impl<A: Api> LineupStore for GigStore<A> {
    async fn festival(
        &self,
        id: &FestivalId,
        force: bool,
    ) -> std::result::Result<Festival, ApiError> {
        self.fetch_festival(id, force).await
    }

    async fn gig(&self, id: &GigId) -> std::result::Result<Gig, ApiError> {
        self.fetch_gig(id).await
    }

    async fn update_gig(
        &self,
        id: &GigId,
        request: UpsertGigRequest,
    ) -> std::result::Result<Gig, ApiError> {
        self.upsert
            .try_run(|| self.submit_gig(Some(id), &request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigbook_api::{ApiCall, GigAct, InMemoryApi, SetlistEntry, TicketType};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap_or_default()
    }

    fn gig(id: &str, day: u32, festival: Option<u32>) -> Gig {
        Gig {
            id: GigId::new(id),
            venue_id: VenueId::new(format!("venue-{id}")),
            venue_name: Some(format!("Stage {id}")),
            venue_city: Some("Pilton".to_string()),
            festival_id: festival.map(|_| FestivalId::new("glasto")),
            festival_name: festival.map(|_| "Glastonbury".to_string()),
            date: date(6, day),
            order: festival.unwrap_or(0),
            ticket_cost: Some(335.0),
            ticket_type: TicketType::new("Weekend"),
            image_url: None,
            acts: vec![
                GigAct {
                    artist_id: ArtistId::new(format!("artist-{id}")),
                    artist_name: Some(format!("Artist {id}")),
                    is_headliner: true,
                    order: 1,
                    setlist: vec![SetlistEntry {
                        title: Some("Opener".to_string()),
                    }],
                },
                GigAct {
                    artist_id: ArtistId::new("support"),
                    artist_name: Some("Support".to_string()),
                    is_headliner: false,
                    order: 2,
                    setlist: Vec::new(),
                },
            ],
            attendees: Vec::new(),
        }
    }

    fn festival() -> Festival {
        Festival {
            id: FestivalId::new("glasto"),
            name: "Glastonbury".to_string(),
            year: Some(2024),
            image_url: None,
            start_date: Some(date(6, 26)),
            end_date: Some(date(6, 30)),
            gigs: Vec::new(),
        }
    }

    fn lineup_api() -> InMemoryApi {
        InMemoryApi::new()
            .with_festival(festival())
            .with_gig(gig("a", 26, Some(1)))
            .with_gig(gig("b", 27, Some(2)))
            .with_gig(gig("c", 28, Some(3)))
            .with_gig(gig("d", 29, None))
    }

    fn paged_api(count: u32) -> InMemoryApi {
        (1..=count).fold(InMemoryApi::new(), |api, day| {
            api.with_gig(gig(&format!("g{day:02}"), day, None))
        })
    }

    fn ids(gigs: &[Gig]) -> Vec<String> {
        gigs.iter().map(|g| g.id.to_string()).collect()
    }

    fn desired(ids: &[&str]) -> Vec<FestivalGigOrder> {
        ids.iter()
            .zip(1u32..)
            .map(|(id, order)| FestivalGigOrder::new(*id, order))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_gigs_updates_pagination() {
        let store = GigStore::new(paged_api(5));

        let gigs = store
            .fetch_gigs(FetchGigsOptions {
                page: Some(1),
                page_size: Some(2),
                ..FetchGigsOptions::default()
            })
            .await;

        assert_eq!(gigs.map(|g| ids(&g)), Some(vec!["g05".to_string(), "g04".to_string()]));
        assert_eq!(
            store.pagination(),
            Pagination {
                page: 1,
                page_size: 2,
                total_items: 5,
                total_pages: 3,
            }
        );
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_appends_until_last_page() {
        let store = GigStore::new(paged_api(5));
        store.set_pagination(1, 2).await;

        assert!(store.load_more_gigs().await);
        assert!(store.load_more_gigs().await);
        assert!(!store.load_more_gigs().await);

        assert_eq!(ids(&store.gigs()), vec!["g05", "g04", "g03", "g02", "g01"]);
        assert_eq!(store.pagination().page, 3);
    }

    #[tokio::test]
    async fn test_set_filters_fetches_first_page() {
        let api = paged_api(3);
        let store = GigStore::new(api.clone()).with_page_size(50);
        let filters = GigFilters {
            search: Some("g02".to_string()),
            ..GigFilters::default()
        };

        store.set_filters(filters.clone()).await;

        assert_eq!(store.filters(), filters);
        assert_eq!(ids(&store.gigs()), vec!["g02"]);
        assert_eq!(
            api.calls(),
            vec![ApiCall::ListGigs(GigQuery {
                page: Some(1),
                page_size: Some(50),
                search: Some("g02".to_string()),
                ..GigQuery::default()
            })]
        );
    }

    #[tokio::test]
    async fn test_fetch_gig_is_cache_first() -> std::result::Result<(), ApiError> {
        let api = paged_api(2);
        let store = GigStore::new(api.clone());
        store.set_pagination(1, 10).await;
        api.clear_calls();

        let cached = store.fetch_gig(&GigId::new("g01")).await?;
        assert_eq!(cached.id, GigId::new("g01"));
        assert!(api.calls().is_empty());

        let missing = store.fetch_gig(&GigId::new("ghost")).await;
        assert_eq!(missing.map_err(|e| e.status_code()), Err(Some(404)));
        assert_eq!(api.calls(), vec![ApiCall::GetGig(GigId::new("ghost"))]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_stale_gigs() {
        let api = paged_api(2);
        let store = GigStore::new(api.clone());
        store.set_pagination(1, 10).await;

        api.fail_when(
            |call| matches!(call, ApiCall::ListGigs(_)),
            ApiError::status(500, Some("Database unavailable".to_string())),
        );
        store.set_pagination(1, 10).await;

        assert_eq!(store.gigs().len(), 2);
        assert_eq!(store.error().as_deref(), Some("Database unavailable"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_festival_upserts_into_list() -> std::result::Result<(), ApiError> {
        let api = lineup_api();
        let store = GigStore::new(api.clone());

        let first = store.fetch_festival(&FestivalId::new("glasto"), false).await?;
        assert_eq!(first.gigs.len(), 3);
        assert_eq!(store.festivals().len(), 1);

        api.clear_calls();
        store.fetch_festival(&FestivalId::new("glasto"), false).await?;
        assert!(api.calls().is_empty());

        store.fetch_festival(&FestivalId::new("glasto"), true).await?;
        assert_eq!(api.calls().len(), 1);
        assert_eq!(store.festivals().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_festival_gigs_issues_four_full_updates() -> Result<()> {
        let api = lineup_api();
        let store = GigStore::new(api.clone());
        let before: Vec<Gig> = ["a", "b", "c", "d"]
            .iter()
            .filter_map(|id| api.stored_gig(&GigId::new(*id)))
            .collect();

        let result = store
            .update_festival_gigs(&FestivalId::new("glasto"), desired(&["b", "c", "d"]))
            .await?;

        assert!(result.all_succeeded());
        let updates = api.gig_updates();
        let updated: Vec<&str> = updates.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(updated, vec!["d", "a", "b", "c"]);

        for (id, request) in &updates {
            let original = before.iter().find(|g| &g.id == id);
            assert_eq!(original.map(|g| &g.venue_id), Some(&request.venue_id));
            assert_eq!(original.map(|g| g.date), Some(request.date));
            assert_eq!(original.map(|g| &g.ticket_type), Some(&request.ticket_type));
            assert_eq!(original.and_then(|g| g.ticket_cost), request.ticket_cost);
            assert_eq!(request.acts.len(), 2);
            assert_eq!(
                request.acts.iter().map(|a| a.order).collect::<Vec<_>>(),
                vec![1, 2]
            );
        }

        let orders: Vec<(String, u32)> = result
            .festival
            .map(|f| f.gigs.iter().map(|g| (g.id.to_string(), g.order)).collect())
            .unwrap_or_default();
        assert_eq!(
            orders,
            vec![
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 3)
            ]
        );
        assert_eq!(
            store
                .festivals()
                .first()
                .map(|f| f.gigs.len()),
            Some(3)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_festival_gigs_is_idempotent() -> Result<()> {
        let api = lineup_api();
        let store = GigStore::new(api.clone());

        let result = store
            .update_festival_gigs(&FestivalId::new("glasto"), desired(&["a", "b", "c"]))
            .await?;

        assert!(result.converged);
        assert!(api.gig_updates().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_festival_gigs_reports_rejected_update() -> Result<()> {
        let api = lineup_api();
        api.fail_when(
            |call| matches!(call, ApiCall::UpdateGig(id, _) if id.as_str() == "a"),
            ApiError::status(409, Some("Gig is locked".to_string())),
        );
        let store = GigStore::new(api.clone());

        let result = store
            .update_festival_gigs(&FestivalId::new("glasto"), desired(&["b", "c", "d"]))
            .await?;

        assert_eq!(result.actions_failed.len(), 1);
        assert_eq!(result.actions_failed[0].0.gig_id(), &GigId::new("a"));
        assert_eq!(result.actions_taken.len(), 3);
        assert_eq!(store.save_error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_festival_gigs_unknown_festival() {
        let store = GigStore::new(lineup_api());

        let result = store
            .update_festival_gigs(&FestivalId::new("nope"), desired(&["a"]))
            .await;

        assert!(matches!(result, Err(crate::StoreError::Lineup(_))));
    }

    #[tokio::test]
    async fn test_update_gig_failure_lands_on_save_channel() {
        let api = lineup_api();
        api.fail_when(
            |call| matches!(call, ApiCall::UpdateGig(..)),
            ApiError::status(422, Some("Date is required".to_string())),
        );
        let store = GigStore::new(api.clone());
        let request = gigbook_reconciler::build_upsert(&gig("d", 29, None), None, 0);

        let saved = store.update_gig(&GigId::new("d"), &request).await;

        assert_eq!(saved, None);
        assert_eq!(store.save_error().as_deref(), Some("Date is required"));
        assert!(!store.saving());
    }

    #[tokio::test]
    async fn test_create_gig_refreshes_list() {
        let api = paged_api(1);
        let store = GigStore::new(api.clone());
        let request = gigbook_reconciler::build_upsert(&gig("new", 20, None), None, 0);

        let created = store.create_gig(&request).await;

        assert!(created.is_some());
        assert_eq!(store.gigs().len(), 2);
        assert_eq!(store.save_error(), None);
    }

    #[tokio::test]
    async fn test_delete_gig_refreshes_list() {
        let api = paged_api(2);
        let store = GigStore::new(api.clone());
        let request = gigbook_reconciler::build_upsert(&gig("g01", 1, None), None, 0);
        store.update_gig(&GigId::new("g01"), &request).await;

        store.delete_gig(&GigId::new("g01")).await;

        assert_eq!(ids(&store.gigs()), vec!["g02"]);
        assert_eq!(store.save_error(), None);
        assert_eq!(api.stored_gig(&GigId::new("g01")), None);
    }

    #[tokio::test]
    async fn test_import_gigs_refreshes_list() {
        let api = paged_api(1);
        let store = GigStore::new(api.clone());

        let result = store
            .import_gigs("gigs.csv", b"date,venue\n2024-01-01,Roundhouse\n".to_vec())
            .await;

        assert!(result.is_some());
        assert!(!store.importing());
        assert!(api
            .calls()
            .iter()
            .any(|call| matches!(call, ApiCall::ListGigs(_))));
    }

    #[tokio::test]
    async fn test_festival_crud_refreshes_list() -> std::result::Result<(), ApiError> {
        let api = InMemoryApi::new();
        let store = GigStore::new(api.clone());
        let request = UpsertFestivalRequest {
            name: "Green Man".to_string(),
            year: Some(2024),
            image_url: None,
            start_date: None,
            end_date: None,
        };

        let created = store
            .create_festival(&request)
            .await
            .ok_or_else(|| ApiError::not_found("festival"))?;
        assert_eq!(store.festivals().len(), 1);

        let renamed = UpsertFestivalRequest {
            name: "Green Man 2024".to_string(),
            ..request
        };
        let updated = store.update_festival(&created.id, &renamed).await;
        assert_eq!(updated.map(|f| f.name), Some("Green Man 2024".to_string()));

        store.delete_festival(&created.id).await;
        assert!(store.festivals().is_empty());
        assert_eq!(store.festival_save_error(), None);
        Ok(())
    }

    #[test]
    fn test_pagination_defaults_for_missing_metadata() {
        let response: Paginated<Gig> = Paginated {
            page: None,
            page_size: Some(0),
            total_count: None,
            total_pages: Some(0),
            items: Vec::new(),
        };

        assert_eq!(Pagination::from_response(&response), Pagination::default());
        assert!(!Pagination::default().has_more());
    }

    #[tokio::test]
    async fn test_load_more_without_page_number_in_response_terminates() {
        let api = paged_api(5).without_page_numbers();
        let store = GigStore::new(api.clone());
        store.set_pagination(1, 2).await;

        let mut pages_loaded = 0;
        while pages_loaded < 10 && store.load_more_gigs().await {
            pages_loaded += 1;
        }

        assert_eq!(pages_loaded, 2);
        assert_eq!(ids(&store.gigs()), vec!["g05", "g04", "g03", "g02", "g01"]);
        assert_eq!(store.pagination().page, 3);
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_load_more_stops_when_page_fails() {
        let api = paged_api(5);
        let store = GigStore::new(api.clone());
        store.set_pagination(1, 2).await;
        api.fail_when(
            |call| matches!(call, ApiCall::ListGigs(_)),
            ApiError::status(503, None),
        );

        assert!(!store.load_more_gigs().await);
        assert!(store.error().is_some());
        assert_eq!(store.pagination().page, 1);
    }

    #[tokio::test]
    async fn test_set_filters_at_page_keeps_filters_for_later_pages() {
        let api = (1..=6).fold(paged_api(3), |api, day| {
            api.with_gig(gig(&format!("jazz{day}"), day, None))
        });
        let store = GigStore::new(api.clone()).with_page_size(2);
        let filters = GigFilters {
            search: Some("jazz".to_string()),
            ..GigFilters::default()
        };

        store.set_filters_at_page(filters.clone(), 2).await;
        assert_eq!(store.filters(), filters);
        assert_eq!(ids(&store.gigs()), vec!["jazz4", "jazz3"]);

        assert!(store.load_more_gigs().await);
        let last = api.calls().pop();
        assert_eq!(
            last,
            Some(ApiCall::ListGigs(GigQuery {
                page: Some(3),
                page_size: Some(2),
                search: Some("jazz".to_string()),
                ..GigQuery::default()
            }))
        );
        assert_eq!(ids(&store.gigs()), vec!["jazz4", "jazz3", "jazz2", "jazz1"]);
    }
}
