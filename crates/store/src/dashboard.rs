//! Dashboard store: one resource per dashboard endpoint.

use gigbook_api::{
    ArtistInsights, AverageTicketPriceByYear, DashboardApi, DashboardStats, GigsPerMonth,
    GigsPerYear, InterestingInsights, MostHeardSong, TemporalStats, TopArtist, TopCity, TopVenue,
    VenueInsights,
};
use gigbook_core::AsyncResource;
use tracing::info;

/// Number of entries the top-N endpoints return unless told otherwise.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Store backing the dashboard page.
pub struct DashboardStore<A> {
    api: A,
    stats: AsyncResource<DashboardStats>,
    price_chart: AsyncResource<Vec<AverageTicketPriceByYear>>,
    gigs_per_year: AsyncResource<Vec<GigsPerYear>>,
    gigs_per_month: AsyncResource<Vec<GigsPerMonth>>,
    temporal_stats: AsyncResource<TemporalStats>,
    artist_insights: AsyncResource<ArtistInsights>,
    venue_insights: AsyncResource<VenueInsights>,
    top_artists: AsyncResource<Vec<TopArtist>>,
    top_venues: AsyncResource<Vec<TopVenue>>,
    top_cities: AsyncResource<Vec<TopCity>>,
    interesting_insights: AsyncResource<InterestingInsights>,
    most_heard_songs: AsyncResource<Vec<MostHeardSong>>,
}

impl<A> std::fmt::Debug for DashboardStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("stats", &self.stats.data())
            .finish_non_exhaustive()
    }
}

impl<A: DashboardApi> DashboardStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            stats: AsyncResource::new(),
            price_chart: AsyncResource::new(),
            gigs_per_year: AsyncResource::new(),
            gigs_per_month: AsyncResource::new(),
            temporal_stats: AsyncResource::new(),
            artist_insights: AsyncResource::new(),
            venue_insights: AsyncResource::new(),
            top_artists: AsyncResource::new(),
            top_venues: AsyncResource::new(),
            top_cities: AsyncResource::new(),
            interesting_insights: AsyncResource::new(),
            most_heard_songs: AsyncResource::new(),
        }
    }

    pub async fn fetch_stats(&self) -> Option<DashboardStats> {
        self.stats.run(|| self.api.dashboard_stats()).await
    }

    pub async fn fetch_price_chart(&self) -> Option<Vec<AverageTicketPriceByYear>> {
        self.price_chart
            .run(|| self.api.average_ticket_price_by_year())
            .await
    }

    pub async fn fetch_gigs_per_year(&self) -> Option<Vec<GigsPerYear>> {
        self.gigs_per_year.run(|| self.api.gigs_per_year()).await
    }

    pub async fn fetch_gigs_per_month(&self) -> Option<Vec<GigsPerMonth>> {
        self.gigs_per_month.run(|| self.api.gigs_per_month()).await
    }

    pub async fn fetch_temporal_stats(&self) -> Option<TemporalStats> {
        self.temporal_stats.run(|| self.api.temporal_stats()).await
    }

    pub async fn fetch_artist_insights(&self) -> Option<ArtistInsights> {
        self.artist_insights.run(|| self.api.artist_insights()).await
    }

    pub async fn fetch_venue_insights(&self) -> Option<VenueInsights> {
        self.venue_insights.run(|| self.api.venue_insights()).await
    }

    pub async fn fetch_top_artists(&self, limit: Option<u32>) -> Option<Vec<TopArtist>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
        self.top_artists.run(|| self.api.top_artists(limit)).await
    }

    pub async fn fetch_top_venues(&self, limit: Option<u32>) -> Option<Vec<TopVenue>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
        self.top_venues.run(|| self.api.top_venues(limit)).await
    }

    pub async fn fetch_top_cities(&self, limit: Option<u32>) -> Option<Vec<TopCity>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
        self.top_cities.run(|| self.api.top_cities(limit)).await
    }

    pub async fn fetch_interesting_insights(&self) -> Option<InterestingInsights> {
        self.interesting_insights
            .run(|| self.api.interesting_insights())
            .await
    }

    pub async fn fetch_most_heard_songs(&self, limit: Option<u32>) -> Option<Vec<MostHeardSong>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
        self.most_heard_songs
            .run(|| self.api.most_heard_songs(limit))
            .await
    }

    /// Fetch every dashboard resource concurrently.
    ///
    /// Each resource settles on its own; one failing endpoint does not
    /// affect the others.
    pub async fn fetch_all(&self, limit: Option<u32>) {
        info!(limit = limit.unwrap_or(DEFAULT_TOP_LIMIT), "Fetching dashboard");
        tokio::join!(
            self.fetch_stats(),
            self.fetch_price_chart(),
            self.fetch_gigs_per_year(),
            self.fetch_gigs_per_month(),
            self.fetch_temporal_stats(),
            self.fetch_artist_insights(),
            self.fetch_venue_insights(),
            self.fetch_top_artists(limit),
            self.fetch_top_venues(limit),
            self.fetch_top_cities(limit),
            self.fetch_interesting_insights(),
            self.fetch_most_heard_songs(limit),
        );
    }

    /// Whether any dashboard resource is loading.
    pub fn is_loading(&self) -> bool {
        [
            self.stats.is_loading(),
            self.price_chart.is_loading(),
            self.gigs_per_year.is_loading(),
            self.gigs_per_month.is_loading(),
            self.temporal_stats.is_loading(),
            self.artist_insights.is_loading(),
            self.venue_insights.is_loading(),
            self.top_artists.is_loading(),
            self.top_venues.is_loading(),
            self.top_cities.is_loading(),
            self.interesting_insights.is_loading(),
            self.most_heard_songs.is_loading(),
        ]
        .into_iter()
        .any(|loading| loading)
    }

    /// Errors of every failed resource, labelled by endpoint.
    pub fn errors(&self) -> Vec<(&'static str, String)> {
        [
            ("stats", self.stats.error()),
            ("average-ticket-price-by-year", self.price_chart.error()),
            ("gigs-per-year", self.gigs_per_year.error()),
            ("gigs-per-month", self.gigs_per_month.error()),
            ("temporal-stats", self.temporal_stats.error()),
            ("artist-insights", self.artist_insights.error()),
            ("venue-insights", self.venue_insights.error()),
            ("top-artists", self.top_artists.error()),
            ("top-venues", self.top_venues.error()),
            ("top-cities", self.top_cities.error()),
            ("interesting-insights", self.interesting_insights.error()),
            ("most-heard-songs", self.most_heard_songs.error()),
        ]
        .into_iter()
        .filter_map(|(endpoint, error)| error.map(|e| (endpoint, e)))
        .collect()
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.stats.data()
    }

    pub fn price_chart(&self) -> Vec<AverageTicketPriceByYear> {
        self.price_chart.data().unwrap_or_default()
    }

    pub fn gigs_per_year(&self) -> Vec<GigsPerYear> {
        self.gigs_per_year.data().unwrap_or_default()
    }

    pub fn gigs_per_month(&self) -> Vec<GigsPerMonth> {
        self.gigs_per_month.data().unwrap_or_default()
    }

    pub fn temporal_stats(&self) -> Option<TemporalStats> {
        self.temporal_stats.data()
    }

    pub fn artist_insights(&self) -> Option<ArtistInsights> {
        self.artist_insights.data()
    }

    pub fn venue_insights(&self) -> Option<VenueInsights> {
        self.venue_insights.data()
    }

    pub fn top_artists(&self) -> Vec<TopArtist> {
        self.top_artists.data().unwrap_or_default()
    }

    pub fn top_venues(&self) -> Vec<TopVenue> {
        self.top_venues.data().unwrap_or_default()
    }

    pub fn top_cities(&self) -> Vec<TopCity> {
        self.top_cities.data().unwrap_or_default()
    }

    pub fn interesting_insights(&self) -> Option<InterestingInsights> {
        self.interesting_insights.data()
    }

    pub fn most_heard_songs(&self) -> Vec<MostHeardSong> {
        self.most_heard_songs.data().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigbook_api::{ApiCall, ApiError, ArtistId, DashboardData, InMemoryApi};

    fn dashboard_api() -> InMemoryApi {
        let top_artists = (1..=15)
            .map(|n| TopArtist {
                artist_id: ArtistId::new(format!("artist-{n}")),
                name: format!("Artist {n}"),
                gig_count: 20 - n,
                image_url: None,
            })
            .collect();

        InMemoryApi::new().with_dashboard(DashboardData {
            stats: DashboardStats {
                total_gigs: 120,
                total_artists: 80,
                total_venues: 35,
                total_festivals: 6,
                total_spent: Some(5400.0),
                average_ticket_price: Some(45.0),
            },
            top_artists,
            ..DashboardData::default()
        })
    }

    #[tokio::test]
    async fn test_fetch_all_fills_every_resource() {
        let api = dashboard_api();
        let store = DashboardStore::new(api.clone());

        store.fetch_all(None).await;

        assert!(!store.is_loading());
        assert!(store.errors().is_empty());
        assert_eq!(store.stats().map(|s| s.total_gigs), Some(120));
        assert_eq!(store.top_artists().len(), DEFAULT_TOP_LIMIT as usize);
        assert!(store.temporal_stats().is_some());
        assert_eq!(api.calls().len(), 12);
    }

    #[tokio::test]
    async fn test_top_limit_is_forwarded() {
        let api = dashboard_api();
        let store = DashboardStore::new(api.clone());

        store.fetch_top_artists(Some(3)).await;

        assert_eq!(store.top_artists().len(), 3);
        assert_eq!(
            api.calls(),
            vec![ApiCall::Dashboard {
                endpoint: "top-artists",
                limit: Some(3),
            }]
        );
    }

    #[tokio::test]
    async fn test_one_failing_endpoint_does_not_block_others() {
        let api = dashboard_api();
        api.fail_when(
            |call| matches!(call, ApiCall::Dashboard { endpoint: "top-cities", .. }),
            ApiError::status(503, None),
        );
        let store = DashboardStore::new(api);

        store.fetch_all(Some(5)).await;

        let errors = store.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "top-cities");
        assert!(store.top_cities().is_empty());
        assert_eq!(store.top_artists().len(), 5);
    }
}
