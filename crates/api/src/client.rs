//! HTTP client for the gigbook REST API.
//!
//! `GigbookClient` implements every transport trait on top of `reqwest`.
//! Paths are joined relative to the configured base URL, so a server
//! mounted under a prefix (`https://host/gigbook/`) works unchanged.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::transport::{
    ArtistApi, AttendeeApi, DashboardApi, FestivalApi, GigApi, ProjectImageApi, VenueApi,
};
use crate::types::{
    Artist, ArtistId, ArtistInsights, Attendee, AttendeeId, AverageTicketPriceByYear,
    DashboardStats, Festival, FestivalId, Gig, GigId, GigQuery, GigsPerMonth, GigsPerYear,
    ImportResult, InterestingInsights, MostHeardSong, Paginated, TemporalStats, TopArtist,
    TopCity, TopVenue, UpsertArtistRequest, UpsertAttendeeRequest, UpsertFestivalRequest,
    UpsertGigRequest, UpsertVenueRequest, Venue, VenueId, VenueInsights,
};

/// Client for the gigbook REST API.
#[derive(Debug, Clone)]
pub struct GigbookClient {
    config: Arc<ApiConfig>,
    base_url: Url,
    http_client: reqwest::Client,
    /// Cancels the in-flight gig list request when a newer one starts.
    list_slot: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl GigbookClient {
    /// Create a new client. Fails when no base URL is configured.
    pub fn with_config(config: ApiConfig) -> Result<Self> {
        let mut base_url = config.require_base_url()?.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::config_error(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            base_url,
            http_client,
            list_slot: Arc::new(Mutex::new(None)),
        })
    }

    /// Create a client for `base_url` with default settings.
    pub fn with_url(base_url: Url) -> Result<Self> {
        Self::with_config(ApiConfig::with_url(base_url))
    }

    /// Configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(method = %method, url = %url, "Sending request");

        let builder = self.http_client.request(method, url);
        Ok(match self.config.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }

    async fn get_json_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized + Sync,
    {
        let response = send(self.request(Method::GET, path)?.query(query)).await?;
        Ok(response.json().await?)
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = send(self.request(method, path)?.json(body)).await?;
        Ok(response.json().await?)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::POST, path)?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Run `request`, abandoning it with [`ApiError::Cancelled`] if another
    /// supersedable request starts before it finishes.
    async fn superseding<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        if !self.config.supersede_lists {
            return request.await;
        }

        let (tx, rx) = oneshot::channel();
        let previous = self.list_slot.lock().replace(tx);
        if let Some(previous) = previous {
            // The previous request may already have finished
            let _ = previous.send(());
        }

        tokio::select! {
            result = request => result,
            Ok(()) = rx => {
                debug!("List request superseded by a newer one");
                Err(ApiError::Cancelled)
            }
        }
    }
}

/// Send a request and turn non-success statuses into [`ApiError::Status`].
async fn send(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_message(&body);
    debug!(status = status.as_u16(), message = ?message, "Request rejected");

    Err(ApiError::status(status.as_u16(), message))
}

/// Extract a readable message from an error body.
///
/// JSON bodies are searched for `message`, `detail`, the first validation
/// error and `title`, in that order. Plain text is used as-is unless it
/// looks like an HTML error page.
fn parse_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => non_blank(&text),
        Ok(serde_json::Value::Object(fields)) => {
            let field = |key: &str| fields.get(key).and_then(|v| v.as_str()).and_then(non_blank);

            field("message")
                .or_else(|| field("detail"))
                .or_else(|| first_validation_error(fields.get("errors")))
                .or_else(|| field("title"))
        }
        Ok(_) => None,
        Err(_) if body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}

/// First message of a `{"Field": ["message", ...]}` validation map.
fn first_validation_error(errors: Option<&serde_json::Value>) -> Option<String> {
    errors?
        .as_object()?
        .values()
        .filter_map(|messages| messages.as_array())
        .flatten()
        .find_map(|m| m.as_str().and_then(non_blank))
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[derive(Serialize)]
struct LimitQuery {
    limit: u32,
}

#[async_trait]
impl GigApi for GigbookClient {
    async fn list_gigs(&self, query: &GigQuery) -> Result<Paginated<Gig>> {
        self.superseding(self.get_json_query("api/gigs", query))
            .await
    }

    async fn get_gig(&self, id: &GigId) -> Result<Gig> {
        self.get_json(&format!("api/gigs/{id}")).await
    }

    async fn create_gig(&self, request: &UpsertGigRequest) -> Result<Gig> {
        self.send_json(Method::POST, "api/gigs", request).await
    }

    async fn update_gig(&self, id: &GigId, request: &UpsertGigRequest) -> Result<Gig> {
        self.send_json(Method::PUT, &format!("api/gigs/{id}"), request)
            .await
    }

    async fn delete_gig(&self, id: &GigId) -> Result<()> {
        self.delete(&format!("api/gigs/{id}")).await
    }

    async fn enrich_gig(&self, id: &GigId) -> Result<Gig> {
        self.post_empty(&format!("api/gigs/{id}/enrich")).await
    }

    async fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportResult> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = send(self.request(Method::POST, "api/import/csv")?.multipart(form)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FestivalApi for GigbookClient {
    async fn list_festivals(&self) -> Result<Vec<Festival>> {
        self.get_json("api/festivals").await
    }

    async fn get_festival(&self, id: &FestivalId) -> Result<Festival> {
        self.get_json(&format!("api/festivals/{id}")).await
    }

    async fn create_festival(&self, request: &UpsertFestivalRequest) -> Result<Festival> {
        self.send_json(Method::POST, "api/festivals", request).await
    }

    async fn update_festival(
        &self,
        id: &FestivalId,
        request: &UpsertFestivalRequest,
    ) -> Result<Festival> {
        self.send_json(Method::PUT, &format!("api/festivals/{id}"), request)
            .await
    }

    async fn delete_festival(&self, id: &FestivalId) -> Result<()> {
        self.delete(&format!("api/festivals/{id}")).await
    }

    async fn enrich_festival(&self, id: &FestivalId) -> Result<Festival> {
        self.post_empty(&format!("api/festivals/{id}/enrich")).await
    }
}

#[async_trait]
impl ArtistApi for GigbookClient {
    async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.get_json("api/artists").await
    }

    async fn get_artist(&self, id: &ArtistId) -> Result<Artist> {
        self.get_json(&format!("api/artists/{id}")).await
    }

    async fn create_artist(&self, request: &UpsertArtistRequest) -> Result<Artist> {
        self.send_json(Method::POST, "api/artists", request).await
    }

    async fn update_artist(&self, id: &ArtistId, request: &UpsertArtistRequest) -> Result<Artist> {
        self.send_json(Method::PUT, &format!("api/artists/{id}"), request)
            .await
    }

    async fn delete_artist(&self, id: &ArtistId) -> Result<()> {
        self.delete(&format!("api/artists/{id}")).await
    }
}

#[async_trait]
impl VenueApi for GigbookClient {
    async fn list_venues(&self) -> Result<Vec<Venue>> {
        self.get_json("api/venues").await
    }

    async fn get_venue(&self, id: &VenueId) -> Result<Venue> {
        self.get_json(&format!("api/venues/{id}")).await
    }

    async fn create_venue(&self, request: &UpsertVenueRequest) -> Result<Venue> {
        self.send_json(Method::POST, "api/venues", request).await
    }

    async fn update_venue(&self, id: &VenueId, request: &UpsertVenueRequest) -> Result<Venue> {
        self.send_json(Method::PUT, &format!("api/venues/{id}"), request)
            .await
    }

    async fn delete_venue(&self, id: &VenueId) -> Result<()> {
        self.delete(&format!("api/venues/{id}")).await
    }
}

#[async_trait]
impl AttendeeApi for GigbookClient {
    async fn list_attendees(&self) -> Result<Vec<Attendee>> {
        self.get_json("api/attendees").await
    }

    async fn get_attendee(&self, id: &AttendeeId) -> Result<Attendee> {
        self.get_json(&format!("api/attendees/{id}")).await
    }

    async fn create_attendee(&self, request: &UpsertAttendeeRequest) -> Result<Attendee> {
        self.send_json(Method::POST, "api/attendees", request).await
    }

    async fn update_attendee(
        &self,
        id: &AttendeeId,
        request: &UpsertAttendeeRequest,
    ) -> Result<Attendee> {
        self.send_json(Method::PUT, &format!("api/attendees/{id}"), request)
            .await
    }

    async fn delete_attendee(&self, id: &AttendeeId) -> Result<()> {
        self.delete(&format!("api/attendees/{id}")).await
    }
}

#[async_trait]
impl DashboardApi for GigbookClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("api/dashboard/stats").await
    }

    async fn average_ticket_price_by_year(&self) -> Result<Vec<AverageTicketPriceByYear>> {
        self.get_json("api/dashboard/average-ticket-price-by-year")
            .await
    }

    async fn gigs_per_year(&self) -> Result<Vec<GigsPerYear>> {
        self.get_json("api/dashboard/gigs-per-year").await
    }

    async fn gigs_per_month(&self) -> Result<Vec<GigsPerMonth>> {
        self.get_json("api/dashboard/gigs-per-month").await
    }

    async fn temporal_stats(&self) -> Result<TemporalStats> {
        self.get_json("api/dashboard/temporal-stats").await
    }

    async fn artist_insights(&self) -> Result<ArtistInsights> {
        self.get_json("api/dashboard/artist-insights").await
    }

    async fn venue_insights(&self) -> Result<VenueInsights> {
        self.get_json("api/dashboard/venue-insights").await
    }

    async fn top_artists(&self, limit: u32) -> Result<Vec<TopArtist>> {
        self.get_json_query("api/dashboard/top-artists", &LimitQuery { limit })
            .await
    }

    async fn top_venues(&self, limit: u32) -> Result<Vec<TopVenue>> {
        self.get_json_query("api/dashboard/top-venues", &LimitQuery { limit })
            .await
    }

    async fn top_cities(&self, limit: u32) -> Result<Vec<TopCity>> {
        self.get_json_query("api/dashboard/top-cities", &LimitQuery { limit })
            .await
    }

    async fn interesting_insights(&self) -> Result<InterestingInsights> {
        self.get_json("api/dashboard/interesting-insights").await
    }

    async fn most_heard_songs(&self, limit: u32) -> Result<Vec<MostHeardSong>> {
        self.get_json_query("api/dashboard/most-heard-songs", &LimitQuery { limit })
            .await
    }
}

#[async_trait]
impl ProjectImageApi for GigbookClient {
    async fn optimise_project_images(&self) -> Result<serde_json::Value> {
        let response = send(self.request(Method::PUT, "api/projectimage/optimise")?).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gig_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "venueId": "v1",
            "venueName": "Brixton Academy",
            "date": "2024-06-28",
            "ticketType": "Standing",
            "acts": []
        })
    }

    fn client_for(server: &MockServer) -> std::result::Result<GigbookClient, Box<dyn std::error::Error>> {
        let base_url = server.uri().parse::<Url>()?;
        Ok(GigbookClient::with_url(base_url)?)
    }

    #[test]
    fn test_parse_error_message_prefers_message_field() {
        let body = r#"{"title":"Bad Request","message":"Date is required"}"#;
        assert_eq!(parse_error_message(body).as_deref(), Some("Date is required"));
    }

    #[test]
    fn test_parse_error_message_reads_validation_errors() {
        let body = r#"{"title":"One or more validation errors occurred.","errors":{"VenueId":["The VenueId field is required."]}}"#;
        assert_eq!(
            parse_error_message(body).as_deref(),
            Some("The VenueId field is required.")
        );
    }

    #[test]
    fn test_parse_error_message_plain_text_and_html() {
        assert_eq!(parse_error_message("Gig not found").as_deref(), Some("Gig not found"));
        assert_eq!(parse_error_message("<html><body>502</body></html>"), None);
        assert_eq!(parse_error_message("   "), None);
    }

    #[test]
    fn test_client_without_base_url_fails() {
        let result = GigbookClient::with_config(ApiConfig::default());
        assert!(matches!(result, Err(ApiError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_list_gigs_sends_pascal_case_query() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/gigs"))
            .and(query_param("Page", "2"))
            .and(query_param("PageSize", "50"))
            .and(query_param("Search", "jazz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 2,
                "pageSize": 50,
                "totalCount": 51,
                "totalPages": 2,
                "items": [gig_json("g51")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let query = GigQuery {
            page: Some(2),
            page_size: Some(50),
            search: Some("jazz".to_string()),
            ..Default::default()
        };

        let page = client.list_gigs(&query).await?;

        assert_eq!(page.total_pages, Some(2));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, GigId::new("g51"));
        Ok(())
    }

    #[tokio::test]
    async fn test_optimise_images_puts_and_passes_body_through() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/projectimage/optimise"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "optimised": 12
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let result = client.optimise_project_images().await?;

        assert_eq!(result["optimised"], 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_optimise_images_empty_body_is_null() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/projectimage/optimise"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let result = client.optimise_project_images().await?;

        assert_eq!(result, serde_json::Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/artists"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "a1", "name": "Radiohead"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ApiConfig::with_url(mock_server.uri().parse()?).access_token("secret");
        let client = GigbookClient::with_config(config)?;

        let artists = client.list_artists().await?;
        assert_eq!(artists[0].name, "Radiohead");
        Ok(())
    }

    #[tokio::test]
    async fn test_base_url_prefix_is_kept() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gigbook/api/venues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/gigbook", mock_server.uri()).parse::<Url>()?;
        let client = GigbookClient::with_url(base_url)?;

        assert!(client.list_venues().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_gig_puts_full_payload() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/gigs/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gig_json("g1")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let request: UpsertGigRequest = serde_json::from_value(serde_json::json!({
            "venueId": "v1",
            "date": "2024-06-28",
            "ticketType": "Standing"
        }))?;

        let gig = client.update_gig(&GigId::new("g1"), &request).await?;
        assert_eq!(gig.venue_name.as_deref(), Some("Brixton Academy"));
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_error_carries_server_message()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/festivals"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "Name is required"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let request = UpsertFestivalRequest {
            name: String::new(),
            year: None,
            image_url: None,
            start_date: None,
            end_date: None,
        };

        let result = client.create_festival(&request).await;

        assert_eq!(
            result.err(),
            Some(ApiError::Status {
                status: 422,
                category: ErrorCategory::Validation,
                message: Some("Name is required".to_string()),
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_without_body() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/festivals/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let result = client.get_festival(&FestivalId::new("missing")).await;

        assert_eq!(
            result.err(),
            Some(ApiError::Status {
                status: 404,
                category: ErrorCategory::NotFound,
                message: None,
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/gigs/g1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        client.delete_gig(&GigId::new("g1")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_import_csv_uploads_multipart() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/import/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "imported": 3,
                "skipped": 1,
                "errors": ["row 4: missing date"]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let result = client
            .import_csv("gigs.csv", b"date,venue\n2024-06-28,Brixton\n".to_vec())
            .await?;

        assert_eq!(result.imported, 3);
        assert_eq!(result.errors.len(), 1);

        let requests = mock_server.received_requests().await.unwrap_or_default();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data"));
        Ok(())
    }

    #[tokio::test]
    async fn test_top_artists_sends_limit() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/dashboard/top-artists"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"artistId": "a1", "name": "Radiohead", "gigCount": 4}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;
        let top = client.top_artists(5).await?;
        assert_eq!(top[0].gig_count, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_list_request_cancels_older()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/gigs"))
            .and(query_param("Page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"items": [gig_json("old")]}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/gigs"))
            .and(query_param("Page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"items": [gig_json("new")]})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server)?;

        let first = tokio::spawn({
            let client = client.clone();
            async move {
                let query = GigQuery {
                    page: Some(1),
                    ..Default::default()
                };
                client.list_gigs(&query).await
            }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;

        let query = GigQuery {
            page: Some(2),
            ..Default::default()
        };
        let second = client.list_gigs(&query).await?;

        assert_eq!(second.items[0].id, GigId::new("new"));
        assert_eq!(first.await?.err(), Some(ApiError::Cancelled));
        Ok(())
    }

    #[tokio::test]
    async fn test_request_timeout() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&mock_server)
            .await;

        let config = ApiConfig::with_url(mock_server.uri().parse()?)
            .timeout(Duration::from_millis(100));
        let client = GigbookClient::with_config(config)?;

        let result = client.dashboard_stats().await;
        assert_eq!(result.err(), Some(ApiError::Timeout));
        Ok(())
    }
}
