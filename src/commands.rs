//! CLI command handlers.
//!
//! Handlers drive the stores and return the text to print. Remote
//! failures land on the stores' resources; a handler turns a failed
//! resource into an error so the process exits non-zero.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use gigbook_api::{
    Api, ArtistId, AttendeeId, FestivalId, GigId, UpsertFestivalRequest, UpsertGigRequest,
    VenueId,
};
use gigbook_core::ResultExt;
use gigbook_reconciler::{DesiredLineup, LineupReconciler};
use gigbook_store::{
    DashboardStore, EntityForm, FestivalActions, GigActions, GigFilters, GigStore, MemoryNavigator,
    Navigator, Notifier, Preferences, PreferencesStore, ProjectImageStore, Route, ViewMode, routes,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::cli::{Commands, FestivalCommands, GigCommands, GigFilterArgs};
use crate::render;

/// Notifier printing to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn display_success_notification(&self, message: &str) {
        eprintln!("✓ {message}");
    }

    fn display_error_notification(&self, message: &str) {
        eprintln!("✗ {message}");
    }
}

/// Composition root: the stores plus the notification and navigation
/// sinks the forms report to.
pub struct App<A> {
    gigs: GigStore<A>,
    dashboard: DashboardStore<A>,
    images: ProjectImageStore<A>,
    preferences: PathBuf,
    notifier: Box<dyn Notifier>,
    navigator: MemoryNavigator,
}

impl<A: Api + Clone> App<A> {
    pub fn new(api: A, page_size: u32, preferences: impl Into<PathBuf>) -> Self {
        Self {
            gigs: GigStore::new(api.clone()).with_page_size(page_size),
            images: ProjectImageStore::new(api.clone()),
            dashboard: DashboardStore::new(api),
            preferences: preferences.into(),
            notifier: Box::new(StderrNotifier),
            navigator: MemoryNavigator::default(),
        }
    }

    /// Replace the notification sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn gig_store(&self) -> &GigStore<A> {
        &self.gigs
    }

    pub fn navigator(&self) -> &MemoryNavigator {
        &self.navigator
    }

    /// Execute a CLI command, returning its output.
    pub async fn execute(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Gigs { command } => self.gigs_command(command).await,
            Commands::Festivals { command } => self.festivals_command(command).await,
            Commands::Artists => self.cmd_artists().await,
            Commands::Venues => self.cmd_venues().await,
            Commands::Attendees => self.cmd_attendees().await,
            Commands::Dashboard { limit } => self.cmd_dashboard(limit).await,
            Commands::ViewMode { mode, projects } => {
                self.cmd_view_mode(mode.map(Into::into), projects)
            }
            Commands::OptimiseImages => self.cmd_optimise_images().await,
        }
    }

    async fn gigs_command(&self, command: GigCommands) -> Result<String> {
        match command {
            GigCommands::List {
                filters,
                page,
                all,
                view,
            } => self.cmd_gigs_list(filters, page, all, view.map(Into::into)).await,
            GigCommands::Show { id } => self.cmd_gig_show(GigId::new(id)).await,
            GigCommands::Create { file } => self.cmd_gig_save(None, &file).await,
            GigCommands::Update { id, file } => {
                self.cmd_gig_save(Some(GigId::new(id)), &file).await
            }
            GigCommands::Delete { id } => self.cmd_gig_delete(GigId::new(id)).await,
            GigCommands::Enrich { id } => self.cmd_gig_enrich(GigId::new(id)).await,
            GigCommands::Import { csv } => self.cmd_gig_import(&csv).await,
        }
    }

    async fn festivals_command(&self, command: FestivalCommands) -> Result<String> {
        match command {
            FestivalCommands::List => self.cmd_festivals_list().await,
            FestivalCommands::Show { id } => self.cmd_festival_show(FestivalId::new(id)).await,
            FestivalCommands::Create { file } => self.cmd_festival_save(None, &file).await,
            FestivalCommands::Update { id, file } => {
                self.cmd_festival_save(Some(FestivalId::new(id)), &file)
                    .await
            }
            FestivalCommands::Delete { id } => {
                self.cmd_festival_delete(FestivalId::new(id)).await
            }
            FestivalCommands::Enrich { id } => {
                self.cmd_festival_enrich(FestivalId::new(id)).await
            }
            FestivalCommands::Lineup {
                festival_id,
                gig_ids,
                dry_run,
            } => {
                self.cmd_festival_lineup(FestivalId::new(festival_id), gig_ids, dry_run)
                    .await
            }
        }
    }

    fn gig_form(&self) -> EntityForm<'_, GigActions<'_, A>> {
        EntityForm::new(
            GigActions::new(&self.gigs),
            self.notifier.as_ref(),
            &self.navigator,
            Route::new(routes::GIGS),
        )
    }

    fn festival_form(&self) -> EntityForm<'_, FestivalActions<'_, A>> {
        EntityForm::new(
            FestivalActions::new(&self.gigs),
            self.notifier.as_ref(),
            &self.navigator,
            Route::new(routes::FESTIVALS),
        )
    }

    /// Saved gig view mode. An unreadable preferences file falls back to
    /// the default layout.
    fn saved_view_mode(&self) -> ViewMode {
        PreferencesStore::load(&self.preferences)
            .map(|prefs| prefs.preferences())
            .or_default_logged(Preferences::default())
            .gigs_view_mode
    }

    // ------------------------------------------------------------------
    // Gigs
    // ------------------------------------------------------------------

    async fn cmd_gigs_list(
        &self,
        args: GigFilterArgs,
        page: u32,
        all: bool,
        view: Option<ViewMode>,
    ) -> Result<String> {
        let filters = filters_from_args(args);
        self.sync_gigs_query(&filters, page);

        self.gigs.set_filters_at_page(filters, page).await;
        while all && self.gigs.error().is_none() && self.gigs.load_more_gigs().await {}

        if let Some(error) = self.gigs.error() {
            bail!("Failed to load gigs: {error}");
        }

        let gigs = self.gigs.gigs();
        let mode = view.unwrap_or_else(|| self.saved_view_mode());
        Ok(format!(
            "{}{}",
            render::gigs(&gigs, mode),
            render::pagination(&self.gigs.pagination(), gigs.len())
        ))
    }

    /// Mirror the list filters into the current route's query string.
    fn sync_gigs_query(&self, filters: &GigFilters, page: u32) {
        let mut query = self.navigator.current_query();
        let text = [
            ("search", filters.search.clone()),
            ("city", filters.city.clone()),
            ("venueId", filters.venue_id.as_ref().map(ToString::to_string)),
            ("artistId", filters.artist_id.as_ref().map(ToString::to_string)),
        ];
        for (key, value) in text {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(value) => query.set(key, value),
                None => query.remove(key),
            }
        }
        if page > 1 {
            query.set("page", page.to_string());
        } else {
            query.remove("page");
        }
        self.navigator
            .push(Route::new(routes::GIGS).with_query(query));
    }

    async fn cmd_gig_show(&self, id: GigId) -> Result<String> {
        self.gig_form()
            .fetch(&id)
            .await
            .filter(|gig| gig.id == id)
            .map(|gig| render::gig(&gig))
            .ok_or_else(|| anyhow!("Gig {id} could not be loaded"))
    }

    async fn cmd_gig_save(&self, id: Option<GigId>, file: &Path) -> Result<String> {
        let payload: UpsertGigRequest = read_payload(file)?;
        let is_update = id.is_some();

        let gig = self
            .gig_form()
            .save(id.as_ref(), &payload, is_update)
            .await
            .ok_or_else(|| anyhow!("Gig was not saved"))?;

        Ok(render::gig(&gig))
    }

    async fn cmd_gig_delete(&self, id: GigId) -> Result<String> {
        if !self.gig_form().remove(&id).await {
            bail!("Gig {id} was not deleted");
        }
        Ok(format!("Deleted gig {id}\n"))
    }

    async fn cmd_gig_enrich(&self, id: GigId) -> Result<String> {
        match self.gigs.enrich_gig(&id).await {
            Some(gig) if self.gigs.enrich_error().is_none() => Ok(render::gig(&gig)),
            _ => bail!(
                "Failed to enrich gig {id}: {}",
                self.gigs.enrich_error().unwrap_or_default()
            ),
        }
    }

    async fn cmd_gig_import(&self, csv: &Path) -> Result<String> {
        let contents = std::fs::read(csv)
            .with_context(|| format!("Failed to read {}", csv.display()))?;
        let file_name = csv
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.csv".to_string());

        let result = self.gigs.import_gigs(&file_name, contents).await;
        match (result, self.gigs.import_error()) {
            (Some(result), None) => Ok(render::import(&result)),
            (_, error) => bail!("Import failed: {}", error.unwrap_or_default()),
        }
    }

    // ------------------------------------------------------------------
    // Festivals
    // ------------------------------------------------------------------

    async fn cmd_festivals_list(&self) -> Result<String> {
        self.gigs.fetch_festivals().await;
        if let Some(error) = self.gigs.festivals_error() {
            bail!("Failed to load festivals: {error}");
        }
        Ok(render::festivals(&self.gigs.festivals()))
    }

    async fn cmd_festival_show(&self, id: FestivalId) -> Result<String> {
        self.festival_form()
            .fetch(&id)
            .await
            .filter(|festival| festival.id == id)
            .map(|festival| render::festival(&festival))
            .ok_or_else(|| anyhow!("Festival {id} could not be loaded"))
    }

    async fn cmd_festival_save(&self, id: Option<FestivalId>, file: &Path) -> Result<String> {
        let payload: UpsertFestivalRequest = read_payload(file)?;
        let is_update = id.is_some();

        let festival = self
            .festival_form()
            .save(id.as_ref(), &payload, is_update)
            .await
            .ok_or_else(|| anyhow!("Festival was not saved"))?;

        Ok(render::festival(&festival))
    }

    async fn cmd_festival_delete(&self, id: FestivalId) -> Result<String> {
        if !self.festival_form().remove(&id).await {
            bail!("Festival {id} was not deleted");
        }
        Ok(format!("Deleted festival {id}\n"))
    }

    async fn cmd_festival_enrich(&self, id: FestivalId) -> Result<String> {
        match self.gigs.enrich_festival(&id).await {
            Some(festival) if self.gigs.enrich_festival_error().is_none() => {
                Ok(render::festival(&festival))
            }
            _ => bail!(
                "Failed to enrich festival {id}: {}",
                self.gigs.enrich_festival_error().unwrap_or_default()
            ),
        }
    }

    async fn cmd_festival_lineup(
        &self,
        festival_id: FestivalId,
        gig_ids: Vec<String>,
        dry_run: bool,
    ) -> Result<String> {
        let desired = DesiredLineup::from_ids(gig_ids.into_iter().map(GigId::new));

        if dry_run {
            let (_, plan) = LineupReconciler::new(&self.gigs)
                .plan(&festival_id, &desired)
                .await?;
            return Ok(render::plan(&plan));
        }

        info!(festival = %festival_id, gigs = desired.len(), "Updating lineup");
        let result = self
            .gigs
            .update_festival_gigs(&festival_id, desired.entries().to_vec())
            .await?;

        let output = render::reconcile(&result);
        if result.all_succeeded() {
            self.notifier
                .display_success_notification("Updated successfully");
            Ok(output)
        } else {
            eprint!("{output}");
            bail!(
                "{} of {} lineup updates failed",
                result.actions_failed.len(),
                result.actions_failed.len() + result.actions_taken.len()
            )
        }
    }

    // ------------------------------------------------------------------
    // Catalog and dashboard
    // ------------------------------------------------------------------

    async fn cmd_artists(&self) -> Result<String> {
        let artists = self
            .gigs
            .fetch_artists()
            .await
            .ok_or_else(|| anyhow!("Failed to load artists"))?;
        Ok(render::named(
            artists.iter().map(|a| (a.name.as_str(), a.id.to_string())),
        ))
    }

    async fn cmd_venues(&self) -> Result<String> {
        let venues = self
            .gigs
            .fetch_venues()
            .await
            .ok_or_else(|| anyhow!("Failed to load venues"))?;
        Ok(render::named(
            venues.iter().map(|v| (v.name.as_str(), v.id.to_string())),
        ))
    }

    async fn cmd_attendees(&self) -> Result<String> {
        let attendees = self
            .gigs
            .fetch_attendees()
            .await
            .ok_or_else(|| anyhow!("Failed to load attendees"))?;
        Ok(render::named(
            attendees.iter().map(|a| (a.name.as_str(), a.id.to_string())),
        ))
    }

    async fn cmd_dashboard(&self, limit: Option<u32>) -> Result<String> {
        self.dashboard.fetch_all(limit).await;
        Ok(render::dashboard(&self.dashboard))
    }

    fn cmd_view_mode(&self, mode: Option<ViewMode>, projects: bool) -> Result<String> {
        let preferences = PreferencesStore::load(&self.preferences)
            .context("Failed to load preferences")?;
        let list = if projects { "Projects" } else { "Gigs" };

        match mode {
            Some(mode) => {
                let saved = if projects {
                    preferences.set_projects_view_mode(mode)
                } else {
                    preferences.set_gigs_view_mode(mode)
                };
                saved.context("Failed to save preferences")?;
                self.notifier
                    .display_success_notification("Updated successfully");
                Ok(format!("{list} view mode set to {mode}\n"))
            }
            None if projects => Ok(format!("{}\n", preferences.projects_view_mode())),
            None => Ok(format!("{}\n", preferences.gigs_view_mode())),
        }
    }

    async fn cmd_optimise_images(&self) -> Result<String> {
        let result = self.images.optimise_images().await;
        if let Some(error) = self.images.optimise_error() {
            bail!("Failed to optimise images: {error}");
        }

        let body = result
            .filter(|value| !value.is_null())
            .and_then(|value| serde_json::to_string_pretty(&value).into_option_logged());
        info!("Project images optimised");
        Ok(match body {
            Some(body) => format!("Images optimised\n{body}\n"),
            None => "Images optimised\n".to_string(),
        })
    }
}

/// Turn `gigs list` arguments into store filters.
pub fn filters_from_args(args: GigFilterArgs) -> GigFilters {
    GigFilters {
        venue_id: args.venue.map(VenueId::new),
        artist_id: args.artist.map(ArtistId::new),
        attendee_id: args.attendee.map(AttendeeId::new),
        city: args.city,
        from_date: args.from_date,
        to_date: args.to_date,
        search: args.search,
        sort_by: args.sort_by.map(Into::into),
        sort_direction: args.direction.map(Into::into),
    }
}

/// Read a JSON request payload. Unknown fields are rejected.
pub fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| gigbook_core::Error::file_read_failed(path, e.to_string()))?;
    let payload = serde_json::from_str(&contents)
        .map_err(|e| gigbook_core::Error::json_parse_failed(e.to_string()))
        .with_context(|| format!("Invalid payload in {}", path.display()))?;
    Ok(payload)
}
