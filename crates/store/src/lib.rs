//! # gigbook-store
//!
//! Stores owned by the composition root and passed by reference:
//!
//! - [`GigStore`]: gigs with pagination and filters, festivals, catalog
//!   lists, saves, enrichment, CSV import and lineup reconciliation
//! - [`DashboardStore`]: one resource per dashboard endpoint
//! - [`EntityForm`]: save / remove / fetch with notifications and a redirect
//! - [`QuerySync`]: two-way binding of a value to a query-string key
//! - [`PreferencesStore`]: view preferences persisted as TOML
//! - [`ProjectImageStore`]: server-side image optimisation
//!
//! Every remote value lives in a [`gigbook_core::AsyncResource`], so
//! failures land on that resource's error channel instead of being
//! returned.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod dashboard;
pub mod entity_form;
pub mod error;
pub mod gig_store;
pub mod navigation;
pub mod notify;
pub mod preferences;
pub mod project_images;
pub mod query_sync;

pub use dashboard::{DEFAULT_TOP_LIMIT, DashboardStore};
pub use entity_form::{EntityActions, EntityForm, FestivalActions, GENERIC_ERROR, GigActions};
pub use error::{Result, StoreError};
pub use gig_store::{FetchGigsOptions, GigFilters, GigStore, Pagination};
pub use navigation::{MemoryNavigator, Navigator, QueryParams, Route, routes};
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use preferences::{Preferences, PreferencesStore, ViewMode};
pub use project_images::ProjectImageStore;
pub use query_sync::QuerySync;
