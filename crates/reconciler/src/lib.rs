//! Festival lineup reconciliation.
//!
//! A festival's lineup is not stored on the festival. Each gig carries a
//! festival reference and an order, so changing a lineup means updating
//! gigs one by one. This crate follows the reconciliation pattern:
//!
//! - **Desired State**: the caller's ordered lineup ([`DesiredLineup`])
//! - **Actual State**: the festival's current member gigs
//! - **Diff**: [`LineupPlan`] with gigs to add, remove and reorder
//! - **Actions**: one full-replace gig update per [`LineupAction`]
//!
//! Updates are applied sequentially. A failed update does not stop the
//! batch; it is reported in the [`ReconcileResult`].
//!
//! # Example
//!
//! ```ignore
//! use gigbook_reconciler::{DesiredLineup, LineupReconciler};
//!
//! let desired = DesiredLineup::from_ids(gig_ids);
//! let result = LineupReconciler::new(&gig_store)
//!     .reconcile(&festival_id, &desired)
//!     .await?;
//!
//! for (action, error) in &result.actions_failed {
//!     eprintln!("{}: {error}", action.description());
//! }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod payload;
pub mod reconciler;
pub mod types;

// Re-export main types
pub use error::{Error, Result};
pub use payload::{already_placed, build_upsert};
pub use reconciler::{LineupReconciler, LineupStore};
pub use types::{DesiredLineup, LineupAction, LineupPlan, ReconcileResult};
