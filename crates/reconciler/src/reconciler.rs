//! Reconciler implementation.

use async_trait::async_trait;
use gigbook_api::{ApiError, Festival, FestivalId, Gig, GigId, UpsertGigRequest};
use gigbook_core::describe_failure;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::payload::{already_placed, build_upsert};
use crate::types::{DesiredLineup, LineupAction, LineupPlan, ReconcileResult};

/// Reads and writes the reconciler needs.
///
/// Implemented by the gig store so that fetches go through its cache and
/// updates through its save channel.
#[async_trait]
pub trait LineupStore: Send + Sync {
    /// Fetch a festival, cache-first unless `force`.
    async fn festival(&self, id: &FestivalId, force: bool) -> std::result::Result<Festival, ApiError>;

    /// Fetch a gig, cache-first.
    async fn gig(&self, id: &GigId) -> std::result::Result<Gig, ApiError>;

    /// Full-replace update of a gig.
    async fn update_gig(
        &self,
        id: &GigId,
        request: UpsertGigRequest,
    ) -> std::result::Result<Gig, ApiError>;
}

enum Applied {
    Updated,
    Skipped,
}

/// Converges a festival's lineup onto a desired one.
///
/// Each gig update is awaited before the next is issued. A failed update
/// is recorded and the batch continues.
pub struct LineupReconciler<'a, S: LineupStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: LineupStore + ?Sized> LineupReconciler<'a, S> {
    /// Create a new reconciler over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the festival (cache-first) and compute its plan.
    pub async fn plan(
        &self,
        festival_id: &FestivalId,
        desired: &DesiredLineup,
    ) -> Result<(Festival, LineupPlan)> {
        let festival = self
            .store
            .festival(festival_id, false)
            .await
            .map_err(|e| Error::festival_unavailable(festival_id, describe_failure(&e)))?;

        let plan = LineupPlan::for_festival(&festival, desired);
        Ok((festival, plan))
    }

    /// Reconcile the festival's lineup onto `desired`.
    ///
    /// Fails only when the festival itself cannot be fetched. After the
    /// batch the festival is re-fetched bypassing the cache.
    pub async fn reconcile(
        &self,
        festival_id: &FestivalId,
        desired: &DesiredLineup,
    ) -> Result<ReconcileResult> {
        let (festival, plan) = self.plan(festival_id, desired).await?;

        info!(
            festival = %festival_id,
            desired = desired.len(),
            actual = festival.gigs.len(),
            to_add = plan.to_add.len(),
            to_remove = plan.to_remove.len(),
            to_reorder = plan.to_reorder.len(),
            "Starting lineup reconciliation"
        );

        let actions = plan.actions(desired);
        let (taken, failed, skipped) = self.apply_actions(&festival, actions).await;

        let refreshed = match self.store.festival(festival_id, true).await {
            Ok(festival) => Some(festival),
            Err(e) => {
                warn!(festival = %festival_id, error = %e, "Failed to refresh festival");
                None
            }
        };

        let result = ReconcileResult::new(festival_id.clone(), taken, failed, skipped, refreshed);

        if result.converged {
            info!(festival = %festival_id, "Lineup already converged");
        } else {
            info!(
                festival = %festival_id,
                actions_taken = result.actions_taken.len(),
                actions_failed = result.actions_failed.len(),
                skipped = result.skipped.len(),
                "Lineup reconciliation complete"
            );
        }

        Ok(result)
    }

    /// Apply actions one at a time.
    async fn apply_actions(
        &self,
        festival: &Festival,
        actions: Vec<LineupAction>,
    ) -> (Vec<LineupAction>, Vec<(LineupAction, Error)>, Vec<LineupAction>) {
        let mut taken = Vec::new();
        let mut failed = Vec::new();
        let mut skipped = Vec::new();

        for action in actions {
            debug!(action = %action.description(), "Applying action");

            match self.apply_action(festival, &action).await {
                Ok(Applied::Updated) => taken.push(action),
                Ok(Applied::Skipped) => {
                    debug!(gig = %action.gig_id(), "Gig already in place");
                    skipped.push(action);
                }
                Err(e) => {
                    warn!(action = %action.description(), error = %e, "Action failed");
                    failed.push((action, e));
                }
            }
        }

        (taken, failed, skipped)
    }

    async fn apply_action(&self, festival: &Festival, action: &LineupAction) -> Result<Applied> {
        let gig_id = action.gig_id();
        let gig = self
            .store
            .gig(gig_id)
            .await
            .map_err(|e| Error::gig_unavailable(gig_id, describe_failure(&e)))?;

        let membership = action.keeps_membership().then_some(festival);
        let order = action.target_order();
        if already_placed(&gig, membership, order) {
            return Ok(Applied::Skipped);
        }

        let request = build_upsert(&gig, membership, order);
        self.store
            .update_gig(gig_id, request)
            .await
            .map_err(|e| Error::update_failed(gig_id, describe_failure(&e)))?;

        Ok(Applied::Updated)
    }
}
