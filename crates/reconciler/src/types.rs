//! Core types for the reconciler.

use std::collections::HashSet;

use either::Either;
use gigbook_api::{Festival, FestivalGigOrder, FestivalId, GigId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Desired festival lineup.
///
/// Normalized on construction: duplicate gig ids keep their first
/// occurrence, entries are stably sorted by the caller's order, and orders
/// are renumbered densely from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredLineup {
    entries: Vec<FestivalGigOrder>,
}

impl DesiredLineup {
    /// Normalize a caller-supplied lineup.
    pub fn new(entries: impl IntoIterator<Item = FestivalGigOrder>) -> Self {
        let entries = entries
            .into_iter()
            .unique_by(|entry| entry.gig_id.clone())
            .sorted_by_key(|entry| entry.order)
            .zip(1u32..)
            .map(|(entry, order)| FestivalGigOrder::new(entry.gig_id, order))
            .collect();

        Self { entries }
    }

    /// Lineup in list order.
    pub fn from_ids(ids: impl IntoIterator<Item = GigId>) -> Self {
        Self::new(
            ids.into_iter()
                .zip(1u32..)
                .map(|(id, order)| FestivalGigOrder::new(id, order)),
        )
    }

    /// Normalized entries, orders `1..=len`.
    pub fn entries(&self) -> &[FestivalGigOrder] {
        &self.entries
    }

    /// Gig ids in lineup order.
    pub fn ids(&self) -> impl Iterator<Item = &GigId> {
        self.entries.iter().map(|entry| &entry.gig_id)
    }

    /// Normalized order of a gig, if it is part of the lineup.
    pub fn order_of(&self, gig_id: &GigId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| &entry.gig_id == gig_id)
            .map(|entry| entry.order)
    }

    pub fn contains(&self, gig_id: &GigId) -> bool {
        self.order_of(gig_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set difference between a festival's current members and a desired
/// lineup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineupPlan {
    /// Desired gigs that are not members yet, in lineup order.
    pub to_add: Vec<GigId>,
    /// Current members that are not desired, in current order.
    pub to_remove: Vec<GigId>,
    /// Gigs in both, in lineup order.
    pub to_reorder: Vec<GigId>,
}

impl LineupPlan {
    /// Compute the plan from the current member ids.
    pub fn diff<'a>(current: impl IntoIterator<Item = &'a GigId>, desired: &DesiredLineup) -> Self {
        let current: Vec<&GigId> = current.into_iter().unique().collect();
        let current_set: HashSet<&GigId> = current.iter().copied().collect();

        let (to_add, to_reorder): (Vec<GigId>, Vec<GigId>) =
            desired.ids().partition_map(|id| {
                if current_set.contains(id) {
                    Either::Right(id.clone())
                } else {
                    Either::Left(id.clone())
                }
            });

        let to_remove = current
            .into_iter()
            .filter(|id| !desired.contains(id))
            .cloned()
            .collect();

        Self {
            to_add,
            to_remove,
            to_reorder,
        }
    }

    /// Compute the plan from a festival record.
    pub fn for_festival(festival: &Festival, desired: &DesiredLineup) -> Self {
        Self::diff(festival.gigs.iter().map(|gig| &gig.id), desired)
    }

    /// Actions in application order: adds, removes, then reorders.
    pub fn actions(&self, desired: &DesiredLineup) -> Vec<LineupAction> {
        let target_order = |id: &GigId| desired.order_of(id).unwrap_or_default();

        self.to_add
            .iter()
            .map(|id| LineupAction::Add {
                gig_id: id.clone(),
                order: target_order(id),
            })
            .chain(self.to_remove.iter().map(|id| LineupAction::Remove {
                gig_id: id.clone(),
            }))
            .chain(self.to_reorder.iter().map(|id| LineupAction::Reorder {
                gig_id: id.clone(),
                order: target_order(id),
            }))
            .collect()
    }

    /// Total number of gigs the plan touches.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len() + self.to_reorder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One gig update of a lineup reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineupAction {
    /// Move a gig into the festival.
    Add { gig_id: GigId, order: u32 },
    /// Take a gig out of the festival.
    Remove { gig_id: GigId },
    /// Keep a gig in the festival at a new position.
    Reorder { gig_id: GigId, order: u32 },
}

impl LineupAction {
    /// Get the gig this action targets.
    pub fn gig_id(&self) -> &GigId {
        match self {
            Self::Add { gig_id, .. } | Self::Remove { gig_id } | Self::Reorder { gig_id, .. } => {
                gig_id
            }
        }
    }

    /// Order the gig ends up with. Removed gigs go back to 0.
    pub fn target_order(&self) -> u32 {
        match self {
            Self::Add { order, .. } | Self::Reorder { order, .. } => *order,
            Self::Remove { .. } => 0,
        }
    }

    /// Whether the gig ends up a member of the festival.
    pub fn keeps_membership(&self) -> bool {
        !matches!(self, Self::Remove { .. })
    }

    /// Get a description of the action.
    pub fn description(&self) -> String {
        match self {
            Self::Add { gig_id, order } => format!("add gig {gig_id} at position {order}"),
            Self::Remove { gig_id } => format!("remove gig {gig_id}"),
            Self::Reorder { gig_id, order } => format!("move gig {gig_id} to position {order}"),
        }
    }
}

/// Result of a lineup reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    /// Festival the lineup belongs to.
    pub festival_id: FestivalId,
    /// Actions whose update succeeded.
    pub actions_taken: Vec<LineupAction>,
    /// Actions that failed, with the reason.
    pub actions_failed: Vec<(LineupAction, Error)>,
    /// Actions skipped because the gig already had the target membership.
    pub skipped: Vec<LineupAction>,
    /// Festival as re-fetched after the batch, if that fetch succeeded.
    pub festival: Option<Festival>,
    /// Whether the lineup already matched: nothing taken, nothing failed.
    pub converged: bool,
}

impl ReconcileResult {
    /// Create a new reconcile result.
    pub fn new(
        festival_id: FestivalId,
        actions_taken: Vec<LineupAction>,
        actions_failed: Vec<(LineupAction, Error)>,
        skipped: Vec<LineupAction>,
        festival: Option<Festival>,
    ) -> Self {
        let converged = actions_taken.is_empty() && actions_failed.is_empty();
        Self {
            festival_id,
            actions_taken,
            actions_failed,
            skipped,
            festival,
            converged,
        }
    }

    /// Check if all actions succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.actions_failed.is_empty()
    }
}
