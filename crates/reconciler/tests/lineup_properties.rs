//! Property-based tests for lineup reconciliation.
//!
//! Uses proptest to validate:
//! - Desired lineups are renumbered densely with unique gigs
//! - Plans partition the current and desired gigs without overlap
//! - Reconciling converges, and reconciling again issues no updates

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use gigbook_api::{
    ApiError, Festival, FestivalApi, FestivalGigOrder, FestivalId, Gig, GigApi, GigId,
    InMemoryApi, TicketType, UpsertGigRequest, VenueId,
};
use gigbook_reconciler::{DesiredLineup, LineupPlan, LineupReconciler, LineupStore};
use proptest::prelude::*;

const UNIVERSE: usize = 8;

struct DirectStore {
    api: InMemoryApi,
}

#[async_trait]
impl LineupStore for DirectStore {
    async fn festival(&self, id: &FestivalId, _force: bool) -> Result<Festival, ApiError> {
        self.api.get_festival(id).await
    }

    async fn gig(&self, id: &GigId) -> Result<Gig, ApiError> {
        self.api.get_gig(id).await
    }

    async fn update_gig(&self, id: &GigId, request: UpsertGigRequest) -> Result<Gig, ApiError> {
        GigApi::update_gig(&self.api, id, &request).await
    }
}

fn gig_id(index: usize) -> GigId {
    GigId::new(format!("g{index}"))
}

fn festival_id() -> FestivalId {
    FestivalId::new("f1")
}

fn seeded_api(members: &BTreeSet<usize>) -> InMemoryApi {
    let festival = Festival {
        id: festival_id(),
        name: "Primavera".to_string(),
        year: Some(2025),
        image_url: None,
        start_date: None,
        end_date: None,
        gigs: Vec::new(),
    };

    (0..UNIVERSE).fold(InMemoryApi::new().with_festival(festival), |api, index| {
        let position = members.iter().position(|m| *m == index);
        api.with_gig(Gig {
            id: gig_id(index),
            venue_id: VenueId::new("parc-del-forum"),
            venue_name: Some("Parc del Forum".to_string()),
            venue_city: Some("Barcelona".to_string()),
            festival_id: position.map(|_| festival_id()),
            festival_name: position.map(|_| "Primavera".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap_or_default(),
            order: position.map_or(0, |p| p as u32 + 1),
            ticket_cost: Some(295.0),
            ticket_type: TicketType::default(),
            image_url: None,
            acts: Vec::new(),
            attendees: Vec::new(),
        })
    })
}

fn desired_from(entries: &[(usize, u32)]) -> DesiredLineup {
    DesiredLineup::new(
        entries
            .iter()
            .map(|(index, order)| FestivalGigOrder::new(gig_id(*index), *order)),
    )
}

proptest! {
    /// Property: normalized orders are exactly 1..=len over unique gigs
    #[test]
    fn prop_desired_lineup_is_dense(
        entries in proptest::collection::vec((0usize..UNIVERSE, 0u32..20), 0..12),
    ) {
        let desired = desired_from(&entries);

        let orders: Vec<u32> = desired.entries().iter().map(|e| e.order).collect();
        let expected: Vec<u32> = (1..=desired.len() as u32).collect();
        prop_assert_eq!(orders, expected);

        let unique_input: BTreeSet<usize> = entries.iter().map(|(i, _)| *i).collect();
        prop_assert_eq!(desired.len(), unique_input.len());
    }

    /// Property: add/remove/reorder partition current and desired gigs
    #[test]
    fn prop_plan_partitions_gigs(
        current in proptest::collection::btree_set(0usize..UNIVERSE, 0..UNIVERSE),
        entries in proptest::collection::vec((0usize..UNIVERSE, 0u32..20), 0..12),
    ) {
        let current_ids: Vec<GigId> = current.iter().map(|i| gig_id(*i)).collect();
        let desired = desired_from(&entries);

        let plan = LineupPlan::diff(&current_ids, &desired);

        let current_set: BTreeSet<&GigId> = current_ids.iter().collect();
        let desired_set: BTreeSet<&GigId> = desired.ids().collect();

        prop_assert!(plan.to_add.iter().all(|id| !current_set.contains(id)));
        prop_assert!(plan.to_remove.iter().all(|id| !desired_set.contains(id)));
        prop_assert!(plan.to_reorder.iter().all(|id| current_set.contains(id) && desired_set.contains(id)));

        let kept: BTreeSet<&GigId> = plan.to_add.iter().chain(&plan.to_reorder).collect();
        prop_assert_eq!(kept, desired_set);

        let touched: BTreeSet<&GigId> = plan.to_remove.iter().chain(&plan.to_reorder).collect();
        prop_assert_eq!(touched, current_set);
    }

    /// Property: reconciling converges and a second pass is a no-op
    #[test]
    fn prop_reconcile_converges_and_is_idempotent(
        current in proptest::collection::btree_set(0usize..UNIVERSE, 0..UNIVERSE),
        entries in proptest::collection::vec((0usize..UNIVERSE, 0u32..20), 0..12),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let store = DirectStore { api: seeded_api(&current) };
        let desired = desired_from(&entries);

        let (first, second) = runtime.block_on(async {
            let reconciler = LineupReconciler::new(&store);
            let first = reconciler.reconcile(&festival_id(), &desired).await?;
            store.api.clear_calls();
            let second = reconciler.reconcile(&festival_id(), &desired).await?;
            Ok::<_, gigbook_reconciler::Error>((first, second))
        }).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert!(first.all_succeeded());

        let members: Vec<(GigId, u32)> = first
            .festival
            .as_ref()
            .map(|f| f.gigs.iter().map(|g| (g.id.clone(), g.order)).collect())
            .unwrap_or_default();
        let expected: Vec<(GigId, u32)> = desired
            .entries()
            .iter()
            .map(|e| (e.gig_id.clone(), e.order))
            .collect();
        prop_assert_eq!(members, expected);

        prop_assert!(second.converged);
        prop_assert!(store.api.gig_updates().is_empty());
    }
}
