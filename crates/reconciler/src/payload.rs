//! Full-replace payloads for lineup updates.

use gigbook_api::{Festival, Gig, UpsertActRequest, UpsertGigRequest};

/// Build the update payload that moves `gig` to `membership` at `order`.
///
/// Every field is copied from the gig except the festival reference and
/// the order. `None` clears the festival reference. Acts are renumbered
/// 1-based by position and their setlists reduced to titles.
pub fn build_upsert(gig: &Gig, membership: Option<&Festival>, order: u32) -> UpsertGigRequest {
    let acts = gig
        .acts
        .iter()
        .zip(1u32..)
        .map(|(act, position)| UpsertActRequest {
            artist_id: act.artist_id.clone(),
            is_headliner: act.is_headliner,
            order: position,
            setlist: act
                .setlist
                .iter()
                .map(|entry| entry.title.clone().unwrap_or_default())
                .collect(),
        })
        .collect();

    UpsertGigRequest {
        venue_id: gig.venue_id.clone(),
        venue_name: gig.venue_name.clone(),
        venue_city: gig.venue_city.clone(),
        festival_id: membership.map(|f| f.id.clone()),
        festival_name: membership.map(|f| f.name.clone()),
        date: gig.date,
        order,
        ticket_cost: gig.ticket_cost,
        ticket_type: gig.ticket_type.clone(),
        image_url: gig.image_url.clone(),
        acts,
    }
}

/// Whether `gig` already has the membership and order an update would set.
pub fn already_placed(gig: &Gig, membership: Option<&Festival>, order: u32) -> bool {
    gig.festival_id.as_ref() == membership.map(|f| &f.id) && gig.order == order
}
