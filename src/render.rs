//! Plain-text rendering of store contents.

use std::fmt::Write as _;

use gigbook_api::{Festival, Gig, ImportResult};
use gigbook_reconciler::{LineupPlan, ReconcileResult};
use gigbook_store::{DashboardStore, Pagination, ViewMode};

fn headliner(gig: &Gig) -> &str {
    gig.acts
        .iter()
        .find(|act| act.is_headliner)
        .or_else(|| gig.acts.first())
        .and_then(|act| act.artist_name.as_deref())
        .unwrap_or("Unknown artist")
}

fn venue(gig: &Gig) -> String {
    match (gig.venue_name.as_deref(), gig.venue_city.as_deref()) {
        (Some(name), Some(city)) => format!("{name}, {city}"),
        (Some(name), None) => name.to_string(),
        (None, Some(city)) => city.to_string(),
        (None, None) => gig.venue_id.to_string(),
    }
}

fn price(cost: Option<f64>) -> String {
    cost.map_or_else(|| "-".to_string(), |c| format!("{c:.2}"))
}

/// Render a gig list in the given layout.
pub fn gigs(gigs: &[Gig], mode: ViewMode) -> String {
    if gigs.is_empty() {
        return "No gigs found\n".to_string();
    }

    let mut out = String::new();
    match mode {
        ViewMode::Card => {
            for gig in gigs {
                let _ = writeln!(out, "{}  [{}]", headliner(gig), gig.id);
                let _ = writeln!(out, "  {} at {}", gig.date, venue(gig));
                if let Some(festival) = &gig.festival_name {
                    let _ = writeln!(out, "  {festival} #{}", gig.order);
                }
                let _ = writeln!(out, "  {} {}", gig.ticket_type.as_str(), price(gig.ticket_cost));
                out.push('\n');
            }
        }
        ViewMode::List => {
            for gig in gigs {
                let _ = writeln!(out, "{}  {} @ {}  ({})", gig.date, headliner(gig), venue(gig), gig.id);
            }
        }
        ViewMode::Table => {
            let rows: Vec<[String; 5]> = gigs
                .iter()
                .map(|gig| {
                    [
                        gig.id.to_string(),
                        gig.date.to_string(),
                        headliner(gig).to_string(),
                        venue(gig),
                        price(gig.ticket_cost),
                    ]
                })
                .collect();
            let header = ["ID", "DATE", "ARTIST", "VENUE", "PRICE"].map(str::to_string);

            let widths: Vec<usize> = (0..5)
                .map(|col| {
                    std::iter::once(&header)
                        .chain(&rows)
                        .map(|row| row[col].chars().count())
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            for row in std::iter::once(&header).chain(&rows) {
                let line = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, width)| format!("{cell:<width$}", width = *width))
                    .collect::<Vec<_>>()
                    .join("  ");
                let _ = writeln!(out, "{}", line.trim_end());
            }
        }
    }
    out
}

pub fn pagination(pagination: &Pagination, shown: usize) -> String {
    format!(
        "Page {} of {} ({} gigs total, {} shown)\n",
        pagination.page, pagination.total_pages, pagination.total_items, shown
    )
}

pub fn gig(gig: &Gig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", headliner(gig), gig.id);
    let _ = writeln!(out, "Date:    {}", gig.date);
    let _ = writeln!(out, "Venue:   {}", venue(gig));
    if let Some(festival) = &gig.festival_name {
        let _ = writeln!(out, "Festival: {festival} (#{})", gig.order);
    }
    let _ = writeln!(out, "Ticket:  {} {}", gig.ticket_type.as_str(), price(gig.ticket_cost));
    for act in &gig.acts {
        let marker = if act.is_headliner { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {}. {}",
            act.order,
            act.artist_name.as_deref().unwrap_or(act.artist_id.as_str())
        );
        for entry in act.setlist.iter().filter_map(|e| e.title.as_deref()) {
            let _ = writeln!(out, "     - {entry}");
        }
    }
    if !gig.attendees.is_empty() {
        let names: Vec<&str> = gig.attendees.iter().map(|a| a.name.as_str()).collect();
        let _ = writeln!(out, "With:    {}", names.join(", "));
    }
    out
}

pub fn festivals(festivals: &[Festival]) -> String {
    if festivals.is_empty() {
        return "No festivals found\n".to_string();
    }
    festivals
        .iter()
        .map(|f| {
            let year = f.year.map(|y| format!(" {y}")).unwrap_or_default();
            format!("{}{}  ({} gigs)  [{}]\n", f.name, year, f.gigs.len(), f.id)
        })
        .collect()
}

pub fn festival(festival: &Festival) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", festival.name, festival.id);
    if let Some(year) = festival.year {
        let _ = writeln!(out, "Year:  {year}");
    }
    if let (Some(start), Some(end)) = (festival.start_date, festival.end_date) {
        let _ = writeln!(out, "Dates: {start} to {end}");
    }
    let _ = writeln!(out, "Lineup:");
    for gig in &festival.gigs {
        let date = gig.date.map(|d| d.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}. {}  {}  {}",
            gig.order,
            gig.id,
            date,
            gig.venue_name.as_deref().unwrap_or("")
        );
    }
    out
}

/// One `name [id]` line per record.
pub fn named<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let lines: String = rows
        .into_iter()
        .map(|(name, id)| format!("{name}  [{id}]\n"))
        .collect();
    if lines.is_empty() {
        "Nothing found\n".to_string()
    } else {
        lines
    }
}

pub fn import(result: &ImportResult) -> String {
    let mut out = format!("Imported {} gigs, skipped {}\n", result.imported, result.skipped);
    for error in &result.errors {
        let _ = writeln!(out, "  ! {error}");
    }
    out
}

pub fn plan(plan: &LineupPlan) -> String {
    if plan.is_empty() {
        return "Lineup is empty and stays empty\n".to_string();
    }
    let list = |ids: &[gigbook_api::GigId]| {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Add:     {}\nRemove:  {}\nReorder: {}\n",
        list(&plan.to_add),
        list(&plan.to_remove),
        list(&plan.to_reorder)
    )
}

pub fn reconcile(result: &ReconcileResult) -> String {
    let mut out = String::new();
    if result.converged {
        let _ = writeln!(out, "Lineup of {} already up to date", result.festival_id);
    } else {
        let _ = writeln!(
            out,
            "Lineup of {}: {} updated, {} unchanged, {} failed",
            result.festival_id,
            result.actions_taken.len(),
            result.skipped.len(),
            result.actions_failed.len()
        );
    }
    for (action, error) in &result.actions_failed {
        let _ = writeln!(out, "  ! {}: {error}", action.description());
    }
    if let Some(festival) = &result.festival {
        out.push_str(&self::festival(festival));
    }
    out
}

pub fn dashboard<A: gigbook_api::DashboardApi>(store: &DashboardStore<A>) -> String {
    let mut out = String::new();

    if let Some(stats) = store.stats() {
        let _ = writeln!(
            out,
            "{} gigs, {} artists, {} venues, {} festivals",
            stats.total_gigs, stats.total_artists, stats.total_venues, stats.total_festivals
        );
        let _ = writeln!(
            out,
            "Spent {} (average ticket {})",
            price(stats.total_spent),
            price(stats.average_ticket_price)
        );
    }

    if let Some(temporal) = store.temporal_stats() {
        if let Some(year) = temporal.busiest_year {
            let _ = writeln!(out, "Busiest year: {year}");
        }
        let _ = writeln!(out, "Gigs this year: {}", temporal.gigs_this_year);
    }

    let per_year = store.gigs_per_year();
    if !per_year.is_empty() {
        let _ = writeln!(out, "\nGigs per year:");
        for row in per_year {
            let _ = writeln!(out, "  {}  {}", row.year, row.count);
        }
    }

    let top_artists = store.top_artists();
    if !top_artists.is_empty() {
        let _ = writeln!(out, "\nTop artists:");
        for (rank, artist) in top_artists.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {} ({})", rank + 1, artist.name, artist.gig_count);
        }
    }

    let top_venues = store.top_venues();
    if !top_venues.is_empty() {
        let _ = writeln!(out, "\nTop venues:");
        for (rank, venue) in top_venues.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {} ({})", rank + 1, venue.name, venue.gig_count);
        }
    }

    let top_cities = store.top_cities();
    if !top_cities.is_empty() {
        let _ = writeln!(out, "\nTop cities:");
        for (rank, city) in top_cities.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {} ({})", rank + 1, city.city, city.gig_count);
        }
    }

    let songs = store.most_heard_songs();
    if !songs.is_empty() {
        let _ = writeln!(out, "\nMost heard songs:");
        for song in songs {
            let artist = song.artist_name.map(|a| format!(" - {a}")).unwrap_or_default();
            let _ = writeln!(out, "  {}{artist} (x{})", song.title, song.times_heard);
        }
    }

    for (endpoint, error) in store.errors() {
        let _ = writeln!(out, "! {endpoint}: {error}");
    }
    out
}
