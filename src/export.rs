//! CSV export of standings.

use crate::models::RankingEntry;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct RankingRow<'a> {
    position: usize,
    team: &'a str,
    wins: u32,
    losses: u32,
    placement: Option<u32>,
}

/// Write `entries` as CSV with a header row. Unplaced teams get an empty
/// placement column.
pub fn write_rankings_csv<W: io::Write>(entries: &[RankingEntry], writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for e in entries {
        out.serialize(RankingRow {
            position: e.display_position,
            team: &e.team,
            wins: e.wins,
            losses: e.losses,
            placement: e.placement,
        })?;
    }
    out.flush()?;
    Ok(())
}
