//! Standings: win/loss records, placements, and display order.

use crate::models::{
    Match, MatchRef, RankingEntry, Segment, Tournament, F2_ID,
};
use std::cmp::Ordering;

/// Standings in display order (placed teams first, then by record).
pub fn get_rankings(tournament: &Tournament) -> Vec<RankingEntry> {
    let mut entries = tournament.rankings.clone();
    entries.sort_by_key(|e| e.display_position);
    entries
}

/// The first `count` entries of [`get_rankings`].
pub fn top_rankings(tournament: &Tournament, count: usize) -> Vec<RankingEntry> {
    let mut entries = get_rankings(tournament);
    entries.truncate(count);
    entries
}

/// Placement earned by losing match `m`, if that loss settles one.
///
/// F2 loser, or the F1 loser who came from the losers bracket: 2nd. Losers
/// final: 3rd; the round before: 4th; earlier rounds share the band
/// `4 + rounds from the end`.
fn placement_for_loss(m: &Match, loser: &str, total_losers_rounds: u32) -> Option<u32> {
    match m.segment {
        Segment::Finals if m.id == F2_ID => Some(2),
        Segment::Finals => {
            if m.team2.as_team() == Some(loser) {
                Some(2)
            } else {
                None
            }
        }
        Segment::Losers => {
            let from_end = total_losers_rounds.saturating_sub(m.round);
            Some(match from_end {
                0 => 3,
                1 => 4,
                _ => 4 + from_end,
            })
        }
        Segment::Winners => None,
    }
}

/// Fold one decided match into the standings. Walkovers and empty matches are ignored.
pub(crate) fn apply_match(tournament: &mut Tournament, at: MatchRef) {
    let m = tournament.bracket.get(at).clone();
    let result = match tournament.results.get(&m.id) {
        Some(r) if r.is_contested() => r.clone(),
        _ => return,
    };
    let (winner, loser) = match (result.winner.as_team(), result.loser.as_team()) {
        (Some(w), Some(l)) => (w, l),
        _ => return,
    };
    let total_losers_rounds = tournament.bracket.losers.len() as u32;
    let placement = placement_for_loss(&m, loser, total_losers_rounds);

    if let Some(entry) = entry_mut(tournament, winner) {
        entry.wins += 1;
    }
    if let Some(entry) = entry_mut(tournament, loser) {
        entry.losses += 1;
        entry.eliminated_round = Some(m.round);
        entry.eliminated_segment = Some(m.segment);
        if placement.is_some() {
            entry.placement = placement;
        }
    }
}

pub(crate) fn set_placement(tournament: &mut Tournament, team: &str, placement: u32) {
    if let Some(entry) = entry_mut(tournament, team) {
        entry.placement = Some(placement);
    }
}

/// Recompute every entry from scratch by replaying results in bracket order:
/// winners rounds, losers rounds, then finals.
pub(crate) fn rebuild(tournament: &mut Tournament) {
    tournament.rankings = tournament
        .participants
        .iter()
        .map(RankingEntry::new)
        .collect();
    for at in tournament.bracket.refs() {
        apply_match(tournament, at);
    }
    if let Some(champion) = tournament.champion.clone() {
        set_placement(tournament, &champion, 1);
    }
    refresh_positions(tournament);
}

/// Assign gap-free display positions without reordering the stored entries.
pub(crate) fn refresh_positions(tournament: &mut Tournament) {
    let entries = &mut tournament.rankings;
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| standing_order(&entries[a], &entries[b]));
    for (position, idx) in order.into_iter().enumerate() {
        entries[idx].display_position = position + 1;
    }
}

/// Placed before unplaced, placement ascending, then wins descending, then
/// losses ascending.
fn standing_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    let by_placement = match (a.placement, b.placement) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_placement
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses.cmp(&b.losses))
}

fn entry_mut<'a>(tournament: &'a mut Tournament, team: &str) -> Option<&'a mut RankingEntry> {
    tournament.rankings.iter_mut().find(|e| e.team == team)
}
