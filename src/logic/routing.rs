//! Slot routing: where a match's winner goes next and where a winners-bracket
//! loser drops to. Pure functions over the bracket's fixed shape.

use crate::models::{Bracket, MatchRef, Segment};

/// Scale a match index from a round of `from_len` matches onto a round of
/// `to_len` matches. Equal sizes map 1:1, a halving maps pairs onto one match.
fn scaled_index(index: usize, from_len: usize, to_len: usize) -> usize {
    let target = if from_len <= to_len {
        index
    } else {
        index * to_len / from_len
    };
    target.min(to_len.saturating_sub(1))
}

/// Destination of a winners-bracket winner: the next winners round, or F1
/// from the winners final.
pub fn next_winners_match(bracket: &Bracket, at: MatchRef) -> MatchRef {
    if at.round + 1 >= bracket.winners.len() {
        return MatchRef::F1;
    }
    MatchRef::winners(at.round + 1, at.index / 2)
}

/// Losers round (0-based) that receives the losers of winners round `round`.
///
/// Round 1 feeds L1; every later winners round feeds the second round of the
/// matching losers pair, where dropouts meet the survivors of the previous
/// losers round.
pub fn dropdown_round(round: usize) -> usize {
    if round == 0 {
        0
    } else {
        round * 2 - 1
    }
}

/// Destination of a winners-bracket loser. `None` when there is no losers
/// bracket to drop into (a two-team bracket), in which case the loser goes
/// straight to F1.
pub fn dropdown_match(bracket: &Bracket, at: MatchRef) -> Option<MatchRef> {
    let target_round = dropdown_round(at.round);
    let target_len = bracket.round_len(Segment::Losers, target_round);
    if target_len == 0 {
        log::debug!(
            "W{} has no losers round to drop into (losers rounds: {})",
            at.round + 1,
            bracket.losers.len()
        );
        return None;
    }
    let from_len = bracket.round_len(Segment::Winners, at.round);
    Some(MatchRef::losers(
        target_round,
        scaled_index(at.index, from_len, target_len),
    ))
}

/// Destination of a losers-bracket winner: the next non-empty losers round, or
/// F1 from the losers final.
pub fn next_losers_match(bracket: &Bracket, at: MatchRef) -> MatchRef {
    let from_len = bracket.round_len(Segment::Losers, at.round);
    let next = (at.round + 1..bracket.losers.len())
        .find(|&round| !bracket.losers[round].is_empty());
    match next {
        Some(round) => {
            let to_len = bracket.losers[round].len();
            MatchRef::losers(round, scaled_index(at.index, from_len, to_len))
        }
        None => MatchRef::F1,
    }
}

/// Matches fed directly by `at`: the winner's destination and, for winners
/// matches, the loser's. F1 feeds F2 (the reset).
pub fn feeds(bracket: &Bracket, at: MatchRef) -> Vec<MatchRef> {
    match at.segment {
        Segment::Winners => {
            let mut targets = vec![next_winners_match(bracket, at)];
            if let Some(drop) = dropdown_match(bracket, at) {
                targets.push(drop);
            }
            targets
        }
        Segment::Losers => vec![next_losers_match(bracket, at)],
        Segment::Finals if at == MatchRef::F1 => vec![MatchRef::F2],
        Segment::Finals => Vec::new(),
    }
}

/// Every match reachable from `at` through [`feeds`], excluding `at` itself,
/// in replay order.
pub fn downstream(bracket: &Bracket, at: MatchRef) -> Vec<MatchRef> {
    let mut seen: Vec<MatchRef> = Vec::new();
    let mut pending = feeds(bracket, at);
    while let Some(next) = pending.pop() {
        if seen.contains(&next) {
            continue;
        }
        seen.push(next);
        pending.extend(feeds(bracket, next));
    }
    seen.sort();
    seen
}
