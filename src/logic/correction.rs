//! Correcting a previously recorded result.

use crate::logic::byes::resolve_byes;
use crate::logic::rankings;
use crate::logic::routing::downstream;
use crate::models::{
    MatchRef, MatchResult, Slot, Tournament, TournamentError, F1_ID, F2_ID,
};

/// Change the winner of an already decided match.
///
/// The previous winner and the new winner trade places in every match the
/// result had flowed into (slots and stored results alike), so downstream
/// rounds stay consistent. Loss counters are then refolded from all results,
/// finals are reconciled, byes re-resolved and standings rebuilt.
///
/// Re-selecting the currently recorded winner is a no-op. On error the
/// tournament is left unchanged.
pub fn correct_result(
    tournament: &mut Tournament,
    match_id: &str,
    new_winner: &str,
) -> Result<(), TournamentError> {
    let at = tournament
        .bracket
        .locate(match_id)
        .ok_or_else(|| TournamentError::UnknownMatch(match_id.to_string()))?;
    let previous = tournament
        .results
        .get(match_id)
        .cloned()
        .ok_or_else(|| TournamentError::NotDecided(match_id.to_string()))?;

    let new_winner = Slot::team(new_winner);
    let new_loser = match tournament.bracket.get(at).opponent_of(&new_winner) {
        Some(Slot::Tbd) => Slot::Bye,
        Some(opponent) => opponent.clone(),
        None => {
            return Err(TournamentError::InvalidWinner {
                match_id: match_id.to_string(),
                team: new_winner.to_string(),
            })
        }
    };
    if previous.winner == new_winner && previous.loser == new_loser {
        log::debug!("{}: {} already recorded as winner", match_id, new_winner);
        return Ok(());
    }

    log::info!(
        "Correcting {}: {} -> {} as winner",
        match_id,
        previous.winner,
        new_winner
    );
    let mut next = tournament.clone();
    let scope = downstream(&next.bracket, at);
    swap_identity(&mut next, &scope, &previous.winner, &new_winner);
    next.results.insert(
        match_id.to_string(),
        MatchResult {
            winner: new_winner,
            loser: new_loser,
        },
    );

    reconcile_finals(&mut next);
    next.recount_losses();
    resolve_byes(&mut next)?;
    rankings::rebuild(&mut next);
    *tournament = next;
    Ok(())
}

fn swapped(slot: &Slot, old: &Slot, new: &Slot, both_ways: bool) -> Slot {
    if slot == old {
        new.clone()
    } else if both_ways && slot == new {
        old.clone()
    } else {
        slot.clone()
    }
}

/// Replace `old` with `new` in the given matches and their results. Swaps
/// back (`new` becomes `old`) only when both are real teams.
fn swap_identity(tournament: &mut Tournament, scope: &[MatchRef], old: &Slot, new: &Slot) {
    if old == new {
        return;
    }
    let both_ways = old.is_team() && new.is_team();
    for &at in scope {
        let m = tournament.bracket.get_mut(at);
        m.team1 = swapped(&m.team1, old, new, both_ways);
        m.team2 = swapped(&m.team2, old, new, both_ways);
        if let Some(result) = tournament.results.get_mut(&m.id) {
            result.winner = swapped(&result.winner, old, new, both_ways);
            result.loser = swapped(&result.loser, old, new, both_ways);
        }
    }
}

/// Bring F2 and the champion in line with F1's current result.
///
/// F1 won by its winners-bracket entrant ends the tournament and F2 is not
/// played. F1 won by the losers-bracket entrant needs F2 between the same two
/// teams; a stale F2 result is dropped when the pairing changed.
fn reconcile_finals(tournament: &mut Tournament) {
    let f1 = tournament.bracket.get(MatchRef::F1).clone();
    match tournament.results.get(F1_ID).cloned() {
        Some(result) if result.winner == f1.team1 => {
            clear_reset(tournament);
            tournament.champion = result.winner.as_team().map(str::to_string);
        }
        Some(_) => {
            let f2 = tournament.bracket.get_mut(MatchRef::F2);
            if f2.team1 != f1.team1 || f2.team2 != f1.team2 {
                f2.team1 = f1.team1;
                f2.team2 = f1.team2;
                tournament.results.remove(F2_ID);
            }
            tournament.champion = tournament
                .results
                .get(F2_ID)
                .and_then(|r| r.winner.as_team())
                .map(str::to_string);
        }
        None => {
            clear_reset(tournament);
            tournament.champion = None;
        }
    }
}

fn clear_reset(tournament: &mut Tournament) {
    let f2 = tournament.bracket.get_mut(MatchRef::F2);
    f2.team1 = Slot::Tbd;
    f2.team2 = Slot::Tbd;
    tournament.results.remove(F2_ID);
}
