//! Walkover resolution: settle every match decided by byes alone.

use crate::logic::advance::{apply_result, place_team_in_match};
use crate::logic::routing::{dropdown_match, next_losers_match, next_winners_match};
use crate::models::{MatchRef, MatchResult, Segment, Slot, Tournament, TournamentError};

/// Pass ceiling for [`resolve_byes`]. A correctly shaped bracket settles in a
/// handful of passes.
pub const MAX_BYE_PASSES: usize = 50;

/// Run bye resolution to a fixed point. See [`resolve_byes_within`].
pub fn resolve_byes(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    resolve_byes_within(tournament, MAX_BYE_PASSES)
}

/// Repeat resolution passes until one changes nothing, returning the number of
/// passes run. Still changing after `max_passes` is reported as
/// [`TournamentError::ResolverDivergence`].
///
/// Each pass:
/// 1. Turns undecided `TBD` vs `TBD` matches in winners round 1 into `BYE` vs `BYE`.
/// 2. Marks `BYE` vs `BYE` matches decided and sends `BYE` on to their
///    destinations, so deeper rounds stay balanced.
/// 3. Advances a team sitting opposite a `BYE`.
///
/// A `BYE` facing `TBD` is left alone: that slot is waiting on a real result.
pub fn resolve_byes_within(
    tournament: &mut Tournament,
    max_passes: usize,
) -> Result<usize, TournamentError> {
    let mut passes = 0;
    loop {
        if passes >= max_passes {
            log::error!("Bye resolution still changing after {} passes", passes);
            return Err(TournamentError::ResolverDivergence { passes });
        }
        passes += 1;
        if !resolve_pass(tournament)? {
            log::debug!("Bye resolution settled after {} pass(es)", passes);
            return Ok(passes);
        }
    }
}

fn resolve_pass(tournament: &mut Tournament) -> Result<bool, TournamentError> {
    let mut changed = false;

    if let Some(first_round) = tournament.bracket.winners.first_mut() {
        for m in first_round.iter_mut() {
            if tournament.results.contains_key(&m.id) {
                continue;
            }
            if m.team1.is_tbd() && m.team2.is_tbd() {
                m.team1 = Slot::Bye;
                m.team2 = Slot::Bye;
                changed = true;
            }
        }
    }

    let mut refs = tournament.bracket.segment_refs(Segment::Winners);
    refs.extend(tournament.bracket.segment_refs(Segment::Losers));
    for at in refs {
        let m = tournament.bracket.get(at);
        if tournament.results.contains_key(&m.id) {
            continue;
        }
        let (id, team1, team2) = (m.id.clone(), m.team1.clone(), m.team2.clone());
        match (team1, team2) {
            (Slot::Bye, Slot::Bye) => {
                log::debug!("{}: empty match, passing BYE on", id);
                tournament.results.insert(
                    id,
                    MatchResult {
                        winner: Slot::Bye,
                        loser: Slot::Bye,
                    },
                );
                pass_bye_on(tournament, at)?;
                changed = true;
            }
            (Slot::Team(team), Slot::Bye) | (Slot::Bye, Slot::Team(team)) => {
                log::debug!("{}: {} advances on a bye", id, team);
                apply_result(tournament, at, Slot::Team(team), Slot::Bye)?;
                changed = true;
            }
            _ => {}
        }
    }
    Ok(changed)
}

/// Fill the destinations of an empty match with `BYE`.
fn pass_bye_on(tournament: &mut Tournament, at: MatchRef) -> Result<(), TournamentError> {
    let bracket = &mut tournament.bracket;
    match at.segment {
        Segment::Winners => {
            let next = next_winners_match(bracket, at);
            place_team_in_match(bracket, next, Slot::Bye)?;
            if let Some(drop) = dropdown_match(bracket, at) {
                place_team_in_match(bracket, drop, Slot::Bye)?;
            }
        }
        Segment::Losers => {
            let next = next_losers_match(bracket, at);
            place_team_in_match(bracket, next, Slot::Bye)?;
        }
        Segment::Finals => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::setup::build_bracket;

    fn unresolved(names: &[&str]) -> Tournament {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Tournament::new(names.clone(), build_bracket(&names))
    }

    #[test]
    fn three_teams_settle_in_two_passes() {
        let mut t = unresolved(&["a", "b", "c"]);
        assert_eq!(resolve_byes(&mut t), Ok(2));
        assert_eq!(t.bracket.winners[1][0].team1, Slot::team("c"));
    }

    #[test]
    fn pass_ceiling_reports_divergence() {
        let mut t = unresolved(&["a", "b", "c"]);
        assert_eq!(
            resolve_byes_within(&mut t, 1),
            Err(TournamentError::ResolverDivergence { passes: 1 })
        );
    }

    #[test]
    fn full_bracket_has_nothing_to_resolve() {
        let mut t = unresolved(&["a", "b", "c", "d"]);
        assert_eq!(resolve_byes(&mut t), Ok(1));
        assert!(t.results.is_empty());
    }
}
