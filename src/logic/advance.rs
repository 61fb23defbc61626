//! Recording results and moving teams through the bracket.

use crate::logic::byes::resolve_byes;
use crate::logic::rankings;
use crate::logic::routing::{dropdown_match, next_losers_match, next_winners_match};
use crate::models::{Bracket, MatchRef, MatchResult, Segment, Slot, Tournament, TournamentError};

/// Record that `winner` won `match_id`. The loser is whoever holds the other slot.
///
/// Advances the winner, drops a winners-bracket loser into the losers bracket,
/// applies the finals rules, then lets the bye resolver settle any walkovers
/// the new placements created. On error the tournament is left unchanged.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: &str,
    winner: &str,
) -> Result<(), TournamentError> {
    let at = tournament
        .bracket
        .locate(match_id)
        .ok_or_else(|| TournamentError::UnknownMatch(match_id.to_string()))?;
    if tournament.is_decided(match_id) {
        return Err(TournamentError::AlreadyDecided(match_id.to_string()));
    }
    let winner = Slot::team(winner);
    let loser = tournament
        .bracket
        .get(at)
        .opponent_of(&winner)
        .cloned()
        .ok_or_else(|| TournamentError::InvalidWinner {
            match_id: match_id.to_string(),
            team: winner.to_string(),
        })?;
    if loser.is_tbd() {
        return Err(TournamentError::MatchNotReady(match_id.to_string()));
    }

    // Work on a copy so a routing failure leaves the tournament as it was.
    let mut next = tournament.clone();
    apply_result(&mut next, at, winner, loser)?;
    resolve_byes(&mut next)?;
    rankings::refresh_positions(&mut next);
    *tournament = next;
    Ok(())
}

/// Store a result and propagate it. Shared with the bye resolver, which calls
/// it for team-vs-BYE walkovers.
pub(crate) fn apply_result(
    tournament: &mut Tournament,
    at: MatchRef,
    winner: Slot,
    loser: Slot,
) -> Result<(), TournamentError> {
    let current = tournament.bracket.get(at).clone();
    log::debug!("{}: {} beats {}", current.id, winner, loser);

    tournament.results.insert(
        current.id.clone(),
        MatchResult {
            winner: winner.clone(),
            loser: loser.clone(),
        },
    );
    if let Some(team) = loser.as_team() {
        let count = tournament.add_loss(team);
        if count >= 2 {
            log::info!("{} is eliminated with {} losses", team, count);
        }
    }
    rankings::apply_match(tournament, at);

    match at.segment {
        Segment::Winners => {
            let next = next_winners_match(&tournament.bracket, at);
            place_team_in_match(&mut tournament.bracket, next, winner)?;
            if !loser.is_tbd() {
                match dropdown_match(&tournament.bracket, at) {
                    Some(drop) => place_team_in_match(&mut tournament.bracket, drop, loser)?,
                    // No losers bracket: the loser is F1's losers-side entrant.
                    None if at.round + 1 == tournament.bracket.winners.len() => {
                        place_team_in_match(&mut tournament.bracket, MatchRef::F1, loser)?
                    }
                    None => {
                        return Err(TournamentError::RoutingDefect {
                            match_id: current.id,
                            team: loser.to_string(),
                        })
                    }
                }
            }
        }
        Segment::Losers => {
            let next = next_losers_match(&tournament.bracket, at);
            place_team_in_match(&mut tournament.bracket, next, winner)?;
        }
        Segment::Finals => {
            if at == MatchRef::F1 && winner != current.team1 {
                let reset = tournament.bracket.get_mut(MatchRef::F2);
                reset.team1 = current.team1;
                reset.team2 = current.team2;
                log::info!("{} wins F1 from the losers bracket; grand finals reset", winner);
            } else if let Some(team) = winner.as_team() {
                crown(tournament, team);
            }
        }
    }
    Ok(())
}

pub(crate) fn crown(tournament: &mut Tournament, team: &str) {
    log::info!("{} wins the tournament", team);
    tournament.champion = Some(team.to_string());
    rankings::set_placement(tournament, team, 1);
}

/// Put `team` into the first TBD slot of `dest`; failing that, over the first
/// BYE slot. Both slots held by real teams is a routing defect.
pub(crate) fn place_team_in_match(
    bracket: &mut Bracket,
    dest: MatchRef,
    team: Slot,
) -> Result<(), TournamentError> {
    let m = bracket.get_mut(dest);
    let slot = if m.team1.is_tbd() {
        &mut m.team1
    } else if m.team2.is_tbd() {
        &mut m.team2
    } else if m.team1.is_bye() {
        &mut m.team1
    } else if m.team2.is_bye() {
        &mut m.team2
    } else {
        log::warn!(
            "No free slot for {} in {} ({} vs {})",
            team,
            m.id,
            m.team1,
            m.team2
        );
        return Err(TournamentError::RoutingDefect {
            match_id: m.id.clone(),
            team: team.to_string(),
        });
    };
    if slot.is_bye() && team.is_team() {
        log::warn!("{} takes over a BYE slot in {}", team, m.id);
    }
    *slot = team;
    log::debug!("  -> {} now {} vs {}", m.id, m.team1, m.team2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::setup::generate_bracket_in_order;

    fn four_teams() -> Tournament {
        let names: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        generate_bracket_in_order(&names).unwrap()
    }

    #[test]
    fn incoming_team_takes_tbd_before_bye() {
        let mut t = four_teams();
        let at = MatchRef::winners(1, 0);
        {
            let m = t.bracket.get_mut(at);
            m.team1 = Slot::Bye;
            m.team2 = Slot::Tbd;
        }
        place_team_in_match(&mut t.bracket, at, Slot::team("A")).unwrap();
        let m = t.bracket.get(at);
        assert_eq!((&m.team1, &m.team2), (&Slot::Bye, &Slot::team("A")));
    }

    #[test]
    fn incoming_team_replaces_bye_when_no_tbd_left() {
        let mut t = four_teams();
        let at = MatchRef::winners(1, 0);
        {
            let m = t.bracket.get_mut(at);
            m.team1 = Slot::team("A");
            m.team2 = Slot::Bye;
        }
        place_team_in_match(&mut t.bracket, at, Slot::team("C")).unwrap();
        let m = t.bracket.get(at);
        assert_eq!((&m.team1, &m.team2), (&Slot::team("A"), &Slot::team("C")));
    }

    #[test]
    fn full_destination_is_a_routing_defect() {
        let mut t = four_teams();
        let at = MatchRef::winners(1, 0);
        {
            let m = t.bracket.get_mut(at);
            m.team1 = Slot::team("A");
            m.team2 = Slot::team("C");
        }
        assert_eq!(
            place_team_in_match(&mut t.bracket, at, Slot::team("D")),
            Err(TournamentError::RoutingDefect {
                match_id: "W2-1".to_string(),
                team: "D".to_string(),
            })
        );
    }

    #[test]
    fn routing_defect_leaves_tournament_unchanged() {
        let mut t = four_teams();
        {
            let m = t.bracket.get_mut(MatchRef::winners(1, 0));
            m.team1 = Slot::team("X");
            m.team2 = Slot::team("Y");
        }
        let before = t.clone();

        let err = record_result(&mut t, "W1-1", "A").unwrap_err();
        assert!(err.is_structural());
        assert!(matches!(err, TournamentError::RoutingDefect { .. }));
        assert_eq!(t, before);
        assert!(!t.is_decided("W1-1"));
        assert_eq!(t.loss_count("B"), 0);

        // still recordable once the slot is repaired
        {
            let m = t.bracket.get_mut(MatchRef::winners(1, 0));
            m.team1 = Slot::Tbd;
            m.team2 = Slot::Tbd;
        }
        record_result(&mut t, "W1-1", "A").unwrap();
        assert_eq!(t.bracket.get(MatchRef::winners(1, 0)).team1, Slot::team("A"));
        assert_eq!(t.bracket.get(MatchRef::losers(0, 0)).team1, Slot::team("B"));
    }
}
