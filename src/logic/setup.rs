//! Bracket generation: arrange participants, pad with byes, and lay out the
//! winners rounds, losers rounds and finals.

use crate::logic::byes::resolve_byes;
use crate::logic::rankings;
use crate::models::{
    Bracket, Match, Segment, Slot, TeamName, Tournament, TournamentError, F1_ID, F2_ID,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Rounds in the winners bracket for `participants` entrants: ceil(log2(n)).
pub fn winners_round_count(participants: usize) -> usize {
    participants.max(1).next_power_of_two().trailing_zeros() as usize
}

/// Rounds in the losers bracket: two per winners round after the first.
pub fn losers_round_count(winners_rounds: usize) -> usize {
    if winners_rounds > 1 {
        2 * (winners_rounds - 1)
    } else {
        0
    }
}

/// Matches in losers round `round` (0-based). Halves every two rounds, in step
/// with the winners bracket.
pub fn losers_round_size(winners_rounds: usize, round: usize) -> usize {
    let pair = round / 2;
    let exponent = winners_rounds.saturating_sub(pair + 2);
    1usize << exponent
}

/// Build a tournament with participants in random order.
///
/// `seed` makes the arrangement reproducible; `None` draws from OS entropy.
pub fn generate_bracket(
    participants: &[TeamName],
    seed: Option<u64>,
) -> Result<Tournament, TournamentError> {
    validate_participants(participants)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order = participants.to_vec();
    order.shuffle(&mut rng);
    create(participants, &order)
}

/// Build a tournament keeping participants in the given order: entries 1 and 2
/// meet in W1-1, 3 and 4 in W1-2, and so on.
pub fn generate_bracket_in_order(participants: &[TeamName]) -> Result<Tournament, TournamentError> {
    validate_participants(participants)?;
    create(participants, participants)
}

fn create(participants: &[TeamName], order: &[TeamName]) -> Result<Tournament, TournamentError> {
    let bracket = build_bracket(order);
    log::info!(
        "Generated bracket for {} teams: {} winners rounds, {} losers rounds",
        participants.len(),
        bracket.winners.len(),
        bracket.losers.len()
    );
    let mut tournament = Tournament::new(participants.to_vec(), bracket);
    resolve_byes(&mut tournament)?;
    rankings::refresh_positions(&mut tournament);
    Ok(tournament)
}

/// Need at least 2 teams; names must be non-empty, unique and not a placeholder.
fn validate_participants(participants: &[TeamName]) -> Result<(), TournamentError> {
    if participants.len() < 2 {
        return Err(TournamentError::InvalidInput(format!(
            "need at least 2 teams, got {}",
            participants.len()
        )));
    }
    let mut seen = HashSet::new();
    for name in participants {
        if name.trim().is_empty() {
            return Err(TournamentError::InvalidInput("empty team name".to_string()));
        }
        if Slot::is_reserved_name(name) {
            return Err(TournamentError::InvalidInput(format!("{} is a reserved name", name)));
        }
        if !seen.insert(name.as_str()) {
            return Err(TournamentError::InvalidInput(format!("duplicate team {}", name)));
        }
    }
    Ok(())
}

/// Lay out the full bracket for an already-arranged list of teams.
pub fn build_bracket(order: &[TeamName]) -> Bracket {
    let size = order.len().max(2).next_power_of_two();
    let mut entries: Vec<Slot> = order.iter().cloned().map(Slot::Team).collect();
    entries.resize(size, Slot::Bye);

    let winners = build_winners(entries);
    let losers = build_losers(winners.len());
    let finals = vec![
        Match::new(F1_ID, Slot::Tbd, Slot::Tbd, 1, Segment::Finals),
        Match::new(F2_ID, Slot::Tbd, Slot::Tbd, 2, Segment::Finals)
            .with_note("Only if losers bracket winner wins F1"),
    ];
    Bracket {
        winners,
        losers,
        finals,
    }
}

fn build_winners(entries: Vec<Slot>) -> Vec<Vec<Match>> {
    let mut rounds = Vec::new();
    let mut current = entries;
    while current.len() > 1 {
        let round = rounds.len() + 1;
        let matches: Vec<Match> = current
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| {
                Match::new(
                    format!("W{}-{}", round, i + 1),
                    pair[0].clone(),
                    pair[1].clone(),
                    round as u32,
                    Segment::Winners,
                )
            })
            .collect();
        current = vec![Slot::Tbd; matches.len()];
        rounds.push(matches);
    }
    rounds
}

fn build_losers(winners_rounds: usize) -> Vec<Vec<Match>> {
    (0..losers_round_count(winners_rounds))
        .map(|i| {
            (0..losers_round_size(winners_rounds, i))
                .map(|j| {
                    Match::new(
                        format!("L{}-{}", i + 1, j + 1),
                        Slot::Tbd,
                        Slot::Tbd,
                        (i + 1) as u32,
                        Segment::Losers,
                    )
                })
                .collect()
        })
        .collect()
}
