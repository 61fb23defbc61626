//! Parallel schedule: which matches can be played at the same time.

use crate::models::{Match, MatchId, Segment, Slot, Tournament};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub id: MatchId,
    pub segment: Segment,
    pub team1: Slot,
    pub team2: Slot,
    /// Set once the match is decided.
    pub winner: Option<Slot>,
}

/// A group of matches with no dependency on one another.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 1-based.
    pub number: usize,
    pub matches: Vec<ScheduledMatch>,
    pub completed: usize,
    pub total: usize,
}

impl TimeSlot {
    pub fn is_completed(&self) -> bool {
        self.completed == self.total
    }
}

fn is_empty_match(m: &Match) -> bool {
    m.team1.is_bye() && m.team2.is_bye()
}

/// Group matches into time slots: the playable part of winners round 1, then
/// one slot per remaining winners round, per losers round, and per finals match.
pub fn schedule(tournament: &Tournament) -> Vec<TimeSlot> {
    let bracket = tournament.bracket();
    let mut groups: Vec<Vec<&Match>> = Vec::new();

    if let Some(first) = bracket.winners.first() {
        let playable: Vec<&Match> = first.iter().filter(|m| m.is_ready() && !is_empty_match(m)).collect();
        if !playable.is_empty() {
            groups.push(playable);
        }
    }
    groups.extend(bracket.winners.iter().skip(1).map(|r| r.iter().collect()));
    groups.extend(bracket.losers.iter().map(|r| r.iter().collect()));
    groups.extend(bracket.finals.iter().map(|m| vec![m]));

    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let matches: Vec<ScheduledMatch> = group
                .into_iter()
                .map(|m| ScheduledMatch {
                    id: m.id.clone(),
                    segment: m.segment,
                    team1: m.team1.clone(),
                    team2: m.team2.clone(),
                    winner: tournament.result(&m.id).map(|r| r.winner.clone()),
                })
                .collect();
            let completed = matches.iter().filter(|m| m.winner.is_some()).count();
            TimeSlot {
                number: i + 1,
                total: matches.len(),
                completed,
                matches,
            }
        })
        .collect()
}
