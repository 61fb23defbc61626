//! Tournament aggregate and TournamentError.

use crate::models::bracket::{Bracket, Match, MatchId, MatchResult};
use crate::models::ranking::RankingEntry;
use crate::models::slot::{Slot, TeamName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Losses at which a team is out of the tournament.
pub const ELIMINATION_LOSSES: u32 = 2;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Participant list rejected by the generator (too few, duplicate, empty or reserved names).
    InvalidInput(String),
    /// No match with this id exists in the bracket.
    UnknownMatch(MatchId),
    /// Declared winner is not a team occupying one of the match's slots.
    InvalidWinner { match_id: MatchId, team: String },
    /// The opponent slot is still waiting on an earlier result.
    MatchNotReady(MatchId),
    /// Result already recorded; use a correction instead.
    AlreadyDecided(MatchId),
    /// Correction requested for a match that has no result yet.
    NotDecided(MatchId),
    /// A team could not be placed because both destination slots are occupied.
    RoutingDefect { match_id: MatchId, team: String },
    /// The bye resolver was still making changes when it hit its pass ceiling.
    ResolverDivergence { passes: usize },
}

impl TournamentError {
    /// Errors that mean the bracket structure itself is inconsistent.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TournamentError::RoutingDefect { .. } | TournamentError::ResolverDivergence { .. }
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidInput(reason) => write!(f, "Invalid participants: {}", reason),
            TournamentError::UnknownMatch(id) => write!(f, "Match {} not found", id),
            TournamentError::InvalidWinner { match_id, team } => {
                write!(f, "{} is not a team playing in match {}", team, match_id)
            }
            TournamentError::MatchNotReady(id) => {
                write!(f, "Match {} is still waiting for an opponent", id)
            }
            TournamentError::AlreadyDecided(id) => {
                write!(f, "Match {} already has a result; correct it instead", id)
            }
            TournamentError::NotDecided(id) => write!(f, "Match {} has no result to correct", id),
            TournamentError::RoutingDefect { match_id, team } => {
                write!(f, "Bracket routing defect: no free slot for {} in match {}", team, match_id)
            }
            TournamentError::ResolverDivergence { passes } => {
                write!(f, "Bye resolution did not settle after {} passes", passes)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// One double-elimination tournament: bracket, results, loss counters and standings.
///
/// Fields are read through accessors; all mutation goes through the functions in
/// [`crate::logic`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub(crate) id: TournamentId,
    pub(crate) created_at: DateTime<Utc>,
    /// Participants in the order they were submitted.
    pub(crate) participants: Vec<TeamName>,
    pub(crate) bracket: Bracket,
    pub(crate) results: BTreeMap<MatchId, MatchResult>,
    /// Contested losses per team (walkovers excluded).
    pub(crate) losses: BTreeMap<TeamName, u32>,
    pub(crate) champion: Option<TeamName>,
    /// One entry per participant, kept in participant order.
    pub(crate) rankings: Vec<RankingEntry>,
}

impl Tournament {
    pub(crate) fn new(participants: Vec<TeamName>, bracket: Bracket) -> Self {
        let losses = participants.iter().map(|t| (t.clone(), 0)).collect();
        let rankings = participants.iter().map(RankingEntry::new).collect();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            participants,
            bracket,
            results: BTreeMap::new(),
            losses,
            champion: None,
            rankings,
        }
    }

    pub fn id(&self) -> TournamentId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn participants(&self) -> &[TeamName] {
        &self.participants
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn results(&self) -> &BTreeMap<MatchId, MatchResult> {
        &self.results
    }

    pub fn result(&self, match_id: &str) -> Option<&MatchResult> {
        self.results.get(match_id)
    }

    pub fn is_decided(&self, match_id: &str) -> bool {
        self.results.contains_key(match_id)
    }

    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.bracket.find(match_id)
    }

    pub fn champion(&self) -> Option<&str> {
        self.champion.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    pub fn loss_counts(&self) -> &BTreeMap<TeamName, u32> {
        &self.losses
    }

    pub fn loss_count(&self, team: &str) -> u32 {
        self.losses.get(team).copied().unwrap_or(0)
    }

    pub fn is_eliminated(&self, team: &str) -> bool {
        self.loss_count(team) >= ELIMINATION_LOSSES
    }

    /// Teams that are still alive on paper but sit in no undecided match.
    ///
    /// Anything returned here was dropped by the routing; in a healthy bracket
    /// the list is always empty.
    pub fn stranded_teams(&self) -> Vec<TeamName> {
        let live: Vec<&Match> = self
            .bracket
            .matches()
            .filter(|m| !self.results.contains_key(&m.id))
            .collect();
        self.participants
            .iter()
            .filter(|team| self.champion.as_deref() != Some(team.as_str()))
            .filter(|team| !self.is_eliminated(team))
            .filter(|team| {
                let slot = Slot::team(team.as_str());
                !live.iter().any(|m| m.contains(&slot))
            })
            .cloned()
            .collect()
    }

    /// Count one loss against `team`, returning the new total.
    pub(crate) fn add_loss(&mut self, team: &str) -> u32 {
        let count = self.losses.entry(team.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Rebuild the loss counters by folding over every stored result.
    pub(crate) fn recount_losses(&mut self) {
        for count in self.losses.values_mut() {
            *count = 0;
        }
        let losers: Vec<String> = self
            .results
            .values()
            .filter_map(|r| r.loser.as_team().map(str::to_string))
            .collect();
        for team in losers {
            self.add_loss(&team);
        }
    }
}
