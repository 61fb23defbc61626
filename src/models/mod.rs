//! Data structures for the bracket: slots, matches, results, standings, tournament state.

mod bracket;
mod ranking;
mod slot;
mod tournament;

pub use bracket::{Bracket, Match, MatchId, MatchRef, MatchResult, Segment, F1_ID, F2_ID};
pub use ranking::RankingEntry;
pub use slot::{Slot, TeamName, BYE, TBD};
pub use tournament::{Tournament, TournamentError, TournamentId, ELIMINATION_LOSSES};
