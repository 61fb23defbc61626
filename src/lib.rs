//! Double-elimination bracket engine: library with models and business logic.

pub mod export;
pub mod logic;
pub mod models;

pub use export::write_rankings_csv;
pub use logic::{
    correct_result, generate_bracket, generate_bracket_in_order, get_rankings, record_result,
    resolve_byes, schedule, top_rankings, TimeSlot,
};
pub use models::{
    Bracket, Match, MatchId, MatchRef, MatchResult, RankingEntry, Segment, Slot, TeamName,
    Tournament, TournamentError, TournamentId, BYE, TBD,
};
