//! Bracket business logic: generation, routing, results, byes, corrections, standings.

mod advance;
mod byes;
mod correction;
mod rankings;
mod routing;
mod schedule;
mod setup;

pub use advance::record_result;
pub use byes::{resolve_byes, resolve_byes_within, MAX_BYE_PASSES};
pub use correction::correct_result;
pub use rankings::{get_rankings, top_rankings};
pub use routing::{dropdown_match, dropdown_round, downstream, feeds, next_losers_match, next_winners_match};
pub use schedule::{schedule, ScheduledMatch, TimeSlot};
pub use setup::{
    build_bracket, generate_bracket, generate_bracket_in_order, losers_round_count,
    losers_round_size, winners_round_count,
};
