//! Per-team standing derived from recorded results.

use crate::models::bracket::Segment;
use crate::models::slot::TeamName;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub team: TeamName,
    /// Contested wins only; walkovers don't count.
    pub wins: u32,
    pub losses: u32,
    /// Final placing once known (1 = champion). Shared by teams knocked out
    /// in the same losers round.
    pub placement: Option<u32>,
    /// Round of the most recent loss.
    pub eliminated_round: Option<u32>,
    pub eliminated_segment: Option<Segment>,
    /// Gap-free 1..K position in the current standings order.
    pub display_position: usize,
}

impl RankingEntry {
    pub fn new(team: impl Into<TeamName>) -> Self {
        Self {
            team: team.into(),
            wins: 0,
            losses: 0,
            placement: None,
            eliminated_round: None,
            eliminated_segment: None,
            display_position: 0,
        }
    }

    /// True when the placing is only an estimate from the win/loss record.
    pub fn is_estimated(&self) -> bool {
        self.placement.is_none()
    }
}
