//! Bracket shape: segments, matches, and the stored result of a decided match.

use crate::models::slot::Slot;
use serde::{Deserialize, Serialize};

/// Match identifier, e.g. `W1-1`, `L3-2`, `F1`.
pub type MatchId = String;

pub const F1_ID: &str = "F1";
pub const F2_ID: &str = "F2";

/// Which part of the double-elimination structure a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Winners,
    Losers,
    Finals,
}

/// A single match. `team1`/`team2` are written only by the engine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1: Slot,
    pub team2: Slot,
    /// 1-based round within the segment (F1 is round 1, F2 round 2).
    pub round: u32,
    pub segment: Segment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Match {
    pub fn new(id: impl Into<MatchId>, team1: Slot, team2: Slot, round: u32, segment: Segment) -> Self {
        Self {
            id: id.into(),
            team1,
            team2,
            round,
            segment,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Both slots hold something other than TBD.
    pub fn is_ready(&self) -> bool {
        !self.team1.is_tbd() && !self.team2.is_tbd()
    }

    /// Whether `slot` occupies either side of this match.
    pub fn contains(&self, slot: &Slot) -> bool {
        self.team1 == *slot || self.team2 == *slot
    }

    /// The slot opposite `slot`, if `slot` is in this match.
    pub fn opponent_of(&self, slot: &Slot) -> Option<&Slot> {
        if self.team1 == *slot {
            Some(&self.team2)
        } else if self.team2 == *slot {
            Some(&self.team1)
        } else {
            None
        }
    }
}

/// Recorded outcome of a decided match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Slot,
    pub loser: Slot,
}

impl MatchResult {
    /// A real game between two teams (not a walkover or an empty match).
    pub fn is_contested(&self) -> bool {
        self.winner.is_team() && self.loser.is_team()
    }
}

/// Position of a match inside the bracket. `round` and `index` are 0-based.
///
/// Finals are addressed as round 0 (F1) and round 1 (F2), index 0.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MatchRef {
    pub segment: Segment,
    pub round: usize,
    pub index: usize,
}

impl MatchRef {
    pub const F1: MatchRef = MatchRef {
        segment: Segment::Finals,
        round: 0,
        index: 0,
    };
    pub const F2: MatchRef = MatchRef {
        segment: Segment::Finals,
        round: 1,
        index: 0,
    };

    pub fn winners(round: usize, index: usize) -> Self {
        Self {
            segment: Segment::Winners,
            round,
            index,
        }
    }

    pub fn losers(round: usize, index: usize) -> Self {
        Self {
            segment: Segment::Losers,
            round,
            index,
        }
    }
}

/// Winners rounds, losers rounds, and the two finals matches.
///
/// Round order and match order within a round are the indexing scheme the
/// router relies on; they are fixed at generation and never re-sorted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub winners: Vec<Vec<Match>>,
    pub losers: Vec<Vec<Match>>,
    /// `[F1, F2]`.
    pub finals: Vec<Match>,
}

impl Bracket {
    pub fn rounds(&self, segment: Segment) -> &[Vec<Match>] {
        match segment {
            Segment::Winners => &self.winners,
            Segment::Losers => &self.losers,
            Segment::Finals => &[],
        }
    }

    /// Number of matches in a winners/losers round (0 if out of range).
    pub fn round_len(&self, segment: Segment, round: usize) -> usize {
        self.rounds(segment).get(round).map_or(0, Vec::len)
    }

    pub fn get(&self, at: MatchRef) -> &Match {
        match at.segment {
            Segment::Winners => &self.winners[at.round][at.index],
            Segment::Losers => &self.losers[at.round][at.index],
            Segment::Finals => &self.finals[at.round],
        }
    }

    pub fn get_mut(&mut self, at: MatchRef) -> &mut Match {
        match at.segment {
            Segment::Winners => &mut self.winners[at.round][at.index],
            Segment::Losers => &mut self.losers[at.round][at.index],
            Segment::Finals => &mut self.finals[at.round],
        }
    }

    /// Every match position in replay order: winners rounds ascending, then
    /// losers rounds ascending, then F1, F2.
    pub fn refs(&self) -> Vec<MatchRef> {
        let mut refs = self.segment_refs(Segment::Winners);
        refs.extend(self.segment_refs(Segment::Losers));
        refs.extend((0..self.finals.len()).map(|round| MatchRef {
            segment: Segment::Finals,
            round,
            index: 0,
        }));
        refs
    }

    /// Match positions of one winners/losers segment, round by round.
    pub fn segment_refs(&self, segment: Segment) -> Vec<MatchRef> {
        self.rounds(segment)
            .iter()
            .enumerate()
            .flat_map(|(round, matches)| {
                (0..matches.len()).map(move |index| MatchRef {
                    segment,
                    round,
                    index,
                })
            })
            .collect()
    }

    pub fn locate(&self, match_id: &str) -> Option<MatchRef> {
        self.refs()
            .into_iter()
            .find(|&at| self.get(at).id == match_id)
    }

    pub fn find(&self, match_id: &str) -> Option<&Match> {
        self.locate(match_id).map(|at| self.get(at))
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.winners
            .iter()
            .flatten()
            .chain(self.losers.iter().flatten())
            .chain(self.finals.iter())
    }
}
