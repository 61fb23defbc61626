//! Slot contents: a team name, or one of the two placeholders BYE / TBD.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A participant's name. Compared case-sensitively.
pub type TeamName = String;

/// Reserved text for [`Slot::Bye`]; never a valid team name.
pub const BYE: &str = "BYE";
/// Reserved text for [`Slot::Tbd`]; never a valid team name.
pub const TBD: &str = "TBD";

/// What occupies one side of a match.
///
/// Serialized as a plain string (`"BYE"`, `"TBD"` or the team name) so the
/// presentation layer can render it directly.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Slot {
    Team(TeamName),
    /// No opponent; permanently resolved as empty.
    Bye,
    /// Awaiting the result of an earlier match.
    Tbd,
}

impl Slot {
    pub fn team(name: impl Into<TeamName>) -> Self {
        Slot::Team(name.into())
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Slot::Team(_))
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }

    pub fn is_tbd(&self) -> bool {
        matches!(self, Slot::Tbd)
    }

    /// Team name if this slot holds a real team.
    pub fn as_team(&self) -> Option<&str> {
        match self {
            Slot::Team(name) => Some(name),
            _ => None,
        }
    }

    /// True if `name` collides with a placeholder and so can't be a team.
    pub fn is_reserved_name(name: &str) -> bool {
        name == BYE || name == TBD
    }
}

impl From<String> for Slot {
    fn from(s: String) -> Self {
        match s.as_str() {
            BYE => Slot::Bye,
            TBD => Slot::Tbd,
            _ => Slot::Team(s),
        }
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Team(name) => name,
            Slot::Bye => BYE.to_string(),
            Slot::Tbd => TBD.to_string(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Team(name) => f.write_str(name),
            Slot::Bye => f.write_str(BYE),
            Slot::Tbd => f.write_str(TBD),
        }
    }
}
