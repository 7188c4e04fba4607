//! Players and positions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity key of a player within one slate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Football roster position.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

impl Position {
    /// All positions in index order.
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DST,
    ];

    /// Number of distinct positions.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index used by per-position count arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Position::QB => 0,
            Position::RB => 1,
            Position::WR => 2,
            Position::TE => 3,
            Position::K => 4,
            Position::DST => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DST => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a position label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePositionError(String);

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown position: {}", self.0)
    }
}

impl std::error::Error for ParsePositionError {}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "K" | "PK" => Ok(Position::K),
            // Import feeds disagree on the defense label.
            "DST" | "D/ST" | "DEF" | "D" => Ok(Position::DST),
            _ => Err(ParsePositionError(s.to_string())),
        }
    }
}

/// A scored, priced player.
///
/// Players are immutable for the duration of one optimization run. The value
/// score is computed upstream and is opaque to the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub team: String,
    pub position: Position,
    pub salary: u32,
    pub score: f64,
    /// Projected ownership in `0.0..=1.0`, if known.
    #[serde(default)]
    pub ownership: Option<f64>,
}

impl Player {
    pub fn new(
        id: impl Into<PlayerId>,
        team: impl Into<String>,
        position: Position,
        salary: u32,
        score: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            team: team.into(),
            position,
            salary,
            score,
            ownership: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ownership(mut self, ownership: f64) -> Self {
        self.ownership = Some(ownership);
        self
    }

    /// Score per dollar, or `None` for players without a salary.
    pub fn captain_value(&self) -> Option<f64> {
        if self.salary == 0 {
            None
        } else {
            Some(self.score / self.salary as f64)
        }
    }

    /// Ownership with unknown projections counted as zero.
    #[inline]
    pub fn ownership_or_zero(&self) -> f64 {
        self.ownership.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_index_matches_all_order() {
        for (i, position) in Position::ALL.iter().enumerate() {
            assert_eq!(position.index(), i);
        }
    }

    #[test]
    fn test_position_parse_aliases() {
        assert_eq!("qb".parse::<Position>().unwrap(), Position::QB);
        assert_eq!("D/ST".parse::<Position>().unwrap(), Position::DST);
        assert_eq!("DEF".parse::<Position>().unwrap(), Position::DST);
        assert!("LB".parse::<Position>().is_err());
    }

    #[test]
    fn test_captain_value() {
        let player = Player::new("p1", "KC", Position::QB, 10_000, 25.0);
        assert_eq!(player.captain_value(), Some(0.0025));

        let free = Player::new("p2", "KC", Position::K, 0, 5.0);
        assert_eq!(free.captain_value(), None);
    }

    #[test]
    fn test_player_deserialize_defaults() {
        let json = r#"{"id":"p1","team":"BUF","position":"WR","salary":6400,"score":14.2}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id, PlayerId::new("p1"));
        assert_eq!(player.position, Position::WR);
        assert!(player.ownership.is_none());
        assert_eq!(player.ownership_or_zero(), 0.0);
    }
}
