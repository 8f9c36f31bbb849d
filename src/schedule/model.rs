// Round-set records: games, byes, weeks, and the position locator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player row id in the store.
pub type PlayerId = i64;
/// Game row id in the store.
pub type GameId = i64;

// ---------------------------------------------------------------------------
// Slot addressing
// ---------------------------------------------------------------------------

/// Which team within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    /// Return the display string for this side.
    pub fn display_str(&self) -> &'static str {
        match self {
            TeamSide::Team1 => "team 1",
            TeamSide::Team2 => "team 2",
        }
    }

    /// The opposing side.
    pub fn other(&self) -> TeamSide {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Which of the two slots on a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSlot {
    First,
    Second,
}

// ---------------------------------------------------------------------------
// Week lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a week's schedule.
///
/// Weeks progress draft -> finalized -> completed. The only reverse
/// transition is finalized -> draft, and only while no scores exist
/// (see `gate::can_unfinalize_week`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Draft,
    Finalized,
    Completed,
}

impl WeekStatus {
    /// Parse the lowercase form stored in the database.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(WeekStatus::Draft),
            "finalized" => Some(WeekStatus::Finalized),
            "completed" => Some(WeekStatus::Completed),
            _ => None,
        }
    }

    /// The lowercase form stored in the database.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            WeekStatus::Draft => "draft",
            WeekStatus::Finalized => "finalized",
            WeekStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

/// One week of a season's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub id: i64,
    pub season_id: i64,
    /// Sequential week number within the season (1-indexed).
    pub week_number: u32,
    /// Calendar date the week's games are played.
    pub scheduled_for: NaiveDate,
    pub status: WeekStatus,
}

// ---------------------------------------------------------------------------
// Games and byes
// ---------------------------------------------------------------------------

/// A single doubles game within a week's round set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub week_id: i64,
    /// Scheduling round within the week (1-indexed).
    pub round_number: u32,
    /// Court the game is played on (1-indexed).
    pub court_number: u32,
    pub team1_player1: PlayerId,
    pub team1_player2: PlayerId,
    pub team2_player1: PlayerId,
    pub team2_player2: PlayerId,
    /// Final score for team 1. Both scores are set together during score
    /// entry; a game with only one side recorded is an invalid partial state.
    #[serde(default)]
    pub team1_score: Option<i32>,
    #[serde(default)]
    pub team2_score: Option<i32>,
}

impl Game {
    /// Whether both team scores have been recorded. A score of 0 counts
    /// as recorded.
    pub fn is_scored(&self) -> bool {
        self.team1_score.is_some() && self.team2_score.is_some()
    }

    /// All four slot occupants, team 1 first.
    pub fn players(&self) -> [PlayerId; 4] {
        [
            self.team1_player1,
            self.team1_player2,
            self.team2_player1,
            self.team2_player2,
        ]
    }

    /// The two teammate pairs, each normalized low-id-first so unordered
    /// pairs compare equal across games.
    pub fn partnerships(&self) -> [(PlayerId, PlayerId); 2] {
        [
            normalize_pair(self.team1_player1, self.team1_player2),
            normalize_pair(self.team2_player1, self.team2_player2),
        ]
    }

    /// The occupant of a specific slot.
    pub fn player_at(&self, team: TeamSide, slot: TeamSlot) -> PlayerId {
        match (team, slot) {
            (TeamSide::Team1, TeamSlot::First) => self.team1_player1,
            (TeamSide::Team1, TeamSlot::Second) => self.team1_player2,
            (TeamSide::Team2, TeamSlot::First) => self.team2_player1,
            (TeamSide::Team2, TeamSlot::Second) => self.team2_player2,
        }
    }

    /// Replace the occupant of a specific slot.
    pub fn set_player_at(&mut self, team: TeamSide, slot: TeamSlot, player: PlayerId) {
        match (team, slot) {
            (TeamSide::Team1, TeamSlot::First) => self.team1_player1 = player,
            (TeamSide::Team1, TeamSlot::Second) => self.team1_player2 = player,
            (TeamSide::Team2, TeamSlot::First) => self.team2_player1 = player,
            (TeamSide::Team2, TeamSlot::Second) => self.team2_player2 = player,
        }
    }

    /// The recorded score for one side.
    pub fn score_for(&self, team: TeamSide) -> Option<i32> {
        match team {
            TeamSide::Team1 => self.team1_score,
            TeamSide::Team2 => self.team2_score,
        }
    }

    /// The side that won a scored game, or None for an unscored game or
    /// an equal-score entry.
    pub fn winning_side(&self) -> Option<TeamSide> {
        match (self.team1_score, self.team2_score) {
            (Some(a), Some(b)) if a > b => Some(TeamSide::Team1),
            (Some(a), Some(b)) if b > a => Some(TeamSide::Team2),
            _ => None,
        }
    }
}

/// Normalize an unordered player pair to (low, high).
fn normalize_pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A player excused from one round of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bye {
    pub player_id: PlayerId,
    pub round_number: u32,
}

// ---------------------------------------------------------------------------
// Position locator
// ---------------------------------------------------------------------------

/// Where a player sits within one round of a round set. Derived by
/// `swap::find_player_position`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPosition {
    /// Occupying a game slot.
    Slot {
        player_id: PlayerId,
        game_id: GameId,
        team: TeamSide,
        slot: TeamSlot,
    },
    /// On the bye list for the round.
    Bye { player_id: PlayerId, round_number: u32 },
}

impl PlayerPosition {
    /// The player this locator points at.
    pub fn player_id(&self) -> PlayerId {
        match self {
            PlayerPosition::Slot { player_id, .. } => *player_id,
            PlayerPosition::Bye { player_id, .. } => *player_id,
        }
    }

    /// Whether this locator is a bye entry.
    pub fn is_bye(&self) -> bool {
        matches!(self, PlayerPosition::Bye { .. })
    }
}
