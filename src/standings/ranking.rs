// Ranking engine: points-then-win-percentage standings with shared ranks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::standings::stats::PlayerStats;

/// Win percentages closer than this count as equal when deciding ties.
pub const WIN_PCT_TOLERANCE: f64 = 1e-4;

/// A standings row: season totals plus the derived rank data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub stats: PlayerStats,
    pub win_percentage: f64,
    /// 1-based competition rank. A block of tied players shares the
    /// block's starting rank; the next player after a block of k jumps
    /// to starting rank + k.
    pub rank: u32,
    /// Set for every member of a tied block, first entry included.
    pub is_tied: bool,
}

/// Percentage of games won; 0 for a player yet to play a game.
pub fn win_percentage(wins: u32, games_played: u32) -> f64 {
    if games_played == 0 {
        0.0
    } else {
        100.0 * wins as f64 / games_played as f64
    }
}

/// Standings order: total points descending, then win percentage
/// descending.
pub fn compare_for_ranking(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    b.total_points.cmp(&a.total_points).then_with(|| {
        let pct_a = win_percentage(a.wins, a.games_played);
        let pct_b = win_percentage(b.wins, b.games_played);
        pct_b.partial_cmp(&pct_a).unwrap_or(Ordering::Equal)
    })
}

/// Whether two players occupy the same standing: equal points and win
/// percentages within `WIN_PCT_TOLERANCE`.
pub fn are_tied(a: &PlayerStats, b: &PlayerStats) -> bool {
    let pct_a = win_percentage(a.wins, a.games_played);
    let pct_b = win_percentage(b.wins, b.games_played);
    a.total_points == b.total_points && (pct_a - pct_b).abs() < WIN_PCT_TOLERANCE
}

/// Sort players into standings and assign competition ranks.
///
/// A player tied with the previous entry inherits its rank; otherwise
/// the rank is the entry's 1-based position, which makes the rank after
/// a tied block of k jump by k (1-2-2-4). Empty input yields an empty
/// table.
pub fn calculate_rankings(players: &[PlayerStats]) -> Vec<RankedPlayer> {
    let mut sorted = players.to_vec();
    sorted.sort_by(compare_for_ranking);

    let mut rankings: Vec<RankedPlayer> = Vec::with_capacity(sorted.len());
    for (i, stats) in sorted.iter().enumerate() {
        let tied_with_prev = i > 0 && are_tied(stats, &sorted[i - 1]);
        let tied_with_next = i + 1 < sorted.len() && are_tied(stats, &sorted[i + 1]);
        let rank = if i == 0 {
            1
        } else if tied_with_prev {
            rankings[i - 1].rank
        } else {
            (i + 1) as u32
        };
        rankings.push(RankedPlayer {
            stats: *stats,
            win_percentage: win_percentage(stats.wins, stats.games_played),
            rank,
            is_tied: tied_with_prev || tied_with_next,
        });
    }
    rankings
}

/// "T3" for a shared rank, "3" otherwise.
pub fn format_rank(rank: u32, is_tied: bool) -> String {
    if is_tied {
        format!("T{rank}")
    } else {
        rank.to_string()
    }
}

/// One decimal place with a trailing ".0" elided: 100 -> "100%",
/// 75.5 -> "75.5%".
pub fn format_win_percentage(pct: f64) -> String {
    let fixed = format!("{pct:.1}");
    let trimmed = fixed.strip_suffix(".0").unwrap_or(&fixed);
    format!("{trimmed}%")
}
