// Per-player season totals accumulated from scored games.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schedule::model::{Game, PlayerId, TeamSide, TeamSlot};

/// Season totals for one player. Recomputed on demand from scored
/// games, never persisted as a running tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub total_points: i32,
    pub games_played: u32,
    pub wins: u32,
}

impl PlayerStats {
    /// Zeroed totals for a player.
    pub fn new(player_id: PlayerId) -> Self {
        PlayerStats {
            player_id,
            total_points: 0,
            games_played: 0,
            wins: 0,
        }
    }
}

/// Fold scored games into per-player totals, sorted by player id.
///
/// Unscored games are skipped entirely. Each scored game credits all
/// four players one game played and their own team's points; the
/// higher-scoring team's players gain a win. An equal-score entry
/// credits no win to either side.
pub fn aggregate_player_stats(games: &[Game]) -> Vec<PlayerStats> {
    let mut totals: BTreeMap<PlayerId, PlayerStats> = BTreeMap::new();
    for game in games {
        if !game.is_scored() {
            continue;
        }
        let winner = game.winning_side();
        for team in [TeamSide::Team1, TeamSide::Team2] {
            let points = game.score_for(team).unwrap_or(0);
            for slot in [TeamSlot::First, TeamSlot::Second] {
                let player = game.player_at(team, slot);
                let entry = totals
                    .entry(player)
                    .or_insert_with(|| PlayerStats::new(player));
                entry.games_played += 1;
                entry.total_points += points;
                if winner == Some(team) {
                    entry.wins += 1;
                }
            }
        }
    }
    totals.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_game(id: i64, players: [PlayerId; 4], team1: i32, team2: i32) -> Game {
        Game {
            id,
            week_id: 1,
            round_number: 1,
            court_number: 1,
            team1_player1: players[0],
            team1_player2: players[1],
            team2_player1: players[2],
            team2_player2: players[3],
            team1_score: Some(team1),
            team2_score: Some(team2),
        }
    }

    fn stats_for(stats: &[PlayerStats], player_id: PlayerId) -> PlayerStats {
        *stats.iter().find(|s| s.player_id == player_id).unwrap()
    }

    #[test]
    fn empty_input_yields_no_totals() {
        assert!(aggregate_player_stats(&[]).is_empty());
    }

    #[test]
    fn unscored_games_are_skipped() {
        let mut game = scored_game(1, [1, 2, 3, 4], 11, 7);
        game.team2_score = None;
        assert!(aggregate_player_stats(&[game]).is_empty());
    }

    #[test]
    fn one_game_credits_all_four_players() {
        let stats = aggregate_player_stats(&[scored_game(1, [1, 2, 3, 4], 11, 7)]);
        assert_eq!(stats.len(), 4);
        for winner in [1, 2] {
            let s = stats_for(&stats, winner);
            assert_eq!((s.total_points, s.games_played, s.wins), (11, 1, 1));
        }
        for loser in [3, 4] {
            let s = stats_for(&stats, loser);
            assert_eq!((s.total_points, s.games_played, s.wins), (7, 1, 0));
        }
    }

    #[test]
    fn totals_accumulate_across_games() {
        let games = vec![
            scored_game(1, [1, 2, 3, 4], 11, 7),
            scored_game(2, [1, 3, 2, 4], 5, 11),
        ];
        let stats = aggregate_player_stats(&games);
        let p1 = stats_for(&stats, 1);
        assert_eq!((p1.total_points, p1.games_played, p1.wins), (16, 2, 1));
        let p4 = stats_for(&stats, 4);
        assert_eq!((p4.total_points, p4.games_played, p4.wins), (18, 2, 1));
    }

    #[test]
    fn equal_scores_credit_no_win() {
        let stats = aggregate_player_stats(&[scored_game(1, [1, 2, 3, 4], 9, 9)]);
        for s in &stats {
            assert_eq!(s.wins, 0);
            assert_eq!(s.games_played, 1);
            assert_eq!(s.total_points, 9);
        }
    }

    #[test]
    fn output_is_sorted_by_player_id() {
        let stats = aggregate_player_stats(&[scored_game(1, [9, 2, 7, 4], 11, 3)]);
        let ids: Vec<PlayerId> = stats.iter().map(|s| s.player_id).collect();
        assert_eq!(ids, vec![2, 4, 7, 9]);
    }
}
