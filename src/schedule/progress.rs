// Score-entry progress over a set of games.

use crate::schedule::gate::count_games_with_scores;
use crate::schedule::model::Game;

/// Completion summary for a game list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Fraction of games with recorded scores, as a whole percentage
/// rounded half away from zero. An empty list reports zero across the
/// board rather than dividing by zero.
pub fn calculate_progress(games: &[Game]) -> ScoreProgress {
    let total = games.len();
    let completed = count_games_with_scores(games);
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u32
    };
    ScoreProgress {
        completed,
        total,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: i64, scored: bool) -> Game {
        Game {
            id,
            week_id: 1,
            round_number: 1,
            court_number: 1,
            team1_player1: 1,
            team1_player2: 2,
            team2_player1: 3,
            team2_player2: 4,
            team1_score: scored.then_some(11),
            team2_score: scored.then_some(8),
        }
    }

    fn games(completed: usize, total: usize) -> Vec<Game> {
        (0..total)
            .map(|i| game(i as i64 + 1, i < completed))
            .collect()
    }

    #[test]
    fn empty_list_reports_zero() {
        assert_eq!(
            calculate_progress(&[]),
            ScoreProgress { completed: 0, total: 0, percentage: 0 }
        );
    }

    #[test]
    fn half_scored_is_fifty_percent() {
        assert_eq!(
            calculate_progress(&games(5, 10)),
            ScoreProgress { completed: 5, total: 10, percentage: 50 }
        );
    }

    #[test]
    fn thirds_round_to_nearest() {
        assert_eq!(calculate_progress(&games(1, 3)).percentage, 33);
        assert_eq!(calculate_progress(&games(2, 3)).percentage, 67);
    }

    #[test]
    fn fully_scored_is_one_hundred_percent() {
        assert_eq!(calculate_progress(&games(4, 4)).percentage, 100);
    }

    #[test]
    fn single_sided_score_does_not_complete_a_game() {
        let mut list = games(0, 2);
        list[0].team1_score = Some(11);
        let progress = calculate_progress(&list);
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.percentage, 0);
    }
}
