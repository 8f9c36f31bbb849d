// Week state gate: draft -> finalized -> completed transition checks.

use crate::schedule::model::{Game, WeekStatus};

/// Answer to "may this finalized week return to draft?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfinalizeCheck {
    pub can_unfinalize: bool,
    pub error_message: Option<String>,
}

/// Answer to "may this week be marked complete?". Missing scores never
/// block completion of a finalized week; they surface as a soft warning
/// through `has_missing_scores`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteCheck {
    pub can_mark_complete: bool,
    pub error_message: Option<String>,
    pub has_missing_scores: bool,
    pub missing_scores_count: usize,
}

/// A finalized week may return to draft only while no game has a
/// recorded score.
pub fn can_unfinalize_week(games_with_scores: usize) -> UnfinalizeCheck {
    if games_with_scores == 0 {
        return UnfinalizeCheck {
            can_unfinalize: true,
            error_message: None,
        };
    }
    let message = if games_with_scores == 1 {
        "1 score has already been recorded".to_string()
    } else {
        format!("{games_with_scores} scores have already been recorded")
    };
    UnfinalizeCheck {
        can_unfinalize: false,
        error_message: Some(message),
    }
}

/// A week may be marked complete only from the finalized state. Draft
/// and completed weeks are blocked; a finalized week is always allowed,
/// with unscored games flagged as a warning.
pub fn can_mark_week_complete(
    status: WeekStatus,
    total_games: usize,
    games_with_scores: usize,
) -> CompleteCheck {
    match status {
        WeekStatus::Draft => CompleteCheck {
            can_mark_complete: false,
            error_message: Some("week must be finalized first".to_string()),
            has_missing_scores: false,
            missing_scores_count: 0,
        },
        WeekStatus::Completed => CompleteCheck {
            can_mark_complete: false,
            error_message: Some("week is already complete".to_string()),
            has_missing_scores: false,
            missing_scores_count: 0,
        },
        WeekStatus::Finalized => {
            let missing = total_games.saturating_sub(games_with_scores);
            CompleteCheck {
                can_mark_complete: true,
                error_message: None,
                has_missing_scores: missing > 0,
                missing_scores_count: missing,
            }
        }
    }
}

/// Games with both team scores recorded. A single-sided score is an
/// invalid partial state and never counts as scored.
pub fn count_games_with_scores(games: &[Game]) -> usize {
    games.iter().filter(|g| g.is_scored()).count()
}

/// Games still waiting on a score, including single-sided entries.
pub fn count_games_missing_scores(games: &[Game]) -> usize {
    games.iter().filter(|g| !g.is_scored()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: i64, team1_score: Option<i32>, team2_score: Option<i32>) -> Game {
        Game {
            id,
            week_id: 1,
            round_number: 1,
            court_number: 1,
            team1_player1: 1,
            team1_player2: 2,
            team2_player1: 3,
            team2_player2: 4,
            team1_score,
            team2_score,
        }
    }

    // -- unfinalize --

    #[test]
    fn unfinalize_allowed_with_no_scores() {
        let check = can_unfinalize_week(0);
        assert!(check.can_unfinalize);
        assert_eq!(check.error_message, None);
    }

    #[test]
    fn unfinalize_blocked_by_one_score_singular() {
        let check = can_unfinalize_week(1);
        assert!(!check.can_unfinalize);
        let message = check.error_message.unwrap();
        assert_eq!(message, "1 score has already been recorded");
        assert!(message.contains("score has"));
    }

    #[test]
    fn unfinalize_blocked_by_many_scores_plural() {
        let check = can_unfinalize_week(2);
        assert!(!check.can_unfinalize);
        let message = check.error_message.unwrap();
        assert_eq!(message, "2 scores have already been recorded");
        assert!(message.contains("scores have"));
    }

    // -- mark complete --

    #[test]
    fn complete_blocked_while_draft() {
        let check = can_mark_week_complete(WeekStatus::Draft, 12, 12);
        assert!(!check.can_mark_complete);
        assert_eq!(check.error_message.as_deref(), Some("week must be finalized first"));
        assert!(!check.has_missing_scores);
    }

    #[test]
    fn complete_blocked_when_already_complete() {
        let check = can_mark_week_complete(WeekStatus::Completed, 12, 12);
        assert!(!check.can_mark_complete);
        assert_eq!(check.error_message.as_deref(), Some("week is already complete"));
    }

    #[test]
    fn complete_allowed_when_fully_scored() {
        let check = can_mark_week_complete(WeekStatus::Finalized, 12, 12);
        assert!(check.can_mark_complete);
        assert_eq!(check.error_message, None);
        assert!(!check.has_missing_scores);
        assert_eq!(check.missing_scores_count, 0);
    }

    #[test]
    fn complete_allowed_with_missing_scores_warning() {
        let check = can_mark_week_complete(WeekStatus::Finalized, 12, 9);
        assert!(check.can_mark_complete);
        assert_eq!(check.error_message, None);
        assert!(check.has_missing_scores);
        assert_eq!(check.missing_scores_count, 3);
    }

    #[test]
    fn complete_allowed_for_empty_finalized_week() {
        let check = can_mark_week_complete(WeekStatus::Finalized, 0, 0);
        assert!(check.can_mark_complete);
        assert!(!check.has_missing_scores);
    }

    // -- score counting --

    #[test]
    fn counting_ignores_single_sided_scores() {
        let games = vec![
            game(1, Some(11), Some(7)),
            game(2, Some(11), None),
            game(3, None, Some(4)),
            game(4, None, None),
        ];
        assert_eq!(count_games_with_scores(&games), 1);
        assert_eq!(count_games_missing_scores(&games), 3);
    }

    #[test]
    fn counting_treats_zero_as_recorded() {
        let games = vec![game(1, Some(11), Some(0))];
        assert_eq!(count_games_with_scores(&games), 1);
        assert_eq!(count_games_missing_scores(&games), 0);
    }

    #[test]
    fn counting_empty_list() {
        assert_eq!(count_games_with_scores(&[]), 0);
        assert_eq!(count_games_missing_scores(&[]), 0);
    }
}
