// Constraint checker: partnership repeats and game-count imbalance.

use std::collections::HashMap;
use std::fmt;

use crate::schedule::model::{Game, PlayerId};

/// A diagnostic produced by scanning a round set after an edit.
/// Violations never block a swap; they are rendered to the operator
/// as warning text via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An unordered pair partnered in more than one game.
    PartnershipRepeat {
        player_a: String,
        player_b: String,
        count: usize,
    },
    /// A player with fewer games than the round set's target count.
    GameCountLow { player: String, count: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PartnershipRepeat {
                player_a,
                player_b,
                count,
            } => write!(
                f,
                "{} and {} partnered {} {}",
                player_a,
                player_b,
                count,
                plural(*count, "time", "times")
            ),
            Violation::GameCountLow { player, count } => write!(
                f,
                "{} has played {} {}",
                player,
                count,
                plural(*count, "game", "games")
            ),
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Scan a round set for partnership repeats and game-count imbalance.
///
/// `player_ids` is the roster under consideration; `names` maps ids to
/// display names for the warning text (ids without a name render as
/// "Player #<id>"). The game-count target is the maximum count observed
/// among `player_ids`; players absent from the round set count 0 and
/// are flagged whenever the target exceeds 0.
pub fn check_swap_violations(
    games: &[Game],
    player_ids: &[PlayerId],
    names: &HashMap<PlayerId, String>,
) -> Vec<Violation> {
    let mut violations = partnership_repeats(games, names);
    violations.extend(game_count_shortfalls(games, player_ids, names));
    violations
}

/// Count unordered teammate pairs across all games; emit a violation
/// for every pair seen more than once, sorted by pair id for stable
/// output.
fn partnership_repeats(games: &[Game], names: &HashMap<PlayerId, String>) -> Vec<Violation> {
    let mut counts: HashMap<(PlayerId, PlayerId), usize> = HashMap::new();
    for game in games {
        for pair in game.partnerships() {
            *counts.entry(pair).or_insert(0) += 1;
        }
    }

    let mut repeated: Vec<((PlayerId, PlayerId), usize)> =
        counts.into_iter().filter(|(_, count)| *count > 1).collect();
    repeated.sort_by_key(|(pair, _)| *pair);

    repeated
        .into_iter()
        .map(|((a, b), count)| Violation::PartnershipRepeat {
            player_a: display_name(a, names),
            player_b: display_name(b, names),
            count,
        })
        .collect()
}

/// Flag every listed player strictly below the target game count, in
/// the order the ids were supplied.
fn game_count_shortfalls(
    games: &[Game],
    player_ids: &[PlayerId],
    names: &HashMap<PlayerId, String>,
) -> Vec<Violation> {
    let mut counts: HashMap<PlayerId, usize> = HashMap::new();
    for game in games {
        for player in game.players() {
            *counts.entry(player).or_insert(0) += 1;
        }
    }

    let count_for = |id: PlayerId| counts.get(&id).copied().unwrap_or(0);
    let target = player_ids.iter().map(|&id| count_for(id)).max().unwrap_or(0);
    if target == 0 {
        return Vec::new();
    }

    player_ids
        .iter()
        .filter(|&&id| count_for(id) < target)
        .map(|&id| Violation::GameCountLow {
            player: display_name(id, names),
            count: count_for(id),
        })
        .collect()
}

fn display_name(id: PlayerId, names: &HashMap<PlayerId, String>) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("Player #{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: i64, round: u32, players: [PlayerId; 4]) -> Game {
        Game {
            id,
            week_id: 1,
            round_number: round,
            court_number: 1,
            team1_player1: players[0],
            team1_player2: players[1],
            team2_player1: players[2],
            team2_player2: players[3],
            team1_score: None,
            team2_score: None,
        }
    }

    fn names_for(entries: &[(PlayerId, &str)]) -> HashMap<PlayerId, String> {
        entries.iter().map(|(id, name)| (*id, name.to_string())).collect()
    }

    // -- partnership repeats --

    #[test]
    fn clean_round_set_has_no_violations() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 3, 2, 4])];
        let names = names_for(&[(1, "Alice"), (2, "Bob"), (3, "Cara"), (4, "Dan")]);
        assert!(check_swap_violations(&games, &[1, 2, 3, 4], &names).is_empty());
    }

    #[test]
    fn repeated_partnership_is_reported_with_count() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 2, 5, 6])];
        let names = names_for(&[(1, "Alice"), (2, "Bob")]);
        let violations = check_swap_violations(&games, &[], &names);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "Alice and Bob partnered 2 times");
    }

    #[test]
    fn partnership_counting_ignores_slot_order() {
        // (2,1) in round 1 and (1,2) in round 2 are the same pair.
        let games = vec![game(1, 1, [2, 1, 3, 4]), game(2, 2, [1, 2, 5, 6])];
        let names = names_for(&[(1, "Alice"), (2, "Bob")]);
        let violations = check_swap_violations(&games, &[], &names);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0],
            Violation::PartnershipRepeat { count: 2, .. }
        ));
    }

    #[test]
    fn repeats_are_sorted_by_pair_id() {
        // Pair (3,4) repeats in games 1 and 2, pair (1,2) in games 1 and 3;
        // output sorts (1,2) first regardless of scan order.
        let games = vec![
            game(1, 1, [3, 4, 1, 2]),
            game(2, 2, [3, 4, 5, 6]),
            game(3, 3, [1, 2, 7, 8]),
        ];
        let names = HashMap::new();
        let violations = check_swap_violations(&games, &[], &names);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].to_string(), "Player #1 and Player #2 partnered 2 times");
        assert_eq!(violations[1].to_string(), "Player #3 and Player #4 partnered 2 times");
    }

    #[test]
    fn missing_names_fall_back_to_id() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 2, 5, 6])];
        let names = names_for(&[(1, "Alice")]);
        let violations = check_swap_violations(&games, &[], &names);
        assert_eq!(violations[0].to_string(), "Alice and Player #2 partnered 2 times");
    }

    // -- game-count imbalance --

    #[test]
    fn balanced_counts_produce_no_violations() {
        // Round 2 rotates partners rather than reversing slots; reversed
        // slots would reproduce round 1's unordered pairs.
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 4, 2, 3])];
        let names = HashMap::new();
        assert!(check_swap_violations(&games, &[1, 2, 3, 4], &names).is_empty());
    }

    #[test]
    fn shortfall_against_max_observed_count() {
        // The three rounds use the three distinct pair partitions of
        // players 1-4, so the partnership scan stays quiet.
        let games = vec![
            game(1, 1, [1, 2, 3, 4]),
            game(2, 2, [1, 3, 2, 4]),
            game(3, 3, [1, 4, 2, 3]),
        ];
        // Player 5 never plays; players 1-4 each have 3 games.
        let names = names_for(&[(5, "Eve")]);
        let violations = check_swap_violations(&games, &[1, 2, 3, 4, 5], &names);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "Eve has played 0 games");
    }

    #[test]
    fn shortfall_uses_singular_for_one_game() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 3, 2, 5])];
        let names = names_for(&[(4, "Dan")]);
        let violations = check_swap_violations(&games, &[1, 4], &names);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "Dan has played 1 game");
    }

    #[test]
    fn shortfalls_follow_supplied_order() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 5, 6, 7])];
        let names = HashMap::new();
        let violations = check_swap_violations(&games, &[7, 2, 1], &names);
        let rendered: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["Player #7 has played 1 game", "Player #2 has played 1 game"]
        );
    }

    #[test]
    fn empty_round_set_flags_nobody() {
        let names = HashMap::new();
        assert!(check_swap_violations(&[], &[1, 2, 3], &names).is_empty());
    }

    #[test]
    fn target_ignores_unlisted_players() {
        // Player 9 has 2 games but is not on the supplied roster; the
        // target among listed players is 1, so nobody is short.
        let games = vec![game(1, 1, [9, 1, 2, 3]), game(2, 2, [9, 4, 5, 6])];
        let names = HashMap::new();
        assert!(check_swap_violations(&games, &[1, 2, 3, 4, 5, 6], &names).is_empty());
    }

    #[test]
    fn combined_scans_report_both_kinds() {
        let games = vec![game(1, 1, [1, 2, 3, 4]), game(2, 2, [1, 2, 5, 6])];
        let names = names_for(&[(1, "Alice"), (2, "Bob"), (3, "Cara")]);
        let violations = check_swap_violations(&games, &[1, 2, 3], &names);
        let rendered: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["Alice and Bob partnered 2 times", "Cara has played 1 game"]
        );
    }
}
