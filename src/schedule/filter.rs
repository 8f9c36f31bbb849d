// Game filtering: round/court facets and the week-view filter state.

use std::collections::BTreeMap;

use crate::schedule::model::Game;

/// Sorted unique round numbers present in a game list.
pub fn round_numbers(games: &[Game]) -> Vec<u32> {
    let mut rounds: Vec<u32> = games.iter().map(|g| g.round_number).collect();
    rounds.sort_unstable();
    rounds.dedup();
    rounds
}

/// Sorted unique court numbers present in a game list.
pub fn court_numbers(games: &[Game]) -> Vec<u32> {
    let mut courts: Vec<u32> = games.iter().map(|g| g.court_number).collect();
    courts.sort_unstable();
    courts.dedup();
    courts
}

/// Game count per round, sorted by round.
pub fn games_per_round(games: &[Game]) -> Vec<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for game in games {
        *counts.entry(game.round_number).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Game count per court, sorted by court.
pub fn games_per_court(games: &[Game]) -> Vec<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for game in games {
        *counts.entry(game.court_number).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Games of one round, ordered by court ascending.
pub fn games_in_round(games: &[Game], round: u32) -> Vec<Game> {
    let mut filtered: Vec<Game> = games
        .iter()
        .filter(|g| g.round_number == round)
        .cloned()
        .collect();
    filtered.sort_by_key(|g| g.court_number);
    filtered
}

/// Games on one court, ordered by round ascending.
pub fn games_on_court(games: &[Game], court: u32) -> Vec<Game> {
    let mut filtered: Vec<Game> = games
        .iter()
        .filter(|g| g.court_number == court)
        .cloned()
        .collect();
    filtered.sort_by_key(|g| g.round_number);
    filtered
}

/// One dimension and one value selected in the week view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFilter {
    Round(u32),
    Court(u32),
}

impl GameFilter {
    /// The week view opens filtered to the lowest round present, or
    /// round 1 when the game list is empty.
    pub fn default_for(games: &[Game]) -> GameFilter {
        GameFilter::Round(round_numbers(games).first().copied().unwrap_or(1))
    }

    /// Apply this filter, returning a new ordered game list.
    pub fn apply(&self, games: &[Game]) -> Vec<Game> {
        match self {
            GameFilter::Round(round) => games_in_round(games, *round),
            GameFilter::Court(court) => games_on_court(games, *court),
        }
    }
}
