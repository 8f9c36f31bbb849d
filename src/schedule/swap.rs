// Swap engine: locate players, validate a proposed repair, apply it.

use thiserror::Error;

use crate::schedule::model::{Bye, Game, GameId, PlayerId, PlayerPosition, TeamSide, TeamSlot};

/// Why a proposed swap is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("cannot swap a player with themselves")]
    SamePlayer,
    #[error("players are already on the same team in this game")]
    SameTeam,
    #[error("game {game_id} is not part of this round")]
    GameNotFound { game_id: GameId },
    #[error("player {player_id} has no bye in round {round_number}")]
    ByeNotFound { player_id: PlayerId, round_number: u32 },
}

/// The rewritten round set produced by a successful swap. The caller's
/// input collections are untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub games: Vec<Game>,
    pub byes: Vec<Bye>,
}

/// Locate a player within one round's games and byes.
///
/// Scans every game's four slots in list order (team 1 first slot,
/// team 1 second, team 2 first, team 2 second), then the bye list.
/// First match wins; within a round each player holds at most one
/// position, so scan order never changes the result. Returns None for
/// a player holding no position.
pub fn find_player_position(
    player_id: PlayerId,
    games: &[Game],
    byes: &[Bye],
) -> Option<PlayerPosition> {
    for game in games {
        for team in [TeamSide::Team1, TeamSide::Team2] {
            for slot in [TeamSlot::First, TeamSlot::Second] {
                if game.player_at(team, slot) == player_id {
                    return Some(PlayerPosition::Slot {
                        player_id,
                        game_id: game.id,
                        team,
                        slot,
                    });
                }
            }
        }
    }
    byes
        .iter()
        .find(|b| b.player_id == player_id)
        .map(|b| PlayerPosition::Bye {
            player_id,
            round_number: b.round_number,
        })
}

/// Check whether two positions may legally be swapped.
///
/// Rules, in order: a position cannot be swapped with itself
/// (`SamePlayer`), and two slots on the same team of the same game
/// cannot be swapped (`SameTeam`, a no-op). Everything else is legal,
/// including cross-team swaps within a game, cross-game swaps, and any
/// swap involving a bye. Bye-with-bye is a legal no-op.
pub fn validate_swap(a: &PlayerPosition, b: &PlayerPosition) -> Result<(), SwapError> {
    if a.player_id() == b.player_id() {
        return Err(SwapError::SamePlayer);
    }
    if let (
        PlayerPosition::Slot {
            game_id: game_a, team: team_a, ..
        },
        PlayerPosition::Slot {
            game_id: game_b, team: team_b, ..
        },
    ) = (a, b)
    {
        if game_a == game_b && team_a == team_b {
            return Err(SwapError::SameTeam);
        }
    }
    Ok(())
}

/// Apply a validated swap, exchanging the two players' identities at
/// their respective positions.
///
/// Re-validates first and returns the same error a failed
/// `validate_swap` would, with nothing changed. On success the result
/// holds new game and bye collections; the inputs are never mutated.
/// A locator pointing at a game or bye record that is no longer part
/// of the supplied round set fails with `GameNotFound` / `ByeNotFound`.
pub fn perform_swap(
    a: &PlayerPosition,
    b: &PlayerPosition,
    games: &[Game],
    byes: &[Bye],
) -> Result<SwapOutcome, SwapError> {
    validate_swap(a, b)?;

    let mut new_games = games.to_vec();
    let mut new_byes = byes.to_vec();
    place(&mut new_games, &mut new_byes, a, b.player_id())?;
    place(&mut new_games, &mut new_byes, b, a.player_id())?;

    Ok(SwapOutcome {
        games: new_games,
        byes: new_byes,
    })
}

/// Write `player` into the position described by `pos`. Positions are
/// coordinates (game id + slot, or bye record), so placing into the
/// first position never confuses the lookup for the second.
fn place(
    games: &mut [Game],
    byes: &mut [Bye],
    pos: &PlayerPosition,
    player: PlayerId,
) -> Result<(), SwapError> {
    match pos {
        PlayerPosition::Slot {
            game_id, team, slot, ..
        } => {
            let game = games
                .iter_mut()
                .find(|g| g.id == *game_id)
                .ok_or(SwapError::GameNotFound { game_id: *game_id })?;
            game.set_player_at(*team, *slot, player);
            Ok(())
        }
        PlayerPosition::Bye {
            player_id,
            round_number,
        } => {
            let bye = byes
                .iter_mut()
                .find(|b| b.player_id == *player_id && b.round_number == *round_number)
                .ok_or(SwapError::ByeNotFound {
                    player_id: *player_id,
                    round_number: *round_number,
                })?;
            bye.player_id = player;
            Ok(())
        }
    }
}
