//! Self-play: the tiger bot against a uniformly random goat player.
//!
//! Used by the `demo` and `selfplay` commands and by tests that walk many
//! reachable positions. Games that run past the ply limit end without a
//! winner, since movement-phase play can repeat forever.

use crate::position::{Move, Position, Side, counts_consistent};
use crate::search::{TigerBot, goat_moves};

/// A finished (or abandoned) self-play game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Winner, or `None` if the ply limit was reached
    pub winner: Option<Side>,
    /// Every move played, in order
    pub moves: Vec<Move>,
    pub final_position: Position,
}

/// Pick a uniformly random goat action, if there is one.
pub fn random_goat_move(pos: &Position, rng: &mut fastrand::Rng) -> Option<Move> {
    let moves = goat_moves(pos);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Play one game from the starting position.
///
/// `on_move` is called after every move with the move and the new position.
pub fn play_game_with<F>(
    bot: &mut TigerBot,
    rng: &mut fastrand::Rng,
    max_plies: usize,
    mut on_move: F,
) -> GameRecord
where
    F: FnMut(Move, &Position),
{
    let mut pos = Position::new();
    let mut moves = Vec::new();

    while pos.winner().is_none() && moves.len() < max_plies {
        let mv = match pos.turn() {
            Side::Goat => random_goat_move(&pos, rng),
            Side::Tiger => bot.choose_move(&pos),
        };
        // A side with nothing to play ends the game early
        let Some(mv) = mv else {
            break;
        };
        if pos.apply(mv).is_err() {
            break;
        }
        debug_assert!(counts_consistent(&pos));
        moves.push(mv);
        on_move(mv, &pos);
    }

    GameRecord {
        winner: pos.winner(),
        moves,
        final_position: pos,
    }
}

/// Play one game without observing the moves.
pub fn play_game(bot: &mut TigerBot, rng: &mut fastrand::Rng, max_plies: usize) -> GameRecord {
    play_game_with(bot, rng, max_plies, |_, _| {})
}
