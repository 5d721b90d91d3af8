//! Minimax search with alpha-beta pruning for the tiger side.
//!
//! The search is plain depth-first minimax: tigers maximize, goats minimize.
//! Every explored node works on its own copy of the [`Position`], so the
//! caller's position is never touched and sibling branches cannot interfere.
//!
//! Randomness comes from the bot's own [`fastrand::Rng`]:
//! - root candidates are shuffled so equal scores break ties at random
//! - during placement, goat replies are sampled down to
//!   [`PLACEMENT_SAMPLE`] per node to bound the branching factor
//!
//! Seed the bot with [`TigerBot::with_seed`] for reproducible searches.

use crate::board::Piece;
use crate::constants::{
    CAPTURE_WEIGHT, DEFAULT_DEPTH, MOBILITY_WEIGHT, PLACEMENT_SAMPLE, WIN_SCORE,
};
use crate::position::{Move, Phase, Position, Side};

/// Outcome of a root search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen tiger move, `None` if the tigers cannot move
    pub best: Option<Move>,
    /// Score of the chosen move (positive favours the tigers)
    pub score: i32,
    /// Nodes visited
    pub nodes: u64,
    /// Every root candidate with its score, in evaluation order
    pub candidates: Vec<(Move, i32)>,
}

/// Tiger opponent: fixed-depth minimax with alpha-beta pruning.
pub struct TigerBot {
    depth: u32,
    rng: fastrand::Rng,
    nodes: u64,
}

impl Default for TigerBot {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl TigerBot {
    /// Create a bot searching `depth` plies, seeded from entropy.
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            rng: fastrand::Rng::new(),
            nodes: 0,
        }
    }

    /// Create a bot with a fixed seed, for reproducible move choices.
    pub fn with_seed(depth: u32, seed: u64) -> Self {
        Self {
            depth,
            rng: fastrand::Rng::with_seed(seed),
            nodes: 0,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    /// Nodes visited since the last root search started.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Pick a tiger move at the configured depth.
    pub fn choose_move(&mut self, pos: &Position) -> Option<Move> {
        self.search(pos, self.depth).best
    }

    /// Score every tiger move at the root and return the best one.
    ///
    /// Returns no move when the game is over, when it is not the tigers'
    /// turn, or when no tiger can move. A depth of 0 is treated as 1.
    pub fn search(&mut self, pos: &Position, depth: u32) -> SearchResult {
        self.nodes = 0;
        let depth = depth.max(1);

        let mut result = SearchResult {
            best: None,
            score: -WIN_SCORE,
            nodes: 0,
            candidates: Vec::new(),
        };
        if pos.winner().is_some() || pos.turn() != Side::Tiger {
            return result;
        }

        let mut moves = tiger_moves(pos);
        self.rng.shuffle(&mut moves);

        let mut best_score = i32::MIN;
        for mv in moves {
            let next = child(pos, mv);
            let score = self.minimax(&next, depth - 1, i32::MIN, i32::MAX);
            result.candidates.push((mv, score));

            // Strictly greater: the first of equal scores wins, and the
            // shuffle above makes that one random.
            if score > best_score {
                best_score = score;
                result.best = Some(mv);
            }
        }

        if result.best.is_some() {
            result.score = best_score;
        }
        result.nodes = self.nodes;
        result
    }

    /// Minimax value of `pos` with `depth` plies remaining.
    ///
    /// Tigers maximize and goats minimize; the side to move is taken from
    /// `pos`. Tiger wins score `WIN_SCORE + depth` so quicker wins are
    /// preferred.
    pub fn minimax(&mut self, pos: &Position, depth: u32, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        match pos.winner() {
            Some(Side::Tiger) => return WIN_SCORE + depth as i32,
            Some(Side::Goat) => return -WIN_SCORE,
            None => {}
        }
        if depth == 0 {
            return evaluate(pos);
        }

        if pos.turn() == Side::Tiger {
            let moves = tiger_moves(pos);
            if moves.is_empty() {
                // Trapped tigers lose even if the position has not said so yet
                return -WIN_SCORE;
            }

            let mut max_eval = i32::MIN;
            for mv in moves {
                let eval = self.minimax(&child(pos, mv), depth - 1, alpha, beta);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut moves = goat_moves(pos);
            if moves.is_empty() {
                // Goats stuck in movement phase. Scored as a tiger win; the
                // real rules never force a goat pass, so this is a heuristic.
                return WIN_SCORE;
            }
            if pos.phase() == Phase::Placement && moves.len() > PLACEMENT_SAMPLE {
                self.rng.shuffle(&mut moves);
                moves.truncate(PLACEMENT_SAMPLE);
            }

            let mut min_eval = i32::MAX;
            for mv in moves {
                let eval = self.minimax(&child(pos, mv), depth - 1, alpha, beta);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

/// Copy `pos` and apply a generated move to the copy.
fn child(pos: &Position, mv: Move) -> Position {
    let mut next = *pos;
    let applied = next.apply(mv);
    debug_assert!(applied.is_ok(), "generated move {mv} rejected: {applied:?}");
    next
}

/// Every (tiger, destination) pair, ignoring whose turn it is.
pub fn tiger_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in pos.board().points_of(Piece::Tiger) {
        for to in pos.legal_destinations(from, false) {
            moves.push(Move::step(from, to));
        }
    }
    moves
}

/// Goat actions: every empty point during placement, every goat move after.
pub fn goat_moves(pos: &Position) -> Vec<Move> {
    match pos.phase() {
        Phase::Placement => pos.empty_cells().into_iter().map(Move::place).collect(),
        Phase::Movement => {
            let mut moves = Vec::new();
            for from in pos.board().points_of(Piece::Goat) {
                for to in pos.legal_destinations(from, false) {
                    moves.push(Move::step(from, to));
                }
            }
            moves
        }
    }
}

/// Static evaluation from the tigers' point of view: material plus mobility.
pub fn evaluate(pos: &Position) -> i32 {
    pos.goats_captured() as i32 * CAPTURE_WEIGHT + tiger_moves(pos).len() as i32 * MOBILITY_WEIGHT
}

/// Print the scored root candidates to stderr.
pub fn dump_candidates(result: &SearchResult) {
    for (mv, score) in &result.candidates {
        eprintln!("move {mv} score={score}");
    }
    match result.best {
        Some(best) => eprintln!(
            "best {best} score={} nodes={}",
            result.score, result.nodes
        ),
        None => eprintln!("no tiger move, nodes={}", result.nodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn pos_from(rows: &str, turn: Side, captured: u8) -> Position {
        let board: Board = rows.parse().unwrap();
        Position::setup(board, turn, captured).unwrap()
    }

    #[test]
    fn test_evaluate_fresh_position() {
        // Each corner tiger has three simple moves
        let pos = Position::new();
        assert_eq!(tiger_moves(&pos).len(), 12);
        assert_eq!(evaluate(&pos), 120);
    }

    #[test]
    fn test_goat_moves_placement_are_placements() {
        let pos = Position::new();
        let moves = goat_moves(&pos);
        assert_eq!(moves.len(), 21);
        assert!(moves.iter().all(|m| m.from.is_none()));
    }

    #[test]
    fn test_depth_one_prefers_capture() {
        let mut pos = Position::new();
        pos.place_goat((1, 1)).unwrap();

        for seed in 0..10 {
            let mut bot = TigerBot::with_seed(1, seed);
            let result = bot.search(&pos, 1);
            assert_eq!(result.best, Some(Move::step((0, 0), (2, 2))));
            assert!(result.score >= CAPTURE_WEIGHT);
            assert_eq!(result.candidates.len(), tiger_moves(&pos).len());
        }
    }

    #[test]
    fn test_no_move_when_not_tiger_turn() {
        let pos = Position::new();
        let mut bot = TigerBot::with_seed(3, 1);
        assert_eq!(bot.choose_move(&pos), None);
    }

    #[test]
    fn test_no_move_when_tigers_trapped() {
        let pos = pos_from(
            "T G G G T
             G G . G G
             G G G G G
             G G G G G
             T G G G T",
            Side::Tiger,
            0,
        );
        let mut bot = TigerBot::with_seed(3, 1);
        let result = bot.search(&pos, 3);
        assert_eq!(result.best, None);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_search_does_not_mutate_position() {
        let mut pos = Position::new();
        pos.place_goat((2, 2)).unwrap();
        let before = pos;
        let mut bot = TigerBot::with_seed(3, 7);
        let mv = bot.choose_move(&pos);
        assert!(mv.is_some());
        assert_eq!(pos, before);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let mut pos = Position::new();
        pos.place_goat((2, 2)).unwrap();
        let a = TigerBot::with_seed(3, 42).choose_move(&pos);
        let b = TigerBot::with_seed(3, 42).choose_move(&pos);
        assert_eq!(a, b);
    }

    #[test]
    fn test_terminal_scores() {
        let mut bot = TigerBot::with_seed(3, 0);

        let tiger_won = pos_from(
            "T . . . T
             . . . . .
             . . . . .
             . . . . .
             T . . . T",
            Side::Goat,
            5,
        );
        assert_eq!(tiger_won.winner(), Some(Side::Tiger));
        assert_eq!(bot.minimax(&tiger_won, 2, i32::MIN, i32::MAX), WIN_SCORE + 2);
        assert_eq!(bot.minimax(&tiger_won, 0, i32::MIN, i32::MAX), WIN_SCORE);

        let goat_won = pos_from(
            "T G G G T
             G G . G G
             G G G G G
             G G G G G
             T G G G T",
            Side::Tiger,
            0,
        );
        assert_eq!(bot.minimax(&goat_won, 2, i32::MIN, i32::MAX), -WIN_SCORE);
    }

    #[test]
    fn test_prefers_quicker_win() {
        // Fifth capture available right now
        let pos = pos_from(
            "T . . . T
             . G . . .
             . . . . .
             . . . . .
             T . . . T",
            Side::Tiger,
            4,
        );
        let mut bot = TigerBot::with_seed(3, 5);
        let result = bot.search(&pos, 3);
        assert_eq!(result.best, Some(Move::step((0, 0), (2, 2))));
        assert_eq!(result.score, WIN_SCORE + 2);
    }

    #[test]
    fn test_stuck_goats_score_as_tiger_win() {
        // Movement phase, goat to move, every empty point walled off by tigers
        let pos = pos_from(
            "T G G G G
             G G G G G
             G G G G T
             G G G T .
             G G T . .",
            Side::Goat,
            2,
        );
        assert_eq!(pos.phase(), Phase::Movement);
        assert_eq!(pos.winner(), None);
        assert!(goat_moves(&pos).is_empty());

        let mut bot = TigerBot::with_seed(3, 0);
        assert_eq!(bot.minimax(&pos, 2, i32::MIN, i32::MAX), WIN_SCORE);
    }

    #[test]
    fn test_placement_replies_are_sampled() {
        let pos = Position::new();
        let mut bot = TigerBot::with_seed(2, 11);
        bot.minimax(&pos, 1, i32::MIN, i32::MAX);
        // The node itself plus at most PLACEMENT_SAMPLE leaves
        assert!(bot.nodes() <= 1 + PLACEMENT_SAMPLE as u64);
        assert!(bot.nodes() >= 2);
    }

    #[test]
    fn test_minimax_follows_side_to_move() {
        // Goats to move on a fresh board: the node must minimize over goat
        // placements rather than try tiger moves out of turn
        let pos = Position::new();
        let mut bot = TigerBot::with_seed(2, 1);
        let score = bot.minimax(&pos, 2, i32::MIN, i32::MAX);
        assert!(score < WIN_SCORE);
        assert!(score >= 0);

        let mut after = pos;
        after.place_goat((1, 1)).unwrap();
        let score = bot.minimax(&after, 1, i32::MIN, i32::MAX);
        assert!(score >= CAPTURE_WEIGHT);
    }
}
