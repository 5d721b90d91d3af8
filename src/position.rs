//! Game state and rules: legality, placement, movement, capture and win detection.
//!
//! A [`Position`] is a small `Copy` value. Every command either applies in
//! full or returns a [`MoveError`] and leaves the position untouched. Once a
//! winner is set the position is frozen.

use std::fmt;

use crate::board::{
    Board, Piece, Point, SetupError, directions, neighbors, on_board, step, str_coord,
};
use crate::constants::{CAPTURES_TO_WIN, TIGER_COUNT, TIGER_START, TOTAL_GOATS};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Goat,
    Tiger,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Goat => Side::Tiger,
            Side::Tiger => Side::Goat,
        }
    }

    pub fn piece(self) -> Piece {
        match self {
            Side::Goat => Piece::Goat,
            Side::Tiger => Piece::Tiger,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Goat => write!(f, "goat"),
            Side::Tiger => write!(f, "tiger"),
        }
    }
}

/// Stage of the game. Placement ends when the last goat enters the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Placement,
    Movement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Placement => write!(f, "placement"),
            Phase::Movement => write!(f, "movement"),
        }
    }
}

/// A goat placement (`from == None`) or a piece moving from one point to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Option<Point>,
    pub to: Point,
}

impl Move {
    pub fn place(to: Point) -> Self {
        Self { from: None, to }
    }

    pub fn step(from: Point, to: Point) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }

    /// True for a two-point move, which for a tiger is a capture.
    pub fn is_jump(&self) -> bool {
        self.from
            .is_some_and(|from| from.0.abs_diff(self.to.0) == 2 || from.1.abs_diff(self.to.1) == 2)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertex = |pt| str_coord(pt).unwrap_or_else(|| "??".to_string());
        match self.from {
            Some(from) => write!(f, "{}-{}", vertex(from), vertex(self.to)),
            None => write!(f, "{}", vertex(self.to)),
        }
    }
}

/// Reason a placement or move was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game already has a winner
    GameOver,
    /// A coordinate lies outside the board
    OutOfBounds,
    /// Placement after all goats are in, or goat movement before
    WrongPhase,
    /// The piece or action belongs to the side not on turn
    WrongTurn,
    /// Target point is not empty
    Occupied,
    /// Start point is empty
    NoPiece,
    /// Destination is not reachable from the start point
    IllegalDestination,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "illegal move: game is over"),
            MoveError::OutOfBounds => write!(f, "illegal move: point off the board"),
            MoveError::WrongPhase => write!(f, "illegal move: not allowed in this phase"),
            MoveError::WrongTurn => write!(f, "illegal move: not your turn"),
            MoveError::Occupied => write!(f, "illegal move: point not empty"),
            MoveError::NoPiece => write!(f, "illegal move: no piece at start point"),
            MoveError::IllegalDestination => write!(f, "illegal move: destination not reachable"),
        }
    }
}

impl std::error::Error for MoveError {}

/// A Bagh Chal position (full game state).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    goats_placed: u8,
    goats_captured: u8,
    turn: Side,
    phase: Phase,
    winner: Option<Side>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Fresh game: tigers on the corners, goat to place.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for pt in TIGER_START {
            board.set(pt, Piece::Tiger);
        }
        Self {
            board,
            goats_placed: 0,
            goats_captured: 0,
            turn: Side::Goat,
            phase: Phase::Placement,
            winner: None,
        }
    }

    /// Build an arbitrary but consistent position.
    ///
    /// Goats placed is derived as goats on the board plus `goats_captured`;
    /// the phase follows from that count and the winner is evaluated
    /// immediately, exactly as after a move.
    pub fn setup(board: Board, turn: Side, goats_captured: u8) -> Result<Self, SetupError> {
        let tigers = board.count(Piece::Tiger);
        if tigers != TIGER_COUNT {
            return Err(SetupError::TigerCount(tigers));
        }
        if goats_captured > CAPTURES_TO_WIN {
            return Err(SetupError::InconsistentCounts);
        }
        let placed = board.count(Piece::Goat) + goats_captured as usize;
        if placed > TOTAL_GOATS as usize {
            return Err(SetupError::TooManyGoats(placed));
        }

        let mut pos = Self {
            board,
            goats_placed: placed as u8,
            goats_captured,
            turn,
            phase: if placed == TOTAL_GOATS as usize {
                Phase::Movement
            } else {
                Phase::Placement
            },
            winner: None,
        };
        pos.update_winner();
        Ok(pos)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, pt: Point) -> Option<Piece> {
        self.board.get(pt)
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn goats_placed(&self) -> u8 {
        self.goats_placed
    }

    pub fn goats_captured(&self) -> u8 {
        self.goats_captured
    }

    fn side_at(&self, pt: Point) -> Option<Side> {
        match self.board.get(pt)? {
            Piece::Goat => Some(Side::Goat),
            Piece::Tiger => Some(Side::Tiger),
            Piece::Empty => None,
        }
    }

    /// Points the piece at `pt` may move to, including tiger capture landings.
    ///
    /// Empty if the game is over, the point is empty or off the board, or the
    /// piece is a goat during placement. With `enforce_turn` the piece must
    /// also belong to the side on turn; without it, mobility can be queried
    /// for either side.
    pub fn legal_destinations(&self, pt: Point, enforce_turn: bool) -> Vec<Point> {
        if self.winner.is_some() {
            return Vec::new();
        }
        let Some(side) = self.side_at(pt) else {
            return Vec::new();
        };
        if side == Side::Goat && self.phase == Phase::Placement {
            return Vec::new();
        }
        if enforce_turn && side != self.turn {
            return Vec::new();
        }

        let mut moves: Vec<Point> = neighbors(pt)
            .filter(|&n| self.board.is_empty_at(n))
            .collect();

        if side == Side::Tiger {
            for &dir in directions(pt) {
                let (Some(mid), Some(land)) = (step(pt, dir, 1), step(pt, dir, 2)) else {
                    continue;
                };
                if self.board.get(mid) == Some(Piece::Goat) && self.board.is_empty_at(land) {
                    moves.push(land);
                }
            }
        }
        moves
    }

    /// All empty points, in row-major order.
    pub fn empty_cells(&self) -> Vec<Point> {
        self.board.points_of(Piece::Empty).collect()
    }

    /// Place a goat at `pt` during the placement phase.
    pub fn place_goat(&mut self, pt: Point) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if !on_board(pt) {
            return Err(MoveError::OutOfBounds);
        }
        if self.phase != Phase::Placement {
            return Err(MoveError::WrongPhase);
        }
        if self.turn != Side::Goat {
            return Err(MoveError::WrongTurn);
        }
        if !self.board.is_empty_at(pt) {
            return Err(MoveError::Occupied);
        }

        self.board.set(pt, Piece::Goat);
        self.goats_placed += 1;
        if self.goats_placed == TOTAL_GOATS {
            self.phase = Phase::Movement;
        }
        self.turn = self.turn.opponent();
        self.update_winner();
        Ok(())
    }

    /// Move the piece at `from` to `to`.
    ///
    /// Returns the point of the captured goat when a tiger jumps.
    pub fn play_move(&mut self, from: Point, to: Point) -> Result<Option<Point>, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if !on_board(from) || !on_board(to) {
            return Err(MoveError::OutOfBounds);
        }
        let Some(side) = self.side_at(from) else {
            return Err(MoveError::NoPiece);
        };
        if !self.legal_destinations(from, true).contains(&to) {
            return Err(if side == Side::Goat && self.phase == Phase::Placement {
                MoveError::WrongPhase
            } else if side != self.turn {
                MoveError::WrongTurn
            } else {
                MoveError::IllegalDestination
            });
        }

        self.board.set(from, Piece::Empty);
        self.board.set(to, side.piece());

        let mut captured = None;
        if side == Side::Tiger && Move::step(from, to).is_jump() {
            let mid = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
            self.board.set(mid, Piece::Empty);
            self.goats_captured += 1;
            captured = Some(mid);
        }

        self.turn = self.turn.opponent();
        self.update_winner();
        Ok(captured)
    }

    /// Apply a placement or a move.
    pub fn apply(&mut self, mv: Move) -> Result<Option<Point>, MoveError> {
        match mv.from {
            Some(from) => self.play_move(from, mv.to),
            None => self.place_goat(mv.to).map(|()| None),
        }
    }

    /// True if no tiger on the board has a single legal destination.
    pub fn tigers_trapped(&self) -> bool {
        self.board
            .points_of(Piece::Tiger)
            .all(|pt| self.legal_destinations(pt, false).is_empty())
    }

    /// Evaluate the win conditions. Captures are checked before mobility.
    fn update_winner(&mut self) {
        if self.goats_captured >= CAPTURES_TO_WIN {
            self.winner = Some(Side::Tiger);
        } else if self.tigers_trapped() {
            self.winner = Some(Side::Goat);
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(
            f,
            "turn: {}  phase: {}  placed: {}/{}  captured: {}/{}",
            self.turn,
            self.phase,
            self.goats_placed,
            TOTAL_GOATS,
            self.goats_captured,
            CAPTURES_TO_WIN
        )?;
        if let Some(winner) = self.winner {
            write!(f, "  winner: {winner}")?;
        }
        writeln!(f)
    }
}

/// Check the counting invariants of a position. Used by tests and self-play.
pub fn counts_consistent(pos: &Position) -> bool {
    let goats = pos.board.count(Piece::Goat);
    pos.goats_placed <= TOTAL_GOATS
        && pos.goats_captured <= CAPTURES_TO_WIN
        && goats + pos.goats_captured as usize == pos.goats_placed as usize
        && pos.board.count(Piece::Tiger) == TIGER_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_from(rows: &str, turn: Side, captured: u8) -> Position {
        Position::setup(rows.parse().unwrap(), turn, captured).unwrap()
    }

    #[test]
    fn test_new_position() {
        let pos = Position::new();
        assert_eq!(pos.turn(), Side::Goat);
        assert_eq!(pos.phase(), Phase::Placement);
        assert_eq!(pos.winner(), None);
        assert_eq!(pos.goats_placed(), 0);
        assert_eq!(pos.goats_captured(), 0);
        for pt in TIGER_START {
            assert_eq!(pos.piece_at(pt), Some(Piece::Tiger));
        }
        assert_eq!(pos.empty_cells().len(), 21);
        assert!(counts_consistent(&pos));
    }

    #[test]
    fn test_place_goat_basic() {
        let mut pos = Position::new();
        assert_eq!(pos.place_goat((1, 1)), Ok(()));
        assert_eq!(pos.goats_placed(), 1);
        assert_eq!(pos.turn(), Side::Tiger);
        assert_eq!(pos.piece_at((1, 1)), Some(Piece::Goat));
        assert!(!pos.empty_cells().contains(&(1, 1)));
    }

    #[test]
    fn test_place_goat_rejections_leave_state_unchanged() {
        let mut pos = Position::new();
        let before = pos;
        assert_eq!(pos.place_goat((0, 0)), Err(MoveError::Occupied));
        assert_eq!(pos.place_goat((5, 2)), Err(MoveError::OutOfBounds));
        assert_eq!(pos, before);

        pos.place_goat((2, 2)).unwrap();
        let before = pos;
        assert_eq!(pos.place_goat((1, 2)), Err(MoveError::WrongTurn));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_tiger_moves_out_of_turn_rejected() {
        let mut pos = Position::new();
        assert_eq!(pos.play_move((0, 0), (0, 1)), Err(MoveError::WrongTurn));
        assert_eq!(pos.turn(), Side::Goat);
        assert_eq!(pos.play_move((2, 2), (2, 3)), Err(MoveError::NoPiece));
        assert_eq!(pos.play_move((0, 0), (9, 9)), Err(MoveError::OutOfBounds));
    }

    #[test]
    fn test_goat_cannot_move_during_placement() {
        let mut pos = Position::new();
        pos.place_goat((2, 2)).unwrap();
        pos.play_move((0, 0), (0, 1)).unwrap();
        assert!(pos.legal_destinations((2, 2), true).is_empty());
        assert!(pos.legal_destinations((2, 2), false).is_empty());
        assert_eq!(pos.play_move((2, 2), (2, 3)), Err(MoveError::WrongPhase));
    }

    #[test]
    fn test_tiger_jump_destinations() {
        let mut pos = Position::new();
        pos.place_goat((1, 1)).unwrap();
        let dests = pos.legal_destinations((0, 0), true);
        assert!(dests.contains(&(2, 2)), "jump landing missing: {dests:?}");
        assert!(dests.contains(&(0, 1)));
        assert!(dests.contains(&(1, 0)));
        assert_eq!(dests.len(), 3);
    }

    #[test]
    fn test_jump_captures_goat() {
        let mut pos = Position::new();
        pos.place_goat((1, 1)).unwrap();
        assert_eq!(pos.play_move((0, 0), (2, 2)), Ok(Some((1, 1))));
        assert_eq!(pos.piece_at((1, 1)), Some(Piece::Empty));
        assert_eq!(pos.piece_at((2, 2)), Some(Piece::Tiger));
        assert_eq!(pos.goats_captured(), 1);
        assert_eq!(pos.goats_placed(), 1);
        assert_eq!(pos.turn(), Side::Goat);
        assert!(counts_consistent(&pos));
    }

    #[test]
    fn test_no_jump_along_missing_diagonal() {
        // (0,1) has odd parity: no diagonal line to (1,2), so no jump to (2,3)
        let pos = pos_from(
            ". T . . T
             . . G . .
             . . . . .
             . . . . .
             T . . . T",
            Side::Tiger,
            0,
        );
        let dests = pos.legal_destinations((0, 1), true);
        assert!(!dests.contains(&(2, 3)));
        assert!(!dests.contains(&(1, 2)));
        assert!(!dests.contains(&(1, 0)));
    }

    #[test]
    fn test_phase_changes_on_twentieth_goat() {
        let mut pos = Position::new();
        // One tiger shuffles between (0,0) and (1,1) so no goat is ever captured
        let tiger_moves = [((0, 0), (1, 1)), ((1, 1), (0, 0))];
        let mut empties: Vec<Point> = pos.empty_cells();
        empties.retain(|&p| p != (1, 1) && p != (2, 2));
        for (i, &pt) in empties.iter().take(19).enumerate() {
            pos.place_goat(pt).unwrap();
            assert_eq!(pos.phase(), Phase::Placement);
            let (from, to) = tiger_moves[i % 2];
            pos.play_move(from, to).unwrap();
        }
        pos.place_goat((2, 2)).unwrap();
        assert_eq!(pos.goats_placed(), 20);
        assert_eq!(pos.phase(), Phase::Movement);
    }

    #[test]
    fn test_trapped_tigers_give_goat_win() {
        let pos = pos_from(
            "T G G G T
             G G . G G
             G G G G G
             G G G G G
             T G G G T",
            Side::Tiger,
            0,
        );
        assert_eq!(pos.phase(), Phase::Movement);
        assert!(pos.tigers_trapped());
        assert_eq!(pos.winner(), Some(Side::Goat));
    }

    #[test]
    fn test_one_mobile_tiger_prevents_goat_win() {
        let pos = pos_from(
            "T G G G T
             G G G G G
             G G . G G
             G G G G G
             T G G G T",
            Side::Tiger,
            0,
        );
        // (0,0) jumps over (1,1) into the center
        assert!(!pos.tigers_trapped());
        assert_eq!(pos.winner(), None);
    }

    #[test]
    fn test_fifth_capture_wins_for_tiger() {
        let mut pos = pos_from(
            "T . . . T
             . G . . .
             . . . . .
             . . . . .
             T . . . T",
            Side::Tiger,
            4,
        );
        assert_eq!(pos.play_move((0, 0), (2, 2)), Ok(Some((1, 1))));
        assert_eq!(pos.goats_captured(), 5);
        assert_eq!(pos.winner(), Some(Side::Tiger));

        let frozen = pos;
        assert_eq!(pos.place_goat((0, 1)), Err(MoveError::GameOver));
        assert_eq!(pos.play_move((2, 2), (2, 3)), Err(MoveError::GameOver));
        assert!(pos.legal_destinations((2, 2), false).is_empty());
        assert_eq!(pos, frozen);
    }

    #[test]
    fn test_legal_destinations_is_pure() {
        let mut pos = Position::new();
        pos.place_goat((1, 1)).unwrap();
        let before = pos;
        let a = pos.legal_destinations((0, 0), true);
        let b = pos.legal_destinations((0, 0), true);
        assert_eq!(a, b);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_setup_rejects_bad_counts() {
        let board: Board = "T . . . T
                            . G . . .
                            . . . . .
                            . . . . .
                            T . . . T"
            .parse()
            .unwrap();
        assert_eq!(
            Position::setup(board, Side::Goat, 6),
            Err(SetupError::InconsistentCounts)
        );
        assert_eq!(
            Position::setup(Board::empty(), Side::Goat, 0),
            Err(SetupError::TigerCount(0))
        );
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::place((2, 2)).to_string(), "c3");
        assert_eq!(Move::step((0, 0), (2, 2)).to_string(), "a1-c3");
        assert_eq!(Move::step((0, 0), (0, 9)).to_string(), "a1-??");
        assert!(Move::step((0, 0), (2, 2)).is_jump());
        assert!(!Move::step((0, 0), (1, 1)).is_jump());
        assert!(!Move::place((0, 0)).is_jump());
    }
}
