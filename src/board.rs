//! The 5x5 grid of intersections and its line topology.
//!
//! Every point connects orthogonally to its on-board neighbours. Points where
//! `row + col` is even also carry the diagonal lines of the traditional board.
//! [`directions`] is the only place this rule lives; move generation, jump
//! geometry and mobility checks all go through it.

use std::fmt;
use std::str::FromStr;

use crate::constants::{ALL_DIRECTIONS, BOARDSIZE, N, ORTHOGONAL, TIGER_COUNT, TOTAL_GOATS};

/// A point on the board as zero-based `(row, col)`.
pub type Point = (usize, usize);

/// Contents of a single intersection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Piece {
    #[default]
    Empty,
    Goat,
    Tiger,
}

impl Piece {
    fn to_char(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::Goat => 'G',
            Piece::Tiger => 'T',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Piece::Empty),
            'G' | 'g' => Some(Piece::Goat),
            'T' | 't' => Some(Piece::Tiger),
            _ => None,
        }
    }
}

/// Error building a board or position from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Board text did not contain exactly 25 cells
    BadLength(usize),
    /// Unknown cell character
    BadCell(char),
    /// Wrong number of tigers
    TigerCount(usize),
    /// More goats than the game ever puts in play
    TooManyGoats(usize),
    /// Captured count does not fit the goats on the board
    InconsistentCounts,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::BadLength(n) => write!(f, "expected {BOARDSIZE} cells, got {n}"),
            SetupError::BadCell(c) => write!(f, "invalid cell character '{c}'"),
            SetupError::TigerCount(n) => write!(f, "expected {TIGER_COUNT} tigers, got {n}"),
            SetupError::TooManyGoats(n) => {
                write!(f, "{n} goats in play, at most {TOTAL_GOATS} allowed")
            }
            SetupError::InconsistentCounts => write!(f, "goat counters do not match the board"),
        }
    }
}

impl std::error::Error for SetupError {}

/// Returns true if `pt` lies on the board.
#[inline]
pub fn on_board(pt: Point) -> bool {
    pt.0 < N && pt.1 < N
}

/// Line directions leaving `pt`. Diagonals exist only where `row + col` is even.
#[inline]
pub fn directions(pt: Point) -> &'static [(isize, isize)] {
    if (pt.0 + pt.1) % 2 == 0 {
        &ALL_DIRECTIONS
    } else {
        &ORTHOGONAL
    }
}

/// Walk `dist` steps from `pt` along `dir`, if the target is on the board.
#[inline]
pub fn step(pt: Point, dir: (isize, isize), dist: isize) -> Option<Point> {
    let r = pt.0.checked_add_signed(dir.0 * dist)?;
    let c = pt.1.checked_add_signed(dir.1 * dist)?;
    on_board((r, c)).then_some((r, c))
}

/// Points joined to `pt` by a line.
pub fn neighbors(pt: Point) -> impl Iterator<Item = Point> {
    directions(pt).iter().filter_map(move |&d| step(pt, d, 1))
}

/// All 25 points in row-major order.
pub fn all_points() -> impl Iterator<Item = Point> {
    (0..N).flat_map(|r| (0..N).map(move |c| (r, c)))
}

/// Parse a vertex such as `"c3"` into a point.
///
/// The letter selects the column (`a` is column 0) and the digit is the row
/// plus one, so `a1` is the top-left corner and `e5` the bottom-right.
pub fn parse_coord(s: &str) -> Option<Point> {
    let bytes = s.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = bytes[0].to_ascii_lowercase().checked_sub(b'a')? as usize;
    let row = bytes[1].checked_sub(b'1')? as usize;
    on_board((row, col)).then_some((row, col))
}

/// Convert a point to its vertex string (e.g. `"c3"`), or `None` off the board.
pub fn str_coord(pt: Point) -> Option<String> {
    if !on_board(pt) {
        return None;
    }
    Some(format!("{}{}", char::from(b'a' + pt.1 as u8), pt.0 + 1))
}

/// The grid of intersections.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Piece; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// A board with nothing on it.
    pub fn empty() -> Self {
        Self {
            cells: [[Piece::Empty; N]; N],
        }
    }

    /// Piece at `pt`, or `None` off the board.
    #[inline]
    pub fn get(&self, pt: Point) -> Option<Piece> {
        on_board(pt).then(|| self.cells[pt.0][pt.1])
    }

    /// Store `piece` at `pt`. Callers must pass an on-board point.
    #[inline]
    pub(crate) fn set(&mut self, pt: Point, piece: Piece) {
        self.cells[pt.0][pt.1] = piece;
    }

    /// True if `pt` is on the board and empty.
    #[inline]
    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.get(pt) == Some(Piece::Empty)
    }

    /// Points currently holding `piece`, in row-major order.
    pub fn points_of(&self, piece: Piece) -> impl Iterator<Item = Point> + '_ {
        all_points().filter(move |&pt| self.cells[pt.0][pt.1] == piece)
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.points_of(piece).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (c, piece) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", piece.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the `Display` form: 25 cells of `T`, `G` or `.`, whitespace ignored.
impl FromStr for Board {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != BOARDSIZE {
            return Err(SetupError::BadLength(cells.len()));
        }

        let mut board = Board::empty();
        for (pt, &ch) in all_points().zip(&cells) {
            let piece = Piece::from_char(ch).ok_or(SetupError::BadCell(ch))?;
            board.set(pt, piece);
        }

        let tigers = board.count(Piece::Tiger);
        if tigers != TIGER_COUNT {
            return Err(SetupError::TigerCount(tigers));
        }
        let goats = board.count(Piece::Goat);
        if goats > TOTAL_GOATS as usize {
            return Err(SetupError::TooManyGoats(goats));
        }
        Ok(board)
    }
}
