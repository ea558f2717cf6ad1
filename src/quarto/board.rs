use crate::quarto::piece::Piece;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 4;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coordinate {
    Row,
    Col,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Row => write!(f, "row"),
            Coordinate::Col => write!(f, "column"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardPositionError {
    #[error("{0} {1} is off the 4x4 board")]
    OutOfBounds(Coordinate, usize),
}

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardPosition {
    row: usize,
    col: usize,
}

impl BoardPosition {
    // Ensure that both coordinates fall inside the board
    pub fn new(row: usize, col: usize) -> Result<Self, BoardPositionError> {
        if row >= BOARD_SIZE {
            return Err(BoardPositionError::OutOfBounds(Coordinate::Row, row));
        }
        if col >= BOARD_SIZE {
            return Err(BoardPositionError::OutOfBounds(Coordinate::Col, col));
        }
        Ok(BoardPosition { row, col })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn all() -> impl Iterator<Item = BoardPosition> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| BoardPosition { row, col }))
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// Index of a row or column, always inside the board
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineIndex(usize);

impl LineIndex {
    pub fn new(idx: usize) -> Option<Self> {
        if idx < BOARD_SIZE {
            Some(LineIndex(idx))
        } else {
            None
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

// One of the ten lines a win can be made on
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Row(LineIndex),
    Col(LineIndex),
    // Top-left to bottom-right
    Diagonal,
    // Top-right to bottom-left
    AntiDiagonal,
}

impl Line {
    pub fn row(idx: usize) -> Option<Line> {
        LineIndex::new(idx).map(Line::Row)
    }

    pub fn col(idx: usize) -> Option<Line> {
        LineIndex::new(idx).map(Line::Col)
    }

    // Rows first, then columns, then the two diagonals
    pub fn all() -> impl Iterator<Item = Line> {
        let indices = || (0..BOARD_SIZE).map(LineIndex);
        indices()
            .map(Line::Row)
            .chain(indices().map(Line::Col))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    pub fn positions(&self) -> [BoardPosition; BOARD_SIZE] {
        std::array::from_fn(|i| {
            let (row, col) = match *self {
                Line::Row(row) => (row.get(), i),
                Line::Col(col) => (i, col.get()),
                Line::Diagonal => (i, i),
                Line::AntiDiagonal => (i, BOARD_SIZE - 1 - i),
            };
            BoardPosition { row, col }
        })
    }
}

pub type Cell = Option<Piece>;

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Board([[Cell; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn get(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    pub fn piece_at(&self, pos: BoardPosition) -> Option<&Piece> {
        self.0[pos.row][pos.col].as_ref()
    }

    pub fn is_occupied(&self, pos: BoardPosition) -> bool {
        self.piece_at(pos).is_some()
    }

    pub fn line(&self, line: Line) -> [Cell; BOARD_SIZE] {
        line.positions().map(|pos| self.0[pos.row][pos.col])
    }

    pub fn count_pieces(&self) -> usize {
        self.0.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.0.iter().flatten().filter_map(|cell| cell.as_ref())
    }

    // Only the game state places pieces, and only on empty cells
    pub(crate) fn set_piece(&mut self, pos: BoardPosition, piece: Piece) {
        debug_assert!(!self.is_occupied(pos));
        self.0[pos.row][pos.col] = Some(piece);
    }
}
