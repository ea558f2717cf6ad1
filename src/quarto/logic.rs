use crate::quarto::board::{Board, BoardPosition, Cell, Line, BOARD_SIZE};
use crate::quarto::piece::Attribute;
use crate::quarto::turn::Placement;

// A line wins when all four cells hold pieces and the pieces agree on at
// least one attribute, either all having it or all lacking it.
pub fn line_is_winning(line: &[Cell; BOARD_SIZE]) -> bool {
    let [Some(a), Some(b), Some(c), Some(d)] = line else {
        return false;
    };

    Attribute::ALL.iter().any(|&attribute| {
        let first = a.attribute(attribute);
        [b, c, d].iter().all(|p| p.attribute(attribute) == first)
    })
}

// The first winning line on the board, checking rows, then columns, then
// the two main diagonals. 2x2 squares never count.
pub fn winning_line(board: &Board) -> Option<Line> {
    Line::all().find(|&line| line_is_winning(&board.line(line)))
}

pub fn board_has_win(board: &Board) -> bool {
    winning_line(board).is_some()
}

pub fn board_is_full(board: &Board) -> bool {
    BoardPosition::all().all(|pos| board.is_occupied(pos))
}

// A win is looked for before a full board
pub fn placement_result(board: &Board) -> Placement {
    match winning_line(board) {
        Some(line) => Placement::Line(line),
        None if board_is_full(board) => Placement::Full,
        None => Placement::Open,
    }
}
