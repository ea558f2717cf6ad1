mod board;
mod game_state;
mod input;
mod logic;
mod piece;
mod player;
mod turn;

pub use board::{
    Board, BoardPosition, BoardPositionError, Cell, Coordinate, Line, LineIndex,
    BOARD_SIZE,
};
pub use game_state::{GameConfig, GameState};
pub use input::{InputError, RawAction, ValidAction};
pub use logic::{board_has_win, board_is_full, line_is_winning, placement_result, winning_line};
pub use piece::{generate_pieces, Attribute, Piece, PieceId, PieceRng, ShuffleRng, PIECE_COUNT};
pub use player::{Outcome, PlayerNum};
pub use turn::{
    permitted, transition, ActionKind, Event, Handoff, PhaseKind, Placement, Transition, Verdict,
};
