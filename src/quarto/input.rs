use crate::quarto::board::{BoardPosition, BoardPositionError};
use crate::quarto::piece::PieceId;
use crate::quarto::turn::{ActionKind, PhaseKind};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Cannot {action} while {phase}")]
    WrongPhase {
        phase: PhaseKind,
        action: ActionKind,
    },
    #[error("Piece {0} is not available to choose")]
    InvalidPiece(u8),
    #[error("That square is already occupied. Choose an empty one.")]
    CellOccupied(BoardPosition),
    #[error("Invalid placement position: {0}")]
    InvalidPosition(BoardPositionError),
}

impl InputError {
    // Stable name sent to the presentation layer
    pub fn reason(&self) -> &'static str {
        match self {
            InputError::WrongPhase { .. } => "wrong-phase",
            InputError::InvalidPiece(_) => "invalid-piece",
            InputError::CellOccupied(_) => "cell-occupied",
            InputError::InvalidPosition(_) => "invalid-position",
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub enum RawAction {
    SelectPiece { piece: u8 },
    PlaceAt { row: usize, col: usize },
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValidAction {
    SelectPiece(PieceId),
    PlaceAt(BoardPosition),
    Reset,
}

impl ValidAction {
    // validates:
    // - piece id range
    // - board position
    // Whether the action fits the current phase is up to the game state.
    pub fn new(action: RawAction) -> Result<Self, InputError> {
        match action {
            RawAction::SelectPiece { piece } => PieceId::new(piece)
                .map(ValidAction::SelectPiece)
                .ok_or(InputError::InvalidPiece(piece)),
            RawAction::PlaceAt { row, col } => BoardPosition::new(row, col)
                .map(ValidAction::PlaceAt)
                .map_err(InputError::InvalidPosition),
            RawAction::Reset => Ok(ValidAction::Reset),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ValidAction::SelectPiece(_) => ActionKind::Select,
            ValidAction::PlaceAt(_) => ActionKind::Place,
            ValidAction::Reset => ActionKind::Reset,
        }
    }
}
