use crate::quarto::{
    Board, InputError, Line, Outcome, PhaseKind, Piece, PlayerNum, RawAction,
};
use serde::{Deserialize, Serialize};

// Everything a presentation layer needs to draw the game
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub board: Board,
    pub available: Vec<Piece>,
    pub selected: Option<Piece>,
    pub current_player: PlayerNum,
    pub phase: PhaseKind,
    pub winner: Option<Outcome>,
    pub winning_line: Option<Line>,
    pub message: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Query {
    State,
}

// A game action in its wire form, or a read-only query. Both keep their
// own JSON shape, e.g. {"PlaceAt":{"row":0,"col":2}} or "State".
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Request {
    Action(RawAction),
    Query(Query),
}

impl Request {
    // None for read-only requests
    pub fn into_action(self) -> Option<RawAction> {
        match self {
            Request::Action(action) => Some(action),
            Request::Query(Query::State) => None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub enum Response {
    State(Snapshot),
    Rejected {
        reason: &'static str,
        message: String,
    },
    Malformed {
        message: String,
    },
}

impl From<InputError> for Response {
    fn from(err: InputError) -> Self {
        Response::Rejected {
            reason: err.reason(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Response {
    fn from(err: serde_json::Error) -> Self {
        Response::Malformed {
            message: err.to_string(),
        }
    }
}
