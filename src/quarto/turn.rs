// Which action is legal in each phase, and where it leads.
//
// phase    | select            | place                        | reset
// Choosing | Placing, opponent | rejected                     | Choosing, starting
// Placing  | rejected          | open: Choosing, same         | Choosing, starting
//          |                   | line: GameOver, placer wins  |
//          |                   | full: GameOver, draw         |
// GameOver | rejected          | rejected                     | Choosing, starting
//
// A completed line is checked before a full board, so a placement that
// does both is a win for the placer.

use crate::quarto::board::Line;
use crate::quarto::input::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    Choosing,
    Placing,
    GameOver,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Choosing => write!(f, "a piece is being chosen"),
            PhaseKind::Placing => write!(f, "a piece is being placed"),
            PhaseKind::GameOver => write!(f, "the game is over"),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Select,
    Place,
    Reset,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Select => write!(f, "choose a piece"),
            ActionKind::Place => write!(f, "place a piece"),
            ActionKind::Reset => write!(f, "reset"),
        }
    }
}

// Who holds the current player pointer after a transition
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handoff {
    // The chooser hands the turn to the player who will place
    Opponent,
    // The placer goes on to choose for their opponent
    Same,
    // Back to the configured starting player
    Starting,
}

// What the board looks like once the selected piece is down
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Open,
    Line(Line),
    Full,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Select,
    Place(Placement),
    Reset,
}

impl Event {
    pub fn kind(&self) -> ActionKind {
        match self {
            Event::Select => ActionKind::Select,
            Event::Place(_) => ActionKind::Place,
            Event::Reset => ActionKind::Reset,
        }
    }
}

// How a finished game is recorded
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    PlacerWins,
    Draw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next_phase: PhaseKind,
    pub handoff: Handoff,
    pub verdict: Option<Verdict>,
}

// The legality half of the table, for callers that must reject an action
// before they know its result
pub fn permitted(phase: PhaseKind, action: ActionKind) -> Result<(), InputError> {
    use ActionKind::*;
    use PhaseKind::*;
    match (phase, action) {
        (_, Reset) | (Choosing, Select) | (Placing, Place) => Ok(()),
        (Choosing, Place) | (Placing, Select) | (GameOver, Select) | (GameOver, Place) => {
            Err(InputError::WrongPhase { phase, action })
        }
    }
}

pub fn transition(phase: PhaseKind, event: Event) -> Result<Transition, InputError> {
    use PhaseKind::*;
    permitted(phase, event.kind())?;
    let (next_phase, handoff, verdict) = match (phase, event) {
        (_, Event::Reset) => (Choosing, Handoff::Starting, None),
        (Choosing, Event::Select) => (Placing, Handoff::Opponent, None),
        (Placing, Event::Place(Placement::Open)) => (Choosing, Handoff::Same, None),
        (Placing, Event::Place(Placement::Line(_))) => {
            (GameOver, Handoff::Same, Some(Verdict::PlacerWins))
        }
        (Placing, Event::Place(Placement::Full)) => (GameOver, Handoff::Same, Some(Verdict::Draw)),
        (phase, event) => {
            return Err(InputError::WrongPhase {
                phase,
                action: event.kind(),
            })
        }
    };
    Ok(Transition {
        next_phase,
        handoff,
        verdict,
    })
}
