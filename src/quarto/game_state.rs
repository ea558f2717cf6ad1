use crate::messages::Snapshot;
use crate::quarto::board::{Board, BoardPosition, Line};
use crate::quarto::input::{InputError, ValidAction};
use crate::quarto::logic::placement_result;
use crate::quarto::piece::{generate_pieces, Piece, PieceId, PieceRng, ShuffleRng, PIECE_COUNT};
use crate::quarto::player::{Outcome, PlayerNum};
use crate::quarto::turn::{
    permitted, transition, ActionKind, Event, Handoff, PhaseKind, Placement, Verdict,
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub starting_player: PlayerNum,
}

// The selected piece lives inside the placing phase, so a piece is held
// exactly when a placement is pending.
#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Choosing,
    Placing(Piece),
    GameOver {
        outcome: Outcome,
        line: Option<Line>,
    },
}

#[derive(Debug)]
pub struct GameState<R: Debug = PieceRng> {
    config: GameConfig,
    pieces: [Piece; PIECE_COUNT],
    board: Board,
    available: Vec<Piece>,
    phase: Phase,
    current_player: PlayerNum,
    rng: R,
}

impl<R: ShuffleRng + Default + Debug> Default for GameState<R> {
    fn default() -> Self {
        GameState::new(GameConfig::default(), R::default())
    }
}

impl<R: ShuffleRng + Debug> GameState<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Self {
        let pieces = generate_pieces(&mut rng);
        GameState {
            config,
            pieces,
            board: Board::new(),
            available: pieces.to_vec(),
            phase: Phase::Choosing,
            current_player: config.starting_player,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // Every piece of the current set, wherever it is
    pub fn pieces(&self) -> &[Piece; PIECE_COUNT] {
        &self.pieces
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn available_pieces(&self) -> &[Piece] {
        &self.available
    }

    pub fn selected_piece(&self) -> Option<&Piece> {
        match &self.phase {
            Phase::Placing(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn current_player(&self) -> PlayerNum {
        self.current_player
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Choosing => PhaseKind::Choosing,
            Phase::Placing(_) => PhaseKind::Placing,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }

    pub fn winner(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn winning_line(&self) -> Option<Line> {
        match self.phase {
            Phase::GameOver { line, .. } => line,
            _ => None,
        }
    }

    pub fn status_message(&self) -> String {
        let player = self.current_player;
        match self.phase {
            Phase::Choosing => format!("{}, choose a piece for {}.", player, player.opponent()),
            Phase::Placing(_) => format!("{}, place the chosen piece.", player),
            Phase::GameOver {
                outcome: Outcome::Win(winner),
                ..
            } => format!("¡QUARTO! {} wins!", winner),
            Phase::GameOver {
                outcome: Outcome::Draw,
                ..
            } => "It's a draw! No more moves possible.".to_string(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            available: self.available.clone(),
            selected: self.selected_piece().copied(),
            current_player: self.current_player,
            phase: self.phase(),
            winner: self.winner(),
            winning_line: self.winning_line(),
            message: self.status_message(),
        }
    }

    pub fn apply(&mut self, action: ValidAction) -> Result<Snapshot, InputError> {
        match action {
            ValidAction::SelectPiece(id) => self.select_piece(id),
            ValidAction::PlaceAt(pos) => self.place_at(pos),
            ValidAction::Reset => Ok(self.reset()),
        }
    }

    // Takes a piece out of the available pool for the opponent to place
    pub fn select_piece(&mut self, id: PieceId) -> Result<Snapshot, InputError> {
        let next = transition(self.phase(), Event::Select)?;
        let idx = self
            .available
            .iter()
            .position(|p| p.id() == id)
            .ok_or(InputError::InvalidPiece(u8::from(id)))?;

        let piece = self.available.remove(idx);
        self.phase = Phase::Placing(piece);
        self.hand_off(next.handoff);
        debug_assert_eq!(self.phase(), next.next_phase);
        debug!(
            piece = %id,
            placer = %self.current_player,
            "piece selected"
        );
        Ok(self.snapshot())
    }

    // Puts the selected piece on the board. Where the game goes next depends
    // on the board the piece leaves behind.
    pub fn place_at(&mut self, pos: BoardPosition) -> Result<Snapshot, InputError> {
        permitted(self.phase(), ActionKind::Place)?;
        let Phase::Placing(piece) = self.phase else {
            return Err(InputError::WrongPhase {
                phase: self.phase(),
                action: ActionKind::Place,
            });
        };
        if self.board.is_occupied(pos) {
            return Err(InputError::CellOccupied(pos));
        }

        let mut board = self.board.clone();
        board.set_piece(pos, piece);
        let placement = placement_result(&board);
        let next = transition(self.phase(), Event::Place(placement))?;

        self.board = board;
        debug!(
            piece = %piece.id(),
            %pos,
            player = %self.current_player,
            "piece placed"
        );

        self.hand_off(next.handoff);
        self.phase = match next.verdict {
            None => Phase::Choosing,
            Some(verdict) => {
                let outcome = match verdict {
                    Verdict::PlacerWins => Outcome::Win(self.current_player),
                    Verdict::Draw => Outcome::Draw,
                };
                let line = match placement {
                    Placement::Line(line) => Some(line),
                    Placement::Open | Placement::Full => None,
                };
                info!(%outcome, ?line, "game over");
                Phase::GameOver { outcome, line }
            }
        };
        debug_assert_eq!(self.phase(), next.next_phase);
        Ok(self.snapshot())
    }

    // Starts over with a fresh set of pieces. Allowed in any phase.
    pub fn reset(&mut self) -> Snapshot {
        self.pieces = generate_pieces(&mut self.rng);
        self.board = Board::new();
        self.available = self.pieces.to_vec();
        self.phase = Phase::Choosing;
        self.hand_off(Handoff::Starting);
        info!(starting_player = %self.current_player, "game reset");
        self.snapshot()
    }

    fn hand_off(&mut self, handoff: Handoff) {
        self.current_player = match handoff {
            Handoff::Opponent => self.current_player.opponent(),
            Handoff::Same => self.current_player,
            Handoff::Starting => self.config.starting_player,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quarto::board::tests::board_pos;
    use crate::quarto::piece::tests::MockRng;
    use std::collections::HashSet;

    // Rotates the numbers one step further on every shuffle
    #[derive(Debug, Default)]
    struct RotateRng(usize);

    impl ShuffleRng for RotateRng {
        fn shuffle<T>(&mut self, items: &mut [T]) {
            self.0 += 1;
            items.rotate_left(self.0 % items.len());
        }
    }

    fn piece_id(id: u8) -> PieceId {
        PieceId::new(id).unwrap()
    }

    fn game_state() -> GameState<MockRng> {
        GameState::new(GameConfig::default(), MockRng)
    }

    // One full turn: the current player picks `id`, the opponent places it
    fn play<R: ShuffleRng + Debug>(
        game_state: &mut GameState<R>,
        id: u8,
        row: usize,
        col: usize,
    ) -> Snapshot {
        game_state.select_piece(piece_id(id)).unwrap();
        game_state.place_at(board_pos(row, col)).unwrap()
    }

    // placed ∪ available ∪ selected is the whole set, with no overlap
    fn assert_inventory<R: Debug + ShuffleRng>(game_state: &GameState<R>) {
        let mut seen = HashSet::new();
        let placed = game_state.board().pieces();
        let available = game_state.available_pieces().iter();
        let selected = game_state.selected_piece().into_iter();
        for piece in placed.chain(available).chain(selected) {
            assert!(seen.insert(piece.id()), "piece {} appears twice", piece.id());
        }
        assert_eq!(seen.len(), PIECE_COUNT);
        assert_eq!(
            game_state.selected_piece().is_some(),
            game_state.phase() == PhaseKind::Placing
        );
    }

    // Full board with no winning line
    const DRAW_LAYOUT: [[u8; 4]; 4] = [[0, 15, 3, 12], [6, 9, 5, 10], [13, 2, 14, 1], [11, 4, 8, 7]];

    // Only row 3 and the main diagonal win, both through (3, 3)
    const LAST_CELL_WIN_LAYOUT: [[u8; 4]; 4] =
        [[5, 14, 2, 1], [11, 0, 9, 6], [7, 12, 4, 3], [10, 15, 8, 13]];

    #[test]
    fn test_new_game() {
        let game_state = game_state();
        assert_eq!(game_state.phase(), PhaseKind::Choosing);
        assert_eq!(game_state.current_player(), PlayerNum::P1);
        assert_eq!(game_state.available_pieces().len(), PIECE_COUNT);
        assert_eq!(game_state.board().count_pieces(), 0);
        assert!(game_state.selected_piece().is_none());
        assert!(game_state.winner().is_none());
        assert_eq!(game_state.status_message(), "Player 1, choose a piece for Player 2.");
        assert_inventory(&game_state);

        let config = GameConfig {
            starting_player: PlayerNum::P2,
        };
        let game_state = GameState::new(config, MockRng);
        assert_eq!(game_state.current_player(), PlayerNum::P2);
    }

    #[test]
    fn test_select_piece() {
        let mut game_state = game_state();
        let snapshot = game_state.select_piece(piece_id(3)).unwrap();

        assert_eq!(snapshot.phase, PhaseKind::Placing);
        assert_eq!(snapshot.current_player, PlayerNum::P2);
        assert_eq!(snapshot.selected.map(|p| p.id()), Some(piece_id(3)));
        assert_eq!(snapshot.available.len(), PIECE_COUNT - 1);
        assert!(snapshot.available.iter().all(|p| p.id() != piece_id(3)));
        assert_eq!(snapshot.message, "Player 2, place the chosen piece.");
        assert_inventory(&game_state);
    }

    #[test]
    fn test_select_twice_is_wrong_phase() {
        let mut game_state = game_state();
        game_state.select_piece(piece_id(3)).unwrap();
        let before = game_state.snapshot();

        let err = game_state.select_piece(piece_id(4)).unwrap_err();
        assert_eq!(
            err,
            InputError::WrongPhase {
                phase: PhaseKind::Placing,
                action: ActionKind::Select,
            }
        );
        assert_eq!(err.reason(), "wrong-phase");
        assert_eq!(game_state.snapshot(), before);
    }

    #[test]
    fn test_select_unavailable_piece() {
        let mut game_state = game_state();
        play(&mut game_state, 3, 0, 0);
        let before = game_state.snapshot();

        let err = game_state.select_piece(piece_id(3)).unwrap_err();
        assert_eq!(err, InputError::InvalidPiece(3));
        assert_eq!(err.reason(), "invalid-piece");
        assert_eq!(game_state.snapshot(), before);
    }

    #[test]
    fn test_place_before_select_is_wrong_phase() {
        let mut game_state = game_state();
        let err = game_state.place_at(board_pos(0, 0)).unwrap_err();
        assert_eq!(
            err,
            InputError::WrongPhase {
                phase: PhaseKind::Choosing,
                action: ActionKind::Place,
            }
        );
        assert_eq!(game_state.board().count_pieces(), 0);
    }

    #[test]
    fn test_place_on_occupied_cell() {
        let mut game_state = game_state();
        play(&mut game_state, 0, 1, 1);
        game_state.select_piece(piece_id(5)).unwrap();
        let before = game_state.snapshot();

        let err = game_state.place_at(board_pos(1, 1)).unwrap_err();
        assert_eq!(err, InputError::CellOccupied(board_pos(1, 1)));
        assert_eq!(err.reason(), "cell-occupied");
        assert_eq!(game_state.snapshot(), before);
        assert_eq!(game_state.selected_piece().map(|p| p.id()), Some(piece_id(5)));

        // The same piece can still go somewhere empty
        let snapshot = game_state.place_at(board_pos(1, 2)).unwrap();
        assert_eq!(snapshot.phase, PhaseKind::Choosing);
    }

    #[test]
    fn test_turn_order() {
        let mut game_state = game_state();

        // P1 chooses, P2 places, then P2 chooses for P1
        game_state.select_piece(piece_id(0)).unwrap();
        assert_eq!(game_state.current_player(), PlayerNum::P2);
        game_state.place_at(board_pos(0, 0)).unwrap();
        assert_eq!(game_state.phase(), PhaseKind::Choosing);
        assert_eq!(game_state.current_player(), PlayerNum::P2);
        assert_eq!(game_state.status_message(), "Player 2, choose a piece for Player 1.");

        game_state.select_piece(piece_id(15)).unwrap();
        assert_eq!(game_state.current_player(), PlayerNum::P1);
        game_state.place_at(board_pos(0, 1)).unwrap();
        assert_eq!(game_state.current_player(), PlayerNum::P1);
        assert_inventory(&game_state);
    }

    #[test]
    fn test_win_on_row() {
        let mut game_state = game_state();
        // All tall, mixed on every other attribute
        play(&mut game_state, 8, 0, 0);
        play(&mut game_state, 15, 0, 1);
        play(&mut game_state, 10, 0, 2);
        assert!(game_state.winner().is_none());

        let snapshot = play(&mut game_state, 13, 0, 3);
        // Placements alternate P2, P1, P2, P1
        assert_eq!(snapshot.winner, Some(Outcome::Win(PlayerNum::P1)));
        assert_eq!(snapshot.phase, PhaseKind::GameOver);
        assert_eq!(snapshot.winning_line, Line::row(0));
        assert_eq!(snapshot.message, "¡QUARTO! Player 1 wins!");
        assert!(snapshot.selected.is_none());
        assert_inventory(&game_state);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut game_state = game_state();
        play(&mut game_state, 8, 0, 0);
        play(&mut game_state, 15, 1, 0);
        play(&mut game_state, 10, 2, 0);
        play(&mut game_state, 13, 3, 0);
        assert_eq!(game_state.phase(), PhaseKind::GameOver);
        let before = game_state.snapshot();

        let err = game_state.select_piece(piece_id(0)).unwrap_err();
        assert_eq!(
            err,
            InputError::WrongPhase {
                phase: PhaseKind::GameOver,
                action: ActionKind::Select,
            }
        );
        let err = game_state.place_at(board_pos(3, 3)).unwrap_err();
        assert_eq!(
            err,
            InputError::WrongPhase {
                phase: PhaseKind::GameOver,
                action: ActionKind::Place,
            }
        );
        assert_eq!(game_state.snapshot(), before);
    }

    #[test]
    fn test_draw() {
        let mut game_state = game_state();
        for (row, ids) in DRAW_LAYOUT.iter().enumerate() {
            for (col, &id) in ids.iter().enumerate() {
                assert_eq!(game_state.phase(), PhaseKind::Choosing);
                play(&mut game_state, id, row, col);
            }
        }
        assert_eq!(game_state.winner(), Some(Outcome::Draw));
        assert_eq!(game_state.phase(), PhaseKind::GameOver);
        // Filling the board is a draw, not a win for Player 1 who placed last
        assert_eq!(game_state.current_player(), PlayerNum::P1);
        assert!(game_state.winning_line().is_none());
        assert!(game_state.available_pieces().is_empty());
        assert_eq!(game_state.status_message(), "It's a draw! No more moves possible.");
        assert_inventory(&game_state);
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let mut game_state = game_state();
        let mut last = None;
        for (row, ids) in LAST_CELL_WIN_LAYOUT.iter().enumerate() {
            for (col, &id) in ids.iter().enumerate() {
                assert!(game_state.winner().is_none());
                last = Some(play(&mut game_state, id, row, col));
            }
        }
        let snapshot = last.unwrap();
        assert_eq!(snapshot.board.count_pieces(), PIECE_COUNT);
        // The 16th placement is made by Player 1
        assert_eq!(snapshot.winner, Some(Outcome::Win(PlayerNum::P1)));
        assert_eq!(snapshot.winning_line, Line::row(3));
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut game_state = GameState::new(GameConfig::default(), RotateRng::default());
        let first_numbers: Vec<u8> = game_state.pieces().iter().map(|p| p.number()).collect();
        play(&mut game_state, 8, 0, 0);
        play(&mut game_state, 15, 1, 1);
        play(&mut game_state, 10, 2, 2);
        play(&mut game_state, 13, 3, 3);
        assert_eq!(game_state.phase(), PhaseKind::GameOver);

        let snapshot = game_state.reset();
        assert_eq!(snapshot.phase, PhaseKind::Choosing);
        assert_eq!(snapshot.current_player, PlayerNum::P1);
        assert!(snapshot.winner.is_none());
        assert!(snapshot.winning_line.is_none());
        assert!(snapshot.selected.is_none());
        assert_eq!(snapshot.board, Board::new());
        assert_eq!(snapshot.available.len(), PIECE_COUNT);
        assert_inventory(&game_state);

        let second_numbers: Vec<u8> = game_state.pieces().iter().map(|p| p.number()).collect();
        assert_ne!(first_numbers, second_numbers);
        let mut sorted = second_numbers.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_reset_mid_turn() {
        let config = GameConfig {
            starting_player: PlayerNum::P2,
        };
        let mut game_state = GameState::new(config, MockRng);
        play(&mut game_state, 0, 0, 0);
        game_state.select_piece(piece_id(1)).unwrap();

        let snapshot = game_state.apply(ValidAction::Reset).unwrap();
        assert_eq!(snapshot.phase, PhaseKind::Choosing);
        assert_eq!(snapshot.current_player, PlayerNum::P2);
        assert_inventory(&game_state);
    }

    #[test]
    fn test_apply_dispatches() {
        let mut game_state = game_state();
        let snapshot = game_state
            .apply(ValidAction::SelectPiece(piece_id(2)))
            .unwrap();
        assert_eq!(snapshot.phase, PhaseKind::Placing);
        let snapshot = game_state
            .apply(ValidAction::PlaceAt(board_pos(2, 3)))
            .unwrap();
        assert_eq!(
            snapshot.board.piece_at(board_pos(2, 3)).map(|p| p.id()),
            Some(piece_id(2))
        );
    }
}
