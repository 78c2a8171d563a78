pub mod attacks;
pub mod board;
pub mod error;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod record;
pub mod types;
pub mod validator;

use crate::error::{MoveError, PositionError};
use crate::game::Game;
use crate::record::{CapturedPieces, MoveRecord};
use crate::types::{GameOutcome, MoveRequest, Position};

/// A game from the standard starting position, White to move
pub fn new_game() -> Game {
    Game::new()
}

pub fn legal_destinations(game: &Game, from: Position) -> Vec<Position> {
    game.legal_destinations(from)
}

pub fn commit_move(game: &mut Game, request: MoveRequest) -> Result<MoveRecord, MoveError> {
    game.commit_move(request)
}

pub fn outcome(game: &Game) -> GameOutcome {
    game.outcome()
}

pub fn history(game: &Game) -> &[MoveRecord] {
    game.history()
}

pub fn captured_pieces(game: &Game) -> &CapturedPieces {
    game.captured_pieces()
}

pub fn square_to_algebraic(square: Position) -> String {
    square.to_algebraic()
}

pub fn algebraic_to_square(s: &str) -> Result<Position, PositionError> {
    Position::from_algebraic(s)
}
