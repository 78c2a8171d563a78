use thiserror::Error;

use crate::types::{Color, Position};

/// A square could not be built from the given coordinates or text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("square coordinates out of bounds: file {file}, rank {rank}")]
    OutOfBounds { file: u8, rank: u8 },
    #[error("invalid algebraic square `{0}`")]
    InvalidAlgebraic(String),
}

/// Why a move request was refused.
///
/// These are expected outcomes of user input, never fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("there is no piece on the start square")]
    NoPieceAtStart,
    #[error("the piece on the start square belongs to the side not on move")]
    WrongTurn,
    #[error("square is off the board")]
    OutOfBounds,
    #[error("move must be written as two squares and an optional promotion letter, e.g. e7e8q")]
    MalformedCoordinates,
    #[error("the piece cannot move to that square")]
    IllegalDestination,
    #[error("the path to the destination is blocked")]
    BlockedPath,
    #[error("the destination is occupied by a piece of the same side")]
    CapturesOwnPiece,
    #[error("the move would leave the king in check")]
    LeavesKingInCheck,
    #[error("castling is not allowed: pieces moved, path blocked, or king passes through check")]
    CastlingPreconditionFailed,
    #[error("en passant is only available immediately after the double step")]
    EnPassantWindowExpired,
    #[error("a promotion piece must be chosen")]
    PromotionChoiceRequired,
    #[error("pawns can only promote to a queen, rook, bishop or knight")]
    InvalidPromotionChoice,
}

impl From<PositionError> for ValidationError {
    fn from(_: PositionError) -> Self {
        ValidationError::OutOfBounds
    }
}

/// The board reached a state the rules never produce. Signals a defect, not bad input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("expected a piece on {0}")]
    EmptySquare(Position),
}

impl InvariantViolation {
    /// Logs the violation and trips a debug assertion. Release builds carry on with the
    /// returned value so the caller can refuse the operation.
    pub fn report(self) -> Self {
        log::error!("board invariant violated: {self}");
        debug_assert!(false, "board invariant violated: {self}");
        self
    }
}

/// Error returned by [`crate::game::Game::commit_move`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    Illegal(#[from] ValidationError),
    #[error("the game is over")]
    GameOver,
    #[error("board invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Errors while setting up a board from FEN.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have at least 4 space separated fields, got {0}")]
    MissingFields(usize),
    #[error("unexpected character `{0}` in piece placement")]
    InvalidPiece(char),
    #[error("piece placement does not describe 8 ranks of 8 files")]
    BadPlacement,
    #[error("active color must be `w` or `b`, got `{0}`")]
    InvalidColor(String),
    #[error("invalid en passant field: {0}")]
    InvalidEnPassant(#[from] PositionError),
    #[error("each side needs exactly one king")]
    KingCount,
    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}
