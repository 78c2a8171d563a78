use itertools::Itertools;
use log::{debug, info};

use crate::attacks;
use crate::board::*;
use crate::error::{FenError, InvariantViolation, MoveError};
use crate::notation::san;
use crate::record::{CapturedPieces, MoveRecord};
use crate::types::*;
use crate::validator::*;

/// Rules settings chosen when a game is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOptions {
    pub promotion_policy: PromotionPolicy,
}

/// A game in progress.
///
/// The board is only ever written by [`Game::commit_move`], and only once the move has
/// passed validation, so a rejected request leaves the game exactly as it was.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    last_move: Option<LastMove>,
    outcome: GameOutcome,
    history: Vec<MoveRecord>,
    captured: CapturedPieces,
    options: GameOptions,
    /// Full-move number of the next move
    fullmove: usize,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Standard starting position, White to move
    pub fn new() -> Self {
        Game::with_options(GameOptions::default())
    }

    pub fn with_options(options: GameOptions) -> Self {
        Self {
            board: Board::new(),
            side_to_move: Color::White,
            last_move: None,
            outcome: GameOutcome::Ongoing,
            history: Vec::new(),
            captured: CapturedPieces::new(),
            options,
            fullmove: 1,
        }
    }

    /// Starts from a FEN position. An en passant target makes the capture available
    /// on the first move.
    pub fn from_fen(fen: &str, options: GameOptions) -> Result<Self, FenError> {
        let setup = Board::from_fen(fen)?;
        let ctx = ValidationContext::from_fen_setup(&setup, options.promotion_policy);
        let fullmove = fen
            .split_whitespace()
            .nth(5)
            .and_then(|n| n.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);

        let mut game = Self {
            board: setup.board,
            side_to_move: ctx.side_to_move,
            last_move: ctx.last_move,
            outcome: GameOutcome::Ongoing,
            history: Vec::new(),
            captured: CapturedPieces::new(),
            options,
            fullmove,
        };
        game.outcome =
            compute_outcome(&game.board, &game.context()).map_err(|_| FenError::KingCount)?;
        Ok(game)
    }

    fn context(&self) -> ValidationContext {
        ValidationContext {
            side_to_move: self.side_to_move,
            last_move: self.last_move,
            promotion_policy: self.options.promotion_policy,
        }
    }

    /// Squares the piece on `from` may move to. Empty once the game is over, for an
    /// empty square, or for a piece of the side not on move.
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        if self.outcome.is_over() {
            return Vec::new();
        }
        legal_moves(&self.board, &self.context(), from)
    }

    /// Validates and plays a move, then records it and updates the outcome.
    pub fn commit_move(&mut self, request: MoveRequest) -> Result<MoveRecord, MoveError> {
        if self.outcome.is_over() {
            debug!("rejected {}{}: game is over", request.from, request.to);
            return Err(MoveError::GameOver);
        }

        let ctx = self.context();
        let mv = check_move(&self.board, &ctx, request).map_err(|e| {
            debug!("rejected {}{}: {}", request.from, request.to, e);
            e
        })?;

        let mut board = self.board;
        mv.apply(&mut board).map_err(InvariantViolation::report)?;
        let next_ctx = ctx.after(&mv);
        let outcome = compute_outcome(&board, &next_ctx).map_err(InvariantViolation::report)?;

        let is_checkmate = matches!(outcome, GameOutcome::Checkmate(_));
        let is_check = is_checkmate || matches!(outcome, GameOutcome::Check(_));
        let notation = san(&self.board, &ctx, &mv, is_check, is_checkmate);
        let record = MoveRecord::new(
            self.history.len() + 1,
            self.fullmove,
            &mv,
            is_check,
            is_checkmate,
            notation,
        );

        self.board = board;
        if let Some(captured) = mv.captured {
            self.captured
                .add_capture(mv.piece.color, captured.piece_type);
        }
        self.last_move = next_ctx.last_move;
        self.side_to_move = next_ctx.side_to_move;
        self.outcome = outcome;
        if mv.piece.color == Color::Black {
            self.fullmove += 1;
        }
        self.history.push(record.clone());

        debug!("{}: {}", record.notation, mv.to_human());
        match outcome {
            GameOutcome::Checkmate(mated) => info!(
                "checkmate after {}, {} wins",
                record.notation,
                mated.other_color()
            ),
            GameOutcome::Stalemate => info!("stalemate after {}", record.notation),
            _ => {}
        }
        Ok(record)
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn captured_pieces(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn options(&self) -> GameOptions {
        self.options
    }

    /// A missing king is reported and counts as check, as it does for the validator.
    pub fn is_in_check(&self, color: Color) -> bool {
        attacks::is_in_check(&self.board, color)
            .map_err(InvariantViolation::report)
            .unwrap_or(true)
    }

    /// History as numbered lines, `1. e4 e5`, or `1... e5` when Black moved first
    pub fn formatted_history(&self) -> Vec<String> {
        let by_number = self.history.iter().group_by(|r| r.move_number);
        let lines = by_number
            .into_iter()
            .map(|(number, records)| {
                let records: Vec<&MoveRecord> = records.collect();
                let prefix = match records.first().map(|r| r.color) {
                    Some(Color::Black) => format!("{number}..."),
                    _ => format!("{number}."),
                };
                format!("{} {}", prefix, records.iter().map(|r| &r.notation).join(" "))
            })
            .collect();
        lines
    }
}

/// Outcome of the position for the side to move in `ctx`
pub fn compute_outcome(
    board: &Board,
    ctx: &ValidationContext,
) -> Result<GameOutcome, InvariantViolation> {
    let side = ctx.side_to_move;
    let in_check = attacks::is_in_check(board, side)?;
    Ok(match (in_check, has_any_legal_move(board, ctx)) {
        (true, false) => GameOutcome::Checkmate(side),
        (false, false) => GameOutcome::Stalemate,
        (true, true) => GameOutcome::Check(side),
        (false, true) => GameOutcome::Ongoing,
    })
}
