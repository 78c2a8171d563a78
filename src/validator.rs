//! Full legality: pseudo-legal movement plus king safety, castling, en passant and promotion.
//!
//! Every candidate is played on a scratch copy of the board and rejected if the mover's
//! own king ends up attacked. The live board is never written here.

use crate::attacks::{is_attacked, is_in_check};
use crate::board::{Board, FenSetup};
use crate::error::ValidationError;
use crate::movegen::{pawn_attack_squares, pseudo_legal_moves, reaches_on_empty_board};
use crate::types::*;

/// What happens when a pawn reaches the last rank without a promotion piece being named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionPolicy {
    /// Promote to a queen
    #[default]
    AutoQueen,
    /// Refuse the move with [`ValidationError::PromotionChoiceRequired`]
    RequireChoice,
}

/// Game state the board alone does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub side_to_move: Color,
    pub last_move: Option<LastMove>,
    pub promotion_policy: PromotionPolicy,
}

impl ValidationContext {
    pub fn new(side_to_move: Color) -> Self {
        Self {
            side_to_move,
            last_move: None,
            promotion_policy: PromotionPolicy::default(),
        }
    }

    /// Context for a position read from FEN. The en passant target square stands in
    /// for the double step that produced it.
    pub fn from_fen_setup(setup: &FenSetup, promotion_policy: PromotionPolicy) -> Self {
        let last_move = setup.en_passant_target.and_then(|target| {
            let mover = setup.active_color.other_color();
            let forward = mover.pawn_direction();
            Some(LastMove {
                piece_type: PieceType::Pawn,
                color: mover,
                from: target.offset(0, -forward)?,
                to: target.offset(0, forward)?,
            })
        });
        Self {
            side_to_move: setup.active_color,
            last_move,
            promotion_policy,
        }
    }

    /// Context for the position reached after `mv` was played in this one
    pub fn after(&self, mv: &Move) -> Self {
        Self {
            side_to_move: self.side_to_move.other_color(),
            last_move: Some(LastMove::from(mv)),
            promotion_policy: self.promotion_policy,
        }
    }
}

/// Checks a move request and returns the validated move, or the first rule it breaks.
pub fn check_move(
    board: &Board,
    ctx: &ValidationContext,
    request: MoveRequest,
) -> Result<Move, ValidationError> {
    let MoveRequest {
        from,
        to,
        promotion,
    } = request;

    let piece = board
        .piece_at(from)
        .ok_or(ValidationError::NoPieceAtStart)?;
    if piece.color != ctx.side_to_move {
        return Err(ValidationError::WrongTurn);
    }
    if from == to {
        return Err(ValidationError::IllegalDestination);
    }
    let target = board.piece_at(to);
    if target.is_some_and(|t| t.color == piece.color) {
        return Err(ValidationError::CapturesOwnPiece);
    }

    let mv = if let Some(move_flag) = castling_flag(piece, from, to) {
        castling_move(board, piece, from, move_flag)?
    } else if target.is_none() && is_pawn_diagonal_step(piece, from, to) {
        en_passant_move(board, ctx, piece, from, to)?
    } else {
        regular_move(board, ctx, piece, from, to, target, promotion)?
    };

    if leaves_king_in_check(board, &mv) {
        return Err(ValidationError::LeavesKingInCheck);
    }
    Ok(mv)
}

/// King on its home square moving two files along the back rank
fn castling_flag(piece: Piece, from: Position, to: Position) -> Option<MoveFlag> {
    if piece.piece_type != PieceType::King
        || from.file() != 4
        || from.rank() != piece.color.back_rank()
        || to.rank() != from.rank()
    {
        return None;
    }
    match to.file() {
        6 => Some(MoveFlag::CastleKingside),
        2 => Some(MoveFlag::CastleQueenside),
        _ => None,
    }
}

fn castling_move(
    board: &Board,
    piece: Piece,
    from: Position,
    move_flag: MoveFlag,
) -> Result<Move, ValidationError> {
    let mv = Move {
        piece,
        from,
        to: from,
        captured: None,
        move_flag,
    };
    let (rook_from, _) = mv
        .castling_rook()
        .ok_or(ValidationError::CastlingPreconditionFailed)?;
    if !can_castle(board, from, rook_from) {
        return Err(ValidationError::CastlingPreconditionFailed);
    }
    let step = if move_flag == MoveFlag::CastleKingside { 2 } else { -2 };
    let to = from
        .offset(step, 0)
        .ok_or(ValidationError::CastlingPreconditionFailed)?;
    Ok(Move { to, ..mv })
}

/// Can the king on `king_sq` castle with the rook on `rook_sq`?
///
/// Both pieces unmoved, every square between them empty, and neither the king's
/// square nor the two squares it crosses attacked.
pub fn can_castle(board: &Board, king_sq: Position, rook_sq: Position) -> bool {
    let (Some(king), Some(rook)) = (board.piece_at(king_sq), board.piece_at(rook_sq)) else {
        return false;
    };
    if king.piece_type != PieceType::King
        || rook.piece_type != PieceType::Rook
        || king.color != rook.color
        || king.has_moved
        || rook.has_moved
        || king_sq.rank() != rook_sq.rank()
    {
        return false;
    }

    let step: i8 = if rook_sq.file() > king_sq.file() { 1 } else { -1 };
    let between_empty = std::iter::successors(king_sq.offset(step, 0), |sq| sq.offset(step, 0))
        .take_while(|sq| *sq != rook_sq)
        .all(|sq| board.is_empty_at(sq));
    if !between_empty {
        return false;
    }

    let enemy = king.color.other_color();
    [Some(king_sq), king_sq.offset(step, 0), king_sq.offset(2 * step, 0)]
        .into_iter()
        .all(|sq| sq.is_some_and(|sq| !is_attacked(board, sq, enemy)))
}

fn is_pawn_diagonal_step(piece: Piece, from: Position, to: Position) -> bool {
    piece.piece_type == PieceType::Pawn && pawn_attack_squares(from, piece.color).any(|sq| sq == to)
}

fn en_passant_move(
    board: &Board,
    ctx: &ValidationContext,
    piece: Piece,
    from: Position,
    to: Position,
) -> Result<Move, ValidationError> {
    let passed_square = Position::new(to.file(), from.rank())?;
    let passed_pawn = board
        .piece_at(passed_square)
        .filter(|p| p.piece_type == PieceType::Pawn && p.color != piece.color);
    let Some(passed_pawn) = passed_pawn.filter(|_| from.rank() == piece.color.en_passant_rank())
    else {
        return Err(ValidationError::IllegalDestination);
    };
    if !is_en_passant_legal(board, from, to, ctx.last_move.as_ref()) {
        return Err(ValidationError::EnPassantWindowExpired);
    }
    Ok(Move {
        piece,
        from,
        to,
        captured: Some(passed_pawn),
        move_flag: MoveFlag::EnPassantCapture,
    })
}

/// Is the pawn on `from` allowed to capture en passant by moving to `to`?
///
/// Only right after the enemy pawn beside it made its double step, which must be
/// the last move played.
pub fn is_en_passant_legal(
    board: &Board,
    from: Position,
    to: Position,
    last_move: Option<&LastMove>,
) -> bool {
    let Some(pawn) = board
        .piece_at(from)
        .filter(|p| p.piece_type == PieceType::Pawn)
    else {
        return false;
    };
    let Some(last_move) = last_move else {
        return false;
    };
    from.rank() == pawn.color.en_passant_rank()
        && is_pawn_diagonal_step(pawn, from, to)
        && board.is_empty_at(to)
        && last_move.is_pawn_double_step()
        && last_move.color != pawn.color
        && last_move.to.rank() == from.rank()
        && last_move.to.file() == to.file()
        && board
            .piece_at(last_move.to)
            .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != pawn.color)
}

fn is_promotion(piece: Piece, to: Position) -> bool {
    piece.piece_type == PieceType::Pawn && to.rank() == piece.color.promotion_rank()
}

fn regular_move(
    board: &Board,
    ctx: &ValidationContext,
    piece: Piece,
    from: Position,
    to: Position,
    captured: Option<Piece>,
    promotion: Option<PieceType>,
) -> Result<Move, ValidationError> {
    if !pseudo_legal_moves(board, from).contains(&to) {
        return Err(if reaches_on_empty_board(piece, from, to) {
            ValidationError::BlockedPath
        } else {
            ValidationError::IllegalDestination
        });
    }

    let move_flag = if is_promotion(piece, to) {
        let promote_to = match (promotion, ctx.promotion_policy) {
            (Some(choice), _) if choice.can_promote_to() => choice,
            (Some(_), _) => return Err(ValidationError::InvalidPromotionChoice),
            (None, PromotionPolicy::AutoQueen) => PieceType::Queen,
            (None, PromotionPolicy::RequireChoice) => {
                return Err(ValidationError::PromotionChoiceRequired)
            }
        };
        MoveFlag::Promotion(promote_to)
    } else if piece.piece_type == PieceType::Pawn && from.rank().abs_diff(to.rank()) == 2 {
        MoveFlag::DoublePawnPush
    } else {
        MoveFlag::Regular
    };

    Ok(Move {
        piece,
        from,
        to,
        captured,
        move_flag,
    })
}

fn leaves_king_in_check(board: &Board, mv: &Move) -> bool {
    let mut scratch = *board;
    match mv
        .apply(&mut scratch)
        .and_then(|_| is_in_check(&scratch, mv.piece.color))
    {
        Ok(in_check) => in_check,
        Err(violation) => {
            violation.report();
            true
        }
    }
}

/// Squares worth asking the validator about: pseudo-legal targets plus the castling
/// and en passant squares the piece rules never produce.
fn candidate_destinations(board: &Board, from: Position, piece: Piece) -> Vec<Position> {
    let mut candidates = pseudo_legal_moves(board, from);
    match piece.piece_type {
        PieceType::King => {
            candidates.extend([-2, 2].into_iter().filter_map(|df| from.offset(df, 0)))
        }
        PieceType::Pawn => candidates.extend(
            pawn_attack_squares(from, piece.color).filter(|sq| board.is_empty_at(*sq)),
        ),
        _ => {}
    }
    candidates
}

fn movable_piece(board: &Board, ctx: &ValidationContext, from: Position) -> Option<Piece> {
    board
        .piece_at(from)
        .filter(|p| p.color == ctx.side_to_move)
}

/// Legal destination squares for the piece on `from`.
///
/// Empty when the square is empty or holds a piece of the side not on move. A
/// promoting pawn move shows up once, whatever piece is chosen.
pub fn legal_moves(board: &Board, ctx: &ValidationContext, from: Position) -> Vec<Position> {
    let Some(piece) = movable_piece(board, ctx, from) else {
        return Vec::new();
    };
    candidate_destinations(board, from, piece)
        .into_iter()
        .filter(|&to| {
            let request = MoveRequest::new(from, to).with_promotion(PieceType::Queen);
            check_move(board, ctx, request).is_ok()
        })
        .collect()
}

/// Every legal move of the piece on `from`, one per promotion piece for promoting moves.
pub fn legal_moves_from(board: &Board, ctx: &ValidationContext, from: Position) -> Vec<Move> {
    let Some(piece) = movable_piece(board, ctx, from) else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    for to in candidate_destinations(board, from, piece) {
        let request = MoveRequest::new(from, to);
        if is_promotion(piece, to) {
            moves.extend(
                PIECES_CAN_PROMOTE_TO
                    .iter()
                    .filter_map(|p| check_move(board, ctx, request.with_promotion(*p)).ok()),
            );
        } else if let Ok(mv) = check_move(board, ctx, request) {
            moves.push(mv);
        }
    }
    moves
}

pub fn all_legal_moves(board: &Board, ctx: &ValidationContext) -> Vec<Move> {
    board
        .pieces(ctx.side_to_move)
        .flat_map(|(from, _)| legal_moves_from(board, ctx, from))
        .collect()
}

/// Stops at the first legal move found
pub fn has_any_legal_move(board: &Board, ctx: &ValidationContext) -> bool {
    board.pieces(ctx.side_to_move).any(|(from, piece)| {
        candidate_destinations(board, from, piece).into_iter().any(|to| {
            let request = MoveRequest::new(from, to).with_promotion(PieceType::Queen);
            check_move(board, ctx, request).is_ok()
        })
    })
}
