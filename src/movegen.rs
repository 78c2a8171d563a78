//! Per-piece movement rules.
//!
//! Everything here is pseudo-legal: moves follow the piece's pattern and the
//! occupancy rules, but nothing checks whether the mover's own king is left
//! attacked. Castling and en passant are handled by the validator.

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::types::*;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// (file, rank) steps. The first four are rook directions, the last four bishop directions.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: std::ops::Range<usize> = 0..4;
const BISHOP_DIRECTIONS: std::ops::Range<usize> = 4..8;
const QUEEN_DIRECTIONS: std::ops::Range<usize> = 0..8;

/// Queen in the middle of an empty board
const MAX_PIECE_MOVES: usize = 27;

/// Target squares for every origin square, computed once
pub struct MoveTables {
    pub knight: [Vec<Position>; 64],
    pub king: [Vec<Position>; 64],
    /// `rays[square][direction]`, ordered outward from the square
    pub rays: [[Vec<Position>; 8]; 64],
}

impl MoveTables {
    fn new() -> Self {
        let squares: Vec<Position> = Position::all().collect();
        let steps = |from: Position, offsets: &[(i8, i8)]| -> Vec<Position> {
            offsets
                .iter()
                .filter_map(|(df, dr)| from.offset(*df, *dr))
                .collect()
        };
        Self {
            knight: std::array::from_fn(|i| steps(squares[i], &KNIGHT_OFFSETS)),
            king: std::array::from_fn(|i| steps(squares[i], &DIRECTIONS)),
            rays: std::array::from_fn(|i| {
                let from = squares[i];
                std::array::from_fn(|dir| {
                    let (df, dr) = DIRECTIONS[dir];
                    std::iter::successors(from.offset(df, dr), |pos| pos.offset(df, dr)).collect()
                })
            }),
        }
    }
}

pub static MOVE_TABLES: Lazy<MoveTables> = Lazy::new(MoveTables::new);

fn directions_for(piece_type: PieceType) -> std::ops::Range<usize> {
    match piece_type {
        PieceType::Rook => ROOK_DIRECTIONS,
        PieceType::Bishop => BISHOP_DIRECTIONS,
        _ => QUEEN_DIRECTIONS,
    }
}

/// Pseudo-legal destinations of the piece on `from`. Empty if the square is empty.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Position> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let mut moves = Vec::with_capacity(MAX_PIECE_MOVES);
    match piece.piece_type {
        PieceType::Pawn => {
            pawn_pushes(board, from, piece.color, &mut moves);
            pawn_captures(board, from, piece.color, &mut moves);
        }
        PieceType::Knight => {
            step_moves(board, piece.color, &MOVE_TABLES.knight[from.index()], &mut moves)
        }
        PieceType::King => {
            step_moves(board, piece.color, &MOVE_TABLES.king[from.index()], &mut moves)
        }
        PieceType::Bishop | PieceType::Rook | PieceType::Queen => {
            for dir in directions_for(piece.piece_type) {
                slide(board, piece.color, &MOVE_TABLES.rays[from.index()][dir], &mut moves);
            }
        }
    }
    moves
}

/// Squares a pawn on `from` attacks, whatever stands on them
pub fn pawn_attack_squares(from: Position, color: Color) -> impl Iterator<Item = Position> {
    let forward = color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(move |side| from.offset(side, forward))
}

/// Does the piece on `from` attack `target`?
///
/// Pawns only attack diagonally. Sliders attack up to and including the first
/// occupied square on each ray.
pub fn attacks_square(board: &Board, from: Position, target: Position) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    match piece.piece_type {
        PieceType::Pawn => pawn_attack_squares(from, piece.color).any(|sq| sq == target),
        PieceType::Knight => MOVE_TABLES.knight[from.index()].contains(&target),
        PieceType::King => MOVE_TABLES.king[from.index()].contains(&target),
        PieceType::Bishop | PieceType::Rook | PieceType::Queen => directions_for(piece.piece_type)
            .map(|dir| &MOVE_TABLES.rays[from.index()][dir])
            .any(|ray| {
                for &sq in ray {
                    if sq == target {
                        return true;
                    }
                    if !board.is_empty_at(sq) {
                        return false;
                    }
                }
                false
            }),
    }
}

/// Would `piece` reach `to` from `from` if the board were empty?
///
/// Used to tell a blocked path apart from a destination the piece can never reach.
pub fn reaches_on_empty_board(piece: Piece, from: Position, to: Position) -> bool {
    match piece.piece_type {
        PieceType::Pawn => {
            let forward = piece.color.pawn_direction();
            from.offset(0, forward) == Some(to)
                || (from.rank() == piece.color.pawn_starting_rank()
                    && from.offset(0, 2 * forward) == Some(to))
        }
        PieceType::Knight => MOVE_TABLES.knight[from.index()].contains(&to),
        PieceType::King => MOVE_TABLES.king[from.index()].contains(&to),
        PieceType::Bishop | PieceType::Rook | PieceType::Queen => directions_for(piece.piece_type)
            .any(|dir| MOVE_TABLES.rays[from.index()][dir].contains(&to)),
    }
}

fn pawn_pushes(board: &Board, from: Position, color: Color, moves: &mut Vec<Position>) {
    let forward = color.pawn_direction();
    let Some(one) = from.offset(0, forward).filter(|sq| board.is_empty_at(*sq)) else {
        return;
    };
    moves.push(one);
    if from.rank() == color.pawn_starting_rank() {
        if let Some(two) = one.offset(0, forward).filter(|sq| board.is_empty_at(*sq)) {
            moves.push(two);
        }
    }
}

fn pawn_captures(board: &Board, from: Position, color: Color, moves: &mut Vec<Position>) {
    moves.extend(pawn_attack_squares(from, color).filter(|sq| {
        board
            .piece_at(*sq)
            .is_some_and(|target| target.color != color)
    }));
}

fn step_moves(board: &Board, color: Color, targets: &[Position], moves: &mut Vec<Position>) {
    moves.extend(targets.iter().copied().filter(|sq| {
        board
            .piece_at(*sq)
            .map_or(true, |target| target.color != color)
    }));
}

fn slide(board: &Board, color: Color, ray: &[Position], moves: &mut Vec<Position>) {
    for &sq in ray {
        match board.piece_at(sq) {
            None => moves.push(sq),
            Some(target) => {
                if target.color != color {
                    moves.push(sq);
                }
                break;
            }
        }
    }
}
