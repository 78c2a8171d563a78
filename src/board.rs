use std::fmt;

use itertools::Itertools;

use crate::attacks;
use crate::error::{FenError, InvariantViolation};
use crate::types::*;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 8x8 mailbox, indexed `[rank][file]`.
///
/// The board is `Copy`: simulating a move is a plain array copy followed by a
/// mutation of the copy, the live board is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

/// Everything a FEN string describes that the rules engine uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenSetup {
    pub board: Board,
    pub active_color: Color,
    pub en_passant_target: Option<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// Standard starting position
    pub fn new() -> Board {
        let mut board = Board::empty();
        for file in 0..8 {
            for color in [Color::White, Color::Black] {
                board.squares[color.back_rank() as usize][file] =
                    Some(Piece::new(color, BACK_RANK[file]));
                board.squares[color.pawn_starting_rank() as usize][file] =
                    Some(Piece::new(color, PieceType::Pawn));
            }
        }
        board
    }

    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Parses the placement, active color, castling and en passant fields of a FEN string.
    ///
    /// Kings and rooks only keep `has_moved == false` when the castling field grants the
    /// matching right and they stand on their home squares. Move clocks are ignored.
    pub fn from_fen(fen_string: &str) -> Result<FenSetup, FenError> {
        let parts: Vec<&str> = fen_string.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let mut board = Board::empty();
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement);
        }
        for (i, rank_data) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for piece_char in rank_data.chars() {
                if let Some(skip) = piece_char.to_digit(10) {
                    file += skip as usize;
                } else {
                    let mut piece =
                        Piece::from_fen_char(piece_char).ok_or(FenError::InvalidPiece(piece_char))?;
                    if file >= 8 {
                        return Err(FenError::BadPlacement);
                    }
                    piece.has_moved =
                        matches!(piece.piece_type, PieceType::King | PieceType::Rook);
                    board.squares[rank][file] = Some(piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadPlacement);
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces(color)
                .filter(|(_, p)| p.piece_type == PieceType::King)
                .count();
            if kings != 1 {
                return Err(FenError::KingCount);
            }
        }

        let mut color_chars = parts[1].chars();
        let active_color =
            match (color_chars.next().and_then(Color::from_char), color_chars.next()) {
                (Some(color), None) => color,
                _ => return Err(FenError::InvalidColor(parts[1].to_string())),
            };

        // the side that just moved cannot have left its king en prise
        let waiting = active_color.other_color();
        if attacks::is_in_check(&board, waiting).unwrap_or(false) {
            return Err(FenError::OpponentInCheck(waiting));
        }

        for right in parts[2].chars() {
            let (color, rook_file) = match right {
                'K' => (Color::White, 7),
                'Q' => (Color::White, 0),
                'k' => (Color::Black, 7),
                'q' => (Color::Black, 0),
                _ => continue,
            };
            let rank = color.back_rank() as usize;
            let is_home = |file: usize, piece_type: PieceType| {
                matches!(
                    board.squares[rank][file],
                    Some(p) if p.color == color && p.piece_type == piece_type
                )
            };
            if is_home(4, PieceType::King) && is_home(rook_file, PieceType::Rook) {
                for file in [4, rook_file] {
                    if let Some(piece) = board.squares[rank][file].as_mut() {
                        piece.has_moved = false;
                    }
                }
            }
        }

        let en_passant_target = match parts[3] {
            "-" => None,
            target => Some(Position::from_algebraic(target)?),
        };

        Ok(FenSetup {
            board,
            active_color,
            en_passant_target,
        })
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.rank() as usize][pos.file() as usize]
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Places `piece` (or clears the square for `None`), returning what was there before
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(
            &mut self.squares[pos.rank() as usize][pos.file() as usize],
            piece,
        )
    }

    /// Moves the piece on `from` to `to`, marks it as moved and returns whatever stood on `to`.
    pub fn move_piece(
        &mut self,
        from: Position,
        to: Position,
    ) -> Result<Option<Piece>, InvariantViolation> {
        let mut piece = self
            .set_piece(from, None)
            .ok_or(InvariantViolation::EmptySquare(from))?;
        piece.has_moved = true;
        Ok(self.set_piece(to, Some(piece)))
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(pos, _)| pos)
    }

    /// All pieces of one color with their squares, a1 first
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| {
            self.piece_at(pos)
                .filter(|p| p.color == color)
                .map(|p| (pos, p))
        })
    }

    /// Piece placement field of a FEN string, rank 8 first
    pub fn placement_fen(&self) -> String {
        self.squares
            .iter()
            .rev()
            .map(|rank| {
                let mut field = String::new();
                let mut empty = 0;
                for square in rank {
                    match square {
                        Some(piece) => {
                            if empty > 0 {
                                field.push_str(&empty.to_string());
                                empty = 0;
                            }
                            field.push(piece.to_fen_char());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    field.push_str(&empty.to_string());
                }
                field
            })
            .join("/")
    }

    /// Text diagram, rank 8 on top
    pub fn draw_board(&self) -> String {
        (0..8u8)
            .rev()
            .map(|rank| {
                let row = (0..8u8)
                    .map(|file| {
                        Position::new(file, rank)
                            .ok()
                            .and_then(|pos| self.piece_at(pos))
                            .map_or(".", |p| p.to_symbol())
                    })
                    .join(" ");
                format!("{} {}", rank + 1, row)
            })
            .chain(std::iter::once("  a b c d e f g h".to_string()))
            .join("\n")
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.draw_board())
    }
}
