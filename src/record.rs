use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

use crate::types::*;

/// One committed move, as kept in the game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based half-move sequence number
    pub ply: usize,
    /// Full-move number, as printed before White's move
    pub move_number: usize,
    pub color: Color,
    pub piece_type: PieceType,
    pub from: Position,
    pub to: Position,
    pub captured: Option<PieceType>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_castle_kingside: bool,
    pub is_castle_queenside: bool,
    pub is_en_passant: bool,
    pub promoted_to: Option<PieceType>,
    /// Standard algebraic notation, with `+`/`#` suffix
    pub notation: String,
}

impl MoveRecord {
    pub fn new(
        ply: usize,
        move_number: usize,
        mv: &Move,
        is_check: bool,
        is_checkmate: bool,
        notation: String,
    ) -> Self {
        Self {
            ply,
            move_number,
            color: mv.piece.color,
            piece_type: mv.piece.piece_type,
            from: mv.from,
            to: mv.to,
            captured: mv.captured.map(|p| p.piece_type),
            is_check,
            is_checkmate,
            is_castle_kingside: mv.move_flag == MoveFlag::CastleKingside,
            is_castle_queenside: mv.move_flag == MoveFlag::CastleQueenside,
            is_en_passant: mv.move_flag == MoveFlag::EnPassantCapture,
            promoted_to: match mv.move_flag {
                MoveFlag::Promotion(piece_type) => Some(piece_type),
                _ => None,
            },
            notation,
        }
    }

    /// Coordinate form, `e2e4` or `e7e8q`
    pub fn to_coordinates(&self) -> String {
        let promotion = self
            .promoted_to
            .map(|p| p.to_char().to_ascii_lowercase().to_string())
            .unwrap_or_default();
        format!("{}{}{}", self.from, self.to, promotion)
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

/// Pieces taken by each side, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedPieces {
    by_white: Vec<PieceType>,
    by_black: Vec<PieceType>,
}

impl CapturedPieces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pieces `color` has captured from the opponent
    pub fn captured_by(&self, color: Color) -> &[PieceType] {
        match color {
            Color::White => &self.by_white,
            Color::Black => &self.by_black,
        }
    }

    pub(crate) fn add_capture(&mut self, by: Color, piece_type: PieceType) {
        match by {
            Color::White => self.by_white.push(piece_type),
            Color::Black => self.by_black.push(piece_type),
        }
    }

    pub fn total(&self, color: Color) -> usize {
        self.captured_by(color).len()
    }

    pub fn count_by_type(&self, color: Color) -> HashMap<PieceType, usize> {
        self.captured_by(color).iter().copied().counts()
    }

    /// Sum of the material values `color` has captured
    pub fn material(&self, color: Color) -> i32 {
        self.captured_by(color)
            .iter()
            .map(|p| p.material_value())
            .sum()
    }

    /// Positive when White has captured more material than Black
    pub fn material_advantage(&self) -> i32 {
        self.material(Color::White) - self.material(Color::Black)
    }

    /// Captured pieces of one side, most valuable first, as SAN letters
    pub fn summary(&self, color: Color) -> String {
        self.captured_by(color)
            .iter()
            .sorted_by(|a, b| b.cmp(a))
            .map(|p| p.to_char())
            .join(" ")
    }
}
