use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::error::{InvariantViolation, PositionError, ValidationError};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Rank index the side's pieces start on
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Starting rank for pawns of this color
    pub fn pawn_starting_rank(&self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn of this color has to stand on to capture en passant
    pub fn en_passant_rank(&self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }

    pub fn promotion_rank(&self) -> u8 {
        self.other_color().back_rank()
    }

    /// Direction of pawn movement, in ranks
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Parses a piece letter in either case (`n`, `N`, ...).
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn can_promote_to(&self) -> bool {
        PIECES_CAN_PROMOTE_TO.contains(self)
    }

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Uppercase letter used in algebraic notation
    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Standard material value, the king counts for nothing
    pub fn material_value(&self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight => 3,
            Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A square on the board. Always in bounds: file and rank are both 0..8, rank 0 is
/// White's back rank and file 0 is the a-file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Position {
    rank: u8,
    file: u8,
}

impl Position {
    pub fn new(file: u8, rank: u8) -> Result<Position, PositionError> {
        if file < 8 && rank < 8 {
            Ok(Position { rank, file })
        } else {
            Err(PositionError::OutOfBounds { file, rank })
        }
    }

    pub fn from_algebraic(s: &str) -> Result<Position, PositionError> {
        let invalid = || PositionError::InvalidAlgebraic(s.to_string());
        let mut char_iter = s.chars();
        let (Some(file_char), Some(rank_char), None) =
            (char_iter.next(), char_iter.next(), char_iter.next())
        else {
            return Err(invalid());
        };

        let file_char = file_char.to_ascii_lowercase();
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return Err(invalid());
        }

        Ok(Position {
            rank: rank_char as u8 - b'1',
            file: file_char as u8 - b'a',
        })
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'1' + self.rank) as char
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// The square shifted by the given number of files and ranks, if it stays on the board
    pub fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Position> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Position {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// The square as seen on a board rotated by 180 degrees. Applying it twice is the identity.
    pub fn flipped(&self) -> Position {
        Position {
            rank: 7 - self.rank,
            file: 7 - self.file,
        }
    }

    /// All 64 squares, a1, b1, ... h8
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Position { rank, file }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    /// Only consulted for kings and rooks (castling rights)
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece {
            color,
            piece_type,
            has_moved: false,
        }
    }

    /// FEN letter: uppercase for white, lowercase for black
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, piece_type))
    }

    pub fn to_fen_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &'static str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::Pawn) => "♙",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::King) => "♔",
            (Color::Black, PieceType::Pawn) => "♟︎",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::King) => "♚",
        }
    }
}

/// A move as asked for by the caller, not yet validated.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    /// Piece to promote to when a pawn reaches the last rank
    pub promotion: Option<PieceType>,
}

impl MoveRequest {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(self, piece_type: PieceType) -> Self {
        Self {
            promotion: Some(piece_type),
            ..self
        }
    }

    /// Parses coordinate notation such as `e2e4` or `e7e8q`.
    pub fn from_coordinates(s: &str) -> Result<Self, ValidationError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ValidationError::MalformedCoordinates);
        }
        let square = |text: &str| {
            Position::from_algebraic(text).map_err(|_| ValidationError::MalformedCoordinates)
        };
        let from = square(&s[0..2])?;
        let to = square(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => Some(
                PieceType::from_char(c)
                    .filter(|p| p.can_promote_to())
                    .ok_or(ValidationError::InvalidPromotionChoice)?,
            ),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFlag {
    Regular,
    CastleKingside,
    CastleQueenside,
    /// Pawn promotion. Contains the piece promoted to
    Promotion(PieceType),
    /// Two square advance of a pawn from its starting rank
    DoublePawnPush,
    EnPassantCapture,
}

/// A fully validated move, ready to be applied to the board it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    /// For en passant this is the passed pawn, which does not stand on `to`
    pub captured: Option<Piece>,
    pub move_flag: MoveFlag,
}

impl Move {
    /// Square the captured piece is removed from
    pub fn capture_square(&self) -> Option<Position> {
        if self.captured.is_none() {
            return None;
        }
        match self.move_flag {
            MoveFlag::EnPassantCapture => self.to.offset(0, -self.piece.color.pawn_direction()),
            _ => Some(self.to),
        }
    }

    /// Rook origin and destination for castling moves
    pub fn castling_rook(&self) -> Option<(Position, Position)> {
        let (rook_file, step) = match self.move_flag {
            MoveFlag::CastleKingside => (7, 1),
            MoveFlag::CastleQueenside => (0, -1),
            _ => return None,
        };
        Position::new(rook_file, self.from.rank())
            .ok()
            .zip(self.from.offset(step, 0))
    }

    /// Plays the move on `board`: captures (including en passant), the rook hop of
    /// castling and promotion are all carried out here.
    pub fn apply(&self, board: &mut Board) -> Result<(), InvariantViolation> {
        if self.move_flag == MoveFlag::EnPassantCapture {
            if let Some(square) = self.capture_square() {
                board.set_piece(square, None);
            }
        }
        board.move_piece(self.from, self.to)?;
        if let Some((rook_from, rook_to)) = self.castling_rook() {
            board.move_piece(rook_from, rook_to)?;
        }
        if let MoveFlag::Promotion(piece_type) = self.move_flag {
            board.set_piece(
                self.to,
                Some(Piece {
                    color: self.piece.color,
                    piece_type,
                    has_moved: true,
                }),
            );
        }
        Ok(())
    }

    pub fn to_human(&self) -> String {
        let color = self.piece.color.to_human();
        match self.move_flag {
            MoveFlag::CastleKingside => return format!("{color} castles kingside"),
            MoveFlag::CastleQueenside => return format!("{color} castles queenside"),
            _ => {}
        }
        let maybe_capture_str = match (self.captured, self.capture_square()) {
            (Some(p), Some(square)) => {
                format!(" capturing {} at {}", p.piece_type.to_human(), square)
            }
            _ => "".to_string(),
        };
        let maybe_promotion_str = match self.move_flag {
            MoveFlag::Promotion(promoted_to_type) => {
                format!(" promoting to {}", promoted_to_type.to_human())
            }
            _ => "".to_string(),
        };
        format!(
            "{} moves {} from {} to {}{}{}",
            color,
            self.piece.piece_type.to_human(),
            self.from,
            self.to,
            maybe_capture_str,
            maybe_promotion_str,
        )
    }
}

/// What the rules remember about the previous move: enough to decide en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub piece_type: PieceType,
    pub color: Color,
    pub from: Position,
    pub to: Position,
}

impl LastMove {
    pub fn is_pawn_double_step(&self) -> bool {
        self.piece_type == PieceType::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

impl From<&Move> for LastMove {
    fn from(mv: &Move) -> Self {
        Self {
            piece_type: mv.piece.piece_type,
            color: mv.piece.color,
            from: mv.from,
            to: mv.to,
        }
    }
}

/// Result of the position after the last commit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameOutcome {
    Ongoing,
    /// The given side is in check and has a legal reply
    Check(Color),
    /// The given side is checkmated
    Checkmate(Color),
    Stalemate,
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        matches!(self, GameOutcome::Checkmate(_) | GameOutcome::Stalemate)
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate(mated) => Some(mated.other_color()),
            _ => None,
        }
    }
}
