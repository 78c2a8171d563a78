use crate::board::Board;
use crate::error::InvariantViolation;
use crate::movegen::attacks_square;
use crate::types::*;

/// Is `square` attacked by any piece of `by`?
///
/// Pawns count only for their diagonal captures, never for the forward push.
/// Castling never attacks anything.
pub fn is_attacked(board: &Board, square: Position, by: Color) -> bool {
    board
        .pieces(by)
        .any(|(from, _)| attacks_square(board, from, square))
}

pub fn is_in_check(board: &Board, color: Color) -> Result<bool, InvariantViolation> {
    let king = board
        .king_position(color)
        .ok_or(InvariantViolation::MissingKing(color))?;
    Ok(is_attacked(board, king, color.other_color()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().board
    }

    #[test]
    fn start_position_attacks() {
        let b = Board::new();
        // every square on the third rank is covered by a pawn or knight
        for file in 0..8 {
            assert!(is_attacked(&b, Position::new(file, 2).unwrap(), Color::White));
        }
        assert!(!is_attacked(&b, pos("e4"), Color::White));
        assert!(!is_attacked(&b, pos("e5"), Color::Black));
        assert!(is_attacked(&b, pos("f6"), Color::Black));
    }

    #[test]
    fn pawn_push_square_is_not_attacked() {
        let b = board("4k3/8/8/8/8/8/4P3/K7 w - - 0 1");
        assert!(!is_attacked(&b, pos("e3"), Color::White));
        assert!(is_attacked(&b, pos("d3"), Color::White));
    }

    #[test]
    fn blocked_slider_does_not_attack() {
        let b = board("4k3/8/8/8/4r3/8/4P3/4K3 w - - 0 1");
        assert_eq!(is_in_check(&b, Color::White), Ok(false));
        assert!(is_attacked(&b, pos("e2"), Color::Black));
    }

    #[test]
    fn double_check_survives_blocking_one_checker() {
        // rook on e4 and knight on f3 both give check
        let mut b = board("4k3/8/8/8/4r3/5n2/8/4K3 w - - 0 1");
        assert_eq!(is_in_check(&b, Color::White), Ok(true));
        b.set_piece(pos("e2"), Some(Piece::new(Color::White, PieceType::Bishop)));
        assert_eq!(is_in_check(&b, Color::White), Ok(true));
        b.set_piece(pos("f3"), None);
        assert_eq!(is_in_check(&b, Color::White), Ok(false));
    }

    #[test]
    fn missing_king_is_an_invariant_violation() {
        let mut b = Board::new();
        b.set_piece(pos("e8"), None);
        assert_eq!(
            is_in_check(&b, Color::Black),
            Err(InvariantViolation::MissingKing(Color::Black))
        );
    }
}
