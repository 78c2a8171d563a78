//! Standard algebraic notation for validated moves.

use crate::board::Board;
use crate::types::*;
use crate::validator::{check_move, ValidationContext};

/// SAN text for `mv`, which must have been validated against `board` and `ctx`
/// (the position before the move).
///
/// Check and mate suffixes are supplied by the caller since they depend on the
/// position after the move.
pub fn san(
    board: &Board,
    ctx: &ValidationContext,
    mv: &Move,
    is_check: bool,
    is_checkmate: bool,
) -> String {
    let mut san = match mv.move_flag {
        MoveFlag::CastleKingside => "O-O".to_string(),
        MoveFlag::CastleQueenside => "O-O-O".to_string(),
        _ if mv.piece.piece_type == PieceType::Pawn => pawn_san(mv),
        _ => piece_san(board, ctx, mv),
    };
    if is_checkmate {
        san.push('#');
    } else if is_check {
        san.push('+');
    }
    san
}

fn pawn_san(mv: &Move) -> String {
    let mut san = String::new();
    if mv.captured.is_some() {
        san.push(mv.from.file_char());
        san.push('x');
    }
    san.push_str(&mv.to.to_algebraic());
    if let MoveFlag::Promotion(piece_type) = mv.move_flag {
        san.push('=');
        san.push(piece_type.to_char());
    }
    san
}

fn piece_san(board: &Board, ctx: &ValidationContext, mv: &Move) -> String {
    let mut san = String::new();
    san.push(mv.piece.piece_type.to_char());
    san.push_str(&disambiguation(board, ctx, mv));
    if mv.captured.is_some() {
        san.push('x');
    }
    san.push_str(&mv.to.to_algebraic());
    san
}

/// Origin file, rank, or both, when another piece of the same kind could also
/// legally move to the destination. Empty otherwise.
fn disambiguation(board: &Board, ctx: &ValidationContext, mv: &Move) -> String {
    let rivals: Vec<Position> = board
        .pieces(mv.piece.color)
        .filter(|(from, piece)| *from != mv.from && piece.piece_type == mv.piece.piece_type)
        .map(|(from, _)| from)
        .filter(|from| check_move(board, ctx, MoveRequest::new(*from, mv.to)).is_ok())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|r| r.file() != mv.from.file()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|r| r.rank() != mv.from.rank()) {
        mv.from.rank_char().to_string()
    } else {
        mv.from.to_algebraic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn notation_for(fen: &str, coordinates: &str) -> String {
        let setup = Board::from_fen(fen).unwrap();
        let ctx = ValidationContext::new(setup.active_color);
        let request = MoveRequest::from_coordinates(coordinates).unwrap();
        let mv = check_move(&setup.board, &ctx, request).unwrap();
        san(&setup.board, &ctx, &mv, false, false)
    }

    const START: &str = crate::board::STARTING_POSITION_FEN;

    #[test_case(START, "e2e4", "e4"; "pawn push")]
    #[test_case(START, "g1f3", "Nf3"; "knight move")]
    #[test_case("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5", "exd5"; "pawn capture")]
    #[test_case("4k3/8/8/3n4/8/8/8/3RK3 w - - 0 1", "d1d5", "Rxd5"; "piece capture")]
    #[test_case("r3k3/8/8/8/8/8/8/4K2R w K - 0 1", "e1g1", "O-O"; "castle kingside")]
    #[test_case("r3k3/8/8/8/8/8/8/4K2R b q - 0 1", "e8c8", "O-O-O"; "castle queenside")]
    #[test_case("8/4P3/8/8/8/8/8/k3K3 w - - 0 1", "e7e8", "e8=Q"; "promotion default")]
    #[test_case("3r4/4P3/8/8/8/8/8/k3K3 w - - 0 1", "e7d8n", "exd8=N"; "capture promotion")]
    fn simple_notation(fen: &str, coordinates: &str, expected: &str) {
        assert_eq!(notation_for(fen, coordinates), expected);
    }

    #[test]
    fn knights_disambiguated_by_file() {
        let fen = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1";
        assert_eq!(notation_for(fen, "b1d2"), "Nbd2");
        assert_eq!(notation_for(fen, "f3d2"), "Nfd2");
        // only one knight reaches c3
        assert_eq!(notation_for(fen, "b1c3"), "Nc3");
    }

    #[test]
    fn rooks_on_one_file_disambiguated_by_rank() {
        let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(notation_for(fen, "a1a3"), "R1a3");
        assert_eq!(notation_for(fen, "a5a3"), "R5a3");
    }

    #[test]
    fn three_queens_need_full_square() {
        let fen = "6k1/8/8/Q7/8/8/8/Q3Q2K w - - 0 1";
        assert_eq!(notation_for(fen, "a1e5"), "Qa1e5");
    }

    #[test]
    fn pinned_rival_does_not_disambiguate() {
        let fen = "4k3/8/8/8/8/r4N1K/8/1N6 w - - 0 1";
        assert_eq!(notation_for(fen, "b1d2"), "Nd2");
    }

    #[test]
    fn en_passant_is_written_as_pawn_capture() {
        let setup = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        let mut ctx = ValidationContext::new(Color::White);
        ctx.last_move = Some(LastMove {
            piece_type: PieceType::Pawn,
            color: Color::Black,
            from: "d7".parse().unwrap(),
            to: "d5".parse().unwrap(),
        });
        let mv = check_move(&setup.board, &ctx, MoveRequest::from_coordinates("e5d6").unwrap())
            .unwrap();
        assert_eq!(san(&setup.board, &ctx, &mv, false, false), "exd6");
    }

    #[test]
    fn mate_suffix_wins_over_check() {
        let board = Board::new();
        let ctx = ValidationContext::new(Color::White);
        let mv = check_move(&board, &ctx, MoveRequest::from_coordinates("e2e4").unwrap()).unwrap();
        assert_eq!(san(&board, &ctx, &mv, true, false), "e4+");
        assert_eq!(san(&board, &ctx, &mv, true, true), "e4#");
    }
}
