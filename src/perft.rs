use crate::board::Board;
use crate::error::FenError;
use crate::validator::{all_legal_moves, PromotionPolicy, ValidationContext};

/// Counts the leaf nodes of the legal move tree to `depth` plies.
///
/// Runs straight on the validator, so a wrong count points at the move rules.
pub fn run_perft_test(board: &Board, ctx: &ValidationContext, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = all_legal_moves(board, ctx);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        let mut b = *board;
        if m.apply(&mut b).is_err() {
            continue;
        }
        nodes += run_perft_test(&b, &ctx.after(&m), depth - 1);
    }
    nodes
}

/// Perft from a FEN position, with the en passant field honoured.
pub fn perft_from_fen(fen: &str, depth: u8) -> Result<u64, FenError> {
    let setup = Board::from_fen(fen)?;
    let ctx = ValidationContext::from_fen_setup(&setup, PromotionPolicy::default());
    Ok(run_perft_test(&setup.board, &ctx, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_POSITION_FEN;
    use pretty_assertions::assert_eq;

    /// Perft from starting position
    ///
    /// https://www.chessprogramming.org/Perft_Results
    ///
    /// | Depth | Nodes   | Captures | Checks |
    /// | ----- | ------- | -------- | ------ |
    /// | 1     | 20      | 0        | 0      |
    /// | 2     | 400     | 0        | 0      |
    /// | 3     | 8,902   | 34       | 12     |
    /// | 4     | 197,281 | 1576     | 469    |
    #[test]
    fn perft_start() {
        let expected = [1, 20, 400, 8_902];
        for (depth, nodes) in expected.iter().enumerate() {
            assert_eq!(
                perft_from_fen(STARTING_POSITION_FEN, depth as u8),
                Ok(*nodes),
                "depth {depth}"
            );
        }
    }

    /// "Kiwipete": castling both ways, en passant and pins all show up early
    #[test]
    fn perft_kiwipete() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(perft_from_fen(fen, 1), Ok(48));
        assert_eq!(perft_from_fen(fen, 2), Ok(2_039));
    }

    /// Sparse endgame with en passant discovered checks along the fifth rank
    #[test]
    fn perft_pos_3() {
        let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
        let expected = [1, 14, 191, 2_812];
        for (depth, nodes) in expected.iter().enumerate() {
            assert_eq!(perft_from_fen(fen, depth as u8), Ok(*nodes), "depth {depth}");
        }
    }

    /// Promotions with capture on the first ply
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 44
    /// 2     | 1,486
    #[test]
    fn perft_pos_5() {
        let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
        assert_eq!(perft_from_fen(fen, 1), Ok(44));
        assert_eq!(perft_from_fen(fen, 2), Ok(1_486));
    }

    #[test]
    fn perft_with_en_passant_field() {
        // white can take on d6 straight away: 29 + 1 moves
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let without = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3";
        assert_eq!(
            perft_from_fen(fen, 1).unwrap(),
            perft_from_fen(without, 1).unwrap() + 1
        );
    }
}
