//! Replays a game given as coordinate moves and prints the resulting position.
//!
//! Usage: cargo run --release -- e2e4 e7e5 g1f3
//!        cargo run --release -- --fen "8/4P3/8/8/8/8/8/k3K3 w - - 0 1" e7e8n
//!        cargo run --release -- --perft 4

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::info;

use chess_rules::board::STARTING_POSITION_FEN;
use chess_rules::game::{Game, GameOptions};
use chess_rules::perft::perft_from_fen;
use chess_rules::types::{Color, GameOutcome, MoveRequest};
use chess_rules::validator::PromotionPolicy;

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Replay chess moves with full rule enforcement")]
struct Args {
    /// Moves in coordinate notation, e.g. e2e4 or e7e8q
    moves: Vec<String>,

    /// Starting position
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,

    /// Refuse promotions that do not name a piece instead of promoting to a queen
    #[arg(long)]
    require_promotion_choice: bool,

    /// Print a perft node count to this depth instead of replaying moves
    #[arg(long)]
    perft: Option<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .init();

    if let Some(depth) = args.perft {
        let nodes = perft_from_fen(&args.fen, depth).wrap_err("invalid FEN")?;
        println!("perft({depth}) = {nodes}");
        return Ok(());
    }

    let options = GameOptions {
        promotion_policy: if args.require_promotion_choice {
            PromotionPolicy::RequireChoice
        } else {
            PromotionPolicy::AutoQueen
        },
    };
    let mut game = Game::from_fen(&args.fen, options).wrap_err("invalid FEN")?;
    info!("replaying {} moves", args.moves.len());

    for (i, text) in args.moves.iter().enumerate() {
        let request = MoveRequest::from_coordinates(text)
            .map_err(|e| eyre!("move {} `{}`: {}", i + 1, text, e))?;
        game.commit_move(request)
            .wrap_err_with(|| format!("move {} `{}`", i + 1, text))?;
    }

    game.board().draw_to_terminal();
    println!("{}", game.board().placement_fen());
    println!();
    for line in game.formatted_history() {
        println!("{line}");
    }

    let captured = game.captured_pieces();
    for color in [Color::White, Color::Black] {
        println!(
            "{} captured: {} ({} points)",
            color,
            captured.summary(color),
            captured.material(color)
        );
    }

    match game.outcome() {
        GameOutcome::Ongoing => println!("{} to move", game.side_to_move()),
        GameOutcome::Check(color) => println!("{color} is in check"),
        GameOutcome::Checkmate(color) => {
            println!("checkmate, {} wins", color.other_color())
        }
        GameOutcome::Stalemate => println!("stalemate"),
    }
    Ok(())
}
