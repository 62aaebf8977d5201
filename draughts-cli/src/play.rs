//! Game loops: interactive play and engine self-play

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use draughts_core::{AlphaBetaEngine, Board, Player};

use crate::display;

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Color {
    Red,
    Black,
}

impl From<Color> for Player {
    fn from(color: Color) -> Player {
        match color {
            Color::Red => Player::Red,
            Color::Black => Player::Black,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Color the human plays (Red moves first)
    #[arg(long, value_enum, default_value = "black")]
    pub color: Color,

    /// Engine search depth in plies
    #[arg(long, default_value = "6")]
    pub depth: u32,

    /// Engine RNG seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct AutoArgs {
    /// Red engine search depth
    #[arg(long, default_value = "2")]
    pub red_depth: u32,

    /// Black engine search depth
    #[arg(long, default_value = "9")]
    pub black_depth: u32,

    /// Engine RNG seed (Black derives its own stream from this)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many rounds so endless king shuffles terminate
    #[arg(long, default_value = "80")]
    pub max_rounds: u32,

    /// Print a JSON summary instead of per-move boards
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// INTERACTIVE PLAY
// ============================================================================

pub fn run_play(args: &PlayArgs) -> Result<()> {
    let human: Player = args.color.into();
    let engine_player = human.opponent();
    let mut engine = match args.seed {
        Some(seed) => AlphaBetaEngine::with_seed(engine_player, args.depth, seed),
        None => AlphaBetaEngine::new(engine_player, args.depth),
    };

    tracing::info!(?human, ?engine_player, depth = args.depth, "starting game");

    let mut board = Board::new();
    println!("{}", display::show_board(&board));

    loop {
        // Red always moves first within a round.
        let red_moved = take_turn(&mut board, human, Player::Red, &mut engine)?;
        if !red_moved {
            break;
        }
        let black_moved = take_turn(&mut board, human, Player::Black, &mut engine)?;
        if !black_moved {
            break;
        }
    }

    report_winner(&board);
    Ok(())
}

fn take_turn(
    board: &mut Board,
    human: Player,
    current: Player,
    engine: &mut AlphaBetaEngine<Board>,
) -> Result<bool> {
    let moved = if current == human {
        human_turn(board, human)?
    } else {
        engine_turn(board, engine)?
    };

    if moved {
        println!("{}", display::show_board(board));
        println!("{:?}: {}\n", current, board.score(current));
    }
    Ok(moved)
}

/// Ask the human to pick from the legal move list, re-prompting on invalid
/// input. Returns false when no move exists (the human has lost).
fn human_turn(board: &mut Board, player: Player) -> Result<bool> {
    let moves = board.legal_moves(player);
    if moves.is_empty() {
        println!("No more moves!");
        return Ok(false);
    }

    let stdin = io::stdin();
    loop {
        print!("{}", display::show_moves(&moves));
        print!("Please select a move: ");
        io::stdout().flush().context("flushing prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading move selection")?;
        if read == 0 {
            bail!("input closed before a move was selected");
        }

        match line.trim().parse::<usize>() {
            Ok(selection) if selection < moves.len() => {
                if !board.apply_if_valid(player, &moves[selection]) {
                    bail!("generated move {} failed to apply", moves[selection]);
                }
                return Ok(true);
            }
            _ => println!("Invalid selection."),
        }
    }
}

fn engine_turn(board: &mut Board, engine: &mut AlphaBetaEngine<Board>) -> Result<bool> {
    match engine.choose_move(board)? {
        Some(mv) => {
            tracing::debug!(score = ?engine.last_score(), "engine searched");
            println!("{:?} plays {}", engine.player(), mv);
            Ok(true)
        }
        None => {
            println!("No more moves!");
            Ok(false)
        }
    }
}

// ============================================================================
// SELF-PLAY
// ============================================================================

/// Result of one engine-vs-engine game
#[derive(Debug, Serialize)]
struct GameSummary {
    winner: Option<Player>,
    rounds: u32,
    red_score: i32,
    black_score: i32,
    moves: Vec<String>,
}

pub fn run_auto(args: &AutoArgs) -> Result<()> {
    let mut red = match args.seed {
        Some(seed) => AlphaBetaEngine::with_seed(Player::Red, args.red_depth, seed),
        None => AlphaBetaEngine::new(Player::Red, args.red_depth),
    };
    let mut black = match args.seed {
        Some(seed) => AlphaBetaEngine::with_seed(Player::Black, args.black_depth, seed ^ 1),
        None => AlphaBetaEngine::with_seed(Player::Black, args.black_depth, 43),
    };

    tracing::info!(
        red_depth = args.red_depth,
        black_depth = args.black_depth,
        max_rounds = args.max_rounds,
        "starting self-play"
    );

    let mut board = Board::new();
    let mut transcript = Vec::new();
    let mut rounds = 0;

    if !args.json {
        println!("{}", display::show_board(&board));
    }

    while rounds < args.max_rounds {
        rounds += 1;
        if !self_play_turn(&mut board, &mut red, &mut transcript, args.json)? {
            break;
        }
        if !self_play_turn(&mut board, &mut black, &mut transcript, args.json)? {
            break;
        }
    }

    let summary = GameSummary {
        winner: winner(&board),
        rounds,
        red_score: board.score(Player::Red),
        black_score: board.score(Player::Black),
        moves: transcript,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report_winner(&board);
    }
    Ok(())
}

fn self_play_turn(
    board: &mut Board,
    engine: &mut AlphaBetaEngine<Board>,
    transcript: &mut Vec<String>,
    quiet: bool,
) -> Result<bool> {
    let player = engine.player();
    match engine.choose_move(board)? {
        Some(mv) => {
            tracing::debug!(?player, %mv, score = ?engine.last_score(), "engine moved");
            transcript.push(mv.to_string());
            if !quiet {
                println!("{}", display::show_board(board));
                println!("{player:?} plays {mv} ({})\n", board.score(player));
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// REPORTING
// ============================================================================

fn winner(board: &Board) -> Option<Player> {
    let red = board.score(Player::Red);
    if red > 0 {
        Some(Player::Red)
    } else if red < 0 {
        Some(Player::Black)
    } else {
        None
    }
}

fn report_winner(board: &Board) {
    match winner(board) {
        Some(player) => println!("{player:?} wins!"),
        None => println!("Tie."),
    }
}
