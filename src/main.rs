use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::info;

use chessium::board::{GameStatus, Position, STARTING_FEN};
use chessium::search::{default_threads, SearchConfig, Searcher};

#[derive(Parser)]
#[command(name = "chessium")]
#[command(about = "Chess rules engine and parallel search core")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Let the engine play both sides, printing the board after each move
    Play {
        /// FEN of the starting position
        #[arg(short, long, default_value = STARTING_FEN)]
        fen: String,

        /// Time per move in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        millis: u64,

        /// Maximum search depth per move
        #[arg(short, long, default_value_t = 64)]
        depth: u32,

        /// Search threads (default: available cores / 1.2)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Stop after this many plies even if the game is not over
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        /// FEN of the position to expand
        #[arg(short, long, default_value = STARTING_FEN)]
        fen: String,

        /// Depth in plies
        #[arg(short, long)]
        depth: usize,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match Args::parse().command {
        Command::Play {
            fen,
            millis,
            depth,
            threads,
            max_plies,
        } => play(&fen, millis, depth, threads, max_plies),
        Command::Perft { fen, depth, divide } => perft(&fen, depth, divide),
    }
}

fn play(
    fen: &str,
    millis: u64,
    depth: u32,
    threads: Option<usize>,
    max_plies: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if millis == 0 {
        return Err("--millis must be >= 1".into());
    }
    let config = SearchConfig::with_threads(threads.unwrap_or_else(default_threads))
        .time(Duration::from_millis(millis))
        .depth(depth);
    info!("playing with {} threads", config.threads);
    let searcher = Searcher::with_config(config);
    searcher.on_progress(|progress| {
        info!(
            "depth {} score {} move {} nodes {}",
            progress.depth, progress.score, progress.best_move, progress.nodes
        );
    });

    let mut position = Position::from_fen(fen)?;
    println!("{position}\n");

    for _ in 0..max_plies {
        if position.status() != GameStatus::Ongoing {
            break;
        }
        let result = searcher.search(&position)?;
        let pv: Vec<String> = result.pv.iter().map(ToString::to_string).collect();
        println!(
            "{} plays {} (score {}, depth {}, {} nodes, {:?}) pv {}",
            position.side_to_move(),
            result.best_move,
            result.score,
            result.depth,
            result.nodes,
            result.elapsed,
            pv.join(" ")
        );
        position = result.best_move.into_position();
        println!("{position}\n");
    }

    match position.status() {
        GameStatus::Checkmate { winner } => println!("Checkmate, {winner} wins"),
        GameStatus::Stalemate => println!("Stalemate"),
        GameStatus::Draw(reason) => println!("Draw ({reason:?})"),
        GameStatus::Ongoing => println!("Stopped after {max_plies} plies"),
    }
    Ok(())
}

fn perft(fen: &str, depth: usize, divide: bool) -> Result<(), Box<dyn std::error::Error>> {
    let position = Position::from_fen(fen)?;
    let start = Instant::now();
    let nodes = if divide {
        let counts = position.perft_divide(depth);
        for (mv, count) in &counts {
            println!("{mv}: {count}");
        }
        counts.iter().map(|(_, count)| count).sum()
    } else {
        position.perft(depth)
    };
    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!("\nNodes: {nodes}\nTime: {elapsed:?}\nNPS: {nps:.0}");
    Ok(())
}
