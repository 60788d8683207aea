//! # sudoku-sat
//!
//! Command-line front end: solves sudoku variants with rectangular blocks,
//! clues, and pairwise sum constraints by encoding them as CNF and running a
//! DPLL solver.
//!
//! ```sh
//! # Solve one puzzle, check the answer and print statistics
//! sudoku-sat solve puzzle.puzzle --verify --stats
//!
//! # Recursive solver, no time limit, export the CNF as DIMACS
//! sudoku-sat solve puzzle.puzzle --solver branching --timeout 0 --export-dimacs
//!
//! # Solve and check every .puzzle file under a directory
//! sudoku-sat -v batch puzzles/
//!
//! # Shell completions
//! sudoku-sat completions bash
//! ```

use crate::command_line::cli::{Cli, Commands, solve_dir, solve_puzzle_file};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Solve {
            path,
            export_dimacs,
            common,
        } => solve_puzzle_file(&path, export_dimacs, &common),
        Commands::Batch { dir, common } => solve_dir(&dir, &common).map(|summary| {
            println!("{summary}");
        }),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "sudoku-sat", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
