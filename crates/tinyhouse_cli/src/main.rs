//! Tinyhouse CLI
//!
//! Solve the game, probe tablebases, search and count moves.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tinyhouse_cli::{
    best_move, describe_score, probe, run_perft, solve, Config, SolveOptions,
};
use tinyhouse_core::STARTPOS;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Tinyhouse solver and engine");
    println!();
    println!("Usage:");
    println!("  tinyhouse solve [--config FILE] [--out FILE] [--start POSITION]");
    println!("  tinyhouse probe --tb FILE POSITION");
    println!("  tinyhouse bestmove [--config FILE] [--depth N] POSITION");
    println!("  tinyhouse perft DEPTH [POSITION]");
    println!();
    println!("Positions use the notation of the start position: \"{STARTPOS}\"");
    println!("Set RUST_LOG (e.g. RUST_LOG=debug) to change the log level.");
    println!();
    println!("Examples:");
    println!("  tinyhouse solve --start \"k3/2F1/WK2/4 w 1\" --out small.tb");
    println!("  tinyhouse probe --tb small.tb \"k3/2F1/WK2/4 w 1\"");
    println!("  tinyhouse bestmove --depth 6 \"{STARTPOS}\"");
}

/// Flags with values, plus the remaining positional arguments.
struct Args {
    flags: Vec<(String, String)>,
    positional: Vec<String>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let mut flags = Vec::new();
        let mut positional = Vec::new();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg.starts_with("--") {
                let Some(value) = args.get(i + 1) else {
                    bail!("{arg} needs a value");
                };
                flags.push((arg.clone(), value.clone()));
                i += 1;
            } else {
                positional.push(arg.clone());
            }
            i += 1;
        }
        Ok(Self { flags, positional })
    }

    fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn expect_only(&self, allowed: &[&str]) -> Result<()> {
        for (k, _) in &self.flags {
            if !allowed.contains(&k.as_str()) {
                bail!("unknown option {k}");
            }
        }
        Ok(())
    }

    fn config(&self) -> Result<Config> {
        Config::load_or_default(self.flag("--config").map(PathBuf::from).as_deref())
    }
}

fn run_solve(args: &Args) -> Result<()> {
    args.expect_only(&["--config", "--out", "--start"])?;
    let config = args.config()?;
    let opts = SolveOptions {
        start: args
            .flag("--start")
            .map(str::to_string)
            .unwrap_or(config.solver.start),
        out: args
            .flag("--out")
            .map(PathBuf::from)
            .unwrap_or(config.solver.out),
        stats: config.solver.stats,
    };

    let stats = solve(&opts)?;
    println!("=== Solve complete ===");
    println!("Positions: {}", stats.nodes);
    println!("Moves:     {}", stats.edges);
    println!(
        "Wins: {}, Losses: {}, Draws: {}",
        stats.wins, stats.losses, stats.draws
    );
    println!(
        "Terminals: {} ({} checkmates, {} stalemates)",
        stats.terminals, stats.checkmates, stats.stalemates
    );
    println!("Longest forced result: {} plies", stats.max_dtm);
    println!("Time: {} ms", stats.elapsed_ms);
    println!("Tablebase written to {}", opts.out.display());
    Ok(())
}

fn run_probe(args: &Args) -> Result<()> {
    args.expect_only(&["--tb"])?;
    let Some(tb) = args.flag("--tb") else {
        bail!("probe requires --tb FILE");
    };
    let Some(position) = args.positional.first() else {
        bail!("probe requires a position");
    };
    println!("{}", probe(&PathBuf::from(tb), position)?);
    Ok(())
}

fn run_bestmove(args: &Args) -> Result<()> {
    args.expect_only(&["--config", "--depth"])?;
    let mut search = args.config()?.search;
    if let Some(depth) = args.flag("--depth") {
        search.depth = depth
            .parse()
            .with_context(|| format!("bad depth '{depth}'"))?;
    }
    let Some(position) = args.positional.first() else {
        bail!("bestmove requires a position");
    };

    let result = best_move(position, &search)?;
    match result.best_move {
        Some(mv) => {
            println!("bestmove {mv}");
            println!(
                "score {} depth {} nodes {}",
                describe_score(result.score),
                result.depth,
                result.nodes
            );
        }
        None => println!("no legal moves"),
    }
    Ok(())
}

fn run_perft_command(args: &Args) -> Result<()> {
    args.expect_only(&[])?;
    let Some(depth) = args.positional.first() else {
        bail!("perft requires a depth");
    };
    let depth: u8 = depth
        .parse()
        .with_context(|| format!("bad depth '{depth}'"))?;
    let position = args.positional.get(1).map_or(STARTPOS, String::as_str);

    let report = run_perft(position, depth)?;
    for (mv, nodes) in &report.divide {
        println!("{mv}: {nodes}");
    }
    println!();
    println!("Nodes: {}", report.nodes);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let rest = Args::parse(&args[2..])?;
    match args[1].as_str() {
        "solve" => run_solve(&rest),
        "probe" => run_probe(&rest),
        "bestmove" => run_bestmove(&rest),
        "perft" => run_perft_command(&rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command '{other}'")
        }
    }
}
