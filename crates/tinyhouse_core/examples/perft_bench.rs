//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p tinyhouse_core -- [depth] [position]
//!
//! Examples:
//!   # Default: depth 6 over the built-in positions
//!   cargo flamegraph --example perft_bench -p tinyhouse_core
//!
//!   # Custom depth and position
//!   cargo flamegraph --example perft_bench -p tinyhouse_core -- 7 "k3/4/4/K3[Hh] w 1"

use std::env;
use std::time::{Duration, Instant};

use tinyhouse_core::{perft, Position, STARTPOS};

const TEST_POSITIONS: &[(&str, &str)] = &[
    ("Starting position", STARTPOS),
    ("Horse drops", "k3/4/4/K3[Hh] w 1"),
    ("Promotion", "k3/2P1/4/K3[Ff] w 1"),
    ("Middlegame", "fhw1/3k/P2p/KWHF[Pp] b 5"),
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(6);

    match args.get(2) {
        Some(notation) => run_single_position(notation, depth),
        None => run_all_positions(depth),
    }
}

fn nps(nodes: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

fn run_single_position(notation: &str, depth: u8) {
    let mut pos = match Position::from_notation(notation) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Position: {notation}");
    println!("Depth: {depth}");
    println!();

    // Warm-up run at lower depth
    if depth > 2 {
        let _ = perft(&mut pos, depth.saturating_sub(2));
    }

    let start = Instant::now();
    let nodes = perft(&mut pos, depth);
    let elapsed = start.elapsed();

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {:.0}", nps(nodes, elapsed));
}

fn run_all_positions(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;

    for (name, notation) in TEST_POSITIONS {
        let Ok(mut pos) = Position::from_notation(notation) else {
            println!("{name:.<30} invalid position");
            continue;
        };

        print!("{name:.<30}");

        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();

        total_nodes += nodes;
        total_time += elapsed;

        println!(
            " {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
            nps(nodes, elapsed)
        );
    }

    println!();
    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        nps(total_nodes, total_time)
    );
}
