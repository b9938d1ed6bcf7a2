//! Factorization lattice and tree paths of one quaternion
//!
//! Run with: cargo run --example factor_lattice -- "8+i"

use prime_quaternions::prelude::*;
use tracing_subscriber::EnvFilter;

fn run(text: &str) -> EngineResult<()> {
    let q = parse_quaternion(text)?;
    println!("q = {}   norm = {}", q, q.norm());

    let lattice = factorize(&q)?;
    println!("\n=== Lattice ===");
    println!("factorization: {:?}", lattice.factorization());
    println!("nodes: {}   links: {}", lattice.nodes().len(), lattice.links().len());
    for node in lattice.nodes() {
        println!("  n{:<4} {:?}  {}", node.id.0, node.coordinate, node.quaternion);
    }

    match lattice.target_node() {
        Some(target) => {
            println!("\npaths to q: {}", lattice.count_paths(target));
            if let Some(path) = lattice.lowest_path(target) {
                let factors: Vec<String> = lattice
                    .path_factors(&path)
                    .iter()
                    .map(|(p, pi)| format!("[{}: {}]", p, pi))
                    .collect();
                println!("lowest path: {}", factors.join(" · "));
            }
        }
        None => println!("\nq was not reached"),
    }

    println!("\n=== Tree paths ===");
    for &(p, _) in lattice.factorization() {
        match tree_path(&q, p) {
            Ok(path) => {
                let labels: Vec<String> = path.labels().iter().map(|l| l.to_string()).collect();
                let status = if path.is_complete() { "" } else { "  (incomplete)" };
                println!("  p = {:<5} [{}]{}", p, labels.join(", "), status);
            }
            Err(err) => println!("  p = {:<5} {}", p, err),
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = std::env::args().nth(1).unwrap_or_else(|| "8+i".to_string());
    if let Err(err) = run(&text) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
