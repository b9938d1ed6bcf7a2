//! Square complex over two primes
//!
//! Run with: cargo run --example square_complex -- 5 13
//!
//! Prints the canonical generators of each prime with their P¹ labels and
//! conjugate pairs, then every cross-prime relation a·b ≃ b′·a′, then the
//! shortest word relations a beam search finds among the primary generators.

use prime_quaternions::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let primes: Vec<u64> = {
        let args: Vec<u64> = std::env::args().skip(1).filter_map(|a| a.parse().ok()).collect();
        if args.is_empty() {
            vec![5, 13]
        } else {
            args
        }
    };

    let complex = match SquareComplex::build(&primes, &RelationParams::cross_prime()) {
        Ok(complex) => complex,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    let generators = complex.generators();

    println!("=== Generators ===");
    for &p in generators.primes() {
        println!("\np = {} ({} generators)", p, p + 1);
        for g in generators.for_prime(p) {
            let pair = g.pair.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            let marker = if g.is_conjugate { "*" } else { " " };
            println!(
                "  {:>4}{} label {:>3}  {:<16} pair {}",
                g.id.to_string(),
                marker,
                g.label.to_string(),
                g.quaternion.to_string(),
                pair
            );
        }
    }

    println!("\n=== Relations ({}) ===", complex.relations().len());
    for r in complex.relations() {
        let name = |id: GeneratorId| {
            generators
                .get(id)
                .map(|g| g.quaternion.to_string())
                .unwrap_or_default()
        };
        println!(
            "  {}·{} = {}·{}{}",
            r.a,
            r.b,
            r.b_prime,
            r.a_prime,
            if r.degenerate { "  (commuting)" } else { "" }
        );
        println!(
            "      ({})({}) ~ ({})({})",
            name(r.a),
            name(r.b),
            name(r.b_prime),
            name(r.a_prime)
        );
    }

    let primaries: Vec<Quaternion> = generators.primaries().map(|g| g.quaternion.clone()).collect();
    match search_word_relations(&primaries, &WordSearchParams::without_commutators(50, 3)) {
        Ok(words) => {
            println!("\n=== Word relations ({}) ===", words.len());
            for (i, g) in primaries.iter().enumerate() {
                println!("  {} = {}", Letter::new(i), g);
            }
            for w in words.iter().take(10) {
                println!("  {}", w);
            }
        }
        Err(err) => eprintln!("word search failed: {}", err),
    }
}
