use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::warn;
use tracing_subscriber::{prelude::*, EnvFilter};

use aoc2025::{default_input, Solution, ALL_SOLUTIONS};

fn main() -> Result<()> {
    init_tracing()?;

    let mut total = Duration::default();
    for &(day, solve) in ALL_SOLUTIONS {
        let input = match default_input(day) {
            Ok(input) => input,
            Err(err) => {
                warn!("skipping day {}: {:#}", day, err);
                continue;
            }
        };
        total += execute_day(day, solve, &input)?;
    }
    println!("Total processing time: {}", format_duration(total));
    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (warnings only by default).
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn format_duration(dur: Duration) -> String {
    if dur.as_millis() != 0 {
        format!("{} ms", dur.as_millis())
    } else {
        format!("{} us", dur.as_micros())
    }
}

fn execute_day(n: usize, solve: Solution, input: &str) -> Result<Duration> {
    println!("Day {}:", n);

    let start = Instant::now();
    let (part1, part2) = solve(input).with_context(|| format!("day {} failed", n))?;
    let elapsed = start.elapsed();

    println!("  Part 1: {}", part1);
    println!("  Part 2: {}", part2);
    println!("  Finished in {}", format_duration(elapsed));
    println!("---------------------");
    Ok(elapsed)
}
