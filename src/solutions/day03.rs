use anyhow::{ensure, Result};
use tracing::instrument;

const PAIR: usize = 2;
const OVERRIDE: usize = 12;

fn parse_banks(input: &str) -> Result<Vec<Vec<u8>>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            ensure!(
                line.bytes().all(|b| b.is_ascii_digit()),
                "bank {:?} contains a non-digit",
                line
            );
            Ok(line.bytes().map(|b| b - b'0').collect())
        })
        .collect()
}

/// Largest number formed by switching on exactly `keep` batteries of `bank`, keeping their order.
fn max_joltage(bank: &[u8], keep: usize) -> Result<u64> {
    ensure!(
        bank.len() >= keep,
        "bank of {} batteries cannot switch on {}",
        bank.len(),
        keep
    );
    let mut drops = bank.len() - keep;
    let mut stack: Vec<u8> = Vec::with_capacity(bank.len());
    for &digit in bank {
        while drops > 0 && stack.last().is_some_and(|&top| top < digit) {
            stack.pop();
            drops -= 1;
        }
        stack.push(digit);
    }
    Ok(stack[..keep]
        .iter()
        .fold(0, |acc, &digit| acc * 10 + digit as u64))
}

fn total_joltage(banks: &[Vec<u8>], keep: usize) -> Result<u64> {
    banks.iter().map(|bank| max_joltage(bank, keep)).sum()
}

#[instrument(skip_all)]
pub fn day3(input: &str) -> Result<(u64, u64)> {
    let banks = parse_banks(input)?;
    Ok((
        total_joltage(&banks, PAIR)?,
        total_joltage(&banks, OVERRIDE)?,
    ))
}
