use std::{ops::RangeInclusive, thread};

use anyhow::{ensure, Context, Result};
use num::Integer;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, instrument};

use crate::parse_u64_from_bytes;

type IdRange = RangeInclusive<u64>;

fn parse_ranges(input: &str) -> Result<Vec<IdRange>> {
    input
        .trim()
        .split(',')
        .map(|range| {
            let range = range.trim();
            let (start, end) = range
                .split_once('-')
                .with_context(|| format!("missing '-' in range {:?}", range))?;
            let (start, end) = (
                parse_u64_from_bytes(start.as_bytes())?,
                parse_u64_from_bytes(end.as_bytes())?,
            );
            ensure!(start <= end, "range {:?} is reversed", range);
            Ok(start..=end)
        })
        .collect()
}

fn count_digits(n: u64) -> u32 {
    n.checked_ilog10().unwrap_or(0) + 1
}

/// Whether the `len` digits of `id` are its leading `period` digits over and over.
fn repeats_with_period(id: u64, len: u32, period: u32) -> bool {
    let seed = id / 10u64.pow(len - period);
    let shift = 10u64.pow(period);
    let mut repeated = 0;
    for _ in 0..len / period {
        repeated = repeated * shift + seed;
    }
    repeated == id
}

fn is_doubled(id: u64) -> bool {
    let len = count_digits(id);
    len % 2 == 0 && repeats_with_period(id, len, len / 2)
}

fn is_repeated(id: u64) -> bool {
    let len = count_digits(id);
    (1..=len / 2)
        .rev()
        .any(|period| len % period == 0 && repeats_with_period(id, len, period))
}

fn sum_matching(range: &IdRange, is_invalid: fn(u64) -> bool) -> u64 {
    range.clone().filter(|&id| is_invalid(id)).sum()
}

fn sum_invalid(ranges: &[IdRange], is_invalid: fn(u64) -> bool) -> u64 {
    ranges.iter().map(|range| sum_matching(range, is_invalid)).sum()
}

fn sum_invalid_rayon(ranges: &[IdRange], is_invalid: fn(u64) -> bool) -> u64 {
    ranges
        .par_iter()
        .map(|range| sum_matching(range, is_invalid))
        .sum()
}

/// One scoped worker per available core, each summing a static chunk of the ranges.
fn sum_invalid_scoped(ranges: &[IdRange], is_invalid: fn(u64) -> bool) -> u64 {
    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    let chunk_size = ranges.len().div_ceil(workers).max(1);
    thread::scope(|s| {
        let handles: Vec<_> = ranges
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move || sum_invalid(chunk, is_invalid)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .sum()
    })
}

/// All `len`-digit numbers in `range` made of a `period`-digit seed repeated.
///
/// Such numbers are exactly the multiples `seed * 1_0..01_0..01` where the multiplier has a one
/// every `period` digits, so the seeds can be enumerated directly instead of testing every id.
fn periodic_in(range: &IdRange, len: u32, period: u32) -> impl Iterator<Item = u64> {
    let multiplier: u64 = (0..len / period).map(|i| 10u64.pow(i * period)).sum();
    let low = (*range.start()).max(10u64.pow(len - 1));
    let high = (*range.end()).min(10u64.checked_pow(len).map_or(u64::MAX, |p| p - 1));
    let first = Integer::div_ceil(&low, &multiplier);
    let last = high / multiplier;
    (first..=last).map(move |seed| seed * multiplier)
}

fn digit_lengths(range: &IdRange) -> RangeInclusive<u32> {
    count_digits(*range.start())..=count_digits(*range.end())
}

fn sum_doubled_generated(ranges: &[IdRange]) -> u64 {
    ranges
        .iter()
        .flat_map(|range| {
            digit_lengths(range)
                .filter(|len| len % 2 == 0)
                .flat_map(move |len| periodic_in(range, len, len / 2))
        })
        .sum()
}

fn sum_repeated_generated(ranges: &[IdRange]) -> u64 {
    ranges
        .iter()
        .map(|range| {
            // 111111 has periods 1, 2 and 3; count it once.
            let ids: FxHashSet<u64> = digit_lengths(range)
                .flat_map(|len| {
                    (1..len)
                        .filter(move |period| len % period == 0)
                        .flat_map(move |period| periodic_in(range, len, period))
                })
                .collect();
            ids.into_iter().sum::<u64>()
        })
        .sum()
}

type Summer = fn(&[IdRange], fn(u64) -> bool) -> u64;

fn solve_by_testing(input: &str, sum: Summer) -> Result<(u64, u64)> {
    let ranges = parse_ranges(input)?;
    Ok((sum(&ranges, is_doubled), sum(&ranges, is_repeated)))
}

/// Every way of solving day 2, for comparing their running times.
pub const DAY2_VARIANTS: &[(&str, fn(&str) -> Result<(u64, u64)>)] = &[
    ("generated", day2),
    ("brute_force", |input| solve_by_testing(input, sum_invalid)),
    ("rayon", |input| solve_by_testing(input, sum_invalid_rayon)),
    ("scoped_threads", |input| solve_by_testing(input, sum_invalid_scoped)),
];

#[instrument(skip_all)]
pub fn day2(input: &str) -> Result<(u64, u64)> {
    let ranges = parse_ranges(input)?;
    debug!(
        ranges = ranges.len(),
        ids = ranges.iter().map(|r| r.end() - r.start() + 1).sum::<u64>(),
        "parsed"
    );
    Ok((
        sum_doubled_generated(&ranges),
        sum_repeated_generated(&ranges),
    ))
}
