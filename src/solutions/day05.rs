use anyhow::{ensure, Context, Result};
use tracing::{debug, instrument};

use crate::parse_u64_from_bytes;

/// Inclusive range of fresh ingredient ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Interval {
    start: u64,
    end: u64,
}

impl Interval {
    fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

fn parse_database(input: &str) -> Result<(Vec<Interval>, Vec<u64>)> {
    let input = input.replace("\r\n", "\n");
    let (ranges, ids) = input
        .split_once("\n\n")
        .context("missing blank line between ranges and ids")?;
    let intervals: Vec<Interval> = ranges
        .split_ascii_whitespace()
        .map(|range| {
            let (start, end) = range
                .split_once('-')
                .with_context(|| format!("missing '-' in range {:?}", range))?;
            let interval = Interval {
                start: parse_u64_from_bytes(start.as_bytes())?,
                end: parse_u64_from_bytes(end.as_bytes())?,
            };
            ensure!(interval.start <= interval.end, "range {:?} is reversed", range);
            Ok(interval)
        })
        .collect::<Result<_>>()?;
    let ids: Vec<u64> = ids
        .split_ascii_whitespace()
        .map(|id| parse_u64_from_bytes(id.as_bytes()))
        .collect::<Result<_>>()?;
    Ok((intervals, ids))
}

/// Sorts the intervals and coalesces every overlapping (or touching) pair.
fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_unstable();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => last.end = last.end.max(interval.end),
            _ => merged.push(interval),
        }
    }
    merged
}

/// `merged` must be sorted and disjoint.
fn contains(merged: &[Interval], id: u64) -> bool {
    let i = merged.partition_point(|interval| interval.start <= id);
    i > 0 && id <= merged[i - 1].end
}

#[instrument(skip_all)]
pub fn day5(input: &str) -> Result<(usize, u64)> {
    let (intervals, ids) = parse_database(input)?;
    let merged = merge(intervals);
    debug!(intervals = merged.len(), ids = ids.len(), "merged");

    let fresh = ids.iter().filter(|&&id| contains(&merged, id)).count();
    let covered: u64 = merged.iter().map(Interval::len).sum();
    Ok((fresh, covered))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    #[test]
    fn test_day5() -> Result<()> {
        let example = indoc! {"
            3-5
            10-14
            16-20
            12-18

            1
            5
            8
            11
            17
            32
        "};
        assert_eq!(day5(example)?, (3, 14));
        Ok(())
    }

    #[test]
    fn merges_nested_and_touching() {
        let interval = |start, end| Interval { start, end };
        let merged = merge(vec![
            interval(10, 12),
            interval(1, 20),
            interval(20, 25),
            interval(27, 27),
        ]);
        assert_eq!(merged, vec![interval(1, 25), interval(27, 27)]);
        assert!(contains(&merged, 1));
        assert!(contains(&merged, 25));
        assert!(!contains(&merged, 26));
        assert!(!contains(&merged, 0));
        assert!(!contains(&merged, 28));
    }

    #[test]
    fn requires_both_sections() {
        assert!(day5("3-5\n").is_err());
        assert!(day5("5-3\n\n4\n").is_err());
    }
}
