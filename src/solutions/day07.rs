use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use tracing::{debug, instrument};

use crate::grid::Grid;

const SOURCE: u8 = b'S';
const SPLITTER: u8 = b'^';

/// The tachyon manifold. A beam entering a splitter continues downwards from the columns on
/// either side of it; beams leaving the grid sideways are lost.
struct Manifold {
    grid: Grid,
    source: (usize, usize),
}

impl Manifold {
    fn parse(input: &str) -> Result<Self> {
        let grid: Grid = input.parse()?;
        let source = grid.position(SOURCE).context("manifold has no source")?;
        Ok(Self { grid, source })
    }

    fn is_splitter(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y) == Some(SPLITTER)
    }

    /// Columns a beam at `x` occupies on the row below after passing through row `y`.
    fn successors(&self, x: usize, y: usize) -> impl Iterator<Item = usize> {
        let sides = if self.is_splitter(x, y) {
            [x.checked_sub(1), Some(x + 1).filter(|&r| r < self.grid.width())]
        } else {
            [Some(x), None]
        };
        sides.into_iter().flatten()
    }

    /// Propagates the beam front row by row and counts the splitters it hits.
    fn count_splits(&self) -> usize {
        let (sx, sy) = self.source;
        let mut beams = FxHashSet::from_iter([sx]);
        let mut splits = 0;
        for y in sy + 1..self.grid.height() {
            let mut next = FxHashSet::default();
            for &x in &beams {
                if self.is_splitter(x, y) {
                    splits += 1;
                }
                next.extend(self.successors(x, y));
            }
            beams = next;
            if beams.is_empty() {
                break;
            }
        }
        splits
    }

    fn count_timelines_memoized(&self) -> u64 {
        let (sx, sy) = self.source;
        let mut memo = vec![None; self.grid.width() * self.grid.height()];
        self.timelines_from(sx, sy + 1, &mut memo)
    }

    fn timelines_from(&self, x: usize, y: usize, memo: &mut [Option<u64>]) -> u64 {
        if y >= self.grid.height() {
            return 1;
        }
        let i = self.grid.index_of(x, y);
        if let Some(count) = memo[i] {
            return count;
        }
        let count = self
            .successors(x, y)
            .map(|next| self.timelines_from(next, y + 1, memo))
            .sum::<u64>();
        memo[i] = Some(count);
        count
    }

    /// Bottom-up variant: `ways[x]` is the number of timelines that reach column `x` of the
    /// current row, pulled from the three cells above it.
    fn count_timelines_dp(&self) -> u64 {
        let (sx, sy) = self.source;
        let width = self.grid.width();
        let mut ways = vec![0u64; width];
        ways[sx] = 1;
        for y in sy + 1..=self.grid.height() {
            let above = y - 1;
            let mut next = vec![0u64; width];
            for (x, cell) in next.iter_mut().enumerate() {
                if !self.is_splitter(x, above) {
                    *cell += ways[x];
                }
                if x > 0 && self.is_splitter(x - 1, above) {
                    *cell += ways[x - 1];
                }
                if x + 1 < width && self.is_splitter(x + 1, above) {
                    *cell += ways[x + 1];
                }
            }
            ways = next;
        }
        ways.iter().sum()
    }
}

/// Day 7 with either timeline counter, for comparing their running times.
pub const DAY7_VARIANTS: &[(&str, fn(&str) -> Result<(usize, u64)>)] = &[
    ("dp", day7),
    ("memoized", |input| {
        let manifold = Manifold::parse(input)?;
        Ok((manifold.count_splits(), manifold.count_timelines_memoized()))
    }),
];

#[instrument(skip_all)]
pub fn day7(input: &str) -> Result<(usize, u64)> {
    let manifold = Manifold::parse(input)?;
    debug!(source = ?manifold.source, "parsed");
    Ok((manifold.count_splits(), manifold.count_timelines_dp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        .......S.......
        ...............
        .......^.......
        ...............
        ......^.^......
        ...............
        .....^.^.^.....
        ...............
        ....^.^...^....
        ...............
        ...^.^...^.^...
        ...............
        ..^...^.....^..
        ...............
        .^.^.^.^.^...^.
        ...............
    "};

    #[test]
    fn test_day7() -> Result<()> {
        assert_eq!(day7(EXAMPLE)?, (21, 40));
        Ok(())
    }

    #[test]
    fn timeline_counts_agree() -> Result<()> {
        for &(name, solve) in DAY7_VARIANTS {
            assert_eq!(solve(EXAMPLE)?, (21, 40), "{}", name);
        }
        Ok(())
    }

    #[test]
    fn beams_leaving_the_side_are_lost() -> Result<()> {
        let manifold = Manifold::parse("S.\n^.\n..\n")?;
        assert_eq!(manifold.count_splits(), 1);
        assert_eq!(manifold.count_timelines_memoized(), 1);
        assert_eq!(manifold.count_timelines_dp(), 1);
        Ok(())
    }

    #[test]
    fn requires_a_source() {
        assert!(day7("...\n.^.\n").is_err());
    }
}
