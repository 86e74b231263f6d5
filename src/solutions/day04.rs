use std::collections::VecDeque;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::grid::Grid;

const ROLL: u8 = b'@';
const CROWDED: usize = 4;

fn occupied_neighbours(grid: &Grid, x: usize, y: usize) -> usize {
    grid.neighbours(x, y)
        .filter(|&pos| grid[pos] == ROLL)
        .count()
}

fn accessible_rolls(grid: &Grid) -> usize {
    grid.positions(ROLL)
        .filter(|&(x, y)| occupied_neighbours(grid, x, y) < CROWDED)
        .count()
}

/// Removes accessible rolls until none are left and returns how many were taken away.
///
/// Neighbour counts are kept per cell; a roll is queued once, either initially or when its count
/// drops below the threshold.
fn removable_rolls(grid: &Grid) -> usize {
    let mut neighbours = vec![0usize; grid.width() * grid.height()];
    let mut present = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::new();
    for (x, y) in grid.positions(ROLL) {
        let i = grid.index_of(x, y);
        present[i] = true;
        neighbours[i] = occupied_neighbours(grid, x, y);
        if neighbours[i] < CROWDED {
            queue.push_back((x, y));
        }
    }

    let mut removed = 0;
    while let Some((x, y)) = queue.pop_front() {
        present[grid.index_of(x, y)] = false;
        removed += 1;
        for (nx, ny) in grid.neighbours(x, y) {
            let n = grid.index_of(nx, ny);
            if !present[n] {
                continue;
            }
            neighbours[n] -= 1;
            if neighbours[n] == CROWDED - 1 {
                queue.push_back((nx, ny));
            }
        }
    }
    removed
}

#[instrument(skip_all)]
pub fn day4(input: &str) -> Result<(usize, usize)> {
    let grid: Grid = input.parse()?;
    debug!(width = grid.width(), height = grid.height(), "parsed");
    Ok((accessible_rolls(&grid), removable_rolls(&grid)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    #[test]
    fn test_day4() -> Result<()> {
        let example = indoc! {"
            ..@@.@@@@.
            @@@.@.@.@@
            @@@@@.@.@@
            @.@@@@..@.
            @@.@@@@.@@
            .@@@@@@@.@
            .@.@.@.@@@
            @.@@@.@@@@
            .@@@@@@@@.
            @.@.@@@.@.
        "};
        assert_eq!(day4(example)?, (13, 43));
        Ok(())
    }

    #[test]
    fn solid_block_only_loses_corners() -> Result<()> {
        // Edge rolls next to a corner still have four neighbours once the corner is gone.
        let grid: Grid = "@@@@@\n@@@@@\n@@@@@\n@@@@@\n@@@@@\n".parse()?;
        assert_eq!(accessible_rolls(&grid), 4);
        assert_eq!(removable_rolls(&grid), 4);
        Ok(())
    }
}
