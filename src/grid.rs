use std::{ops::Index, str::FromStr};

use anyhow::{bail, ensure, Error, Result};

/// A rectangular byte grid, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.cells[self.index_of(x, y)])
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// First occurrence of `needle` in reading order.
    pub fn position(&self, needle: u8) -> Option<(usize, usize)> {
        memchr::memchr(needle, &self.cells).map(|i| (i % self.width, i / self.width))
    }

    pub fn positions(&self, needle: u8) -> impl Iterator<Item = (usize, usize)> + '_ {
        memchr::memchr_iter(needle, &self.cells).map(|i| (i % self.width, i / self.width))
    }

    /// The up to eight in-bounds cells surrounding `(x, y)`.
    pub fn neighbours(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (width, height) = (self.width, self.height);
        (-1isize..=1)
            .flat_map(|dy| (-1isize..=1).map(move |dx| (dx, dy)))
            .filter(|&d| d != (0, 0))
            .filter_map(move |(dx, dy)| {
                let nx = x.checked_add_signed(dx).filter(|&nx| nx < width)?;
                let ny = y.checked_add_signed(dy).filter(|&ny| ny < height)?;
                Some((nx, ny))
            })
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = u8;

    fn index(&self, (x, y): (usize, usize)) -> &u8 {
        &self.cells[self.index_of(x, y)]
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut cells = Vec::with_capacity(s.len());
        let mut width = None;
        let mut height = 0;
        for line in s.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
            let expected = *width.get_or_insert(line.len());
            ensure!(
                line.len() == expected,
                "row {} has {} cells, expected {}",
                height + 1,
                line.len(),
                expected
            );
            cells.extend_from_slice(line.as_bytes());
            height += 1;
        }
        let Some(width) = width else {
            bail!("empty grid");
        };
        Ok(Self {
            cells,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_indexes() -> Result<()> {
        let grid: Grid = "ab.\n.c.\n".parse()?;
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid[(1, 1)], b'c');
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.row(1), b".c.");
        assert_eq!(grid.position(b'c'), Some((1, 1)));
        assert_eq!(grid.positions(b'.').count(), 3);
        Ok(())
    }

    #[test]
    fn corner_has_three_neighbours() -> Result<()> {
        let grid: Grid = "...\n...\n...".parse()?;
        let mut corner: Vec<_> = grid.neighbours(0, 0).collect();
        corner.sort();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(grid.neighbours(1, 1).count(), 8);
        Ok(())
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!("..\n...\n".parse::<Grid>().is_err());
        assert!("\n\n".parse::<Grid>().is_err());
    }
}
