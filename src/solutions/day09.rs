use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use tracing::{debug, instrument};

type Tile = (i64, i64);

fn parse_tiles(input: &str) -> Result<Vec<Tile>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (x, y) = line
                .split_once(',')
                .with_context(|| format!("expected x,y in {:?}", line))?;
            let parse = |n: &str| {
                n.trim()
                    .parse::<i64>()
                    .with_context(|| format!("invalid tile {:?}", line))
            };
            Ok((parse(x)?, parse(y)?))
        })
        .collect()
}

fn area((x1, y1): Tile, (x2, y2): Tile) -> i64 {
    ((x1 - x2).abs() + 1) * ((y1 - y2).abs() + 1)
}

fn largest_rectangle(tiles: &[Tile]) -> i64 {
    (0..tiles.len())
        .into_par_iter()
        .map(|i| {
            tiles[i + 1..]
                .iter()
                .map(|&other| area(tiles[i], other))
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

/// A polygon edge running along `at` from `from` to `to` (`from <= to`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    at: i64,
    from: i64,
    to: i64,
}

/// Axis-parallel edges of one orientation, sorted by their fixed coordinate.
struct Edges {
    edges: Vec<Edge>,
    keys: Vec<i64>,
}

impl Edges {
    fn new(mut edges: Vec<Edge>) -> Self {
        edges.sort_unstable();
        let keys = edges.iter().map(|e| e.at).collect();
        Self { edges, keys }
    }

    /// Whether an edge lies strictly between `low` and `high` and overlaps the open span
    /// `(from, to)` along the other axis.
    fn crosses(&self, low: i64, high: i64, from: i64, to: i64) -> bool {
        let first = self.keys.partition_point(|&k| k <= low);
        let last = self.keys.partition_point(|&k| k < high);
        self.edges[first..last.max(first)]
            .iter()
            .any(|e| e.from < to && e.to > from)
    }
}

struct Floor {
    tiles: Vec<Tile>,
    vertical: Edges,
    horizontal: Edges,
}

impl Floor {
    fn new(tiles: Vec<Tile>) -> Result<Self> {
        let mut vertical = Vec::new();
        let mut horizontal = Vec::new();
        for (i, &(x1, y1)) in tiles.iter().enumerate() {
            let (x2, y2) = tiles[(i + 1) % tiles.len()];
            if x1 == x2 {
                vertical.push(Edge {
                    at: x1,
                    from: y1.min(y2),
                    to: y1.max(y2),
                });
            } else {
                ensure!(
                    y1 == y2,
                    "diagonal edge from {:?} to {:?}",
                    (x1, y1),
                    (x2, y2)
                );
                horizontal.push(Edge {
                    at: y1,
                    from: x1.min(x2),
                    to: x1.max(x2),
                });
            }
        }
        Ok(Self {
            tiles,
            vertical: Edges::new(vertical),
            horizontal: Edges::new(horizontal),
        })
    }

    /// A rectangle stays on the floor when no polygon edge cuts through its interior.
    fn is_inside(&self, (x1, y1): Tile, (x2, y2): Tile) -> bool {
        let (min_x, max_x) = (x1.min(x2), x1.max(x2));
        let (min_y, max_y) = (y1.min(y2), y1.max(y2));
        !self.horizontal.crosses(min_y, max_y, min_x, max_x)
            && !self.vertical.crosses(min_x, max_x, min_y, max_y)
    }

    fn largest_inside_rectangle(&self) -> i64 {
        let mut best = 0;
        for (i, &a) in self.tiles.iter().enumerate() {
            for &b in &self.tiles[i + 1..] {
                let candidate = area(a, b);
                if candidate > best && self.is_inside(a, b) {
                    best = candidate;
                }
            }
        }
        best
    }
}

#[instrument(skip_all)]
pub fn day9(input: &str) -> Result<(i64, i64)> {
    let tiles = parse_tiles(input)?;
    debug!(tiles = tiles.len(), "parsed");
    let part1 = largest_rectangle(&tiles);
    let floor = Floor::new(tiles)?;
    Ok((part1, floor.largest_inside_rectangle()))
}
