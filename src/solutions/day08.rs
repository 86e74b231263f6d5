use anyhow::{bail, ensure, Context, Result};
use nalgebra::Vector3;
use petgraph::unionfind::UnionFind;
use rayon::prelude::*;
use tracing::{debug, instrument};

const CONNECTIONS: usize = 1000;
const LARGEST_CIRCUITS: usize = 3;

/// A candidate connection: squared distance and the indices of both junction boxes.
type Pair = (i64, usize, usize);

struct Playground {
    boxes: Vec<Vector3<i64>>,
    /// Every pair of boxes, closest first.
    pairs: Vec<Pair>,
}

impl Playground {
    fn parse(input: &str) -> Result<Self> {
        let boxes = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let coords = line
                    .split(',')
                    .map(|c| c.trim().parse::<i64>())
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("invalid junction box {:?}", line))?;
                ensure!(coords.len() == 3, "expected x,y,z in {:?}", line);
                Ok(Vector3::from_column_slice(&coords))
            })
            .collect::<Result<Vec<_>>>()?;
        let pairs = sorted_pairs(&boxes);
        Ok(Self { boxes, pairs })
    }

    /// Joins the `connections` closest pairs and multiplies the sizes of the largest circuits.
    fn largest_circuits_product(&self, connections: usize) -> usize {
        let mut circuits = UnionFind::new(self.boxes.len());
        for &(_, a, b) in self.pairs.iter().take(connections) {
            circuits.union(a, b);
        }

        let mut sizes = vec![0usize; self.boxes.len()];
        for root in circuits.into_labeling() {
            sizes[root] += 1;
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.iter().take(LARGEST_CIRCUITS).filter(|&&s| s > 0).product()
    }

    /// Keeps joining the closest pairs until everything forms one circuit and returns the product
    /// of the x coordinates of the pair that closed it.
    fn last_connection_product(&self) -> Result<i64> {
        ensure!(self.boxes.len() >= 2, "need at least two junction boxes");
        let mut circuits = UnionFind::new(self.boxes.len());
        let mut remaining = self.boxes.len();
        for &(_, a, b) in &self.pairs {
            if !circuits.union(a, b) {
                continue;
            }
            remaining -= 1;
            if remaining == 1 {
                return Ok(self.boxes[a].x * self.boxes[b].x);
            }
        }
        bail!("junction boxes never formed a single circuit")
    }
}

fn sorted_pairs(boxes: &[Vector3<i64>]) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(boxes.len() * boxes.len().saturating_sub(1) / 2);
    for (i, a) in boxes.iter().enumerate() {
        for (j, b) in boxes.iter().enumerate().skip(i + 1) {
            let d = a - b;
            pairs.push((d.dot(&d), i, j));
        }
    }
    pairs.par_sort_unstable();
    pairs
}

#[instrument(skip_all)]
pub fn day8(input: &str) -> Result<(usize, i64)> {
    let playground = Playground::parse(input)?;
    debug!(boxes = playground.boxes.len(), pairs = playground.pairs.len(), "parsed");
    Ok((
        playground.largest_circuits_product(CONNECTIONS),
        playground.last_connection_product()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        162,817,812
        57,618,57
        906,360,560
        592,479,940
        352,342,300
        466,668,158
        542,29,236
        431,825,988
        739,650,466
        52,470,668
        216,146,977
        819,987,18
        117,168,530
        805,96,715
        346,949,466
        970,615,88
        941,993,340
        862,61,35
        984,92,344
        425,690,689
    "};

    #[test]
    fn test_day8() -> Result<()> {
        let playground = Playground::parse(EXAMPLE)?;
        assert_eq!(playground.largest_circuits_product(10), 40);
        assert_eq!(playground.last_connection_product()?, 25272);
        Ok(())
    }

    #[test]
    fn fewer_circuits_than_requested() -> Result<()> {
        let playground = Playground::parse("0,0,0\n1,0,0\n")?;
        assert_eq!(playground.largest_circuits_product(1), 2);
        assert_eq!(playground.last_connection_product()?, 0);
        Ok(())
    }

    #[test]
    fn rejects_bad_boxes() {
        assert!(Playground::parse("1,2\n").is_err());
        assert!(Playground::parse("1,2,x\n").is_err());
        assert!(day8("1,2,3\n").is_err());
    }
}
