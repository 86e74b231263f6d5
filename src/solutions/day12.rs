use anyhow::{bail, ensure, Context, Result};
use tracing::{info, instrument, warn};

use crate::parse_u64_from_bytes;

/// Day 12 has no second puzzle.
const FINALE: &str = "Merry Christmas!";

#[derive(Debug, Default)]
struct Present {
    area: u64,
    rows: u64,
    cols: u64,
}

#[derive(Debug)]
struct Region {
    width: u64,
    height: u64,
    counts: Vec<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fit {
    /// Every present gets a bounding square of its own.
    Fits,
    /// The presents cover more tiles than the region has.
    Impossible,
    /// Needs an actual packing search.
    Undecided,
}

fn parse_region(line: &str, presents: usize) -> Result<Region> {
    let (dims, counts) = line
        .split_once(':')
        .with_context(|| format!("missing ':' in region {:?}", line))?;
    let (width, height) = dims
        .split_once('x')
        .with_context(|| format!("expected WxH in region {:?}", line))?;
    let counts = counts
        .split_ascii_whitespace()
        .map(|c| parse_u64_from_bytes(c.as_bytes()))
        .collect::<Result<Vec<_>>>()?;
    ensure!(
        counts.len() == presents,
        "region {:?} lists {} counts for {} presents",
        line,
        counts.len(),
        presents
    );
    Ok(Region {
        width: parse_u64_from_bytes(width.trim().as_bytes())?,
        height: parse_u64_from_bytes(height.trim().as_bytes())?,
        counts,
    })
}

fn parse_farm(input: &str) -> Result<(Vec<Present>, Vec<Region>)> {
    let mut presents: Vec<Present> = Vec::new();
    let mut regions = Vec::new();
    for line in input.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(index) = line.strip_suffix(':') {
            let index = parse_u64_from_bytes(index.as_bytes())
                .with_context(|| format!("invalid present header {:?}", line))?;
            ensure!(
                index as usize == presents.len(),
                "present {} listed out of order",
                index
            );
            presents.push(Present::default());
        } else if line.contains('x') {
            regions.push(parse_region(line, presents.len())?);
        } else {
            let Some(present) = presents.last_mut() else {
                bail!("shape row {:?} before any present header", line);
            };
            ensure!(
                line.bytes().all(|b| b == b'#' || b == b'.'),
                "invalid shape row {:?}",
                line
            );
            present.area += line.bytes().filter(|&b| b == b'#').count() as u64;
            present.rows += 1;
            present.cols = present.cols.max(line.len() as u64);
        }
    }
    Ok((presents, regions))
}

fn classify(presents: &[Present], region: &Region) -> Fit {
    let covered: u64 = presents
        .iter()
        .zip(&region.counts)
        .map(|(present, count)| present.area * count)
        .sum();
    let slot = presents
        .iter()
        .map(|p| p.rows.max(p.cols))
        .max()
        .unwrap_or(1)
        .max(1);
    if covered > region.width * region.height {
        Fit::Impossible
    } else if (region.width / slot) * (region.height / slot) >= region.counts.iter().sum::<u64>() {
        Fit::Fits
    } else {
        Fit::Undecided
    }
}

#[instrument(skip_all)]
pub fn day12(input: &str) -> Result<(usize, &'static str)> {
    let (presents, regions) = parse_farm(input)?;
    let fits: Vec<Fit> = regions.iter().map(|r| classify(&presents, r)).collect();
    let count = |kind: Fit| fits.iter().filter(|&&fit| fit == kind).count();
    let (fitting, impossible, undecided) = (
        count(Fit::Fits),
        count(Fit::Impossible),
        count(Fit::Undecided),
    );
    info!(regions = regions.len(), fitting, impossible, undecided, "classified");
    if undecided > 0 {
        warn!(undecided, "regions need a packing search and are counted as not fitting");
    }
    Ok((fitting, FINALE))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const FARM: &str = indoc! {"
        0:
        ###
        ##.
        ##.

        1:
        ###
        ##.
        .##

        4x4: 0 2
        12x5: 1 1
        2x2: 1 0
        6x6: 2 2
    "};

    #[test]
    fn test_day12() -> Result<()> {
        assert_eq!(day12(FARM)?, (2, FINALE));
        Ok(())
    }

    #[test]
    fn classifies_regions() -> Result<()> {
        let (presents, regions) = parse_farm(FARM)?;
        assert_eq!(presents.iter().map(|p| p.area).collect::<Vec<_>>(), vec![7, 7]);
        let fits: Vec<_> = regions.iter().map(|r| classify(&presents, r)).collect();
        assert_eq!(
            fits,
            vec![Fit::Undecided, Fit::Fits, Fit::Impossible, Fit::Fits]
        );
        Ok(())
    }

    #[test]
    fn rejects_inconsistent_farms() {
        assert!(parse_farm("0:\n##\n\n4x4: 1 1\n").is_err());
        assert!(parse_farm("1:\n##\n").is_err());
        assert!(parse_farm("##\n").is_err());
    }
}
