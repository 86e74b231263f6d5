use anyhow::{bail, Context, Result};
use tracing::{debug, instrument};

use crate::parse_u64_from_bytes;

const DIAL_SIZE: i64 = 100;
const DIAL_START: i64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rotation {
    Left(i64),
    Right(i64),
}

fn parse_rotations(input: &str) -> Result<Vec<Rotation>> {
    input
        .split_ascii_whitespace()
        .map(|token| {
            let (&dir, distance) = token.as_bytes().split_first().context("empty rotation")?;
            let distance = parse_u64_from_bytes(distance)
                .with_context(|| format!("invalid distance in {:?}", token))?;
            let distance = i64::try_from(distance)?;
            match dir {
                b'L' => Ok(Rotation::Left(distance)),
                b'R' => Ok(Rotation::Right(distance)),
                _ => bail!("invalid direction in {:?}", token),
            }
        })
        .collect()
}

/// Times the dial comes to rest on zero.
fn count_resting_on_zero(rotations: &[Rotation]) -> usize {
    let mut dial = DIAL_START;
    let mut count = 0;
    for rotation in rotations {
        dial = match *rotation {
            Rotation::Left(distance) => (dial - distance % DIAL_SIZE).rem_euclid(DIAL_SIZE),
            Rotation::Right(distance) => (dial + distance % DIAL_SIZE).rem_euclid(DIAL_SIZE),
        };
        if dial == 0 {
            count += 1;
        }
    }
    count
}

/// Times the dial points at zero during any click, not only at the end of a rotation.
fn count_clicks_on_zero(rotations: &[Rotation]) -> i64 {
    let mut dial = DIAL_START;
    let mut count = 0;
    for rotation in rotations {
        let distance = match *rotation {
            Rotation::Left(distance) | Rotation::Right(distance) => distance,
        };
        count += distance / DIAL_SIZE;
        let rest = distance % DIAL_SIZE;

        // Leaving zero never reaches zero again within less than a full turn.
        dial = match *rotation {
            Rotation::Left(_) => {
                if dial > 0 && rest >= dial {
                    count += 1;
                }
                (dial - rest).rem_euclid(DIAL_SIZE)
            }
            Rotation::Right(_) => {
                if dial > 0 && rest >= DIAL_SIZE - dial {
                    count += 1;
                }
                (dial + rest).rem_euclid(DIAL_SIZE)
            }
        };
    }
    count
}

#[instrument(skip_all)]
pub fn day1(input: &str) -> Result<(usize, i64)> {
    let rotations = parse_rotations(input)?;
    debug!(rotations = rotations.len(), "parsed");
    Ok((
        count_resting_on_zero(&rotations),
        count_clicks_on_zero(&rotations),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    #[test]
    fn test_day1() -> Result<()> {
        let example = indoc! {"
            L68
            L30
            R48
            L5
            R60
            L55
            L1
            L99
            R14
            L82
        "};
        assert_eq!(day1(example)?, (3, 6));
        Ok(())
    }

    #[test]
    fn full_turns_count_every_pass() -> Result<()> {
        assert_eq!(day1("R1000")?, (0, 10));
        // Starting on zero does not count, landing on it does.
        assert_eq!(day1("L50 R100 L250")?, (2, 4));
        Ok(())
    }

    #[test]
    fn huge_distances_wrap_without_overflow() -> Result<()> {
        let max = i64::MAX;
        assert_eq!(day1(&format!("R{}", max))?, (0, max / DIAL_SIZE));
        assert_eq!(day1(&format!("L{}", max))?, (0, max / DIAL_SIZE));
        Ok(())
    }

    #[test]
    fn rejects_bad_rotations() {
        assert!(day1("U10").is_err());
        assert!(day1("L").is_err());
        assert!(day1("R1x").is_err());
    }
}
