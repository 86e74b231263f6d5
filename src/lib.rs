pub mod grid;
pub mod solutions;

use std::{fmt::Display, path::PathBuf};

use anyhow::{ensure, Context, Result};

use solutions::*;

/// Environment variable overriding the directory the puzzle inputs are read from.
pub const INPUT_DIR_VAR: &str = "AOC_INPUT_DIR";
const DEFAULT_INPUT_DIR: &str = "inputs";

/// Both answers of a day, rendered for printing.
pub type Answers = (String, String);
pub type Solution = fn(&str) -> Result<Answers>;

macro_rules! solutions {
    ($($day:literal => $solve:path),* $(,)?) => {
        /// Every implemented day together with its number, in order.
        pub const ALL_SOLUTIONS: &[(usize, Solution)] = &[
            $(($day, |input| $solve(input).map(render))),*
        ];
    };
}

solutions! {
    1 => day1,
    2 => day2,
    3 => day3,
    4 => day4,
    5 => day5,
    7 => day7,
    8 => day8,
    9 => day9,
    10 => day10,
    11 => day11,
    12 => day12,
}

/// Renders the typed answers of a day for printing.
pub fn render<S: Display, T: Display>((part1, part2): (S, T)) -> Answers {
    (part1.to_string(), part2.to_string())
}

pub fn input_dir() -> PathBuf {
    std::env::var_os(INPUT_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR))
}

pub fn load_input(name: &str) -> Result<String> {
    let path = input_dir().join(name);
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn default_input(day: usize) -> Result<String> {
    load_input(&format!("{}.txt", day))
}

/// Parses an unsigned decimal number made of ASCII digits only. Signs, whitespace and anything
/// else are rejected.
pub fn parse_u64_from_bytes(bytes: &[u8]) -> Result<u64> {
    ensure!(!bytes.is_empty(), "expected a number, found nothing");
    let mut ret: u64 = 0;
    for &b in bytes {
        ensure!(
            b.is_ascii_digit(),
            "unexpected {:?} in number {:?}",
            b as char,
            String::from_utf8_lossy(bytes)
        );
        ret = ret
            .checked_mul(10)
            .and_then(|r| r.checked_add((b - b'0') as u64))
            .with_context(|| format!("{:?} overflows u64", String::from_utf8_lossy(bytes)))?;
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() -> Result<()> {
        assert_eq!(parse_u64_from_bytes(b"0")?, 0);
        assert_eq!(parse_u64_from_bytes(b"1188511880")?, 1188511880);
        assert_eq!(parse_u64_from_bytes(b"18446744073709551615")?, u64::MAX);
        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_u64_from_bytes(b"").is_err());
        assert!(parse_u64_from_bytes(b"-3").is_err());
        assert!(parse_u64_from_bytes(b"12 ").is_err());
        assert!(parse_u64_from_bytes(b"18446744073709551616").is_err());
    }

    #[test]
    fn registry_is_ordered_and_unique() {
        let days: Vec<usize> = ALL_SOLUTIONS.iter().map(|&(day, _)| day).collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(days.len(), 11);
    }

    #[test]
    fn registry_renders_answers() -> Result<()> {
        let (_, day5) = ALL_SOLUTIONS
            .iter()
            .find(|&&(day, _)| day == 5)
            .context("day 5 is registered")?;
        assert_eq!(day5("3-5\n10-14\n\n4\n9\n")?, render((1, 8)));
        Ok(())
    }
}
