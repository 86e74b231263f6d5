use anyhow::{ensure, Context, Result};
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::parse_u64_from_bytes;

/// Part 2 enumerates every subset of the buttons.
const MAX_BUTTONS: usize = 16;

struct Machine {
    /// Number of lights, which is also the number of joltage counters.
    width: usize,
    lights: u64,
    /// Each button as a mask of the lights/counters it is wired to.
    buttons: Vec<u64>,
    joltages: Vec<u64>,
}

/// Pressing a subset of the buttons once each.
struct Combination {
    increments: Vec<u64>,
    presses: u64,
}

fn min_some(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    a.into_iter().chain(b).min()
}

fn parse_list(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(|n| parse_u64_from_bytes(n.as_bytes()))
        .collect()
}

impl Machine {
    fn parse(re: &Regex, line: &str) -> Result<Self> {
        let caps = re
            .captures(line)
            .with_context(|| format!("malformed machine {:?}", line))?;
        let pattern = caps[1].as_bytes();
        let width = pattern.len();
        ensure!(width <= 64, "too many lights in {:?}", line);
        let lights = pattern
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == b'#')
            .fold(0u64, |acc, (i, _)| acc | 1u64 << i);

        let buttons = caps[2]
            .split_ascii_whitespace()
            .map(|button| {
                let wiring = button.trim_start_matches('(').trim_end_matches(')');
                parse_list(wiring)?.into_iter().try_fold(0u64, |acc, i| {
                    ensure!((i as usize) < width, "button {} exceeds {} lights", button, width);
                    Ok(acc | 1u64 << i)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let joltages = parse_list(&caps[3])?;
        ensure!(
            joltages.len() == width,
            "{} joltages for {} counters in {:?}",
            joltages.len(),
            width,
            line
        );

        Ok(Self {
            width,
            lights,
            buttons,
            joltages,
        })
    }

    fn fewest_toggles(&self) -> Option<u64> {
        let mut memo = FxHashMap::default();
        self.toggles_from(0, 0, &mut memo)
    }

    /// Fewest presses among `buttons[next..]` turning `state` into the light pattern. Every button
    /// is either pressed once or not at all, as pressing it twice cancels out.
    fn toggles_from(
        &self,
        next: usize,
        state: u64,
        memo: &mut FxHashMap<(usize, u64), Option<u64>>,
    ) -> Option<u64> {
        if state == self.lights {
            return Some(0);
        }
        let &button = self.buttons.get(next)?;
        if let Some(&known) = memo.get(&(next, state)) {
            return known;
        }
        let pressed = self
            .toggles_from(next + 1, state ^ button, memo)
            .map(|n| n + 1);
        let skipped = self.toggles_from(next + 1, state, memo);
        let best = min_some(pressed, skipped);
        memo.insert((next, state), best);
        best
    }

    /// Every subset of the buttons, grouped by the parity pattern its presses leave behind.
    fn combinations_by_parity(&self) -> FxHashMap<u64, Vec<Combination>> {
        let mut combinations: FxHashMap<u64, Vec<Combination>> = FxHashMap::default();
        for subset in 0u32..1 << self.buttons.len() {
            let mut increments = vec![0; self.width];
            let mut parity = 0;
            for (i, &button) in self.buttons.iter().enumerate() {
                if subset >> i & 1 == 0 {
                    continue;
                }
                parity ^= button;
                for (counter, increment) in increments.iter_mut().enumerate() {
                    *increment += button >> counter & 1;
                }
            }
            combinations.entry(parity).or_default().push(Combination {
                increments,
                presses: subset.count_ones() as u64,
            });
        }
        combinations
    }

    /// Fewest presses raising every counter exactly to its joltage.
    ///
    /// Any solution presses each button an odd or even number of times. The odd part is a subset
    /// matching the parity of the targets; what remains is twice a solution for half the
    /// leftover targets.
    fn fewest_presses(&self) -> Result<Option<u64>> {
        ensure!(
            self.buttons.len() <= MAX_BUTTONS,
            "{} buttons are too many to search",
            self.buttons.len()
        );
        let combinations = self.combinations_by_parity();
        let mut memo = FxHashMap::default();
        Ok(presses_for(&combinations, self.joltages.clone(), &mut memo))
    }
}

fn presses_for(
    combinations: &FxHashMap<u64, Vec<Combination>>,
    targets: Vec<u64>,
    memo: &mut FxHashMap<Vec<u64>, Option<u64>>,
) -> Option<u64> {
    if targets.iter().all(|&t| t == 0) {
        return Some(0);
    }
    if let Some(&known) = memo.get(&targets) {
        return known;
    }
    let parity = targets
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &t)| acc | (t & 1) << i);

    let mut best = None;
    for combination in combinations.get(&parity).into_iter().flatten() {
        let fits = combination
            .increments
            .iter()
            .zip(&targets)
            .all(|(increment, target)| increment <= target);
        if !fits {
            continue;
        }
        let halves = targets
            .iter()
            .zip(&combination.increments)
            .map(|(target, increment)| (target - increment) / 2)
            .collect();
        let presses = presses_for(combinations, halves, memo).map(|n| combination.presses + 2 * n);
        best = min_some(best, presses);
    }
    memo.insert(targets, best);
    best
}

fn parse_machines(input: &str) -> Result<Vec<Machine>> {
    let re = Regex::new(r"^\[([.#]+)\]((?: +\([0-9,]+\))+) +\{([0-9,]+)\}$")?;
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Machine::parse(&re, line))
        .collect()
}

#[instrument(skip_all)]
pub fn day10(input: &str) -> Result<(u64, u64)> {
    let machines = parse_machines(input)?;
    debug!(machines = machines.len(), "parsed");

    let mut toggles = 0;
    let mut presses = 0;
    for (i, machine) in machines.iter().enumerate() {
        toggles += machine
            .fewest_toggles()
            .with_context(|| format!("machine {} cannot show its light pattern", i + 1))?;
        presses += machine
            .fewest_presses()?
            .with_context(|| format!("machine {} cannot reach its joltages", i + 1))?;
    }
    Ok((toggles, presses))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        [.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
        [...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
        [.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
    "};

    #[test]
    fn test_day10() -> Result<()> {
        assert_eq!(day10(EXAMPLE)?, (7, 33));
        Ok(())
    }

    #[test]
    fn per_machine_answers() -> Result<()> {
        let machines = parse_machines(EXAMPLE)?;
        let toggles: Vec<_> = machines.iter().map(Machine::fewest_toggles).collect();
        let presses = machines
            .iter()
            .map(Machine::fewest_presses)
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(toggles, vec![Some(2), Some(3), Some(2)]);
        assert_eq!(presses, vec![Some(10), Some(12), Some(11)]);
        Ok(())
    }

    #[test]
    fn parses_wiring_into_masks() -> Result<()> {
        let machines = parse_machines("[#.#] (0,2) (1) {1,2,1}")?;
        let machine = &machines[0];
        assert_eq!(machine.lights, 0b101);
        assert_eq!(machine.buttons, vec![0b101, 0b010]);
        assert_eq!(machine.fewest_toggles(), Some(1));
        assert_eq!(machine.fewest_presses()?, Some(3));
        Ok(())
    }

    #[test]
    fn unreachable_targets() -> Result<()> {
        let machines = parse_machines("[##] (0) {1,1}")?;
        assert_eq!(machines[0].fewest_toggles(), None);
        assert_eq!(machines[0].fewest_presses()?, None);
        assert!(day10("[##] (0) {1,1}").is_err());
        Ok(())
    }

    #[test]
    fn many_buttons_only_limit_joltages() -> Result<()> {
        let buttons = vec!["(0)"; MAX_BUTTONS + 1].join(" ");
        let line = format!("[#] {} {{1}}", buttons);
        let machines = parse_machines(&line)?;
        assert_eq!(machines[0].fewest_toggles(), Some(1));
        assert!(machines[0].fewest_presses().is_err());
        assert!(day10(&line).is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed_machines() {
        assert!(parse_machines("[.#] (2) {1,1}").is_err());
        assert!(parse_machines("[.#] (0) {1}").is_err());
        assert!(parse_machines(".# (0) {1,1}").is_err());
    }
}
