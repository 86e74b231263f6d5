use anyhow::{bail, ensure, Context, Result};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

const YOU: &str = "you";
const SERVER: &str = "svr";
const OUT: &str = "out";
const MARKERS: [&str; 2] = ["dac", "fft"];

/// The device graph with names interned to dense indices.
struct Reactor<'a> {
    names: IndexSet<&'a str>,
    outputs: Vec<Vec<usize>>,
}

impl<'a> Reactor<'a> {
    fn parse(input: &'a str) -> Result<Self> {
        let mut names = IndexSet::new();
        let mut outputs: Vec<Vec<usize>> = Vec::new();
        for line in input.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let (device, targets) = line
                .split_once(':')
                .with_context(|| format!("missing ':' in {:?}", line))?;
            let device = device.trim();
            ensure!(!device.is_empty(), "unnamed device in {:?}", line);
            let (from, _) = names.insert_full(device);
            let targets: Vec<usize> = targets
                .split_ascii_whitespace()
                .map(|target| names.insert_full(target).0)
                .collect();
            outputs.resize_with(names.len(), Vec::new);
            outputs[from].extend(targets);
        }
        Ok(Self { names, outputs })
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    /// Number of paths from `from` to `to` passing through every node in `via`.
    fn count_paths(&self, from: &str, to: &str, via: &[&str]) -> Result<u64> {
        let (Some(from), Some(to)) = (self.index(from), self.index(to)) else {
            return Ok(0);
        };
        // Markers missing from the graph can never be visited.
        let Some(via) = via.iter().map(|name| self.index(name)).collect::<Option<Vec<_>>>() else {
            return Ok(0);
        };
        ensure!(via.len() < 32, "too many required devices");
        let mut search = PathSearch {
            reactor: self,
            to,
            via,
            memo: FxHashMap::default(),
        };
        let visited = search.mark(0, from);
        search.paths_from(from, visited)
    }
}

enum Visit {
    InProgress,
    Done(u64),
}

struct PathSearch<'r, 'a> {
    reactor: &'r Reactor<'a>,
    to: usize,
    via: Vec<usize>,
    memo: FxHashMap<(usize, u32), Visit>,
}

impl PathSearch<'_, '_> {
    fn mark(&self, visited: u32, node: usize) -> u32 {
        self.via
            .iter()
            .position(|&v| v == node)
            .map_or(visited, |bit| visited | 1 << bit)
    }

    fn paths_from(&mut self, node: usize, visited: u32) -> Result<u64> {
        if node == self.to {
            let all = (1u32 << self.via.len()) - 1;
            return Ok((visited == all) as u64);
        }
        match self.memo.get(&(node, visited)) {
            Some(Visit::Done(count)) => return Ok(*count),
            Some(Visit::InProgress) => bail!(
                "devices loop back through {}",
                self.reactor.names[node]
            ),
            None => {}
        }
        self.memo.insert((node, visited), Visit::InProgress);
        let reactor = self.reactor;
        let mut count = 0;
        for &next in &reactor.outputs[node] {
            count += self.paths_from(next, self.mark(visited, next))?;
        }
        self.memo.insert((node, visited), Visit::Done(count));
        Ok(count)
    }
}

#[instrument(skip_all)]
pub fn day11(input: &str) -> Result<(u64, u64)> {
    let reactor = Reactor::parse(input)?;
    debug!(devices = reactor.names.len(), "parsed");
    Ok((
        reactor.count_paths(YOU, OUT, &[])?,
        reactor.count_paths(SERVER, OUT, &MARKERS)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        aaa: you hhh
        you: bbb ccc
        bbb: ddd eee
        ccc: ddd eee fff
        ddd: ggg
        eee: out
        fff: out
        ggg: out
        hhh: ccc fff iii
        iii: out
    "};

    const EXAMPLE_SERVER: &str = indoc! {"
        svr: aaa bbb
        aaa: fft
        fft: ccc
        bbb: tty
        tty: ccc
        ccc: ddd eee
        ddd: hub
        hub: fff
        eee: dac
        dac: fff
        fff: ggg hhh
        ggg: out
        hhh: out
    "};

    #[test]
    fn test_day11() -> Result<()> {
        assert_eq!(day11(EXAMPLE)?, (5, 0));
        assert_eq!(day11(EXAMPLE_SERVER)?, (0, 2));
        Ok(())
    }

    #[test]
    fn markers_filter_paths() -> Result<()> {
        let reactor = Reactor::parse(EXAMPLE_SERVER)?;
        assert_eq!(reactor.count_paths(SERVER, OUT, &[])?, 8);
        assert_eq!(reactor.count_paths(SERVER, OUT, &["fft"])?, 4);
        assert_eq!(reactor.count_paths(SERVER, OUT, &["nope"])?, 0);
        Ok(())
    }

    #[test]
    fn reports_cycles() -> Result<()> {
        let reactor = Reactor::parse("you: a\na: b\nb: a out\n")?;
        assert!(reactor.count_paths(YOU, OUT, &[]).is_err());
        Ok(())
    }
}
