//! Round-robin handshake enumeration.
//!
//! A handshake is an unordered pair of teams that must meet exactly once.
//! Teams carried over together from a previous round ("master teams") have
//! already met, so pairs inside the same master group are left out.

use std::collections::btree_set;
use std::collections::BTreeSet;

/// The set of unordered pairs `(a, b)`, `a < b`, a template has to cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandshakeSet {
    pairs: BTreeSet<(i32, i32)>,
}

impl HandshakeSet {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Membership test; the pair is normalized first.
    pub fn contains(&self, a: i32, b: i32) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    /// Removes a normalized pair, returning whether it was present.
    pub fn remove(&mut self, pair: (i32, i32)) -> bool {
        self.pairs.remove(&pair)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, (i32, i32)> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a HandshakeSet {
    type Item = &'a (i32, i32);
    type IntoIter = btree_set::Iter<'a, (i32, i32)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Assigns every team (1-based) to its master group, if any.
///
/// Groups are contiguous index ranges handed out in order starting at
/// team 1. Teams past the last group belong to no group.
fn master_group_index(num_teams: i32, master_teams: &[i32]) -> Vec<Option<usize>> {
    let size = num_teams.max(0) as usize;
    let mut groups = vec![None; size + 1];
    let mut next = 1usize;
    for (group, &group_size) in master_teams.iter().enumerate() {
        for _ in 0..group_size.max(0) {
            if next > size {
                return groups;
            }
            groups[next] = Some(group);
            next += 1;
        }
    }
    groups
}

/// Enumerates every pair `(i, j)`, `1 <= i < j <= num_teams`, except the
/// pairs whose teams share a master group.
pub fn required_handshakes(num_teams: i32, master_teams: &[i32]) -> HandshakeSet {
    let groups = master_group_index(num_teams, master_teams);
    let mut pairs = BTreeSet::new();
    for i in 1..=num_teams {
        for j in (i + 1)..=num_teams {
            let same_group = match (groups[i as usize], groups[j as usize]) {
                (Some(gi), Some(gj)) => gi == gj,
                _ => false,
            };
            if !same_group {
                pairs.insert((i, j));
            }
        }
    }
    HandshakeSet { pairs }
}

/// Closed form of `required_handshakes(..).len()` for master teams that add
/// up to `num_teams`: `n(n-1)/2 - sum(g(g-1)/2)`.
pub fn required_race_count(num_teams: i32, master_teams: &[i32]) -> usize {
    let choose_two = |n: i32| -> i64 {
        let n = n.max(0) as i64;
        n * (n - 1) / 2
    };
    let excluded: i64 = master_teams.iter().map(|&g| choose_two(g)).sum();
    (choose_two(num_teams) - excluded).max(0) as usize
}
