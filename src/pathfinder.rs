//! Shortest paths between rooms
//!
//! A best-first search over exit weights (1 for directions, 2 for other
//! commands) guided by the straight-line distance in room coordinates.
//!
//! The guide measures distance to the room the search *started from*, not to
//! the goal. Paths found this way are the ones players of this map have always
//! been handed, so the search keeps that behavior; see the tests for what it
//! produces on graphs where it matters.
//!
//! Estimates are kept as `f64` and never rounded to whole numbers. Two rooms
//! whose estimates differ only in the fraction are therefore taken in
//! estimate order, not push order, and can yield a different (equally valid
//! or better) path than a search on truncated integer estimates would.

use crate::direction::Coords;
use crate::room_graph::{NodeIndex, RoomGraph};
use crate::room_id::ExternalId;
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Queue entry: a room reached at `cost`, ranked by `estimate`.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    estimate: f64,
    cost: u32,
    seq: u64,
    node: NodeIndex,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the lowest estimate, oldest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn distance(a: Coords, b: Coords) -> f64 {
    let dx = (a.0 as f64) - (b.0 as f64);
    let dy = (a.1 as f64) - (b.1 as f64);
    let dz = (a.2 as f64) - (b.2 as f64);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

impl<K: ExternalId> RoomGraph<K> {
    /// Keywords to type, in order, to walk from `from` to `to`.
    ///
    /// Empty when `from == to`, when either room is unknown, and when `to`
    /// cannot be reached. The three cases are not distinguished.
    pub fn find_path(&self, from: &K, to: &K) -> Vec<String> {
        if from == to {
            return Vec::new();
        }
        let (start, goal) = match (self.node(from), self.node(to)) {
            (Some(s), Some(g)) => (s, g),
            _ => return Vec::new(),
        };

        match self.search(start, goal) {
            Some(predecessors) => {
                let path = self.walk_back(&predecessors, start, goal);
                debug!("find_path: {} -> {} in {} steps", from, to, path.len());
                path
            }
            None => {
                debug!("find_path: {} unreachable from {}", to, from);
                Vec::new()
            }
        }
    }

    /// Run the search until `goal` is taken off the queue.
    ///
    /// Returns the predecessor of every room reached, or `None` when the queue
    /// runs dry first.
    fn search(&self, start: NodeIndex, goal: NodeIndex) -> Option<Vec<Option<NodeIndex>>> {
        let origin = self.rooms[start].coords;
        let guide = |n: NodeIndex| distance(self.rooms[n].coords, origin);

        let count = self.rooms.len();
        let mut best = vec![u32::MAX; count];
        let mut predecessors: Vec<Option<NodeIndex>> = vec![None; count];
        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;

        best[start] = 0;
        queue.push(Frontier {
            estimate: guide(start),
            cost: 0,
            seq,
            node: start,
        });

        while let Some(entry) = queue.pop() {
            // superseded by a cheaper route pushed later
            if entry.cost > best[entry.node] {
                continue;
            }
            if entry.node == goal {
                return Some(predecessors);
            }
            for (&dest, exit) in &self.rooms[entry.node].exits {
                let cost = entry.cost + exit.weight();
                if cost < best[dest] {
                    best[dest] = cost;
                    predecessors[dest] = Some(entry.node);
                    seq += 1;
                    queue.push(Frontier {
                        estimate: cost as f64 + guide(dest),
                        cost,
                        seq,
                        node: dest,
                    });
                }
            }
        }
        None
    }

    fn walk_back(
        &self,
        predecessors: &[Option<NodeIndex>],
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut current = goal;
        while current != start {
            let prev = match predecessors[current] {
                Some(p) => p,
                None => break,
            };
            if let Some(exit) = self.rooms[prev].exits.get(&current) {
                keywords.push(exit.keyword().to_string());
            }
            current = prev;
        }
        keywords.reverse();
        keywords
    }
}
