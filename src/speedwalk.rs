//! Speedwalk rendering
//!
//! Turns a keyword path into the compact command line a MUD client sends,
//! e.g. `["s", "s", "w", "open gate", "w"]` becomes `run 2s w;open gate;w`.

use crate::direction;
use crate::room_graph::RoomGraph;
use crate::room_id::ExternalId;

/// Render a path as a speedwalk command line.
///
/// Consecutive directions are grouped into one `run` command with repeats
/// counted (`3n`); other keywords are sent as-is. Commands are joined by `;`.
pub fn speedwalk<S: AsRef<str>>(path: &[S]) -> String {
    let mut commands: Vec<String> = Vec::new();
    let mut steps: Vec<(&str, usize)> = Vec::new();

    for keyword in path {
        let keyword = keyword.as_ref();
        if direction::is_direction(keyword) {
            match steps.last_mut() {
                Some((last, count)) if *last == keyword => *count += 1,
                _ => steps.push((keyword, 1)),
            }
        } else {
            flush_run(&mut steps, &mut commands);
            commands.push(keyword.to_string());
        }
    }
    flush_run(&mut steps, &mut commands);

    commands.join(";")
}

fn flush_run(steps: &mut Vec<(&str, usize)>, commands: &mut Vec<String>) {
    match steps.as_slice() {
        [] => return,
        [(single, 1)] => commands.push(single.to_string()),
        _ => {
            let run: Vec<String> = steps
                .iter()
                .map(|&(dir, count)| {
                    if count == 1 {
                        dir.to_string()
                    } else {
                        format!("{}{}", count, dir)
                    }
                })
                .collect();
            commands.push(format!("run {}", run.join(" ")));
        }
    }
    steps.clear();
}

impl<K: ExternalId> RoomGraph<K> {
    /// Shortest path from `from` to `to` as a speedwalk command line.
    ///
    /// Empty under the same conditions as [`RoomGraph::find_path`].
    pub fn speedwalk_between(&self, from: &K, to: &K) -> String {
        speedwalk(&self.find_path(from, to))
    }
}
