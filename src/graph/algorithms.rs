//! Traversals over the process call graph

use std::collections::{BTreeSet, VecDeque};

use super::ProjectMap;

/// Order in which processes should be documented.
///
/// Breadth-first from the entry points (sorted) along process → process
/// edges, visiting each process's callees in path order. Processes not
/// reachable from any entry point (for example members of a call cycle with
/// no outside caller) follow in path order. Every process appears exactly
/// once.
pub fn documentation_order(map: &ProjectMap) -> Vec<String> {
    let mut order = Vec::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    let mut roots: Vec<&str> = map
        .entry_points
        .iter()
        .map(String::as_str)
        .filter(|p| map.get(p).map(|e| e.kind.is_process()).unwrap_or(false))
        .collect();
    roots.sort_unstable();

    for root in roots {
        if visited.insert(root) {
            queue.push_back(root);
        }
    }

    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());
        let Some(entry) = map.get(current) else {
            continue;
        };
        for dep in &entry.dependencies {
            let is_process = map.get(dep).map(|e| e.kind.is_process()).unwrap_or(false);
            if is_process && visited.insert(dep.as_str()) {
                queue.push_back(dep.as_str());
            }
        }
    }

    for (path, _) in map.processes() {
        if !visited.contains(path) {
            order.push(path.to_string());
        }
    }

    order
}
