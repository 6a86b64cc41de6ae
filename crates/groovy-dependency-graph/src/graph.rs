//! Process-wide reverse-adjacency dependency graph.
//!
//! Vertices are logical names; an edge `u -> v` means "module u refers to
//! module v". The graph keeps both directions so [`DependencyGraph::record`]
//! can atomically replace a module's outgoing edges while
//! [`DependencyGraph::affected`] answers "who depends on v" by walking the
//! reverse index only.

use std::collections::{HashMap, HashSet, VecDeque};

use dashmap::DashMap;

use crate::extractor::DependencyRelation;

/// A soft cap on BFS depth during `affected`, high enough not to truncate
/// any realistic workspace per the traversal-cost requirement.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;
/// A soft cap on total visited nodes during `affected`, for the same reason.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Process-wide, concurrency-safe store of module dependency edges.
///
/// `record` acquires only a short critical section per affected reverse-edge
/// entry (DashMap's per-shard locking); `affected` never blocks on another
/// `affected` call, only momentarily on a `record` touching the same shard.
pub struct DependencyGraph {
    forward: DashMap<String, HashMap<String, DependencyRelation>>,
    reverse: DashMap<String, HashSet<String>>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self { forward: DashMap::new(), reverse: DashMap::new() }
    }

    /// Atomically replace all outgoing edges from `name`. Previous edges are
    /// removed from the reverse index before the new ones are inserted, so a
    /// reader never observes a mix of stale and fresh edges for `name`.
    pub fn record(&self, name: &str, deps: &HashMap<String, DependencyRelation>) {
        if let Some((_, previous)) = self.forward.remove(name) {
            for target in previous.keys() {
                if let Some(mut dependents) = self.reverse.get_mut(target) {
                    dependents.remove(name);
                    if dependents.is_empty() {
                        drop(dependents);
                        self.reverse.remove(target);
                    }
                }
            }
        }

        for target in deps.keys() {
            self.reverse.entry(target.clone()).or_default().insert(name.to_string());
        }

        self.forward.insert(name.to_string(), deps.clone());
        tracing::debug!(name, edge_count = deps.len(), "recorded dependency edges");
    }

    /// Remove all edges for `name`, both outgoing and its effect on the
    /// reverse index of whatever it depended on. Does not remove `name` from
    /// other modules' outgoing edges if they still reference it by name;
    /// those modules simply keep a forward edge to a name with no current
    /// entry, which is consistent with `name` never having been compiled.
    pub fn invalidate(&self, name: &str) {
        if let Some((_, previous)) = self.forward.remove(name) {
            for target in previous.keys() {
                if let Some(mut dependents) = self.reverse.get_mut(target) {
                    dependents.remove(name);
                    if dependents.is_empty() {
                        drop(dependents);
                        self.reverse.remove(target);
                    }
                }
            }
        }
        self.reverse.remove(name);
    }

    pub fn clear(&self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// The dependency map most recently recorded for `name`, if any.
    pub fn dependencies_of(&self, name: &str) -> Option<HashMap<String, DependencyRelation>> {
        self.forward.get(name).map(|entry| entry.clone())
    }

    /// Transitive set of modules that (directly or indirectly) depend on
    /// `name`, excluding `name` itself. A `name` never seen by the graph, or
    /// recently cleared, returns an empty set (strict-empty semantics).
    pub fn affected(&self, name: &str) -> Vec<String> {
        self.affected_bounded(name, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES)
    }

    /// Same as [`Self::affected`] with explicit traversal caps, mainly for
    /// tests that want to exercise the cap without constructing a huge graph.
    pub fn affected_bounded(&self, name: &str, max_depth: usize, max_nodes: usize) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((name.to_string(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth || visited.len() >= max_nodes {
                continue;
            }
            let Some(dependents) = self.reverse.get(&current) else { continue };
            for dependent in dependents.iter() {
                if visited.len() >= max_nodes {
                    break;
                }
                if dependent != name && visited.insert(dependent.clone()) {
                    queue.push_back((dependent.clone(), depth + 1));
                }
            }
        }

        visited.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(pairs: &[(&str, DependencyRelation)]) -> HashMap<String, DependencyRelation> {
        pairs.iter().map(|(name, relation)| (name.to_string(), *relation)).collect()
    }

    #[test]
    fn affected_returns_empty_for_unknown_module() {
        let graph = DependencyGraph::new();
        assert!(graph.affected("Never.groovy").is_empty());
    }

    #[test]
    fn s3_affected_set_with_chain() {
        let graph = DependencyGraph::new();
        // B refers to A, C refers to B.
        graph.record("B.groovy", &deps(&[("A.groovy", DependencyRelation::Import)]));
        graph.record("C.groovy", &deps(&[("B.groovy", DependencyRelation::Import)]));

        let affected = graph.affected("A.groovy");
        assert!(affected.contains(&"B.groovy".to_string()));
        assert!(affected.contains(&"C.groovy".to_string()));
        assert_eq!(affected.len(), 2);
    }

    #[test]
    fn s4_cycle_safety() {
        let graph = DependencyGraph::new();
        graph.record("A.groovy", &deps(&[("B.groovy", DependencyRelation::Import)]));
        graph.record("B.groovy", &deps(&[("A.groovy", DependencyRelation::Import)]));

        let affected = graph.affected("A.groovy");
        assert_eq!(affected.len(), 1);
        assert!(affected.contains(&"B.groovy".to_string()));
        assert!(!affected.contains(&"A.groovy".to_string()));
    }

    #[test]
    fn record_replaces_stale_edges_atomically() {
        let graph = DependencyGraph::new();
        graph.record("M.groovy", &deps(&[("Old.groovy", DependencyRelation::Import)]));
        assert_eq!(graph.affected("Old.groovy"), vec!["M.groovy".to_string()]);

        graph.record("M.groovy", &deps(&[("New.groovy", DependencyRelation::Import)]));
        assert!(graph.affected("Old.groovy").is_empty());
        assert_eq!(graph.affected("New.groovy"), vec!["M.groovy".to_string()]);
    }

    #[test]
    fn invalidate_removes_outgoing_edges() {
        let graph = DependencyGraph::new();
        graph.record("M.groovy", &deps(&[("Target.groovy", DependencyRelation::Import)]));
        graph.invalidate("M.groovy");
        assert!(graph.affected("Target.groovy").is_empty());
        assert!(graph.dependencies_of("M.groovy").is_none());
    }

    #[test]
    fn clear_removes_everything() {
        let graph = DependencyGraph::new();
        graph.record("M.groovy", &deps(&[("Target.groovy", DependencyRelation::Import)]));
        graph.clear();
        assert!(graph.affected("Target.groovy").is_empty());
    }

    #[test]
    fn affected_bounded_respects_max_nodes_cap() {
        let graph = DependencyGraph::new();
        // A chain of 5 modules, each depending on the previous.
        for i in 1..=5 {
            graph.record(&format!("M{i}.groovy"), &deps(&[(&format!("M{}.groovy", i - 1), DependencyRelation::Import)]));
        }
        let affected = graph.affected_bounded("M0.groovy", DEFAULT_MAX_DEPTH, 2);
        assert!(affected.len() <= 2);
    }
}
