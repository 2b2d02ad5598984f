use crate::item::ScheduledItem;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle through {}", .members.join(" -> "))]
pub struct DependencyCycleError {
    pub members: Vec<String>,
}

/// Directed graph over item ids with an edge from each dependency to the
/// item that depends on it.
pub struct DependencyGraph {
    pub graph: DiGraph<String, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(items: &[ScheduledItem]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::with_capacity(items.len(), items.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(items.len());

        // Add nodes first; the first record wins on a duplicate id
        for item in items {
            if !id_to_index.contains_key(&item.id) {
                let node_ix = graph.add_node(item.id.clone());
                id_to_index.insert(item.id.clone(), node_ix);
            }
        }

        // Add edges: dependency -> item, skipping ids that no longer exist
        for item in items {
            let Some(&item_ix) = id_to_index.get(&item.id) else {
                continue;
            };
            for dependency in &item.dependencies {
                if let Some(&dep_ix) = id_to_index.get(dependency) {
                    if !graph.contains_edge(dep_ix, item_ix) {
                        graph.add_edge(dep_ix, item_ix, ());
                    }
                }
            }
        }

        Self { graph, id_to_index }
    }

    /// Every strongly connected component that forms a cycle, self-loops
    /// included. Members and groups are sorted.
    pub fn cycle_groups(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| self.graph.contains_edge(node, node))
            })
            .map(|component| {
                let mut members: Vec<String> = component
                    .into_iter()
                    .map(|node| self.graph[node].clone())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    /// Item ids ordered so that every dependency comes before its dependents.
    pub fn dependency_order(&self) -> Result<Vec<String>, DependencyCycleError> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .map(|node| self.graph[node].clone())
                .collect()),
            Err(cycle) => {
                let culprit = &self.graph[cycle.node_id()];
                let members = self
                    .cycle_groups()
                    .into_iter()
                    .find(|group| group.contains(culprit))
                    .unwrap_or_else(|| vec![culprit.clone()]);
                Err(DependencyCycleError { members })
            }
        }
    }
}
