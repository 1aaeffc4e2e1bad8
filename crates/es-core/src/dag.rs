//! Entity dependency DAG and stable topological ordering
//!
//! Import order and delete order are both derived from this one graph:
//! import runs dependencies first, delete runs the exact reverse.

use crate::entity_key::EntityKey;
use crate::error::{CoreError, CoreResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A directed acyclic graph of entity dependencies
///
/// Nodes are added in catalog declaration order, so node indices double as
/// the tie-breaker when several entities are ready at the same time.
#[derive(Debug)]
pub struct EntityDag {
    /// The underlying graph, edges point from dependency to dependent
    graph: DiGraph<EntityKey, ()>,

    /// Map from entity key to node index
    node_map: HashMap<EntityKey, NodeIndex>,
}

impl EntityDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add an entity to the DAG, returning the existing node if already present
    pub fn add_entity(&mut self, key: &str) -> CoreResult<NodeIndex> {
        if let Some(&idx) = self.node_map.get(key) {
            return Ok(idx);
        }
        let entity_key = EntityKey::try_new(key).ok_or_else(|| CoreError::EmptyName {
            context: "entity key in DAG".into(),
        })?;
        let idx = self.graph.add_node(entity_key.clone());
        self.node_map.insert(entity_key, idx);
        Ok(idx)
    }

    /// Add a dependency edge (`entity` depends on `depends_on`)
    pub fn add_dependency(&mut self, entity: &str, depends_on: &str) -> CoreResult<()> {
        if entity == depends_on {
            return Err(CoreError::SelfDependency {
                key: entity.to_string(),
            });
        }
        let entity_idx = self.add_entity(entity)?;
        let dep_idx = self.add_entity(depends_on)?;
        if !self.graph.contains_edge(dep_idx, entity_idx) {
            self.graph.add_edge(dep_idx, entity_idx, ());
        }
        Ok(())
    }

    /// Build the DAG from `(entity, dependencies)` pairs in declaration order
    ///
    /// Every dependency must itself be declared; there are no external
    /// entities in a sync catalog.
    pub fn build(entities: &[(String, Vec<String>)]) -> CoreResult<Self> {
        let mut dag = Self::new();

        for (key, _) in entities {
            if dag.contains(key) {
                return Err(CoreError::DuplicateEntity { key: key.clone() });
            }
            dag.add_entity(key)?;
        }

        for (key, deps) in entities {
            for dep in deps {
                if !dag.contains(dep) {
                    return Err(CoreError::UnknownDependency {
                        entity: key.clone(),
                        dependency: dep.clone(),
                    });
                }
                dag.add_dependency(key, dep)?;
            }
        }

        dag.validate()?;

        Ok(dag)
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.find_cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Get entities in topological order (dependencies first)
    ///
    /// Kahn's algorithm with a min-heap over node indices: among the entities
    /// whose dependencies are all placed, the one declared first goes next.
    pub fn topological_order(&self) -> CoreResult<Vec<EntityKey>> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                let degree = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (idx, degree)
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&idx, _)| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(self.graph[idx].clone());
            for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if order.len() != self.graph.node_count() {
            self.validate()?;
        }

        Ok(order)
    }

    /// Get entities in reverse topological order (dependents first)
    pub fn reverse_topological_order(&self) -> CoreResult<Vec<EntityKey>> {
        let mut order = self.topological_order()?;
        order.reverse();
        Ok(order)
    }

    /// Get direct dependencies of an entity
    pub fn dependencies(&self, entity: &str) -> Vec<EntityKey> {
        self.neighbors(entity, Direction::Incoming)
    }

    /// Get direct dependents of an entity
    pub fn dependents(&self, entity: &str) -> Vec<EntityKey> {
        self.neighbors(entity, Direction::Outgoing)
    }

    /// Get all transitive dependencies of an entity
    pub fn ancestors(&self, entity: &str) -> Vec<EntityKey> {
        self.collect_reachable(entity, Direction::Incoming)
    }

    /// Get all transitive dependents of an entity
    pub fn descendants(&self, entity: &str) -> Vec<EntityKey> {
        self.collect_reachable(entity, Direction::Outgoing)
    }

    fn neighbors(&self, entity: &str, direction: Direction) -> Vec<EntityKey> {
        let Some(&idx) = self.node_map.get(entity) else {
            return Vec::new();
        };
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort();
        found.into_iter().map(|n| self.graph[n].clone()).collect()
    }

    /// Collect every node reachable from `entity` following `direction` (DFS)
    fn collect_reachable(&self, entity: &str, direction: Direction) -> Vec<EntityKey> {
        let Some(&start) = self.node_map.get(entity) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        let mut found: Vec<NodeIndex> = visited.into_iter().collect();
        found.sort();
        found.into_iter().map(|n| self.graph[n].clone()).collect()
    }

    /// Check if an entity exists in the DAG
    pub fn contains(&self, entity: &str) -> bool {
        self.node_map.contains_key(entity)
    }

    /// Number of entities in the DAG
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the DAG has no entities
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

impl Default for EntityDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
